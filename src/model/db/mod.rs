//! DB-compatible (e.g. de/serialisable) types, and the registries that own them.
//!
//! The types in this module are serialised in a DB-friendly way, e.g.:
//!
//! - IDs are stored as `_id`.
//! - Datetimes are serialised in MongoDB's own format.

pub mod concern;
pub mod election;
