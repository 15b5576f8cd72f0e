//! API-compatible types.
//!
//! The types in this module are serialised in an API-friendly way, e.g.:
//!
//! - Datetimes are serialised as RFC 3339 strings.
//! - Voter identities never appear.

pub mod auth;
pub mod concern;
pub mod election;
pub mod vote;
