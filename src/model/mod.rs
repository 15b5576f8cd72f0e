//! The data model and the business logic operating on it.
//!
//! - [`common`] holds types shared by the API and the database.
//! - [`api`] holds request and response bodies.
//! - [`db`] holds stored records and their registries.
//! - [`store`] holds the storage backends.

pub mod api;
pub mod common;
pub mod db;
pub mod store;
