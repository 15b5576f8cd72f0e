//! Storage backends.
//!
//! Business logic only ever sees a [`Repository`], so the in-memory backend and the
//! MongoDB backend are interchangeable.

use std::sync::Arc;

use mongodb::Database;

use crate::error::Result;
use crate::model::db::{concern::Concern, election::Election};

mod memory;
mod mongo;

pub use memory::MemoryRepository;
pub use mongo::{ensure_indexes_exist, MongoRepository};

/// Identifier of a stored record.
pub type RecordId = u32;

/// A type that can be stored in a [`Repository`].
pub trait Record: Clone + Send + Sync + 'static {
    /// The name of the collection.
    const NAME: &'static str;

    /// Get the record's ID.
    fn id(&self) -> RecordId;
}

/// Keyed storage for one kind of record.
#[rocket::async_trait]
pub trait Repository<T: Record>: Send + Sync {
    /// Get the record with the given ID, if it exists.
    async fn get(&self, id: RecordId) -> Result<Option<T>>;

    /// Get every record, ordered by ID.
    async fn list(&self) -> Result<Vec<T>>;

    /// Insert the record, or replace the existing record with the same ID.
    async fn upsert(&self, record: &T) -> Result<()>;

    /// Atomically allocate a fresh ID. IDs start at 1 and are never reused.
    async fn next_id(&self) -> Result<RecordId>;
}

/// One repository per record type.
#[derive(Clone)]
pub struct Store {
    pub elections: Arc<dyn Repository<Election>>,
    pub concerns: Arc<dyn Repository<Concern>>,
}

impl Store {
    /// A store that lives only as long as the process.
    pub fn in_memory() -> Self {
        Self {
            elections: Arc::new(MemoryRepository::new()),
            concerns: Arc::new(MemoryRepository::new()),
        }
    }

    /// A store backed by the given MongoDB database.
    pub fn mongodb(db: &Database) -> Self {
        Self {
            elections: Arc::new(MongoRepository::from_db(db)),
            concerns: Arc::new(MongoRepository::from_db(db)),
        }
    }
}
