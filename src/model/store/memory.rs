use std::collections::BTreeMap;
use std::sync::atomic::{AtomicU32, Ordering};

use rocket::tokio::sync::RwLock;

use crate::error::Result;
use crate::model::store::{Record, RecordId, Repository};

/// A repository that keeps its records in process memory.
pub struct MemoryRepository<T> {
    records: RwLock<BTreeMap<RecordId, T>>,
    last_id: AtomicU32,
}

impl<T> MemoryRepository<T> {
    pub fn new() -> Self {
        Self {
            records: RwLock::new(BTreeMap::new()),
            last_id: AtomicU32::new(0),
        }
    }
}

impl<T> Default for MemoryRepository<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[rocket::async_trait]
impl<T> Repository<T> for MemoryRepository<T>
where
    T: Record,
{
    async fn get(&self, id: RecordId) -> Result<Option<T>> {
        Ok(self.records.read().await.get(&id).cloned())
    }

    async fn list(&self) -> Result<Vec<T>> {
        Ok(self.records.read().await.values().cloned().collect())
    }

    async fn upsert(&self, record: &T) -> Result<()> {
        self.records
            .write()
            .await
            .insert(record.id(), record.clone());
        Ok(())
    }

    async fn next_id(&self) -> Result<RecordId> {
        Ok(self.last_id.fetch_add(1, Ordering::Relaxed) + 1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, PartialEq, Eq)]
    struct Note {
        id: RecordId,
        text: String,
    }

    impl Record for Note {
        const NAME: &'static str = "notes";

        fn id(&self) -> RecordId {
            self.id
        }
    }

    fn note(id: RecordId, text: &str) -> Note {
        Note {
            id,
            text: text.to_string(),
        }
    }

    #[rocket::async_test]
    async fn get_list_upsert() {
        let repo = MemoryRepository::<Note>::new();
        assert_eq!(repo.get(1).await.unwrap(), None);
        assert!(repo.list().await.unwrap().is_empty());

        repo.upsert(&note(2, "second")).await.unwrap();
        repo.upsert(&note(1, "first")).await.unwrap();
        assert_eq!(repo.get(1).await.unwrap(), Some(note(1, "first")));

        // Replacing keeps a single record per ID.
        repo.upsert(&note(1, "first, edited")).await.unwrap();
        let all = repo.list().await.unwrap();
        assert_eq!(all, vec![note(1, "first, edited"), note(2, "second")]);
    }

    #[rocket::async_test]
    async fn ids_are_sequential() {
        let repo = MemoryRepository::<Note>::new();
        assert_eq!(repo.next_id().await.unwrap(), 1);
        assert_eq!(repo.next_id().await.unwrap(), 2);
        assert_eq!(repo.next_id().await.unwrap(), 3);
    }
}
