use mongodb::{
    bson::{doc, Document},
    error::Error as DbError,
    options::{FindOneAndUpdateOptions, IndexOptions, ReplaceOptions, ReturnDocument},
    Collection, Database, IndexModel,
};
use rocket::futures::TryStreamExt;
use serde::{de::DeserializeOwned, Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::model::{
    db::concern::Concern,
    store::{Record, RecordId, Repository},
};

const COUNTERS: &str = "counters";

/// A counter object used to implement auto-increment IDs, one per collection.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct Counter {
    #[serde(rename = "_id")]
    id: String,
    next: RecordId,
}

/// A repository backed by a MongoDB collection named after the record type.
pub struct MongoRepository<T> {
    records: Collection<T>,
    counters: Collection<Counter>,
}

impl<T> MongoRepository<T>
where
    T: Record,
{
    /// Get a handle on this record type's collection in the given database.
    pub fn from_db(db: &Database) -> Self {
        Self {
            records: db.collection(T::NAME),
            counters: db.collection(COUNTERS),
        }
    }
}

fn id_filter(id: RecordId) -> Document {
    doc! { "_id": id }
}

#[rocket::async_trait]
impl<T> Repository<T> for MongoRepository<T>
where
    T: Record + Serialize + DeserializeOwned + Unpin,
{
    async fn get(&self, id: RecordId) -> Result<Option<T>> {
        Ok(self.records.find_one(id_filter(id), None).await?)
    }

    async fn list(&self) -> Result<Vec<T>> {
        let mut records: Vec<T> = self.records.find(None, None).await?.try_collect().await?;
        records.sort_unstable_by_key(|record| record.id());
        Ok(records)
    }

    async fn upsert(&self, record: &T) -> Result<()> {
        let options = ReplaceOptions::builder().upsert(true).build();
        self.records
            .replace_one(id_filter(record.id()), record, options)
            .await?;
        Ok(())
    }

    async fn next_id(&self) -> Result<RecordId> {
        // Creates the counter on first use, so the first ID handed out is 1.
        let update = doc! {
            "$inc": { "next": 1 }
        };
        let options = FindOneAndUpdateOptions::builder()
            .upsert(true)
            .return_document(ReturnDocument::After)
            .build();
        let counter = self
            .counters
            .find_one_and_update(doc! { "_id": T::NAME }, update, options)
            .await?
            .ok_or_else(|| Error::Internal(format!("Failed to find counter for {}", T::NAME)))?;
        Ok(counter.next)
    }
}

/// Ensure that all the required indexes exist on the given database.
///
/// This operation is idempotent.
pub async fn ensure_indexes_exist(db: &Database) -> std::result::Result<(), DbError> {
    debug!("Ensuring collection indexes exist");

    // Concerns are listed per author for ordinary members.
    let author_index = IndexModel::builder()
        .keys(doc! {"author": 1})
        .options(IndexOptions::builder().build())
        .build();
    db.collection::<Concern>(Concern::NAME)
        .create_index(author_index, None)
        .await?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use chrono::Utc;
    use mongodb::Client;

    use super::*;
    use crate::model::db::election::Election;

    /// Needs a MongoDB server at `MONGODB_URI` (default `mongodb://localhost:27017`).
    #[rocket::async_test]
    #[ignore = "requires a running MongoDB instance"]
    async fn election_round_trip() {
        let uri = std::env::var("MONGODB_URI")
            .unwrap_or_else(|_| "mongodb://localhost:27017".to_string());
        let client = Client::with_uri_str(uri).await.unwrap();
        // Use a random name to avoid collisions between test runs.
        let db = client.database(&format!("test{}", rand::random::<u32>()));
        ensure_indexes_exist(&db).await.unwrap();

        let repo = MongoRepository::<Election>::from_db(&db);
        assert_eq!(repo.next_id().await.unwrap(), 1);
        assert_eq!(repo.next_id().await.unwrap(), 2);

        let mut election = Election::example(2, Utc::now());
        repo.upsert(&election).await.unwrap();
        election.title = "Renamed".to_string();
        repo.upsert(&election).await.unwrap();

        let stored = repo.get(2).await.unwrap().unwrap();
        assert_eq!(stored.title, "Renamed");
        assert_eq!(repo.list().await.unwrap().len(), 1);
        assert!(repo.get(1).await.unwrap().is_none());

        db.drop(None).await.unwrap();
    }
}
