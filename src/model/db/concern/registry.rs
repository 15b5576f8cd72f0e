use std::sync::Arc;

use chrono::{DateTime, Utc};
use rocket::tokio::sync::Mutex;

use crate::error::{Error, Result};
use crate::model::{
    common::role::{can_manage_concerns, Role},
    store::Repository,
};

use super::base::{Concern, ConcernId, ConcernStatus};

/// Concerns raised by members.
pub struct ConcernRegistry {
    concerns: Arc<dyn Repository<Concern>>,
    /// Serialises status changes.
    lock: Mutex<()>,
}

impl ConcernRegistry {
    pub fn new(concerns: Arc<dyn Repository<Concern>>) -> Self {
        Self {
            concerns,
            lock: Mutex::new(()),
        }
    }

    /// Raise a new concern.
    pub async fn submit(
        &self,
        author: &str,
        title: &str,
        description: &str,
        now: DateTime<Utc>,
    ) -> Result<Concern> {
        let id = self.concerns.next_id().await?;
        let concern = Concern::new(id, author.to_string(), title, description, now)?;
        self.concerns.upsert(&concern).await?;
        info!("User '{author}' raised concern {id}");
        Ok(concern)
    }

    /// The concerns visible to the given user, newest first.
    /// Concern managers see everything, everyone else sees only their own.
    pub async fn list_for(&self, user: &str, role: Role) -> Result<Vec<Concern>> {
        let mut concerns = self.concerns.list().await?;
        if !can_manage_concerns(role) {
            concerns.retain(|concern| concern.author == user);
        }
        concerns.sort_unstable_by(|a, b| b.id.cmp(&a.id));
        Ok(concerns)
    }

    /// Get a concern, if the given user may see it.
    pub async fn get_for(&self, id: ConcernId, user: &str, role: Role) -> Result<Concern> {
        self.concerns
            .get(id)
            .await?
            .filter(|concern| can_manage_concerns(role) || concern.author == user)
            .ok_or_else(|| Error::not_found(format!("Concern {id}")))
    }

    /// Move a concern forward through its lifecycle.
    pub async fn update_status(
        &self,
        id: ConcernId,
        status: ConcernStatus,
        now: DateTime<Utc>,
    ) -> Result<Concern> {
        let _guard = self.lock.lock().await;
        let mut concern = self
            .concerns
            .get(id)
            .await?
            .ok_or_else(|| Error::not_found(format!("Concern {id}")))?;
        if concern.advance(status, now)? {
            self.concerns.upsert(&concern).await?;
            info!("Concern {id} is now '{status}'");
        }
        Ok(concern)
    }
}
