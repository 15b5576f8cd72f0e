use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::model::{
    common::UserId,
    db::concern::{Concern, ConcernId, ConcernStatus},
};

/// A new concern, as submitted by a member.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ConcernRequest {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
}

/// A request to move a concern along.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusUpdate {
    pub status: ConcernStatus,
}

/// An API-friendly concern.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConcernDescription {
    pub id: ConcernId,
    pub author: UserId,
    pub title: String,
    pub description: String,
    pub status: ConcernStatus,
    pub submitted_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Concern> for ConcernDescription {
    fn from(concern: Concern) -> Self {
        Self {
            id: concern.id,
            author: concern.author,
            title: concern.title,
            description: concern.description,
            status: concern.status,
            submitted_at: concern.submitted_at,
            updated_at: concern.updated_at,
        }
    }
}
