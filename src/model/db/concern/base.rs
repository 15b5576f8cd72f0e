use std::fmt::{Display, Formatter};

use chrono::{DateTime, Utc};
use mongodb::bson::serde_helpers::chrono_datetime_as_bson_datetime;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::model::{
    common::UserId,
    store::{Record, RecordId},
};

pub type ConcernId = u32;

/// Where a concern is in its lifecycle. Statuses only ever move forward.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum ConcernStatus {
    #[default]
    New,
    #[serde(rename = "In Progress")]
    InProgress,
    Resolved,
}

impl Display for ConcernStatus {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::New => "New",
            Self::InProgress => "In Progress",
            Self::Resolved => "Resolved",
        };
        write!(f, "{name}")
    }
}

/// A concern raised by a member, as stored in the database.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Concern {
    #[serde(rename = "_id")]
    pub id: ConcernId,
    pub author: UserId,
    pub title: String,
    pub description: String,
    pub status: ConcernStatus,
    #[serde(with = "chrono_datetime_as_bson_datetime")]
    pub submitted_at: DateTime<Utc>,
    #[serde(with = "chrono_datetime_as_bson_datetime")]
    pub updated_at: DateTime<Utc>,
}

impl Concern {
    /// Create a new concern, checking that it says something.
    pub fn new(
        id: ConcernId,
        author: UserId,
        title: &str,
        description: &str,
        now: DateTime<Utc>,
    ) -> Result<Self> {
        let title = title.trim();
        let description = description.trim();
        if title.is_empty() {
            return Err(Error::Validation("A concern needs a title".to_string()));
        }
        if description.is_empty() {
            return Err(Error::Validation(
                "A concern needs a description".to_string(),
            ));
        }
        Ok(Self {
            id,
            author,
            title: title.to_string(),
            description: description.to_string(),
            status: ConcernStatus::New,
            submitted_at: now,
            updated_at: now,
        })
    }

    /// Move the concern to `status`. Returns `false` if it was already there.
    pub fn advance(&mut self, status: ConcernStatus, now: DateTime<Utc>) -> Result<bool> {
        if status == self.status {
            return Ok(false);
        }
        if status < self.status {
            return Err(Error::Validation(format!(
                "Concern {} cannot move back from '{}' to '{status}'",
                self.id, self.status
            )));
        }
        self.status = status;
        self.updated_at = now;
        Ok(true)
    }
}

impl Record for Concern {
    const NAME: &'static str = "concerns";

    fn id(&self) -> RecordId {
        self.id
    }
}

#[cfg(test)]
mod tests {
    use chrono::Duration;

    use super::*;

    fn example(now: DateTime<Utc>) -> Concern {
        Concern::new(
            1,
            "alice".to_string(),
            "Hall heating",
            "The main hall is freezing on Tuesdays.",
            now,
        )
        .unwrap()
    }

    #[test]
    fn new_concern() {
        let now = Utc::now();
        let concern = example(now);
        assert_eq!(concern.status, ConcernStatus::New);
        assert_eq!(concern.submitted_at, now);

        assert!(Concern::new(2, "bob".into(), " ", "Something", now).is_err());
        assert!(Concern::new(2, "bob".into(), "Something", "", now).is_err());
    }

    #[test]
    fn forward_only() {
        let now = Utc::now();
        let later = now + Duration::minutes(5);
        let mut concern = example(now);

        assert!(concern.advance(ConcernStatus::InProgress, later).unwrap());
        assert_eq!(concern.updated_at, later);
        assert!(!concern.advance(ConcernStatus::InProgress, later).unwrap());

        match concern.advance(ConcernStatus::New, later) {
            Err(Error::Validation(_)) => {}
            other => panic!("expected a validation error, got {other:?}"),
        }
        assert_eq!(concern.status, ConcernStatus::InProgress);

        // Skipping straight to resolved is allowed.
        let mut other = example(now);
        assert!(other.advance(ConcernStatus::Resolved, later).unwrap());
    }

    #[test]
    fn status_names() {
        use rocket::serde::json::serde_json;

        assert_eq!(
            serde_json::to_string(&ConcernStatus::InProgress).unwrap(),
            "\"In Progress\""
        );
        assert_eq!(ConcernStatus::InProgress.to_string(), "In Progress");
        assert!(ConcernStatus::New < ConcernStatus::Resolved);
    }
}
