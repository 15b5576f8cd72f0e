use chrono::{DateTime, NaiveDateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::model::common::election::{BallotScope, Post};

/// An election specification, as submitted by an election officer.
///
/// Every field is optional on the wire so that missing values are reported as
/// validation errors rather than rejected by the JSON layer.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ElectionSpec {
    /// Election title.
    #[serde(default)]
    pub title: String,
    /// Names of the posts to elect.
    #[serde(default)]
    pub posts: Vec<String>,
    /// Applications close at this time.
    #[serde(default)]
    pub application_deadline: Option<String>,
    /// Voting closes at this time.
    #[serde(default)]
    pub voting_deadline: Option<String>,
    /// How many ballots each voter may hold.
    #[serde(default)]
    pub ballot_scope: BallotScope,
}

/// An election specification that has passed validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidElectionSpec {
    pub title: String,
    /// Non-empty, without duplicates, in the order given.
    pub posts: Vec<Post>,
    pub application_deadline: DateTime<Utc>,
    pub voting_deadline: DateTime<Utc>,
    pub ballot_scope: BallotScope,
}

impl ElectionSpec {
    /// Check every field, converting names and timestamps into their typed forms.
    pub fn validate(self) -> Result<ValidElectionSpec> {
        let title = self.title.trim();
        if title.is_empty() {
            return Err(Error::Validation("Election title is required".to_string()));
        }

        let mut posts = Vec::with_capacity(self.posts.len());
        for name in &self.posts {
            let post: Post = name.parse()?;
            if !posts.contains(&post) {
                posts.push(post);
            }
        }
        if posts.is_empty() {
            return Err(Error::Validation(
                "At least one post must be up for election".to_string(),
            ));
        }

        let application_deadline =
            parse_deadline("application deadline", self.application_deadline.as_deref())?;
        let voting_deadline = parse_deadline("voting deadline", self.voting_deadline.as_deref())?;
        if voting_deadline < application_deadline {
            return Err(Error::Validation(
                "Voting deadline cannot be before the application deadline".to_string(),
            ));
        }

        Ok(ValidElectionSpec {
            title: title.to_string(),
            posts,
            application_deadline,
            voting_deadline,
            ballot_scope: self.ballot_scope,
        })
    }
}

/// Parse an RFC 3339 timestamp, or a zone-less `datetime-local` value taken as UTC.
fn parse_deadline(field: &str, value: Option<&str>) -> Result<DateTime<Utc>> {
    let raw = value
        .map(str::trim)
        .filter(|raw| !raw.is_empty())
        .ok_or_else(|| Error::Validation(format!("The {field} is required")))?;

    DateTime::parse_from_rfc3339(raw)
        .map(|datetime| datetime.with_timezone(&Utc))
        .or_else(|_| {
            NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S")
                .or_else(|_| NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M"))
                .map(|naive| Utc.from_utc_datetime(&naive))
        })
        .map_err(|_| Error::Validation(format!("The {field} is not a valid timestamp: '{raw}'")))
}
