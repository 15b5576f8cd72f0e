use serde::{Deserialize, Serialize};

use crate::model::common::{
    election::{CandidacyId, Post},
    UserId,
};

/// A member's application to stand for a post in an election.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Candidacy {
    /// Unique within the owning election.
    pub id: CandidacyId,
    /// The applying member.
    pub applicant: UserId,
    /// The post applied for.
    pub post: Post,
    /// Why the applicant is a good fit.
    pub reason: String,
}
