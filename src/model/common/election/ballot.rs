use serde::{Deserialize, Serialize};

use crate::model::common::{election::CandidacyId, UserId};

/// A single voter's recorded choice.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ballot {
    pub voter: UserId,
    pub candidacy_id: CandidacyId,
}

/// How many active ballots a voter may hold in one election.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BallotScope {
    /// One ballot per voter across the whole election: voting again replaces
    /// the previous ballot, whichever post it was for.
    #[default]
    Election,
    /// One ballot per voter per post.
    Post,
}
