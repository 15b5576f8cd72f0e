use serde::{Deserialize, Serialize};

use crate::model::common::election::{CandidacyId, Phase, Post, PostTally, TallyEntry};

/// A request to stand for a post.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ApplicationRequest {
    /// Display name of the post, e.g. `"Vice-Chair"`.
    #[serde(default)]
    pub post: String,
    #[serde(default)]
    pub reason: String,
}

/// The response to a successful application.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CandidacyCreated {
    pub candidacy_id: CandidacyId,
}

/// A request to vote for a candidacy.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VoteRequest {
    pub candidacy_id: CandidacyId,
}

/// What the caller has done in an election so far.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Participation {
    /// The caller's own candidacy, if they applied.
    pub candidacy: Option<CandidacyId>,
    /// The candidacies the caller currently votes for.
    pub voted_for: Vec<CandidacyId>,
}

/// One post's tally, with the phase it was taken in.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TallyResponse {
    pub post: Post,
    pub phase: Phase,
    /// True until voting has closed.
    pub provisional: bool,
    pub total_votes: u64,
    pub entries: Vec<TallyEntry>,
}

impl TallyResponse {
    pub fn new(tally: PostTally, phase: Phase) -> Self {
        Self {
            post: tally.post,
            phase,
            provisional: phase != Phase::Finished,
            total_votes: tally.total_votes,
            entries: tally.entries,
        }
    }
}
