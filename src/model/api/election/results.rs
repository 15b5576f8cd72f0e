use serde::{Deserialize, Serialize};

use crate::model::{
    common::election::{Candidacy, CandidacyId, ElectionId, Phase, Post, PostTally},
    db::election::Election,
};

/// Everything needed to recompute an election's tallies, without voter identities.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ElectionResults {
    /// Election unique ID.
    pub id: ElectionId,
    /// Election title.
    pub title: String,
    /// Phase when the results were taken. Anything before `Finished` is provisional.
    pub phase: Phase,
    /// Posts up for election.
    pub posts: Vec<Post>,
    /// Every application, in the order made.
    pub candidacies: Vec<Candidacy>,
    /// The candidacy chosen on each active ballot, in no meaningful order.
    pub votes: Vec<CandidacyId>,
}

impl ElectionResults {
    pub fn new(election: &Election, phase: Phase) -> Self {
        let mut votes: Vec<CandidacyId> = election.votes().collect();
        // Ballot order would reveal who voted when.
        votes.sort_unstable();
        Self {
            id: election.id,
            title: election.title.clone(),
            phase,
            posts: election.posts.clone(),
            candidacies: election.candidacies.clone(),
            votes,
        }
    }

    /// Are these results subject to change?
    pub fn is_provisional(&self) -> bool {
        self.phase != Phase::Finished
    }

    /// Recompute the tally for every post.
    pub fn tallies(&self) -> Vec<PostTally> {
        self.posts
            .iter()
            .map(|post| {
                PostTally::count(*post, &self.candidacies, self.votes.iter().copied())
            })
            .collect()
    }

    /// Find the candidacy with the given ID.
    pub fn candidacy(&self, id: CandidacyId) -> Option<&Candidacy> {
        self.candidacies.iter().find(|candidacy| candidacy.id == id)
    }
}
