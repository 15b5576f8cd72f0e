use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::model::common::election::{Candidacy, CandidacyId, Post};

/// The count for one candidacy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TallyEntry {
    pub candidacy_id: CandidacyId,
    pub vote_count: u64,
    /// Share of the post's votes, rounded to two decimal places.
    pub percentage: f64,
}

/// The counts for every candidacy standing for a post.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PostTally {
    pub post: Post,
    pub total_votes: u64,
    /// One entry per candidacy, in application order.
    pub entries: Vec<TallyEntry>,
}

impl PostTally {
    /// Count `votes` (chosen candidacy IDs) for the candidacies standing for `post`.
    /// Votes for candidacies of other posts are ignored.
    pub fn count<'a>(
        post: Post,
        candidacies: impl IntoIterator<Item = &'a Candidacy>,
        votes: impl IntoIterator<Item = CandidacyId>,
    ) -> Self {
        let standing: Vec<CandidacyId> = candidacies
            .into_iter()
            .filter(|candidacy| candidacy.post == post)
            .map(|candidacy| candidacy.id)
            .collect();

        let mut counts: HashMap<CandidacyId, u64> = standing.iter().map(|id| (*id, 0)).collect();
        for vote in votes {
            if let Some(count) = counts.get_mut(&vote) {
                *count += 1;
            }
        }
        let total_votes = counts.values().sum();

        let entries = standing
            .into_iter()
            .map(|candidacy_id| {
                let vote_count = counts.get(&candidacy_id).copied().unwrap_or(0);
                TallyEntry {
                    candidacy_id,
                    vote_count,
                    percentage: percentage(vote_count, total_votes),
                }
            })
            .collect();

        Self {
            post,
            total_votes,
            entries,
        }
    }

    /// Get the entry for a particular candidacy.
    pub fn entry(&self, candidacy_id: CandidacyId) -> Option<&TallyEntry> {
        self.entries
            .iter()
            .find(|entry| entry.candidacy_id == candidacy_id)
    }
}

/// `count / total` as a percentage to two decimal places; zero when nobody voted.
fn percentage(count: u64, total: u64) -> f64 {
    if total == 0 {
        return 0.0;
    }
    let raw = count as f64 / total as f64 * 100.0;
    (raw * 100.0).round() / 100.0
}
