use chrono::{DateTime, Utc};
use mongodb::bson::serde_helpers::chrono_datetime_as_bson_datetime;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::model::{
    api::election::ValidElectionSpec,
    common::{
        election::{
            Ballot, BallotScope, Candidacy, CandidacyId, ElectionId, Phase, Post, PostTally,
        },
        UserId,
    },
    store::{Record, RecordId},
};

/// Core election data, as stored in the database.
///
/// The election owns its candidacies and ballots. Its phase is never stored;
/// see [`Election::phase`].
#[derive(Debug, PartialEq, Clone, Serialize, Deserialize)]
pub struct Election {
    /// Unique ID.
    #[serde(rename = "_id")]
    pub id: ElectionId,
    /// Election title.
    pub title: String,
    /// Applications close at this time, and voting opens.
    #[serde(with = "chrono_datetime_as_bson_datetime")]
    pub application_deadline: DateTime<Utc>,
    /// Voting closes at this time.
    #[serde(with = "chrono_datetime_as_bson_datetime")]
    pub voting_deadline: DateTime<Utc>,
    /// Posts up for election, without duplicates.
    pub posts: Vec<Post>,
    /// How many ballots each voter may hold.
    #[serde(default)]
    pub ballot_scope: BallotScope,
    /// Applications, in the order they were made.
    pub candidacies: Vec<Candidacy>,
    /// Active ballots.
    pub ballots: Vec<Ballot>,
    /// The election officer who created the election.
    pub created_by: UserId,
    #[serde(with = "chrono_datetime_as_bson_datetime")]
    pub created_at: DateTime<Utc>,
}

impl Election {
    /// Create a new election with no candidacies or ballots.
    pub fn new(
        id: ElectionId,
        spec: ValidElectionSpec,
        created_by: UserId,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            title: spec.title,
            application_deadline: spec.application_deadline,
            voting_deadline: spec.voting_deadline,
            posts: spec.posts,
            ballot_scope: spec.ballot_scope,
            candidacies: Vec::new(),
            ballots: Vec::new(),
            created_by,
            created_at,
        }
    }

    /// The phase of the election at time `now`.
    pub fn phase(&self, now: DateTime<Utc>) -> Phase {
        Phase::at(self.application_deadline, self.voting_deadline, now)
    }

    /// Fail with a phase error unless the election is in the `expected` phase.
    fn require_phase(&self, expected: Phase, now: DateTime<Utc>) -> Result<()> {
        let phase = self.phase(now);
        if phase == expected {
            Ok(())
        } else {
            Err(Error::Phase(format!(
                "Election {} is in its {phase} phase, not its {expected} phase",
                self.id
            )))
        }
    }

    /// Is the given post up for election?
    pub fn has_post(&self, post: Post) -> bool {
        self.posts.contains(&post)
    }

    /// Parse a post name, and make sure that post is up for election.
    fn configured_post(&self, name: &str) -> Result<Post> {
        let post: Post = name.parse()?;
        if self.has_post(post) {
            Ok(post)
        } else {
            Err(Error::Validation(format!(
                "Post '{post}' is not up for election in election {}",
                self.id
            )))
        }
    }

    /// Get a candidacy by ID.
    pub fn candidacy(&self, id: CandidacyId) -> Option<&Candidacy> {
        self.candidacies.iter().find(|candidacy| candidacy.id == id)
    }

    /// Get the candidacy the given user applied with, if any.
    pub fn candidacy_of(&self, user: &str) -> Option<&Candidacy> {
        self.candidacies
            .iter()
            .find(|candidacy| candidacy.applicant == user)
    }

    /// Record an application for a post, returning the new candidacy's ID.
    ///
    /// Leaves the election untouched on failure.
    pub fn apply(
        &mut self,
        applicant: &str,
        post: &str,
        reason: &str,
        now: DateTime<Utc>,
    ) -> Result<CandidacyId> {
        self.require_phase(Phase::Applying, now)?;
        let post = self.configured_post(post)?;

        let reason = reason.trim();
        if reason.is_empty() {
            return Err(Error::Validation(
                "A reason for applying is required".to_string(),
            ));
        }
        if let Some(existing) = self.candidacy_of(applicant) {
            return Err(Error::Duplicate(format!(
                "User '{applicant}' has already applied for {} in election {}",
                existing.post, self.id
            )));
        }

        let id = self
            .candidacies
            .iter()
            .map(|candidacy| candidacy.id)
            .max()
            .unwrap_or(0)
            + 1;
        self.candidacies.push(Candidacy {
            id,
            applicant: applicant.to_string(),
            post,
            reason: reason.to_string(),
        });
        Ok(id)
    }

    /// Record a vote, replacing the voter's previous ballot(s) within the ballot scope.
    ///
    /// Returns `false` if the vote was already recorded exactly as given, in which
    /// case nothing changes.
    pub fn cast_vote(
        &mut self,
        voter: &str,
        candidacy_id: CandidacyId,
        now: DateTime<Utc>,
    ) -> Result<bool> {
        self.require_phase(Phase::Voting, now)?;
        let post = self
            .candidacy(candidacy_id)
            .map(|candidacy| candidacy.post)
            .ok_or_else(|| {
                Error::not_found(format!(
                    "Candidacy {candidacy_id} in election {}",
                    self.id
                ))
            })?;

        let scope = self.ballot_scope;
        let candidacies = &self.candidacies;
        let in_scope = |ballot: &Ballot| {
            ballot.voter == voter
                && match scope {
                    BallotScope::Election => true,
                    BallotScope::Post => candidacies.iter().any(|candidacy| {
                        candidacy.id == ballot.candidacy_id && candidacy.post == post
                    }),
                }
        };

        let existing: Vec<&Ballot> = self.ballots.iter().filter(|b| in_scope(b)).collect();
        if let [ballot] = existing.as_slice() {
            if ballot.candidacy_id == candidacy_id {
                return Ok(false);
            }
        }

        self.ballots.retain(|ballot| !in_scope(ballot));
        self.ballots.push(Ballot {
            voter: voter.to_string(),
            candidacy_id,
        });
        Ok(true)
    }

    /// The candidacy IDs the given voter currently votes for.
    pub fn votes_of(&self, voter: &str) -> Vec<CandidacyId> {
        self.ballots
            .iter()
            .filter(|ballot| ballot.voter == voter)
            .map(|ballot| ballot.candidacy_id)
            .collect()
    }

    /// Every chosen candidacy ID, without voter identities.
    pub fn votes(&self) -> impl Iterator<Item = CandidacyId> + '_ {
        self.ballots.iter().map(|ballot| ballot.candidacy_id)
    }

    /// Count the votes for one post of this election.
    pub fn tally(&self, post: &str) -> Result<PostTally> {
        let post = self.configured_post(post)?;
        Ok(PostTally::count(post, &self.candidacies, self.votes()))
    }

    /// Count the votes for every post, in the order the posts were configured.
    pub fn tallies(&self) -> Vec<PostTally> {
        self.posts
            .iter()
            .map(|post| PostTally::count(*post, &self.candidacies, self.votes()))
            .collect()
    }
}

impl Record for Election {
    const NAME: &'static str = "elections";

    fn id(&self) -> RecordId {
        self.id
    }
}
