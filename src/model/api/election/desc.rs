use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::model::{
    common::election::{BallotScope, Candidacy, ElectionId, Phase, Post},
    db::election::Election,
};

/// An API-friendly election description, containing no voter identities or weird formats.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ElectionDescription {
    /// Election unique ID.
    pub id: ElectionId,
    /// Election title.
    pub title: String,
    /// Election phase at the time of the request.
    pub phase: Phase,
    /// Applications close at this time.
    pub application_deadline: DateTime<Utc>,
    /// Voting closes at this time.
    pub voting_deadline: DateTime<Utc>,
    /// Posts up for election.
    pub posts: Vec<Post>,
    /// Ballot scope.
    pub ballot_scope: BallotScope,
    /// Every application, in the order made.
    pub candidacies: Vec<Candidacy>,
    /// How many ballots are currently active.
    pub ballots_cast: usize,
}

impl ElectionDescription {
    pub fn new(election: Election, now: DateTime<Utc>) -> Self {
        Self {
            id: election.id,
            phase: election.phase(now),
            title: election.title,
            application_deadline: election.application_deadline,
            voting_deadline: election.voting_deadline,
            posts: election.posts,
            ballot_scope: election.ballot_scope,
            candidacies: election.candidacies,
            ballots_cast: election.ballots.len(),
        }
    }
}

/// A summary of an election, shorter than the full `ElectionDescription`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ElectionSummary {
    /// Election unique ID.
    pub id: ElectionId,
    /// Election title.
    pub title: String,
    /// Election phase at the time of the request.
    pub phase: Phase,
    /// Applications close at this time.
    pub application_deadline: DateTime<Utc>,
    /// Voting closes at this time.
    pub voting_deadline: DateTime<Utc>,
    /// Posts up for election.
    pub posts: Vec<Post>,
}

impl ElectionSummary {
    pub fn new(election: Election, now: DateTime<Utc>) -> Self {
        Self {
            id: election.id,
            phase: election.phase(now),
            title: election.title,
            application_deadline: election.application_deadline,
            voting_deadline: election.voting_deadline,
            posts: election.posts,
        }
    }
}
