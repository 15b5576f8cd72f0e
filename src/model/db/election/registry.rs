use std::sync::Arc;

use chrono::{DateTime, Utc};

use crate::error::{Error, Result};
use crate::model::{
    api::{
        election::{ElectionResults, ElectionSpec},
        vote::{Participation, TallyResponse},
    },
    common::election::{CandidacyId, ElectionId, Phase},
    store::Repository,
};

use super::{base::Election, locks::ElectionLocks};

/// All elections, with their candidacies and ballots.
///
/// Every mutation of an election runs under that election's lock, so concurrent
/// requests never lose each other's updates.
pub struct ElectionRegistry {
    elections: Arc<dyn Repository<Election>>,
    locks: ElectionLocks,
}

impl ElectionRegistry {
    pub fn new(elections: Arc<dyn Repository<Election>>) -> Self {
        Self {
            elections,
            locks: ElectionLocks::new(),
        }
    }

    /// Validate `spec` and store a new election.
    pub async fn create_election(
        &self,
        spec: ElectionSpec,
        creator: &str,
        now: DateTime<Utc>,
    ) -> Result<Election> {
        let spec = spec.validate()?;
        let id = self.elections.next_id().await?;
        let election = Election::new(id, spec, creator.to_string(), now);
        self.elections.upsert(&election).await?;
        info!(
            "Created election {id} '{}' for {} post(s)",
            election.title,
            election.posts.len()
        );
        Ok(election)
    }

    /// Get an election by ID.
    pub async fn get(&self, id: ElectionId) -> Result<Election> {
        self.elections
            .get(id)
            .await?
            .ok_or_else(|| Error::not_found(format!("Election {id}")))
    }

    /// Get every election, newest first.
    pub async fn list(&self) -> Result<Vec<Election>> {
        let mut elections = self.elections.list().await?;
        elections.sort_unstable_by(|a, b| b.id.cmp(&a.id));
        Ok(elections)
    }

    /// The phase of an election at time `now`.
    pub async fn current_phase(&self, id: ElectionId, now: DateTime<Utc>) -> Result<Phase> {
        Ok(self.get(id).await?.phase(now))
    }

    /// Apply for a post, returning the new candidacy's ID.
    pub async fn apply(
        &self,
        id: ElectionId,
        applicant: &str,
        post: &str,
        reason: &str,
        now: DateTime<Utc>,
    ) -> Result<CandidacyId> {
        let _guard = self.locks.acquire(id).await;
        let mut election = self.get(id).await?;
        let candidacy_id = election.apply(applicant, post, reason, now)?;
        self.elections.upsert(&election).await?;
        info!("User '{applicant}' applied for {post} in election {id} (candidacy {candidacy_id})");
        Ok(candidacy_id)
    }

    /// Vote for a candidacy, replacing the voter's previous vote.
    pub async fn cast_vote(
        &self,
        id: ElectionId,
        voter: &str,
        candidacy_id: CandidacyId,
        now: DateTime<Utc>,
    ) -> Result<()> {
        let _guard = self.locks.acquire(id).await;
        let mut election = self.get(id).await?;
        if election.cast_vote(voter, candidacy_id, now)? {
            self.elections.upsert(&election).await?;
            debug!("Recorded vote in election {id}");
        } else {
            debug!("Vote in election {id} unchanged");
        }
        Ok(())
    }

    /// Count the votes for one post.
    pub async fn tally(
        &self,
        id: ElectionId,
        post: &str,
        now: DateTime<Utc>,
    ) -> Result<TallyResponse> {
        let election = self.get(id).await?;
        let tally = election.tally(post)?;
        Ok(TallyResponse::new(tally, election.phase(now)))
    }

    /// What the given user has done in an election.
    pub async fn participation(&self, id: ElectionId, user: &str) -> Result<Participation> {
        let election = self.get(id).await?;
        Ok(Participation {
            candidacy: election.candidacy_of(user).map(|candidacy| candidacy.id),
            voted_for: election.votes_of(user),
        })
    }

    /// An anonymised dump of the election, from which anyone can recompute the tallies.
    pub async fn results(&self, id: ElectionId, now: DateTime<Utc>) -> Result<ElectionResults> {
        let election = self.get(id).await?;
        Ok(ElectionResults::new(&election, election.phase(now)))
    }
}

#[cfg(test)]
mod tests {
    use chrono::Duration;
    use rocket::futures::future::join_all;

    use super::*;
    use crate::model::{common::election::BallotScope, store::Store};

    fn registry(store: &Store) -> ElectionRegistry {
        ElectionRegistry::new(store.elections.clone())
    }

    /// Store an election in the given phase, with Treasurer candidacies 1 and 2.
    async fn treasurer_vote(store: &Store, phase: Phase) -> ElectionId {
        let now = Utc::now();
        let id = store.elections.next_id().await.unwrap();
        let mut election = Election::example(id, now);
        election.apply("alice", "Treasurer", "Numbers", now).unwrap();
        election.apply("bob", "Treasurer", "Audits", now).unwrap();
        election.set_phase(phase, now);
        store.elections.upsert(&election).await.unwrap();
        id
    }

    #[backend_test]
    async fn create_and_get(store: Store) {
        let registry = registry(&store);
        let now = Utc::now();

        let created = registry
            .create_election(ElectionSpec::example(now), "flame", now)
            .await
            .unwrap();
        assert_eq!(created.id, 1);
        assert_eq!(created.created_by, "flame");
        assert_eq!(created.ballot_scope, BallotScope::Election);

        let fetched = registry.get(created.id).await.unwrap();
        assert_eq!(fetched, created);
        assert_eq!(
            registry.current_phase(created.id, now).await.unwrap(),
            Phase::Applying
        );
    }

    #[backend_test]
    async fn create_invalid(store: Store) {
        let registry = registry(&store);
        let mut spec = ElectionSpec::example(Utc::now());
        spec.posts = vec!["Emperor".to_string()];

        let result = registry.create_election(spec, "flame", Utc::now()).await;
        assert!(matches!(result, Err(Error::Validation(_))));
        assert!(registry.list().await.unwrap().is_empty());
    }

    #[backend_test]
    async fn list_newest_first(store: Store) {
        let registry = registry(&store);
        let now = Utc::now();
        for _ in 0..3 {
            registry
                .create_election(ElectionSpec::example(now), "flame", now)
                .await
                .unwrap();
        }

        let ids: Vec<_> = registry
            .list()
            .await
            .unwrap()
            .into_iter()
            .map(|election| election.id)
            .collect();
        assert_eq!(ids, vec![3, 2, 1]);
    }

    #[backend_test]
    async fn unknown_election(store: Store) {
        let registry = registry(&store);
        let now = Utc::now();

        assert!(matches!(registry.get(9).await, Err(Error::NotFound(_))));
        assert!(matches!(
            registry.apply(9, "alice", "Treasurer", "Numbers", now).await,
            Err(Error::NotFound(_))
        ));
        assert!(matches!(
            registry.cast_vote(9, "alice", 1, now).await,
            Err(Error::NotFound(_))
        ));
        assert!(matches!(
            registry.tally(9, "Treasurer", now).await,
            Err(Error::NotFound(_))
        ));
    }

    #[backend_test]
    async fn apply_closed_at_deadline(store: Store) {
        let registry = registry(&store);
        let now = Utc::now();
        let spec = ElectionSpec::with_deadlines(&["Secretary"], now, now + Duration::hours(1));
        let election = registry.create_election(spec, "flame", now).await.unwrap();

        let result = registry
            .apply(election.id, "alice", "Secretary", "Organised", now)
            .await;
        assert!(matches!(result, Err(Error::Phase(_))));
        assert!(registry.get(election.id).await.unwrap().candidacies.is_empty());
    }

    #[backend_test]
    async fn apply_and_participation(store: Store) {
        let registry = registry(&store);
        let now = Utc::now();
        let election = registry
            .create_election(ElectionSpec::example(now), "flame", now)
            .await
            .unwrap();

        let candidacy = registry
            .apply(election.id, "alice", "Chairperson", "Vision", now)
            .await
            .unwrap();
        assert_eq!(candidacy, 1);

        let participation = registry.participation(election.id, "alice").await.unwrap();
        assert_eq!(participation.candidacy, Some(1));
        assert!(participation.voted_for.is_empty());

        let participation = registry.participation(election.id, "bob").await.unwrap();
        assert_eq!(participation, Participation::default());
    }

    #[backend_test]
    async fn tally_scenario(store: Store) {
        let registry = registry(&store);
        let id = treasurer_vote(&store, Phase::Voting).await;
        let now = Utc::now();

        registry.cast_vote(id, "voter1", 1, now).await.unwrap();
        registry.cast_vote(id, "voter2", 2, now).await.unwrap();
        registry.cast_vote(id, "voter3", 2, now).await.unwrap();

        let tally = registry.tally(id, "Treasurer", now).await.unwrap();
        assert!(tally.provisional);
        assert_eq!(tally.total_votes, 3);
        assert_eq!(tally.entries[0].vote_count, 1);
        assert!((tally.entries[0].percentage - 33.33).abs() < 1e-9);
        assert_eq!(tally.entries[1].vote_count, 2);
        assert!((tally.entries[1].percentage - 66.67).abs() < 1e-9);

        let participation = registry.participation(id, "voter2").await.unwrap();
        assert_eq!(participation.voted_for, vec![2]);
    }

    #[backend_test]
    async fn finished_tally_is_final(store: Store) {
        let registry = registry(&store);
        let id = treasurer_vote(&store, Phase::Finished).await;
        let now = Utc::now();

        let result = registry.cast_vote(id, "voter1", 1, now).await;
        assert!(matches!(result, Err(Error::Phase(_))));

        let tally = registry.tally(id, "Treasurer", now).await.unwrap();
        assert!(!tally.provisional);
        assert_eq!(tally.phase, Phase::Finished);
        assert_eq!(tally.total_votes, 0);

        let results = registry.results(id, now).await.unwrap();
        assert!(!results.is_provisional());
        assert_eq!(results.candidacies.len(), 2);
    }

    #[backend_test]
    async fn concurrent_votes_keep_one_ballot(store: Store) {
        let registry = registry(&store);
        let id = treasurer_vote(&store, Phase::Voting).await;
        let now = Utc::now();

        let votes = (0..20).map(|i| registry.cast_vote(id, "voter1", 1 + i % 2, now));
        for result in join_all(votes).await {
            result.unwrap();
        }

        let election = registry.get(id).await.unwrap();
        assert_eq!(election.ballots.len(), 1);
    }

    #[backend_test]
    async fn concurrent_applications_all_recorded(store: Store) {
        let registry = registry(&store);
        let now = Utc::now();
        let election = registry
            .create_election(ElectionSpec::example(now), "flame", now)
            .await
            .unwrap();

        let applicants: Vec<String> = (0..10).map(|i| format!("member{i}")).collect();
        let applications = applicants
            .iter()
            .map(|applicant| registry.apply(election.id, applicant, "Treasurer", "Keen", now));
        let mut ids: Vec<_> = join_all(applications)
            .await
            .into_iter()
            .map(|result| result.unwrap())
            .collect();
        ids.sort_unstable();

        assert_eq!(ids, (1..=10).collect::<Vec<_>>());
        let stored = registry.get(election.id).await.unwrap();
        assert_eq!(stored.candidacies.len(), 10);
    }
}
