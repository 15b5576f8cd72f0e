mod ballot;
mod candidacy;
mod phase;
mod post;
mod tally;

pub use ballot::{Ballot, BallotScope};
pub use candidacy::Candidacy;
pub use phase::Phase;
pub use post::Post;
pub use tally::{PostTally, TallyEntry};

/// Our election IDs are integers.
pub type ElectionId = u32;
/// Our candidacy IDs are integers, unique within their election.
pub type CandidacyId = u32;
