use std::fmt::{Display, Formatter};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Phases in the election lifecycle. Never stored, always derived from the deadlines.
///
/// Variants are ordered, so `Applying < Voting < Finished`.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Phase {
    /// Members may apply for posts.
    Applying,
    /// Members may vote for candidacies.
    Voting,
    /// Voting has closed and the tally is final.
    Finished,
}

impl Phase {
    /// Derive the phase at time `now` from an election's deadlines.
    pub fn at(
        application_deadline: DateTime<Utc>,
        voting_deadline: DateTime<Utc>,
        now: DateTime<Utc>,
    ) -> Self {
        if now < application_deadline {
            Self::Applying
        } else if now < voting_deadline {
            Self::Voting
        } else {
            Self::Finished
        }
    }
}

impl Display for Phase {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Applying => "application",
            Self::Voting => "voting",
            Self::Finished => "finished",
        };
        write!(f, "{name}")
    }
}
