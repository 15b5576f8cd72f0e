use std::fmt::{Display, Formatter};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::Error;

/// A leadership post that can be filled by election.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Post {
    Chairperson,
    #[serde(rename = "Vice-Chair")]
    ViceChair,
    Secretary,
    #[serde(rename = "Vice-Secretary")]
    ViceSecretary,
    Treasurer,
    #[serde(rename = "Public Relations Officer")]
    PublicRelationsOfficer,
    #[serde(rename = "Welfare Officer")]
    WelfareOfficer,
    #[serde(rename = "Flame of Fairness Officer")]
    FlameOfFairnessOfficer,
    #[serde(rename = "Outreach & Partnership Officer")]
    OutreachAndPartnershipOfficer,
}

impl Post {
    /// Every post, in the order the organization lists them.
    pub const ALL: [Post; 9] = [
        Post::Chairperson,
        Post::ViceChair,
        Post::Secretary,
        Post::ViceSecretary,
        Post::Treasurer,
        Post::PublicRelationsOfficer,
        Post::WelfareOfficer,
        Post::FlameOfFairnessOfficer,
        Post::OutreachAndPartnershipOfficer,
    ];

    /// The human-readable name, which is also the wire representation.
    pub fn name(self) -> &'static str {
        match self {
            Self::Chairperson => "Chairperson",
            Self::ViceChair => "Vice-Chair",
            Self::Secretary => "Secretary",
            Self::ViceSecretary => "Vice-Secretary",
            Self::Treasurer => "Treasurer",
            Self::PublicRelationsOfficer => "Public Relations Officer",
            Self::WelfareOfficer => "Welfare Officer",
            Self::FlameOfFairnessOfficer => "Flame of Fairness Officer",
            Self::OutreachAndPartnershipOfficer => "Outreach & Partnership Officer",
        }
    }
}

impl Display for Post {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl FromStr for Post {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let name = s.trim();
        Self::ALL
            .into_iter()
            .find(|post| post.name() == name)
            .ok_or_else(|| Error::Validation(format!("Unknown post '{name}'")))
    }
}
