use std::fmt::{Display, Formatter};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::Error;
use crate::model::common::election::Post;

/// The role a user holds in the organization, as reported by the identity provider.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Role {
    /// Maintainer of the platform itself.
    Developer,
    /// Ordinary member without a leadership post.
    Member,
    /// Holder of a leadership post.
    Officer(Post),
}

/// May this role create elections?
pub fn can_manage_elections(role: Role) -> bool {
    role == Role::Officer(Post::FlameOfFairnessOfficer)
}

/// May this role see every concern and move concerns through their lifecycle?
pub fn can_manage_concerns(role: Role) -> bool {
    matches!(role, Role::Developer | Role::Officer(_))
}

impl Display for Role {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Developer => write!(f, "Developer"),
            Self::Member => write!(f, "Member"),
            Self::Officer(post) => write!(f, "{post}"),
        }
    }
}

impl FromStr for Role {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "Developer" => Ok(Self::Developer),
            "Member" => Ok(Self::Member),
            other => other
                .parse::<Post>()
                .map(Self::Officer)
                .map_err(|_| Error::Validation(format!("Unknown role '{other}'"))),
        }
    }
}

impl TryFrom<String> for Role {
    type Error = Error;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Role> for String {
    fn from(role: Role) -> Self {
        role.to_string()
    }
}
