mod capability;
mod token;

pub use capability::{Capability, ConcernManager, ElectionManager, Member};
pub use token::{AuthToken, Identity, AUTH_TOKEN_COOKIE};
