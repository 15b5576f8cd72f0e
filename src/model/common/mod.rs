//! Types shared between the API and DB representations.

pub mod election;
pub mod role;

/// Users are identified by the opaque ID issued by the external identity provider.
pub type UserId = String;
