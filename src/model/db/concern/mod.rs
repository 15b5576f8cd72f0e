mod base;
mod registry;

pub use base::{Concern, ConcernId, ConcernStatus};
pub use registry::ConcernRegistry;
