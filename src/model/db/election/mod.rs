mod base;
mod locks;
mod registry;

pub use base::Election;
pub use locks::ElectionLocks;
pub use registry::ElectionRegistry;
