mod desc;
mod results;
mod spec;

pub use desc::{ElectionDescription, ElectionSummary};
pub use results::ElectionResults;
pub use spec::{ElectionSpec, ValidElectionSpec};
