pub mod logging;
pub mod report;
pub mod run;
pub mod transport;

pub use run::{build_state_store, HealthAgent, PublishOutcome, RunReport};
