pub mod cooldown;
pub mod error;
pub mod rule;
pub mod state;

pub use cooldown::{decide, AlertDecision, CooldownTracker};
pub use error::StateError;
pub use rule::ThresholdRule;
pub use state::{epoch_seconds, AlertStateStore, FileStateStore, MemoryStateStore};
