pub mod snapshot;

pub use snapshot::{round1, LoadAverage, MetricsSnapshot, NetworkCounters};
