pub mod error;
pub mod source;
pub mod system;

pub use error::CollectError;
pub use source::MetricsSource;
pub use system::{select_disk_usage, usage_percent, CollectorOptions, SystemCollector};
