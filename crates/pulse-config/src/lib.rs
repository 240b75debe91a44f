pub mod agent;
pub mod error;
pub mod loader;

pub use agent::{AgentConfig, TransportKind};
pub use error::ConfigError;
pub use loader::{ConfigLoader, ENV_PREFIX};
