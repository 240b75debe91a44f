pub mod error;
pub mod manager;
pub mod message;
pub mod notifier;
pub mod providers;

pub use error::NotifyError;
pub use manager::{truncate_subject, NotifyManager, MAX_SUBJECT_LEN};
pub use message::{NotifyChannel, NotifyLevel, NotifyMessage};
pub use notifier::{Notifier, NotifyReceipt};
pub use providers::{SnsConfig, SnsNotifier, StdoutNotifier, WebhookNotifier, WebhookPayload};
