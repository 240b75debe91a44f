use thiserror::Error;

use crate::message::NotifyChannel;

/// 通知发送错误
#[derive(Error, Debug)]
pub enum NotifyError {
    #[error("No destination configured for channel {0}")]
    UnknownChannel(NotifyChannel),

    #[error("Transport error: {0}")]
    Transport(String),

    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Destination rejected message with status {0}")]
    Rejected(u16),
}
