use crate::error::NotifyError;
use crate::message::NotifyMessage;
use async_trait::async_trait;

/// 发送回执
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotifyReceipt {
    /// 传输层返回的消息 ID（若有）
    pub message_id: Option<String>,
}

impl NotifyReceipt {
    pub fn new(message_id: impl Into<String>) -> Self {
        Self {
            message_id: Some(message_id.into()),
        }
    }

    pub fn anonymous() -> Self {
        Self { message_id: None }
    }
}

/// 通知器 trait
#[async_trait]
pub trait Notifier: Send + Sync {
    /// 向目标（主题 ARN、URL 等）发布一条消息，不重试
    async fn publish(
        &self,
        destination: &str,
        message: &NotifyMessage,
    ) -> Result<NotifyReceipt, NotifyError>;

    /// 通知器名称
    fn name(&self) -> &str;
}
