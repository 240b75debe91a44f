use crate::error::NotifyError;
use crate::message::{NotifyChannel, NotifyMessage};
use crate::notifier::{Notifier, NotifyReceipt};
use std::collections::HashMap;
use tracing::{error, info};

/// 标题最大长度（字符）
pub const MAX_SUBJECT_LEN: usize = 100;

/// 通知管理器
///
/// 将逻辑渠道映射到传输层目标，发送前截断标题。
pub struct NotifyManager {
    notifier: Box<dyn Notifier>,
    destinations: HashMap<NotifyChannel, String>,
}

impl NotifyManager {
    pub fn new(notifier: Box<dyn Notifier>) -> Self {
        Self {
            notifier,
            destinations: HashMap::new(),
        }
    }

    /// 注册渠道目标
    pub fn with_destination(mut self, channel: NotifyChannel, destination: impl Into<String>) -> Self {
        self.destinations.insert(channel, destination.into());
        self
    }

    pub fn destination(&self, channel: NotifyChannel) -> Option<&str> {
        self.destinations.get(&channel).map(String::as_str)
    }

    /// 发送通知到指定渠道
    ///
    /// 只发送一次。失败会被记录并返回给调用方，由调用方决定是否继续。
    pub async fn send(
        &self,
        channel: NotifyChannel,
        message: &NotifyMessage,
    ) -> Result<NotifyReceipt, NotifyError> {
        let destination = self
            .destination(channel)
            .ok_or(NotifyError::UnknownChannel(channel))?;

        let mut outgoing = message.clone();
        outgoing.subject = truncate_subject(&message.subject);

        match self.notifier.publish(destination, &outgoing).await {
            Ok(receipt) => {
                info!(
                    %channel,
                    destination,
                    notifier = self.notifier.name(),
                    message_id = receipt.message_id.as_deref().unwrap_or("-"),
                    "Notification sent: {}",
                    outgoing.subject
                );
                Ok(receipt)
            }
            Err(e) => {
                error!(
                    %channel,
                    destination,
                    notifier = self.notifier.name(),
                    error = %e,
                    "Notification failed"
                );
                Err(e)
            }
        }
    }
}

/// 截断到 `MAX_SUBJECT_LEN` 个字符，控制字符替换为空格
pub fn truncate_subject(subject: &str) -> String {
    subject
        .chars()
        .map(|c| if c.is_control() { ' ' } else { c })
        .take(MAX_SUBJECT_LEN)
        .collect()
}
