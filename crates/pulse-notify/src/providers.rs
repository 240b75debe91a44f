use crate::error::NotifyError;
use crate::message::{NotifyLevel, NotifyMessage};
use crate::notifier::{Notifier, NotifyReceipt};
use async_trait::async_trait;
use aws_sdk_sns::config::Region;
use aws_sdk_sns::error::DisplayErrorContext;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

// ============================================================================
// Amazon SNS
// ============================================================================

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SnsConfig {
    /// 为空时走 AWS 默认区域链
    pub region: Option<String>,
    /// 自定义端点（如 LocalStack）
    pub endpoint_url: Option<String>,
}

pub struct SnsNotifier {
    client: aws_sdk_sns::Client,
}

impl SnsNotifier {
    /// 凭证来自 AWS 标准凭证链（环境变量、配置文件、实例角色）
    pub async fn from_config(config: &SnsConfig) -> Self {
        let mut loader = aws_config::defaults(aws_config::BehaviorVersion::latest());

        if let Some(region) = &config.region {
            loader = loader.region(Region::new(region.clone()));
        }
        if let Some(endpoint_url) = &config.endpoint_url {
            loader = loader.endpoint_url(endpoint_url);
        }

        let sdk_config = loader.load().await;
        debug!(region = ?sdk_config.region(), "SNS client initialized");

        Self {
            client: aws_sdk_sns::Client::new(&sdk_config),
        }
    }
}

#[async_trait]
impl Notifier for SnsNotifier {
    async fn publish(
        &self,
        destination: &str,
        message: &NotifyMessage,
    ) -> Result<NotifyReceipt, NotifyError> {
        let output = self
            .client
            .publish()
            .topic_arn(destination)
            .subject(&message.subject)
            .message(&message.body)
            .send()
            .await
            .map_err(|e| NotifyError::Transport(DisplayErrorContext(&e).to_string()))?;

        Ok(NotifyReceipt {
            message_id: output.message_id().map(str::to_string),
        })
    }

    fn name(&self) -> &str {
        "sns"
    }
}

// ============================================================================
// Webhook 通知
// ============================================================================

/// Webhook 请求体
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WebhookPayload {
    pub subject: String,
    pub message: String,
    pub level: NotifyLevel,
    pub timestamp: DateTime<Utc>,
}

impl From<&NotifyMessage> for WebhookPayload {
    fn from(message: &NotifyMessage) -> Self {
        Self {
            subject: message.subject.clone(),
            message: message.body.clone(),
            level: message.level,
            timestamp: message.timestamp,
        }
    }
}

/// 目标为 URL，以 JSON POST 发送
pub struct WebhookNotifier {
    client: reqwest::Client,
}

impl WebhookNotifier {
    pub fn new() -> Self {
        Self {
            client: reqwest::Client::new(),
        }
    }
}

impl Default for WebhookNotifier {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Notifier for WebhookNotifier {
    async fn publish(
        &self,
        destination: &str,
        message: &NotifyMessage,
    ) -> Result<NotifyReceipt, NotifyError> {
        let response = self
            .client
            .post(destination)
            .json(&WebhookPayload::from(message))
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(NotifyError::Rejected(response.status().as_u16()));
        }

        Ok(NotifyReceipt::anonymous())
    }

    fn name(&self) -> &str {
        "webhook"
    }
}

// ============================================================================
// 标准输出（演练）
// ============================================================================

pub struct StdoutNotifier;

#[async_trait]
impl Notifier for StdoutNotifier {
    async fn publish(
        &self,
        destination: &str,
        message: &NotifyMessage,
    ) -> Result<NotifyReceipt, NotifyError> {
        println!("==> [{}] {}", destination, message.subject);
        println!("{}", message.body);
        Ok(NotifyReceipt::anonymous())
    }

    fn name(&self) -> &str {
        "stdout"
    }
}
