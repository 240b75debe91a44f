use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// 通知级别
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NotifyLevel {
    /// 信息
    Info,
    /// 警告
    Warning,
    /// 严重
    Critical,
}

/// 逻辑通知渠道
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NotifyChannel {
    /// 每次运行都会发送的汇总
    Summary,
    /// 超阈值告警
    Alert,
}

impl fmt::Display for NotifyChannel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NotifyChannel::Summary => write!(f, "summary"),
            NotifyChannel::Alert => write!(f, "alert"),
        }
    }
}

/// 通知消息
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotifyMessage {
    /// 标题
    pub subject: String,

    /// 内容
    pub body: String,

    /// 级别
    pub level: NotifyLevel,

    /// 时间
    pub timestamp: DateTime<Utc>,
}

impl NotifyMessage {
    pub fn new(subject: impl Into<String>, body: impl Into<String>, level: NotifyLevel) -> Self {
        Self {
            subject: subject.into(),
            body: body.into(),
            level,
            timestamp: Utc::now(),
        }
    }

    pub fn at(mut self, timestamp: DateTime<Utc>) -> Self {
        self.timestamp = timestamp;
        self
    }

    /// 创建信息级别消息
    pub fn info(subject: impl Into<String>, body: impl Into<String>) -> Self {
        Self::new(subject, body, NotifyLevel::Info)
    }

    /// 创建严重级别消息
    pub fn critical(subject: impl Into<String>, body: impl Into<String>) -> Self {
        Self::new(subject, body, NotifyLevel::Critical)
    }
}
