use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

use crate::error::ConfigError;

/// 通知传输方式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransportKind {
    Sns,
    Webhook,
    Stdout,
}

/// 未校验的配置层合并结果
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub(crate) struct RawConfig {
    pub summary_channel: Option<String>,
    pub alert_channel: Option<String>,
    pub cpu_alert_threshold: f64,
    pub alert_cooldown_seconds: u64,
    pub state_file: PathBuf,
    pub region: Option<String>,
    pub endpoint_url: Option<String>,
    pub transport: TransportKind,
    pub sample_interval_ms: u64,
    pub disk_path: PathBuf,
    pub color: bool,
}

impl Default for RawConfig {
    fn default() -> Self {
        Self {
            summary_channel: None,
            alert_channel: None,
            cpu_alert_threshold: 50.0,
            alert_cooldown_seconds: 600,
            state_file: PathBuf::from("/tmp/hostpulse_last_alert"),
            region: None,
            endpoint_url: None,
            transport: TransportKind::Sns,
            sample_interval_ms: 1000,
            disk_path: PathBuf::from("/"),
            color: true,
        }
    }
}

/// 运行配置
///
/// 进程启动时构建一次，以引用传给编排器和冷却追踪器。
#[derive(Debug, Clone, Serialize)]
pub struct AgentConfig {
    pub summary_channel: String,
    pub alert_channel: String,
    pub cpu_alert_threshold: f64,
    pub alert_cooldown_seconds: u64,
    pub state_file: PathBuf,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub region: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub endpoint_url: Option<String>,
    pub transport: TransportKind,
    pub sample_interval_ms: u64,
    pub disk_path: PathBuf,
    pub color: bool,
}

impl AgentConfig {
    pub fn alert_cooldown(&self) -> Duration {
        Duration::from_secs(self.alert_cooldown_seconds)
    }

    pub fn sample_interval(&self) -> Duration {
        Duration::from_millis(self.sample_interval_ms)
    }

    pub fn to_toml(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }
}

fn required(value: Option<String>, key: &'static str) -> Result<String, ConfigError> {
    match value {
        Some(v) if !v.trim().is_empty() => Ok(v.trim().to_string()),
        _ => Err(ConfigError::Missing(key)),
    }
}

fn optional(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

impl TryFrom<RawConfig> for AgentConfig {
    type Error = ConfigError;

    fn try_from(raw: RawConfig) -> Result<Self, Self::Error> {
        let summary_channel = required(raw.summary_channel, "summary_channel")?;
        let alert_channel = required(raw.alert_channel, "alert_channel")?;

        if !raw.cpu_alert_threshold.is_finite() || raw.cpu_alert_threshold < 0.0 {
            return Err(ConfigError::invalid(
                "cpu_alert_threshold",
                format!("must be a non-negative percentage, got {}", raw.cpu_alert_threshold),
            ));
        }

        if raw.sample_interval_ms == 0 {
            return Err(ConfigError::invalid("sample_interval_ms", "must be greater than 0"));
        }

        Ok(Self {
            summary_channel,
            alert_channel,
            cpu_alert_threshold: raw.cpu_alert_threshold,
            alert_cooldown_seconds: raw.alert_cooldown_seconds,
            state_file: raw.state_file,
            region: optional(raw.region),
            endpoint_url: optional(raw.endpoint_url),
            transport: raw.transport,
            sample_interval_ms: raw.sample_interval_ms,
            disk_path: raw.disk_path,
            color: raw.color,
        })
    }
}
