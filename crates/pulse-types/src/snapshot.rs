use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// 系统负载（1/5/15 分钟）
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LoadAverage {
    pub one: f64,
    pub five: f64,
    pub fifteen: f64,
}

/// 网络累计流量
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct NetworkCounters {
    pub bytes_received: u64,
    pub bytes_transmitted: u64,
}

/// 主机指标快照
///
/// 每次运行采集一次，格式化并发布后即丢弃。采集失败的可选字段为 `None`，
/// 序列化为 JSON `null`。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricsSnapshot {
    /// 采集时间（UTC）
    #[serde(rename = "time")]
    pub timestamp: DateTime<Utc>,

    pub hostname: String,

    /// 全局 CPU 使用率（%）
    #[serde(rename = "cpu")]
    pub cpu_percent: Option<f64>,

    pub cpu_per_core: Option<Vec<f64>>,

    #[serde(rename = "memory")]
    pub memory_percent: Option<f64>,

    #[serde(rename = "swap")]
    pub swap_percent: Option<f64>,

    #[serde(rename = "disk")]
    pub disk_percent: Option<f64>,

    pub load_average: Option<LoadAverage>,

    pub network: Option<NetworkCounters>,
}

impl MetricsSnapshot {
    /// 仅包含主机名和时间的空快照
    pub fn empty(hostname: impl Into<String>, timestamp: DateTime<Utc>) -> Self {
        Self {
            timestamp,
            hostname: hostname.into(),
            cpu_percent: None,
            cpu_per_core: None,
            memory_percent: None,
            swap_percent: None,
            disk_percent: None,
            load_average: None,
            network: None,
        }
    }

    pub fn with_cpu(mut self, percent: f64) -> Self {
        self.cpu_percent = Some(percent);
        self
    }

    pub fn with_memory(mut self, percent: f64) -> Self {
        self.memory_percent = Some(percent);
        self
    }

    pub fn with_disk(mut self, percent: f64) -> Self {
        self.disk_percent = Some(percent);
        self
    }

    pub fn to_json_pretty(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

/// 保留一位小数
pub fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}
