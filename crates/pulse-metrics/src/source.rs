use async_trait::async_trait;
use pulse_types::MetricsSnapshot;

use crate::error::CollectError;

/// 指标来源接口
#[async_trait]
pub trait MetricsSource: Send {
    /// 采集一次快照
    async fn snapshot(&mut self) -> Result<MetricsSnapshot, CollectError>;

    fn name(&self) -> &str;
}
