use thiserror::Error;

/// 指标采集错误
///
/// 只有主机身份无法确定时才是硬错误，其余采样问题以 `None` 字段降级。
#[derive(Error, Debug)]
pub enum CollectError {
    #[error("Failed to resolve hostname: {0}")]
    Hostname(#[from] std::io::Error),
}
