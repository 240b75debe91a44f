use chrono::{DateTime, Utc};
use std::time::Duration;
use tracing::{debug, info, warn};

use crate::error::StateError;
use crate::rule::ThresholdRule;
use crate::state::{epoch_seconds, AlertStateStore};

/// 告警判定结果
#[derive(Debug, Clone, PartialEq)]
pub enum AlertDecision {
    /// 指标不可用或未超过阈值
    NoAlert,
    /// 超过阈值，但仍在冷却期内
    Suppressed { remaining: Duration },
    /// 应发送告警，发送成功后调用 `record_alert`
    Alert,
}

/// 纯判定逻辑：阈值严格大于，冷却期按 `elapsed >= cooldown` 放行
pub fn decide(
    value: f64,
    rule: &ThresholdRule,
    cooldown: Duration,
    last_alert_secs: f64,
    now_secs: f64,
) -> AlertDecision {
    if !rule.evaluate(value) {
        return AlertDecision::NoAlert;
    }

    let elapsed = now_secs - last_alert_secs;
    let cooldown_secs = cooldown.as_secs_f64();
    if elapsed < cooldown_secs {
        return AlertDecision::Suppressed {
            remaining: Duration::try_from_secs_f64(cooldown_secs - elapsed).unwrap_or(Duration::MAX),
        };
    }

    AlertDecision::Alert
}

/// 告警冷却追踪器
///
/// 每次运行最多读一次、写一次状态存储。读失败按“从未告警”处理（fail-open），
/// 损坏的状态文件不会让告警永久静默。
pub struct CooldownTracker<S: AlertStateStore> {
    store: S,
    rule: ThresholdRule,
    cooldown: Duration,
}

impl<S: AlertStateStore> CooldownTracker<S> {
    pub fn new(store: S, threshold: f64, cooldown: Duration) -> Self {
        Self {
            store,
            rule: ThresholdRule::cpu_above(threshold),
            cooldown,
        }
    }

    pub fn rule(&self) -> &ThresholdRule {
        &self.rule
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// 读取上次告警时间，任何失败都视为 epoch 0
    pub fn last_alert(&self) -> f64 {
        match self.store.load() {
            Ok(Some(timestamp)) => timestamp,
            Ok(None) => {
                debug!(store = %self.store.describe(), "No previous alert recorded");
                0.0
            }
            Err(e) => {
                warn!(
                    store = %self.store.describe(),
                    error = %e,
                    "Failed to read alert state, treating as no prior alert"
                );
                0.0
            }
        }
    }

    /// 判定本次是否应发送告警，不写状态
    pub fn should_alert(&self, current_cpu: Option<f64>, now: DateTime<Utc>) -> AlertDecision {
        let Some(cpu) = current_cpu else {
            debug!("CPU usage unavailable, skipping alert check");
            return AlertDecision::NoAlert;
        };

        let last_alert = self.last_alert();
        let decision = decide(cpu, &self.rule, self.cooldown, last_alert, epoch_seconds(now));

        match &decision {
            AlertDecision::NoAlert => {
                debug!(cpu, threshold = self.rule.threshold(), "CPU within threshold")
            }
            AlertDecision::Suppressed { remaining } => info!(
                cpu,
                remaining_secs = remaining.as_secs(),
                "Alert suppressed, still cooling down"
            ),
            AlertDecision::Alert => info!("{}", self.rule.message(cpu)),
        }

        decision
    }

    /// 记录告警时间，覆盖原值
    pub fn record_alert(&self, now: DateTime<Utc>) -> Result<(), StateError> {
        self.store.store(epoch_seconds(now))?;
        debug!(store = %self.store.describe(), "Alert time recorded");
        Ok(())
    }
}
