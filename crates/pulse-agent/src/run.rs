use pulse_alert::{AlertDecision, AlertStateStore, CooldownTracker, FileStateStore, MemoryStateStore};
use pulse_config::AgentConfig;
use pulse_metrics::{CollectError, MetricsSource};
use pulse_notify::{NotifyChannel, NotifyManager, NotifyMessage};
use pulse_types::MetricsSnapshot;
use tracing::{info, warn};

use crate::report::{alert_subject, format_alert, format_summary, summary_subject, ReportStyle};

/// 单次发布结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PublishOutcome {
    Sent { message_id: Option<String> },
    Failed { error: String },
}

impl PublishOutcome {
    pub fn is_sent(&self) -> bool {
        matches!(self, PublishOutcome::Sent { .. })
    }
}

/// 一次运行的结果
#[derive(Debug, Clone)]
pub struct RunReport {
    pub snapshot: MetricsSnapshot,
    pub summary: PublishOutcome,
    pub decision: AlertDecision,
    /// 仅在判定为告警时存在
    pub alert: Option<PublishOutcome>,
    /// 告警时间是否已写入状态存储
    pub recorded: bool,
}

/// 构建告警状态存储
///
/// 演练时读取一次真实状态作为初值，之后的写入只留在内存里，不影响正式运行的冷却期。
pub fn build_state_store(config: &AgentConfig, dry_run: bool) -> Box<dyn AlertStateStore> {
    let file = FileStateStore::new(&config.state_file);
    if !dry_run {
        return Box::new(file);
    }

    let initial = match file.load() {
        Ok(value) => value,
        Err(e) => {
            warn!(error = %e, "Failed to read alert state, treating as no prior alert");
            None
        }
    };
    info!(state_file = %config.state_file.display(), "Dry run, alert state will not be persisted");
    Box::new(MemoryStateStore::new(initial))
}

/// 主机健康上报
///
/// 采集 → 汇总发布 → 阈值判定 → 冷却门控的告警发布。发布失败只记录日志，不中断运行。
pub struct HealthAgent<S: AlertStateStore> {
    notify: NotifyManager,
    tracker: CooldownTracker<S>,
    style: ReportStyle,
}

impl<S: AlertStateStore> HealthAgent<S> {
    pub fn new(config: &AgentConfig, notify: NotifyManager, store: S) -> Self {
        Self {
            notify,
            tracker: CooldownTracker::new(store, config.cpu_alert_threshold, config.alert_cooldown()),
            style: ReportStyle {
                color: config.color,
            },
        }
    }

    async fn publish(&self, channel: NotifyChannel, message: NotifyMessage) -> PublishOutcome {
        match self.notify.send(channel, &message).await {
            Ok(receipt) => PublishOutcome::Sent {
                message_id: receipt.message_id,
            },
            Err(e) => PublishOutcome::Failed {
                error: e.to_string(),
            },
        }
    }

    pub async fn run_once(&self, source: &mut dyn MetricsSource) -> Result<RunReport, CollectError> {
        let snapshot = source.snapshot().await?;
        info!(
            host = %snapshot.hostname,
            source = source.name(),
            cpu = ?snapshot.cpu_percent,
            "Metrics collected"
        );

        let summary = NotifyMessage::info(
            summary_subject(&snapshot),
            format_summary(&snapshot, &self.style),
        )
        .at(snapshot.timestamp);
        let summary = self.publish(NotifyChannel::Summary, summary).await;

        let decision = self.tracker.should_alert(snapshot.cpu_percent, snapshot.timestamp);

        let mut alert = None;
        let mut recorded = false;

        if let (AlertDecision::Alert, Some(cpu)) = (&decision, snapshot.cpu_percent) {
            let message = NotifyMessage::critical(
                alert_subject(cpu),
                format_alert(&snapshot, self.tracker.rule().threshold(), &self.style),
            )
            .at(snapshot.timestamp);

            let outcome = self.publish(NotifyChannel::Alert, message).await;

            // 发送失败不记录，下次运行按原时间重新判定
            if outcome.is_sent() {
                match self.tracker.record_alert(snapshot.timestamp) {
                    Ok(()) => recorded = true,
                    Err(e) => warn!(
                        error = %e,
                        "Failed to record alert time, cooldown will not apply to the next run"
                    ),
                }
            }

            alert = Some(outcome);
        }

        Ok(RunReport {
            snapshot,
            summary,
            decision,
            alert,
            recorded,
        })
    }
}
