use async_trait::async_trait;
use chrono::{DateTime, Duration, TimeZone, Utc};
use pulse_agent::transport::build_notify_manager;
use pulse_agent::{build_state_store, HealthAgent, PublishOutcome};
use pulse_alert::{epoch_seconds, AlertDecision, AlertStateStore, FileStateStore};
use pulse_config::{AgentConfig, ConfigLoader, TransportKind};
use pulse_metrics::{CollectError, MetricsSource};
use pulse_notify::{Notifier, NotifyChannel, NotifyError, NotifyManager, NotifyMessage, NotifyReceipt};
use pulse_types::MetricsSnapshot;
use std::sync::{Arc, Mutex};
use tempfile::TempDir;

const SUMMARY_ARN: &str = "arn:aws:sns:eu-north-1:123456789012:health-summary";
const ALERT_ARN: &str = "arn:aws:sns:eu-north-1:123456789012:health-alert";

struct FixedSource {
    snapshot: Option<MetricsSnapshot>,
}

#[async_trait]
impl MetricsSource for FixedSource {
    async fn snapshot(&mut self) -> Result<MetricsSnapshot, CollectError> {
        self.snapshot.clone().ok_or_else(|| {
            CollectError::Hostname(std::io::Error::new(
                std::io::ErrorKind::Other,
                "gethostname failed",
            ))
        })
    }

    fn name(&self) -> &str {
        "fixed"
    }
}

#[derive(Clone, Default)]
struct RecordingNotifier {
    sent: Arc<Mutex<Vec<(String, NotifyMessage)>>>,
    failing: Arc<Mutex<Vec<String>>>,
}

impl RecordingNotifier {
    fn fail_on(&self, destination: &str) {
        self.failing.lock().unwrap().push(destination.to_string());
    }

    fn sent(&self) -> Vec<(String, NotifyMessage)> {
        self.sent.lock().unwrap().clone()
    }
}

#[async_trait]
impl Notifier for RecordingNotifier {
    async fn publish(
        &self,
        destination: &str,
        message: &NotifyMessage,
    ) -> Result<NotifyReceipt, NotifyError> {
        if self.failing.lock().unwrap().iter().any(|d| d == destination) {
            return Err(NotifyError::Transport("throttled by remote".to_string()));
        }

        let mut sent = self.sent.lock().unwrap();
        sent.push((destination.to_string(), message.clone()));
        Ok(NotifyReceipt::new(format!("msg-{}", sent.len())))
    }

    fn name(&self) -> &str {
        "recording"
    }
}

struct Harness {
    _dir: TempDir,
    config: AgentConfig,
    notifier: RecordingNotifier,
    store: FileStateStore,
}

impl Harness {
    fn new() -> Self {
        let dir = tempfile::tempdir().unwrap();
        let state_file = dir.path().join("last_alert");

        let config = ConfigLoader::new()
            .with_env(vec![
                ("HOSTPULSE_SUMMARY_CHANNEL", SUMMARY_ARN.to_string()),
                ("HOSTPULSE_ALERT_CHANNEL", ALERT_ARN.to_string()),
                ("HOSTPULSE_CPU_ALERT_THRESHOLD", "50.0".to_string()),
                ("HOSTPULSE_ALERT_COOLDOWN_SECONDS", "600".to_string()),
                ("HOSTPULSE_STATE_FILE", state_file.display().to_string()),
                ("HOSTPULSE_COLOR", "false".to_string()),
            ])
            .load()
            .unwrap();

        Self {
            _dir: dir,
            store: FileStateStore::new(&config.state_file),
            config,
            notifier: RecordingNotifier::default(),
        }
    }

    fn agent(&self) -> HealthAgent<FileStateStore> {
        let manager = NotifyManager::new(Box::new(self.notifier.clone()))
            .with_destination(NotifyChannel::Summary, self.config.summary_channel.clone())
            .with_destination(NotifyChannel::Alert, self.config.alert_channel.clone());
        HealthAgent::new(&self.config, manager, FileStateStore::new(&self.config.state_file))
    }

    fn stored(&self) -> Option<f64> {
        self.store.load().unwrap()
    }
}

fn run_time() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 10, 18, 12, 0, 0).unwrap()
}

fn source(cpu: Option<f64>) -> FixedSource {
    let mut snapshot = MetricsSnapshot::empty("web-1", run_time())
        .with_memory(41.0)
        .with_disk(63.2);
    snapshot.cpu_percent = cpu;
    FixedSource {
        snapshot: Some(snapshot),
    }
}

#[tokio::test]
async fn test_high_cpu_without_prior_state_alerts_and_records() {
    let harness = Harness::new();

    let report = harness.agent().run_once(&mut source(Some(75.3))).await.unwrap();

    assert_eq!(report.decision, AlertDecision::Alert);
    assert!(report.summary.is_sent());
    assert_eq!(
        report.alert,
        Some(PublishOutcome::Sent {
            message_id: Some("msg-2".to_string())
        })
    );
    assert!(report.recorded);

    let sent = harness.notifier.sent();
    assert_eq!(sent.len(), 2);
    assert_eq!(sent[0].0, SUMMARY_ARN);
    assert_eq!(sent[0].1.subject, "[Summary] CPU: 75.3%");
    assert_eq!(sent[1].0, ALERT_ARN);
    assert_eq!(sent[1].1.subject, "[ALERT] HIGH CPU 75.3%");
    assert!(sent[1].1.body.contains("(Threshold: 50%)"));

    let stored = harness.stored().unwrap();
    assert!((stored - epoch_seconds(run_time())).abs() < 1e-6);
}

#[tokio::test]
async fn test_recent_alert_suppresses_second_alert() {
    let harness = Harness::new();
    let previous = epoch_seconds(run_time() - Duration::seconds(120));
    harness.store.store(previous).unwrap();

    let report = harness.agent().run_once(&mut source(Some(90.0))).await.unwrap();

    assert!(matches!(report.decision, AlertDecision::Suppressed { .. }));
    assert!(report.alert.is_none());
    assert!(!report.recorded);
    assert_eq!(harness.notifier.sent().len(), 1);
    assert_eq!(harness.stored(), Some(previous));
}

#[tokio::test]
async fn test_low_cpu_only_publishes_summary() {
    let harness = Harness::new();

    let report = harness.agent().run_once(&mut source(Some(42.0))).await.unwrap();

    assert_eq!(report.decision, AlertDecision::NoAlert);
    assert!(report.alert.is_none());
    let sent = harness.notifier.sent();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].0, SUMMARY_ARN);
    assert_eq!(harness.stored(), None);
}

#[tokio::test]
async fn test_threshold_equality_does_not_alert() {
    let harness = Harness::new();

    let report = harness.agent().run_once(&mut source(Some(50.0))).await.unwrap();

    assert_eq!(report.decision, AlertDecision::NoAlert);
    assert_eq!(harness.notifier.sent().len(), 1);
}

#[tokio::test]
async fn test_failed_alert_publish_is_not_recorded() {
    let harness = Harness::new();
    harness.notifier.fail_on(ALERT_ARN);

    let report = harness.agent().run_once(&mut source(Some(95.0))).await.unwrap();

    assert_eq!(report.decision, AlertDecision::Alert);
    assert!(matches!(report.alert, Some(PublishOutcome::Failed { .. })));
    assert!(!report.recorded);
    assert_eq!(harness.stored(), None);

    // 下次运行仍会告警
    let agent = harness.agent();
    harness.notifier.failing.lock().unwrap().clear();
    let report = agent.run_once(&mut source(Some(95.0))).await.unwrap();
    assert!(report.recorded);
}

#[tokio::test]
async fn test_failed_summary_does_not_block_alert() {
    let harness = Harness::new();
    harness.notifier.fail_on(SUMMARY_ARN);

    let report = harness.agent().run_once(&mut source(Some(88.8))).await.unwrap();

    assert!(matches!(report.summary, PublishOutcome::Failed { .. }));
    assert!(report.alert.as_ref().is_some_and(PublishOutcome::is_sent));
    assert!(report.recorded);
}

#[tokio::test]
async fn test_unknown_cpu_skips_alert_check() {
    let harness = Harness::new();

    let report = harness.agent().run_once(&mut source(None)).await.unwrap();

    assert_eq!(report.decision, AlertDecision::NoAlert);
    let sent = harness.notifier.sent();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].1.subject, "[Summary] CPU: n/a");
}

#[tokio::test]
async fn test_corrupt_state_fails_open() {
    let harness = Harness::new();
    std::fs::write(&harness.config.state_file, "last alert: yesterday").unwrap();

    let report = harness.agent().run_once(&mut source(Some(75.3))).await.unwrap();

    assert_eq!(report.decision, AlertDecision::Alert);
    assert!(report.recorded);
    assert!((harness.stored().unwrap() - epoch_seconds(run_time())).abs() < 1e-6);
}

#[tokio::test]
async fn test_collect_error_publishes_nothing() {
    let harness = Harness::new();

    let result = harness
        .agent()
        .run_once(&mut FixedSource { snapshot: None })
        .await;

    assert!(result.is_err());
    assert!(harness.notifier.sent().is_empty());
}

async fn dry_run_agent(harness: &Harness) -> HealthAgent<Box<dyn AlertStateStore>> {
    let mut config = harness.config.clone();
    config.transport = TransportKind::Stdout;
    let manager = build_notify_manager(&config).await;
    HealthAgent::new(&config, manager, build_state_store(&config, true))
}

#[tokio::test]
async fn test_dry_run_does_not_write_state_file() {
    let harness = Harness::new();
    let agent = dry_run_agent(&harness).await;

    let report = agent.run_once(&mut source(Some(95.0))).await.unwrap();

    assert_eq!(report.decision, AlertDecision::Alert);
    assert!(report.alert.as_ref().is_some_and(PublishOutcome::is_sent));
    assert!(!harness.config.state_file.exists());

    // 同一进程内的第二次判定仍按内存中的记录冷却
    let report = agent.run_once(&mut source(Some(95.0))).await.unwrap();
    assert!(matches!(report.decision, AlertDecision::Suppressed { .. }));
    assert!(!harness.config.state_file.exists());
}

#[tokio::test]
async fn test_dry_run_respects_existing_cooldown_and_leaves_it_unchanged() {
    let harness = Harness::new();
    let previous = epoch_seconds(run_time() - Duration::seconds(900));
    harness.store.store(previous).unwrap();

    let report = dry_run_agent(&harness)
        .await
        .run_once(&mut source(Some(95.0)))
        .await
        .unwrap();

    assert_eq!(report.decision, AlertDecision::Alert);
    assert_eq!(harness.stored(), Some(previous));
}
