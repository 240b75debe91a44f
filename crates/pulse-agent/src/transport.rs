use pulse_config::{AgentConfig, TransportKind};
use pulse_notify::{
    Notifier, NotifyChannel, NotifyManager, SnsConfig, SnsNotifier, StdoutNotifier, WebhookNotifier,
};
use tracing::info;

/// 按配置构建通知管理器并注册两个渠道
pub async fn build_notify_manager(config: &AgentConfig) -> NotifyManager {
    let notifier: Box<dyn Notifier> = match config.transport {
        TransportKind::Sns => {
            let sns = SnsConfig {
                region: config.region.clone(),
                endpoint_url: config.endpoint_url.clone(),
            };
            Box::new(SnsNotifier::from_config(&sns).await)
        }
        TransportKind::Webhook => Box::new(WebhookNotifier::new()),
        TransportKind::Stdout => Box::new(StdoutNotifier),
    };

    info!("Using notifier: {}", notifier.name());

    NotifyManager::new(notifier)
        .with_destination(NotifyChannel::Summary, config.summary_channel.clone())
        .with_destination(NotifyChannel::Alert, config.alert_channel.clone())
}
