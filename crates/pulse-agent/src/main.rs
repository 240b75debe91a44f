use anyhow::{Context, Result};
use clap::Parser;
use pulse_agent::logging::{init_logging, LogFormat};
use pulse_agent::transport::build_notify_manager;
use pulse_agent::{build_state_store, HealthAgent, PublishOutcome};
use pulse_config::{ConfigLoader, TransportKind};
use pulse_metrics::{CollectorOptions, SystemCollector};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::{error, info};

#[derive(Parser, Debug)]
#[command(author, version, about = "Publish a host health summary and rate-limited CPU alerts")]
struct Args {
    /// TOML config file; HOSTPULSE_* environment variables take precedence
    #[arg(short, long)]
    config: Option<PathBuf>,

    #[arg(long, value_enum, default_value_t = LogFormat::Pretty)]
    log_format: LogFormat,

    /// Print notifications to stdout instead of publishing them; the state file is left untouched
    #[arg(long)]
    dry_run: bool,

    /// Print the effective configuration and exit
    #[arg(long)]
    print_config: bool,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let args = Args::parse();
    init_logging(args.log_format);

    match run(args).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{:#}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run(args: Args) -> Result<()> {
    let mut loader = ConfigLoader::new();
    if let Some(path) = &args.config {
        loader = loader.with_file(path);
    }
    let mut config = loader.load().context("Invalid configuration")?;

    if args.dry_run {
        config.transport = TransportKind::Stdout;
    }

    if args.print_config {
        print!("{}", config.to_toml()?);
        return Ok(());
    }

    let notify = build_notify_manager(&config).await;
    let agent = HealthAgent::new(&config, notify, build_state_store(&config, args.dry_run));

    let mut collector = SystemCollector::new(CollectorOptions {
        sample_interval: config.sample_interval(),
        disk_path: config.disk_path.clone(),
    });

    let report = agent
        .run_once(&mut collector)
        .await
        .context("Failed to collect host metrics")?;

    info!(
        host = %report.snapshot.hostname,
        summary_sent = report.summary.is_sent(),
        decision = ?report.decision,
        alert_sent = report.alert.as_ref().map(PublishOutcome::is_sent),
        alert_recorded = report.recorded,
        "Run complete"
    );

    Ok(())
}
