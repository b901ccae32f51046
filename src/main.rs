use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use breaking_changes::config::{MonitorConfig, data_dir, db_path};
use breaking_changes::logging::init_logging;
use breaking_changes::monitor::scheduler::{Monitor, MonitorSettings, until_signal};
use breaking_changes::monitor::status::StatusSnapshot;
use breaking_changes::store::ResultStore;
use breaking_changes::version::registries::{
    ChangesApiRegistry, PypiReleaseRegistry, build_client,
};
use clap::{Parser, Subcommand};
use tracing::{error, info};

#[derive(Parser)]
#[command(name = "breaking-changes")]
#[command(version, about = "Watches upcoming releases for breaking changes to active integrations")]
struct Cli {
    /// JSON configuration file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Running platform version, overrides the config file
    #[arg(long, global = true)]
    current_version: Option<String>,

    /// Active component (repeatable), overrides the config file
    #[arg(long = "component", global = true)]
    components: Vec<String>,

    /// Emit logs as JSON lines
    #[arg(long, global = true)]
    log_json: bool,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Refresh now, then on every scan interval until interrupted
    Run,
    /// Run a single cycle and print the status
    Check,
    /// Print the status of the last stored result
    Status,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let data_dir = data_dir();
    let log_dir = std::fs::create_dir_all(&data_dir)
        .inspect_err(|e| eprintln!("Failed to create data directory {:?}: {}", data_dir, e))
        .ok()
        .map(|_| data_dir.as_path());
    let _guard = init_logging(log_dir, cli.log_json);

    let config = load_config(&cli)?;
    let command = cli.command.unwrap_or(Command::Run);

    tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?
        .block_on(async move {
            match command {
                Command::Run => run(&config).await,
                Command::Check => check(&config).await,
                Command::Status => status(),
            }
        })
}

fn load_config(cli: &Cli) -> anyhow::Result<MonitorConfig> {
    let mut config = match &cli.config {
        Some(path) => MonitorConfig::load(path)?,
        None => MonitorConfig::default(),
    };

    if let Some(version) = &cli.current_version {
        config.current_version = Some(version.clone());
    }
    if !cli.components.is_empty() {
        config.components = cli.components.clone();
    }

    Ok(config)
}

fn build_monitor(config: &MonitorConfig) -> anyhow::Result<Monitor> {
    let settings = MonitorSettings::try_from(config)?;
    let client = build_client(config.fetch_timeout()).context("Failed to create HTTP client")?;

    let releases = Arc::new(PypiReleaseRegistry::new(
        client.clone(),
        &config.endpoints.release_url,
    ));
    let changes = Arc::new(ChangesApiRegistry::new(
        client,
        &config.endpoints.changes_url,
    ));

    let monitor = Monitor::new(settings, releases, changes);

    Ok(match open_store() {
        Some(store) => monitor.with_store(store),
        None => monitor,
    })
}

fn open_store() -> Option<Arc<ResultStore>> {
    let db_path = db_path();
    match ResultStore::open(&db_path) {
        Ok(store) => Some(Arc::new(store)),
        Err(e) => {
            error!("Failed to open result store: {}", e);
            None
        }
    }
}

async fn run(config: &MonitorConfig) -> anyhow::Result<()> {
    let monitor = build_monitor(config)?;

    monitor
        .first_refresh()
        .await
        .context("Initial refresh failed")?;

    let mut receiver = monitor.subscribe();
    let reporter = tokio::spawn(async move {
        while receiver.changed().await.is_ok() {
            let status = receiver.borrow_and_update().clone();
            info!(
                state = status.state,
                available = status.available,
                versions = ?status.attributes.versions,
                "Status updated"
            );
        }
    });

    info!(
        "First refresh found {} potential breaking changes, refreshing every {}s",
        monitor.status().state,
        config.scan_interval().as_secs()
    );

    monitor.run(until_signal(tokio::signal::ctrl_c())).await;

    reporter.abort();
    Ok(())
}

async fn check(config: &MonitorConfig) -> anyhow::Result<()> {
    let monitor = build_monitor(config)?;
    monitor.refresh().await.context("Refresh failed")?;
    print_status(&monitor.status())
}

fn status() -> anyhow::Result<()> {
    let snapshot = open_store()
        .map(|store| store.load())
        .transpose()?
        .flatten()
        .map(|stored| StatusSnapshot::from_result(&stored.result, stored.updated_at))
        .unwrap_or_else(StatusSnapshot::unavailable);
    print_status(&snapshot)
}

fn print_status(snapshot: &StatusSnapshot) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(snapshot)?);
    Ok(())
}
