//! Periodic refresh of the breaking changes status

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use pep508_rs::pep440_rs::Version;
use tokio::sync::watch;
use tokio::time::{MissedTickBehavior, interval};
use tracing::{error, info, warn};

use crate::config::{ConfigError, MonitorConfig};
use crate::monitor::components::ActiveComponents;
use crate::monitor::cycle::{CycleContext, PollResult, run_cycle};
use crate::monitor::error::CycleError;
use crate::monitor::status::StatusSnapshot;
use crate::store::ResultStore;
use crate::version::registry::{ChangeSource, ReleaseSource};
use crate::version::release::parse_version;

/// Validated inputs of the poll cycle
#[derive(Debug, Clone)]
pub struct MonitorSettings {
    pub current_version: Version,
    pub minimum_version: Version,
    pub components: ActiveComponents,
    pub scan_interval: Duration,
}

impl TryFrom<&MonitorConfig> for MonitorSettings {
    type Error = ConfigError;

    fn try_from(config: &MonitorConfig) -> Result<Self, Self::Error> {
        let current = config
            .current_version
            .as_deref()
            .ok_or(ConfigError::MissingCurrentVersion)?;
        let current_version = parse_version(current).ok_or_else(|| ConfigError::InvalidVersion {
            field: "currentVersion",
            value: current.to_string(),
        })?;
        let minimum_version =
            parse_version(&config.minimum_version).ok_or_else(|| ConfigError::InvalidVersion {
                field: "minimumVersion",
                value: config.minimum_version.clone(),
            })?;

        Ok(Self {
            current_version,
            minimum_version,
            components: ActiveComponents::from_loaded(&config.components),
            scan_interval: config.scan_interval(),
        })
    }
}

/// Runs poll cycles and publishes their outcome
pub struct Monitor {
    settings: MonitorSettings,
    releases: Arc<dyn ReleaseSource>,
    changes: Arc<dyn ChangeSource>,
    store: Option<Arc<ResultStore>>,
    status: watch::Sender<StatusSnapshot>,
}

impl Monitor {
    pub fn new(
        settings: MonitorSettings,
        releases: Arc<dyn ReleaseSource>,
        changes: Arc<dyn ChangeSource>,
    ) -> Self {
        let (status, _) = watch::channel(StatusSnapshot::unavailable());
        Self {
            settings,
            releases,
            changes,
            store: None,
            status,
        }
    }

    /// Persist every successful result to `store`
    pub fn with_store(mut self, store: Arc<ResultStore>) -> Self {
        self.store = Some(store);
        self
    }

    pub fn subscribe(&self) -> watch::Receiver<StatusSnapshot> {
        self.status.subscribe()
    }

    pub fn status(&self) -> StatusSnapshot {
        self.status.borrow().clone()
    }

    /// Run one cycle and publish its outcome
    ///
    /// On failure the previous attributes stay published and the status is
    /// marked unavailable.
    pub async fn refresh(&self) -> Result<PollResult, CycleError> {
        let ctx = CycleContext {
            current_version: &self.settings.current_version,
            minimum_version: &self.settings.minimum_version,
            components: &self.settings.components,
            releases: self.releases.as_ref(),
            changes: self.changes.as_ref(),
        };

        match run_cycle(&ctx).await {
            Ok(result) => {
                let updated_at = Utc::now();
                if let Some(store) = &self.store {
                    let _ = store
                        .save(&result, updated_at)
                        .inspect_err(|e| error!("Failed to store poll result: {}", e));
                }
                self.status
                    .send_replace(StatusSnapshot::from_result(&result, updated_at));
                Ok(result)
            }
            Err(e) => {
                self.status.send_modify(StatusSnapshot::mark_unavailable);
                Err(e)
            }
        }
    }

    /// Initial refresh during setup. Its failure should abort setup.
    pub async fn first_refresh(&self) -> Result<(), CycleError> {
        info!(
            "Checking {} active components against releases after {}",
            self.settings.components.len(),
            self.settings.current_version
        );
        self.refresh().await.map(|_| ())
    }

    /// Refresh every scan interval until `shutdown` completes.
    ///
    /// The first tick is one interval from now; call [`Monitor::first_refresh`]
    /// beforehand for an immediate result.
    pub async fn run<F>(&self, shutdown: F)
    where
        F: Future<Output = ()>,
    {
        let mut ticker = interval(self.settings.scan_interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        // Consume the immediate first tick
        ticker.tick().await;

        tokio::pin!(shutdown);

        loop {
            tokio::select! {
                _ = &mut shutdown => {
                    info!("Stopping periodic refresh");
                    break;
                }
                _ = ticker.tick() => {
                    if let Err(e) = self.refresh().await {
                        warn!("Refresh failed: {}", e);
                    }
                }
            }
        }
    }
}

/// Completes once `signal` reports a shutdown request.
///
/// A signal listener that fails to install never completes, so the refresh
/// loop keeps running instead of stopping right away.
pub async fn until_signal<F>(signal: F)
where
    F: Future<Output = std::io::Result<()>>,
{
    if let Err(e) = signal.await {
        error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
}
