//! Dashboard runtime
//!
//! [`Dashboard`] ties the [`ResilientLoader`] to a [`DashboardController`]
//! through a bounded intent channel. Artifact cycles, filter changes and
//! debounced recompute triggers all arrive on that channel and are applied
//! one at a time in arrival order.

use std::time::Duration;

use tokio::sync::{broadcast, mpsc};
use tracing::{debug, info};

use crate::app::controller::DashboardController;
use crate::app::debounce::Debouncer;
use crate::app::intent::Intent;
use crate::app::loader::ResilientLoader;
use crate::app::models::{ArtifactKind, FilterState};
use crate::app::render::RenderBridge;
use crate::config::DashboardConfig;
use crate::constants::ui;
use crate::errors::{AppError, Result};

/// Outcome of one load pass
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoadSummary {
    /// Artifacts fetched and decoded
    pub available: Vec<ArtifactKind>,
    /// Artifacts that failed and were rendered degraded
    pub unavailable: Vec<ArtifactKind>,
}

impl LoadSummary {
    /// True when every artifact loaded
    pub fn is_complete(&self) -> bool {
        self.unavailable.is_empty()
    }
}

/// Loader, controller and intent channel
pub struct Dashboard<B: RenderBridge> {
    controller: DashboardController<B>,
    loader: ResilientLoader,
    intents_tx: mpsc::Sender<Intent>,
    intents_rx: mpsc::Receiver<Intent>,
    debounce_quantum: Duration,
}

impl<B: RenderBridge> Dashboard<B> {
    /// Create a dashboard rendering into `bridge`
    pub fn new(loader: ResilientLoader, bridge: B) -> Self {
        let (intents_tx, intents_rx) = mpsc::channel(ui::INTENT_CHANNEL_CAPACITY);
        Self {
            controller: DashboardController::new(bridge),
            loader,
            intents_tx,
            intents_rx,
            debounce_quantum: ui::DEBOUNCE_QUANTUM,
        }
    }

    /// Use `quantum` for debouncers created through [`DashboardHandle`]
    pub fn with_debounce_quantum(mut self, quantum: Duration) -> Self {
        self.debounce_quantum = quantum;
        self
    }

    /// Create a dashboard from configuration
    ///
    /// # Errors
    ///
    /// Returns an error when the configured source cannot be turned into a
    /// fetcher.
    pub fn from_config(config: &DashboardConfig, bridge: B) -> Result<Self> {
        let fetcher = config.build_fetcher()?;
        let loader = ResilientLoader::with_names(fetcher, config.artifacts.clone());
        Ok(Self::new(loader, bridge).with_debounce_quantum(config.ui.debounce_quantum()))
    }

    /// Cloneable sender for intents from other tasks
    pub fn handle(&self) -> DashboardHandle {
        DashboardHandle {
            tx: self.intents_tx.clone(),
            debounce_quantum: self.debounce_quantum,
        }
    }

    /// Load all three artifacts and render each as it settles
    ///
    /// Returns once every cycle has reported. Intents sent through a
    /// [`DashboardHandle`] meanwhile are applied in arrival order.
    pub async fn load(&mut self) -> LoadSummary {
        self.controller.begin_load();
        let tasks = self.loader.start(self.intents_tx.clone());

        while !self.controller.all_settled() {
            match self.intents_rx.recv().await {
                Some(intent) => self.controller.update(intent),
                None => break,
            }
        }
        tasks.join().await;

        let (available, unavailable): (Vec<_>, Vec<_>) = ArtifactKind::ALL
            .into_iter()
            .partition(|&kind| self.controller.cycle(kind).is_available());
        let summary = LoadSummary {
            available,
            unavailable,
        };
        info!(
            "Load finished: {} available, {} unavailable",
            summary.available.len(),
            summary.unavailable.len()
        );
        summary
    }

    /// Apply an intent immediately
    pub fn dispatch(&mut self, intent: Intent) {
        self.controller.update(intent);
    }

    /// Apply intents until shutdown is broadcast
    ///
    /// Intents already queued when shutdown arrives are still applied.
    pub async fn run_until_shutdown(&mut self, mut shutdown: broadcast::Receiver<()>) {
        loop {
            tokio::select! {
                _ = shutdown.recv() => {
                    info!("Shutdown received, stopping dashboard");
                    break;
                }
                intent = self.intents_rx.recv() => match intent {
                    Some(intent) => self.controller.update(intent),
                    None => break,
                }
            }
        }

        let mut drained = 0;
        while let Ok(intent) = self.intents_rx.try_recv() {
            self.controller.update(intent);
            drained += 1;
        }
        if drained > 0 {
            debug!("Applied {} queued intents after shutdown", drained);
        }
    }

    /// The controller
    pub fn controller(&self) -> &DashboardController<B> {
        &self.controller
    }

    /// Consume the dashboard, returning its controller
    pub fn into_controller(self) -> DashboardController<B> {
        self.controller
    }
}

/// Sends intents to a running [`Dashboard`]
#[derive(Debug, Clone)]
pub struct DashboardHandle {
    tx: mpsc::Sender<Intent>,
    debounce_quantum: Duration,
}

impl DashboardHandle {
    /// Send any intent
    ///
    /// # Errors
    ///
    /// Returns an error when the dashboard has been dropped.
    pub async fn send(&self, intent: Intent) -> Result<()> {
        self.tx
            .send(intent)
            .await
            .map_err(|_| AppError::generic("Dashboard is no longer running"))
    }

    /// Replace the filter state
    pub async fn set_filter(&self, state: FilterState) -> Result<()> {
        self.send(Intent::FilterChanged(state)).await
    }

    /// Ask for a full re-render
    pub async fn request_recompute(&self) -> Result<()> {
        self.send(Intent::RecomputeRequested).await
    }

    /// Debouncer feeding this dashboard
    ///
    /// Trigger it with [`Intent::RecomputeRequested`] from viewport-style
    /// sources so that a burst results in a single re-render. The quantum
    /// is the dashboard's configured one.
    pub fn recompute_debouncer(&self) -> Debouncer<Intent> {
        Debouncer::with_quantum(self.debounce_quantum, self.tx.clone())
    }
}
