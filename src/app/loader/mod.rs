//! Resilient artifact loading
//!
//! The loader runs one fetch-and-decode cycle per artifact. Each cycle is its
//! own tokio task supervised by a second task, so a failure or panic in one
//! cycle is reported as [`Intent::ArtifactFailed`] and never delays the other
//! two. Results are delivered on the intent channel in completion order.
//!
//! # Architecture
//!
//! - [`state`] - per-artifact cycle state machine

pub mod state;

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::app::client::ArtifactFetcher;
use crate::app::decoder;
use crate::app::intent::{Intent, LoadedArtifact};
use crate::app::models::ArtifactKind;
use crate::constants::artifacts;
use crate::errors::ArtifactError;

pub use state::{ArtifactCycle, CycleState};

/// File names of the three artifacts
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ArtifactNames {
    /// Primary dataset
    pub rows: String,
    /// Audit issues
    pub audit: String,
    /// Parser report
    pub parser_report: String,
}

impl Default for ArtifactNames {
    fn default() -> Self {
        Self {
            rows: artifacts::ROWS_FILE.to_string(),
            audit: artifacts::AUDIT_FILE.to_string(),
            parser_report: artifacts::PARSER_REPORT_FILE.to_string(),
        }
    }
}

impl ArtifactNames {
    /// File name for an artifact kind
    pub fn name_for(&self, kind: ArtifactKind) -> &str {
        match kind {
            ArtifactKind::Rows => &self.rows,
            ArtifactKind::Audit => &self.audit,
            ArtifactKind::ParserReport => &self.parser_report,
        }
    }
}

/// Starts the three isolated artifact cycles
#[derive(Clone)]
pub struct ResilientLoader {
    fetcher: Arc<dyn ArtifactFetcher>,
    names: ArtifactNames,
}

impl std::fmt::Debug for ResilientLoader {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResilientLoader")
            .field("source", &self.fetcher.describe())
            .field("names", &self.names)
            .finish()
    }
}

impl ResilientLoader {
    /// Create a loader reading the default artifact names
    pub fn new(fetcher: Arc<dyn ArtifactFetcher>) -> Self {
        Self::with_names(fetcher, ArtifactNames::default())
    }

    /// Create a loader with custom artifact names
    pub fn with_names(fetcher: Arc<dyn ArtifactFetcher>, names: ArtifactNames) -> Self {
        Self { fetcher, names }
    }

    /// Artifact names in use
    pub fn names(&self) -> &ArtifactNames {
        &self.names
    }

    /// Spawn all cycles; each sends exactly one intent on `tx`
    pub fn start(&self, tx: mpsc::Sender<Intent>) -> CycleTasks {
        info!("Loading artifacts from {}", self.fetcher.describe());
        let tasks = ArtifactKind::ALL
            .iter()
            .map(|&kind| self.spawn_cycle(kind, tx.clone()))
            .collect();
        CycleTasks { tasks }
    }

    fn spawn_cycle(&self, kind: ArtifactKind, tx: mpsc::Sender<Intent>) -> JoinHandle<()> {
        let fetcher = Arc::clone(&self.fetcher);
        let name = self.names.name_for(kind).to_string();

        tokio::spawn(async move {
            let cycle = tokio::spawn(run_cycle(fetcher, kind, name));
            let intent = match cycle.await {
                Ok(Ok(artifact)) => {
                    info!("{} artifact loaded ({} records)", kind, artifact.len());
                    Intent::ArtifactLoaded(artifact)
                }
                Ok(Err(error)) => {
                    warn!("{} artifact unavailable: {}", kind, error);
                    Intent::ArtifactFailed { kind, error }
                }
                Err(join_error) => {
                    warn!("{} cycle terminated: {}", kind, join_error);
                    Intent::ArtifactFailed {
                        kind,
                        error: ArtifactError::Aborted {
                            reason: join_error.to_string(),
                        },
                    }
                }
            };

            if tx.send(intent).await.is_err() {
                debug!("Intent channel closed before {} cycle reported", kind);
            }
        })
    }
}

/// Fetch and decode one artifact
///
/// # Errors
///
/// Returns `ArtifactError::Fetch` when the artifact cannot be retrieved and
/// `ArtifactError::Decode` when the parser report is not valid JSON.
pub async fn run_cycle(
    fetcher: Arc<dyn ArtifactFetcher>,
    kind: ArtifactKind,
    name: String,
) -> Result<LoadedArtifact, ArtifactError> {
    debug!("Fetching {} artifact {}", kind, name);
    let raw = fetcher.fetch(&name).await?;

    let artifact = match kind {
        ArtifactKind::Rows => LoadedArtifact::Rows(decoder::decode_rows(&raw)),
        ArtifactKind::Audit => LoadedArtifact::Audit(decoder::decode_audit(&raw)),
        ArtifactKind::ParserReport => {
            LoadedArtifact::ParserReport(decoder::decode_parser_report(&raw)?)
        }
    };
    Ok(artifact)
}

/// Handles of the spawned cycle supervisors
#[derive(Debug)]
pub struct CycleTasks {
    tasks: Vec<JoinHandle<()>>,
}

impl CycleTasks {
    /// Number of cycles started
    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    /// True when no cycle was started
    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    /// Wait until every supervisor has reported
    pub async fn join(self) {
        for result in futures::future::join_all(self.tasks).await {
            if let Err(e) = result {
                warn!("Cycle supervisor ended abnormally: {}", e);
            }
        }
    }

    /// Abort all cycles still running
    pub fn abort(&self) {
        for task in &self.tasks {
            task.abort();
        }
    }
}
