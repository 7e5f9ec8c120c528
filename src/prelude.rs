//! Prelude module for the case-document dashboard
//!
//! Re-exports the items needed to load and drive a dashboard with a single
//! `use casedoc_dashboard::prelude::*;` statement.
//!
//! # Usage
//!
//! ```rust,no_run
//! use casedoc_dashboard::prelude::*;
//!
//! #[tokio::main]
//! async fn main() -> Result<()> {
//!     let config = DashboardConfig::load(None).await?;
//!     config.logging.init()?;
//!
//!     let mut dashboard = Dashboard::from_config(&config, MemorySurface::dashboard_layout())?;
//!     let summary = dashboard.load().await;
//!     if !summary.is_complete() {
//!         eprintln!("Degraded artifacts: {:?}", summary.unavailable);
//!     }
//!     Ok(())
//! }
//! ```

// Core result types
pub use crate::errors::{AppError, Result};

// Configuration
pub use crate::config::DashboardConfig;

// Runtime and rendering
pub use crate::app::{
    ArtifactFetcher, ArtifactKind, ConfidenceFilter, Dashboard, DashboardHandle, DirectoryFetcher,
    FilterState, HttpFetcher, Intent, LoadSummary, MemorySurface, RenderBridge, ResilientLoader,
    TableView,
};
