//! Core application logic for the case-document dashboard
//!
//! This module contains the artifact decoders, the filter and statistics
//! engines, the resilient loader and the controller that renders everything
//! into a [`RenderBridge`].
//!
//! # Examples
//!
//! ```rust,no_run
//! use std::sync::Arc;
//!
//! use casedoc_dashboard::app::{Dashboard, DirectoryFetcher, MemorySurface, ResilientLoader};
//! use casedoc_dashboard::app::models::FilterState;
//!
//! # async fn example() -> casedoc_dashboard::Result<()> {
//! let loader = ResilientLoader::new(Arc::new(DirectoryFetcher::new("./output")));
//! let mut dashboard = Dashboard::new(loader, MemorySurface::dashboard_layout());
//!
//! let summary = dashboard.load().await;
//! println!("{} artifacts unavailable", summary.unavailable.len());
//!
//! dashboard.handle().set_filter(FilterState::new().with_case("22-GA-1234")).await?;
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod controller;
pub mod dashboard;
pub mod debounce;
pub mod decoder;
pub mod filter;
pub mod intent;
pub mod loader;
pub mod models;
pub mod render;
pub mod stats;

// Re-export main public API
pub use client::{ArtifactFetcher, ClientConfig, DirectoryFetcher, HttpFetcher};
pub use controller::DashboardController;
pub use dashboard::{Dashboard, DashboardHandle, LoadSummary};
pub use debounce::Debouncer;
pub use decoder::{decode, decode_audit, decode_parser_report, decode_rows};
pub use filter::{filter, FilterOptions};
pub use intent::{Intent, LoadedArtifact};
pub use loader::{ArtifactCycle, ArtifactNames, CycleState, CycleTasks, ResilientLoader};
pub use models::{
    ArtifactKind, AuditEntry, ConfidenceFilter, FilterState, ParserReportEntry, Record, Row,
    Snapshot,
};
pub use render::{MemorySurface, PanelPlacement, RenderBridge, SummaryPanel, TableView};
pub use stats::{
    audit_stats, dataset_stats, parser_health, AuditStats, DatasetStats, ParserHealthStats,
};
