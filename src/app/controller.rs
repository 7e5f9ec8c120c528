//! Dashboard controller
//!
//! The controller is the single owner of the dashboard state: the three
//! snapshots, the filter state and the cycle bookkeeping. It changes only in
//! [`DashboardController::update`], one [`Intent`] at a time, and pushes the
//! complete affected content to its [`RenderBridge`] after every change.

use tracing::{debug, error, info, warn};

use crate::app::filter::{filter, FilterOptions};
use crate::app::intent::{Intent, LoadedArtifact};
use crate::app::loader::ArtifactCycle;
use crate::app::models::{
    ArtifactKind, AuditEntry, AuditSnapshot, DatasetSnapshot, FilterState, ParserReportEntry,
    ReportSnapshot, Row, Snapshot,
};
use crate::app::render::{RenderBridge, SummaryPanel, TableView};
use crate::app::stats::{
    audit_stats, dataset_stats, parser_health, AuditStats, DatasetStats, ParserHealthStats,
};
use crate::constants::{messages, slots, targets, DOCUMENT_COLUMNS};
use crate::errors::{ArtifactError, RenderResult};

/// Owns the dashboard state and renders it
pub struct DashboardController<B: RenderBridge> {
    bridge: B,
    filter: FilterState,
    dataset: Option<DatasetSnapshot>,
    audit: Option<AuditSnapshot>,
    report: Option<ReportSnapshot>,
    rows_cycle: ArtifactCycle,
    audit_cycle: ArtifactCycle,
    report_cycle: ArtifactCycle,
}

impl<B: RenderBridge> DashboardController<B> {
    /// Create a controller rendering into `bridge`
    pub fn new(bridge: B) -> Self {
        Self {
            bridge,
            filter: FilterState::default(),
            dataset: None,
            audit: None,
            report: None,
            rows_cycle: ArtifactCycle::new(ArtifactKind::Rows),
            audit_cycle: ArtifactCycle::new(ArtifactKind::Audit),
            report_cycle: ArtifactCycle::new(ArtifactKind::ParserReport),
        }
    }

    /// Mark every cycle as fetching
    pub fn begin_load(&mut self) {
        for kind in ArtifactKind::ALL {
            if let Err(e) = self.cycle_mut(kind).begin_fetch() {
                warn!("{}", e);
            }
        }
    }

    /// Apply one intent and re-render what it affects
    pub fn update(&mut self, intent: Intent) {
        match intent {
            Intent::FilterChanged(state) => {
                debug!("Filter changed: {:?}", state);
                self.filter = state;
                self.render_rows();
            }
            Intent::ArtifactLoaded(artifact) => self.on_loaded(artifact),
            Intent::ArtifactFailed { kind, error } => self.on_failed(kind, error),
            Intent::RecomputeRequested => {
                debug!("Recompute requested");
                self.render_rows();
                self.render_audit();
                self.render_report();
            }
        }
    }

    fn on_loaded(&mut self, artifact: LoadedArtifact) {
        let kind = artifact.kind();
        if let Err(e) = self.cycle_mut(kind).mark_decoded() {
            warn!("{}", e);
        }

        match artifact {
            LoadedArtifact::Rows(rows) => {
                self.dataset = Some(Snapshot::new(rows));
                self.render_rows();
                // Clean-case counts depend on the dataset.
                self.render_audit();
            }
            LoadedArtifact::Audit(entries) => {
                self.audit = Some(Snapshot::new(entries));
                self.render_audit();
            }
            LoadedArtifact::ParserReport(entries) => {
                self.report = Some(Snapshot::new(entries));
                self.render_report();
            }
        }
    }

    fn on_failed(&mut self, kind: ArtifactKind, error: ArtifactError) {
        if kind.is_critical() {
            error!("{} artifact failed: {}", kind, error);
        } else {
            info!("{} artifact unavailable, degrading: {}", kind, error);
        }
        if let Err(e) = self.cycle_mut(kind).mark_unavailable(error.to_string()) {
            warn!("{}", e);
        }

        match kind {
            ArtifactKind::Rows => {
                self.dataset = None;
                self.render_rows();
                self.render_audit();
            }
            ArtifactKind::Audit => {
                self.audit = None;
                self.render_audit();
            }
            ArtifactKind::ParserReport => {
                self.report = None;
                self.render_report();
            }
        }
    }

    fn render_rows(&mut self) {
        if !self.rows_cycle.is_settled() {
            return;
        }

        let (table, stats, shown) = match &self.dataset {
            Some(snapshot) => {
                let filtered = filter(snapshot.items(), &self.filter);
                let shown = filtered.len();
                (
                    TableView::documents(&filtered),
                    dataset_stats(snapshot.items()),
                    shown,
                )
            }
            None => (
                TableView::fallback(DOCUMENT_COLUMNS, messages::ROWS_UNAVAILABLE),
                DatasetStats::default(),
                0,
            ),
        };
        let panel = self.summary_panel(&stats, shown);

        let results = [
            self.bridge.render_table(targets::DOCUMENTS_TABLE, table),
            self.bridge.set_stat(slots::TOTAL_DOCS, stats.total_rows as u64),
            self.bridge.set_stat(slots::CASES, stats.distinct_cases as u64),
            self.bridge
                .set_stat(slots::DOC_TYPES, stats.distinct_document_types as u64),
            self.bridge
                .set_stat(slots::SOURCE_VIEWS, stats.distinct_source_views as u64),
            self.bridge
                .set_stat(slots::LOW_CONFIDENCE, stats.low_confidence_rows as u64),
            self.bridge.set_stat(slots::FILTERED_DOCS, shown as u64),
            self.bridge.insert_summary_panel(panel).map(|placement| {
                debug!("Summary panel placed {:?}", placement);
            }),
        ];
        report_missing(results);
        self.finish_render(ArtifactKind::Rows);
    }

    fn render_audit(&mut self) {
        if !self.audit_cycle.is_settled() {
            return;
        }

        let entries: &[AuditEntry] = self.audit.as_ref().map(|s| s.items()).unwrap_or_default();
        let rows: &[Row] = self.dataset.as_ref().map(|s| s.items()).unwrap_or_default();
        let stats = audit_stats(entries, rows);
        let notes: Vec<String> = if entries.is_empty() {
            vec![messages::NO_AUDIT_ISSUES.to_string()]
        } else {
            stats
                .issues_by_type
                .iter()
                .map(|(issue, count)| format!("{}: {}", issue, count))
                .collect()
        };
        let table = TableView::audit(entries);

        let results = [
            self.bridge.render_table(targets::AUDIT_TABLE, table),
            self.bridge.render_list(targets::AUDIT_NOTES, &notes),
            self.bridge
                .set_stat(slots::AUDIT_ISSUES, stats.total_issues as u64),
            self.bridge
                .set_stat(slots::ORPHANS, stats.orphan_documents as u64),
            self.bridge
                .set_stat(slots::CLEAN_CASES, stats.clean_cases as u64),
        ];
        report_missing(results);
        self.finish_render(ArtifactKind::Audit);
    }

    fn render_report(&mut self) {
        if !self.report_cycle.is_settled() {
            return;
        }

        let (health, lines) = match &self.report {
            Some(snapshot) => {
                let health = parser_health(snapshot.items());
                let lines = health.warnings.clone();
                (health, lines)
            }
            None => (
                ParserHealthStats::default(),
                vec![messages::REPORT_UNAVAILABLE.to_string()],
            ),
        };

        let results = [
            self.bridge.render_list(targets::PARSER_WARNINGS, &lines),
            self.bridge
                .set_stat(slots::PARSED_FILES, health.total_files as u64),
            self.bridge
                .set_stat(slots::TABLE_MODE, health.table_mode as u64),
            self.bridge
                .set_stat(slots::FALLBACK_MODE, health.fallback_mode as u64),
        ];
        report_missing(results);
        self.finish_render(ArtifactKind::ParserReport);
    }

    fn summary_panel(&self, stats: &DatasetStats, shown: usize) -> SummaryPanel {
        let Some(snapshot) = &self.dataset else {
            return SummaryPanel {
                title: messages::SUMMARY_TITLE.to_string(),
                lines: vec![messages::ROWS_UNAVAILABLE.to_string()],
            };
        };

        SummaryPanel {
            title: messages::SUMMARY_TITLE.to_string(),
            lines: vec![
                format!(
                    "{} documents across {} cases",
                    stats.total_rows, stats.distinct_cases
                ),
                format!(
                    "{} flagged low confidence ({:.1}%)",
                    stats.low_confidence_rows,
                    stats.low_confidence_rate()
                ),
                format!("{} shown with current filters", shown),
                format!(
                    "Loaded {}",
                    snapshot.loaded_at().format("%Y-%m-%d %H:%M:%S UTC")
                ),
            ],
        }
    }

    fn finish_render(&mut self, kind: ArtifactKind) {
        if let Err(e) = self.cycle_mut(kind).mark_rendered() {
            warn!("{}", e);
        }
    }

    fn cycle_mut(&mut self, kind: ArtifactKind) -> &mut ArtifactCycle {
        match kind {
            ArtifactKind::Rows => &mut self.rows_cycle,
            ArtifactKind::Audit => &mut self.audit_cycle,
            ArtifactKind::ParserReport => &mut self.report_cycle,
        }
    }

    /// Cycle bookkeeping for an artifact
    pub fn cycle(&self, kind: ArtifactKind) -> &ArtifactCycle {
        match kind {
            ArtifactKind::Rows => &self.rows_cycle,
            ArtifactKind::Audit => &self.audit_cycle,
            ArtifactKind::ParserReport => &self.report_cycle,
        }
    }

    /// True once every cycle resolved
    pub fn all_settled(&self) -> bool {
        ArtifactKind::ALL.iter().all(|&k| self.cycle(k).is_settled())
    }

    /// Current filter state
    pub fn filter_state(&self) -> &FilterState {
        &self.filter
    }

    /// Current dataset snapshot
    pub fn dataset(&self) -> Option<&DatasetSnapshot> {
        self.dataset.as_ref()
    }

    /// Current audit snapshot
    pub fn audit(&self) -> Option<&AuditSnapshot> {
        self.audit.as_ref()
    }

    /// Current parser report snapshot
    pub fn report(&self) -> Option<&ReportSnapshot> {
        self.report.as_ref()
    }

    /// Rows matching the current filter state
    pub fn filtered_rows(&self) -> Vec<Row> {
        self.dataset
            .as_ref()
            .map(|s| filter(s.items(), &self.filter))
            .unwrap_or_default()
    }

    /// Selector values for the current dataset
    pub fn filter_options(&self) -> FilterOptions {
        self.dataset
            .as_ref()
            .map(|s| FilterOptions::from_rows(s.items()))
            .unwrap_or_default()
    }

    /// Statistics over the current dataset
    pub fn dataset_stats(&self) -> DatasetStats {
        self.dataset
            .as_ref()
            .map(|s| dataset_stats(s.items()))
            .unwrap_or_default()
    }

    /// Statistics over the current audit snapshot
    pub fn audit_stats(&self) -> AuditStats {
        let entries: &[AuditEntry] = self.audit.as_ref().map(|s| s.items()).unwrap_or_default();
        let rows: &[Row] = self.dataset.as_ref().map(|s| s.items()).unwrap_or_default();
        audit_stats(entries, rows)
    }

    /// Parser health over the current report snapshot
    pub fn parser_health(&self) -> ParserHealthStats {
        let entries: &[ParserReportEntry] =
            self.report.as_ref().map(|s| s.items()).unwrap_or_default();
        parser_health(entries)
    }

    /// Render surface
    pub fn bridge(&self) -> &B {
        &self.bridge
    }

    /// Consume the controller, returning its render surface
    pub fn into_bridge(self) -> B {
        self.bridge
    }
}

/// Log render calls whose target is absent; the rest of the render proceeds
fn report_missing<const N: usize>(results: [RenderResult<()>; N]) {
    for result in results {
        if let Err(e) = result {
            debug!("Skipping render: {}", e);
        }
    }
}
