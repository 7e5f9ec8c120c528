//! Render surface contract
//!
//! The presentation layer implements [`RenderBridge`]; the controller pushes
//! complete content to it after every update. Every call fully replaces what
//! was previously rendered for its target, so repeating a call is harmless.
//!
//! [`MemorySurface`] keeps rendered content in memory and is used by headless
//! consumers and tests.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::app::models::{AuditEntry, Row};
use crate::constants::{slots, targets, AUDIT_COLUMNS, DOCUMENT_COLUMNS};
use crate::errors::{RenderError, RenderResult};

/// Content of a table target
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum TableView {
    /// Header plus one cell vector per row
    Rows {
        columns: Vec<String>,
        rows: Vec<Vec<String>>,
    },
    /// A single advisory row spanning all columns
    Fallback {
        columns: Vec<String>,
        colspan: usize,
        message: String,
    },
}

impl TableView {
    /// Build the document table from rows
    pub fn documents(rows: &[Row]) -> Self {
        Self::Rows {
            columns: DOCUMENT_COLUMNS.iter().map(|c| c.to_string()).collect(),
            rows: rows
                .iter()
                .map(|row| {
                    DOCUMENT_COLUMNS
                        .iter()
                        .map(|c| row.field(c).unwrap_or_default().to_string())
                        .collect()
                })
                .collect(),
        }
    }

    /// Build the audit table from entries
    pub fn audit(entries: &[AuditEntry]) -> Self {
        Self::Rows {
            columns: AUDIT_COLUMNS.iter().map(|c| c.to_string()).collect(),
            rows: entries
                .iter()
                .map(|entry| {
                    AUDIT_COLUMNS
                        .iter()
                        .map(|c| entry.field(c).unwrap_or_default().to_string())
                        .collect()
                })
                .collect(),
        }
    }

    /// Single advisory row spanning every column of `columns`
    pub fn fallback(columns: &[&str], message: impl Into<String>) -> Self {
        Self::Fallback {
            columns: columns.iter().map(|c| c.to_string()).collect(),
            colspan: columns.len(),
            message: message.into(),
        }
    }

    /// Number of rendered body rows
    pub fn row_count(&self) -> usize {
        match self {
            TableView::Rows { rows, .. } => rows.len(),
            TableView::Fallback { .. } => 1,
        }
    }

    /// True for the advisory fallback
    pub fn is_fallback(&self) -> bool {
        matches!(self, TableView::Fallback { .. })
    }
}

/// Summary panel shown above the filters
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SummaryPanel {
    /// Panel headline
    pub title: String,
    /// One line per summary fact
    pub lines: Vec<String>,
}

/// Where a summary panel ended up
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PanelPlacement {
    /// Immediately before the filters region
    BeforeFilters,
    /// At the start of the document, the filters region being absent
    DocumentStart,
}

/// Presentation surface the controller renders into
pub trait RenderBridge: Send {
    /// Replace the content of a table target
    fn render_table(&mut self, target: &str, table: TableView) -> RenderResult<()>;

    /// Replace the content of a list target
    fn render_list(&mut self, target: &str, items: &[String]) -> RenderResult<()>;

    /// Write a numeric value into a named stat slot
    fn set_stat(&mut self, slot: &str, value: u64) -> RenderResult<()>;

    /// Insert or replace the summary panel
    fn insert_summary_panel(&mut self, panel: SummaryPanel) -> RenderResult<PanelPlacement>;
}

/// A top-level region of the in-memory document
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Region {
    /// Named anchor such as the filters bar
    Anchor(String),
    /// Rendered summary panel
    Panel(SummaryPanel),
}

/// In-memory render surface
///
/// Targets must be registered before they can be rendered into; rendering into
/// an unknown target yields `RenderError::TargetMissing`.
#[derive(Debug, Default)]
pub struct MemorySurface {
    regions: Vec<Region>,
    tables: HashMap<String, Option<TableView>>,
    lists: HashMap<String, Option<Vec<String>>>,
    stats: HashMap<String, Option<u64>>,
    render_calls: usize,
}

impl MemorySurface {
    /// Create a surface with no targets
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a surface with every dashboard target registered
    pub fn dashboard_layout() -> Self {
        let mut surface = Self::new()
            .with_anchor("header")
            .with_anchor(targets::FILTERS_REGION)
            .with_table(targets::DOCUMENTS_TABLE)
            .with_table(targets::AUDIT_TABLE)
            .with_list(targets::AUDIT_NOTES)
            .with_list(targets::PARSER_WARNINGS);
        for slot in slots::ALL {
            surface = surface.with_stat(slot);
        }
        surface
    }

    /// Builder: append a named region anchor
    pub fn with_anchor(mut self, name: &str) -> Self {
        self.regions.push(Region::Anchor(name.to_string()));
        self
    }

    /// Builder: register a table target
    pub fn with_table(mut self, target: &str) -> Self {
        self.tables.insert(target.to_string(), None);
        self
    }

    /// Builder: register a list target
    pub fn with_list(mut self, target: &str) -> Self {
        self.lists.insert(target.to_string(), None);
        self
    }

    /// Builder: register a stat slot
    pub fn with_stat(mut self, slot: &str) -> Self {
        self.stats.insert(slot.to_string(), None);
        self
    }

    /// Rendered table content
    pub fn table(&self, target: &str) -> Option<&TableView> {
        self.tables.get(target).and_then(Option::as_ref)
    }

    /// Rendered list content
    pub fn list(&self, target: &str) -> Option<&[String]> {
        self.lists.get(target).and_then(|l| l.as_deref())
    }

    /// Rendered stat value
    pub fn stat(&self, slot: &str) -> Option<u64> {
        self.stats.get(slot).copied().flatten()
    }

    /// Document regions in order
    pub fn regions(&self) -> &[Region] {
        &self.regions
    }

    /// Number of summary panels present
    pub fn panel_count(&self) -> usize {
        self.regions
            .iter()
            .filter(|r| matches!(r, Region::Panel(_)))
            .count()
    }

    /// Total successful render calls
    pub fn render_calls(&self) -> usize {
        self.render_calls
    }
}

fn missing(target: &str) -> RenderError {
    RenderError::TargetMissing {
        target: target.to_string(),
    }
}

impl RenderBridge for MemorySurface {
    fn render_table(&mut self, target: &str, table: TableView) -> RenderResult<()> {
        let slot = self.tables.get_mut(target).ok_or_else(|| missing(target))?;
        debug!("Rendering {} rows into table {}", table.row_count(), target);
        *slot = Some(table);
        self.render_calls += 1;
        Ok(())
    }

    fn render_list(&mut self, target: &str, items: &[String]) -> RenderResult<()> {
        let slot = self.lists.get_mut(target).ok_or_else(|| missing(target))?;
        *slot = Some(items.to_vec());
        self.render_calls += 1;
        Ok(())
    }

    fn set_stat(&mut self, slot: &str, value: u64) -> RenderResult<()> {
        let entry = self.stats.get_mut(slot).ok_or_else(|| missing(slot))?;
        *entry = Some(value);
        self.render_calls += 1;
        Ok(())
    }

    fn insert_summary_panel(&mut self, panel: SummaryPanel) -> RenderResult<PanelPlacement> {
        self.regions.retain(|r| !matches!(r, Region::Panel(_)));

        let filters = self
            .regions
            .iter()
            .position(|r| matches!(r, Region::Anchor(name) if name == targets::FILTERS_REGION));
        let (index, placement) = match filters {
            Some(i) => (i, PanelPlacement::BeforeFilters),
            None => (0, PanelPlacement::DocumentStart),
        };

        self.regions.insert(index, Region::Panel(panel));
        self.render_calls += 1;
        Ok(placement)
    }
}
