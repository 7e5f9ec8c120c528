//! Typed events consumed by the dashboard controller

use crate::app::models::{ArtifactKind, AuditEntry, FilterState, ParserReportEntry, Row};
use crate::errors::ArtifactError;

/// Decoded content of one artifact
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadedArtifact {
    Rows(Vec<Row>),
    Audit(Vec<AuditEntry>),
    ParserReport(Vec<ParserReportEntry>),
}

impl LoadedArtifact {
    /// Which artifact this is
    pub fn kind(&self) -> ArtifactKind {
        match self {
            LoadedArtifact::Rows(_) => ArtifactKind::Rows,
            LoadedArtifact::Audit(_) => ArtifactKind::Audit,
            LoadedArtifact::ParserReport(_) => ArtifactKind::ParserReport,
        }
    }

    /// Number of decoded records
    pub fn len(&self) -> usize {
        match self {
            LoadedArtifact::Rows(rows) => rows.len(),
            LoadedArtifact::Audit(entries) => entries.len(),
            LoadedArtifact::ParserReport(entries) => entries.len(),
        }
    }

    /// True when no records were decoded
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Something that happened and that the controller must react to
#[derive(Debug)]
pub enum Intent {
    /// The user changed the filter criteria
    FilterChanged(FilterState),
    /// An artifact cycle fetched and decoded its artifact
    ArtifactLoaded(LoadedArtifact),
    /// An artifact cycle failed
    ArtifactFailed {
        kind: ArtifactKind,
        error: ArtifactError,
    },
    /// Re-render everything from the current snapshots
    RecomputeRequested,
}

impl Intent {
    /// Artifact the intent settles, if any
    pub fn artifact_kind(&self) -> Option<ArtifactKind> {
        match self {
            Intent::ArtifactLoaded(artifact) => Some(artifact.kind()),
            Intent::ArtifactFailed { kind, .. } => Some(*kind),
            Intent::FilterChanged(_) | Intent::RecomputeRequested => None,
        }
    }
}
