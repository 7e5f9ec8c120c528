//! Per-artifact cycle state machine
//!
//! ```text
//! Idle -> Fetching -> Decoded     -> Rendered
//!                  -> Unavailable -> Rendered
//! Rendered -> Rendered   (recompute from the current snapshot)
//! Rendered -> Fetching   (reload)
//! ```

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::app::models::ArtifactKind;
use crate::errors::CycleError;

/// State of one artifact cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CycleState {
    /// Not started
    Idle,
    /// Fetch in flight
    Fetching,
    /// Artifact fetched and decoded, not yet rendered
    Decoded,
    /// Fetch or decode failed, not yet rendered
    Unavailable,
    /// Content (or its degraded replacement) rendered
    Rendered,
}

impl CycleState {
    /// Check whether `next` is a legal successor
    pub fn can_transition_to(&self, next: CycleState) -> bool {
        use CycleState::*;
        matches!(
            (*self, next),
            (Idle, Fetching)
                | (Fetching, Decoded)
                | (Fetching, Unavailable)
                | (Decoded, Rendered)
                | (Unavailable, Rendered)
                | (Rendered, Rendered)
                | (Rendered, Fetching)
        )
    }
}

impl fmt::Display for CycleState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            CycleState::Idle => "idle",
            CycleState::Fetching => "fetching",
            CycleState::Decoded => "decoded",
            CycleState::Unavailable => "unavailable",
            CycleState::Rendered => "rendered",
        };
        f.write_str(name)
    }
}

/// Lifecycle bookkeeping for one artifact
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArtifactCycle {
    kind: ArtifactKind,
    state: CycleState,
    available: bool,
    last_error: Option<String>,
    render_count: usize,
    settled_at: Option<DateTime<Utc>>,
}

impl ArtifactCycle {
    /// Create an idle cycle
    pub fn new(kind: ArtifactKind) -> Self {
        Self {
            kind,
            state: CycleState::Idle,
            available: false,
            last_error: None,
            render_count: 0,
            settled_at: None,
        }
    }

    /// Move to `next`, rejecting illegal transitions
    pub fn transition(&mut self, next: CycleState) -> Result<(), CycleError> {
        if !self.state.can_transition_to(next) {
            return Err(CycleError::InvalidTransition {
                kind: self.kind,
                from: self.state.to_string(),
                to: next.to_string(),
            });
        }
        self.state = next;
        Ok(())
    }

    /// Start (or restart) fetching
    pub fn begin_fetch(&mut self) -> Result<(), CycleError> {
        self.transition(CycleState::Fetching)
    }

    /// Record a successful fetch and decode
    ///
    /// An idle or rendered cycle passes through `Fetching` first, so results
    /// that arrive without an explicit `begin_fetch` are still accepted.
    pub fn mark_decoded(&mut self) -> Result<(), CycleError> {
        self.ensure_fetching()?;
        self.transition(CycleState::Decoded)?;
        self.available = true;
        self.last_error = None;
        self.settled_at = Some(Utc::now());
        Ok(())
    }

    /// Record a failed fetch or decode
    pub fn mark_unavailable(&mut self, reason: impl Into<String>) -> Result<(), CycleError> {
        self.ensure_fetching()?;
        self.transition(CycleState::Unavailable)?;
        self.available = false;
        self.last_error = Some(reason.into());
        self.settled_at = Some(Utc::now());
        Ok(())
    }

    /// Record a render of the cycle's content
    pub fn mark_rendered(&mut self) -> Result<(), CycleError> {
        self.transition(CycleState::Rendered)?;
        self.render_count += 1;
        Ok(())
    }

    fn ensure_fetching(&mut self) -> Result<(), CycleError> {
        match self.state {
            CycleState::Idle | CycleState::Rendered => self.begin_fetch(),
            _ => Ok(()),
        }
    }

    /// Artifact this cycle loads
    pub fn kind(&self) -> ArtifactKind {
        self.kind
    }

    /// Current state
    pub fn state(&self) -> CycleState {
        self.state
    }

    /// True once the fetch resolved either way
    pub fn is_settled(&self) -> bool {
        matches!(
            self.state,
            CycleState::Decoded | CycleState::Unavailable | CycleState::Rendered
        )
    }

    /// True when the last settled fetch succeeded
    pub fn is_available(&self) -> bool {
        self.is_settled() && self.available
    }

    /// Error message of the last failure
    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    /// How many times the cycle was rendered
    pub fn render_count(&self) -> usize {
        self.render_count
    }

    /// When the fetch last resolved
    pub fn settled_at(&self) -> Option<DateTime<Utc>> {
        self.settled_at
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_success_path() {
        let mut cycle = ArtifactCycle::new(ArtifactKind::Rows);
        assert_eq!(cycle.state(), CycleState::Idle);
        assert!(!cycle.is_settled());

        cycle.begin_fetch().unwrap();
        cycle.mark_decoded().unwrap();
        assert!(cycle.is_available());
        cycle.mark_rendered().unwrap();
        cycle.mark_rendered().unwrap();

        assert_eq!(cycle.state(), CycleState::Rendered);
        assert_eq!(cycle.render_count(), 2);
        assert!(cycle.settled_at().is_some());
    }

    #[test]
    fn test_failure_path() {
        let mut cycle = ArtifactCycle::new(ArtifactKind::Audit);
        cycle.begin_fetch().unwrap();
        cycle.mark_unavailable("HTTP 404").unwrap();
        assert!(cycle.is_settled());
        assert!(!cycle.is_available());
        assert_eq!(cycle.last_error(), Some("HTTP 404"));
        cycle.mark_rendered().unwrap();
    }

    #[test]
    fn test_invalid_transitions_rejected() {
        let mut cycle = ArtifactCycle::new(ArtifactKind::ParserReport);
        let err = cycle.mark_rendered().unwrap_err();
        assert_eq!(
            err,
            CycleError::InvalidTransition {
                kind: ArtifactKind::ParserReport,
                from: "idle".to_string(),
                to: "rendered".to_string(),
            }
        );

        cycle.begin_fetch().unwrap();
        assert!(cycle.begin_fetch().is_err());
        assert!(!CycleState::Decoded.can_transition_to(CycleState::Unavailable));
    }

    #[test]
    fn test_reload_after_render() {
        let mut cycle = ArtifactCycle::new(ArtifactKind::Rows);
        cycle.mark_unavailable("offline").unwrap();
        cycle.mark_rendered().unwrap();

        cycle.mark_decoded().unwrap();
        assert!(cycle.is_available());
        assert_eq!(cycle.last_error(), None);
    }
}
