//! Cancel-and-restart debouncing
//!
//! A [`Debouncer`] forwards only the last value of a burst. Every trigger
//! cancels the pending timer and starts a new one; when a timer runs out its
//! value is sent on the output channel.

use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::debug;

use crate::constants::ui;

/// Debounces values onto an mpsc channel
///
/// Must be used from within a tokio runtime.
#[derive(Debug)]
pub struct Debouncer<T> {
    quantum: Duration,
    output: mpsc::Sender<T>,
    pending: Option<JoinHandle<()>>,
}

impl<T: Send + 'static> Debouncer<T> {
    /// Create a debouncer with the default 120ms quantum
    pub fn new(output: mpsc::Sender<T>) -> Self {
        Self::with_quantum(ui::DEBOUNCE_QUANTUM, output)
    }

    /// Create a debouncer with a custom quantum
    pub fn with_quantum(quantum: Duration, output: mpsc::Sender<T>) -> Self {
        Self {
            quantum,
            output,
            pending: None,
        }
    }

    /// Schedule `value`, cancelling any value still waiting
    pub fn trigger(&mut self, value: T) {
        if let Some(handle) = self.pending.take() {
            if !handle.is_finished() {
                debug!("Debounce restarted");
            }
            handle.abort();
        }

        let quantum = self.quantum;
        let output = self.output.clone();
        self.pending = Some(tokio::spawn(async move {
            tokio::time::sleep(quantum).await;
            if output.send(value).await.is_err() {
                debug!("Debounce output closed, dropping value");
            }
        }));
    }

    /// Drop the pending value, if any
    pub fn cancel(&mut self) {
        if let Some(handle) = self.pending.take() {
            handle.abort();
        }
    }

    /// True while a value is waiting for its timer
    pub fn is_pending(&self) -> bool {
        self.pending.as_ref().is_some_and(|h| !h.is_finished())
    }

    /// Configured quantum
    pub fn quantum(&self) -> Duration {
        self.quantum
    }
}

impl<T> Drop for Debouncer<T> {
    fn drop(&mut self) {
        if let Some(handle) = self.pending.take() {
            handle.abort();
        }
    }
}
