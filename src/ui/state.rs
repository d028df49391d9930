//! Frame-local UI state
//!
//! Everything the renderer needs beyond the controller's session snapshot:
//! in-flight request indicators, the evaluation report once it arrives, and
//! the transient error banner.

use std::time::{Duration, Instant};

use crate::service::EvaluationEntry;

pub struct UiState {
    /// Current error banner text and when it was set
    last_error: Option<(String, Instant)>,
    /// How long the banner stays visible
    error_clear_after: Duration,

    /// Session configuration request in flight
    pub configuring: bool,
    /// Question request in flight
    pub awaiting_turn: bool,
    /// Evaluation report request in flight
    pub loading_evaluation: bool,

    /// The evaluation report, once loaded
    pub report: Option<Vec<EvaluationEntry>>,
}

impl UiState {
    pub fn new(error_clear_after: Duration) -> Self {
        Self {
            last_error: None,
            error_clear_after,
            configuring: false,
            awaiting_turn: false,
            loading_evaluation: false,
            report: None,
        }
    }

    /// Show an error banner; a newer error replaces the current one and
    /// restarts the clock.
    pub fn set_error(&mut self, message: impl Into<String>) {
        self.last_error = Some((message.into(), Instant::now()));
    }

    /// The currently visible error, expiring stale ones as a side effect
    pub fn visible_error(&mut self, now: Instant) -> Option<&str> {
        if let Some((_, since)) = &self.last_error {
            if now.duration_since(*since) >= self.error_clear_after {
                self.last_error = None;
            }
        }
        self.last_error.as_ref().map(|(msg, _)| msg.as_str())
    }

    pub fn busy(&self) -> bool {
        self.configuring || self.awaiting_turn || self.loading_evaluation
    }
}
