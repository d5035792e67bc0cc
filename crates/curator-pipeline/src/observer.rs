//! Progress reporting for pipeline runs
//!
//! The pipeline emits one [`PipelineEvent`] per step. Observers decide what
//! to do with them: nothing, a log line, or a status snapshot a front-end can
//! poll.

use crate::outcome::{DocumentOutcome, RunSummary};
use serde::Serialize;
use std::sync::{Arc, Mutex, MutexGuard};
use tokio_util::sync::CancellationToken;
use tracing::info;

/// A single progress event
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PipelineEvent {
    /// A run over `total` documents started
    RunStarted {
        /// Documents in the run
        total: usize,
    },

    /// Processing of a document started
    DocumentStarted {
        /// 1-based position
        index: usize,
        /// Documents in the run
        total: usize,
        /// File being processed
        file_name: String,
    },

    /// A document finished
    DocumentFinished {
        /// 1-based position
        index: usize,
        /// Documents in the run
        total: usize,
        /// File that was processed
        file_name: String,
        /// What happened to it
        outcome: DocumentOutcome,
        /// Percentage of documents handled so far
        progress: u8,
    },

    /// Pausing between batches
    CooldownStarted {
        /// Documents handled so far
        handled: usize,
        /// Pause length
        seconds: u64,
    },

    /// The run stopped on cancellation
    Cancelled {
        /// Documents handled before stopping
        handled: usize,
    },

    /// The run ended
    RunFinished {
        /// Final counters
        summary: RunSummary,
    },
}

/// Receives pipeline progress
pub trait PipelineObserver: Send + Sync {
    /// Handle one event. Called on the pipeline thread.
    fn on_event(&self, event: &PipelineEvent);
}

/// Ignores all events
pub struct NoopObserver;

impl PipelineObserver for NoopObserver {
    fn on_event(&self, _event: &PipelineEvent) {}
}

/// Logs events through `tracing`
pub struct TracingObserver;

impl PipelineObserver for TracingObserver {
    fn on_event(&self, event: &PipelineEvent) {
        match event {
            PipelineEvent::RunStarted { total } => info!("Processing {} document(s)", total),
            PipelineEvent::DocumentStarted {
                index,
                total,
                file_name,
            } => info!("[{}/{}] Processing {}", index, total, file_name),
            PipelineEvent::DocumentFinished {
                file_name,
                outcome,
                progress,
                ..
            } => info!("{} -> {} ({}%)", file_name, outcome.label(), progress),
            PipelineEvent::CooldownStarted { handled, seconds } => {
                info!("Handled {} document(s), pausing {}s", handled, seconds)
            }
            PipelineEvent::Cancelled { handled } => {
                info!("Cancelled after {} document(s)", handled)
            }
            PipelineEvent::RunFinished { summary } => info!(
                "Run finished: {} recorded, {} irrelevant, {} failed",
                summary.recorded, summary.irrelevant, summary.failed
            ),
        }
    }
}

/// Snapshot of a run for status displays
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct StatusSnapshot {
    /// A run is in progress
    pub running: bool,
    /// Percentage of documents handled
    pub progress: u8,
    /// Documents handled
    pub processed: usize,
    /// Documents recorded
    pub recorded: usize,
    /// Documents classified irrelevant
    pub irrelevant: usize,
    /// Documents that failed
    pub failed: usize,
    /// File currently being processed
    pub current: Option<String>,
    /// Latest human-readable status line
    pub message: String,
}

/// Shared run status with a stop switch
///
/// Clones share state, so one handle can observe the pipeline while another
/// is polled or used to stop the run.
#[derive(Debug, Clone)]
pub struct StatusBoard {
    state: Arc<Mutex<StatusSnapshot>>,
    cancel: CancellationToken,
}

fn lock(state: &Mutex<StatusSnapshot>) -> MutexGuard<'_, StatusSnapshot> {
    state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

impl StatusBoard {
    /// Create a board that stops runs through `cancel`
    pub fn new(cancel: CancellationToken) -> Self {
        Self {
            state: Arc::new(Mutex::new(StatusSnapshot::default())),
            cancel,
        }
    }

    /// Current status
    pub fn snapshot(&self) -> StatusSnapshot {
        lock(&self.state).clone()
    }

    /// Ask the running pipeline to stop
    pub fn stop(&self) {
        self.cancel.cancel();
        lock(&self.state).message = "Stop requested".to_string();
    }
}

impl PipelineObserver for StatusBoard {
    fn on_event(&self, event: &PipelineEvent) {
        let mut state = lock(&self.state);
        match event {
            PipelineEvent::RunStarted { total } => {
                *state = StatusSnapshot {
                    running: true,
                    message: format!("Processing {} document(s)", total),
                    ..StatusSnapshot::default()
                };
            }
            PipelineEvent::DocumentStarted {
                index,
                total,
                file_name,
            } => {
                state.current = Some(file_name.clone());
                state.message = format!("[{}/{}] {}", index, total, file_name);
            }
            PipelineEvent::DocumentFinished {
                outcome, progress, ..
            } => {
                state.processed += 1;
                state.progress = *progress;
                match outcome {
                    DocumentOutcome::Recorded { .. } => state.recorded += 1,
                    DocumentOutcome::Irrelevant { .. } => state.irrelevant += 1,
                    DocumentOutcome::Failed { .. } => state.failed += 1,
                    _ => {}
                }
            }
            PipelineEvent::CooldownStarted { handled, seconds } => {
                state.message = format!("Handled {}, pausing {}s", handled, seconds);
            }
            PipelineEvent::Cancelled { handled } => {
                state.message = format!("Stopped after {} document(s)", handled);
            }
            PipelineEvent::RunFinished { .. } => {
                state.running = false;
                state.current = None;
                if !self.cancel.is_cancelled() {
                    state.message = "Finished".to_string();
                }
            }
        }
    }
}
