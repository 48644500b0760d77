//! Pipeline events and observers.
//!
//! Filters and the runner report what they are doing through a
//! [`PipelineObserver`]. Observers are called synchronously on the thread
//! running the pipeline; [`ChannelObserver`] forwards events to another
//! thread.

use crossbeam_channel::{Receiver, Sender};

use crate::context::RunMode;

/// How a pipeline run ended.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum FinishStatus {
    /// Every enabled filter executed.
    Completed,
    /// A filter failed with this code.
    Failed {
        /// Index of the failing filter.
        index: usize,
        /// Its error code.
        code: i32,
    },
    /// A filter observed cancellation.
    Cancelled {
        /// Index of the cancelled filter.
        index: usize,
    },
}

/// Something that happened during a pipeline run.
#[derive(Clone, Debug, PartialEq)]
pub enum PipelineEvent {
    /// Preflight is about to start.
    AboutToPreflight {
        /// Pipeline name.
        pipeline: String,
        /// Number of filters in the pipeline.
        filters: usize,
    },
    /// Preflight finished, successfully or not.
    PreflightDone {
        /// Pipeline name.
        pipeline: String,
        /// Code of the first failure, if any.
        error_code: Option<i32>,
    },
    /// A filter entered a phase.
    FilterStarted {
        /// Filter index in the pipeline.
        index: usize,
        /// Filter name.
        filter: String,
        /// Phase.
        mode: RunMode,
    },
    /// Free-form status message from a filter.
    Status {
        /// Filter index.
        index: usize,
        /// Filter name.
        filter: String,
        /// Message.
        message: String,
    },
    /// Progress of a running filter.
    Progress {
        /// Filter index.
        index: usize,
        /// Filter name.
        filter: String,
        /// Units of work done.
        completed: usize,
        /// Units of work in total.
        total: usize,
    },
    /// A filter reported a warning. Warnings never stop the run.
    Warning {
        /// Filter index.
        index: usize,
        /// Filter name.
        filter: String,
        /// Warning code.
        code: i32,
        /// Message.
        message: String,
    },
    /// A filter failed.
    Error {
        /// Filter index.
        index: usize,
        /// Filter name.
        filter: String,
        /// Phase in which it failed.
        mode: RunMode,
        /// Error code (negative).
        code: i32,
        /// Message.
        message: String,
    },
    /// A filter left a phase.
    FilterFinished {
        /// Filter index.
        index: usize,
        /// Filter name.
        filter: String,
        /// Phase.
        mode: RunMode,
        /// Whether the phase succeeded.
        ok: bool,
    },
    /// A filter stopped because cancellation was requested.
    Cancelled {
        /// Filter index.
        index: usize,
        /// Filter name.
        filter: String,
    },
    /// The run ended.
    PipelineFinished {
        /// Pipeline name.
        pipeline: String,
        /// Filters executed.
        executed: usize,
        /// Outcome.
        status: FinishStatus,
    },
}

/// Receives [`PipelineEvent`]s.
pub trait PipelineObserver: Send + Sync {
    /// Called once per event, in order.
    fn on_event(&self, event: &PipelineEvent);
}

impl<F> PipelineObserver for F
where
    F: Fn(&PipelineEvent) + Send + Sync,
{
    fn on_event(&self, event: &PipelineEvent) {
        self(event)
    }
}

/// Discards every event.
#[derive(Clone, Copy, Debug, Default)]
pub struct NullObserver;

impl PipelineObserver for NullObserver {
    fn on_event(&self, _event: &PipelineEvent) {}
}

/// Forwards every event over a crossbeam channel.
///
/// Sending never blocks the pipeline: events are dropped once the receiver
/// is gone.
#[derive(Clone, Debug)]
pub struct ChannelObserver {
    tx: Sender<PipelineEvent>,
}

impl ChannelObserver {
    /// Wrap an existing sender.
    pub fn new(tx: Sender<PipelineEvent>) -> Self {
        Self { tx }
    }
}

impl PipelineObserver for ChannelObserver {
    fn on_event(&self, event: &PipelineEvent) {
        let _ = self.tx.send(event.clone());
    }
}

/// An unbounded [`ChannelObserver`] and its receiving end.
pub fn channel_observer() -> (ChannelObserver, Receiver<PipelineEvent>) {
    let (tx, rx) = crossbeam_channel::unbounded();
    (ChannelObserver::new(tx), rx)
}

/// Logs every event through `tracing`.
#[derive(Clone, Copy, Debug, Default)]
pub struct TracingObserver;

impl PipelineObserver for TracingObserver {
    fn on_event(&self, event: &PipelineEvent) {
        match event {
            PipelineEvent::AboutToPreflight { pipeline, filters } => {
                tracing::info!(pipeline = %pipeline, filters, "preflight starting");
            }
            PipelineEvent::PreflightDone {
                pipeline,
                error_code,
            } => match error_code {
                Some(code) => tracing::warn!(pipeline = %pipeline, code, "preflight failed"),
                None => tracing::info!(pipeline = %pipeline, "preflight done"),
            },
            PipelineEvent::FilterStarted {
                index,
                filter,
                mode,
            } => {
                tracing::debug!(index, filter = %filter, ?mode, "filter started");
            }
            PipelineEvent::Status {
                index,
                filter,
                message,
            } => {
                tracing::info!(index, filter = %filter, "{message}");
            }
            PipelineEvent::Progress {
                index,
                filter,
                completed,
                total,
            } => {
                tracing::trace!(index, filter = %filter, completed, total, "progress");
            }
            PipelineEvent::Warning {
                index,
                filter,
                code,
                message,
            } => {
                tracing::warn!(index, filter = %filter, code, "{message}");
            }
            PipelineEvent::Error {
                index,
                filter,
                mode,
                code,
                message,
            } => {
                tracing::error!(index, filter = %filter, ?mode, code, "{message}");
            }
            PipelineEvent::FilterFinished {
                index,
                filter,
                mode,
                ok,
            } => {
                tracing::debug!(index, filter = %filter, ?mode, ok, "filter finished");
            }
            PipelineEvent::Cancelled { index, filter } => {
                tracing::warn!(index, filter = %filter, "cancelled");
            }
            PipelineEvent::PipelineFinished {
                pipeline,
                executed,
                status,
            } => {
                tracing::info!(pipeline = %pipeline, executed, ?status, "pipeline finished");
            }
        }
    }
}
