//! [`PipelineRunner`]: preflight and execute a [`Pipeline`].

use std::error::Error;
use std::fmt;
use std::time::Instant;

use simpl_core::FilterError;
use simpl_data::DataContainerArray;
use simpl_filter::{
    CancelToken, ExecuteOutcome, FinishStatus, NullObserver, PipelineEvent, PipelineObserver,
};

use crate::metrics::RunMetrics;
use crate::pipeline::Pipeline;

// ── Errors ─────────────────────────────────────────────────────────

/// A pipeline run stopped at a failing filter.
#[derive(Clone, Debug, PartialEq)]
pub enum PipelineError {
    /// A filter failed its preflight. No filter was executed.
    PreflightFailed {
        /// Index of the failing filter.
        index: usize,
        /// Its name.
        filter: String,
        /// The filter's error.
        error: FilterError,
    },
    /// A filter failed during execute. Filters before it ran and their
    /// changes remain.
    ExecuteFailed {
        /// Index of the failing filter.
        index: usize,
        /// Its name.
        filter: String,
        /// The filter's error.
        error: FilterError,
        /// Number of filters that completed before the failure.
        executed: usize,
    },
}

impl PipelineError {
    /// Index of the failing filter.
    pub fn index(&self) -> usize {
        match self {
            Self::PreflightFailed { index, .. } | Self::ExecuteFailed { index, .. } => *index,
        }
    }

    /// Name of the failing filter.
    pub fn filter(&self) -> &str {
        match self {
            Self::PreflightFailed { filter, .. } | Self::ExecuteFailed { filter, .. } => filter,
        }
    }

    /// The filter's error.
    pub fn error(&self) -> &FilterError {
        match self {
            Self::PreflightFailed { error, .. } | Self::ExecuteFailed { error, .. } => error,
        }
    }

    /// The filter's error code.
    pub fn code(&self) -> i32 {
        self.error().code
    }

    /// Filters that completed execute before the failure.
    pub fn executed(&self) -> usize {
        match self {
            Self::PreflightFailed { .. } => 0,
            Self::ExecuteFailed { executed, .. } => *executed,
        }
    }
}

impl fmt::Display for PipelineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "stopped at filter {} ({}) with code {}: {}",
            self.index(),
            self.filter(),
            self.code(),
            self.error().message
        )
    }
}

impl Error for PipelineError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        Some(self.error())
    }
}

// ── Report ─────────────────────────────────────────────────────────

/// How a run that did not fail ended.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RunStatus {
    /// Every enabled filter executed.
    Completed,
    /// The filter at `index` observed cancellation. Later filters did not
    /// run.
    Cancelled {
        /// Index of the cancelled filter.
        index: usize,
        /// Its name.
        filter: String,
    },
}

/// Summary of a run that did not fail.
#[derive(Clone, Debug, PartialEq)]
pub struct RunReport {
    /// Outcome.
    pub status: RunStatus,
    /// Filters that completed execute.
    pub executed: usize,
    /// Indices of disabled filters.
    pub skipped: Vec<usize>,
    /// Filters in the pipeline, enabled or not.
    pub total: usize,
    /// Timings.
    pub metrics: RunMetrics,
}

impl RunReport {
    /// Whether every enabled filter executed.
    pub fn is_completed(&self) -> bool {
        self.status == RunStatus::Completed
    }
}

// ── Runner ─────────────────────────────────────────────────────────

/// Runs pipelines.
///
/// Holds the observer that receives every [`PipelineEvent`] and the
/// [`CancelToken`] filters poll. The token is never reset by the runner;
/// a token cancelled before [`run`](Self::run) stops the first enabled
/// filter.
///
/// # Examples
///
/// ```ignore
/// let mut runner = PipelineRunner::new().with_observer(TracingObserver);
/// let cancel = runner.cancel_token();
/// let report = runner.run(&mut pipeline, &mut dca)?;
/// ```
pub struct PipelineRunner {
    observer: Box<dyn PipelineObserver>,
    cancel: CancelToken,
    last_metrics: RunMetrics,
}

impl Default for PipelineRunner {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for PipelineRunner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PipelineRunner")
            .field("cancel", &self.cancel)
            .field("last_metrics", &self.last_metrics)
            .finish_non_exhaustive()
    }
}

impl PipelineRunner {
    /// A runner with a [`NullObserver`] and a fresh token.
    pub fn new() -> Self {
        Self {
            observer: Box::new(NullObserver),
            cancel: CancelToken::new(),
            last_metrics: RunMetrics::default(),
        }
    }

    /// Replace the observer.
    pub fn with_observer(mut self, observer: impl PipelineObserver + 'static) -> Self {
        self.observer = Box::new(observer);
        self
    }

    /// Share an existing cancel token.
    pub fn with_cancel_token(mut self, cancel: CancelToken) -> Self {
        self.cancel = cancel;
        self
    }

    /// A clone of the runner's cancel token, for another thread.
    pub fn cancel_token(&self) -> CancelToken {
        self.cancel.clone()
    }

    /// Metrics of the most recent [`run`](Self::run).
    pub fn last_metrics(&self) -> &RunMetrics {
        &self.last_metrics
    }

    /// Preflight every enabled filter against a schema-only copy of
    /// `input` and return that copy.
    ///
    /// `input` itself is never touched, so preflight can be repeated.
    pub fn preflight(
        &mut self,
        pipeline: &mut Pipeline,
        input: &DataContainerArray,
    ) -> Result<DataContainerArray, PipelineError> {
        self.observer.on_event(&PipelineEvent::AboutToPreflight {
            pipeline: pipeline.name().to_string(),
            filters: pipeline.len(),
        });
        let mut dca = input.schema_clone();
        let result = self.preflight_into(pipeline, &mut dca);
        self.observer.on_event(&PipelineEvent::PreflightDone {
            pipeline: pipeline.name().to_string(),
            error_code: result.as_ref().err().map(PipelineError::code),
        });
        result.map(|()| dca)
    }

    fn preflight_into(
        &self,
        pipeline: &mut Pipeline,
        dca: &mut DataContainerArray,
    ) -> Result<(), PipelineError> {
        for (index, inst) in pipeline.filters_mut().iter_mut().enumerate() {
            if !inst.is_enabled() {
                tracing::debug!(index, filter = %inst.name(), "skipping disabled filter");
                continue;
            }
            inst.preflight(dca, self.observer.as_ref(), index)
                .map_err(|error| PipelineError::PreflightFailed {
                    index,
                    filter: inst.name().to_string(),
                    error,
                })?;
        }
        Ok(())
    }

    /// Preflight, then execute every enabled filter on `dca` in order.
    ///
    /// Stops at the first failure or cancellation. Changes made by filters
    /// that already ran are kept.
    pub fn run(
        &mut self,
        pipeline: &mut Pipeline,
        dca: &mut DataContainerArray,
    ) -> Result<RunReport, PipelineError> {
        let start = Instant::now();
        let name = pipeline.name().to_string();
        tracing::info!(pipeline = %name, filters = pipeline.len(), "running pipeline");

        let mut metrics = RunMetrics::default();
        let preflight = self.preflight(pipeline, dca);
        metrics.preflight_us = start.elapsed().as_micros() as u64;
        if let Err(e) = preflight {
            self.finish(&name, 0, FinishStatus::Failed {
                index: e.index(),
                code: e.code(),
            });
            metrics.total_us = start.elapsed().as_micros() as u64;
            self.last_metrics = metrics;
            return Err(e);
        }

        let total = pipeline.len();
        let mut executed = 0;
        let mut skipped = Vec::new();
        let mut status = RunStatus::Completed;

        for (index, inst) in pipeline.filters_mut().iter_mut().enumerate() {
            if !inst.is_enabled() {
                skipped.push(index);
                continue;
            }
            let filter_start = Instant::now();
            match inst.execute(dca, &self.cancel, self.observer.as_ref(), index) {
                Ok(ExecuteOutcome::Completed) => {
                    executed += 1;
                    metrics.filter_us.push((
                        inst.name().to_string(),
                        filter_start.elapsed().as_micros() as u64,
                    ));
                }
                Ok(ExecuteOutcome::Cancelled) => {
                    tracing::info!(pipeline = %name, index, filter = %inst.name(), "pipeline cancelled");
                    status = RunStatus::Cancelled {
                        index,
                        filter: inst.name().to_string(),
                    };
                    break;
                }
                Err(error) => {
                    let err = PipelineError::ExecuteFailed {
                        index,
                        filter: inst.name().to_string(),
                        error,
                        executed,
                    };
                    self.finish(&name, executed, FinishStatus::Failed {
                        index,
                        code: err.code(),
                    });
                    metrics.total_us = start.elapsed().as_micros() as u64;
                    metrics.memory_bytes = dca.memory_bytes();
                    self.last_metrics = metrics;
                    return Err(err);
                }
            }
        }

        if let Err(e) = dca.validate() {
            tracing::warn!(pipeline = %name, code = e.code(), "data structure invalid after run: {e}");
        }

        let finish = match &status {
            RunStatus::Completed => FinishStatus::Completed,
            RunStatus::Cancelled { index, .. } => FinishStatus::Cancelled { index: *index },
        };
        self.finish(&name, executed, finish);

        metrics.total_us = start.elapsed().as_micros() as u64;
        metrics.memory_bytes = dca.memory_bytes();
        self.last_metrics = metrics.clone();
        tracing::info!(
            pipeline = %name,
            executed,
            total_us = metrics.total_us,
            "pipeline finished"
        );

        Ok(RunReport {
            status,
            executed,
            skipped,
            total,
            metrics,
        })
    }

    fn finish(&self, pipeline: &str, executed: usize, status: FinishStatus) {
        self.observer.on_event(&PipelineEvent::PipelineFinished {
            pipeline: pipeline.to_string(),
            executed,
            status,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use simpl_core::ErrorKind;

    #[test]
    fn error_display_names_filter_and_code() {
        let err = PipelineError::ExecuteFailed {
            index: 2,
            filter: "ScaleDataArray".into(),
            error: FilterError::not_found(-10012, "array 'C/M/X' not found"),
            executed: 2,
        };
        assert_eq!(err.code(), -10012);
        assert_eq!(err.executed(), 2);
        assert_eq!(err.error().kind, ErrorKind::NotFound);
        assert_eq!(
            err.to_string(),
            "stopped at filter 2 (ScaleDataArray) with code -10012: array 'C/M/X' not found"
        );
        assert!(err.source().is_some());
    }

    #[test]
    fn empty_pipeline_completes() {
        let mut runner = PipelineRunner::new();
        let mut pipeline = Pipeline::new("empty");
        let mut dca = DataContainerArray::new();
        let report = runner.run(&mut pipeline, &mut dca).unwrap();
        assert!(report.is_completed());
        assert_eq!(report.executed, 0);
        assert_eq!(report.total, 0);
        assert_eq!(runner.last_metrics(), &report.metrics);
    }
}
