//! Pipelines and the pipeline runner for the SIMPL engine.
//!
//! A [`Pipeline`] is an ordered list of
//! [`FilterInstance`](simpl_filter::FilterInstance)s. A [`PipelineRunner`]
//! preflights it against a schema-only copy of the input, then executes
//! every enabled filter in order against the real
//! [`DataContainerArray`](simpl_data::DataContainerArray), stopping at the
//! first failure or cancellation. Nothing is rolled back: the mutations of
//! filters that ran before a failure remain.
//!
//! [`PipelineFile`] loads and saves pipelines as JSON.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod config;
pub mod metrics;
pub mod pipeline;
pub mod runner;

pub use config::{ConfigError, FilterEntry, PipelineFile};
pub use metrics::RunMetrics;
pub use pipeline::Pipeline;
pub use runner::{PipelineError, PipelineRunner, RunReport, RunStatus};
