//! Test utilities for SIMPL development.
//!
//! Provides fixture filters ([`fixtures`]), a [`RecordingObserver`] that
//! keeps every pipeline event, and builders for small container arrays.

#![forbid(unsafe_code)]
#![allow(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

pub mod fixtures;

pub use fixtures::{CallLog, CancelTrigger, FailingFilter, RecordingFilter};

use std::sync::{Arc, Mutex};

use simpl_core::{AttributeMatrixType, DataArrayPath};
use simpl_data::DataContainerArray;
use simpl_filter::{PipelineEvent, PipelineObserver};

/// Container array with container `C`, generic matrix `C/M` of `tuples`
/// tuples, and a single-component `f32` array `C/M/X` holding
/// `0, 1, 2, ...`.
pub fn sample_dca(tuples: usize) -> DataContainerArray {
    let mut dca = DataContainerArray::new();
    dca.create_non_prereq_data_container("C")
        .expect("container");
    dca.create_non_prereq_attribute_matrix(
        &DataArrayPath::for_matrix("C", "M"),
        AttributeMatrixType::Generic,
        &[tuples],
    )
    .expect("matrix");
    let x = dca
        .create_array::<f32>(&DataArrayPath::new("C", "M", "X"), &[1], 0.0)
        .expect("array");
    for (i, v) in x.as_mut_slice().iter_mut().enumerate() {
        *v = i as f32;
    }
    dca
}

/// Keeps every event it receives. Clones share the same buffer, so one
/// clone can be handed to a runner and another inspected afterwards.
#[derive(Clone, Debug, Default)]
pub struct RecordingObserver {
    events: Arc<Mutex<Vec<PipelineEvent>>>,
}

impl RecordingObserver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Everything recorded so far.
    pub fn events(&self) -> Vec<PipelineEvent> {
        self.events.lock().map(|e| e.clone()).unwrap_or_default()
    }

    /// Variant names of the recorded events, in order.
    pub fn kinds(&self) -> Vec<&'static str> {
        self.events().iter().map(event_kind).collect()
    }

    pub fn clear(&self) {
        if let Ok(mut e) = self.events.lock() {
            e.clear();
        }
    }
}

impl PipelineObserver for RecordingObserver {
    fn on_event(&self, event: &PipelineEvent) {
        if let Ok(mut e) = self.events.lock() {
            e.push(event.clone());
        }
    }
}

/// Variant name of an event.
pub fn event_kind(event: &PipelineEvent) -> &'static str {
    match event {
        PipelineEvent::AboutToPreflight { .. } => "AboutToPreflight",
        PipelineEvent::PreflightDone { .. } => "PreflightDone",
        PipelineEvent::FilterStarted { .. } => "FilterStarted",
        PipelineEvent::Status { .. } => "Status",
        PipelineEvent::Progress { .. } => "Progress",
        PipelineEvent::Warning { .. } => "Warning",
        PipelineEvent::Error { .. } => "Error",
        PipelineEvent::FilterFinished { .. } => "FilterFinished",
        PipelineEvent::Cancelled { .. } => "Cancelled",
        PipelineEvent::PipelineFinished { .. } => "PipelineFinished",
    }
}
