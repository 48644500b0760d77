//! [`Pipeline`]: an ordered list of filter instances.

use simpl_filter::{FilterInstance, FilterState};

/// An ordered, exclusively owned list of filter instances.
///
/// Pipelines are edited only between runs; the runner borrows the
/// pipeline mutably for the duration of a run.
#[derive(Debug, Default)]
pub struct Pipeline {
    name: String,
    instances: Vec<FilterInstance>,
}

impl Pipeline {
    /// An empty pipeline.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            instances: Vec::new(),
        }
    }

    /// Pipeline name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Rename the pipeline.
    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    /// Append a filter.
    pub fn push(&mut self, filter: impl Into<FilterInstance>) {
        self.instances.push(filter.into());
    }

    /// Builder-style [`push`](Self::push).
    pub fn with(mut self, filter: impl Into<FilterInstance>) -> Self {
        self.push(filter);
        self
    }

    /// Insert a filter at `index`, shifting later filters.
    ///
    /// Returns `false` (and drops nothing) if `index > len`.
    pub fn insert(&mut self, index: usize, filter: impl Into<FilterInstance>) -> bool {
        if index > self.instances.len() {
            return false;
        }
        self.instances.insert(index, filter.into());
        true
    }

    /// Remove the filter at `index`.
    pub fn remove(&mut self, index: usize) -> Option<FilterInstance> {
        (index < self.instances.len()).then(|| self.instances.remove(index))
    }

    /// Number of filters, enabled or not.
    pub fn len(&self) -> usize {
        self.instances.len()
    }

    /// Whether the pipeline has no filters.
    pub fn is_empty(&self) -> bool {
        self.instances.is_empty()
    }

    /// Filters in order.
    pub fn filters(&self) -> &[FilterInstance] {
        &self.instances
    }

    /// Filters in order, mutably.
    pub fn filters_mut(&mut self) -> &mut [FilterInstance] {
        &mut self.instances
    }

    /// Filter at `index`.
    pub fn get(&self, index: usize) -> Option<&FilterInstance> {
        self.instances.get(index)
    }

    /// Filter at `index`, mutably.
    pub fn get_mut(&mut self, index: usize) -> Option<&mut FilterInstance> {
        self.instances.get_mut(index)
    }

    /// Enable or disable the filter at `index`. Returns `false` if there is
    /// no such filter.
    pub fn set_enabled(&mut self, index: usize, enabled: bool) -> bool {
        match self.instances.get_mut(index) {
            Some(inst) => {
                inst.set_enabled(enabled);
                true
            }
            None => false,
        }
    }

    /// Number of enabled filters.
    pub fn enabled_count(&self) -> usize {
        self.instances.iter().filter(|i| i.is_enabled()).count()
    }

    /// State of every filter, in order.
    pub fn states(&self) -> Vec<FilterState> {
        self.instances.iter().map(FilterInstance::state).collect()
    }
}
