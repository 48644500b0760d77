//! Timing metrics for a pipeline run.

/// Timing and memory figures collected during one [`run`].
///
/// All durations are in microseconds.
///
/// [`run`]: crate::PipelineRunner::run
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RunMetrics {
    /// Wall-clock time for the whole run.
    pub total_us: u64,
    /// Time spent in the preflight phase.
    pub preflight_us: u64,
    /// Execute time per executed filter: `(name, microseconds)`.
    pub filter_us: Vec<(String, u64)>,
    /// Bytes held by the container array after the run.
    pub memory_bytes: usize,
}

impl RunMetrics {
    /// Sum of the per-filter execute times.
    pub fn execute_us(&self) -> u64 {
        self.filter_us.iter().map(|(_, us)| us).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_metrics_are_zero() {
        let m = RunMetrics::default();
        assert_eq!(m.total_us, 0);
        assert_eq!(m.preflight_us, 0);
        assert!(m.filter_us.is_empty());
        assert_eq!(m.memory_bytes, 0);
    }

    #[test]
    fn execute_us_sums_filters() {
        let m = RunMetrics {
            filter_us: vec![("A".into(), 10), ("B".into(), 32)],
            ..RunMetrics::default()
        };
        assert_eq!(m.execute_us(), 42);
    }
}
