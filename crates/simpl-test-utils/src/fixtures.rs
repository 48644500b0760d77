//! Reusable filter fixtures.
//!
//! - [`RecordingFilter`]: logs every phase it runs into a shared
//!   [`CallLog`].
//! - [`FailingFilter`]: fails in the phase it is told to.
//! - [`CancelTrigger`]: sets a cancel token when it executes.

use std::sync::{Arc, Mutex};

use simpl_core::{FilterError, ParameterError};
use simpl_filter::{
    parameter::unknown_parameter, CancelToken, ExecuteOutcome, Filter, FilterContext,
    ParameterSpec, ParameterValue, RunMode,
};

/// Shared, ordered record of `"name:phase"` entries.
#[derive(Clone, Debug, Default)]
pub struct CallLog(Arc<Mutex<Vec<String>>>);

impl CallLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&self, entry: String) {
        if let Ok(mut log) = self.0.lock() {
            log.push(entry);
        }
    }

    pub fn entries(&self) -> Vec<String> {
        self.0.lock().map(|l| l.clone()).unwrap_or_default()
    }

    /// Entries for one filter name.
    pub fn for_filter(&self, name: &str) -> Vec<String> {
        let prefix = format!("{name}:");
        self.entries()
            .into_iter()
            .filter(|e| e.starts_with(&prefix))
            .collect()
    }
}

fn phase(mode: RunMode) -> &'static str {
    match mode {
        RunMode::Preflight => "preflight",
        RunMode::Execute => "data_check",
    }
}

/// Records `name:preflight`, `name:data_check` and `name:execute`, and
/// otherwise does nothing.
pub struct RecordingFilter {
    pub name: String,
    pub log: CallLog,
}

impl RecordingFilter {
    pub fn new(name: impl Into<String>, log: &CallLog) -> Self {
        Self {
            name: name.into(),
            log: log.clone(),
        }
    }
}

impl Filter for RecordingFilter {
    fn name(&self) -> &str {
        &self.name
    }

    fn human_label(&self) -> &str {
        "Recording Filter"
    }

    fn parameter_specs(&self) -> Vec<ParameterSpec> {
        Vec::new()
    }

    fn parameter(&self, _key: &str) -> Option<ParameterValue> {
        None
    }

    fn set_parameter(&mut self, key: &str, _value: ParameterValue) -> Result<(), ParameterError> {
        Err(unknown_parameter(&self.name, key))
    }

    fn data_check(&mut self, ctx: &mut FilterContext<'_>) -> Result<(), FilterError> {
        self.log.push(format!("{}:{}", self.name, phase(ctx.mode())));
        Ok(())
    }

    fn execute(&mut self, _ctx: &mut FilterContext<'_>) -> Result<ExecuteOutcome, FilterError> {
        self.log.push(format!("{}:execute", self.name));
        Ok(ExecuteOutcome::Completed)
    }
}

/// Fails with `code` in `fail_in`, recording its calls like
/// [`RecordingFilter`].
pub struct FailingFilter {
    pub name: String,
    pub fail_in: RunMode,
    pub code: i32,
    pub log: CallLog,
}

impl FailingFilter {
    pub fn new(name: impl Into<String>, fail_in: RunMode, code: i32, log: &CallLog) -> Self {
        Self {
            name: name.into(),
            fail_in,
            code,
            log: log.clone(),
        }
    }
}

impl Filter for FailingFilter {
    fn name(&self) -> &str {
        &self.name
    }

    fn human_label(&self) -> &str {
        "Failing Filter"
    }

    fn parameter_specs(&self) -> Vec<ParameterSpec> {
        Vec::new()
    }

    fn parameter(&self, _key: &str) -> Option<ParameterValue> {
        None
    }

    fn set_parameter(&mut self, key: &str, _value: ParameterValue) -> Result<(), ParameterError> {
        Err(unknown_parameter(&self.name, key))
    }

    fn data_check(&mut self, ctx: &mut FilterContext<'_>) -> Result<(), FilterError> {
        self.log.push(format!("{}:{}", self.name, phase(ctx.mode())));
        if ctx.is_preflight() && self.fail_in == RunMode::Preflight {
            return Err(FilterError::configuration(self.code, "deliberate preflight failure"));
        }
        Ok(())
    }

    fn execute(&mut self, _ctx: &mut FilterContext<'_>) -> Result<ExecuteOutcome, FilterError> {
        self.log.push(format!("{}:execute", self.name));
        if self.fail_in == RunMode::Execute {
            return Err(FilterError::allocation(self.code, "deliberate execute failure"));
        }
        Ok(ExecuteOutcome::Completed)
    }
}

/// Executes successfully, then cancels `token`, so the next filter sees
/// the flag before it executes.
pub struct CancelTrigger {
    pub name: String,
    pub token: CancelToken,
    pub log: CallLog,
}

impl CancelTrigger {
    pub fn new(name: impl Into<String>, token: &CancelToken, log: &CallLog) -> Self {
        Self {
            name: name.into(),
            token: token.clone(),
            log: log.clone(),
        }
    }
}

impl Filter for CancelTrigger {
    fn name(&self) -> &str {
        &self.name
    }

    fn human_label(&self) -> &str {
        "Cancel Trigger"
    }

    fn parameter_specs(&self) -> Vec<ParameterSpec> {
        Vec::new()
    }

    fn parameter(&self, _key: &str) -> Option<ParameterValue> {
        None
    }

    fn set_parameter(&mut self, key: &str, _value: ParameterValue) -> Result<(), ParameterError> {
        Err(unknown_parameter(&self.name, key))
    }

    fn data_check(&mut self, ctx: &mut FilterContext<'_>) -> Result<(), FilterError> {
        self.log.push(format!("{}:{}", self.name, phase(ctx.mode())));
        Ok(())
    }

    fn execute(&mut self, _ctx: &mut FilterContext<'_>) -> Result<ExecuteOutcome, FilterError> {
        self.log.push(format!("{}:execute", self.name));
        self.token.cancel();
        Ok(ExecuteOutcome::Completed)
    }
}
