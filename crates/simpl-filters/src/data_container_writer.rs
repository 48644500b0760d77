//! Write the container array to a JSON data file.

use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::PathBuf;

use simpl_core::{FilterError, ParameterError};
use simpl_filter::{
    parameter::unknown_parameter, ExecuteOutcome, Filter, FilterContext, ParameterKind,
    ParameterSpec, ParameterValue,
};

/// `OutputFile` is empty.
pub const OUTPUT_FILE_NOT_SET: i32 = -11040;
/// Writing `OutputFile` failed.
pub const OUTPUT_FILE_UNWRITABLE: i32 = -11041;

/// Writes the whole container array to `OutputFile` as JSON. Missing
/// parent directories are created.
#[derive(Clone, Debug, Default)]
pub struct DataContainerWriter {
    output: PathBuf,
}

impl DataContainerWriter {
    /// Registry name.
    pub const NAME: &'static str = "DataContainerWriter";

    /// Write to `output`.
    pub fn new(output: impl Into<PathBuf>) -> Self {
        Self {
            output: output.into(),
        }
    }

    fn write(&self, ctx: &FilterContext<'_>) -> Result<(), FilterError> {
        let unwritable = |reason: String| {
            FilterError::configuration(
                OUTPUT_FILE_UNWRITABLE,
                format!("cannot write {}: {reason}", self.output.display()),
            )
        };
        if let Some(parent) = self.output.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| unwritable(e.to_string()))?;
        }
        let file = File::create(&self.output).map_err(|e| unwritable(e.to_string()))?;
        let mut out = BufWriter::new(file);
        serde_json::to_writer_pretty(&mut out, ctx.dca()).map_err(|e| unwritable(e.to_string()))?;
        out.flush().map_err(|e| unwritable(e.to_string()))?;
        tracing::info!(path = %self.output.display(), "wrote data file");
        Ok(())
    }
}

impl Filter for DataContainerWriter {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn human_label(&self) -> &str {
        "Write DREAM3D Data File"
    }

    fn group(&self) -> &str {
        "IO"
    }

    fn parameter_specs(&self) -> Vec<ParameterSpec> {
        vec![ParameterSpec::new("OutputFile", "Output File", ParameterKind::FilePath)]
    }

    fn parameter(&self, key: &str) -> Option<ParameterValue> {
        match key {
            "OutputFile" => Some(self.output.clone().into()),
            _ => None,
        }
    }

    fn set_parameter(&mut self, key: &str, value: ParameterValue) -> Result<(), ParameterError> {
        match key {
            "OutputFile" => self.output = value.extract(key)?,
            _ => return Err(unknown_parameter(Self::NAME, key)),
        }
        Ok(())
    }

    fn data_check(&mut self, _ctx: &mut FilterContext<'_>) -> Result<(), FilterError> {
        if self.output.as_os_str().is_empty() {
            return Err(FilterError::configuration(
                OUTPUT_FILE_NOT_SET,
                "The output file must be set",
            ));
        }
        Ok(())
    }

    fn execute(&mut self, ctx: &mut FilterContext<'_>) -> Result<ExecuteOutcome, FilterError> {
        ctx.notify_status(format!("writing {}", self.output.display()));
        self.write(ctx)?;
        Ok(ExecuteOutcome::Completed)
    }
}
