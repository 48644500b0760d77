//! Subcommand implementations.

pub mod filters;
pub mod preflight;
pub mod run;

use std::error::Error;
use std::fs;
use std::path::Path;

use simpl_data::DataContainerArray;
use simpl_filters::core_registry;
use simpl_pipeline::{Pipeline, PipelineFile};

pub const EXIT_SUCCESS: i32 = 0;
pub const EXIT_FAILURE: i32 = 1;
pub const EXIT_CANCELLED: i32 = 2;

pub type CmdResult = Result<i32, Box<dyn Error>>;

/// Load a pipeline file and build it against the core registry.
pub fn load_pipeline(path: &Path) -> Result<Pipeline, Box<dyn Error>> {
    let file = PipelineFile::load(path)?;
    let pipeline = file.build(&core_registry())?;
    tracing::debug!(pipeline = %pipeline.name(), filters = pipeline.len(), "built pipeline");
    Ok(pipeline)
}

/// Read a data file, or start from an empty structure.
pub fn load_data(path: Option<&Path>) -> Result<DataContainerArray, Box<dyn Error>> {
    let Some(path) = path else {
        return Ok(DataContainerArray::new());
    };
    let text = fs::read_to_string(path).map_err(|e| format!("{}: {e}", path.display()))?;
    let dca: DataContainerArray = serde_json::from_str(&text)?;
    dca.validate()?;
    Ok(dca)
}
