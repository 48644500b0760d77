//! Pipeline files: JSON descriptions of a pipeline.
//!
//! ```json
//! {
//!   "name": "example",
//!   "filters": [
//!     {
//!       "filter": "CreateDataContainer",
//!       "enabled": true,
//!       "parameters": {
//!         "DataContainerName": { "type": "string", "value": "C" }
//!       }
//!     }
//!   ]
//! }
//! ```
//!
//! A file is checked against a [`FilterRegistry`] when it is
//! [built](PipelineFile::build): every filter name must be registered and
//! every parameter must be accepted by its filter.

use std::error::Error;
use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use simpl_core::ParameterError;
use simpl_filter::{FilterInstance, FilterRegistry, ParameterValue};

use crate::pipeline::Pipeline;

// ── Error type ─────────────────────────────────────────────────────

/// Errors from loading, saving, or building a pipeline file.
#[derive(Debug)]
pub enum ConfigError {
    /// Reading or writing the file failed.
    Io {
        /// The file.
        path: PathBuf,
        /// The underlying error.
        source: io::Error,
    },
    /// The JSON is malformed or does not describe a pipeline.
    Parse(serde_json::Error),
    /// A filter name is not in the registry.
    UnknownFilter {
        /// Position in the file.
        index: usize,
        /// The unknown name.
        name: String,
    },
    /// A filter rejected a parameter.
    InvalidParameter {
        /// Position in the file.
        index: usize,
        /// Filter name.
        filter: String,
        /// The rejection.
        error: ParameterError,
    },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io { path, source } => write!(f, "{}: {source}", path.display()),
            Self::Parse(e) => write!(f, "invalid pipeline file: {e}"),
            Self::UnknownFilter { index, name } => {
                write!(f, "filter {index}: unknown filter '{name}'")
            }
            Self::InvalidParameter {
                index,
                filter,
                error,
            } => write!(f, "filter {index} ({filter}): {error}"),
        }
    }
}

impl Error for ConfigError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            Self::Parse(e) => Some(e),
            Self::UnknownFilter { .. } => None,
            Self::InvalidParameter { error, .. } => Some(error),
        }
    }
}

impl From<serde_json::Error> for ConfigError {
    fn from(e: serde_json::Error) -> Self {
        Self::Parse(e)
    }
}

// ── File format ────────────────────────────────────────────────────

/// One filter in a pipeline file.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FilterEntry {
    /// Registry name of the filter.
    pub filter: String,
    /// Whether the filter runs.
    #[serde(default = "enabled_by_default")]
    pub enabled: bool,
    /// Parameter values by key. Keys left out keep the filter's defaults.
    #[serde(default)]
    pub parameters: IndexMap<String, ParameterValue>,
}

fn enabled_by_default() -> bool {
    true
}

impl FilterEntry {
    /// An enabled entry with no parameters.
    pub fn new(filter: impl Into<String>) -> Self {
        Self {
            filter: filter.into(),
            enabled: true,
            parameters: IndexMap::new(),
        }
    }

    /// Builder-style parameter setter.
    pub fn with(mut self, key: impl Into<String>, value: impl Into<ParameterValue>) -> Self {
        self.parameters.insert(key.into(), value.into());
        self
    }
}

/// Serialized form of a [`Pipeline`].
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct PipelineFile {
    /// Pipeline name.
    pub name: String,
    /// Filters in order.
    #[serde(default)]
    pub filters: Vec<FilterEntry>,
}

impl PipelineFile {
    /// Parse a pipeline file from JSON text.
    pub fn from_json(text: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(text)?)
    }

    /// Render as pretty-printed JSON.
    pub fn to_json(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Read a pipeline file from disk.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let file = Self::from_json(&text)?;
        tracing::debug!(path = %path.display(), filters = file.filters.len(), "loaded pipeline file");
        Ok(file)
    }

    /// Write the pipeline file to disk.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let path = path.as_ref();
        let text = self.to_json()?;
        fs::write(path, text).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        tracing::debug!(path = %path.display(), "saved pipeline file");
        Ok(())
    }

    /// Capture a pipeline's filters, flags and current parameters.
    pub fn from_pipeline(pipeline: &Pipeline) -> Self {
        Self {
            name: pipeline.name().to_string(),
            filters: pipeline
                .filters()
                .iter()
                .map(|inst| FilterEntry {
                    filter: inst.name().to_string(),
                    enabled: inst.is_enabled(),
                    parameters: inst.filter().parameters(),
                })
                .collect(),
        }
    }

    /// Build a pipeline, creating each filter through `registry` and
    /// applying its parameters in file order.
    pub fn build(&self, registry: &FilterRegistry) -> Result<Pipeline, ConfigError> {
        let mut pipeline = Pipeline::new(self.name.clone());
        for (index, entry) in self.filters.iter().enumerate() {
            let mut filter =
                registry
                    .create(&entry.filter)
                    .map_err(|_| ConfigError::UnknownFilter {
                        index,
                        name: entry.filter.clone(),
                    })?;
            for (key, value) in &entry.parameters {
                filter
                    .set_parameter(key, value.clone())
                    .map_err(|error| ConfigError::InvalidParameter {
                        index,
                        filter: entry.filter.clone(),
                        error,
                    })?;
            }
            let mut inst = FilterInstance::new(filter);
            inst.set_enabled(entry.enabled);
            pipeline.push(inst);
        }
        Ok(pipeline)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn entries_default_to_enabled() {
        let file = PipelineFile::from_json(
            r#"{ "name": "p", "filters": [ { "filter": "A" }, { "filter": "B", "enabled": false } ] }"#,
        )
        .unwrap();
        assert_eq!(file.filters.len(), 2);
        assert!(file.filters[0].enabled);
        assert!(!file.filters[1].enabled);
        assert!(file.filters[0].parameters.is_empty());
    }

    #[test]
    fn malformed_json_is_a_parse_error() {
        let err = PipelineFile::from_json("{ \"filters\": 3 }").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
        assert!(err.source().is_some());
    }

    #[test]
    fn unknown_filter_fails_build() {
        let file = PipelineFile {
            name: "p".into(),
            filters: vec![FilterEntry::new("Nope")],
        };
        let err = file.build(&FilterRegistry::new()).unwrap_err();
        assert!(matches!(err, ConfigError::UnknownFilter { index: 0, .. }));
        assert_eq!(err.to_string(), "filter 0: unknown filter 'Nope'");
    }

    #[test]
    fn missing_file_is_io_error() {
        let err = PipelineFile::load("/definitely/not/here.json").unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }
}
