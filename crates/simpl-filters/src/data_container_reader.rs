//! Import data containers from a JSON data file.
//!
//! Data files are the serde form of a [`DataContainerArray`], as written
//! by [`DataContainerWriter`](crate::DataContainerWriter).

use std::fs;
use std::path::PathBuf;

use simpl_core::{DataArrayPath, FilterError, ParameterError};
use simpl_data::DataContainerArray;
use simpl_filter::{
    parameter::unknown_parameter, ExecuteOutcome, Filter, FilterContext, ParameterKind,
    ParameterSpec, ParameterValue,
};

/// `InputFile` is empty.
pub const INPUT_FILE_NOT_SET: i32 = -387;
/// `InputFile` does not exist.
pub const INPUT_FILE_MISSING: i32 = -388;
/// `InputFile` could not be read or parsed.
pub const INPUT_FILE_UNREADABLE: i32 = -389;
/// A container in the file already exists and overwriting is off.
pub const CONTAINER_EXISTS: i32 = -390;
/// A path in `DataToImport` names nothing in the file.
pub const SELECTION_MISSING: i32 = -391;

/// Reads data containers from `InputFile` into the pipeline's container
/// array.
///
/// `DataToImport` lists the containers, matrices, and arrays to import;
/// selecting a container or matrix imports everything under it, and an
/// empty list imports the whole file. Preflight reads the file's structure
/// only, skipping stored values; execute imports the data. A container
/// whose name is already taken replaces the existing one when
/// `OverwriteExistingDataContainers` is set and is an error otherwise.
#[derive(Clone, Debug, Default)]
pub struct DataContainerReader {
    input: PathBuf,
    selection: Vec<DataArrayPath>,
    overwrite: bool,
}

enum Selected {
    Whole,
    Partial,
    Skipped,
}

/// Whether `p` names `target` or one of its ancestors.
fn is_prefix(p: &DataArrayPath, target: &DataArrayPath) -> bool {
    p.depth() <= target.depth()
        && p.container_name() == target.container_name()
        && (p.depth() < 2 || p.matrix_name() == target.matrix_name())
        && (p.depth() < 3 || p.array_name() == target.array_name())
}

fn selected(selection: &[DataArrayPath], target: &DataArrayPath) -> Selected {
    if selection.iter().any(|p| is_prefix(p, target)) {
        Selected::Whole
    } else if selection.iter().any(|p| is_prefix(target, p)) {
        Selected::Partial
    } else {
        Selected::Skipped
    }
}

/// Drop everything in `file` that `selection` does not reach.
fn retain_selected(
    file: &mut DataContainerArray,
    selection: &[DataArrayPath],
) -> Result<(), FilterError> {
    if selection.is_empty() {
        return Ok(());
    }
    for path in selection {
        let found = match path.depth() {
            0 => false,
            1 => file.contains_data_container(path.container_name()),
            2 => file.attribute_matrix(path).is_ok(),
            _ => file.array(path).is_ok(),
        };
        if !found {
            return Err(FilterError::not_found(
                SELECTION_MISSING,
                format!("'{path}' is not in the input file"),
            ));
        }
    }
    let containers: Vec<String> = file.container_names().map(str::to_string).collect();
    for container in containers {
        let dc_path = DataArrayPath::for_container(&container);
        match selected(selection, &dc_path) {
            Selected::Whole => continue,
            Selected::Skipped => {
                file.remove_path(&dc_path)?;
                continue;
            }
            Selected::Partial => {}
        }
        let matrices: Vec<String> = file
            .data_container(&container)?
            .matrix_names()
            .map(str::to_string)
            .collect();
        for matrix in matrices {
            let am_path = dc_path.with_matrix(&matrix);
            match selected(selection, &am_path) {
                Selected::Whole => continue,
                Selected::Skipped => {
                    file.remove_path(&am_path)?;
                    continue;
                }
                Selected::Partial => {}
            }
            let arrays: Vec<String> = file
                .attribute_matrix(&am_path)?
                .array_names()
                .map(str::to_string)
                .collect();
            for array in arrays {
                let path = am_path.with_array(&array);
                if let Selected::Skipped = selected(selection, &path) {
                    file.remove_path(&path)?;
                }
            }
        }
    }
    Ok(())
}

impl DataContainerReader {
    /// Registry name.
    pub const NAME: &'static str = "DataContainerReader";

    /// Read all of `input` without overwriting.
    pub fn new(input: impl Into<PathBuf>) -> Self {
        Self {
            input: input.into(),
            selection: Vec::new(),
            overwrite: false,
        }
    }

    /// Builder-style import selection. Empty imports everything.
    pub fn with_selection(mut self, selection: Vec<DataArrayPath>) -> Self {
        self.selection = selection;
        self
    }

    /// Builder-style overwrite flag.
    pub fn with_overwrite(mut self, overwrite: bool) -> Self {
        self.overwrite = overwrite;
        self
    }

    fn read(&self, structure_only: bool) -> Result<DataContainerArray, FilterError> {
        if self.input.as_os_str().is_empty() {
            return Err(FilterError::configuration(
                INPUT_FILE_NOT_SET,
                "The input file must be set",
            ));
        }
        if !self.input.exists() {
            return Err(FilterError::not_found(
                INPUT_FILE_MISSING,
                format!("The input file {} does not exist", self.input.display()),
            ));
        }
        let unreadable = |reason: String| {
            FilterError::configuration(
                INPUT_FILE_UNREADABLE,
                format!("cannot read {}: {reason}", self.input.display()),
            )
        };
        let text = fs::read_to_string(&self.input).map_err(|e| unreadable(e.to_string()))?;
        let dca = if structure_only {
            let mut de = serde_json::Deserializer::from_str(&text);
            let dca = DataContainerArray::deserialize_structure(&mut de)
                .and_then(|dca| de.end().map(|()| dca));
            dca.map_err(|e| unreadable(e.to_string()))?
        } else {
            serde_json::from_str::<DataContainerArray>(&text)
                .map_err(|e| unreadable(e.to_string()))?
        };
        dca.validate().map_err(|e| unreadable(e.to_string()))?;
        tracing::debug!(
            path = %self.input.display(),
            containers = dca.len(),
            structure_only,
            "read data file"
        );
        Ok(dca)
    }
}

impl Filter for DataContainerReader {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn human_label(&self) -> &str {
        "Read DREAM3D Data File"
    }

    fn group(&self) -> &str {
        "IO"
    }

    fn parameter_specs(&self) -> Vec<ParameterSpec> {
        vec![
            ParameterSpec::new("InputFile", "Input File", ParameterKind::FilePath),
            ParameterSpec::new("DataToImport", "Data to Import", ParameterKind::PathList),
            ParameterSpec::new(
                "OverwriteExistingDataContainers",
                "Overwrite Existing Data Containers",
                ParameterKind::Bool,
            ),
        ]
    }

    fn parameter(&self, key: &str) -> Option<ParameterValue> {
        match key {
            "InputFile" => Some(self.input.clone().into()),
            "DataToImport" => Some(self.selection.clone().into()),
            "OverwriteExistingDataContainers" => Some(self.overwrite.into()),
            _ => None,
        }
    }

    fn set_parameter(&mut self, key: &str, value: ParameterValue) -> Result<(), ParameterError> {
        match key {
            "InputFile" => self.input = value.extract(key)?,
            "DataToImport" => self.selection = value.extract(key)?,
            "OverwriteExistingDataContainers" => self.overwrite = value.extract(key)?,
            _ => return Err(unknown_parameter(Self::NAME, key)),
        }
        Ok(())
    }

    fn data_check(&mut self, ctx: &mut FilterContext<'_>) -> Result<(), FilterError> {
        let mut file = self.read(ctx.is_preflight())?;
        retain_selected(&mut file, &self.selection)?;
        let names: Vec<String> = file.container_names().map(str::to_string).collect();
        for name in names {
            let Some(container) = file.remove_data_container(&name) else {
                continue;
            };
            let dca = ctx.dca_mut();
            if dca.contains_data_container(&name) {
                if !self.overwrite {
                    return Err(FilterError::configuration(
                        CONTAINER_EXISTS,
                        format!(
                            "The input file has a DataContainer with a name ({name}) that already exists"
                        ),
                    ));
                }
                dca.remove_data_container(&name);
            }
            dca.add_data_container(container)?;
        }
        Ok(())
    }

    fn execute(&mut self, _ctx: &mut FilterContext<'_>) -> Result<ExecuteOutcome, FilterError> {
        Ok(ExecuteOutcome::Completed)
    }
}
