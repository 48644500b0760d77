//! Attach an image geometry to a data container.

use simpl_core::{FilterError, ParameterError};
use simpl_data::ImageGeom;
use simpl_filter::{
    parameter::unknown_parameter, ExecuteOutcome, Filter, FilterContext, ParameterKind,
    ParameterSpec, ParameterValue,
};

/// `Dimensions` does not have exactly three positive extents.
pub const INVALID_DIMENSIONS: i32 = -11000;
/// `Origin` or `Spacing` does not have exactly three values.
pub const INVALID_VECTOR: i32 = -11001;
/// A spacing value is not positive.
pub const NON_POSITIVE_SPACING: i32 = -11002;

/// Sets an [`ImageGeom`] on an existing container.
///
/// The geometry is structural, so it is set in both phases. Matrices
/// already in the container must agree with the new cell count.
#[derive(Clone, Debug)]
pub struct CreateImageGeometry {
    container: String,
    dims: Vec<usize>,
    origin: Vec<f64>,
    spacing: Vec<f64>,
}

impl CreateImageGeometry {
    /// Registry name.
    pub const NAME: &'static str = "CreateImageGeometry";

    /// Unit-spaced grid of `dims` cells at the origin.
    pub fn new(container: impl Into<String>, dims: [usize; 3]) -> Self {
        Self {
            container: container.into(),
            dims: dims.to_vec(),
            origin: vec![0.0; 3],
            spacing: vec![1.0; 3],
        }
    }

    /// Builder-style spacing.
    pub fn with_spacing(mut self, spacing: [f64; 3]) -> Self {
        self.spacing = spacing.to_vec();
        self
    }

    /// Builder-style origin.
    pub fn with_origin(mut self, origin: [f64; 3]) -> Self {
        self.origin = origin.to_vec();
        self
    }

    fn geometry(&self) -> Result<ImageGeom, FilterError> {
        let dims: [usize; 3] = self
            .dims
            .as_slice()
            .try_into()
            .ok()
            .filter(|d: &[usize; 3]| d.iter().all(|&n| n > 0))
            .ok_or_else(|| {
                FilterError::configuration(
                    INVALID_DIMENSIONS,
                    format!("dimensions must be three positive extents, got {:?}", self.dims),
                )
            })?;
        let origin = vector3("Origin", &self.origin)?;
        let spacing = vector3("Spacing", &self.spacing)?;
        if spacing.iter().any(|&s| s <= 0.0) {
            return Err(FilterError::configuration(
                NON_POSITIVE_SPACING,
                format!("spacing must be positive, got {spacing:?}"),
            ));
        }
        Ok(ImageGeom {
            dims,
            origin,
            spacing,
        })
    }
}

fn vector3(key: &str, values: &[f64]) -> Result<[f32; 3], FilterError> {
    match values {
        [x, y, z] => Ok([*x as f32, *y as f32, *z as f32]),
        _ => Err(FilterError::configuration(
            INVALID_VECTOR,
            format!("{key} must have three values, got {}", values.len()),
        )),
    }
}

impl Default for CreateImageGeometry {
    fn default() -> Self {
        Self::new("ImageDataContainer", [1, 1, 1])
    }
}

impl Filter for CreateImageGeometry {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn human_label(&self) -> &str {
        "Create Geometry (Image)"
    }

    fn group(&self) -> &str {
        "Geometry"
    }

    fn parameter_specs(&self) -> Vec<ParameterSpec> {
        vec![
            ParameterSpec::new("SelectedDataContainer", "Data Container", ParameterKind::String),
            ParameterSpec::new("Dimensions", "Dimensions", ParameterKind::Dims),
            ParameterSpec::new("Origin", "Origin", ParameterKind::FloatVec),
            ParameterSpec::new("Spacing", "Spacing", ParameterKind::FloatVec),
        ]
    }

    fn parameter(&self, key: &str) -> Option<ParameterValue> {
        match key {
            "SelectedDataContainer" => Some(self.container.as_str().into()),
            "Dimensions" => Some(self.dims.clone().into()),
            "Origin" => Some(self.origin.clone().into()),
            "Spacing" => Some(self.spacing.clone().into()),
            _ => None,
        }
    }

    fn set_parameter(&mut self, key: &str, value: ParameterValue) -> Result<(), ParameterError> {
        match key {
            "SelectedDataContainer" => self.container = value.extract(key)?,
            "Dimensions" => self.dims = value.extract(key)?,
            "Origin" => self.origin = value.extract(key)?,
            "Spacing" => self.spacing = value.extract(key)?,
            _ => return Err(unknown_parameter(Self::NAME, key)),
        }
        Ok(())
    }

    fn data_check(&mut self, ctx: &mut FilterContext<'_>) -> Result<(), FilterError> {
        let geometry = self.geometry()?;
        ctx.dca_mut()
            .data_container_mut(&self.container)?
            .set_geometry(geometry)?;
        Ok(())
    }

    fn execute(&mut self, _ctx: &mut FilterContext<'_>) -> Result<ExecuteOutcome, FilterError> {
        Ok(ExecuteOutcome::Completed)
    }
}
