//! Benchmark profiles for the SIMPL pipeline engine.
//!
//! - [`volume`]: an image container with several cell arrays
//! - [`processing_pipeline`]: copy, scale, and resize over [`volume`]

#![forbid(unsafe_code)]
#![deny(rustdoc::broken_intra_doc_links)]

use simpl_core::{AttributeMatrixType, DataArrayPath, DataError, NumericType};
use simpl_data::{DataContainerArray, ImageGeom};
use simpl_filters::{CopyDataArray, RemoveArrays, ScaleDataArray};
use simpl_pipeline::Pipeline;

/// Path of the cell matrix in [`volume`].
pub fn cell_data() -> DataArrayPath {
    DataArrayPath::for_matrix("Volume", "CellData")
}

/// An `n`×`n`×`n` image container with `f32` array `Density`, `i32`
/// array `FeatureIds`, and 3-component `u8` array `Color`.
pub fn volume(n: usize) -> Result<DataContainerArray, DataError> {
    let mut dca = DataContainerArray::new();
    dca.create_non_prereq_data_container("Volume")?
        .set_geometry(ImageGeom::new([n, n, n]))?;
    let cells = cell_data();
    dca.create_non_prereq_attribute_matrix(&cells, AttributeMatrixType::Cell, &[n, n, n])?;
    for (name, numeric_type, components, init) in [
        ("Density", NumericType::Float32, 1, 1.0),
        ("FeatureIds", NumericType::Int32, 1, 0.0),
        ("Color", NumericType::UInt8, 3, 128.0),
    ] {
        dca.create_dynamic_array(&cells.with_array(name), numeric_type, &[components], init, false)?;
    }
    Ok(dca)
}

/// Copy `Density`, scale the copy, then delete it again, leaving the
/// structure as it started.
pub fn processing_pipeline() -> Pipeline {
    let cells = cell_data();
    Pipeline::new("bench")
        .with(CopyDataArray::new(cells.with_array("Density"), "Scaled"))
        .with(ScaleDataArray::new(cells.with_array("Scaled"), 0.5))
        .with(RemoveArrays::new(vec![cells.with_array("Scaled")]))
}
