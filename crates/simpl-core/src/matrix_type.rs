//! Attribute matrix type tags.

use serde::{Deserialize, Serialize};
use std::fmt;

/// What the tuples of an attribute matrix describe.
///
/// Vertex, Edge, Face, and Cell matrices are *geometry-bound*: when their
/// data container carries a geometry, the matrix tuple count must match the
/// geometry's element count. Feature and ensemble matrices describe groups
/// of elements and are free-sized.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AttributeMatrixType {
    /// One tuple per vertex.
    Vertex,
    /// One tuple per edge.
    Edge,
    /// One tuple per face.
    Face,
    /// One tuple per cell (voxel).
    Cell,
    /// One tuple per vertex feature.
    VertexFeature,
    /// One tuple per edge feature.
    EdgeFeature,
    /// One tuple per face feature.
    FaceFeature,
    /// One tuple per cell feature (grain).
    CellFeature,
    /// One tuple per vertex ensemble (phase).
    VertexEnsemble,
    /// One tuple per edge ensemble.
    EdgeEnsemble,
    /// One tuple per face ensemble.
    FaceEnsemble,
    /// One tuple per cell ensemble.
    CellEnsemble,
    /// Free-form metadata.
    MetaData,
    /// Generic data with no geometric meaning.
    Generic,
    /// Unspecified.
    Unknown,
}

impl AttributeMatrixType {
    /// Whether tuples of this matrix correspond one-to-one with geometry
    /// elements.
    pub fn is_geometry_bound(self) -> bool {
        matches!(self, Self::Vertex | Self::Edge | Self::Face | Self::Cell)
    }

    /// Display name.
    pub fn name(self) -> &'static str {
        match self {
            Self::Vertex => "Vertex",
            Self::Edge => "Edge",
            Self::Face => "Face",
            Self::Cell => "Cell",
            Self::VertexFeature => "VertexFeature",
            Self::EdgeFeature => "EdgeFeature",
            Self::FaceFeature => "FaceFeature",
            Self::CellFeature => "CellFeature",
            Self::VertexEnsemble => "VertexEnsemble",
            Self::EdgeEnsemble => "EdgeEnsemble",
            Self::FaceEnsemble => "FaceEnsemble",
            Self::CellEnsemble => "CellEnsemble",
            Self::MetaData => "MetaData",
            Self::Generic => "Generic",
            Self::Unknown => "Unknown",
        }
    }
}

impl fmt::Display for AttributeMatrixType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn geometry_bound_types() {
        assert!(AttributeMatrixType::Cell.is_geometry_bound());
        assert!(AttributeMatrixType::Vertex.is_geometry_bound());
        assert!(!AttributeMatrixType::CellFeature.is_geometry_bound());
        assert!(!AttributeMatrixType::Generic.is_geometry_bound());
    }

    #[test]
    fn serde_uses_variant_names() {
        let json = serde_json::to_string(&AttributeMatrixType::CellEnsemble).unwrap();
        assert_eq!(json, "\"CellEnsemble\"");
    }
}
