//! Geometries a data container may carry.
//!
//! A geometry fixes how many elements (cells, vertices, edges, faces) the
//! container describes. Geometry-bound attribute matrices must have one
//! tuple per element of the matching kind.

use serde::{Deserialize, Serialize};
use simpl_core::{shape_product, AttributeMatrixType};
use std::fmt;

/// Kind of a [`Geometry`], without its data.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GeometryKind {
    /// Regular voxel grid.
    Image,
    /// Point cloud.
    Vertex,
    /// Line segments.
    Edge,
    /// Triangle surface mesh.
    Triangle,
}

impl GeometryKind {
    /// Display name.
    pub fn name(self) -> &'static str {
        match self {
            Self::Image => "Image",
            Self::Vertex => "Vertex",
            Self::Edge => "Edge",
            Self::Triangle => "Triangle",
        }
    }
}

impl fmt::Display for GeometryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Regular grid of `dims[0] * dims[1] * dims[2]` cells.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ImageGeom {
    /// Cells along x, y, z.
    pub dims: [usize; 3],
    /// Position of the first cell corner.
    pub origin: [f32; 3],
    /// Cell size along x, y, z.
    pub spacing: [f32; 3],
}

impl ImageGeom {
    /// Unit-spaced grid at the origin.
    pub fn new(dims: [usize; 3]) -> Self {
        Self {
            dims,
            origin: [0.0; 3],
            spacing: [1.0; 3],
        }
    }

    /// Number of cells, or `None` on overflow.
    pub fn cell_count(&self) -> Option<usize> {
        shape_product(&self.dims)
    }
}

/// Unconnected points.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct VertexGeom {
    /// Vertex coordinates.
    pub vertices: Vec<[f32; 3]>,
}

/// Points joined by line segments.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct EdgeGeom {
    /// Vertex coordinates.
    pub vertices: Vec<[f32; 3]>,
    /// Vertex index pairs.
    pub edges: Vec<[usize; 2]>,
}

/// Triangle surface mesh.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct TriangleGeom {
    /// Vertex coordinates.
    pub vertices: Vec<[f32; 3]>,
    /// Vertex index triples.
    pub triangles: Vec<[usize; 3]>,
}

/// The geometry of a data container.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Geometry {
    /// Regular voxel grid.
    Image(ImageGeom),
    /// Point cloud.
    Vertex(VertexGeom),
    /// Line segments.
    Edge(EdgeGeom),
    /// Triangle surface mesh.
    Triangle(TriangleGeom),
}

impl Geometry {
    /// Kind tag.
    pub fn kind(&self) -> GeometryKind {
        match self {
            Self::Image(_) => GeometryKind::Image,
            Self::Vertex(_) => GeometryKind::Vertex,
            Self::Edge(_) => GeometryKind::Edge,
            Self::Triangle(_) => GeometryKind::Triangle,
        }
    }

    /// Number of elements a matrix of `matrix_type` must have on this
    /// geometry, or `None` if this geometry places no constraint on it.
    pub fn element_count(&self, matrix_type: AttributeMatrixType) -> Option<usize> {
        use AttributeMatrixType as T;
        match (self, matrix_type) {
            (Self::Image(g), T::Cell) => g.cell_count(),
            (Self::Vertex(g), T::Vertex) => Some(g.vertices.len()),
            (Self::Edge(g), T::Vertex) => Some(g.vertices.len()),
            (Self::Edge(g), T::Edge) => Some(g.edges.len()),
            (Self::Triangle(g), T::Vertex) => Some(g.vertices.len()),
            (Self::Triangle(g), T::Face) => Some(g.triangles.len()),
            _ => None,
        }
    }
}

/// A concrete geometry type that can be borrowed out of a [`Geometry`].
pub trait GeometryType: Sized {
    /// The kind this type corresponds to.
    const KIND: GeometryKind;

    /// Borrow `geometry` as `Self` if the kinds match.
    fn from_geometry(geometry: &Geometry) -> Option<&Self>;
}

macro_rules! impl_geometry_type {
    ($($ty:ty => $variant:ident),* $(,)?) => {
        $(
            impl GeometryType for $ty {
                const KIND: GeometryKind = GeometryKind::$variant;

                fn from_geometry(geometry: &Geometry) -> Option<&Self> {
                    match geometry {
                        Geometry::$variant(g) => Some(g),
                        _ => None,
                    }
                }
            }

            impl From<$ty> for Geometry {
                fn from(g: $ty) -> Self {
                    Geometry::$variant(g)
                }
            }
        )*
    };
}

impl_geometry_type! {
    ImageGeom => Image,
    VertexGeom => Vertex,
    EdgeGeom => Edge,
    TriangleGeom => Triangle,
}
