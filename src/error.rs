//! Error types for hemesh.
//!
//! Construction and conversion failures are reported through [`MeshError`].
//! Structural validation is a separate report, [`InvariantViolation`],
//! returned by [`HalfEdgeMesh::check_invariants`](crate::mesh::HalfEdgeMesh::check_invariants);
//! the caller decides whether a broken invariant is fatal.

use thiserror::Error;

/// Result type alias using [`MeshError`].
pub type Result<T> = std::result::Result<T, MeshError>;

/// Errors that can occur during mesh operations.
#[derive(Error, Debug)]
pub enum MeshError {
    /// A face was described with fewer than three vertices or with a
    /// repeated vertex. Raised before the mesh is touched.
    #[error("invalid topology: {0}")]
    InvalidTopology(String),

    /// An index or handle does not address an element of this mesh, or a
    /// new element would not be addressable with the mesh's index type.
    #[error("{element} index {index} is out of range (mesh has {len})")]
    OutOfRange {
        /// Kind of element addressed ("vertex", "face", ...).
        element: &'static str,
        /// The offending index.
        index: usize,
        /// Number of elements of that kind.
        len: usize,
    },

    /// A triangle-only algorithm met a face of another degree.
    #[error("face {face} has {degree} vertices, expected a triangle")]
    NotTriangular {
        /// The face index.
        face: usize,
        /// Number of vertices on the face.
        degree: usize,
    },

    /// File I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Unsupported file format.
    #[error("unsupported file format: {extension}")]
    UnsupportedFormat {
        /// The file extension.
        extension: String,
    },
}

impl MeshError {
    pub(crate) fn out_of_range(element: &'static str, index: usize, len: usize) -> Self {
        MeshError::OutOfRange {
            element,
            index,
            len,
        }
    }
}

/// First structural invariant found broken by a validation scan.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum InvariantViolation {
    /// A half-edge has no successor in its face loop.
    #[error("half-edge {0} has no next half-edge")]
    MissingNext(usize),

    /// A half-edge is not owned by a face.
    #[error("half-edge {0} has no face")]
    MissingFace(usize),

    /// A half-edge does not point to a vertex.
    #[error("half-edge {0} has no target vertex")]
    MissingVertex(usize),

    /// `pair.pair` does not lead back to the half-edge.
    #[error("half-edge {halfedge} pairs with {pair}, which does not pair back")]
    AsymmetricPair {
        /// The half-edge being checked.
        halfedge: usize,
        /// Its recorded pair.
        pair: usize,
    },

    /// Walking `next` from a face's half-edge never returns to it.
    #[error("face {0} does not form a closed half-edge loop")]
    OpenFaceLoop(usize),
}
