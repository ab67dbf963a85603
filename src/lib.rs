//! # hemesh
//!
//! A half-edge mesh store with Loop subdivision.
//!
//! hemesh keeps a polygon mesh as three arenas of vertex, half-edge and face
//! records linked by index, answers adjacency queries by walking those
//! links, converts to and from flat indexed triangle lists, and refines
//! triangle meshes with Loop subdivision.
//!
//! ## Features
//!
//! - **Half-edge data structure**: O(1) per step adjacency walks with type-safe indices
//! - **Flexible indexing**: 16-bit, 32-bit and 64-bit handles
//! - **Triangle interop**: import with automatic edge pairing, fan-triangulated export
//! - **Loop subdivision**: functional, optionally parallel vertex repositioning
//! - **OBJ export**
//!
//! ## Quick Start
//!
//! ```
//! use hemesh::prelude::*;
//! use nalgebra::Point3;
//!
//! let vertices = vec![
//!     Point3::new(0.0, 0.0, 0.0),
//!     Point3::new(1.0, 0.0, 0.0),
//!     Point3::new(0.5, 1.0, 0.0),
//!     Point3::new(0.5, 0.5, 1.0),
//! ];
//!
//! let faces = vec![
//!     [0, 2, 1], // bottom
//!     [0, 1, 3], // front
//!     [1, 2, 3], // right
//!     [2, 0, 3], // left
//! ];
//!
//! let mesh: HalfEdgeMesh = from_triangles(&vertices, &faces).unwrap();
//! assert!(mesh.is_closed());
//!
//! let smooth = loop_subdivide(&mesh, &SubdivideOptions::new(2)).unwrap();
//! assert_eq!(smooth.num_faces(), 64);
//!
//! let (positions, triangles) = to_triangles(&smooth);
//! assert_eq!(positions.len(), smooth.num_vertices());
//! assert_eq!(triangles.len(), 64);
//! ```
//!
//! ## Mesh Traversal
//!
//! ```
//! use hemesh::prelude::*;
//! use nalgebra::Point3;
//!
//! # let vertices = vec![
//! #     Point3::new(0.0, 0.0, 0.0),
//! #     Point3::new(1.0, 0.0, 0.0),
//! #     Point3::new(0.5, 1.0, 0.0),
//! # ];
//! # let faces = vec![[0, 1, 2]];
//! # let mesh: HalfEdgeMesh = from_triangles(&vertices, &faces).unwrap();
//! // Neighbours of a vertex, stopping at the boundary
//! let v = VertexId::new(0);
//! for neighbor in mesh.vertices_around_vertex(v) {
//!     println!("Neighbor: {:?}", neighbor);
//! }
//!
//! // Corners of a face
//! let f = FaceId::new(0);
//! let corners: Vec<VertexId> = mesh.vertices_around_face(f).collect();
//! assert_eq!(corners.len(), 3);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod algo;
pub mod error;
pub mod io;
pub mod mesh;

/// Prelude module for convenient imports.
///
/// ```
/// use hemesh::prelude::*;
/// ```
pub mod prelude {
    pub use crate::algo::subdivide::{loop_subdivide, SubdivideOptions};
    pub use crate::error::{InvariantViolation, MeshError, Result};
    pub use crate::mesh::{
        from_polygons, from_triangles, to_triangles, Face, FaceId, HalfEdge, HalfEdgeId,
        HalfEdgeMesh, MeshIndex, Vertex, VertexId,
    };
}

// Re-export nalgebra types for convenience
pub use nalgebra;

#[cfg(test)]
mod tests {
    use super::prelude::*;
    use nalgebra::Point3;

    #[test]
    fn test_tetrahedron() {
        let vertices = vec![
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(0.5, 1.0, 0.0),
            Point3::new(0.5, 0.5, 1.0),
        ];

        let faces = vec![[0, 2, 1], [0, 1, 3], [1, 2, 3], [2, 0, 3]];

        let mesh: HalfEdgeMesh = from_triangles(&vertices, &faces).unwrap();

        assert_eq!(mesh.num_vertices(), 4);
        assert_eq!(mesh.num_faces(), 4);
        assert_eq!(mesh.num_halfedges(), 12);
        assert!(mesh.validate());

        // Every half-edge has a partner on a closed surface
        for he in mesh.halfedge_ids() {
            assert!(mesh.pair(he).is_some(), "half-edge {:?} should be paired", he);
        }
    }

    #[test]
    fn test_subdivide_then_export() {
        let mesh: HalfEdgeMesh = crate::mesh::primitives::icosahedron().unwrap();
        let sub = loop_subdivide(&mesh, &SubdivideOptions::default()).unwrap();

        let (positions, triangles) = to_triangles(&sub);
        let back: HalfEdgeMesh = from_triangles(&positions, &triangles).unwrap();
        assert_eq!(back.num_faces(), 80);
        assert!(back.is_closed());
        assert!(back.check_invariants().is_ok());
    }
}
