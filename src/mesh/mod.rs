//! Core mesh data structures.
//!
//! # Overview
//!
//! [`HalfEdgeMesh`] stores an arbitrary polygon mesh as a half-edge
//! (winged-edge) structure: three arenas of [`Vertex`], [`HalfEdge`] and
//! [`Face`] records that refer to one another by index. Walking from a vertex
//! to its outgoing edges, from an edge to its face, or around a face is O(1)
//! per step.
//!
//! # Index Types
//!
//! Elements are identified by [`VertexId`], [`HalfEdgeId`] and [`FaceId`],
//! generic over the integer width through [`MeshIndex`]. Handles are only
//! meaningful for the mesh that issued them.
//!
//! # Construction
//!
//! Build face by face with [`HalfEdgeMesh::add_face`] and link neighbours
//! with [`HalfEdgeMesh::connect_opposites`], or import a flat indexed mesh:
//!
//! ```
//! use hemesh::mesh::{from_triangles, to_triangles, HalfEdgeMesh};
//! use nalgebra::Point3;
//!
//! let vertices = vec![
//!     Point3::new(0.0, 0.0, 0.0),
//!     Point3::new(1.0, 0.0, 0.0),
//!     Point3::new(0.5, 1.0, 0.0),
//! ];
//! let mesh: HalfEdgeMesh = from_triangles(&vertices, &[[0, 1, 2]]).unwrap();
//!
//! let (positions, triangles) = to_triangles(&mesh);
//! assert_eq!(positions.len(), 3);
//! assert_eq!(triangles.len(), 1);
//! ```

mod builder;
mod halfedge;
mod index;
pub mod primitives;
mod query;

pub use builder::{from_polygons, from_triangles, to_triangles};
pub use halfedge::{Face, HalfEdge, HalfEdgeMesh, Vertex};
pub use index::{FaceId, HalfEdgeId, MeshIndex, VertexId};
pub use query::{FaceHalfEdgeIter, VertexRingIter};
