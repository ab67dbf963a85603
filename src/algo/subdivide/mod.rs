//! Mesh subdivision.
//!
//! # Loop Subdivision (Triangle Meshes)
//!
//! Loop subdivision (Loop, 1987) is an approximating subdivision scheme for
//! triangle meshes. Each iteration:
//!
//! 1. Moves every original vertex towards a weighted average of its neighbours
//! 2. Inserts one new vertex per edge, weighted 3/8-3/8-1/8-1/8 from the edge
//!    endpoints and the two opposite corners (plain midpoint on a boundary)
//! 3. Splits each triangle into 4 smaller triangles
//!
//! The input mesh is never modified; every iteration builds a fresh mesh.
//!
//! # Example
//!
//! ```
//! use hemesh::algo::subdivide::{loop_subdivide, SubdivideOptions};
//! use hemesh::mesh::{primitives, HalfEdgeMesh};
//!
//! let ico: HalfEdgeMesh = primitives::icosahedron().unwrap();
//! let smooth = loop_subdivide(&ico, &SubdivideOptions::new(1)).unwrap();
//!
//! assert_eq!(smooth.num_vertices(), 42);
//! assert_eq!(smooth.num_faces(), 80);
//! ```
//!
//! # References
//!
//! - Loop, C. (1987). "Smooth Subdivision Surfaces Based on Triangles."
//!   Master's thesis, University of Utah.

mod loop_subdivision;

pub use loop_subdivision::{loop_beta, loop_subdivide, loop_subdivide_once};

/// Options for subdivision algorithms.
#[derive(Debug, Clone)]
pub struct SubdivideOptions {
    /// Number of subdivision iterations.
    pub iterations: usize,

    /// Whether to reposition original vertices on the rayon thread pool.
    /// The result is identical either way.
    pub parallel: bool,
}

impl SubdivideOptions {
    /// Create options with the specified number of iterations.
    pub fn new(iterations: usize) -> Self {
        Self {
            iterations,
            parallel: false,
        }
    }

    /// Set whether to use parallel execution.
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Create options for single-threaded execution.
    pub fn sequential(mut self) -> Self {
        self.parallel = false;
        self
    }
}

impl Default for SubdivideOptions {
    fn default() -> Self {
        Self::new(1)
    }
}
