//! Mesh processing algorithms.
//!
//! - **Subdivision**: Loop subdivision of triangle meshes

pub mod subdivide;
