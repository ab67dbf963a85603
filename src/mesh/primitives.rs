//! Procedural shapes.
//!
//! Every shape is wound counter-clockwise when seen from outside and is
//! fully paired on import.

use nalgebra::Point3;

use super::builder::from_polygons;
use super::halfedge::HalfEdgeMesh;
use super::index::MeshIndex;
use crate::error::Result;

/// Axis-aligned unit cube centred on the origin, six quads.
pub fn cube<I: MeshIndex>() -> Result<HalfEdgeMesh<I>> {
    let vertices = [
        Point3::new(-0.5, -0.5, 0.5),
        Point3::new(0.5, -0.5, 0.5),
        Point3::new(0.5, 0.5, 0.5),
        Point3::new(-0.5, 0.5, 0.5),
        Point3::new(-0.5, -0.5, -0.5),
        Point3::new(0.5, -0.5, -0.5),
        Point3::new(0.5, 0.5, -0.5),
        Point3::new(-0.5, 0.5, -0.5),
    ];
    let faces: [[usize; 4]; 6] = [
        [0, 1, 2, 3], // front
        [7, 6, 5, 4], // back
        [0, 4, 5, 1], // bottom
        [3, 2, 6, 7], // top
        [1, 5, 6, 2], // right
        [4, 0, 3, 7], // left
    ];
    from_polygons(&vertices, &faces)
}

/// Tetrahedron with a flat base on z = 0.
pub fn tetrahedron<I: MeshIndex>() -> Result<HalfEdgeMesh<I>> {
    let vertices = [
        Point3::new(0.0, 0.0, 0.0),
        Point3::new(1.0, 0.0, 0.0),
        Point3::new(0.5, 1.0, 0.0),
        Point3::new(0.5, 0.5, 1.0),
    ];
    let faces: [[usize; 3]; 4] = [[0, 2, 1], [0, 1, 3], [1, 2, 3], [2, 0, 3]];
    from_polygons(&vertices, &faces)
}

/// Icosahedron with vertices at `(0, ±1, ±φ)` and its cyclic permutations.
pub fn icosahedron<I: MeshIndex>() -> Result<HalfEdgeMesh<I>> {
    let t = (1.0 + 5.0f32.sqrt()) / 2.0;
    let vertices = [
        Point3::new(-1.0, t, 0.0),
        Point3::new(1.0, t, 0.0),
        Point3::new(-1.0, -t, 0.0),
        Point3::new(1.0, -t, 0.0),
        Point3::new(0.0, -1.0, t),
        Point3::new(0.0, 1.0, t),
        Point3::new(0.0, -1.0, -t),
        Point3::new(0.0, 1.0, -t),
        Point3::new(t, 0.0, -1.0),
        Point3::new(t, 0.0, 1.0),
        Point3::new(-t, 0.0, -1.0),
        Point3::new(-t, 0.0, 1.0),
    ];
    let faces: [[usize; 3]; 20] = [
        [0, 11, 5],
        [0, 5, 1],
        [0, 1, 7],
        [0, 7, 10],
        [0, 10, 11],
        [1, 5, 9],
        [5, 11, 4],
        [11, 10, 2],
        [10, 7, 6],
        [7, 1, 8],
        [3, 9, 4],
        [3, 4, 2],
        [3, 2, 6],
        [3, 6, 8],
        [3, 8, 9],
        [4, 9, 5],
        [2, 4, 11],
        [6, 2, 10],
        [8, 6, 7],
        [9, 8, 1],
    ];
    from_polygons(&vertices, &faces)
}

/// Triangulated `n x n` grid over the unit square in the z = 0 plane.
///
/// The grid is open, so its rim half-edges stay unpaired.
pub fn grid<I: MeshIndex>(n: usize) -> Result<HalfEdgeMesh<I>> {
    let step = 1.0 / n.max(1) as f32;
    let mut vertices = Vec::with_capacity((n + 1) * (n + 1));
    for j in 0..=n {
        for i in 0..=n {
            vertices.push(Point3::new(i as f32 * step, j as f32 * step, 0.0));
        }
    }

    let mut faces = Vec::with_capacity(n * n * 2);
    for j in 0..n {
        for i in 0..n {
            let v00 = j * (n + 1) + i;
            let v10 = v00 + 1;
            let v01 = v00 + (n + 1);
            let v11 = v01 + 1;

            faces.push([v00, v10, v11]);
            faces.push([v00, v11, v01]);
        }
    }

    from_polygons(&vertices, &faces)
}
