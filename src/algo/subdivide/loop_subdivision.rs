//! Loop subdivision for triangle meshes.

use std::collections::hash_map::Entry;
use std::collections::HashMap;

use nalgebra::{Point3, Vector3};
use rayon::prelude::*;

use crate::error::{MeshError, Result};
use crate::mesh::{FaceId, HalfEdgeId, HalfEdgeMesh, MeshIndex, VertexId};

use super::SubdivideOptions;

/// Subdivide a triangle mesh `options.iterations` times.
///
/// Returns a new mesh; `mesh` is left as it was. Zero iterations returns a
/// copy.
///
/// # Vertex Rules
///
/// - **Edge vertex, paired edge**: `3/8 * (v0 + v1) + 1/8 * (opposite + across)`
/// - **Edge vertex, unpaired edge**: `1/2 * (v0 + v1)`
/// - **Original vertex**: `(1 - n*β) * v + β * Σ(ring)` over the ring from
///   [`vertices_around_vertex`](HalfEdgeMesh::vertices_around_vertex), with
///   β from [`loop_beta`]
///
/// # Errors
///
/// [`MeshError::NotTriangular`] if any face is not a triangle, and
/// [`MeshError::OutOfRange`] once the result has more elements than `I` can
/// address.
pub fn loop_subdivide<I: MeshIndex>(
    mesh: &HalfEdgeMesh<I>,
    options: &SubdivideOptions,
) -> Result<HalfEdgeMesh<I>> {
    if options.iterations == 0 {
        return Ok(mesh.clone());
    }

    let mut result = subdivide(mesh, options.parallel)?;
    for iter in 1..options.iterations {
        log::trace!("loop subdivision iteration {}/{}", iter + 1, options.iterations);
        result = subdivide(&result, options.parallel)?;
    }
    Ok(result)
}

/// One sequential round of Loop subdivision.
pub fn loop_subdivide_once<I: MeshIndex>(mesh: &HalfEdgeMesh<I>) -> Result<HalfEdgeMesh<I>> {
    subdivide(mesh, false)
}

/// Smoothing weight β for a vertex whose ring has `n` neighbours.
///
/// Valence 3 uses 3/16; every other valence uses 3/(8n).
pub fn loop_beta(n: usize) -> f32 {
    if n == 3 {
        3.0 / 16.0
    } else {
        3.0 / (8.0 * n as f32)
    }
}

fn subdivide<I: MeshIndex>(mesh: &HalfEdgeMesh<I>, parallel: bool) -> Result<HalfEdgeMesh<I>> {
    for f in mesh.face_ids() {
        let degree = mesh.face_degree(f);
        if degree != 3 {
            return Err(MeshError::NotTriangular {
                face: f.index(),
                degree,
            });
        }
    }

    let boundary = mesh
        .halfedge_ids()
        .filter(|&he| mesh.is_boundary_halfedge(he))
        .count();
    if boundary > 0 {
        log::debug!("subdividing with {} unpaired half-edges", boundary);
    }

    let num_edges = (mesh.num_halfedges() + boundary) / 2;
    let mut out = HalfEdgeMesh::with_capacity(
        mesh.num_vertices() + num_edges,
        mesh.num_halfedges() * 4,
        mesh.num_faces() * 4,
    );

    // Pass 1: reposition original vertices
    let moved: Vec<Point3<f32>> = if parallel {
        let ids: Vec<VertexId<I>> = mesh.vertex_ids().collect();
        ids.par_iter().map(|&v| vertex_point(mesh, v)).collect()
    } else {
        mesh.vertex_ids().map(|v| vertex_point(mesh, v)).collect()
    };
    let corner_of = moved
        .into_iter()
        .map(|p| out.try_add_point(p))
        .collect::<Result<Vec<VertexId<I>>>>()?;

    // Pass 2: one new vertex per undirected edge, shared by both half-edges
    let mut by_edge: HashMap<(VertexId<I>, VertexId<I>), VertexId<I>> =
        HashMap::with_capacity(num_edges);
    let mut edge_vertex_of: Vec<VertexId<I>> = vec![VertexId::invalid(); mesh.num_halfedges()];
    for f in mesh.face_ids() {
        for (he, from, to) in mesh.face_edges(f) {
            let id = match by_edge.entry((from.min(to), from.max(to))) {
                Entry::Occupied(slot) => *slot.get(),
                Entry::Vacant(slot) => *slot.insert(out.try_add_point(edge_point(mesh, he))?),
            };
            edge_vertex_of[he.index()] = id;
        }
    }

    // Pass 3: split every triangle 1-to-4, keeping the parent's winding
    for f in mesh.face_ids() {
        let he0 = mesh.face(f).halfedge;
        let he1 = mesh.next(he0);
        let he2 = mesh.next(he1);

        let c0 = corner_of[mesh.target(he0).index()];
        let c1 = corner_of[mesh.target(he1).index()];
        let c2 = corner_of[mesh.target(he2).index()];

        // he1 runs c0 -> c1, he2 runs c1 -> c2, he0 runs c2 -> c0
        let e01 = edge_vertex_of[he1.index()];
        let e12 = edge_vertex_of[he2.index()];
        let e20 = edge_vertex_of[he0.index()];

        add_ccw_triangle(&mut out, [c0, e01, e20])?;
        add_ccw_triangle(&mut out, [e01, c1, e12])?;
        add_ccw_triangle(&mut out, [e20, e12, c2])?;
        add_ccw_triangle(&mut out, [e01, e12, e20])?;
    }

    let pairs = out.pair_shared_edges();

    log::debug!(
        "loop subdivision: {} -> {} vertices, {} -> {} faces, {} boundary half-edges",
        mesh.num_vertices(),
        out.num_vertices(),
        mesh.num_faces(),
        out.num_faces(),
        out.num_halfedges() - 2 * pairs
    );

    Ok(out)
}

/// Add a triangle whose corners are listed counter-clockwise.
fn add_ccw_triangle<I: MeshIndex>(
    mesh: &mut HalfEdgeMesh<I>,
    [a, b, c]: [VertexId<I>; 3],
) -> Result<FaceId<I>> {
    mesh.add_face(&[c, b, a])
}

/// Repositioned location of an original vertex.
fn vertex_point<I: MeshIndex>(mesh: &HalfEdgeMesh<I>, v: VertexId<I>) -> Point3<f32> {
    let mut n = 0usize;
    let mut sum = Vector3::zeros();
    for w in mesh.vertices_around_vertex(v) {
        sum += mesh.position(w).coords;
        n += 1;
    }

    let p = mesh.position(v);
    if n == 0 {
        return *p;
    }

    let beta = loop_beta(n);
    Point3::from(p.coords * (1.0 - n as f32 * beta) + sum * beta)
}

/// New vertex for the edge under `he`. `he` must belong to a triangle.
fn edge_point<I: MeshIndex>(mesh: &HalfEdgeMesh<I>, he: HalfEdgeId<I>) -> Point3<f32> {
    let p0 = mesh.position(mesh.origin(he)).coords;
    let p1 = mesh.position(mesh.target(he)).coords;

    match mesh.pair(he) {
        Some(pair) => {
            let opposite = mesh.position(mesh.target(mesh.next(he))).coords;
            let across = mesh.position(mesh.target(mesh.next(pair))).coords;
            Point3::from(p0 * 0.375 + p1 * 0.375 + opposite * 0.125 + across * 0.125)
        }
        None => Point3::from((p0 + p1) * 0.5),
    }
}
