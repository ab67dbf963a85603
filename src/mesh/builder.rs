//! Conversion between half-edge meshes and flat indexed meshes.
//!
//! The exchange format is a list of positions plus a list of faces given as
//! 0-based vertex indices. Faces come in the host's winding; because
//! [`HalfEdgeMesh::add_face`] reverses whatever it is given, the importer
//! passes each face reversed so the stored loop keeps the host's corner order.
//!
//! Import always links opposite half-edges by matching the unordered vertex
//! pair of every edge. An unpaired interior edge would later be treated as a
//! boundary by Loop subdivision.

use std::collections::hash_map::Entry;
use std::collections::HashMap;

use nalgebra::Point3;

use super::halfedge::HalfEdgeMesh;
use super::index::{HalfEdgeId, MeshIndex, VertexId};
use crate::error::{MeshError, Result};

/// Build a half-edge mesh from vertices and triangles.
///
/// # Arguments
/// * `vertices` - Vertex positions; vertex `i` of the result is `vertices[i]`
/// * `triangles` - Triangles as `[i, j, k]` indices in the host winding
///
/// # Example
/// ```
/// use hemesh::mesh::{from_triangles, HalfEdgeMesh};
/// use nalgebra::Point3;
///
/// let vertices = vec![
///     Point3::new(0.0, 0.0, 0.0),
///     Point3::new(1.0, 0.0, 0.0),
///     Point3::new(0.5, 1.0, 0.0),
///     Point3::new(0.5, -1.0, 0.0),
/// ];
/// let triangles = vec![[0, 1, 2], [1, 0, 3]];
///
/// let mesh: HalfEdgeMesh = from_triangles(&vertices, &triangles).unwrap();
/// assert_eq!(mesh.num_faces(), 2);
/// assert_eq!(mesh.halfedge_ids().filter(|&he| mesh.pair(he).is_some()).count(), 2);
/// ```
pub fn from_triangles<I: MeshIndex>(
    vertices: &[Point3<f32>],
    triangles: &[[usize; 3]],
) -> Result<HalfEdgeMesh<I>> {
    from_polygons(vertices, triangles)
}

/// Build a half-edge mesh from vertices and polygons of any degree.
///
/// Indices are checked up front, so a bad index fails with
/// [`MeshError::OutOfRange`] before anything is built.
pub fn from_polygons<I: MeshIndex, F: AsRef<[usize]>>(
    vertices: &[Point3<f32>],
    faces: &[F],
) -> Result<HalfEdgeMesh<I>> {
    for face in faces {
        if let Some(&bad) = face.as_ref().iter().find(|&&vi| vi >= vertices.len()) {
            return Err(MeshError::out_of_range("vertex", bad, vertices.len()));
        }
    }

    let num_halfedges: usize = faces.iter().map(|f| f.as_ref().len()).sum();
    let mut mesh = HalfEdgeMesh::with_capacity(vertices.len(), num_halfedges, faces.len());

    let vertex_ids = vertices
        .iter()
        .map(|&p| mesh.try_add_point(p))
        .collect::<Result<Vec<VertexId<I>>>>()?;

    let mut corners = Vec::new();
    for face in faces {
        corners.clear();
        corners.extend(face.as_ref().iter().rev().map(|&vi| vertex_ids[vi]));
        mesh.add_face(&corners)?;
    }

    let pairs = mesh.pair_shared_edges();
    log::debug!(
        "imported {} vertices, {} faces, {} paired edges, {} boundary half-edges",
        mesh.num_vertices(),
        mesh.num_faces(),
        pairs,
        mesh.num_halfedges() - 2 * pairs
    );

    Ok(mesh)
}

/// Flatten a half-edge mesh to positions and triangles.
///
/// Positions keep the vertex order. Each face is fan-triangulated from the
/// first vertex of [`vertices_around_face`](HalfEdgeMesh::vertices_around_face),
/// which is only shape-correct for convex planar polygons.
pub fn to_triangles<I: MeshIndex>(mesh: &HalfEdgeMesh<I>) -> (Vec<Point3<f32>>, Vec<[usize; 3]>) {
    let vertices: Vec<Point3<f32>> = mesh.vertex_ids().map(|v| *mesh.position(v)).collect();

    let mut triangles = Vec::with_capacity(mesh.num_faces());
    let mut corners = Vec::new();
    for f in mesh.face_ids() {
        corners.clear();
        corners.extend(mesh.vertices_around_face(f).map(|v| v.index()));
        for i in 1..corners.len().saturating_sub(1) {
            triangles.push([corners[0], corners[i], corners[i + 1]]);
        }
    }

    (vertices, triangles)
}

#[derive(Clone, Copy)]
enum EdgeSlot<I: MeshIndex> {
    Open {
        halfedge: HalfEdgeId<I>,
        origin: VertexId<I>,
    },
    Paired,
}

impl<I: MeshIndex> HalfEdgeMesh<I> {
    /// Pair every unpaired half-edge with the other unpaired half-edge that
    /// joins the same two vertices.
    ///
    /// Edges are keyed by their unordered vertex pair; the first half-edge
    /// seen along an edge waits for the second. Half-edges that already have
    /// a pair are left alone, and a third or later half-edge along an edge
    /// that is already paired stays unpaired. Returns the number of pairs
    /// linked.
    pub fn pair_shared_edges(&mut self) -> usize {
        let edges: Vec<_> = self
            .face_ids()
            .flat_map(|f| self.face_edges(f))
            .filter(|&(he, _, _)| self.pair(he).is_none())
            .collect();

        let mut slots: HashMap<(VertexId<I>, VertexId<I>), EdgeSlot<I>> = HashMap::new();
        let mut links = Vec::new();
        let mut misoriented = 0usize;
        let mut overflow = 0usize;

        for (he, from, to) in edges {
            match slots.entry((from.min(to), from.max(to))) {
                Entry::Vacant(slot) => {
                    slot.insert(EdgeSlot::Open {
                        halfedge: he,
                        origin: from,
                    });
                }
                Entry::Occupied(mut slot) => match *slot.get() {
                    EdgeSlot::Open { halfedge, origin } => {
                        if origin == from {
                            misoriented += 1;
                        }
                        links.push((halfedge, he));
                        slot.insert(EdgeSlot::Paired);
                    }
                    EdgeSlot::Paired => overflow += 1,
                },
            }
        }

        if misoriented > 0 {
            log::warn!(
                "{} shared edges run the same direction in both faces; winding is inconsistent",
                misoriented
            );
        }

        if overflow > 0 {
            log::warn!(
                "{} half-edges lie on edges with more than two faces and were left unpaired",
                overflow
            );
        }

        for &(a, b) in &links {
            self.connect_opposites(a, b);
        }
        log::debug!(
            "paired {} edges ({} misoriented, {} non-manifold half-edges left open)",
            links.len(),
            misoriented,
            overflow
        );
        links.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn single_triangle() -> (Vec<Point3<f32>>, Vec<[usize; 3]>) {
        let vertices = vec![
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(0.5, 1.0, 0.0),
        ];
        (vertices, vec![[0, 1, 2]])
    }

    fn two_triangles() -> (Vec<Point3<f32>>, Vec<[usize; 3]>) {
        // Two triangles sharing edge 0-1
        let vertices = vec![
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(0.5, 1.0, 0.0),
            Point3::new(0.5, -1.0, 0.0),
        ];
        (vertices, vec![[0, 1, 2], [1, 0, 3]])
    }

    fn tetrahedron() -> (Vec<Point3<f32>>, Vec<[usize; 3]>) {
        let vertices = vec![
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(0.5, 1.0, 0.0),
            Point3::new(0.5, 0.5, 1.0),
        ];
        (vertices, vec![[0, 2, 1], [0, 1, 3], [1, 2, 3], [2, 0, 3]])
    }

    /// Rotate a triangle so its smallest index comes first.
    fn canonical(t: [usize; 3]) -> [usize; 3] {
        let k = (0..3).min_by_key(|&i| t[i]).unwrap();
        [t[k], t[(k + 1) % 3], t[(k + 2) % 3]]
    }

    fn canonical_set(tris: &[[usize; 3]]) -> Vec<[usize; 3]> {
        let mut out: Vec<[usize; 3]> = tris.iter().map(|&t| canonical(t)).collect();
        out.sort();
        out
    }

    #[test]
    fn test_single_triangle() {
        let (vertices, triangles) = single_triangle();
        let mesh: HalfEdgeMesh<u32> = from_triangles(&vertices, &triangles).unwrap();

        assert_eq!(mesh.num_vertices(), 3);
        assert_eq!(mesh.num_faces(), 1);
        assert_eq!(mesh.num_halfedges(), 3);
        assert!(mesh.validate());
        assert!(mesh.halfedge_ids().all(|he| mesh.is_boundary_halfedge(he)));
    }

    #[test]
    fn test_keeps_host_corner_order() {
        let (vertices, triangles) = single_triangle();
        let mesh: HalfEdgeMesh<u32> = from_triangles(&vertices, &triangles).unwrap();

        let corners: Vec<usize> = mesh
            .vertices_around_face(mesh.face_ids().next().unwrap())
            .map(|v| v.index())
            .collect();
        assert_eq!(canonical([corners[0], corners[1], corners[2]]), [0, 1, 2]);
    }

    #[test]
    fn test_two_triangles_pair_shared_edge() {
        let (vertices, triangles) = two_triangles();
        let mesh: HalfEdgeMesh<u32> = from_triangles(&vertices, &triangles).unwrap();

        assert_eq!(mesh.num_halfedges(), 6);
        assert!(mesh.validate());

        let a = mesh.halfedge_between(VertexId::new(0), VertexId::new(1)).unwrap();
        let b = mesh.halfedge_between(VertexId::new(1), VertexId::new(0)).unwrap();
        assert_eq!(mesh.pair(a), Some(b));
        assert_eq!(mesh.pair(b), Some(a));

        let paired = mesh.halfedge_ids().filter(|&he| mesh.pair(he).is_some()).count();
        assert_eq!(paired, 2);
    }

    #[test]
    fn test_closed_mesh_is_fully_paired() {
        let (vertices, triangles) = tetrahedron();
        let mesh: HalfEdgeMesh<u32> = from_triangles(&vertices, &triangles).unwrap();

        assert_eq!(mesh.num_halfedges(), 12);
        assert!(mesh.is_closed());
        for he in mesh.halfedge_ids() {
            let pair = mesh.pair(he).unwrap();
            assert_eq!(mesh.pair(pair), Some(he));
            assert_eq!(mesh.target(pair), mesh.origin(he));
        }
    }

    #[test]
    fn test_roundtrip() {
        let (vertices, triangles) = tetrahedron();
        let mesh: HalfEdgeMesh<u32> = from_triangles(&vertices, &triangles).unwrap();

        let (out_verts, out_tris) = to_triangles(&mesh);

        assert_eq!(out_verts, vertices);
        assert_eq!(canonical_set(&out_tris), canonical_set(&triangles));
    }

    #[test]
    fn test_fan_triangulation() {
        // Convex pentagon
        let vertices = vec![
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(0.3, 0.95, 0.0),
            Point3::new(-0.8, 0.6, 0.0),
            Point3::new(-0.8, -0.6, 0.0),
            Point3::new(0.3, -0.95, 0.0),
        ];
        let faces: Vec<Vec<usize>> = vec![vec![0, 1, 2, 3, 4]];
        let mesh: HalfEdgeMesh<u32> = from_polygons(&vertices, &faces).unwrap();
        assert_eq!(mesh.face_degree(mesh.face_ids().next().unwrap()), 5);

        let (_, tris) = to_triangles(&mesh);
        assert_eq!(tris.len(), 3);
        let apex = tris[0][0];
        assert!(tris.iter().all(|t| t[0] == apex));
        assert_eq!(tris[0][2], tris[1][1]);
        assert_eq!(tris[1][2], tris[2][1]);
    }

    #[test]
    fn test_out_of_range_index() {
        let vertices = vec![Point3::new(0.0, 0.0, 0.0)];
        let triangles = vec![[0, 1, 2]];

        let result: Result<HalfEdgeMesh<u32>> = from_triangles(&vertices, &triangles);
        assert!(matches!(
            result,
            Err(MeshError::OutOfRange { element: "vertex", index: 1, len: 1 })
        ));
    }

    #[test]
    fn test_degenerate_triangle() {
        let (vertices, _) = single_triangle();
        let result: Result<HalfEdgeMesh<u32>> = from_triangles(&vertices, &[[0, 0, 2]]);
        assert!(matches!(result, Err(MeshError::InvalidTopology(_))));
    }

    #[test]
    fn test_third_face_on_edge_stays_unpaired() {
        // Three triangles hinged on edge 0-1
        let vertices = vec![
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(0.5, 1.0, 0.0),
            Point3::new(0.5, -1.0, 0.0),
            Point3::new(0.5, 0.0, 1.0),
        ];
        let triangles = vec![[0, 1, 2], [1, 0, 3], [0, 1, 4]];

        let mesh: HalfEdgeMesh<u32> = from_triangles(&vertices, &triangles).unwrap();
        assert!(mesh.validate());

        let (v0, v1) = (VertexId::new(0), VertexId::new(1));
        let hinge: Vec<HalfEdgeId> = mesh
            .halfedge_ids()
            .filter(|&he| {
                let (a, b) = (mesh.origin(he), mesh.target(he));
                (a == v0 && b == v1) || (a == v1 && b == v0)
            })
            .collect();
        assert_eq!(hinge.len(), 3);

        // First two faces pair up, the third is left open
        assert!(mesh.pair(hinge[0]).is_some());
        assert_eq!(mesh.pair(hinge[0]), Some(hinge[1]));
        assert!(mesh.pair(hinge[2]).is_none());
    }

    #[test]
    fn test_pairing_is_idempotent() {
        let (vertices, triangles) = tetrahedron();
        let mut mesh: HalfEdgeMesh<u32> = from_triangles(&vertices, &triangles).unwrap();
        assert_eq!(mesh.pair_shared_edges(), 0);
        assert!(mesh.validate());
    }

    #[test]
    fn test_manual_faces_paired_afterwards() {
        let mut mesh = HalfEdgeMesh::<u32>::new();
        let v: Vec<VertexId> = [(0.0, 0.0), (1.0, 0.0), (1.0, 1.0), (0.0, 1.0)]
            .iter()
            .map(|&(x, y)| mesh.add_vertex(x, y, 0.0))
            .collect();
        mesh.add_face(&[v[2], v[1], v[0]]).unwrap();
        mesh.add_face(&[v[0], v[3], v[2]]).unwrap();
        assert!(mesh.halfedge_ids().all(|he| mesh.pair(he).is_none()));

        assert_eq!(mesh.pair_shared_edges(), 1);
        assert!(mesh.validate());
    }
}
