//! Adjacency queries and per-element geometry.
//!
//! All walks are read-only and run over the `next`/`pair` links:
//!
//! - around a face: follow `next` until back at the face's half-edge
//! - around a vertex: from the vertex's outgoing half-edge, hop `pair` then
//!   `next` to reach the following outgoing half-edge
//!
//! A vertex walk stops early at the first half-edge without a pair, so on a
//! mesh boundary it yields a partial ring that depends on which half-edge is
//! recorded as outgoing. Callers must not treat the ring length as the
//! valence of a boundary vertex.
//!
//! Every walk is also capped at the number of half-edges in the mesh so a
//! corrupted structure cannot cause an endless loop.

use std::collections::HashSet;

use nalgebra::{Point3, Vector3};

use super::halfedge::HalfEdgeMesh;
use super::index::{FaceId, HalfEdgeId, MeshIndex, VertexId};

/// Iterator over the half-edges of a face, in counter-clockwise order.
pub struct FaceHalfEdgeIter<'a, I: MeshIndex = u32> {
    mesh: &'a HalfEdgeMesh<I>,
    start: HalfEdgeId<I>,
    current: HalfEdgeId<I>,
    budget: usize,
}

impl<'a, I: MeshIndex> FaceHalfEdgeIter<'a, I> {
    fn new(mesh: &'a HalfEdgeMesh<I>, f: FaceId<I>) -> Self {
        let start = mesh
            .faces
            .get(f.index())
            .map(|face| face.halfedge)
            .filter(|he| he.is_valid() && he.index() < mesh.num_halfedges())
            .unwrap_or_default();
        Self {
            mesh,
            start,
            current: start,
            budget: if start.is_valid() { mesh.num_halfedges() } else { 0 },
        }
    }
}

impl<'a, I: MeshIndex> Iterator for FaceHalfEdgeIter<'a, I> {
    type Item = HalfEdgeId<I>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.budget == 0 {
            return None;
        }
        self.budget -= 1;

        let result = self.current;
        self.current = self.mesh.next(self.current);
        if self.current == self.start || !self.current.is_valid() {
            self.budget = 0;
        }
        Some(result)
    }
}

/// Iterator over the outgoing half-edges of a vertex.
///
/// Ends when the walk returns to the starting half-edge, or right after
/// yielding a half-edge that has no pair.
pub struct VertexRingIter<'a, I: MeshIndex = u32> {
    mesh: &'a HalfEdgeMesh<I>,
    start: HalfEdgeId<I>,
    current: HalfEdgeId<I>,
    budget: usize,
}

impl<'a, I: MeshIndex> VertexRingIter<'a, I> {
    fn new(mesh: &'a HalfEdgeMesh<I>, v: VertexId<I>) -> Self {
        let start = mesh
            .vertices
            .get(v.index())
            .map(|vertex| vertex.halfedge)
            .filter(|he| he.is_valid() && he.index() < mesh.num_halfedges())
            .unwrap_or_default();
        Self {
            mesh,
            start,
            current: start,
            budget: if start.is_valid() { mesh.num_halfedges() } else { 0 },
        }
    }
}

impl<'a, I: MeshIndex> Iterator for VertexRingIter<'a, I> {
    type Item = HalfEdgeId<I>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.budget == 0 {
            return None;
        }
        self.budget -= 1;

        let result = self.current;
        // If he runs v -> w, its pair runs w -> v and the pair's successor
        // leaves v again.
        match self.mesh.pair(self.current) {
            Some(pair) => {
                self.current = self.mesh.next(pair);
                if self.current == self.start {
                    self.budget = 0;
                }
            }
            None => self.budget = 0,
        }
        Some(result)
    }
}

impl<I: MeshIndex> HalfEdgeMesh<I> {
    // ==================== Traversal ====================

    /// Iterate over the half-edges of a face.
    ///
    /// An unknown face, or one without a half-edge, yields nothing.
    pub fn face_halfedges(&self, f: FaceId<I>) -> FaceHalfEdgeIter<'_, I> {
        FaceHalfEdgeIter::new(self, f)
    }

    /// Vertices bounding a face, counter-clockwise, starting at the target
    /// of the face's recorded half-edge.
    pub fn vertices_around_face(&self, f: FaceId<I>) -> impl Iterator<Item = VertexId<I>> + '_ {
        self.face_halfedges(f).map(|he| self.target(he))
    }

    /// Directed edges of a face as `(half-edge, origin, target)`.
    pub fn face_edges(&self, f: FaceId<I>) -> Vec<(HalfEdgeId<I>, VertexId<I>, VertexId<I>)> {
        let loop_hes: Vec<HalfEdgeId<I>> = self.face_halfedges(f).collect();
        let n = loop_hes.len();
        loop_hes
            .iter()
            .enumerate()
            .map(|(i, &he)| (he, self.target(loop_hes[(i + n - 1) % n]), self.target(he)))
            .collect()
    }

    /// Number of corners of a face.
    pub fn face_degree(&self, f: FaceId<I>) -> usize {
        self.face_halfedges(f).count()
    }

    /// The first three corners of a face in loop order.
    ///
    /// # Panics
    ///
    /// Panics if `f` was not issued by this mesh.
    pub fn face_triangle(&self, f: FaceId<I>) -> [VertexId<I>; 3] {
        let he0 = self.face(f).halfedge;
        let he1 = self.next(he0);
        let he2 = self.next(he1);
        [self.target(he0), self.target(he1), self.target(he2)]
    }

    /// Outgoing half-edges of a vertex; partial on a boundary.
    pub fn outgoing_halfedges(&self, v: VertexId<I>) -> VertexRingIter<'_, I> {
        VertexRingIter::new(self, v)
    }

    /// Neighbouring vertices, walked through `pair` links.
    ///
    /// Stops at the first unpaired half-edge, so boundary vertices get a
    /// partial ring.
    pub fn vertices_around_vertex(&self, v: VertexId<I>) -> impl Iterator<Item = VertexId<I>> + '_ {
        self.outgoing_halfedges(v).map(|he| self.target(he))
    }

    /// Faces incident to a vertex.
    ///
    /// Same walk as [`vertices_around_vertex`](Self::vertices_around_vertex),
    /// including the early stop at a boundary.
    pub fn faces_around_vertex(&self, v: VertexId<I>) -> impl Iterator<Item = FaceId<I>> + '_ {
        self.outgoing_halfedges(v).map(|he| self.face_of(he))
    }

    /// The half-edge preceding `he` in its face loop.
    pub fn prev(&self, he: HalfEdgeId<I>) -> HalfEdgeId<I> {
        let mut current = he;
        for _ in 0..self.num_halfedges() {
            let next = self.next(current);
            if next == he || !next.is_valid() {
                return current;
            }
            current = next;
        }
        current
    }

    /// The vertex a half-edge leaves from.
    pub fn origin(&self, he: HalfEdgeId<I>) -> VertexId<I> {
        self.target(self.prev(he))
    }

    /// Find the half-edge running `from -> to`, if any.
    ///
    /// This is a linear scan over all half-edges.
    pub fn halfedge_between(&self, from: VertexId<I>, to: VertexId<I>) -> Option<HalfEdgeId<I>> {
        self.halfedge_ids()
            .find(|&he| self.target(he) == to && self.origin(he) == from)
    }

    /// Whether a half-edge lies on the mesh boundary (has no pair).
    #[inline]
    pub fn is_boundary_halfedge(&self, he: HalfEdgeId<I>) -> bool {
        self.pair(he).is_none()
    }

    /// Whether every half-edge is paired.
    pub fn is_closed(&self) -> bool {
        self.halfedge_ids().all(|he| !self.is_boundary_halfedge(he))
    }

    /// Whether every face is a triangle.
    pub fn is_triangle_mesh(&self) -> bool {
        self.face_ids().all(|f| self.face_degree(f) == 3)
    }

    /// Undirected edges, each reported once as `(origin, target)` of the
    /// first half-edge seen along it.
    pub fn unique_edges(&self) -> Vec<(VertexId<I>, VertexId<I>)> {
        let mut seen = HashSet::new();
        let mut edges = Vec::new();
        for f in self.face_ids() {
            for (_, from, to) in self.face_edges(f) {
                if seen.insert((from.min(to), from.max(to))) {
                    edges.push((from, to));
                }
            }
        }
        edges
    }

    /// Number of undirected edges.
    pub fn num_edges(&self) -> usize {
        self.unique_edges().len()
    }

    // ==================== Geometry ====================

    /// Length of the directed edge a half-edge represents.
    ///
    /// # Panics
    ///
    /// Panics if `he` was not issued by this mesh.
    pub fn edge_length(&self, he: HalfEdgeId<I>) -> f32 {
        let p0 = self.position(self.origin(he));
        let p1 = self.position(self.target(he));
        (p1 - p0).norm()
    }

    fn face_corner_positions(&self, f: FaceId<I>) -> [Point3<f32>; 3] {
        let [v0, v1, v2] = self.face_triangle(f);
        [*self.position(v0), *self.position(v1), *self.position(v2)]
    }

    /// Area spanned by the first three corners of a face.
    ///
    /// Exact for triangles only.
    ///
    /// # Panics
    ///
    /// Panics if `f` was not issued by this mesh.
    pub fn face_area(&self, f: FaceId<I>) -> f32 {
        let [p0, p1, p2] = self.face_corner_positions(f);
        0.5 * (p1 - p0).cross(&(p2 - p0)).norm()
    }

    /// Unit normal from the first two edges of a face; zero if they are
    /// collinear.
    ///
    /// # Panics
    ///
    /// Panics if `f` was not issued by this mesh.
    pub fn face_normal(&self, f: FaceId<I>) -> Vector3<f32> {
        let [p0, p1, p2] = self.face_corner_positions(f);
        (p1 - p0)
            .cross(&(p2 - p1))
            .try_normalize(0.0)
            .unwrap_or_else(Vector3::zeros)
    }

    /// Normalized sum of incident face normals.
    ///
    /// Zero for an isolated vertex or when the normals cancel out.
    pub fn vertex_normal(&self, v: VertexId<I>) -> Vector3<f32> {
        self.faces_around_vertex(v)
            .map(|f| self.face_normal(f))
            .sum::<Vector3<f32>>()
            .try_normalize(0.0)
            .unwrap_or_else(Vector3::zeros)
    }

    /// Vertex normals indexed like the vertex arena.
    pub fn vertex_normals(&self) -> Vec<Vector3<f32>> {
        self.vertex_ids().map(|v| self.vertex_normal(v)).collect()
    }

    /// Sum of [`face_area`](Self::face_area) over all faces.
    pub fn surface_area(&self) -> f32 {
        self.face_ids().map(|f| self.face_area(f)).sum()
    }

    /// Axis-aligned bounds of all vertex positions.
    pub fn bounding_box(&self) -> Option<(Point3<f32>, Point3<f32>)> {
        let first = self.vertices.first()?.position;
        Some(self.vertices.iter().fold((first, first), |(min, max), v| {
            (min.inf(&v.position), max.sup(&v.position))
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mesh::from_triangles;

    /// Fan of four triangles around a centre vertex (index 0), open rim.
    fn fan() -> HalfEdgeMesh {
        let vertices = vec![
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(0.0, 1.0, 0.0),
            Point3::new(-1.0, 0.0, 0.0),
            Point3::new(0.0, -1.0, 0.0),
        ];
        let faces = vec![[0, 1, 2], [0, 2, 3], [0, 3, 4], [0, 4, 1]];
        from_triangles(&vertices, &faces).unwrap()
    }

    fn tetrahedron() -> HalfEdgeMesh {
        let vertices = vec![
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(0.5, 1.0, 0.0),
            Point3::new(0.5, 0.5, 1.0),
        ];
        let faces = vec![[0, 2, 1], [0, 1, 3], [1, 2, 3], [2, 0, 3]];
        from_triangles(&vertices, &faces).unwrap()
    }

    fn sorted(mut ids: Vec<VertexId>) -> Vec<usize> {
        ids.sort();
        ids.into_iter().map(|v| v.index()).collect()
    }

    #[test]
    fn test_vertices_around_face() {
        let mesh = fan();
        let corners: Vec<VertexId> = mesh.vertices_around_face(FaceId::new(1)).collect();
        assert_eq!(corners.len(), 3);
        assert_eq!(sorted(corners), vec![0, 2, 3]);
    }

    #[test]
    fn test_vertices_around_unknown_face_is_empty() {
        let mesh = fan();
        assert_eq!(mesh.vertices_around_face(FaceId::new(42)).count(), 0);
        assert_eq!(mesh.vertices_around_face(FaceId::invalid()).count(), 0);
    }

    #[test]
    fn test_vertex_ring_closed() {
        let mesh = tetrahedron();
        for v in mesh.vertex_ids() {
            let ring: Vec<VertexId> = mesh.vertices_around_vertex(v).collect();
            assert_eq!(ring.len(), 3, "vertex {:?}", v);
            assert!(!ring.contains(&v));

            let faces: Vec<FaceId> = mesh.faces_around_vertex(v).collect();
            assert_eq!(faces.len(), 3);
        }
    }

    #[test]
    fn test_interior_vertex_ring_in_open_fan() {
        let mesh = fan();
        let centre = VertexId::new(0);
        assert_eq!(sorted(mesh.vertices_around_vertex(centre).collect()), vec![1, 2, 3, 4]);
        assert_eq!(mesh.faces_around_vertex(centre).count(), 4);
    }

    #[test]
    fn test_boundary_vertex_ring_is_partial() {
        let mesh = fan();
        // Rim vertex 1 has neighbours 0, 2 and 4 but sits on the boundary
        let rim = VertexId::new(1);
        let ring: Vec<VertexId> = mesh.vertices_around_vertex(rim).collect();
        assert!(!ring.is_empty());
        assert!(ring.len() < 3);

        let faces: Vec<FaceId> = mesh.faces_around_vertex(rim).collect();
        assert_eq!(faces.len(), ring.len());
    }

    #[test]
    fn test_isolated_vertex_ring_is_empty() {
        let mut mesh = fan();
        let lonely = mesh.add_vertex(5.0, 5.0, 5.0);
        assert_eq!(mesh.vertices_around_vertex(lonely).count(), 0);
        assert_eq!(mesh.faces_around_vertex(lonely).count(), 0);
        assert_eq!(mesh.vertex_normal(lonely), Vector3::zeros());
    }

    #[test]
    fn test_origin_and_edge_length() {
        let mesh = fan();
        let he = mesh.halfedge_between(VertexId::new(0), VertexId::new(1)).unwrap();
        assert_eq!(mesh.origin(he), VertexId::new(0));
        assert_eq!(mesh.target(he), VertexId::new(1));
        assert!((mesh.edge_length(he) - 1.0).abs() < 1e-6);

        let diag = mesh.halfedge_between(VertexId::new(1), VertexId::new(2)).unwrap();
        assert!((mesh.edge_length(diag) - 2.0f32.sqrt()).abs() < 1e-6);
    }

    #[test]
    fn test_face_geometry() {
        let mesh = fan();
        let f = FaceId::new(0);
        assert!((mesh.face_area(f) - 0.5).abs() < 1e-6);
        assert!((mesh.face_normal(f) - Vector3::new(0.0, 0.0, 1.0)).norm() < 1e-6);
        assert!((mesh.surface_area() - 2.0).abs() < 1e-6);
    }

    #[test]
    fn test_vertex_normal_points_outward() {
        let mesh = tetrahedron();
        // Apex at (0.5, 0.5, 1.0) faces up and away from the base
        let n = mesh.vertex_normal(VertexId::new(3));
        assert!((n.norm() - 1.0).abs() < 1e-5);
        assert!(n.z > 0.0);

        let normals = mesh.vertex_normals();
        assert_eq!(normals.len(), 4);
        assert_eq!(normals[3], n);
    }

    #[test]
    fn test_unique_edges() {
        let mesh = tetrahedron();
        assert_eq!(mesh.num_edges(), 6);
        assert!(mesh.is_closed());

        let open = fan();
        assert_eq!(open.num_edges(), 8);
        assert!(!open.is_closed());
    }

    #[test]
    fn test_bounding_box() {
        let mesh = fan();
        let (min, max) = mesh.bounding_box().unwrap();
        assert_eq!(min, Point3::new(-1.0, -1.0, 0.0));
        assert_eq!(max, Point3::new(1.0, 1.0, 0.0));
        assert!(HalfEdgeMesh::<u32>::new().bounding_box().is_none());
    }

    #[test]
    #[should_panic]
    fn test_face_normal_of_foreign_face_panics() {
        let mesh = fan();
        mesh.face_normal(FaceId::new(42));
    }

    #[test]
    #[should_panic]
    fn test_edge_length_of_foreign_halfedge_panics() {
        let mesh = fan();
        mesh.edge_length(HalfEdgeId::new(mesh.num_halfedges()));
    }
}
