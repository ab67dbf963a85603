//! Half-edge mesh store.
//!
//! This module holds the topology records and the arena that owns them.
//!
//! # Structure
//!
//! - Each face is a closed loop of **half-edges** linked through `next`,
//!   stored counter-clockwise when viewed from outside
//! - Each half-edge knows its **target** vertex (the vertex it points to),
//!   its **next** half-edge in the loop, its owning **face**, and optionally
//!   its **pair**, the half-edge of the neighbouring face that runs along the
//!   same edge in the opposite direction
//! - Each vertex records one outgoing half-edge as a traversal seed
//! - Each face records one half-edge of its loop
//!
//! # Boundaries
//!
//! There are no boundary half-edges. An edge with only one incident face has
//! a half-edge whose `pair` is absent.
//!
//! # Pairing
//!
//! [`HalfEdgeMesh::add_face`] never looks for neighbours. Pairs are linked by
//! the caller with [`HalfEdgeMesh::connect_opposites`], or in bulk with
//! [`HalfEdgeMesh::pair_shared_edges`].

use nalgebra::Point3;

use super::index::{FaceId, HalfEdgeId, MeshIndex, VertexId};
use crate::error::{InvariantViolation, MeshError, Result};

/// A vertex in the half-edge mesh.
#[derive(Debug, Clone)]
pub struct Vertex<I: MeshIndex = u32> {
    /// The 3D position of this vertex.
    pub position: Point3<f32>,

    /// Some half-edge leaving this vertex. Absent until a face uses the vertex.
    pub halfedge: HalfEdgeId<I>,
}

impl<I: MeshIndex> Vertex<I> {
    /// Create a new, unconnected vertex.
    pub fn new(position: Point3<f32>) -> Self {
        Self {
            position,
            halfedge: HalfEdgeId::invalid(),
        }
    }
}

/// A directed edge owned by exactly one face.
#[derive(Debug, Clone, Copy)]
pub struct HalfEdge<I: MeshIndex = u32> {
    /// The vertex this half-edge points to.
    pub vertex: VertexId<I>,

    /// The opposite half-edge on the adjacent face; invalid on a boundary.
    pub pair: HalfEdgeId<I>,

    /// The next half-edge around the face (counter-clockwise).
    pub next: HalfEdgeId<I>,

    /// The face this half-edge belongs to.
    pub face: FaceId<I>,
}

impl<I: MeshIndex> HalfEdge<I> {
    /// Create a half-edge with every reference absent.
    pub fn new() -> Self {
        Self {
            vertex: VertexId::invalid(),
            pair: HalfEdgeId::invalid(),
            next: HalfEdgeId::invalid(),
            face: FaceId::invalid(),
        }
    }
}

impl<I: MeshIndex> Default for HalfEdge<I> {
    fn default() -> Self {
        Self::new()
    }
}

/// A polygonal face.
#[derive(Debug, Clone, Copy)]
pub struct Face<I: MeshIndex = u32> {
    /// Start of this face's half-edge loop.
    pub halfedge: HalfEdgeId<I>,
}

impl<I: MeshIndex> Face<I> {
    /// Create a face starting at the given half-edge.
    pub fn new(halfedge: HalfEdgeId<I>) -> Self {
        Self { halfedge }
    }
}

/// Arena-backed half-edge mesh.
///
/// Vertices, half-edges and faces live in three append-only vectors and
/// refer to each other by index. Nothing is ever removed, so a handle stays
/// valid for the lifetime of the mesh that issued it.
#[derive(Debug, Clone)]
pub struct HalfEdgeMesh<I: MeshIndex = u32> {
    pub(crate) vertices: Vec<Vertex<I>>,
    pub(crate) halfedges: Vec<HalfEdge<I>>,
    pub(crate) faces: Vec<Face<I>>,
}

impl<I: MeshIndex> Default for HalfEdgeMesh<I> {
    fn default() -> Self {
        Self::new()
    }
}

impl<I: MeshIndex> HalfEdgeMesh<I> {
    /// Create a new empty mesh.
    pub fn new() -> Self {
        Self {
            vertices: Vec::new(),
            halfedges: Vec::new(),
            faces: Vec::new(),
        }
    }

    /// Create an empty mesh with room for the given element counts.
    pub fn with_capacity(num_vertices: usize, num_halfedges: usize, num_faces: usize) -> Self {
        Self {
            vertices: Vec::with_capacity(num_vertices),
            halfedges: Vec::with_capacity(num_halfedges),
            faces: Vec::with_capacity(num_faces),
        }
    }

    // ==================== Accessors ====================
    //
    // Element accessors index the arenas directly and panic on a handle
    // this mesh did not issue. The walkers in `query` yield nothing instead.

    /// Get the number of vertices.
    #[inline]
    pub fn num_vertices(&self) -> usize {
        self.vertices.len()
    }

    /// Get the number of half-edges.
    #[inline]
    pub fn num_halfedges(&self) -> usize {
        self.halfedges.len()
    }

    /// Get the number of faces.
    #[inline]
    pub fn num_faces(&self) -> usize {
        self.faces.len()
    }

    /// Get a vertex by ID.
    #[inline]
    pub fn vertex(&self, id: VertexId<I>) -> &Vertex<I> {
        &self.vertices[id.index()]
    }

    /// Get a half-edge by ID.
    #[inline]
    pub fn halfedge(&self, id: HalfEdgeId<I>) -> &HalfEdge<I> {
        &self.halfedges[id.index()]
    }

    /// Get a face by ID.
    #[inline]
    pub fn face(&self, id: FaceId<I>) -> &Face<I> {
        &self.faces[id.index()]
    }

    /// Get the position of a vertex.
    #[inline]
    pub fn position(&self, v: VertexId<I>) -> &Point3<f32> {
        &self.vertex(v).position
    }

    /// The vertex a half-edge points to.
    #[inline]
    pub fn target(&self, he: HalfEdgeId<I>) -> VertexId<I> {
        self.halfedge(he).vertex
    }

    /// The next half-edge around the face.
    #[inline]
    pub fn next(&self, he: HalfEdgeId<I>) -> HalfEdgeId<I> {
        self.halfedge(he).next
    }

    /// The opposite half-edge, if the edge is shared with another face.
    #[inline]
    pub fn pair(&self, he: HalfEdgeId<I>) -> Option<HalfEdgeId<I>> {
        self.halfedge(he).pair.valid()
    }

    /// The face owning a half-edge.
    #[inline]
    pub fn face_of(&self, he: HalfEdgeId<I>) -> FaceId<I> {
        self.halfedge(he).face
    }

    /// The recorded outgoing half-edge of a vertex.
    #[inline]
    pub fn outgoing(&self, v: VertexId<I>) -> Option<HalfEdgeId<I>> {
        self.vertex(v).halfedge.valid()
    }

    /// Iterate over all vertex IDs.
    pub fn vertex_ids(&self) -> impl Iterator<Item = VertexId<I>> + '_ {
        (0..self.vertices.len()).map(VertexId::new)
    }

    /// Iterate over all half-edge IDs.
    pub fn halfedge_ids(&self) -> impl Iterator<Item = HalfEdgeId<I>> + '_ {
        (0..self.halfedges.len()).map(HalfEdgeId::new)
    }

    /// Iterate over all face IDs.
    pub fn face_ids(&self) -> impl Iterator<Item = FaceId<I>> + '_ {
        (0..self.faces.len()).map(FaceId::new)
    }

    // ==================== Construction ====================

    /// Append a vertex with no outgoing half-edge.
    pub fn add_vertex(&mut self, x: f32, y: f32, z: f32) -> VertexId<I> {
        self.add_point(Point3::new(x, y, z))
    }

    /// Append a vertex at `position`.
    ///
    /// # Panics
    ///
    /// Panics if the vertex arena already holds as many vertices as `I` can
    /// address. Use [`try_add_point`](Self::try_add_point) to get an error
    /// instead.
    pub fn add_point(&mut self, position: Point3<f32>) -> VertexId<I> {
        match self.try_add_point(position) {
            Ok(id) => id,
            Err(e) => panic!("{}", e),
        }
    }

    /// Append a vertex at `position`, failing once the index type is
    /// exhausted.
    ///
    /// # Errors
    ///
    /// [`MeshError::OutOfRange`] if the new vertex would not be addressable.
    pub fn try_add_point(&mut self, position: Point3<f32>) -> Result<VertexId<I>> {
        let limit = Self::arena_limit();
        if self.vertices.len() >= limit {
            return Err(MeshError::out_of_range("vertex", self.vertices.len(), limit));
        }
        let id = VertexId::new(self.vertices.len());
        self.vertices.push(Vertex::new(position));
        Ok(id)
    }

    /// Number of elements a single arena can address with index type `I`.
    fn arena_limit() -> usize {
        I::MAX.to_usize().saturating_add(1)
    }

    /// Add a polygon bounded by `vertices`.
    ///
    /// The loop is given in clockwise order and stored reversed, so walking
    /// `next` visits the corners counter-clockwise. One half-edge is created
    /// per side, the face records the first of them, and every corner's
    /// outgoing half-edge is overwritten with the one leaving it in this face.
    ///
    /// No pairing is done here; see [`connect_opposites`](Self::connect_opposites).
    ///
    /// # Errors
    ///
    /// [`MeshError::InvalidTopology`] for fewer than three or repeated
    /// vertices, [`MeshError::OutOfRange`] for a handle this mesh did not
    /// issue or when the new half-edges or face would not be addressable
    /// with index type `I`. The mesh is untouched on error.
    pub fn add_face(&mut self, vertices: &[VertexId<I>]) -> Result<FaceId<I>> {
        if vertices.len() < 3 {
            return Err(MeshError::InvalidTopology(format!(
                "a face needs at least 3 vertices, got {}",
                vertices.len()
            )));
        }
        for (i, &v) in vertices.iter().enumerate() {
            if !v.is_valid() || v.index() >= self.vertices.len() {
                return Err(MeshError::out_of_range(
                    "vertex",
                    v.index(),
                    self.vertices.len(),
                ));
            }
            if vertices[..i].contains(&v) {
                return Err(MeshError::InvalidTopology(format!(
                    "vertex {} appears more than once in a face",
                    v.index()
                )));
            }
        }

        let n = vertices.len();
        let base = self.halfedges.len();
        let limit = Self::arena_limit();
        if base + n > limit {
            return Err(MeshError::out_of_range("half-edge", base + n - 1, limit));
        }
        if self.faces.len() >= limit {
            return Err(MeshError::out_of_range("face", self.faces.len(), limit));
        }

        let corners: Vec<VertexId<I>> = vertices.iter().rev().copied().collect();
        let face_id = FaceId::new(self.faces.len());

        for i in 0..n {
            self.halfedges.push(HalfEdge {
                vertex: corners[(i + 1) % n],
                pair: HalfEdgeId::invalid(),
                next: HalfEdgeId::new(base + (i + 1) % n),
                face: face_id,
            });
        }
        self.faces.push(Face::new(HalfEdgeId::new(base)));

        // Last writer wins for vertices shared with earlier faces
        for (i, &v) in corners.iter().enumerate() {
            self.vertices[v.index()].halfedge = HalfEdgeId::new(base + i);
        }

        Ok(face_id)
    }

    /// Make `he1` and `he2` each other's pair.
    ///
    /// The caller guarantees they run along the same edge in opposite
    /// directions; nothing is checked.
    pub fn connect_opposites(&mut self, he1: HalfEdgeId<I>, he2: HalfEdgeId<I>) {
        self.halfedges[he1.index()].pair = he2;
        self.halfedges[he2.index()].pair = he1;
    }

    // ==================== Validation ====================

    /// Check that the mesh is structurally sound.
    pub fn validate(&self) -> bool {
        self.check_invariants().is_ok()
    }

    /// Scan the mesh and report the first broken invariant.
    ///
    /// Every half-edge must have a next half-edge, a face and a target
    /// vertex, and a recorded pair must pair back. Every face loop must close.
    /// Nothing is repaired.
    pub fn check_invariants(&self) -> std::result::Result<(), InvariantViolation> {
        let nh = self.halfedges.len();

        for (i, he) in self.halfedges.iter().enumerate() {
            if !he.next.is_valid() || he.next.index() >= nh {
                return Err(InvariantViolation::MissingNext(i));
            }
            if !he.face.is_valid() || he.face.index() >= self.faces.len() {
                return Err(InvariantViolation::MissingFace(i));
            }
            if !he.vertex.is_valid() || he.vertex.index() >= self.vertices.len() {
                return Err(InvariantViolation::MissingVertex(i));
            }
            if he.pair.is_valid() {
                let pair = he.pair.index();
                if pair >= nh || self.halfedges[pair].pair.index() != i {
                    return Err(InvariantViolation::AsymmetricPair { halfedge: i, pair });
                }
            }
        }

        for (fi, face) in self.faces.iter().enumerate() {
            let start = face.halfedge;
            if !start.is_valid() || start.index() >= nh {
                return Err(InvariantViolation::OpenFaceLoop(fi));
            }
            let mut current = self.halfedges[start.index()].next;
            let mut steps = 1;
            while current != start {
                if steps > nh {
                    return Err(InvariantViolation::OpenFaceLoop(fi));
                }
                current = self.halfedges[current.index()].next;
                steps += 1;
            }
        }

        Ok(())
    }
}
