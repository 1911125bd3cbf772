//! Arena records for the half-edge mesh and the elementary navigation moves.
//!
//! All cross references are plain indices into the arenas of one `Dcel`, so
//! the cyclic `next`/`prev`/`twin` graph carries no ownership cycles and maps
//! one-to-one onto the serialized form.

/// Identifier types for clarity.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct VertexId(pub usize);
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct HalfEdgeId(pub usize);
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FaceId(pub usize);

/// Vertex record: one outgoing half-edge (any `e` with `e.src == self`).
#[derive(Clone, Debug, Default)]
pub struct Vertex {
    pub leaving: Option<HalfEdgeId>,
    /// Set when surgery coalesces this vertex into another one.
    pub(crate) removed: bool,
}

/// Oriented edge on the boundary of exactly one face.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct HalfEdge {
    pub src: VertexId,
    pub next: HalfEdgeId,
    pub prev: HalfEdgeId,
    pub twin: Option<HalfEdgeId>, // None on a mesh boundary
    pub face: FaceId,
}

/// Face record: one half-edge of its oriented boundary cycle.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Face {
    pub edge: HalfEdgeId,
}

/// Mutable doubly-connected edge list.
///
/// Invariants (after every completed construction or surgery step):
/// - `next`/`prev` of every half-edge form face cycles.
/// - `twin` is involutive wherever it is set.
/// - every live vertex's `leaving` half-edge has that vertex as `src`
///   (up to vertices discarded by gluing, which are flagged `removed`).
#[derive(Clone, Debug, Default)]
pub struct Dcel {
    pub(crate) vertices: Vec<Vertex>,
    pub(crate) edges: Vec<HalfEdge>,
    pub(crate) faces: Vec<Face>,
}

/// Offsets produced by `Dcel::absorb`, translating handles of the absorbed mesh.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct IdShift {
    pub vertices: usize,
    pub edges: usize,
    pub faces: usize,
}

impl IdShift {
    #[inline]
    pub fn vertex(&self, v: VertexId) -> VertexId {
        VertexId(v.0 + self.vertices)
    }
    #[inline]
    pub fn edge(&self, e: HalfEdgeId) -> HalfEdgeId {
        HalfEdgeId(e.0 + self.edges)
    }
    #[inline]
    pub fn face(&self, f: FaceId) -> FaceId {
        FaceId(f.0 + self.faces)
    }
}

impl Dcel {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Assemble a mesh from raw arenas (all references must be in range).
    pub(crate) fn from_parts(vertices: Vec<Vertex>, edges: Vec<HalfEdge>, faces: Vec<Face>) -> Self {
        Self {
            vertices,
            edges,
            faces,
        }
    }

    /// Add an isolated vertex; its `leaving` is back-filled by the first face using it.
    pub fn add_vertex(&mut self) -> VertexId {
        let id = VertexId(self.vertices.len());
        self.vertices.push(Vertex::default());
        id
    }

    #[inline]
    pub fn vertex(&self, v: VertexId) -> &Vertex {
        &self.vertices[v.0]
    }
    #[inline]
    pub fn edge(&self, e: HalfEdgeId) -> &HalfEdge {
        &self.edges[e.0]
    }
    #[inline]
    pub fn face(&self, f: FaceId) -> &Face {
        &self.faces[f.0]
    }
    #[inline]
    pub(crate) fn edge_mut(&mut self, e: HalfEdgeId) -> &mut HalfEdge {
        &mut self.edges[e.0]
    }

    /// Whether `v` is still part of the mesh (not discarded by gluing).
    #[inline]
    pub fn is_live(&self, v: VertexId) -> bool {
        v.0 < self.vertices.len() && !self.vertices[v.0].removed
    }

    /// Live vertices in arena order.
    pub fn vertex_ids(&self) -> impl Iterator<Item = VertexId> + '_ {
        self.vertices
            .iter()
            .enumerate()
            .filter(|(_, v)| !v.removed)
            .map(|(k, _)| VertexId(k))
    }
    pub fn edge_ids(&self) -> impl Iterator<Item = HalfEdgeId> {
        (0..self.edges.len()).map(HalfEdgeId)
    }
    pub fn face_ids(&self) -> impl Iterator<Item = FaceId> {
        (0..self.faces.len()).map(FaceId)
    }

    pub fn num_vertices(&self) -> usize {
        self.vertices.iter().filter(|v| !v.removed).count()
    }
    #[inline]
    pub fn num_edges(&self) -> usize {
        self.edges.len()
    }
    #[inline]
    pub fn num_faces(&self) -> usize {
        self.faces.len()
    }

    // Navigation. `tri_*` rotate inside a face, `vert_*` rotate about `src`.

    #[inline]
    pub fn src(&self, e: HalfEdgeId) -> VertexId {
        self.edges[e.0].src
    }
    /// `dst := next.src`.
    #[inline]
    pub fn dst(&self, e: HalfEdgeId) -> VertexId {
        self.src(self.next(e))
    }
    #[inline]
    pub fn next(&self, e: HalfEdgeId) -> HalfEdgeId {
        self.edges[e.0].next
    }
    #[inline]
    pub fn prev(&self, e: HalfEdgeId) -> HalfEdgeId {
        self.edges[e.0].prev
    }
    #[inline]
    pub fn twin(&self, e: HalfEdgeId) -> Option<HalfEdgeId> {
        self.edges[e.0].twin
    }
    #[inline]
    pub fn is_boundary(&self, e: HalfEdgeId) -> bool {
        self.edges[e.0].twin.is_none()
    }
    #[inline]
    pub fn tri_ccw(&self, e: HalfEdgeId) -> HalfEdgeId {
        self.next(e)
    }
    #[inline]
    pub fn tri_cw(&self, e: HalfEdgeId) -> HalfEdgeId {
        self.prev(e)
    }
    #[inline]
    pub fn vert_ccw(&self, e: HalfEdgeId) -> Option<HalfEdgeId> {
        self.twin(self.prev(e))
    }
    #[inline]
    pub fn vert_cw(&self, e: HalfEdgeId) -> Option<HalfEdgeId> {
        self.twin(e).map(|t| self.next(t))
    }

    /// Next boundary half-edge after boundary half-edge `e`, walking the fan at `dst(e)`.
    ///
    /// Returns `None` if the walk wraps around to `e` without meeting another
    /// boundary half-edge.
    pub fn boundary_next(&self, e: HalfEdgeId) -> Option<HalfEdgeId> {
        let mut c = self.next(e);
        for _ in 0..=self.edges.len() {
            match self.twin(c) {
                None => return Some(c),
                Some(t) => {
                    c = self.next(t);
                    if c == e {
                        return None;
                    }
                }
            }
        }
        None
    }

    /// Previous boundary half-edge before boundary half-edge `e`, walking the fan at `src(e)`.
    pub fn boundary_prev(&self, e: HalfEdgeId) -> Option<HalfEdgeId> {
        let mut c = self.prev(e);
        for _ in 0..=self.edges.len() {
            match self.twin(c) {
                None => return Some(c),
                Some(t) => {
                    c = self.prev(t);
                    if c == e {
                        return None;
                    }
                }
            }
        }
        None
    }

    pub fn boundary_forward(&self, e: HalfEdgeId, k: usize) -> Option<HalfEdgeId> {
        (0..k).try_fold(e, |c, _| self.boundary_next(c))
    }

    pub fn boundary_backward(&self, e: HalfEdgeId, k: usize) -> Option<HalfEdgeId> {
        (0..k).try_fold(e, |c, _| self.boundary_prev(c))
    }

    /// Number of half-edges on the boundary cycle of face `f`.
    pub fn face_num_edges(&self, f: FaceId) -> usize {
        let start = self.faces[f.0].edge;
        let mut n = 1;
        let mut e = self.next(start);
        while e != start && n <= self.edges.len() {
            e = self.next(e);
            n += 1;
        }
        n
    }

    #[inline]
    pub fn face_num_vertices(&self, f: FaceId) -> usize {
        self.face_num_edges(f)
    }
}
