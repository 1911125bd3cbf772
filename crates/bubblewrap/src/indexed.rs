//! Frozen, stably indexed meshes.
//!
//! Freezing drops the vertices discarded by surgery (keeping the arena order
//! of the survivors), validates the half-edge graph, and groups half-edges
//! into unoriented-edge classes. After this point the mesh is read-only.
//!
//! Numbering contract (relied on by stored documents):
//! - `idx` of a vertex, half-edge or face is its position in the frozen arena.
//! - Scanning half-edges by `idx`, a half-edge whose twin was already seen
//!   takes the twin's `uidx`; any other half-edge opens the next class.
//!   Boundary half-edges therefore get a class of their own.

use uuid::Uuid;

use crate::dcel::{Dcel, HalfEdgeId, TopologyError, VertexId};

/// Immutable mesh with unoriented-edge classes and an identity stamp.
#[derive(Clone, Debug)]
pub struct IndexedDcel {
    mesh: Dcel,
    uidx: Vec<usize>,
    ue: Vec<HalfEdgeId>,
    uuid: Uuid,
}

impl IndexedDcel {
    /// Freeze `mesh` under a fresh random identifier.
    pub fn new(mesh: Dcel) -> Result<Self, TopologyError> {
        Self::with_uuid(mesh, Uuid::new_v4())
    }

    /// Freeze `mesh` keeping a known identifier (e.g. one read back from disk).
    pub fn with_uuid(mesh: Dcel, uuid: Uuid) -> Result<Self, TopologyError> {
        let mesh = compact(mesh)?;
        validate(&mesh)?;
        let (uidx, ue) = unoriented_classes(&mesh);
        tracing::debug!(
            vertices = mesh.num_vertices(),
            edges = mesh.num_edges(),
            faces = mesh.num_faces(),
            uedges = ue.len(),
            %uuid,
            "froze mesh"
        );
        Ok(Self {
            mesh,
            uidx,
            ue,
            uuid,
        })
    }

    #[inline]
    pub fn mesh(&self) -> &Dcel {
        &self.mesh
    }

    #[inline]
    pub fn uuid(&self) -> Uuid {
        self.uuid
    }

    /// Unoriented-edge class of half-edge `e`.
    #[inline]
    pub fn uidx(&self, e: HalfEdgeId) -> usize {
        self.uidx[e.0]
    }

    /// One representative half-edge per unoriented edge, in `uidx` order.
    #[inline]
    pub fn unoriented_edges(&self) -> &[HalfEdgeId] {
        &self.ue
    }

    #[inline]
    pub fn num_unoriented_edges(&self) -> usize {
        self.ue.len()
    }

    pub fn into_mesh(self) -> Dcel {
        self.mesh
    }
}

/// Types wrapping a frozen mesh; loaders construct whichever one the caller asks for.
pub trait IndexedMesh: Sized {
    fn from_indexed(mesh: IndexedDcel) -> Self;
    fn indexed(&self) -> &IndexedDcel;
}

impl IndexedMesh for IndexedDcel {
    fn from_indexed(mesh: IndexedDcel) -> Self {
        mesh
    }
    fn indexed(&self) -> &IndexedDcel {
        self
    }
}

fn compact(d: Dcel) -> Result<Dcel, TopologyError> {
    let Dcel {
        vertices,
        mut edges,
        faces,
    } = d;
    let mut remap: Vec<Option<VertexId>> = vec![None; vertices.len()];
    let mut live = Vec::with_capacity(vertices.len());
    for (k, v) in vertices.into_iter().enumerate() {
        if v.removed {
            continue;
        }
        remap[k] = Some(VertexId(live.len()));
        live.push(v);
    }
    for (k, he) in edges.iter_mut().enumerate() {
        he.src = remap
            .get(he.src.0)
            .copied()
            .flatten()
            .ok_or(TopologyError::DanglingVertex {
                edge: HalfEdgeId(k),
                vertex: he.src,
            })?;
    }
    Ok(Dcel::from_parts(live, edges, faces))
}

/// Check every reference is in range and the mesh invariants hold.
fn validate(d: &Dcel) -> Result<(), TopologyError> {
    let ne = d.num_edges();
    for e in d.edge_ids() {
        let he = d.edge(e);
        if he.next.0 >= ne
            || he.prev.0 >= ne
            || he.face.0 >= d.num_faces()
            || d.prev(he.next) != e
            || d.next(he.prev) != e
            || d.edge(he.next).face != he.face
        {
            return Err(TopologyError::BrokenFaceCycle(e));
        }
        if let Some(t) = he.twin {
            if t.0 >= ne || d.twin(t) != Some(e) {
                return Err(TopologyError::NonInvolutiveTwin { edge: e, twin: t });
            }
        }
    }
    for v in d.vertex_ids() {
        let edge = d.vertex(v).leaving.ok_or(TopologyError::IsolatedVertex(v))?;
        if edge.0 >= ne || d.src(edge) != v {
            return Err(TopologyError::LeavingMismatch { vertex: v, edge });
        }
    }
    for f in d.face_ids() {
        let e = d.face(f).edge;
        if e.0 >= ne || d.edge(e).face != f {
            return Err(TopologyError::BrokenFaceCycle(e));
        }
    }
    Ok(())
}

fn unoriented_classes(d: &Dcel) -> (Vec<usize>, Vec<HalfEdgeId>) {
    let mut uidx = vec![0; d.num_edges()];
    let mut ue = Vec::new();
    for e in d.edge_ids() {
        match d.twin(e) {
            Some(t) if t < e => uidx[e.0] = uidx[t.0],
            _ => {
                uidx[e.0] = ue.len();
                ue.push(e);
            }
        }
    }
    (uidx, ue)
}
