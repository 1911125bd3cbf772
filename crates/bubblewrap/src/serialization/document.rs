//! Document schema and the conversion between frozen meshes and records.

use std::collections::BTreeMap;
use std::fmt;
use std::marker::PhantomData;

use serde::de::{MapAccess, SeqAccess, Visitor};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use uuid::Uuid;

use super::ndarray::{EncodedArray, Float64Array};
use super::SerializationError;
use crate::dcel::{Chain, Dcel, Face, FaceId, HalfEdge, HalfEdgeId, Vertex, VertexId};
use crate::indexed::{IndexedDcel, IndexedMesh};

pub const SCHEMA: &str = "cpj";
pub const SCHEMA_VERSION: &str = "0.0";

/// Named (sorted by name) or positional collection.
///
/// A JSON object reads as `Named`, an array as `Ordered`; errors inside an
/// entry are reported as they are.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Collection<T> {
    Named(BTreeMap<String, T>),
    Ordered(Vec<T>),
}

struct CollectionVisitor<T>(PhantomData<T>);

impl<'de, T: Deserialize<'de>> Visitor<'de> for CollectionVisitor<T> {
    type Value = Collection<T>;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a map of named entries or a list")
    }

    fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
        let mut m = BTreeMap::new();
        while let Some((k, v)) = access.next_entry::<String, T>()? {
            m.insert(k, v);
        }
        Ok(Collection::Named(m))
    }

    fn visit_seq<A: SeqAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
        let mut v = Vec::with_capacity(access.size_hint().unwrap_or(0));
        while let Some(t) = access.next_element()? {
            v.push(t);
        }
        Ok(Collection::Ordered(v))
    }
}

impl<'de, T: Deserialize<'de>> Deserialize<'de> for Collection<T> {
    fn deserialize<D: Deserializer<'de>>(d: D) -> Result<Self, D::Error> {
        d.deserialize_any(CollectionVisitor(PhantomData))
    }
}

impl<T> Collection<T> {
    pub fn len(&self) -> usize {
        match self {
            Collection::Named(m) => m.len(),
            Collection::Ordered(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Entry by name (named) or by decimal position (ordered).
    pub fn get(&self, key: &str) -> Option<&T> {
        match self {
            Collection::Named(m) => m.get(key),
            Collection::Ordered(v) => key.parse::<usize>().ok().and_then(|k| v.get(k)),
        }
    }

    /// `(label, item)` pairs; ordered entries are labelled by position.
    pub fn entries(&self) -> Vec<(String, &T)> {
        match self {
            Collection::Named(m) => m.iter().map(|(k, v)| (k.clone(), v)).collect(),
            Collection::Ordered(v) => v.iter().enumerate().map(|(k, t)| (k.to_string(), t)).collect(),
        }
    }

    pub fn map<U>(&self, mut f: impl FnMut(&T) -> U) -> Collection<U> {
        match self {
            Collection::Named(m) => Collection::Named(m.iter().map(|(k, v)| (k.clone(), f(v))).collect()),
            Collection::Ordered(v) => Collection::Ordered(v.iter().map(f).collect()),
        }
    }

    /// Fallible `map`; `f` also receives the entry's label.
    pub fn try_map<U, E>(&self, mut f: impl FnMut(&str, &T) -> Result<U, E>) -> Result<Collection<U>, E> {
        Ok(match self {
            Collection::Named(m) => Collection::Named(
                m.iter()
                    .map(|(k, v)| Ok((k.clone(), f(k, v)?)))
                    .collect::<Result<_, E>>()?,
            ),
            Collection::Ordered(v) => Collection::Ordered(
                v.iter()
                    .enumerate()
                    .map(|(k, t)| f(&k.to_string(), t))
                    .collect::<Result<_, E>>()?,
            ),
        })
    }
}

impl<T> From<BTreeMap<String, T>> for Collection<T> {
    fn from(m: BTreeMap<String, T>) -> Self {
        Collection::Named(m)
    }
}

impl<T> From<Vec<T>> for Collection<T> {
    fn from(v: Vec<T>) -> Self {
        Collection::Ordered(v)
    }
}

/// Half-edge chains by name or position.
pub type EdgeLists = Collection<Chain>;
/// Cross-ratio vectors by name or position, each indexed by `uidx`.
pub type Packings = Collection<Vec<f64>>;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Metadata {
    pub schema: String,
    pub schema_version: String,
    /// ISO-8601 UTC, suffixed `Z`.
    pub timestamp: String,
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

impl Metadata {
    /// Fresh metadata stamped now. String values in `extra` under `schema`,
    /// `schema_version` or `timestamp` replace the defaults; other values
    /// under those keys are dropped.
    pub fn now(mut extra: BTreeMap<String, Value>) -> Self {
        let ts = chrono::Utc::now().format("%Y-%m-%dT%H:%M:%S%.6f");
        let mut take = |key: &str, default: String| match extra.remove(key) {
            Some(Value::String(s)) => s,
            _ => default,
        };
        let schema = take("schema", SCHEMA.to_string());
        let schema_version = take("schema_version", SCHEMA_VERSION.to_string());
        let timestamp = take("timestamp", format!("{ts}Z"));
        Self {
            schema,
            schema_version,
            timestamp,
            extra,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct EdgeRecord {
    pub src: usize,
    pub next: usize,
    pub prev: usize,
    pub twin: Option<usize>,
    pub face: usize,
}

/// Mesh section: vertices and faces store one half-edge index each.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DcelRecord {
    pub uuid: Uuid,
    pub vertices: Vec<usize>,
    pub edges: Vec<EdgeRecord>,
    pub faces: Vec<usize>,
}

impl DcelRecord {
    pub fn from_indexed(id: &IndexedDcel) -> Self {
        let d = id.mesh();
        Self {
            uuid: id.uuid(),
            // Frozen meshes always have `leaving` set.
            vertices: d
                .vertex_ids()
                .map(|v| d.vertex(v).leaving.map_or(0, |e| e.0))
                .collect(),
            edges: d
                .edge_ids()
                .map(|e| {
                    let he = d.edge(e);
                    EdgeRecord {
                        src: he.src.0,
                        next: he.next.0,
                        prev: he.prev.0,
                        twin: he.twin.map(|t| t.0),
                        face: he.face.0,
                    }
                })
                .collect(),
            faces: d.face_ids().map(|f| d.face(f).edge.0).collect(),
        }
    }

    /// Rebuild and freeze the mesh, keeping the stored order and identifier.
    pub fn to_indexed(&self) -> Result<IndexedDcel, SerializationError> {
        let (nv, ne, nf) = (self.vertices.len(), self.edges.len(), self.faces.len());
        let check = |what: &'static str, index: usize, len: usize| {
            if index < len {
                Ok(index)
            } else {
                Err(SerializationError::IndexOutOfRange { what, index, len })
            }
        };
        let vertices = self
            .vertices
            .iter()
            .map(|&e| {
                Ok(Vertex {
                    leaving: Some(HalfEdgeId(check("vertex.leaving", e, ne)?)),
                    ..Vertex::default()
                })
            })
            .collect::<Result<Vec<_>, SerializationError>>()?;
        let edges = self
            .edges
            .iter()
            .map(|r| {
                Ok(HalfEdge {
                    src: VertexId(check("edge.src", r.src, nv)?),
                    next: HalfEdgeId(check("edge.next", r.next, ne)?),
                    prev: HalfEdgeId(check("edge.prev", r.prev, ne)?),
                    twin: r
                        .twin
                        .map(|t| check("edge.twin", t, ne).map(HalfEdgeId))
                        .transpose()?,
                    face: FaceId(check("edge.face", r.face, nf)?),
                })
            })
            .collect::<Result<Vec<_>, SerializationError>>()?;
        let faces = self
            .faces
            .iter()
            .map(|&e| Ok(Face { edge: HalfEdgeId(check("face.edge", e, ne)?) }))
            .collect::<Result<Vec<_>, SerializationError>>()?;
        Ok(IndexedDcel::with_uuid(
            Dcel::from_parts(vertices, edges, faces),
            self.uuid,
        )?)
    }
}

/// The stored document.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Document {
    pub metadata: Metadata,
    pub dcel: DcelRecord,
    pub edge_lists: Option<Collection<Vec<usize>>>,
    pub packings: Option<Collection<EncodedArray>>,
}

/// A loaded document, with the mesh wrapped in the requested type.
#[derive(Clone, Debug)]
pub struct Loaded<M> {
    pub metadata: Metadata,
    pub mesh: M,
    pub edge_lists: Option<EdgeLists>,
    pub packings: Option<Packings>,
}

impl Document {
    /// Snapshot `mesh` with optional chains, packings and extra metadata keys.
    pub fn new<M: IndexedMesh>(
        mesh: &M,
        edge_lists: Option<&EdgeLists>,
        packings: Option<&Packings>,
        extra: BTreeMap<String, Value>,
    ) -> Self {
        let edge_lists = edge_lists.map(|c| c.map(|ch| ch.iter().map(|e| e.0).collect()));
        let packings = packings.map(|c| c.map(|x| Float64Array::from_vec(x.clone()).into()));
        Self {
            metadata: Metadata::now(extra),
            dcel: DcelRecord::from_indexed(mesh.indexed()),
            edge_lists,
            packings,
        }
    }

    /// Rebuild the mesh as `M` and resolve chains and packings against it.
    pub fn into_loaded<M: IndexedMesh>(self) -> Result<Loaded<M>, SerializationError> {
        if self.metadata.schema != SCHEMA {
            return Err(SerializationError::Schema(self.metadata.schema));
        }
        let id = self.dcel.to_indexed()?;
        let ne = id.mesh().num_edges();
        let nx = id.num_unoriented_edges();
        let edge_lists = self
            .edge_lists
            .map(|c| {
                c.try_map(|_, idx| {
                    idx.iter()
                        .map(|&e| {
                            if e < ne {
                                Ok(HalfEdgeId(e))
                            } else {
                                Err(SerializationError::IndexOutOfRange {
                                    what: "edge list",
                                    index: e,
                                    len: ne,
                                })
                            }
                        })
                        .collect::<Result<Chain, _>>()
                })
            })
            .transpose()?;
        let packings = self
            .packings
            .map(|c| {
                c.try_map(|name, a| {
                    let a = a.clone().decode()?;
                    if a.shape().len() != 1 || a.values().len() != nx {
                        return Err(SerializationError::PackingLength {
                            name: name.to_string(),
                            expected: nx,
                            got: a.values().len(),
                        });
                    }
                    Ok(a.into_values())
                })
            })
            .transpose()?;
        Ok(Loaded {
            metadata: self.metadata,
            mesh: M::from_indexed(id),
            edge_lists,
            packings,
        })
    }
}
