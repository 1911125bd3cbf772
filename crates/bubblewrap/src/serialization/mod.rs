//! Portable documents for meshes, edge chains and solved packings.
//!
//! Purpose
//! - Store an indexed mesh with its marked chains and cross-ratio vectors as
//!   one JSON document (`.cpj`), optionally gzipped (`.cpz`), and read it back
//!   into any `IndexedMesh` type with identical numbering and identifier.
//!
//! Why this design
//! - Explicit serde records instead of free-form JSON: the edge-list and
//!   packing sections are a `Collection` (named map or ordered list), and
//!   float arrays carry a mandatory dtype and shape.
//! - Arrays are base64 byte images of little-endian `f64`, so packings
//!   round-trip exactly.
//!
//! Layout
//! - `document.rs` (schema, mesh records, rebuild), `ndarray.rs` (array
//!   encoding), `io.rs` (string/stream/path entry points).

use std::path::PathBuf;

use thiserror::Error;

use crate::dcel::TopologyError;

mod document;
mod io;
mod ndarray;

pub use document::{
    Collection, DcelRecord, Document, EdgeLists, EdgeRecord, Loaded, Metadata, Packings, SCHEMA,
    SCHEMA_VERSION,
};
pub use io::{from_reader, from_str, is_compressed_path, load, store, to_string, to_writer, StoreOptions};
pub use ndarray::{EncodedArray, Float64Array};

#[derive(Debug, Error)]
pub enum SerializationError {
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),
    #[error("malformed document: {0}")]
    Json(#[from] serde_json::Error),
    #[error("bad array payload: {0}")]
    Base64(#[from] base64::DecodeError),
    #[error("unsupported dtype {0:?}; only float64 is stored")]
    Dtype(String),
    #[error("shape {shape:?} does not hold {len} values")]
    Shape { shape: Vec<usize>, len: usize },
    #[error("unknown schema {0:?}")]
    Schema(String),
    #[error("{what} index {index} out of range (len {len})")]
    IndexOutOfRange {
        what: &'static str,
        index: usize,
        len: usize,
    },
    #[error("packing {name:?} has {got} values, mesh has {expected} unoriented edges")]
    PackingLength {
        name: String,
        expected: usize,
        got: usize,
    },
    #[error("stored mesh is invalid: {0}")]
    Topology(#[from] TopologyError),
    #[error("refusing to overwrite {}", .0.display())]
    Exists(PathBuf),
}

#[cfg(test)]
mod tests;
