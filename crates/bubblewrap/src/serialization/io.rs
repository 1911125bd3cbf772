//! String, stream and path entry points.

use std::fs::{File, OpenOptions};
use std::io::{BufReader, BufWriter, ErrorKind, Read, Write};
use std::path::Path;

use flate2::read::GzDecoder;
use flate2::write::GzEncoder;
use flate2::Compression;

use super::document::{Document, Loaded};
use super::SerializationError;
use crate::indexed::IndexedMesh;

/// Path-store controls.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct StoreOptions {
    /// Gzip regardless of the extension.
    pub force_compression: bool,
    /// Overwrite an existing file.
    pub clobber: bool,
}

/// Whether `path` names a compressed document (`.cpz`, any case).
pub fn is_compressed_path(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("cpz"))
}

pub fn to_string(doc: &Document) -> Result<String, SerializationError> {
    Ok(serde_json::to_string(doc)?)
}

pub fn to_writer<W: Write>(writer: W, doc: &Document) -> Result<(), SerializationError> {
    Ok(serde_json::to_writer(writer, doc)?)
}

pub fn from_str<M: IndexedMesh>(s: &str) -> Result<Loaded<M>, SerializationError> {
    serde_json::from_str::<Document>(s)?.into_loaded()
}

pub fn from_reader<M: IndexedMesh, R: Read>(reader: R) -> Result<Loaded<M>, SerializationError> {
    serde_json::from_reader::<_, Document>(reader)?.into_loaded()
}

/// Write `doc` to `path`, gzipped for `.cpz` or when forced.
pub fn store(path: &Path, doc: &Document, opts: StoreOptions) -> Result<(), SerializationError> {
    let mut oo = OpenOptions::new();
    oo.write(true);
    if opts.clobber {
        oo.create(true).truncate(true);
    } else {
        oo.create_new(true);
    }
    let file = oo.open(path).map_err(|e| match e.kind() {
        ErrorKind::AlreadyExists => SerializationError::Exists(path.to_path_buf()),
        _ => SerializationError::Io(e),
    })?;
    let compressed = opts.force_compression || is_compressed_path(path);
    if compressed {
        let mut gz = GzEncoder::new(BufWriter::new(file), Compression::default());
        to_writer(&mut gz, doc)?;
        gz.finish()?.flush()?;
    } else {
        let mut w = BufWriter::new(file);
        to_writer(&mut w, doc)?;
        w.flush()?;
    }
    tracing::debug!(path = %path.display(), compressed, "stored document");
    Ok(())
}

/// Read a document from `path`, decompressing `.cpz` or when forced.
pub fn load<M: IndexedMesh>(path: &Path, force_decompression: bool) -> Result<Loaded<M>, SerializationError> {
    let reader = BufReader::new(File::open(path)?);
    if force_decompression || is_compressed_path(path) {
        from_reader(GzDecoder::new(reader))
    } else {
        from_reader(reader)
    }
}
