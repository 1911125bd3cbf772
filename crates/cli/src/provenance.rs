//! `*.provenance.json` sidecars for stored packing documents.

use anyhow::{Context, Result};
use serde::Serialize;
use serde_json::Value;
use std::fs;
use std::panic::Location;
use std::path::{Path, PathBuf};
use std::process::Command;

/// How a packing document came about.
pub struct Payload {
    /// CLI parameters, including the KAT controls.
    pub params: Value,
    /// Identity of the stored mesh.
    pub mesh_uuid: String,
    /// Whether the document was written gzipped.
    pub compressed: bool,
    /// Solve outcome: norm, iteration counts, generator traces.
    pub summary: Value,
}

impl Payload {
    pub fn new(params: Value, mesh_uuid: impl ToString) -> Self {
        Self {
            params,
            mesh_uuid: mesh_uuid.to_string(),
            compressed: false,
            summary: Value::Null,
        }
    }

    pub fn compressed(mut self, compressed: bool) -> Self {
        self.compressed = compressed;
        self
    }

    pub fn with_summary(mut self, summary: Value) -> Self {
        self.summary = summary;
        self
    }
}

#[derive(Serialize)]
struct CallSite<'a> {
    file: &'a str,
    line: u32,
}

#[derive(Serialize)]
struct Sidecar<'a> {
    code_rev: String,
    bubblewrap_version: &'static str,
    schema: &'static str,
    schema_version: &'static str,
    callsite: CallSite<'a>,
    mesh_uuid: &'a str,
    compressed: bool,
    params: &'a Value,
    summary: &'a Value,
    document: String,
}

/// Write the sidecar for `document` next to it and return its path.
#[track_caller]
pub fn write_sidecar(document: &Path, payload: &Payload) -> Result<PathBuf> {
    let path = provenance_path(document);
    let here = Location::caller();
    let sidecar = Sidecar {
        code_rev: current_git_rev(),
        bubblewrap_version: bubblewrap::VERSION,
        schema: bubblewrap::api::SCHEMA,
        schema_version: bubblewrap::api::SCHEMA_VERSION,
        callsite: CallSite {
            file: here.file(),
            line: here.line(),
        },
        mesh_uuid: &payload.mesh_uuid,
        compressed: payload.compressed,
        params: &payload.params,
        summary: &payload.summary,
        document: document.display().to_string(),
    };
    fs::write(&path, serde_json::to_vec_pretty(&sidecar)?)
        .with_context(|| format!("writing {}", path.display()))?;
    Ok(path)
}

/// `torus.cpz` → `torus.provenance.json` in the same directory.
pub fn provenance_path(document: &Path) -> PathBuf {
    let stem = document
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "packing".to_string());
    document.with_file_name(format!("{stem}.provenance.json"))
}

/// Commit from `GIT_COMMIT` (compile time, then run time) or `git rev-parse`.
pub fn current_git_rev() -> String {
    let from_env = option_env!("GIT_COMMIT")
        .map(str::to_string)
        .or_else(|| std::env::var("GIT_COMMIT").ok())
        .filter(|s| !s.is_empty());
    from_env
        .or_else(|| {
            let out = Command::new("git").args(["rev-parse", "HEAD"]).output().ok()?;
            out.status
                .success()
                .then(|| String::from_utf8_lossy(&out.stdout).trim().to_string())
        })
        .unwrap_or_else(|| "unknown".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::tempdir;

    #[test]
    fn sidecar_path_drops_the_document_extension() {
        assert_eq!(
            provenance_path(Path::new("/tmp/out/torus.cpz")),
            Path::new("/tmp/out/torus.provenance.json")
        );
        assert_eq!(
            provenance_path(Path::new("g2.cpj")),
            Path::new("g2.provenance.json")
        );
    }

    #[test]
    fn sidecar_records_mesh_and_solve() {
        let dir = tempdir().unwrap();
        let doc = dir.path().join("g2.cpj");
        fs::write(&doc, b"").unwrap();
        let payload = Payload::new(json!({"surface": "genus2", "width": 5}), "abc")
            .compressed(true)
            .with_summary(json!({"norm": 1e-11}));
        let path = write_sidecar(&doc, &payload).unwrap();
        let parsed: Value = serde_json::from_slice(&fs::read(path).unwrap()).unwrap();
        assert_eq!(parsed["document"], doc.display().to_string());
        assert_eq!(parsed["mesh_uuid"], "abc");
        assert_eq!(parsed["schema"], "cpj");
        assert_eq!(parsed["compressed"], true);
        assert_eq!(parsed["params"]["surface"], "genus2");
        assert_eq!(parsed["summary"]["norm"], 1e-11);
        assert!(parsed["callsite"]["file"].as_str().unwrap().ends_with("provenance.rs"));
    }
}
