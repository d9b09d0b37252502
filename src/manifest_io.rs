//! Pipeline manifests on disk: one pretty-printed JSON file per pipeline.

use crate::error::Result;
use crate::types::PipelineManifest;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, instrument};

/// Suffix appended to the pipeline name to form the manifest filename.
pub const MANIFEST_SUFFIX: &str = ".manifest.json";

/// Path of the manifest for `pipeline` under `dir`.
pub fn manifest_path(dir: &Path, pipeline: &str) -> PathBuf {
  dir.join(format!("{pipeline}{MANIFEST_SUFFIX}"))
}

/// Writes `manifest` to `path`, creating missing parent directories.
#[instrument(level = "trace", skip(manifest), fields(pipeline = %manifest.pipeline))]
pub fn save_manifest(path: &Path, manifest: &PipelineManifest) -> Result<()> {
  let json = serde_json::to_string_pretty(manifest)?;
  if let Some(parent) = path.parent() {
    fs::create_dir_all(parent)?;
  }
  fs::write(path, json)?;
  debug!(path = %path.display(), nodes = manifest.nodes.len(), "manifest written");
  Ok(())
}

/// Reads a manifest back. Fails with `Io` when unreadable and `Json` when malformed.
#[instrument(level = "trace")]
pub fn load_manifest(path: &Path) -> Result<PipelineManifest> {
  let bytes = fs::read(path)?;
  Ok(serde_json::from_slice(&bytes)?)
}
