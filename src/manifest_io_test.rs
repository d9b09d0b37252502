//! Tests for manifest save/load.

use crate::error::StudyError;
use crate::manifest_io::{MANIFEST_SUFFIX, load_manifest, manifest_path, save_manifest};
use crate::studies::study_definition;
use crate::study::Study;
use crate::types::{MANIFEST_VERSION, OptionOverrides, OptionValue, PipelineManifest};

fn qsm_manifest() -> PipelineManifest {
  let study = Study::new("study1", study_definition("t2star").unwrap(), "PROJ");
  let pipeline = study.pipeline_for("qsm", &OptionOverrides::new()).unwrap();
  PipelineManifest::from_pipeline(study.name(), &pipeline)
}

#[test]
fn manifest_path_appends_suffix() {
  let path = manifest_path(std::path::Path::new("/runs/1"), "qsmrecon");
  assert_eq!(path.to_str().unwrap(), "/runs/1/qsmrecon.manifest.json");
  assert!(path.to_str().unwrap().ends_with(MANIFEST_SUFFIX));
}

#[test]
fn roundtrip_save_load() {
  let dir = tempfile::tempdir().unwrap();
  let manifest = qsm_manifest();
  let path = manifest_path(&dir.path().join("nested"), &manifest.pipeline);
  save_manifest(&path, &manifest).unwrap();
  assert!(path.exists());

  let loaded = load_manifest(&path).unwrap();
  assert_eq!(loaded.version, MANIFEST_VERSION);
  assert_eq!(loaded.study, "study1");
  assert_eq!(loaded.pipeline, "qsmrecon");
  assert_eq!(loaded.nodes, manifest.nodes);
  assert_eq!(loaded.edges, manifest.edges);
  assert_eq!(
    loaded.options.get("qsm_num_channels"),
    Some(&OptionValue::Int(32))
  );
  let qsm = loaded.outputs.iter().find(|o| o.name == "qsm").unwrap();
  assert_eq!(qsm.connections, vec!["qsm_copy_geometry.out_file"]);
}

#[test]
fn load_missing_file_is_io_error() {
  let dir = tempfile::tempdir().unwrap();
  let err = load_manifest(&dir.path().join("nonexistent.manifest.json")).unwrap_err();
  match err {
    StudyError::Io(e) => assert_eq!(e.kind(), std::io::ErrorKind::NotFound),
    other => panic!("unexpected error: {other}"),
  }
}

#[test]
fn load_invalid_json_is_json_error() {
  let dir = tempfile::tempdir().unwrap();
  let path = dir.path().join("bad.manifest.json");
  std::fs::write(&path, "{ not json").unwrap();
  assert!(matches!(load_manifest(&path), Err(StudyError::Json(_))));
}

#[test]
fn load_wrong_shape_is_json_error() {
  let dir = tempfile::tempdir().unwrap();
  let path = dir.path().join("other.manifest.json");
  std::fs::write(&path, r#"{"version": 1, "pipeline": "bet_T1"}"#).unwrap();
  assert!(matches!(load_manifest(&path), Err(StudyError::Json(_))));
}
