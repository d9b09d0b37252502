//! Tests for the local filesystem archive.

use super::{Archive, LocalArchive, PROCESSED_SUFFIX, SUMMARY_NAME};
use crate::types::{DataFormat, Multiplicity};
use std::fs;
use std::path::Path;

fn touch(path: &Path) {
  fs::create_dir_all(path.parent().unwrap()).unwrap();
  fs::write(path, b"").unwrap();
}

fn layout(root: &Path) {
  let p = root.join("PROJ");
  touch(&p.join("S01/V1/t1.nii.gz"));
  touch(&p.join("S01/V1/swi_coils.mat"));
  fs::create_dir_all(p.join("S01/V1/dicom_series")).unwrap();
  touch(&p.join(format!("S01/V1{PROCESSED_SUFFIX}/t2star_qsm.nii.gz")));
  touch(&p.join("S01/V2/t1.nii.gz"));
  touch(&p.join("S01/V2/notes.unknown"));
  touch(&p.join("S02/V1/t1.nii.gz"));
  touch(&p.join("S02/V1/.hidden.nii.gz"));
  touch(&p.join(format!("S01/{SUMMARY_NAME}/template.nii.gz")));
  touch(&p.join(format!("{SUMMARY_NAME}/V1/average.nii.gz")));
  touch(&p.join(format!("{SUMMARY_NAME}/{SUMMARY_NAME}/t2star_qsm_summary.csv")));
}

#[test]
fn lists_sessions_and_summaries() {
  let dir = tempfile::tempdir().unwrap();
  layout(dir.path());
  let archive = LocalArchive::new(dir.path());
  let project = archive.project("PROJ", None, None).unwrap();

  assert_eq!(project.id(), "PROJ");
  assert_eq!(
    project.subjects().map(|s| s.id()).collect::<Vec<_>>(),
    vec!["S01", "S02"]
  );
  assert_eq!(
    project.visits().map(|v| v.id()).collect::<Vec<_>>(),
    vec!["V1", "V2"]
  );

  let s01v1 = project
    .sessions()
    .find(|s| s.subject_id() == "S01" && s.visit_id() == "V1")
    .unwrap();
  assert_eq!(
    s01v1.dataset_names().collect::<Vec<_>>(),
    vec!["dicom_series", "swi_coils", "t1"]
  );
  assert_eq!(s01v1.datasets()[0].format, DataFormat::DIRECTORY);
  assert_eq!(s01v1.datasets()[1].format, DataFormat::TEXT_MATRIX);
  let processed = s01v1.processed().unwrap();
  assert_eq!(
    processed.dataset_names().collect::<Vec<_>>(),
    vec!["t2star_qsm"]
  );
  assert!(processed.datasets()[0].processed);

  let s01v2 = project
    .sessions()
    .find(|s| s.visit_id() == "V2")
    .unwrap();
  assert_eq!(s01v2.dataset_names().collect::<Vec<_>>(), vec!["t1"]);
  let s02 = project.subject("S02").unwrap().sessions().next().unwrap();
  assert_eq!(s02.dataset_names().collect::<Vec<_>>(), vec!["t1"]);

  let subject = project.subject("S01").unwrap();
  assert_eq!(subject.datasets()[0].name, "template");
  assert_eq!(subject.datasets()[0].multiplicity, Multiplicity::PerSubject);
  assert_eq!(
    project.visit("V1").unwrap().dataset_names().collect::<Vec<_>>(),
    vec!["average"]
  );
  assert_eq!(project.datasets()[0].name, "t2star_qsm_summary");
  assert_eq!(project.datasets()[0].multiplicity, Multiplicity::PerProject);
}

#[test]
fn filters_subjects_and_visits() {
  let dir = tempfile::tempdir().unwrap();
  layout(dir.path());
  let archive = LocalArchive::new(dir.path());
  let project = archive
    .project(
      "PROJ",
      Some(&["S01".to_string()]),
      Some(&["V2".to_string()]),
    )
    .unwrap();
  assert_eq!(project.sessions().count(), 1);
  assert_eq!(
    project.visits().map(|v| v.id()).collect::<Vec<_>>(),
    vec!["V2"]
  );
  // subject summaries are kept for selected subjects
  assert_eq!(
    project.subject("S01").unwrap().dataset_names().collect::<Vec<_>>(),
    vec!["template"]
  );
}

#[test]
fn missing_project_is_an_io_error() {
  let dir = tempfile::tempdir().unwrap();
  let archive = LocalArchive::new(dir.path());
  let err = archive.project("NOPE", None, None).unwrap_err();
  assert!(matches!(err, crate::error::StudyError::Io(_)));
}

#[test]
fn dataset_dirs_follow_the_layout() {
  let archive = LocalArchive::new("/data");
  assert_eq!(
    archive.dataset_dir("P", Multiplicity::PerSession, "S", "V"),
    Path::new("/data/P/S/V")
  );
  assert_eq!(
    archive.dataset_dir("P", Multiplicity::PerSubject, "S", "V"),
    Path::new("/data/P/S/ALL")
  );
  assert_eq!(
    archive.dataset_dir("P", Multiplicity::PerVisit, "S", "V"),
    Path::new("/data/P/ALL/V")
  );
  assert_eq!(
    archive.dataset_dir("P", Multiplicity::PerProject, "S", "V"),
    Path::new("/data/P/ALL/ALL")
  );
  assert_eq!(archive.session_dir("P", "S", "V"), Path::new("/data/P/S/V"));
}

#[cfg(target_os = "linux")]
#[test]
fn non_utf8_names_are_skipped() {
  use std::ffi::OsStr;
  use std::os::unix::ffi::OsStrExt;

  let dir = tempfile::tempdir().unwrap();
  layout(dir.path());
  let p = dir.path().join("PROJ");
  touch(&p.join("S01/V1").join(OsStr::from_bytes(b"bad\xff.nii.gz")));
  fs::create_dir_all(p.join(OsStr::from_bytes(b"S\xfe03")).join("V1")).unwrap();
  fs::create_dir_all(p.join("S02").join(OsStr::from_bytes(b"V\xfe9"))).unwrap();

  let archive = LocalArchive::new(dir.path());
  let project = archive.project("PROJ", None, None).unwrap();
  assert_eq!(
    project.subjects().map(|s| s.id()).collect::<Vec<_>>(),
    vec!["S01", "S02"]
  );
  assert_eq!(
    project.visits().map(|v| v.id()).collect::<Vec<_>>(),
    vec!["V1", "V2"]
  );
  let s01v1 = project
    .sessions()
    .find(|s| s.subject_id() == "S01" && s.visit_id() == "V1")
    .unwrap();
  assert_eq!(
    s01v1.dataset_names().collect::<Vec<_>>(),
    vec!["dicom_series", "swi_coils", "t1"]
  );
  assert!(
    project
      .sessions()
      .flat_map(|s| s.dataset_names())
      .all(|n| !n.contains('\u{FFFD}'))
  );
}
