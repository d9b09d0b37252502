//! Tests for `Requirement`.

use super::{Requirement, Version, VersionDetection};
use crate::error::StudyError;

fn fsl5() -> Requirement {
  Requirement::new("fsl", Version::new([5, 0, 8])).with_max_version(Version::new([6]))
}

#[test]
fn satisfied_within_bounds() {
  let req = fsl5();
  assert!(req.is_satisfied_by(&Version::new([5, 0, 9])));
  assert!(req.is_satisfied_by(&Version::new([5, 0, 8])));
  assert!(!req.is_satisfied_by(&Version::new([5, 0, 7])));
  assert!(!req.is_satisfied_by(&Version::new([6, 0])));
}

#[test]
fn unbounded_above() {
  let req = Requirement::new("ants", Version::new([2]));
  assert!(req.is_satisfied_by(&Version::new([2, 3, 1])));
}

#[test]
fn display_includes_bounds() {
  assert_eq!(fsl5().to_string(), "fsl>=5.0.8,<6");
  assert_eq!(Requirement::new("spm", Version::new([12])).to_string(), "spm>=12");
}

#[test]
fn detect_plain() {
  assert_eq!(fsl5().detect_version("5.0.9\n").unwrap(), Version::new([5, 0, 9]));
}

#[test]
fn detect_mrtrix_banner() {
  let req = Requirement::new("mrtrix", Version::new([3])).with_detection(VersionDetection::Mrtrix);
  let v = req
    .detect_version("== mrinfo 3.0_RC3-51-g52a2540d ==\n64 bit release version")
    .unwrap();
  assert_eq!(v, Version::new([3, 0]));
}

#[test]
fn detect_afni() {
  let req = Requirement::new("afni", Version::new([16])).with_detection(VersionDetection::Afni);
  let v = req
    .detect_version("Precompiled binary linux_openmp_64: AFNI_17.3.03 (Nov 10 2017)")
    .unwrap();
  assert_eq!(v, Version::new([17, 3, 3]));
}

#[test]
fn detect_freesurfer_build_stamp() {
  let req =
    Requirement::new("freesurfer", Version::new([5, 3])).with_detection(VersionDetection::Freesurfer);
  let v = req
    .detect_version("freesurfer-Linux-centos6_x86_64-stable-pub-v6.0.0-2beb96c")
    .unwrap();
  assert_eq!(v, Version::new([6]));
}

#[test]
fn detect_failure_names_requirement() {
  let req = Requirement::new("mrtrix", Version::new([3])).with_detection(VersionDetection::Mrtrix);
  let err = req.detect_version("command not found").unwrap_err();
  match err {
    StudyError::VersionNotDetectable { requirement, .. } => assert_eq!(requirement, "mrtrix"),
    other => panic!("unexpected error {other:?}"),
  }
}
