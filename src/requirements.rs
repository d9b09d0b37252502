//! Requirements of the external tools wrapped by the built-in studies.

use crate::types::{Requirement, Version, VersionDetection};

fn req(name: &str, min: &[u32]) -> Requirement {
  Requirement::new(name, Version::new(min.to_vec()))
}

/// FSL 5.0.8 or later, before 6.
pub fn fsl5() -> Requirement {
  req("fsl", &[5, 0, 8]).with_max_version(Version::new(vec![6]))
}

pub fn ants2() -> Requirement {
  req("ants", &[2, 0])
}

pub fn mrtrix3() -> Requirement {
  req("mrtrix", &[3, 0]).with_detection(VersionDetection::Mrtrix)
}

pub fn afni() -> Requirement {
  req("afni", &[16, 2, 10]).with_detection(VersionDetection::Afni)
}

pub fn freesurfer() -> Requirement {
  req("freesurfer", &[5, 3]).with_detection(VersionDetection::Freesurfer)
}

pub fn matlab2015() -> Requirement {
  req("matlab", &[2015])
}

pub fn spm12() -> Requirement {
  req("spm", &[12])
}

/// STI Suite, run inside MATLAB.
pub fn sti() -> Requirement {
  req("stisuite", &[2, 2])
}

pub fn fix() -> Requirement {
  req("fix", &[1, 0, 6, 4])
}

pub fn c3d() -> Requirement {
  req("c3d", &[1, 0])
}

pub fn dcm2niix() -> Requirement {
  req("dcm2niix", &[1, 0, 20170130])
}

/// Every requirement above, for listing and environment checks.
pub fn all() -> Vec<Requirement> {
  vec![
    fsl5(),
    ants2(),
    mrtrix3(),
    afni(),
    freesurfer(),
    matlab2015(),
    spm12(),
    sti(),
    fix(),
    c3d(),
    dcm2niix(),
  ]
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn fsl_is_bounded_below_six() {
    let fsl = fsl5();
    assert!(fsl.is_satisfied_by(&Version::new(vec![5, 0, 9])));
    assert!(!fsl.is_satisfied_by(&Version::new(vec![6, 0, 1])));
    assert!(!fsl.is_satisfied_by(&Version::new(vec![5, 0, 7])));
  }

  #[test]
  fn tool_specific_detection() {
    let v = mrtrix3().detect_version("== mrinfo 3.0_RC3-135-g2b8e7d0c ==").unwrap();
    assert_eq!(v, Version::new(vec![3, 0]));
    let v = afni().detect_version("Precompiled binary linux_openmp_64: AFNI_17.3.03 (Dec 1)").unwrap();
    assert_eq!(v, Version::new(vec![17, 3, 3]));
  }

  #[test]
  fn names_are_unique() {
    let all = all();
    let mut names: Vec<&str> = all.iter().map(|r| r.name.as_str()).collect();
    names.sort();
    names.dedup();
    assert_eq!(names.len(), all.len());
  }
}
