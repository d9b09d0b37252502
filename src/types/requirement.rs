//! External tool version constraints attached to pipeline nodes.
//!
//! Requirements are checked by the execution collaborator against its environment, not by the
//! pipeline builder. Version detection only parses tool output handed to it.

use super::Version;
use crate::error::{Result, StudyError};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;

static MRTRIX_RE: Lazy<Regex> =
  Lazy::new(|| Regex::new(r"== mrinfo (\S+) ==").expect("mrtrix pattern is valid"));
static AFNI_RE: Lazy<Regex> =
  Lazy::new(|| Regex::new(r"AFNI_([\d.]+)").expect("afni pattern is valid"));
static FREESURFER_RE: Lazy<Regex> =
  Lazy::new(|| Regex::new(r"freesurfer-.*-v(\S+)").expect("freesurfer pattern is valid"));

/// How a tool reports its version.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VersionDetection {
  /// First dotted number in the output (also FSL's `etc/fslversion` file).
  #[default]
  Plain,
  /// `mrinfo --version` banner: `== mrinfo 3.0_RC3 ==`.
  Mrtrix,
  /// `afni -ver`: `... AFNI_17.3.03 ...`.
  Afni,
  /// Freesurfer `build-stamp.txt`: `freesurfer-Linux-centos6_x86_64-stable-pub-v6.0.0-...`.
  Freesurfer,
}

/// Version constraint on an external tool.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Requirement {
  pub name: String,
  pub min_version: Version,
  /// Exclusive upper bound.
  pub max_version: Option<Version>,
  #[serde(default)]
  pub detection: VersionDetection,
}

impl Requirement {
  pub fn new(name: impl Into<String>, min_version: Version) -> Self {
    Self {
      name: name.into(),
      min_version,
      max_version: None,
      detection: VersionDetection::Plain,
    }
  }

  pub fn with_max_version(mut self, max_version: Version) -> Self {
    self.max_version = Some(max_version);
    self
  }

  pub fn with_detection(mut self, detection: VersionDetection) -> Self {
    self.detection = detection;
    self
  }

  pub fn is_satisfied_by(&self, version: &Version) -> bool {
    *version >= self.min_version && self.max_version.as_ref().is_none_or(|max| version < max)
  }

  /// Parses the version out of the tool's version output.
  pub fn detect_version(&self, output: &str) -> Result<Version> {
    let captured = match self.detection {
      VersionDetection::Plain => Some(output),
      VersionDetection::Mrtrix => capture(&MRTRIX_RE, output),
      VersionDetection::Afni => capture(&AFNI_RE, output),
      VersionDetection::Freesurfer => capture(&FREESURFER_RE, output),
    };
    captured
      .and_then(Version::find)
      .ok_or_else(|| StudyError::VersionNotDetectable {
        requirement: self.name.clone(),
        reason: format!("unrecognised version output '{}'", output.trim()),
      })
  }
}

fn capture<'a>(re: &Regex, text: &'a str) -> Option<&'a str> {
  re.captures(text)
    .and_then(|c| c.get(1))
    .map(|m| m.as_str())
}

impl fmt::Display for Requirement {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}>={}", self.name, self.min_version)?;
    if let Some(max) = &self.max_version {
      write!(f, ",<{max}")?;
    }
    Ok(())
  }
}
