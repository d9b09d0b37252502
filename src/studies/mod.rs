//! Built-in study definitions.
//!
//! Each definition is built on first use and shared afterwards.

pub mod mri;
pub mod pet;
pub mod t2star;


use crate::error::{Result, StudyError};
use crate::study::StudyDefinition;
use std::sync::Arc;

/// Names accepted by [study_definition].
pub const STUDY_NAMES: [&str; 3] = ["mri", "t2star", "pet"];

/// Looks up a built-in study definition by name.
pub fn study_definition(name: &str) -> Result<Arc<StudyDefinition>> {
  match name {
    "mri" => mri::definition(),
    "t2star" => t2star::definition(),
    "pet" => pet::definition(),
    _ => Err(StudyError::UnknownStudy {
      name: name.to_string(),
      available: STUDY_NAMES.iter().map(|s| s.to_string()).collect(),
    }),
  }
}
