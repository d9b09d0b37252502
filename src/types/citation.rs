//! Bibliographic references for the tools a pipeline wraps.

use serde::{Deserialize, Serialize};

/// Reference to cite when publishing results produced by a pipeline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Citation {
  pub key: String,
  pub authors: Vec<String>,
  pub title: String,
  pub journal: Option<String>,
  pub year: u16,
  pub doi: Option<String>,
}
