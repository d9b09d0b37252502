//! Direction of a declared pipeline connection.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Whether a dataset is consumed or produced by a pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IoDirection {
  Input,
  Output,
}

impl fmt::Display for IoDirection {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      IoDirection::Input => write!(f, "input"),
      IoDirection::Output => write!(f, "output"),
    }
  }
}
