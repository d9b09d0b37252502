//! Value type of a scalar field.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Value type of a scalar/string field product.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldType {
  Int,
  Float,
  Str,
}

impl fmt::Display for FieldType {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      FieldType::Int => write!(f, "int"),
      FieldType::Float => write!(f, "float"),
      FieldType::Str => write!(f, "str"),
    }
  }
}
