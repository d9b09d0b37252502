//! Values of pipeline configuration options and static node inputs.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A configuration option value or static node input.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum OptionValue {
  Bool(bool),
  Int(i64),
  Float(f64),
  Str(String),
  List(Vec<OptionValue>),
}

impl OptionValue {
  pub fn as_bool(&self) -> Option<bool> {
    match self {
      OptionValue::Bool(b) => Some(*b),
      _ => None,
    }
  }

  pub fn as_i64(&self) -> Option<i64> {
    match self {
      OptionValue::Int(i) => Some(*i),
      _ => None,
    }
  }

  /// Integers widen to floats.
  pub fn as_f64(&self) -> Option<f64> {
    match self {
      OptionValue::Float(v) => Some(*v),
      OptionValue::Int(i) => Some(*i as f64),
      _ => None,
    }
  }

  pub fn as_str(&self) -> Option<&str> {
    match self {
      OptionValue::Str(s) => Some(s),
      _ => None,
    }
  }

  pub fn as_list(&self) -> Option<&[OptionValue]> {
    match self {
      OptionValue::List(items) => Some(items),
      _ => None,
    }
  }

  /// Parses a command-line value: booleans, integers, floats, comma-separated lists, else a string.
  pub fn parse_cli(raw: &str) -> OptionValue {
    let raw = raw.trim();
    if raw.contains(',') {
      return OptionValue::List(
        raw
          .split(',')
          .filter(|s| !s.trim().is_empty())
          .map(OptionValue::parse_cli)
          .collect(),
      );
    }
    match raw {
      "true" => return OptionValue::Bool(true),
      "false" => return OptionValue::Bool(false),
      _ => {}
    }
    if let Ok(i) = raw.parse::<i64>() {
      return OptionValue::Int(i);
    }
    if raw.chars().any(|c| c.is_ascii_digit())
      && let Ok(v) = raw.parse::<f64>()
    {
      return OptionValue::Float(v);
    }
    OptionValue::Str(raw.to_string())
  }
}

impl fmt::Display for OptionValue {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      OptionValue::Bool(b) => write!(f, "{b}"),
      OptionValue::Int(i) => write!(f, "{i}"),
      OptionValue::Float(v) => write!(f, "{v}"),
      OptionValue::Str(s) => write!(f, "{s}"),
      OptionValue::List(items) => {
        write!(f, "[")?;
        for (i, item) in items.iter().enumerate() {
          if i > 0 {
            write!(f, ", ")?;
          }
          write!(f, "{item}")?;
        }
        write!(f, "]")
      }
    }
  }
}

impl From<bool> for OptionValue {
  fn from(v: bool) -> Self {
    OptionValue::Bool(v)
  }
}

impl From<i64> for OptionValue {
  fn from(v: i64) -> Self {
    OptionValue::Int(v)
  }
}

impl From<i32> for OptionValue {
  fn from(v: i32) -> Self {
    OptionValue::Int(i64::from(v))
  }
}

impl From<u32> for OptionValue {
  fn from(v: u32) -> Self {
    OptionValue::Int(i64::from(v))
  }
}

impl From<f64> for OptionValue {
  fn from(v: f64) -> Self {
    OptionValue::Float(v)
  }
}

impl From<&str> for OptionValue {
  fn from(v: &str) -> Self {
    OptionValue::Str(v.to_string())
  }
}

impl From<String> for OptionValue {
  fn from(v: String) -> Self {
    OptionValue::Str(v)
  }
}

impl<T: Into<OptionValue>> From<Vec<T>> for OptionValue {
  fn from(v: Vec<T>) -> Self {
    OptionValue::List(v.into_iter().map(Into::into).collect())
  }
}
