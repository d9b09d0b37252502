//! Dotted numeric versions of external tools.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

static VERSION_RE: Lazy<Regex> =
  Lazy::new(|| Regex::new(r"\d+(?:\.\d+)*").expect("version pattern is valid"));

/// Dotted numeric version (`5.0.9`). Trailing zero components do not affect ordering.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Version(Vec<u32>);

impl Version {
  pub fn new(parts: impl Into<Vec<u32>>) -> Self {
    Self(parts.into())
  }

  pub fn parts(&self) -> &[u32] {
    &self.0
  }

  /// Extracts the first dotted number from free text, e.g. `"3.0_RC3"` gives `3.0`.
  pub fn find(text: &str) -> Option<Version> {
    let m = VERSION_RE.find(text)?;
    let parts = m
      .as_str()
      .split('.')
      .map(str::parse)
      .collect::<Result<Vec<u32>, _>>()
      .ok()?;
    Some(Version(parts))
  }

  fn significant(&self) -> &[u32] {
    let end = self
      .0
      .iter()
      .rposition(|p| *p != 0)
      .map(|i| i + 1)
      .unwrap_or(0);
    &self.0[..end]
  }
}

impl PartialEq for Version {
  fn eq(&self, other: &Self) -> bool {
    self.significant() == other.significant()
  }
}

impl Eq for Version {}

impl PartialOrd for Version {
  fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
    Some(self.cmp(other))
  }
}

impl Ord for Version {
  fn cmp(&self, other: &Self) -> Ordering {
    let len = self.0.len().max(other.0.len());
    (0..len)
      .map(|i| {
        let a = self.0.get(i).copied().unwrap_or(0);
        let b = other.0.get(i).copied().unwrap_or(0);
        a.cmp(&b)
      })
      .find(|o| *o != Ordering::Equal)
      .unwrap_or(Ordering::Equal)
  }
}

impl fmt::Display for Version {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    let parts: Vec<String> = self.0.iter().map(u32::to_string).collect();
    f.write_str(&parts.join("."))
  }
}

impl FromStr for Version {
  type Err = String;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    Version::find(s).ok_or_else(|| format!("no version number in '{s}'"))
  }
}
