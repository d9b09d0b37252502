//! Granularity at which a dataset or field is produced and stored.

use crate::error::StudyError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Granularity at which a dataset or field is produced and stored.
#[derive(
  Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum Multiplicity {
  /// Once per session (subject x visit).
  #[default]
  PerSession,
  /// Once per subject, across visits.
  PerSubject,
  /// Once per visit, across subjects.
  PerVisit,
  /// Once for the whole project.
  PerProject,
}

impl Multiplicity {
  pub const ALL: [Multiplicity; 4] = [
    Multiplicity::PerSession,
    Multiplicity::PerSubject,
    Multiplicity::PerVisit,
    Multiplicity::PerProject,
  ];

  pub fn as_str(&self) -> &'static str {
    match self {
      Multiplicity::PerSession => "per_session",
      Multiplicity::PerSubject => "per_subject",
      Multiplicity::PerVisit => "per_visit",
      Multiplicity::PerProject => "per_project",
    }
  }

  /// Legal multiplicity names, in declaration order.
  pub fn options() -> Vec<String> {
    Self::ALL.iter().map(|m| m.as_str().to_string()).collect()
  }

  /// Matches `s` against the legal names by prefix, so `per_session_group` is `PerSession`.
  pub fn from_prefix(s: &str) -> Option<Self> {
    Self::ALL.into_iter().find(|m| s.starts_with(m.as_str()))
  }
}

impl fmt::Display for Multiplicity {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.as_str())
  }
}

impl FromStr for Multiplicity {
  type Err = StudyError;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    Self::from_prefix(s).ok_or_else(|| StudyError::UnrecognisedMultiplicity {
      multiplicity: s.to_string(),
      options: Self::options(),
    })
  }
}
