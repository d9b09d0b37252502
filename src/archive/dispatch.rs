//! Multiplicity-based sink dispatch and sink field validation.

use super::ArchiveSink;
use crate::error::{Result, StudyError};
use crate::types::Multiplicity;
use std::fmt;
use tracing::instrument;

/// Level of the archive hierarchy a sink writes to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SinkKind {
  Session,
  Subject,
  Visit,
  Project,
}

impl SinkKind {
  /// Multiplicity of the datasets this kind of sink stores.
  pub fn multiplicity(&self) -> Multiplicity {
    match self {
      SinkKind::Session => Multiplicity::PerSession,
      SinkKind::Subject => Multiplicity::PerSubject,
      SinkKind::Visit => Multiplicity::PerVisit,
      SinkKind::Project => Multiplicity::PerProject,
    }
  }

  /// Identity outputs the sink reports for the hierarchy level it wrote to.
  pub fn base_outputs(&self) -> &'static [&'static str] {
    match self {
      SinkKind::Session => &["project_id", "subject_id", "visit_id"],
      SinkKind::Subject => &["project_id", "subject_id"],
      SinkKind::Visit => &["project_id", "visit_id"],
      SinkKind::Project => &["project_id"],
    }
  }
}

impl From<Multiplicity> for SinkKind {
  fn from(m: Multiplicity) -> Self {
    match m {
      Multiplicity::PerSession => SinkKind::Session,
      Multiplicity::PerSubject => SinkKind::Subject,
      Multiplicity::PerVisit => SinkKind::Visit,
      Multiplicity::PerProject => SinkKind::Project,
    }
  }
}

impl fmt::Display for SinkKind {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    let s = match self {
      SinkKind::Session => "session",
      SinkKind::Subject => "subject",
      SinkKind::Visit => "visit",
      SinkKind::Project => "project",
    };
    f.write_str(s)
  }
}

/// Sink kind for a multiplicity string, matched by prefix against the legal names.
#[instrument(level = "trace")]
pub fn resolve_sink_class(multiplicity: &str) -> Result<SinkKind> {
  multiplicity.parse::<Multiplicity>().map(SinkKind::from)
}

/// Checks that `field` is one of the fields `sink` accepts.
pub fn validate_field_name(sink: &ArchiveSink, field: &str) -> Result<()> {
  if sink.accepts(field) {
    Ok(())
  } else {
    Err(StudyError::InvalidField {
      node: sink.name().to_string(),
      field: field.to_string(),
      accepted: sink.accepted_fields().to_vec(),
    })
  }
}
