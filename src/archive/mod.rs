//! Archive access: sources, sinks and project views.
//!
//! An [Archive] creates the source node that reads a pipeline's inputs and one sink node per
//! output multiplicity. Sinks are dispatched on the multiplicity string by prefix (see
//! [resolve_sink_class]) and validate every field assigned to them.

mod dispatch;
mod local;
#[cfg(test)]
mod local_test;
mod sink;
mod source;
mod tree;

pub use dispatch::{SinkKind, resolve_sink_class, validate_field_name};
pub use local::{LocalArchive, PROCESSED_SUFFIX, SUMMARY_NAME};
pub use sink::{ArchiveSink, FieldValue};
pub use source::ArchiveSource;
pub use tree::{Dataset, Project, Session, Subject, Visit};

use crate::error::Result;
use crate::types::DataSpec;
use std::fmt;
use tracing::debug;

/// Suffix of sink input fields. A sink input carries a pipeline output, e.g. `qsm_summary_out`.
pub const INPUT_SUFFIX: &str = "_out";

/// Suffix of source output fields. A source output carries a pipeline input, e.g. `t1_in`.
pub const OUTPUT_SUFFIX: &str = "_in";

/// A storage system holding projects of subjects, visits and sessions.
pub trait Archive: fmt::Debug + Send + Sync {
  /// Short archive type name, used in default node names.
  fn kind(&self) -> &str;

  /// Source node reading `datasets` for each session of `project_id`.
  ///
  /// Named `{kind}_source` unless `name` is given.
  fn source(
    &self,
    project_id: &str,
    datasets: &[DataSpec],
    name: Option<&str>,
    study_name: Option<&str>,
  ) -> ArchiveSource {
    let name = name
      .map(str::to_string)
      .unwrap_or_else(|| format!("{}_source", self.kind()));
    ArchiveSource::new(
      name,
      project_id,
      datasets.to_vec(),
      study_name.map(str::to_string),
    )
  }

  /// Sink node storing `datasets` at the level `multiplicity` names.
  ///
  /// Named `{kind}_{multiplicity}_sink` unless `name` is given. Fails with
  /// `UnrecognisedMultiplicity` if the multiplicity matches no legal prefix.
  fn sink(
    &self,
    project_id: &str,
    datasets: &[DataSpec],
    multiplicity: &str,
    name: Option<&str>,
    study_name: Option<&str>,
  ) -> Result<ArchiveSink> {
    let kind = resolve_sink_class(multiplicity)?;
    let name = name
      .map(str::to_string)
      .unwrap_or_else(|| format!("{}_{}_sink", self.kind(), multiplicity));
    debug!(sink = %name, %kind, datasets = datasets.len(), "creating sink");
    Ok(ArchiveSink::new(
      name,
      kind,
      project_id,
      datasets.to_vec(),
      study_name.map(str::to_string),
    ))
  }

  /// Project view filtered to the given subject and visit ids (all when `None`).
  fn project(
    &self,
    project_id: &str,
    subject_ids: Option<&[String]>,
    visit_ids: Option<&[String]>,
  ) -> Result<Project>;
}
