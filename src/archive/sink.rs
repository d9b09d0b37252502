//! Archive sink nodes.

use super::INPUT_SUFFIX;
use super::dispatch::{SinkKind, validate_field_name};
use crate::error::Result;
use crate::types::{DataSpec, OptionValue};
use std::collections::BTreeMap;
use std::path::PathBuf;
use tracing::trace;

/// Value assigned to a sink field.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
  /// A file or directory already on disk.
  File(PathBuf),
  /// A scalar or string value for a field spec.
  Scalar(OptionValue),
  /// The output field of a pipeline node, resolved by the engine at run time.
  Connection { node: String, field: String },
}

/// Writes a pipeline's outputs of one multiplicity back to the archive.
///
/// The accepted field names are fixed at construction from the declared datasets, each with
/// [INPUT_SUFFIX] appended. Every assignment is checked against that set.
#[derive(Debug, Clone)]
pub struct ArchiveSink {
  name: String,
  kind: SinkKind,
  project_id: String,
  datasets: Vec<DataSpec>,
  study_name: Option<String>,
  accepted: Vec<String>,
  fields: BTreeMap<String, FieldValue>,
}

impl ArchiveSink {
  pub fn new(
    name: impl Into<String>,
    kind: SinkKind,
    project_id: impl Into<String>,
    datasets: Vec<DataSpec>,
    study_name: Option<String>,
  ) -> Self {
    let accepted = datasets
      .iter()
      .map(|d| format!("{}{INPUT_SUFFIX}", d.name()))
      .collect();
    Self {
      name: name.into(),
      kind,
      project_id: project_id.into(),
      datasets,
      study_name,
      accepted,
      fields: BTreeMap::new(),
    }
  }

  pub fn name(&self) -> &str {
    &self.name
  }

  pub fn kind(&self) -> SinkKind {
    self.kind
  }

  pub fn project_id(&self) -> &str {
    &self.project_id
  }

  pub fn datasets(&self) -> &[DataSpec] {
    &self.datasets
  }

  pub fn study_name(&self) -> Option<&str> {
    self.study_name.as_deref()
  }

  /// Accepted field names in dataset declaration order.
  pub fn accepted_fields(&self) -> &[String] {
    &self.accepted
  }

  pub fn accepts(&self, field: &str) -> bool {
    self.accepted.iter().any(|a| a == field)
  }

  /// Input field name carrying `dataset`.
  pub fn input_field(dataset: &str) -> String {
    format!("{dataset}{INPUT_SUFFIX}")
  }

  /// Assigns a field. Reassigning an accepted field replaces its value.
  pub fn set_field(&mut self, field: &str, value: FieldValue) -> Result<()> {
    validate_field_name(self, field)?;
    trace!(sink = %self.name, field, "field assigned");
    self.fields.insert(field.to_string(), value);
    Ok(())
  }

  pub fn field(&self, field: &str) -> Option<&FieldValue> {
    self.fields.get(field)
  }

  pub fn fields(&self) -> &BTreeMap<String, FieldValue> {
    &self.fields
  }

  /// Accepted fields that have not been assigned yet.
  pub fn missing_fields(&self) -> Vec<&str> {
    self
      .accepted
      .iter()
      .filter(|a| !self.fields.contains_key(*a))
      .map(String::as_str)
      .collect()
  }

  /// Name `dataset` is stored under, prefixed with the study name when one is set.
  pub fn stored_name(&self, dataset: &str) -> String {
    match &self.study_name {
      Some(study) => format!("{study}_{dataset}"),
      None => dataset.to_string(),
    }
  }

  /// Identity outputs reported after writing (project, subject and visit ids as applicable).
  pub fn base_outputs(&self) -> &'static [&'static str] {
    self.kind.base_outputs()
  }
}
