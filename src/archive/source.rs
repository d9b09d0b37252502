//! Archive source nodes.

use super::OUTPUT_SUFFIX;
use crate::error::{Result, StudyError};
use crate::types::DataSpec;

/// Reads a pipeline's inputs from the archive for each session.
///
/// Each declared dataset is exposed as an output field named with [OUTPUT_SUFFIX] appended.
#[derive(Debug, Clone)]
pub struct ArchiveSource {
  name: String,
  project_id: String,
  datasets: Vec<DataSpec>,
  study_name: Option<String>,
}

impl ArchiveSource {
  pub fn new(
    name: impl Into<String>,
    project_id: impl Into<String>,
    datasets: Vec<DataSpec>,
    study_name: Option<String>,
  ) -> Self {
    Self {
      name: name.into(),
      project_id: project_id.into(),
      datasets,
      study_name,
    }
  }

  pub fn name(&self) -> &str {
    &self.name
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

  pub fn output_fields(&self) -> Vec<String> {
    self
      .datasets
      .iter()
      .map(|d| format!("{}{OUTPUT_SUFFIX}", d.name()))
      .collect()
  }

  /// Output field carrying `dataset`; the dataset must be one this source reads.
  pub fn output_field(&self, dataset: &str) -> Result<String> {
    if self.datasets.iter().any(|d| d.name() == dataset) {
      Ok(format!("{dataset}{OUTPUT_SUFFIX}"))
    } else {
      Err(StudyError::InvalidField {
        node: self.name.clone(),
        field: format!("{dataset}{OUTPUT_SUFFIX}"),
        accepted: self.output_fields(),
      })
    }
  }

  /// Name `dataset` is read from. Processed datasets are partitioned by study name.
  pub fn stored_name(&self, dataset: &DataSpec) -> String {
    match (&self.study_name, dataset.is_acquired()) {
      (Some(study), false) => format!("{study}_{}", dataset.name()),
      _ => dataset.name().to_string(),
    }
  }
}
