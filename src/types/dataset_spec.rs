//! Specification of a named file-like data product.

use super::{DataFormat, Multiplicity, PipelineFactory};

/// A named file-like data product (image, matrix, directory) of a study.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatasetSpec {
  pub name: String,
  pub format: DataFormat,
  /// Producing pipeline; `None` means the dataset is acquired (supplied as raw input).
  pub pipeline: Option<PipelineFactory>,
  pub multiplicity: Multiplicity,
  pub description: Option<String>,
}

impl DatasetSpec {
  /// Spec for a dataset supplied from the archive.
  pub fn acquired(name: impl Into<String>, format: DataFormat) -> Self {
    Self {
      name: name.into(),
      format,
      pipeline: None,
      multiplicity: Multiplicity::default(),
      description: None,
    }
  }

  /// Spec for a dataset produced by `pipeline`.
  pub fn derived(name: impl Into<String>, format: DataFormat, pipeline: PipelineFactory) -> Self {
    Self {
      pipeline: Some(pipeline),
      ..Self::acquired(name, format)
    }
  }

  pub fn with_multiplicity(mut self, multiplicity: Multiplicity) -> Self {
    self.multiplicity = multiplicity;
    self
  }

  pub fn with_description(mut self, description: impl Into<String>) -> Self {
    self.description = Some(description.into());
    self
  }

  pub fn is_acquired(&self) -> bool {
    self.pipeline.is_none()
  }
}
