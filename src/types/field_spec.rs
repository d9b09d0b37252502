//! Specification of a named scalar/string product.

use super::{FieldType, Multiplicity, PipelineFactory};

/// A named scalar/string value product (not a file).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldSpec {
  pub name: String,
  pub dtype: FieldType,
  pub pipeline: Option<PipelineFactory>,
  pub multiplicity: Multiplicity,
}

impl FieldSpec {
  pub fn acquired(name: impl Into<String>, dtype: FieldType) -> Self {
    Self {
      name: name.into(),
      dtype,
      pipeline: None,
      multiplicity: Multiplicity::default(),
    }
  }

  pub fn derived(name: impl Into<String>, dtype: FieldType, pipeline: PipelineFactory) -> Self {
    Self {
      pipeline: Some(pipeline),
      ..Self::acquired(name, dtype)
    }
  }

  pub fn with_multiplicity(mut self, multiplicity: Multiplicity) -> Self {
    self.multiplicity = multiplicity;
    self
  }

  pub fn is_acquired(&self) -> bool {
    self.pipeline.is_none()
  }
}
