//! Either kind of registered data product.

use super::{DatasetSpec, FieldSpec, Multiplicity, PipelineFactory};

/// A registered data product: a file-like dataset or a scalar field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DataSpec {
  Dataset(DatasetSpec),
  Field(FieldSpec),
}

impl DataSpec {
  pub fn name(&self) -> &str {
    match self {
      DataSpec::Dataset(d) => &d.name,
      DataSpec::Field(f) => &f.name,
    }
  }

  pub fn pipeline(&self) -> Option<PipelineFactory> {
    match self {
      DataSpec::Dataset(d) => d.pipeline,
      DataSpec::Field(f) => f.pipeline,
    }
  }

  pub fn multiplicity(&self) -> Multiplicity {
    match self {
      DataSpec::Dataset(d) => d.multiplicity,
      DataSpec::Field(f) => f.multiplicity,
    }
  }

  /// True iff the product has no producing pipeline.
  pub fn is_acquired(&self) -> bool {
    self.pipeline().is_none()
  }

  /// `"dataset"` or `"field"`.
  pub fn kind(&self) -> &'static str {
    match self {
      DataSpec::Dataset(_) => "dataset",
      DataSpec::Field(_) => "field",
    }
  }

  /// Format name for datasets, value type for fields.
  pub fn type_name(&self) -> String {
    match self {
      DataSpec::Dataset(d) => d.format.to_string(),
      DataSpec::Field(f) => f.dtype.to_string(),
    }
  }
}

impl From<DatasetSpec> for DataSpec {
  fn from(spec: DatasetSpec) -> Self {
    DataSpec::Dataset(spec)
  }
}

impl From<FieldSpec> for DataSpec {
  fn from(spec: FieldSpec) -> Self {
    DataSpec::Field(spec)
  }
}
