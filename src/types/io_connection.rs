//! Connection between a declared pipeline input/output and a node field.

/// Wiring of a declared input or output dataset to a node field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IoConnection {
  pub dataset: String,
  pub node: String,
  pub field: String,
}

impl IoConnection {
  /// `node.field` form used in manifests and sink slots.
  pub fn endpoint(&self) -> String {
    format!("{}.{}", self.node, self.field)
  }
}
