//! Handle returned when a node is added to a pipeline under construction.

/// Handle to a node of one specific pipeline under construction.
///
/// Handles from another pipeline are rejected by `connect` even when the node names match.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct NodeHandle {
  pub(crate) pipeline_id: u64,
  pub(crate) name: String,
}

impl NodeHandle {
  pub fn name(&self) -> &str {
    &self.name
  }
}
