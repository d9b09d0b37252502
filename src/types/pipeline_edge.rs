//! Node-to-node connection inside a pipeline.

/// Directed edge from one node's output field to another node's input field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PipelineEdge {
  pub from_node: String,
  pub from_field: String,
  pub to_node: String,
  pub to_field: String,
}
