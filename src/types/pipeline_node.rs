//! A processing step registered in a pipeline.

use super::{OptionValue, Requirement};
use crate::interface::Interface;
use std::collections::BTreeMap;

/// A processing step: an interface plus its requirements and resource hints.
#[derive(Debug, Clone)]
pub struct PipelineNode {
  pub name: String,
  pub interface: Box<dyn Interface>,
  pub requirements: Vec<Requirement>,
  /// Advisory memory hint in MB for the external scheduler.
  pub memory: Option<u32>,
  /// Advisory wall time hint in minutes for the external scheduler.
  pub wall_time: Option<u32>,
  /// Input fields iterated over when the node is a map node.
  pub iterfield: Vec<String>,
  /// Static input values set at build time.
  pub inputs: BTreeMap<String, OptionValue>,
}

impl PipelineNode {
  pub fn is_map_node(&self) -> bool {
    !self.iterfield.is_empty()
  }
}
