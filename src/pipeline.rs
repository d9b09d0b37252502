//! Pipeline builder and validated pipelines.
//!
//! A [PipelineBuilder] is scoped to one pipeline-factory invocation. Construction is purely
//! additive. [PipelineBuilder::assert_connected] is the terminal gate: it consumes the builder
//! and returns an immutable [Pipeline] that can be shared across threads.
//!
//! Validation checks that every declared input and output is wired to a node and that the
//! node graph is acyclic. It does not check that nodes are reachable from the declared inputs,
//! so an input wired to an otherwise isolated node still passes.

use crate::error::{Result, StudyError};
use crate::interface::Interface;
use crate::options::OptionTable;
use crate::topology;
use crate::types::{
  Citation, DataSpec, IoConnection, IoDirection, NodeHandle, OptionValue, PipelineEdge,
  PipelineNode, Requirement,
};
use std::collections::{BTreeMap, HashMap};
use std::sync::atomic::{AtomicU64, Ordering};
use tracing::{debug, info, instrument};

static NEXT_PIPELINE_ID: AtomicU64 = AtomicU64::new(1);

/// A pipeline under construction.
#[derive(Debug)]
pub struct PipelineBuilder {
  id: u64,
  name: String,
  description: String,
  version: u32,
  inputs: Vec<DataSpec>,
  outputs: Vec<DataSpec>,
  citations: Vec<Citation>,
  nodes: Vec<PipelineNode>,
  node_index: HashMap<String, usize>,
  edges: Vec<PipelineEdge>,
  input_connections: Vec<IoConnection>,
  output_connections: Vec<IoConnection>,
  options: OptionTable,
}

impl PipelineBuilder {
  /// Starts a pipeline with already-resolved input and output specs.
  ///
  /// Studies call this from `Study::create_pipeline` after checking the names are registered.
  pub fn new(
    name: impl Into<String>,
    inputs: Vec<DataSpec>,
    outputs: Vec<DataSpec>,
    description: impl Into<String>,
    options: OptionTable,
  ) -> Self {
    Self {
      id: NEXT_PIPELINE_ID.fetch_add(1, Ordering::Relaxed),
      name: name.into(),
      description: description.into(),
      version: 1,
      inputs,
      outputs,
      citations: Vec::new(),
      nodes: Vec::new(),
      node_index: HashMap::new(),
      edges: Vec::new(),
      input_connections: Vec::new(),
      output_connections: Vec::new(),
      options,
    }
  }

  pub fn name(&self) -> &str {
    &self.name
  }

  /// Declares a pipeline-level option default.
  pub fn default_option(mut self, name: impl Into<String>, value: impl Into<OptionValue>) -> Self {
    self.options.declare_default(name, value.into());
    self
  }

  pub fn citation(mut self, citation: Citation) -> Self {
    self.citations.push(citation);
    self
  }

  pub fn version(mut self, version: u32) -> Self {
    self.version = version;
    self
  }

  /// Registers a processing step. Node names are unique within the pipeline.
  pub fn create_node(
    &mut self,
    interface: impl Interface + 'static,
    name: &str,
    requirements: Vec<Requirement>,
    memory: Option<u32>,
    wall_time: Option<u32>,
  ) -> Result<NodeHandle> {
    self.add_node(
      Box::new(interface),
      name,
      requirements,
      memory,
      wall_time,
      Vec::new(),
    )
  }

  /// Registers a step that the engine runs once per element of each `iterfield` input.
  pub fn create_map_node(
    &mut self,
    interface: impl Interface + 'static,
    name: &str,
    iterfield: Vec<String>,
    requirements: Vec<Requirement>,
    memory: Option<u32>,
    wall_time: Option<u32>,
  ) -> Result<NodeHandle> {
    self.add_node(
      Box::new(interface),
      name,
      requirements,
      memory,
      wall_time,
      iterfield,
    )
  }

  #[instrument(level = "trace", skip(self, interface, requirements, iterfield), fields(pipeline = %self.name))]
  fn add_node(
    &mut self,
    interface: Box<dyn Interface>,
    name: &str,
    requirements: Vec<Requirement>,
    memory: Option<u32>,
    wall_time: Option<u32>,
    iterfield: Vec<String>,
  ) -> Result<NodeHandle> {
    if self.node_index.contains_key(name) {
      return Err(StudyError::DuplicateNodeName {
        pipeline: self.name.clone(),
        node: name.to_string(),
      });
    }
    debug!(node = name, interface = interface.name(), "adding node");
    self.node_index.insert(name.to_string(), self.nodes.len());
    self.nodes.push(PipelineNode {
      name: name.to_string(),
      interface,
      requirements,
      memory,
      wall_time,
      iterfield,
      inputs: BTreeMap::new(),
    });
    Ok(NodeHandle {
      pipeline_id: self.id,
      name: name.to_string(),
    })
  }

  /// Handle of a node previously created in this pipeline.
  pub fn node(&self, name: &str) -> Option<NodeHandle> {
    self.node_index.contains_key(name).then(|| NodeHandle {
      pipeline_id: self.id,
      name: name.to_string(),
    })
  }

  fn check_node(&self, node: &NodeHandle) -> Result<usize> {
    self
      .node_index
      .get(&node.name)
      .copied()
      .filter(|_| node.pipeline_id == self.id)
      .ok_or_else(|| StudyError::UnknownNode {
        pipeline: self.name.clone(),
        node: node.name.clone(),
      })
  }

  /// Sets a static input value on a node.
  pub fn set_input(
    &mut self,
    node: &NodeHandle,
    field: &str,
    value: impl Into<OptionValue>,
  ) -> Result<()> {
    let idx = self.check_node(node)?;
    self.nodes[idx].inputs.insert(field.to_string(), value.into());
    Ok(())
  }

  /// Adds a directed edge between fields of two nodes of this pipeline.
  pub fn connect(
    &mut self,
    src: &NodeHandle,
    src_field: &str,
    dst: &NodeHandle,
    dst_field: &str,
  ) -> Result<()> {
    self.check_node(src)?;
    self.check_node(dst)?;
    self.edges.push(PipelineEdge {
      from_node: src.name.clone(),
      from_field: src_field.to_string(),
      to_node: dst.name.clone(),
      to_field: dst_field.to_string(),
    });
    Ok(())
  }

  fn check_declared(&self, dataset: &str, direction: IoDirection) -> Result<()> {
    let declared = match direction {
      IoDirection::Input => &self.inputs,
      IoDirection::Output => &self.outputs,
    };
    if declared.iter().any(|s| s.name() == dataset) {
      Ok(())
    } else {
      Err(StudyError::UndeclaredIo {
        pipeline: self.name.clone(),
        name: dataset.to_string(),
        direction,
      })
    }
  }

  /// Wires a declared input to a node field. An input may feed several nodes.
  pub fn connect_input(&mut self, dataset: &str, node: &NodeHandle, field: &str) -> Result<()> {
    self.check_declared(dataset, IoDirection::Input)?;
    self.check_node(node)?;
    self.input_connections.push(IoConnection {
      dataset: dataset.to_string(),
      node: node.name.clone(),
      field: field.to_string(),
    });
    Ok(())
  }

  /// Wires a declared output to a node field. Each output comes from exactly one node field.
  pub fn connect_output(&mut self, dataset: &str, node: &NodeHandle, field: &str) -> Result<()> {
    self.check_declared(dataset, IoDirection::Output)?;
    self.check_node(node)?;
    if let Some(existing) = self.output_connections.iter().find(|c| c.dataset == dataset) {
      return Err(StudyError::OutputAlreadyConnected {
        pipeline: self.name.clone(),
        name: dataset.to_string(),
        connected_to: existing.endpoint(),
      });
    }
    self.output_connections.push(IoConnection {
      dataset: dataset.to_string(),
      node: node.name.clone(),
      field: field.to_string(),
    });
    Ok(())
  }

  /// Resolved value of a declared option.
  pub fn option(&self, name: &str) -> Result<OptionValue> {
    self
      .options
      .resolve(name)
      .cloned()
      .ok_or_else(|| StudyError::UnknownOption {
        scope: format!("pipeline '{}'", self.name),
        name: name.to_string(),
      })
  }

  /// Checks that every declared input and output has at least one connection.
  pub fn check_connected(&self) -> Result<()> {
    let missing = |specs: &[DataSpec], connections: &[IoConnection]| {
      specs
        .iter()
        .find(|s| !connections.iter().any(|c| c.dataset == s.name()))
        .map(|s| s.name().to_string())
    };
    if let Some(name) = missing(&self.inputs, &self.input_connections) {
      return Err(StudyError::DisconnectedIo {
        pipeline: self.name.clone(),
        name,
        direction: IoDirection::Input,
      });
    }
    if let Some(name) = missing(&self.outputs, &self.output_connections) {
      return Err(StudyError::DisconnectedIo {
        pipeline: self.name.clone(),
        name,
        direction: IoDirection::Output,
      });
    }
    Ok(())
  }

  /// Validates the pipeline and freezes it.
  ///
  /// Fails with `DisconnectedIo` naming the first unconnected input or output, `CycleDetected`
  /// if node edges form a cycle, or `UnknownOption` for call-site overrides nothing declares.
  #[instrument(level = "trace", skip(self), fields(pipeline = %self.name))]
  pub fn assert_connected(self) -> Result<Pipeline> {
    self.check_connected()?;

    if let Some(name) = self.options.undeclared_overrides().first() {
      return Err(StudyError::UnknownOption {
        scope: format!("pipeline '{}'", self.name),
        name: name.to_string(),
      });
    }

    let names: Vec<String> = self.nodes.iter().map(|n| n.name.clone()).collect();
    let order = topology::topological_order(&names, &self.edges).map_err(|cycle| {
      StudyError::CycleDetected {
        scope: format!("pipeline '{}'", self.name),
        cycle,
      }
    })?;

    info!(
      pipeline = %self.name,
      node_count = self.nodes.len(),
      edge_count = self.edges.len(),
      "pipeline validated"
    );
    Ok(Pipeline {
      options: self.options.resolved(),
      name: self.name,
      description: self.description,
      version: self.version,
      inputs: self.inputs,
      outputs: self.outputs,
      citations: self.citations,
      nodes: self.nodes,
      order,
      edges: self.edges,
      input_connections: self.input_connections,
      output_connections: self.output_connections,
    })
  }
}

/// A validated, immutable processing graph ready to hand to an execution engine.
#[derive(Debug, Clone)]
pub struct Pipeline {
  name: String,
  description: String,
  version: u32,
  inputs: Vec<DataSpec>,
  outputs: Vec<DataSpec>,
  citations: Vec<Citation>,
  nodes: Vec<PipelineNode>,
  /// Node indices in topological order.
  order: Vec<usize>,
  edges: Vec<PipelineEdge>,
  input_connections: Vec<IoConnection>,
  output_connections: Vec<IoConnection>,
  options: BTreeMap<String, OptionValue>,
}

impl Pipeline {
  pub fn name(&self) -> &str {
    &self.name
  }

  pub fn description(&self) -> &str {
    &self.description
  }

  pub fn version(&self) -> u32 {
    self.version
  }

  pub fn inputs(&self) -> &[DataSpec] {
    &self.inputs
  }

  pub fn outputs(&self) -> &[DataSpec] {
    &self.outputs
  }

  pub fn input_names(&self) -> impl Iterator<Item = &str> {
    self.inputs.iter().map(DataSpec::name)
  }

  pub fn output_names(&self) -> impl Iterator<Item = &str> {
    self.outputs.iter().map(DataSpec::name)
  }

  pub fn produces(&self, name: &str) -> bool {
    self.outputs.iter().any(|s| s.name() == name)
  }

  pub fn citations(&self) -> &[Citation] {
    &self.citations
  }

  /// Nodes in declaration order.
  pub fn nodes(&self) -> &[PipelineNode] {
    &self.nodes
  }

  pub fn node(&self, name: &str) -> Option<&PipelineNode> {
    self.nodes.iter().find(|n| n.name == name)
  }

  /// Nodes in an order where every node follows the nodes feeding it.
  pub fn topological_order(&self) -> impl Iterator<Item = &PipelineNode> {
    self.order.iter().map(|&i| &self.nodes[i])
  }

  pub fn edges(&self) -> &[PipelineEdge] {
    &self.edges
  }

  pub fn input_connections(&self) -> &[IoConnection] {
    &self.input_connections
  }

  pub fn output_connections(&self) -> &[IoConnection] {
    &self.output_connections
  }

  /// Connection that produces the declared output `name`.
  pub fn output_connection(&self, name: &str) -> Option<&IoConnection> {
    self.output_connections.iter().find(|c| c.dataset == name)
  }

  /// Resolved value of every declared option, as used during the build.
  pub fn options(&self) -> &BTreeMap<String, OptionValue> {
    &self.options
  }

  /// Distinct requirements across all nodes, in first-seen order.
  pub fn requirements(&self) -> Vec<&Requirement> {
    let mut seen: Vec<&Requirement> = Vec::new();
    for req in self.nodes.iter().flat_map(|n| n.requirements.iter()) {
      if !seen.contains(&req) {
        seen.push(req);
      }
    }
    seen
  }
}
