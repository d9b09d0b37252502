//! Serializable description of a validated pipeline, handed to the execution engine.

use super::{Citation, DataSpec, IoConnection, Multiplicity, OptionValue};
use crate::pipeline::Pipeline;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Current manifest format version.
pub const MANIFEST_VERSION: u32 = 1;

/// A declared input or output of the pipeline and the node fields it is wired to.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ManifestData {
  pub name: String,
  /// `"dataset"` or `"field"`.
  pub kind: String,
  /// Format name for datasets, value type for fields.
  pub format: String,
  pub multiplicity: Multiplicity,
  /// `node.field` endpoints.
  pub connections: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ManifestNode {
  pub name: String,
  pub interface: String,
  pub command: Option<String>,
  pub parameters: BTreeMap<String, OptionValue>,
  pub inputs: BTreeMap<String, OptionValue>,
  pub iterfield: Vec<String>,
  pub requirements: Vec<String>,
  pub memory: Option<u32>,
  pub wall_time: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ManifestEdge {
  pub from: String,
  pub to: String,
}

/// Root structure of `<pipeline>.manifest.json`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PipelineManifest {
  pub version: u32,
  pub study: String,
  pub pipeline: String,
  pub description: String,
  pub pipeline_version: u32,
  pub built_at: DateTime<Utc>,
  pub inputs: Vec<ManifestData>,
  pub outputs: Vec<ManifestData>,
  /// Nodes in topological order.
  pub nodes: Vec<ManifestNode>,
  pub edges: Vec<ManifestEdge>,
  pub options: BTreeMap<String, OptionValue>,
  pub citations: Vec<Citation>,
}

impl PipelineManifest {
  /// Describes `pipeline` as built for the study instance named `study`.
  pub fn from_pipeline(study: &str, pipeline: &Pipeline) -> Self {
    let nodes = pipeline
      .topological_order()
      .map(|node| ManifestNode {
        name: node.name.clone(),
        interface: node.interface.name().to_string(),
        command: node.interface.command().map(str::to_string),
        parameters: node.interface.parameters(),
        inputs: node.inputs.clone(),
        iterfield: node.iterfield.clone(),
        requirements: node.requirements.iter().map(|r| r.to_string()).collect(),
        memory: node.memory,
        wall_time: node.wall_time,
      })
      .collect();

    let edges = pipeline
      .edges()
      .iter()
      .map(|e| ManifestEdge {
        from: format!("{}.{}", e.from_node, e.from_field),
        to: format!("{}.{}", e.to_node, e.to_field),
      })
      .collect();

    Self {
      version: MANIFEST_VERSION,
      study: study.to_string(),
      pipeline: pipeline.name().to_string(),
      description: pipeline.description().to_string(),
      pipeline_version: pipeline.version(),
      built_at: Utc::now(),
      inputs: manifest_data(pipeline.inputs(), pipeline.input_connections()),
      outputs: manifest_data(pipeline.outputs(), pipeline.output_connections()),
      nodes,
      edges,
      options: pipeline.options().clone(),
      citations: pipeline.citations().to_vec(),
    }
  }
}

fn manifest_data(specs: &[DataSpec], connections: &[IoConnection]) -> Vec<ManifestData> {
  specs
    .iter()
    .map(|spec| ManifestData {
      name: spec.name().to_string(),
      kind: spec.kind().to_string(),
      format: spec.type_name(),
      multiplicity: spec.multiplicity(),
      connections: connections
        .iter()
        .filter(|c| c.dataset == spec.name())
        .map(IoConnection::endpoint)
        .collect(),
    })
    .collect()
}
