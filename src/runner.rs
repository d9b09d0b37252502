//! Hand-off of validated pipelines to an execution engine.
//!
//! - [plan_execution]: pairs a pipeline with the archive source and sinks that feed it.
//! - [ExecutionEngine]: the seam to the external engine that actually runs the nodes.
//! - [DryRunEngine]: checks requirements and reports the plan without running anything.
//! - [run_pipeline]: plans and submits every pipeline a requested dataset depends on;
//!   [run_pipeline_with] adds a per-plan hook.

use crate::archive::{Archive, ArchiveSink, ArchiveSource, FieldValue};
use crate::error::{Result, StudyError};
use crate::pipeline::Pipeline;
use crate::study::Study;
use crate::types::{DataSpec, Multiplicity, OptionOverrides, Version};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::{info, instrument, warn};

/// A pipeline wired to the archive nodes that read its inputs and store its outputs.
#[derive(Debug, Clone)]
pub struct ExecutionPlan {
  pub study: String,
  pub project_id: String,
  pub pipeline: Arc<Pipeline>,
  /// `None` when the pipeline declares no inputs.
  pub source: Option<ArchiveSource>,
  /// One sink per output multiplicity.
  pub sinks: Vec<ArchiveSink>,
}

impl ExecutionPlan {
  /// Node names in the order the engine should run them.
  pub fn node_order(&self) -> Vec<&str> {
    self
      .pipeline
      .topological_order()
      .map(|n| n.name.as_str())
      .collect()
  }

  pub fn sink_for(&self, multiplicity: Multiplicity) -> Option<&ArchiveSink> {
    self
      .sinks
      .iter()
      .find(|s| s.kind().multiplicity() == multiplicity)
  }
}

/// Builds the source and sinks for `pipeline` within `study`.
///
/// Outputs are grouped by multiplicity; each group gets a sink whose fields are assigned from
/// the node outputs the pipeline connected them to.
#[instrument(level = "trace", skip_all, fields(pipeline = pipeline.name()))]
pub fn plan_execution(
  study: &Study,
  pipeline: Arc<Pipeline>,
  archive: &dyn Archive,
) -> Result<ExecutionPlan> {
  let source = (!pipeline.inputs().is_empty()).then(|| {
    archive.source(
      study.project_id(),
      pipeline.inputs(),
      None,
      Some(study.name()),
    )
  });

  let mut groups: BTreeMap<Multiplicity, Vec<DataSpec>> = BTreeMap::new();
  for output in pipeline.outputs() {
    groups
      .entry(output.multiplicity())
      .or_default()
      .push(output.clone());
  }

  let mut sinks = Vec::with_capacity(groups.len());
  for (multiplicity, specs) in groups {
    let mut sink = archive.sink(
      study.project_id(),
      &specs,
      multiplicity.as_str(),
      None,
      Some(study.name()),
    )?;
    for spec in &specs {
      if let Some(conn) = pipeline.output_connection(spec.name()) {
        sink.set_field(
          &ArchiveSink::input_field(spec.name()),
          FieldValue::Connection {
            node: conn.node.clone(),
            field: conn.field.clone(),
          },
        )?;
      }
    }
    sinks.push(sink);
  }

  Ok(ExecutionPlan {
    study: study.name().to_string(),
    project_id: study.project_id().to_string(),
    pipeline,
    source,
    sinks,
  })
}

/// What happened to one node during submission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeStatus {
  /// Accepted but not run (dry run).
  Planned,
  Completed,
  Failed,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeReport {
  pub name: String,
  pub interface: String,
  pub status: NodeStatus,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SinkReport {
  pub name: String,
  pub multiplicity: Multiplicity,
  pub fields: Vec<String>,
}

/// Result of submitting one [ExecutionPlan].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExecutionReport {
  pub study: String,
  pub pipeline: String,
  pub dry_run: bool,
  pub nodes: Vec<NodeReport>,
  pub sinks: Vec<SinkReport>,
}

/// External engine that runs validated pipelines.
#[async_trait]
pub trait ExecutionEngine: Send + Sync {
  async fn submit(&self, plan: &ExecutionPlan) -> Result<ExecutionReport>;
}

/// Engine that checks requirements and reports the plan without running anything.
#[derive(Debug, Clone, Default)]
pub struct DryRunEngine {
  /// Installed tool versions; requirements are not checked when absent.
  environment: Option<BTreeMap<String, Version>>,
}

impl DryRunEngine {
  pub fn new() -> Self {
    Self::default()
  }

  /// Checks node requirements against these installed versions.
  pub fn with_environment(environment: BTreeMap<String, Version>) -> Self {
    Self {
      environment: Some(environment),
    }
  }

  fn check_requirements(&self, pipeline: &Pipeline) -> Result<()> {
    let Some(env) = &self.environment else {
      return Ok(());
    };
    for node in pipeline.topological_order() {
      for req in &node.requirements {
        let found = env.get(&req.name);
        if !found.is_some_and(|v| req.is_satisfied_by(v)) {
          return Err(StudyError::RequirementNotSatisfied {
            node: node.name.clone(),
            requirement: req.to_string(),
            found: found.map(|v| v.to_string()),
          });
        }
      }
    }
    Ok(())
  }
}

#[async_trait]
impl ExecutionEngine for DryRunEngine {
  async fn submit(&self, plan: &ExecutionPlan) -> Result<ExecutionReport> {
    self.check_requirements(&plan.pipeline)?;
    let nodes = plan
      .pipeline
      .topological_order()
      .map(|n| NodeReport {
        name: n.name.clone(),
        interface: n.interface.name().to_string(),
        status: NodeStatus::Planned,
      })
      .collect();
    let sinks = plan
      .sinks
      .iter()
      .map(|s| {
        for missing in s.missing_fields() {
          warn!(sink = s.name(), field = missing, "sink field not assigned");
        }
        SinkReport {
          name: s.name().to_string(),
          multiplicity: s.kind().multiplicity(),
          fields: s.fields().keys().cloned().collect(),
        }
      })
      .collect();
    Ok(ExecutionReport {
      study: plan.study.clone(),
      pipeline: plan.pipeline.name().to_string(),
      dry_run: true,
      nodes,
      sinks,
    })
  }
}

/// Plans and submits every pipeline needed to derive `dataset`, dependencies first.
pub async fn run_pipeline(
  engine: &dyn ExecutionEngine,
  study: &Study,
  dataset: &str,
  overrides: &OptionOverrides,
  archive: &dyn Archive,
) -> Result<Vec<ExecutionReport>> {
  run_pipeline_with(engine, study, dataset, overrides, archive, |_| Ok(())).await
}

/// Like [run_pipeline], calling `before_submit` on each plan before the engine sees it.
///
/// An error from the hook stops the run; pipelines already submitted stay submitted.
#[instrument(
  level = "trace",
  skip(engine, study, overrides, archive, before_submit),
  fields(study = study.name())
)]
pub async fn run_pipeline_with<F>(
  engine: &dyn ExecutionEngine,
  study: &Study,
  dataset: &str,
  overrides: &OptionOverrides,
  archive: &dyn Archive,
  mut before_submit: F,
) -> Result<Vec<ExecutionReport>>
where
  F: FnMut(&ExecutionPlan) -> Result<()>,
{
  let pipelines = study.required_pipelines(dataset, overrides)?;
  let mut reports = Vec::with_capacity(pipelines.len());
  for pipeline in pipelines {
    let plan = plan_execution(study, pipeline, archive)?;
    before_submit(&plan)?;
    let report = engine.submit(&plan).await?;
    info!(
      pipeline = %report.pipeline,
      nodes = report.nodes.len(),
      dry_run = report.dry_run,
      "pipeline submitted"
    );
    reports.push(report);
  }
  Ok(reports)
}
