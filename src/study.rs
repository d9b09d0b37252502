//! Study definitions and study instances.
//!
//! A [StudyDefinition] is the immutable, shared declaration of a study's data products and
//! options. A derived definition is built by composition with [StudyDefinition::extend]: the
//! parent's registry is copied and the child's declarations replace inherited entries.
//!
//! A [Study] binds a definition to an archive project and study-level option overrides. It is
//! what pipeline factories receive when they build.

use crate::error::{Result, StudyError};
use crate::options::OptionTable;
use crate::pipeline::{Pipeline, PipelineBuilder};
use crate::registry::SpecRegistry;
use crate::types::{DataSpec, OptionOverrides, OptionSpec, OptionValue};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, info, instrument};

/// Declared data products and options of a study type.
#[derive(Debug)]
pub struct StudyDefinition {
  name: String,
  parent: Option<String>,
  registry: SpecRegistry,
}

impl StudyDefinition {
  pub fn builder(name: impl Into<String>) -> StudyDefinitionBuilder {
    let name = name.into();
    StudyDefinitionBuilder {
      registry: SpecRegistry::new(name.clone()),
      name,
      parent: None,
      data_specs: Vec::new(),
      option_specs: Vec::new(),
    }
  }

  /// Starts a definition that inherits every spec and option of `parent`.
  pub fn extend(parent: &StudyDefinition, name: impl Into<String>) -> StudyDefinitionBuilder {
    let name = name.into();
    StudyDefinitionBuilder {
      registry: parent.registry.inherit(name.clone()),
      name,
      parent: Some(parent.name.clone()),
      data_specs: Vec::new(),
      option_specs: Vec::new(),
    }
  }

  pub fn name(&self) -> &str {
    &self.name
  }

  pub fn parent(&self) -> Option<&str> {
    self.parent.as_deref()
  }

  pub fn registry(&self) -> &SpecRegistry {
    &self.registry
  }
}

/// Collects declarations for a [StudyDefinition].
#[derive(Debug)]
pub struct StudyDefinitionBuilder {
  name: String,
  parent: Option<String>,
  registry: SpecRegistry,
  data_specs: Vec<DataSpec>,
  option_specs: Vec<OptionSpec>,
}

impl StudyDefinitionBuilder {
  pub fn add_data_specs<I, S>(mut self, specs: I) -> Self
  where
    I: IntoIterator<Item = S>,
    S: Into<DataSpec>,
  {
    self.data_specs.extend(specs.into_iter().map(Into::into));
    self
  }

  pub fn add_option_specs(mut self, options: impl IntoIterator<Item = OptionSpec>) -> Self {
    self.option_specs.extend(options);
    self
  }

  /// Registers the declarations; a derived definition may replace inherited names.
  #[instrument(level = "trace", skip(self), fields(study = %self.name))]
  pub fn build(mut self) -> Result<Arc<StudyDefinition>> {
    if self.parent.is_some() {
      self.registry.declare(self.data_specs)?;
      self.registry.declare_options(self.option_specs)?;
    } else {
      self.registry.register(self.data_specs)?;
      self.registry.register_options(self.option_specs)?;
    }
    debug!(
      study = %self.name,
      parent = ?self.parent,
      specs = self.registry.specs().count(),
      "study definition built"
    );
    Ok(Arc::new(StudyDefinition {
      name: self.name,
      parent: self.parent,
      registry: self.registry,
    }))
  }
}

/// What a study holds for a requested data product.
#[derive(Debug, Clone)]
pub enum DataSource {
  /// Supplied from the archive.
  Acquired(DataSpec),
  /// Produced by this validated pipeline.
  Derived(Arc<Pipeline>),
}

/// A study definition bound to an archive project.
#[derive(Debug, Clone)]
pub struct Study {
  name: String,
  definition: Arc<StudyDefinition>,
  project_id: String,
  options: OptionOverrides,
}

impl Study {
  pub fn new(
    name: impl Into<String>,
    definition: Arc<StudyDefinition>,
    project_id: impl Into<String>,
  ) -> Self {
    Self {
      name: name.into(),
      definition,
      project_id: project_id.into(),
      options: OptionOverrides::new(),
    }
  }

  /// Sets study-level option overrides; every name must be declared by the definition.
  pub fn with_options(mut self, options: OptionOverrides) -> Result<Self> {
    for name in options.keys() {
      self.definition.registry.option_spec(name)?;
    }
    self.options = options;
    Ok(self)
  }

  pub fn name(&self) -> &str {
    &self.name
  }

  pub fn project_id(&self) -> &str {
    &self.project_id
  }

  pub fn definition(&self) -> &StudyDefinition {
    &self.definition
  }

  pub fn registry(&self) -> &SpecRegistry {
    &self.definition.registry
  }

  pub fn spec(&self, name: &str) -> Result<&DataSpec> {
    self.definition.registry.resolve(name)
  }

  /// Study-level value of an option (override or declared default).
  pub fn option(&self, name: &str) -> Result<OptionValue> {
    let spec = self.definition.registry.option_spec(name)?;
    Ok(self.options.get(name).unwrap_or(&spec.default).clone())
  }

  /// Name a processed dataset takes in the archive, partitioned by study name.
  pub fn processed_name(&self, name: &str) -> String {
    format!("{}_{}", self.name, name)
  }

  /// Starts a pipeline; every input and output must be a registered name.
  #[instrument(level = "trace", skip(self, overrides), fields(study = %self.name))]
  pub fn create_pipeline(
    &self,
    name: &str,
    inputs: &[&str],
    outputs: &[&str],
    description: &str,
    overrides: &OptionOverrides,
  ) -> Result<PipelineBuilder> {
    let resolve = |names: &[&str]| -> Result<Vec<DataSpec>> {
      names
        .iter()
        .map(|n| self.spec(n).cloned())
        .collect()
    };
    let inputs = resolve(inputs)?;
    let outputs = resolve(outputs)?;
    let options = OptionTable::new(
      self.definition.registry.option_defaults(),
      self.options.clone(),
      overrides.clone(),
    );
    Ok(PipelineBuilder::new(name, inputs, outputs, description, options))
  }

  /// Builds the pipeline producing `dataset`.
  #[instrument(level = "trace", skip(self, overrides), fields(study = %self.name))]
  pub fn pipeline_for(&self, dataset: &str, overrides: &OptionOverrides) -> Result<Pipeline> {
    let factory = self.definition.registry.producing_pipeline(dataset)?;
    let pipeline = factory.build(self, overrides)?;
    if !pipeline.produces(dataset) {
      return Err(StudyError::PipelineOutputMismatch {
        pipeline: pipeline.name().to_string(),
        name: dataset.to_string(),
      });
    }
    info!(study = %self.name, dataset, pipeline = pipeline.name(), "pipeline built");
    Ok(pipeline)
  }

  /// Resolves a requested product to the archive or to its built pipeline.
  pub fn data(&self, name: &str, overrides: &OptionOverrides) -> Result<DataSource> {
    let spec = self.spec(name)?;
    if spec.is_acquired() {
      return Ok(DataSource::Acquired(spec.clone()));
    }
    self
      .pipeline_for(name, overrides)
      .map(|p| DataSource::Derived(Arc::new(p)))
  }

  /// Every pipeline needed to derive `dataset`, dependencies first.
  ///
  /// Call-site overrides are applied only to the pipeline producing `dataset`; upstream
  /// pipelines build with study-level options. Returns an empty list for acquired data.
  #[instrument(level = "trace", skip(self, overrides), fields(study = %self.name))]
  pub fn required_pipelines(
    &self,
    dataset: &str,
    overrides: &OptionOverrides,
  ) -> Result<Vec<Arc<Pipeline>>> {
    let mut resolver = DependencyResolver {
      study: self,
      built: HashMap::new(),
      stack: Vec::new(),
      order: Vec::new(),
    };
    resolver.visit(dataset, Some(overrides))?;
    Ok(resolver.order)
  }
}

struct DependencyResolver<'a> {
  study: &'a Study,
  /// Factory name -> built pipeline.
  built: HashMap<&'static str, Arc<Pipeline>>,
  /// Factories currently being resolved.
  stack: Vec<&'static str>,
  order: Vec<Arc<Pipeline>>,
}

impl DependencyResolver<'_> {
  fn visit(&mut self, dataset: &str, overrides: Option<&OptionOverrides>) -> Result<()> {
    let Some(factory) = self.study.spec(dataset)?.pipeline() else {
      return Ok(());
    };
    let name = factory.name();
    if self.built.contains_key(name) {
      return Ok(());
    }
    if let Some(pos) = self.stack.iter().position(|n| *n == name) {
      let mut cycle: Vec<String> = self.stack[pos..].iter().map(|n| n.to_string()).collect();
      cycle.push(name.to_string());
      return Err(StudyError::CycleDetected {
        scope: format!("study '{}'", self.study.name),
        cycle,
      });
    }

    let empty = OptionOverrides::new();
    let pipeline = Arc::new(
      self
        .study
        .pipeline_for(dataset, overrides.unwrap_or(&empty))?,
    );
    self.stack.push(name);
    for input in pipeline.input_names() {
      self.visit(input, None)?;
    }
    self.stack.pop();
    self.built.insert(name, Arc::clone(&pipeline));
    self.order.push(pipeline);
    Ok(())
  }
}
