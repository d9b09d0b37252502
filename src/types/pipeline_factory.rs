//! Reference to the function that builds the pipeline producing a dataset.

use super::OptionOverrides;
use crate::error::Result;
use crate::pipeline::Pipeline;
use crate::study::Study;
use std::fmt;

/// Signature of a pipeline factory: builds a validated pipeline for a study instance.
pub type BuildPipelineFn = fn(&Study, &OptionOverrides) -> Result<Pipeline>;

/// Named reference to a pipeline factory.
///
/// Two factories are equal when their names are equal; function pointers are not compared.
#[derive(Clone, Copy)]
pub struct PipelineFactory {
  name: &'static str,
  build: BuildPipelineFn,
}

impl PipelineFactory {
  pub const fn new(name: &'static str, build: BuildPipelineFn) -> Self {
    Self { name, build }
  }

  pub fn name(&self) -> &'static str {
    self.name
  }

  /// Invokes the factory with call-site option overrides.
  pub fn build(&self, study: &Study, overrides: &OptionOverrides) -> Result<Pipeline> {
    (self.build)(study, overrides)
  }
}

impl fmt::Debug for PipelineFactory {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_tuple("PipelineFactory").field(&self.name).finish()
  }
}

impl PartialEq for PipelineFactory {
  fn eq(&self, other: &Self) -> bool {
    self.name == other.name
  }
}

impl Eq for PipelineFactory {}
