//! # studyweave
//!
//! Declarative dataset registries and validated processing-graph builders for
//! neuroimaging studies.
//!
//! ## Architecture
//!
//! A [StudyDefinition] declares what a study acquires and derives, and which
//! pipeline factory produces each derived product. Pipelines are assembled with a
//! [PipelineBuilder] and only become a [Pipeline] once every declared input and
//! output is wired ([PipelineBuilder::assert_connected]).
//!
//! Archives ([archive::Archive]) supply source and sink nodes at the right
//! multiplicity; [runner] pairs them with a pipeline and hands the result to an
//! [runner::ExecutionEngine].

pub mod archive;
pub mod citations;
pub mod error;
pub mod interface;
pub mod manifest_io;
#[cfg(test)]
mod manifest_io_test;
pub mod options;
pub mod pipeline;
#[cfg(test)]
mod pipeline_test;
pub mod registry;
pub mod requirements;
pub mod runner;
pub mod studies;
pub mod study;
pub(crate) mod topology;
pub mod types;

pub use archive::{Archive, ArchiveSink, ArchiveSource, LocalArchive};
pub use error::{Result, StudyError};
pub use pipeline::{Pipeline, PipelineBuilder};
pub use registry::SpecRegistry;
pub use runner::{
  DryRunEngine, ExecutionEngine, ExecutionPlan, ExecutionReport, plan_execution, run_pipeline,
  run_pipeline_with,
};
pub use studies::study_definition;
pub use study::{DataSource, Study, StudyDefinition};
pub use types::{DataSpec, DatasetSpec, FieldSpec, Multiplicity, OptionValue, PipelineManifest};
