//! Declarative types shared by registries, pipelines and archive dispatch.

use std::collections::BTreeMap;

mod citation;
mod data_format;
mod data_spec;
mod dataset_spec;
mod field_spec;
mod field_type;
mod io_connection;
mod io_direction;
mod multiplicity;
#[cfg(test)]
mod multiplicity_test;
mod node_handle;
mod option_spec;
mod option_value;
#[cfg(test)]
mod option_value_test;
mod pipeline_edge;
mod pipeline_factory;
mod pipeline_manifest;
mod pipeline_node;
mod requirement;
#[cfg(test)]
mod requirement_test;
mod version;
#[cfg(test)]
mod version_test;

pub use citation::Citation;
pub use data_format::DataFormat;
pub use data_spec::DataSpec;
pub use dataset_spec::DatasetSpec;
pub use field_spec::FieldSpec;
pub use field_type::FieldType;
pub use io_connection::IoConnection;
pub use io_direction::IoDirection;
pub use multiplicity::Multiplicity;
pub use node_handle::NodeHandle;
pub use option_spec::OptionSpec;
pub use option_value::OptionValue;
pub use pipeline_edge::PipelineEdge;
pub use pipeline_factory::{BuildPipelineFn, PipelineFactory};
pub use pipeline_manifest::{
  MANIFEST_VERSION, ManifestData, ManifestEdge, ManifestNode, PipelineManifest,
};
pub use pipeline_node::PipelineNode;
pub use requirement::{Requirement, VersionDetection};
pub use version::Version;

/// Option values keyed by option name (call-site or study-level overrides).
pub type OptionOverrides = BTreeMap<String, OptionValue>;
