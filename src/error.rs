//! Errors raised while declaring studies, building pipelines and dispatching archive nodes.
//!
//! Every variant is raised synchronously at definition, build or dispatch time, before any
//! work reaches the execution engine. Nothing here is retried.

use crate::types::IoDirection;
use thiserror::Error;

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, StudyError>;

/// Errors raised by registries, pipeline builders and archive dispatch.
#[derive(Debug, Error)]
pub enum StudyError {
  #[error("unknown dataset '{name}' in study '{study}'")]
  UnknownDataset { study: String, name: String },

  #[error("unknown option '{name}' for {scope}")]
  UnknownOption { scope: String, name: String },

  #[error("node '{node}' was not created in pipeline '{pipeline}'")]
  UnknownNode { pipeline: String, node: String },

  #[error("duplicate name '{name}' in study '{study}'")]
  DuplicateName { study: String, name: String },

  #[error("duplicate node name '{node}' in pipeline '{pipeline}'")]
  DuplicateNodeName { pipeline: String, node: String },

  #[error("'{name}' is acquired and has no producing pipeline in study '{study}'")]
  NotDerived { study: String, name: String },

  #[error("'{name}' was not declared as an {direction} of pipeline '{pipeline}'")]
  UndeclaredIo {
    pipeline: String,
    name: String,
    direction: IoDirection,
  },

  #[error("{direction} '{name}' of pipeline '{pipeline}' is not connected to any node")]
  DisconnectedIo {
    pipeline: String,
    name: String,
    direction: IoDirection,
  },

  #[error("output '{name}' of pipeline '{pipeline}' is already connected to '{connected_to}'")]
  OutputAlreadyConnected {
    pipeline: String,
    name: String,
    connected_to: String,
  },

  #[error("cycle detected in '{scope}': {}", .cycle.join(" -> "))]
  CycleDetected { scope: String, cycle: Vec<String> },

  #[error("pipeline '{pipeline}' is registered as the producer of '{name}' but does not output it")]
  PipelineOutputMismatch { pipeline: String, name: String },

  #[error("unrecognised multiplicity '{multiplicity}', can be one of '{}'", .options.join("', '"))]
  UnrecognisedMultiplicity {
    multiplicity: String,
    options: Vec<String>,
  },

  #[error("'{field}' is not a valid field for '{node}' archive node (accepts '{}')", .accepted.join("', '"))]
  InvalidField {
    node: String,
    field: String,
    accepted: Vec<String>,
  },

  #[error("unknown study '{name}', available: {}", .available.join(", "))]
  UnknownStudy { name: String, available: Vec<String> },

  #[error("node '{node}' requires {requirement} but found {}", .found.as_deref().unwrap_or("nothing"))]
  RequirementNotSatisfied {
    node: String,
    requirement: String,
    found: Option<String>,
  },

  #[error("could not detect version of '{requirement}': {reason}")]
  VersionNotDetectable { requirement: String, reason: String },

  #[error(transparent)]
  Io(#[from] std::io::Error),

  #[error(transparent)]
  Json(#[from] serde_json::Error),
}
