//! Interfaces wrapped by pipeline nodes.
//!
//! The wrapped tools (FSL, ANTs, MRtrix, MATLAB scripts) are run by the execution engine. An
//! interface here is only the description the engine needs: a qualified name, the command
//! and static parameters.

use crate::types::OptionValue;
use dyn_clone::DynClone;
use std::collections::BTreeMap;
use std::fmt;

/// A processing step description consumed by the execution engine.
pub trait Interface: DynClone + fmt::Debug + Send + Sync {
  /// Qualified interface name, e.g. `fsl.BET`.
  fn name(&self) -> &str;

  /// Executable the engine runs, if the interface wraps a command-line tool.
  fn command(&self) -> Option<&str> {
    None
  }

  /// Static interface parameters fixed at construction.
  fn parameters(&self) -> BTreeMap<String, OptionValue> {
    BTreeMap::new()
  }
}

dyn_clone::clone_trait_object!(Interface);

/// Wraps an external command-line tool.
#[derive(Debug, Clone)]
pub struct ToolInterface {
  name: String,
  command: String,
  parameters: BTreeMap<String, OptionValue>,
}

impl ToolInterface {
  pub fn new(name: impl Into<String>, command: impl Into<String>) -> Self {
    Self {
      name: name.into(),
      command: command.into(),
      parameters: BTreeMap::new(),
    }
  }

  pub fn with_param(mut self, name: impl Into<String>, value: impl Into<OptionValue>) -> Self {
    self.parameters.insert(name.into(), value.into());
    self
  }
}

impl Interface for ToolInterface {
  fn name(&self) -> &str {
    &self.name
  }

  fn command(&self) -> Option<&str> {
    Some(&self.command)
  }

  fn parameters(&self) -> BTreeMap<String, OptionValue> {
    self.parameters.clone()
  }
}

/// A step the execution engine runs in-process rather than as an external command.
#[derive(Debug, Clone)]
pub struct FunctionInterface {
  name: String,
  parameters: BTreeMap<String, OptionValue>,
}

impl FunctionInterface {
  pub fn new(name: impl Into<String>) -> Self {
    Self {
      name: name.into(),
      parameters: BTreeMap::new(),
    }
  }

  pub fn with_param(mut self, name: impl Into<String>, value: impl Into<OptionValue>) -> Self {
    self.parameters.insert(name.into(), value.into());
    self
  }
}

impl Interface for FunctionInterface {
  fn name(&self) -> &str {
    &self.name
  }

  fn parameters(&self) -> BTreeMap<String, OptionValue> {
    self.parameters.clone()
  }
}

/// Passes its fields through unchanged.
#[derive(Debug, Clone)]
pub struct IdentityInterface {
  fields: Vec<String>,
}

impl IdentityInterface {
  pub fn new<I, S>(fields: I) -> Self
  where
    I: IntoIterator<Item = S>,
    S: Into<String>,
  {
    Self {
      fields: fields.into_iter().map(Into::into).collect(),
    }
  }
}

impl Interface for IdentityInterface {
  fn name(&self) -> &str {
    "utility.IdentityInterface"
  }

  fn parameters(&self) -> BTreeMap<String, OptionValue> {
    BTreeMap::from([(
      "fields".to_string(),
      OptionValue::from(self.fields.clone()),
    )])
  }
}

/// Merges `in1..inN` into a single list output `out`.
#[derive(Debug, Clone)]
pub struct MergeInterface {
  num_inputs: u32,
}

impl MergeInterface {
  pub fn new(num_inputs: u32) -> Self {
    Self { num_inputs }
  }
}

impl Interface for MergeInterface {
  fn name(&self) -> &str {
    "utility.Merge"
  }

  fn parameters(&self) -> BTreeMap<String, OptionValue> {
    BTreeMap::from([("numinputs".to_string(), OptionValue::from(self.num_inputs))])
  }
}

#[cfg(test)]
mod tests {
  use super::{FunctionInterface, IdentityInterface, Interface, MergeInterface, ToolInterface};
  use crate::types::OptionValue;

  #[test]
  fn tool_interface_reports_command_and_params() {
    let bet = ToolInterface::new("fsl.BET", "bet").with_param("mask", true);
    assert_eq!(bet.name(), "fsl.BET");
    assert_eq!(bet.command(), Some("bet"));
    assert_eq!(bet.parameters().get("mask"), Some(&OptionValue::Bool(true)));
  }

  #[test]
  fn boxed_interfaces_clone() {
    let boxed: Box<dyn Interface> = Box::new(MergeInterface::new(2));
    let cloned = boxed.clone();
    assert_eq!(cloned.name(), "utility.Merge");
    assert_eq!(cloned.parameters().get("numinputs"), Some(&OptionValue::Int(2)));
    assert!(cloned.command().is_none());
  }

  #[test]
  fn function_interface_has_no_command() {
    let ica = FunctionInterface::new("sklearn.FastICA").with_param("whiten", true);
    assert!(ica.command().is_none());
    assert_eq!(ica.parameters().len(), 1);
  }

  #[test]
  fn identity_lists_fields() {
    let identity = IdentityInterface::new(["a", "b"]);
    assert_eq!(
      identity.parameters().get("fields"),
      Some(&OptionValue::from(vec!["a", "b"]))
    );
  }
}
