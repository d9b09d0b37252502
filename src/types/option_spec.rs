//! Declared configuration option with its default value.

use super::OptionValue;

/// A configuration option declared by a study, with its default value.
#[derive(Debug, Clone, PartialEq)]
pub struct OptionSpec {
  pub name: String,
  pub default: OptionValue,
  pub description: Option<String>,
}

impl OptionSpec {
  pub fn new(name: impl Into<String>, default: impl Into<OptionValue>) -> Self {
    Self {
      name: name.into(),
      default: default.into(),
      description: None,
    }
  }

  pub fn with_description(mut self, description: impl Into<String>) -> Self {
    self.description = Some(description.into());
    self
  }
}
