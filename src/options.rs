//! Option resolution for pipelines under construction.
//!
//! Precedence, highest first: call-site override, study-level override, default declared by
//! the pipeline, default declared by the study definition.

use crate::types::{OptionOverrides, OptionValue};
use std::collections::BTreeMap;

/// Option sources visible to one pipeline build.
#[derive(Debug, Clone, Default)]
pub struct OptionTable {
  study_defaults: BTreeMap<String, OptionValue>,
  pipeline_defaults: BTreeMap<String, OptionValue>,
  study_overrides: OptionOverrides,
  call_site: OptionOverrides,
}

impl OptionTable {
  pub fn new(
    study_defaults: BTreeMap<String, OptionValue>,
    study_overrides: OptionOverrides,
    call_site: OptionOverrides,
  ) -> Self {
    Self {
      study_defaults,
      pipeline_defaults: BTreeMap::new(),
      study_overrides,
      call_site,
    }
  }

  /// Declares a pipeline-level default, shadowing the study definition's default.
  pub fn declare_default(&mut self, name: impl Into<String>, value: OptionValue) {
    self.pipeline_defaults.insert(name.into(), value);
  }

  pub fn is_declared(&self, name: &str) -> bool {
    self.pipeline_defaults.contains_key(name) || self.study_defaults.contains_key(name)
  }

  /// Resolved value of a declared option; `None` if it was never declared.
  pub fn resolve(&self, name: &str) -> Option<&OptionValue> {
    if !self.is_declared(name) {
      return None;
    }
    self
      .call_site
      .get(name)
      .or_else(|| self.study_overrides.get(name))
      .or_else(|| self.pipeline_defaults.get(name))
      .or_else(|| self.study_defaults.get(name))
  }

  /// Call-site override names that no default declares.
  pub fn undeclared_overrides(&self) -> Vec<&str> {
    self
      .call_site
      .keys()
      .filter(|k| !self.is_declared(k))
      .map(String::as_str)
      .collect()
  }

  /// Every declared option with its resolved value.
  pub fn resolved(&self) -> BTreeMap<String, OptionValue> {
    self
      .study_defaults
      .keys()
      .chain(self.pipeline_defaults.keys())
      .filter_map(|k| self.resolve(k).map(|v| (k.clone(), v.clone())))
      .collect()
  }
}

#[cfg(test)]
mod tests {
  use super::OptionTable;
  use crate::types::{OptionOverrides, OptionValue};
  use std::collections::BTreeMap;

  fn table() -> OptionTable {
    let defaults = BTreeMap::from([
      ("a".to_string(), OptionValue::Int(1)),
      ("b".to_string(), OptionValue::Int(1)),
      ("c".to_string(), OptionValue::Int(1)),
    ]);
    let study = OptionOverrides::from([
      ("b".to_string(), OptionValue::Int(2)),
      ("c".to_string(), OptionValue::Int(2)),
    ]);
    let call_site = OptionOverrides::from([("c".to_string(), OptionValue::Int(3))]);
    OptionTable::new(defaults, study, call_site)
  }

  #[test]
  fn precedence_call_site_then_study_then_default() {
    let t = table();
    assert_eq!(t.resolve("a"), Some(&OptionValue::Int(1)));
    assert_eq!(t.resolve("b"), Some(&OptionValue::Int(2)));
    assert_eq!(t.resolve("c"), Some(&OptionValue::Int(3)));
    assert_eq!(t.resolve("d"), None);
  }

  #[test]
  fn pipeline_default_shadows_study_default() {
    let mut t = table();
    t.declare_default("a", OptionValue::Int(10));
    t.declare_default("e", OptionValue::from("x"));
    assert_eq!(t.resolve("a"), Some(&OptionValue::Int(10)));
    assert_eq!(t.resolve("e"), Some(&OptionValue::from("x")));
    // study-level override still wins over the pipeline default
    t.declare_default("b", OptionValue::Int(10));
    assert_eq!(t.resolve("b"), Some(&OptionValue::Int(2)));
  }

  #[test]
  fn undeclared_call_site_overrides_are_reported() {
    let t = OptionTable::new(
      BTreeMap::new(),
      OptionOverrides::new(),
      OptionOverrides::from([("zz".to_string(), OptionValue::Bool(true))]),
    );
    assert_eq!(t.undeclared_overrides(), vec!["zz"]);
    assert!(t.resolved().is_empty());
  }

  #[test]
  fn resolved_lists_each_declared_option_once() {
    let mut t = table();
    t.declare_default("a", OptionValue::Int(10));
    let resolved = t.resolved();
    assert_eq!(resolved.len(), 3);
    assert_eq!(resolved["a"], OptionValue::Int(10));
    assert_eq!(resolved["c"], OptionValue::Int(3));
  }
}
