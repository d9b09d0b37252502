//! Registry of the data products and options a study declares.
//!
//! `register` is strict: any name already present, inherited or not, is a `DuplicateName`.
//! `declare` is the path a derived study definition takes: it may replace inherited entries,
//! but two entries with the same name in one declaration, or a name the child already
//! declared, are still duplicates.

use crate::error::{Result, StudyError};
use crate::types::{DataSpec, OptionSpec, OptionValue, PipelineFactory};
use std::collections::{BTreeMap, BTreeSet, HashSet};
use tracing::{debug, instrument};

/// Name -> spec and name -> option tables for one study definition.
#[derive(Debug, Clone, Default)]
pub struct SpecRegistry {
  study: String,
  specs: BTreeMap<String, DataSpec>,
  options: BTreeMap<String, OptionSpec>,
  /// Spec names copied from a parent definition and not yet replaced.
  inherited: BTreeSet<String>,
  inherited_options: BTreeSet<String>,
}

impl SpecRegistry {
  pub fn new(study: impl Into<String>) -> Self {
    Self {
      study: study.into(),
      ..Self::default()
    }
  }

  /// Copy of this registry for a child study; every entry is marked as inherited.
  pub fn inherit(&self, study: impl Into<String>) -> Self {
    Self {
      study: study.into(),
      specs: self.specs.clone(),
      options: self.options.clone(),
      inherited: self.specs.keys().cloned().collect(),
      inherited_options: self.options.keys().cloned().collect(),
    }
  }

  pub fn study(&self) -> &str {
    &self.study
  }

  /// Adds specs; the whole batch is rejected if any name collides.
  #[instrument(level = "trace", skip(self, specs), fields(study = %self.study))]
  pub fn register(&mut self, specs: impl IntoIterator<Item = DataSpec>) -> Result<()> {
    let batch = named(specs, |s| s.name().to_string());
    insert_batch(&self.study, &mut self.specs, &mut self.inherited, batch, false)
  }

  /// Adds specs, replacing inherited specs of the same name.
  #[instrument(level = "trace", skip(self, specs), fields(study = %self.study))]
  pub fn declare(&mut self, specs: impl IntoIterator<Item = DataSpec>) -> Result<()> {
    let batch = named(specs, |s| s.name().to_string());
    insert_batch(&self.study, &mut self.specs, &mut self.inherited, batch, true)
  }

  pub fn register_options(&mut self, options: impl IntoIterator<Item = OptionSpec>) -> Result<()> {
    let batch = named(options, |o| o.name.clone());
    insert_batch(&self.study, &mut self.options, &mut self.inherited_options, batch, false)
  }

  pub fn declare_options(&mut self, options: impl IntoIterator<Item = OptionSpec>) -> Result<()> {
    let batch = named(options, |o| o.name.clone());
    insert_batch(&self.study, &mut self.options, &mut self.inherited_options, batch, true)
  }

  pub fn contains(&self, name: &str) -> bool {
    self.specs.contains_key(name)
  }

  /// True if `name` was copied from a parent definition and not replaced.
  pub fn is_inherited(&self, name: &str) -> bool {
    self.inherited.contains(name)
  }

  pub fn resolve(&self, name: &str) -> Result<&DataSpec> {
    self
      .specs
      .get(name)
      .ok_or_else(|| StudyError::UnknownDataset {
        study: self.study.clone(),
        name: name.to_string(),
      })
  }

  /// Whether `name` is supplied as raw input rather than derived.
  pub fn is_acquired(&self, name: &str) -> Result<bool> {
    self.resolve(name).map(DataSpec::is_acquired)
  }

  pub fn producing_pipeline(&self, name: &str) -> Result<PipelineFactory> {
    self
      .resolve(name)?
      .pipeline()
      .ok_or_else(|| StudyError::NotDerived {
        study: self.study.clone(),
        name: name.to_string(),
      })
  }

  /// Registered specs in name order.
  pub fn specs(&self) -> impl Iterator<Item = &DataSpec> {
    self.specs.values()
  }

  pub fn acquired_names(&self) -> impl Iterator<Item = &str> {
    self
      .specs
      .values()
      .filter(|s| s.is_acquired())
      .map(DataSpec::name)
  }

  pub fn derived_names(&self) -> impl Iterator<Item = &str> {
    self
      .specs
      .values()
      .filter(|s| !s.is_acquired())
      .map(DataSpec::name)
  }

  /// Specs produced by the factory called `pipeline`.
  pub fn produced_by<'a>(&'a self, pipeline: &'a str) -> impl Iterator<Item = &'a DataSpec> {
    self
      .specs
      .values()
      .filter(move |s| s.pipeline().is_some_and(|p| p.name() == pipeline))
  }

  pub fn option_spec(&self, name: &str) -> Result<&OptionSpec> {
    self
      .options
      .get(name)
      .ok_or_else(|| StudyError::UnknownOption {
        scope: format!("study '{}'", self.study),
        name: name.to_string(),
      })
  }

  pub fn option_specs(&self) -> impl Iterator<Item = &OptionSpec> {
    self.options.values()
  }

  /// Declared default of every option.
  pub fn option_defaults(&self) -> BTreeMap<String, OptionValue> {
    self
      .options
      .iter()
      .map(|(k, o)| (k.clone(), o.default.clone()))
      .collect()
  }
}

fn named<T>(items: impl IntoIterator<Item = T>, name: impl Fn(&T) -> String) -> Vec<(String, T)> {
  items.into_iter().map(|i| (name(&i), i)).collect()
}

fn insert_batch<T>(
  study: &str,
  table: &mut BTreeMap<String, T>,
  inherited: &mut BTreeSet<String>,
  batch: Vec<(String, T)>,
  may_override: bool,
) -> Result<()> {
  let duplicate = |name: &str| StudyError::DuplicateName {
    study: study.to_string(),
    name: name.to_string(),
  };
  let mut seen = HashSet::new();
  for (name, _) in &batch {
    if !seen.insert(name.as_str()) {
      return Err(duplicate(name));
    }
    let replaceable = may_override && inherited.contains(name);
    if table.contains_key(name) && !replaceable {
      return Err(duplicate(name));
    }
  }
  for (name, item) in batch {
    if inherited.remove(&name) {
      debug!(study, name = %name, "overriding inherited entry");
    }
    table.insert(name, item);
  }
  Ok(())
}
