//! Archive on the local filesystem.
//!
//! Layout under the archive root:
//!
//! ```text
//! <project>/<subject>/<visit>/        session datasets
//! <project>/<subject>/<visit>_PROC/   processed session datasets
//! <project>/<subject>/ALL/            per-subject datasets
//! <project>/ALL/<visit>/              per-visit datasets
//! <project>/ALL/ALL/                  per-project datasets
//! ```

use super::tree::{Dataset, Project, Session};
use super::Archive;
use crate::error::Result;
use crate::types::{DataFormat, Multiplicity};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, instrument};

/// Directory name holding summaries across subjects or visits.
pub const SUMMARY_NAME: &str = "ALL";

/// Suffix of the directory holding a session's processed datasets.
pub const PROCESSED_SUFFIX: &str = "_PROC";

#[derive(Debug, Clone)]
pub struct LocalArchive {
  root: PathBuf,
}

impl LocalArchive {
  pub fn new(root: impl Into<PathBuf>) -> Self {
    Self { root: root.into() }
  }

  pub fn root(&self) -> &Path {
    &self.root
  }

  /// Directory a session's datasets live in.
  pub fn session_dir(&self, project_id: &str, subject_id: &str, visit_id: &str) -> PathBuf {
    self.root.join(project_id).join(subject_id).join(visit_id)
  }

  /// Directory datasets of `multiplicity` are stored in for the given ids.
  pub fn dataset_dir(
    &self,
    project_id: &str,
    multiplicity: Multiplicity,
    subject_id: &str,
    visit_id: &str,
  ) -> PathBuf {
    let project = self.root.join(project_id);
    match multiplicity {
      Multiplicity::PerSession => project.join(subject_id).join(visit_id),
      Multiplicity::PerSubject => project.join(subject_id).join(SUMMARY_NAME),
      Multiplicity::PerVisit => project.join(SUMMARY_NAME).join(visit_id),
      Multiplicity::PerProject => project.join(SUMMARY_NAME).join(SUMMARY_NAME),
    }
  }
}

impl Archive for LocalArchive {
  fn kind(&self) -> &str {
    "local"
  }

  #[instrument(level = "trace", skip(self))]
  fn project(
    &self,
    project_id: &str,
    subject_ids: Option<&[String]>,
    visit_ids: Option<&[String]>,
  ) -> Result<Project> {
    let project_dir = self.root.join(project_id);
    let wanted = |ids: Option<&[String]>, id: &str| ids.is_none_or(|ids| ids.iter().any(|i| i == id));

    let mut sessions = Vec::new();
    let mut subject_datasets = BTreeMap::new();
    for subject_id in sub_dirs(&project_dir)? {
      if subject_id == SUMMARY_NAME || !wanted(subject_ids, &subject_id) {
        continue;
      }
      let subject_dir = project_dir.join(&subject_id);
      for visit_id in sub_dirs(&subject_dir)? {
        if visit_id == SUMMARY_NAME
          || visit_id.ends_with(PROCESSED_SUFFIX)
          || !wanted(visit_ids, &visit_id)
        {
          continue;
        }
        let datasets = list_datasets(&subject_dir.join(&visit_id), Multiplicity::PerSession, false)?;
        let mut session = Session::new(subject_id.clone(), visit_id.clone(), datasets);
        let processed_dir = subject_dir.join(format!("{visit_id}{PROCESSED_SUFFIX}"));
        if processed_dir.is_dir() {
          let processed = list_datasets(&processed_dir, Multiplicity::PerSession, true)?;
          session = session.with_processed(Session::new(subject_id.clone(), visit_id.clone(), processed));
        }
        sessions.push(session);
      }
      let summary = subject_dir.join(SUMMARY_NAME);
      if summary.is_dir() {
        subject_datasets.insert(
          subject_id.clone(),
          list_datasets(&summary, Multiplicity::PerSubject, true)?,
        );
      }
    }

    let mut visit_datasets = BTreeMap::new();
    let mut project_datasets = Vec::new();
    let summaries = project_dir.join(SUMMARY_NAME);
    if summaries.is_dir() {
      for visit_id in sub_dirs(&summaries)? {
        let dir = summaries.join(&visit_id);
        if visit_id == SUMMARY_NAME {
          project_datasets = list_datasets(&dir, Multiplicity::PerProject, true)?;
        } else if wanted(visit_ids, &visit_id) {
          visit_datasets.insert(visit_id, list_datasets(&dir, Multiplicity::PerVisit, true)?);
        }
      }
    }

    debug!(
      project = project_id,
      sessions = sessions.len(),
      "listed local project"
    );
    Ok(Project::from_sessions(
      project_id,
      sessions,
      subject_datasets,
      visit_datasets,
      project_datasets,
    ))
  }
}

/// Entry name, or `None` (logged) when it is not valid UTF-8 and so cannot name an id or dataset.
fn utf8_name(entry: &fs::DirEntry) -> Option<String> {
  match entry.file_name().into_string() {
    Ok(name) => Some(name),
    Err(raw) => {
      debug!(name = ?raw, dir = %entry.path().display(), "skipping entry with non UTF-8 name");
      None
    }
  }
}

/// Names of the non-hidden sub-directories of `dir`, sorted.
fn sub_dirs(dir: &Path) -> Result<Vec<String>> {
  let mut names = Vec::new();
  for entry in fs::read_dir(dir)? {
    let entry = entry?;
    let Some(name) = utf8_name(&entry) else {
      continue;
    };
    if !name.starts_with('.') && entry.file_type()?.is_dir() {
      names.push(name);
    }
  }
  names.sort();
  Ok(names)
}

/// Datasets stored in `dir`: files identified by extension and directories as bundles.
fn list_datasets(dir: &Path, multiplicity: Multiplicity, processed: bool) -> Result<Vec<Dataset>> {
  let mut datasets = Vec::new();
  for entry in fs::read_dir(dir)? {
    let entry = entry?;
    let Some(file_name) = utf8_name(&entry) else {
      continue;
    };
    if file_name.starts_with('.') {
      continue;
    }
    let identified = if entry.file_type()?.is_dir() {
      Some((DataFormat::DIRECTORY, file_name.as_str()))
    } else {
      DataFormat::identify(&file_name)
    };
    let Some((format, name)) = identified else {
      debug!(path = %entry.path().display(), "skipping file with unrecognised extension");
      continue;
    };
    let mut dataset = Dataset::new(name, format)
      .with_multiplicity(multiplicity)
      .with_path(entry.path());
    dataset.processed = processed;
    datasets.push(dataset);
  }
  datasets.sort_by(|a, b| a.name.cmp(&b.name));
  Ok(datasets)
}
