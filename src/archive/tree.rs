//! Read-only views of an archive project, built per query.
//!
//! Sessions are shared between the subject and the visit they belong to. Instead of back
//! references, a session's subject and visit are looked up through the [Project].

use crate::types::{DataFormat, Multiplicity};
use std::collections::BTreeMap;
use std::path::PathBuf;
use std::sync::Arc;

/// A dataset found in the archive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dataset {
  pub name: String,
  pub format: DataFormat,
  pub multiplicity: Multiplicity,
  /// True if the dataset was written by a pipeline rather than acquired.
  pub processed: bool,
  pub path: Option<PathBuf>,
}

impl Dataset {
  pub fn new(name: impl Into<String>, format: DataFormat) -> Self {
    Self {
      name: name.into(),
      format,
      multiplicity: Multiplicity::PerSession,
      processed: false,
      path: None,
    }
  }

  pub fn with_multiplicity(mut self, multiplicity: Multiplicity) -> Self {
    self.multiplicity = multiplicity;
    self
  }

  pub fn processed(mut self) -> Self {
    self.processed = true;
    self
  }

  pub fn with_path(mut self, path: impl Into<PathBuf>) -> Self {
    self.path = Some(path.into());
    self
  }
}

/// Datasets of one subject at one visit, plus an optional session of derived datasets.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
  subject_id: String,
  visit_id: String,
  datasets: Vec<Dataset>,
  processed: Option<Box<Session>>,
}

impl Session {
  pub fn new(
    subject_id: impl Into<String>,
    visit_id: impl Into<String>,
    datasets: Vec<Dataset>,
  ) -> Self {
    Self {
      subject_id: subject_id.into(),
      visit_id: visit_id.into(),
      datasets,
      processed: None,
    }
  }

  /// Attaches the session holding datasets derived from this one.
  pub fn with_processed(mut self, processed: Session) -> Self {
    self.processed = Some(Box::new(processed));
    self
  }

  pub fn subject_id(&self) -> &str {
    &self.subject_id
  }

  pub fn visit_id(&self) -> &str {
    &self.visit_id
  }

  pub fn processed(&self) -> Option<&Session> {
    self.processed.as_deref()
  }

  /// True when no separate processed session is attached, i.e. the datasets here are all
  /// that was found for the session.
  pub fn acquired(&self) -> bool {
    self.processed.is_none()
  }

  pub fn datasets(&self) -> &[Dataset] {
    &self.datasets
  }

  pub fn dataset_names(&self) -> impl Iterator<Item = &str> {
    self.datasets.iter().map(|d| d.name.as_str())
  }

  /// Names in the processed session if there is one, otherwise this session's names.
  pub fn processed_dataset_names(&self) -> impl Iterator<Item = &str> {
    self
      .processed
      .as_deref()
      .unwrap_or(self)
      .datasets
      .iter()
      .map(|d| d.name.as_str())
  }

  pub fn all_dataset_names(&self) -> impl Iterator<Item = &str> {
    self.dataset_names().chain(self.processed_dataset_names())
  }
}

/// A subject with its sessions and per-subject datasets.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Subject {
  id: String,
  sessions: Vec<Arc<Session>>,
  datasets: Vec<Dataset>,
}

impl Subject {
  pub fn new(id: impl Into<String>, sessions: Vec<Arc<Session>>, datasets: Vec<Dataset>) -> Self {
    Self {
      id: id.into(),
      sessions,
      datasets,
    }
  }

  pub fn id(&self) -> &str {
    &self.id
  }

  pub fn sessions(&self) -> impl Iterator<Item = &Session> {
    self.sessions.iter().map(Arc::as_ref)
  }

  pub fn datasets(&self) -> &[Dataset] {
    &self.datasets
  }

  pub fn dataset_names(&self) -> impl Iterator<Item = &str> {
    self.datasets.iter().map(|d| d.name.as_str())
  }
}

/// A visit with its sessions across subjects and per-visit datasets.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Visit {
  id: String,
  sessions: Vec<Arc<Session>>,
  datasets: Vec<Dataset>,
}

impl Visit {
  pub fn new(id: impl Into<String>, sessions: Vec<Arc<Session>>, datasets: Vec<Dataset>) -> Self {
    Self {
      id: id.into(),
      sessions,
      datasets,
    }
  }

  pub fn id(&self) -> &str {
    &self.id
  }

  pub fn sessions(&self) -> impl Iterator<Item = &Session> {
    self.sessions.iter().map(Arc::as_ref)
  }

  pub fn datasets(&self) -> &[Dataset] {
    &self.datasets
  }

  pub fn dataset_names(&self) -> impl Iterator<Item = &str> {
    self.datasets.iter().map(|d| d.name.as_str())
  }
}

/// Subjects, visits and project-level datasets of one archive project.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Project {
  id: String,
  subjects: Vec<Subject>,
  visits: Vec<Visit>,
  datasets: Vec<Dataset>,
}

impl Project {
  pub fn new(
    id: impl Into<String>,
    subjects: Vec<Subject>,
    visits: Vec<Visit>,
    datasets: Vec<Dataset>,
  ) -> Self {
    Self {
      id: id.into(),
      subjects,
      visits,
      datasets,
    }
  }

  /// Groups sessions into subjects and visits, ordered by id.
  ///
  /// Summary datasets are keyed by subject id and visit id; ids with summaries but no
  /// sessions still get a subject or visit.
  pub fn from_sessions(
    id: impl Into<String>,
    sessions: Vec<Session>,
    mut subject_datasets: BTreeMap<String, Vec<Dataset>>,
    mut visit_datasets: BTreeMap<String, Vec<Dataset>>,
    datasets: Vec<Dataset>,
  ) -> Self {
    let mut by_subject: BTreeMap<String, Vec<Arc<Session>>> = BTreeMap::new();
    let mut by_visit: BTreeMap<String, Vec<Arc<Session>>> = BTreeMap::new();
    for session in sessions.into_iter().map(Arc::new) {
      by_subject
        .entry(session.subject_id.clone())
        .or_default()
        .push(Arc::clone(&session));
      by_visit
        .entry(session.visit_id.clone())
        .or_default()
        .push(session);
    }
    for key in subject_datasets.keys() {
      by_subject.entry(key.clone()).or_default();
    }
    for key in visit_datasets.keys() {
      by_visit.entry(key.clone()).or_default();
    }

    let subjects = by_subject
      .into_iter()
      .map(|(sid, sessions)| {
        let datasets = subject_datasets.remove(&sid).unwrap_or_default();
        Subject::new(sid, sessions, datasets)
      })
      .collect();
    let visits = by_visit
      .into_iter()
      .map(|(vid, sessions)| {
        let datasets = visit_datasets.remove(&vid).unwrap_or_default();
        Visit::new(vid, sessions, datasets)
      })
      .collect();
    Self::new(id, subjects, visits, datasets)
  }

  pub fn id(&self) -> &str {
    &self.id
  }

  pub fn subjects(&self) -> impl Iterator<Item = &Subject> {
    self.subjects.iter()
  }

  pub fn visits(&self) -> impl Iterator<Item = &Visit> {
    self.visits.iter()
  }

  pub fn datasets(&self) -> &[Dataset] {
    &self.datasets
  }

  pub fn dataset_names(&self) -> impl Iterator<Item = &str> {
    self.datasets.iter().map(|d| d.name.as_str())
  }

  pub fn subject(&self, id: &str) -> Option<&Subject> {
    self.subjects.iter().find(|s| s.id == id)
  }

  pub fn visit(&self, id: &str) -> Option<&Visit> {
    self.visits.iter().find(|v| v.id == id)
  }

  /// Every session, subject by subject.
  pub fn sessions(&self) -> impl Iterator<Item = &Session> {
    self.subjects.iter().flat_map(Subject::sessions)
  }

  pub fn subject_of(&self, session: &Session) -> Option<&Subject> {
    self.subject(&session.subject_id)
  }

  pub fn visit_of(&self, session: &Session) -> Option<&Visit> {
    self.visit(&session.visit_id)
  }
}
