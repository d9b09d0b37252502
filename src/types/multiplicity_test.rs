//! Tests for `Multiplicity`.

use super::Multiplicity;
use crate::error::StudyError;

#[test]
fn display_names() {
  assert_eq!(Multiplicity::PerSession.to_string(), "per_session");
  assert_eq!(Multiplicity::PerSubject.to_string(), "per_subject");
  assert_eq!(Multiplicity::PerVisit.to_string(), "per_visit");
  assert_eq!(Multiplicity::PerProject.to_string(), "per_project");
}

#[test]
fn default_is_per_session() {
  assert_eq!(Multiplicity::default(), Multiplicity::PerSession);
}

#[test]
fn from_prefix_accepts_suffixed_names() {
  assert_eq!(
    Multiplicity::from_prefix("per_subject_group"),
    Some(Multiplicity::PerSubject)
  );
  assert_eq!(
    Multiplicity::from_prefix("per_project"),
    Some(Multiplicity::PerProject)
  );
  assert_eq!(Multiplicity::from_prefix("session"), None);
}

#[test]
fn parse_unknown_lists_options() {
  let err = "per_unknown".parse::<Multiplicity>().unwrap_err();
  match &err {
    StudyError::UnrecognisedMultiplicity {
      multiplicity,
      options,
    } => {
      assert_eq!(multiplicity, "per_unknown");
      assert_eq!(options.len(), 4);
    }
    other => panic!("unexpected error {other:?}"),
  }
  let msg = err.to_string();
  assert!(msg.contains("per_session', 'per_subject', 'per_visit', 'per_project"));
}

#[test]
fn serde_uses_snake_case() {
  let json = serde_json::to_string(&Multiplicity::PerVisit).unwrap();
  assert_eq!(json, "\"per_visit\"");
  let back: Multiplicity = serde_json::from_str("\"per_project\"").unwrap();
  assert_eq!(back, Multiplicity::PerProject);
}
