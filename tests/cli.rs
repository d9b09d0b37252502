//! Integration tests that run the studyweave CLI binary.

use std::process::{Command, Output};

fn run_studyweave(args: &[&str]) -> Output {
  run_studyweave_with_env(args, &[])
}

/// Run the binary with extra env vars. Each pair is (key, value).
fn run_studyweave_with_env(args: &[&str], env: &[(&str, &str)]) -> Output {
  let mut cmd = Command::new(env!("CARGO_BIN_EXE_studyweave"));
  cmd.args(args).env_remove("STUDYWEAVE_ARCHIVE").env_remove("STUDYWEAVE_STUDY_NAME");
  for (k, v) in env {
    cmd.env(k, v);
  }
  cmd.output().expect("run studyweave")
}

fn reports(out: &Output) -> Vec<serde_json::Value> {
  serde_json::from_slice(&out.stdout).expect("stdout is a JSON array of reports")
}

#[test]
fn prints_usage_without_args() {
  let out = run_studyweave(&[]);
  assert!(!out.status.success());
  let stderr = String::from_utf8_lossy(&out.stderr);
  assert!(stderr.contains("Usage") || stderr.contains("usage"));
}

#[test]
fn dry_runs_brain_extraction() {
  let out = run_studyweave(&["mri", "betted_T1"]);
  assert!(out.status.success(), "stderr: {}", String::from_utf8_lossy(&out.stderr));
  let reports = reports(&out);
  assert_eq!(reports.len(), 1);
  assert_eq!(reports[0]["pipeline"], "bet_T1");
  assert_eq!(reports[0]["study"], "mri");
  assert_eq!(reports[0]["dry_run"], true);
  assert_eq!(reports[0]["nodes"][0]["name"], "bet");
  assert_eq!(reports[0]["nodes"][0]["status"], "planned");
}

#[test]
fn dependencies_are_reported_in_order() {
  let out = run_studyweave_with_env(
    &["t2star", "qsm_summary"],
    &[("STUDYWEAVE_STUDY_NAME", "qsm_run")],
  );
  assert!(out.status.success(), "stderr: {}", String::from_utf8_lossy(&out.stderr));
  let names: Vec<String> = reports(&out)
    .iter()
    .map(|r| r["pipeline"].as_str().unwrap().to_string())
    .collect();
  assert_eq!(
    names,
    vec!["swi_coils_preparation", "bet_T2s", "qsmrecon", "qsm_summary"]
  );
  assert!(reports(&out).iter().all(|r| r["study"] == "qsm_run"));
}

#[test]
fn exits_1_for_unknown_study() {
  let out = run_studyweave(&["dwi", "fa"]);
  assert_eq!(out.status.code(), Some(1));
  let stderr = String::from_utf8_lossy(&out.stderr);
  assert!(stderr.contains("unknown study 'dwi'") || stderr.contains("dwi"), "stderr: {stderr}");
}

#[test]
fn exits_1_for_undeclared_option() {
  let out = run_studyweave(&["--option", "no_such_option=1", "mri", "betted_T1"]);
  assert_eq!(out.status.code(), Some(1));
  let stderr = String::from_utf8_lossy(&out.stderr);
  assert!(stderr.contains("no_such_option"), "stderr: {stderr}");
}

#[test]
fn exits_1_when_tool_version_is_unsatisfied() {
  let out = run_studyweave(&["--tool", "fsl=6.0.4", "mri", "betted_T1"]);
  assert_eq!(out.status.code(), Some(1));
  let stderr = String::from_utf8_lossy(&out.stderr);
  assert!(stderr.contains("fsl"), "stderr: {stderr}");
}

#[test]
fn writes_manifests_when_requested() {
  let dir = tempfile::tempdir().expect("temp dir");
  let manifests = dir.path().join("manifests");
  let out = run_studyweave(&[
    "--manifest-dir",
    manifests.to_str().unwrap(),
    "--option",
    "bet_frac=0.3",
    "mri",
    "betted_T1",
  ]);
  assert!(out.status.success(), "stderr: {}", String::from_utf8_lossy(&out.stderr));
  let text = std::fs::read_to_string(manifests.join("bet_T1.manifest.json")).unwrap();
  let manifest: serde_json::Value = serde_json::from_str(&text).unwrap();
  assert_eq!(manifest["pipeline"], "bet_T1");
  assert_eq!(manifest["options"]["bet_frac"], 0.3);
}

#[test]
fn options_file_sets_study_level_values() {
  let dir = tempfile::tempdir().expect("temp dir");
  let path = dir.path().join("options.json");
  std::fs::write(&path, r#"{"bet_robust": true}"#).unwrap();
  let manifests = dir.path().join("manifests");
  let out = run_studyweave(&[
    "--options-file",
    path.to_str().unwrap(),
    "--manifest-dir",
    manifests.to_str().unwrap(),
    "mri",
    "betted_T1",
  ]);
  assert!(out.status.success(), "stderr: {}", String::from_utf8_lossy(&out.stderr));
  let text = std::fs::read_to_string(manifests.join("bet_T1.manifest.json")).unwrap();
  let manifest: serde_json::Value = serde_json::from_str(&text).unwrap();
  assert_eq!(manifest["options"]["bet_robust"], true);
}
