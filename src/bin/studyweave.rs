//! CLI: build the pipelines that derive a dataset of a built-in study and dry-run them.
//!
//! Validates every pipeline the dataset depends on, pairs each with archive source and
//! sink nodes, and prints the execution reports as JSON.
//!
//! Usage: `studyweave [OPTIONS] <study> <dataset>`
//! Example: studyweave --archive /data/archive --project MRH017 t2star qsm_summary
//!
//! Set RUST_LOG=studyweave=trace for TRACE-level span enter/exit and events.

use clap::Parser;
use std::collections::BTreeMap;
use std::env;
use std::fmt::Display;
use std::fs;
use std::path::{Path, PathBuf};
use std::process;
use studyweave::manifest_io::{manifest_path, save_manifest};
use studyweave::types::{OptionOverrides, Version};
use studyweave::{
  DryRunEngine, ExecutionPlan, LocalArchive, OptionValue, PipelineManifest, Study,
  run_pipeline_with, study_definition,
};
use tracing::info;
use tracing_subscriber::{EnvFilter, fmt::format::FmtSpan};

/// Build and dry-run the pipelines deriving a dataset of a built-in study.
#[derive(Parser, Debug)]
#[command(name = "studyweave")]
#[command(after_help = r#"Environment variables (override --archive and --study-name when set):
  STUDYWEAVE_ARCHIVE      Root directory of the local archive.
  STUDYWEAVE_STUDY_NAME   Name of the study instance, used to prefix derived products.

Examples:
  studyweave mri betted_T1
  studyweave --option bet_frac=0.3 --tool fsl=5.0.10 mri betted_T1
  studyweave --manifest-dir manifests t2star qsm_summary"#)]
struct Args {
  /// Root directory of the local archive. Overridden by STUDYWEAVE_ARCHIVE if set.
  #[arg(long, value_name = "DIR", default_value = ".")]
  archive: PathBuf,

  /// Study instance name. Overridden by STUDYWEAVE_STUDY_NAME if set. Default: the study type.
  #[arg(long, value_name = "NAME")]
  study_name: Option<String>,

  /// Project id within the archive.
  #[arg(long, value_name = "ID", default_value = "project")]
  project: String,

  /// Option override for the pipeline producing the dataset (repeatable).
  #[arg(long = "option", value_name = "KEY=VALUE")]
  options: Vec<String>,

  /// JSON object of study-level option values.
  #[arg(long, value_name = "FILE")]
  options_file: Option<PathBuf>,

  /// Installed tool version to check requirements against (repeatable).
  #[arg(long = "tool", value_name = "NAME=VERSION")]
  tools: Vec<String>,

  /// Directory to write one manifest per pipeline into.
  #[arg(long, value_name = "DIR")]
  manifest_dir: Option<PathBuf>,

  /// Built-in study type (mri, t2star, pet)
  #[arg(value_name = "study")]
  study: String,

  /// Dataset or field to derive
  #[arg(value_name = "dataset")]
  dataset: String,
}

fn fail(context: &str, err: impl Display) -> ! {
  eprintln!("{context}: {err}");
  process::exit(1);
}

fn split_pair<'a>(raw: &'a str, what: &str) -> (&'a str, &'a str) {
  raw
    .split_once('=')
    .unwrap_or_else(|| fail(&format!("Invalid {what} '{raw}'"), "expected KEY=VALUE"))
}

fn parse_overrides(raw: &[String]) -> OptionOverrides {
  raw
    .iter()
    .map(|r| {
      let (key, value) = split_pair(r, "option");
      (key.to_string(), OptionValue::parse_cli(value))
    })
    .collect()
}

fn parse_tools(raw: &[String]) -> BTreeMap<String, Version> {
  raw
    .iter()
    .map(|r| {
      let (name, version) = split_pair(r, "tool");
      let version = Version::find(version)
        .unwrap_or_else(|| fail(&format!("Invalid tool '{r}'"), "no version number found"));
      (name.to_string(), version)
    })
    .collect()
}

fn read_options_file(path: &Path) -> OptionOverrides {
  let text = fs::read_to_string(path)
    .unwrap_or_else(|e| fail(&format!("Error reading {}", path.display()), e));
  serde_json::from_str(&text)
    .unwrap_or_else(|e| fail(&format!("Error parsing {}", path.display()), e))
}

#[tokio::main]
async fn main() {
  tracing_subscriber::fmt()
    .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
    .with_span_events(FmtSpan::ENTER | FmtSpan::EXIT)
    .with_writer(std::io::stderr)
    .init();

  let args = Args::parse();

  let archive_root = env::var("STUDYWEAVE_ARCHIVE")
    .ok()
    .map(PathBuf::from)
    .unwrap_or_else(|| args.archive.clone());
  let study_name = env::var("STUDYWEAVE_STUDY_NAME")
    .ok()
    .or_else(|| args.study_name.clone())
    .unwrap_or_else(|| args.study.clone());
  info!(archive = %archive_root.display(), study_name = %study_name, "options (env or flags)");

  let overrides = parse_overrides(&args.options);
  let engine = if args.tools.is_empty() {
    DryRunEngine::new()
  } else {
    DryRunEngine::with_environment(parse_tools(&args.tools))
  };

  let definition =
    study_definition(&args.study).unwrap_or_else(|e| fail("Study error", e));
  let mut study = Study::new(study_name, definition, args.project.clone());
  if let Some(path) = &args.options_file {
    study = study
      .with_options(read_options_file(path))
      .unwrap_or_else(|e| fail("Option error", e));
  }

  let archive = LocalArchive::new(archive_root);
  let manifest_dir = args.manifest_dir.as_deref();
  let write_manifest = |plan: &ExecutionPlan| match manifest_dir {
    Some(dir) => save_manifest(
      &manifest_path(dir, plan.pipeline.name()),
      &PipelineManifest::from_pipeline(&plan.study, &plan.pipeline),
    ),
    None => Ok(()),
  };
  let reports = run_pipeline_with(
    &engine,
    &study,
    &args.dataset,
    &overrides,
    &archive,
    write_manifest,
  )
  .await
  .unwrap_or_else(|e| fail("Pipeline error", e));

  info!(dataset = %args.dataset, pipelines = reports.len(), "dry run completed");
  match serde_json::to_string_pretty(&reports) {
    Ok(json) => println!("{json}"),
    Err(e) => fail("Error serialising report", e),
  }
}
