//! T2*-weighted study: quantitative susceptibility mapping (QSM) from multi-coil SWI.
//!
//! Extends the base MRI study. Brain extraction of the T1 is replaced by a bias-corrected
//! variant, and a per-project summary of regional QSM statistics is added.

use super::mri;
use crate::citations;
use crate::error::Result;
use crate::interface::{IdentityInterface, ToolInterface};
use crate::pipeline::{Pipeline, PipelineBuilder};
use crate::requirements;
use crate::study::{Study, StudyDefinition};
use crate::types::{
  DataFormat, DatasetSpec, Multiplicity, NodeHandle, OptionOverrides, OptionSpec,
  PipelineFactory,
};
use once_cell::sync::OnceCell;
use std::sync::Arc;

pub const SWI_COILS_PREPARATION: PipelineFactory =
  PipelineFactory::new("swi_coils_preparation", swi_coils_preparation_pipeline);
pub const BET_T1_BIAS_CORRECTED: PipelineFactory =
  PipelineFactory::new("bet_T1_bias_corrected", bet_t1_bias_corrected_pipeline);
pub const BET_T2S: PipelineFactory = PipelineFactory::new("bet_T2s", bet_t2s_pipeline);
pub const QSM: PipelineFactory = PipelineFactory::new("qsmrecon", qsm_pipeline);
pub const QSM_SUMMARY: PipelineFactory = PipelineFactory::new("qsm_summary", qsm_summary_pipeline);

static DEFINITION: OnceCell<Arc<StudyDefinition>> = OnceCell::new();

pub fn definition() -> Result<Arc<StudyDefinition>> {
  DEFINITION
    .get_or_try_init(|| {
      let parent = mri::definition()?;
      StudyDefinition::extend(&parent, "t2star")
        .add_data_specs([
          DatasetSpec::acquired("raw_coils", DataFormat::ZIP).with_description(
            "Reconstructed T2* complex image for each coil without standardisation",
          ),
          DatasetSpec::derived("t2s", DataFormat::NIFTI_GZ, SWI_COILS_PREPARATION),
          DatasetSpec::derived("betted_T1", DataFormat::NIFTI_GZ, BET_T1_BIAS_CORRECTED),
          DatasetSpec::derived("betted_T1_mask", DataFormat::NIFTI_GZ, BET_T1_BIAS_CORRECTED),
          DatasetSpec::derived("betted_T2s", DataFormat::NIFTI_GZ, BET_T2S),
          DatasetSpec::derived("betted_T2s_mask", DataFormat::NIFTI_GZ, BET_T2S),
          DatasetSpec::derived("qsm", DataFormat::NIFTI_GZ, QSM)
            .with_description("Quantitative susceptibility image resolved from T2* coil images"),
          DatasetSpec::derived("tissue_phase", DataFormat::NIFTI_GZ, QSM).with_description(
            "Phase map for each coil following unwrapping and background field removal",
          ),
          DatasetSpec::derived("tissue_mask", DataFormat::NIFTI_GZ, QSM)
            .with_description("Mask for each coil corresponding to areas of high magnitude"),
          DatasetSpec::derived("qsm_summary", DataFormat::CSV, QSM_SUMMARY)
            .with_multiplicity(Multiplicity::PerProject)
            .with_description("Mean and spread of QSM within the brain mask, per session"),
        ])
        .add_option_specs([
          OptionSpec::new("qsm_echo_times", vec![7.38, 22.14]),
          OptionSpec::new("qsm_num_channels", 32),
          OptionSpec::new(
            "swi_coils_filename",
            "T2swi3d_ axial_p2_0.9_iso_COSMOS_Straight_Coil",
          ),
          OptionSpec::new("qsm_mask_erosion", 6),
          OptionSpec::new("bet_t2s_frac", 0.1),
        ])
        .build()
    })
    .cloned()
}

/// Coil preparation node shared by the T2* and QSM pipelines.
fn add_prepare_node(pipeline: &mut PipelineBuilder) -> Result<NodeHandle> {
  let prepare = pipeline.create_node(
    ToolInterface::new("qsm.Prepare", "matlab").with_param("script", "Prepare_Raw_Channels"),
    "prepare",
    vec![requirements::matlab2015()],
    Some(16000),
    Some(30),
  )?;
  let echo_times = pipeline.option("qsm_echo_times")?;
  let num_channels = pipeline.option("qsm_num_channels")?;
  let base_filename = pipeline.option("swi_coils_filename")?;
  pipeline.set_input(&prepare, "echo_times", echo_times)?;
  pipeline.set_input(&prepare, "num_channels", num_channels)?;
  pipeline.set_input(&prepare, "base_filename", base_filename)?;
  pipeline.connect_input("raw_coils", &prepare, "in_dir")?;
  Ok(prepare)
}

fn swi_coils_preparation_pipeline(study: &Study, overrides: &OptionOverrides) -> Result<Pipeline> {
  let mut pipeline = study
    .create_pipeline(
      "swi_coils_preparation",
      &["raw_coils"],
      &["t2s"],
      "Combine raw coil images into a bias-corrected T2* image",
      overrides,
    )?
    .citation(citations::matlab())
    .citation(citations::ants());

  let prepare = add_prepare_node(&mut pipeline)?;
  let bias = pipeline.create_node(
    ToolInterface::new("ants.N4BiasFieldCorrection", "N4BiasFieldCorrection"),
    "n4_bias_correction",
    vec![requirements::ants2()],
    Some(12000),
    Some(60),
  )?;
  pipeline.connect(&prepare, "out_file", &bias, "input_image")?;
  pipeline.connect_output("t2s", &bias, "output_image")?;
  pipeline.assert_connected()
}

fn bet_t1_bias_corrected_pipeline(study: &Study, overrides: &OptionOverrides) -> Result<Pipeline> {
  let mut pipeline = study
    .create_pipeline(
      "bet_T1_bias_corrected",
      &["t1"],
      &["betted_T1", "betted_T1_mask"],
      "Bias field correction followed by brain extraction of the T1",
      overrides,
    )?
    .citation(citations::fsl())
    .citation(citations::ants());

  let bias = pipeline.create_node(
    ToolInterface::new("ants.N4BiasFieldCorrection", "N4BiasFieldCorrection"),
    "n4_bias_correction",
    vec![requirements::ants2()],
    Some(12000),
    Some(60),
  )?;
  pipeline.connect_input("t1", &bias, "input_image")?;

  let bet = pipeline.create_node(
    ToolInterface::new("fsl.BET", "bet")
      .with_param("reduce_bias", true)
      .with_param("mask", true),
    "bet",
    vec![requirements::fsl5()],
    Some(8000),
    Some(45),
  )?;
  let frac = pipeline.option("bet_frac")?;
  pipeline.set_input(&bet, "frac", frac)?;
  pipeline.connect(&bias, "output_image", &bet, "in_file")?;
  pipeline.connect_output("betted_T1", &bet, "out_file")?;
  pipeline.connect_output("betted_T1_mask", &bet, "mask_file")?;
  pipeline.assert_connected()
}

fn bet_t2s_pipeline(study: &Study, overrides: &OptionOverrides) -> Result<Pipeline> {
  let mut pipeline = study
    .create_pipeline(
      "bet_T2s",
      &["t2s"],
      &["betted_T2s", "betted_T2s_mask"],
      "Brain extraction of the T2* image",
      overrides,
    )?
    .citation(citations::fsl());

  let bet = pipeline.create_node(
    ToolInterface::new("fsl.BET", "bet").with_param("mask", true),
    "bet",
    vec![requirements::fsl5()],
    Some(8000),
    Some(45),
  )?;
  let frac = pipeline.option("bet_t2s_frac")?;
  pipeline.set_input(&bet, "frac", frac)?;
  pipeline.connect_input("t2s", &bet, "in_file")?;
  pipeline.connect_output("betted_T2s", &bet, "out_file")?;
  pipeline.connect_output("betted_T2s_mask", &bet, "mask_file")?;
  pipeline.assert_connected()
}

/// Resolves QSM from dual-echo coil data. Default echo times come from the STI Suite.
fn qsm_pipeline(study: &Study, overrides: &OptionOverrides) -> Result<Pipeline> {
  let mut pipeline = study
    .create_pipeline(
      "qsmrecon",
      &["raw_coils", "betted_T2s_mask"],
      &["qsm", "tissue_phase", "tissue_mask"],
      "Resolve QSM from T2* coils",
      overrides,
    )?
    .citation(citations::sti())
    .citation(citations::fsl())
    .citation(citations::matlab());

  let prepare = add_prepare_node(&mut pipeline)?;

  let erosion = pipeline.create_node(
    ToolInterface::new("fsl.ErodeImage", "fslmaths").with_param("kernel_shape", "sphere"),
    "mask_erosion",
    vec![requirements::fsl5()],
    Some(12000),
    Some(15),
  )?;
  let kernel_size = pipeline.option("qsm_mask_erosion")?;
  pipeline.set_input(&erosion, "kernel_size", kernel_size)?;
  pipeline.connect_input("betted_T2s_mask", &erosion, "in_file")?;

  let recon = pipeline.create_node(
    ToolInterface::new("qsm.STI", "matlab").with_param("script", "QSM"),
    "qsmrecon",
    vec![requirements::matlab2015(), requirements::sti()],
    Some(24000),
    Some(300),
  )?;
  let echo_times = pipeline.option("qsm_echo_times")?;
  let num_channels = pipeline.option("qsm_num_channels")?;
  pipeline.set_input(&recon, "echo_times", echo_times)?;
  pipeline.set_input(&recon, "num_channels", num_channels)?;
  pipeline.connect(&erosion, "out_file", &recon, "mask_file")?;
  pipeline.connect(&prepare, "out_dir", &recon, "in_dir")?;

  // scanner geometry is copied back onto each reconstructed image
  for (output, field, node_name) in [
    ("qsm", "qsm", "qsm_copy_geometry"),
    ("tissue_phase", "tissue_phase", "qsm_phase_copy_geometry"),
    ("tissue_mask", "tissue_mask", "qsm_mask_copy_geometry"),
  ] {
    let geom = pipeline.create_node(
      ToolInterface::new("fsl.CopyGeom", "fslcpgeom"),
      node_name,
      vec![requirements::fsl5()],
      Some(4000),
      Some(5),
    )?;
    pipeline.connect(&recon, field, &geom, "dest_file")?;
    pipeline.connect(&prepare, "out_file", &geom, "in_file")?;
    pipeline.connect_output(output, &geom, "out_file")?;
  }
  pipeline.assert_connected()
}

/// Per-session QSM statistics joined across subjects and visits into one project table.
fn qsm_summary_pipeline(study: &Study, overrides: &OptionOverrides) -> Result<Pipeline> {
  let mut pipeline = study
    .create_pipeline(
      "qsm_summary",
      &["qsm", "tissue_mask"],
      &["qsm_summary"],
      "Regional statistics of QSM images",
      overrides,
    )?
    .citation(citations::fsl());

  let mean = pipeline.create_node(
    ToolInterface::new("fsl.ImageStats", "fslstats").with_param("op_string", "-k %s -m"),
    "stats_mean",
    vec![requirements::fsl5()],
    Some(4000),
    Some(15),
  )?;
  let spread = pipeline.create_node(
    ToolInterface::new("fsl.ImageStats", "fslstats").with_param("op_string", "-k %s -s"),
    "stats_std",
    vec![requirements::fsl5()],
    Some(4000),
    Some(15),
  )?;
  for node in [&mean, &spread] {
    pipeline.connect_input("qsm", node, "in_file")?;
    pipeline.connect_input("tissue_mask", node, "mask_file")?;
  }

  let join = pipeline.create_node(
    IdentityInterface::new(["in_subject_id", "in_visit_id", "in_mean", "in_std"]),
    "join_sessions",
    vec![],
    Some(4000),
    Some(60),
  )?;
  pipeline.connect(&mean, "out_stat", &join, "in_mean")?;
  pipeline.connect(&spread, "out_stat", &join, "in_std")?;

  let summarise = pipeline.create_node(
    ToolInterface::new("qsm.QSMSummary", "qsm_summary"),
    "summarise_qsm",
    vec![],
    Some(4000),
    Some(60),
  )?;
  pipeline.set_input(&summarise, "in_field_names", vec!["mean", "std"])?;
  for field in ["in_subject_id", "in_visit_id", "in_mean", "in_std"] {
    pipeline.connect(&join, field, &summarise, field)?;
  }
  pipeline.connect_output("qsm_summary", &summarise, "out_file")?;
  pipeline.assert_connected()
}
