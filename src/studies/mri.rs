//! Base MRI study: a T1-weighted acquisition and its brain extraction.

use crate::citations;
use crate::error::Result;
use crate::interface::ToolInterface;
use crate::pipeline::Pipeline;
use crate::requirements;
use crate::study::{Study, StudyDefinition};
use crate::types::{DataFormat, DatasetSpec, OptionOverrides, OptionSpec, PipelineFactory};
use once_cell::sync::OnceCell;
use std::sync::Arc;

pub const BET_T1: PipelineFactory = PipelineFactory::new("bet_T1", bet_t1_pipeline);

static DEFINITION: OnceCell<Arc<StudyDefinition>> = OnceCell::new();

pub fn definition() -> Result<Arc<StudyDefinition>> {
  DEFINITION
    .get_or_try_init(|| {
      StudyDefinition::builder("mri")
        .add_data_specs([
          DatasetSpec::acquired("t1", DataFormat::NIFTI_GZ)
            .with_description("T1-weighted structural acquisition"),
          DatasetSpec::derived("betted_T1", DataFormat::NIFTI_GZ, BET_T1),
          DatasetSpec::derived("betted_T1_mask", DataFormat::NIFTI_GZ, BET_T1),
        ])
        .add_option_specs([
          OptionSpec::new("bet_frac", 0.15)
            .with_description("Fractional intensity threshold for brain extraction"),
          OptionSpec::new("bet_robust", false),
        ])
        .build()
    })
    .cloned()
}

fn bet_t1_pipeline(study: &Study, overrides: &OptionOverrides) -> Result<Pipeline> {
  let mut pipeline = study
    .create_pipeline(
      "bet_T1",
      &["t1"],
      &["betted_T1", "betted_T1_mask"],
      "Brain extraction of the T1-weighted image with FSL BET",
      overrides,
    )?
    .citation(citations::fsl())
    .citation(citations::bet());

  let bet = pipeline.create_node(
    ToolInterface::new("fsl.BET", "bet").with_param("mask", true),
    "bet",
    vec![requirements::fsl5()],
    Some(8000),
    Some(45),
  )?;
  let frac = pipeline.option("bet_frac")?;
  let robust = pipeline.option("bet_robust")?;
  pipeline.set_input(&bet, "frac", frac)?;
  pipeline.set_input(&bet, "robust", robust)?;
  pipeline.connect_input("t1", &bet, "in_file")?;
  pipeline.connect_output("betted_T1", &bet, "out_file")?;
  pipeline.connect_output("betted_T1_mask", &bet, "mask_file")?;
  pipeline.assert_connected()
}
