//! PET study: reconstruction preparation, field-of-view cropping, ICA and normalisation.

use crate::citations;
use crate::error::Result;
use crate::interface::{FunctionInterface, ToolInterface};
use crate::pipeline::Pipeline;
use crate::requirements;
use crate::study::{Study, StudyDefinition};
use crate::types::{
  DataFormat, DatasetSpec, FieldSpec, FieldType, OptionOverrides, OptionSpec, PipelineFactory,
};
use once_cell::sync::OnceCell;
use std::sync::Arc;

pub const ICA: PipelineFactory = PipelineFactory::new("ICA", ica_pipeline);
pub const IMAGE_NORMALIZATION: PipelineFactory =
  PipelineFactory::new("Image_registration", image_normalization_pipeline);
pub const DATA_PREPARATION: PipelineFactory =
  PipelineFactory::new("pet_data_preparation", data_preparation_pipeline);
pub const TIME_INFO_EXTRACTION: PipelineFactory =
  PipelineFactory::new("pet_info_extraction", time_info_extraction_pipeline);
pub const FOV_CROPPING: PipelineFactory =
  PipelineFactory::new("pet_fov_cropping", fov_cropping_pipeline);

static DEFINITION: OnceCell<Arc<StudyDefinition>> = OnceCell::new();

pub fn definition() -> Result<Arc<StudyDefinition>> {
  DEFINITION
    .get_or_try_init(|| {
      StudyDefinition::builder("pet")
        .add_data_specs([
          DatasetSpec::acquired("registered_volumes", DataFormat::NIFTI_GZ),
          DatasetSpec::acquired("pet_image", DataFormat::NIFTI_GZ),
          DatasetSpec::acquired("pet_data_dir", DataFormat::DIRECTORY),
          DatasetSpec::acquired("pet_recon_dir", DataFormat::DIRECTORY),
          DatasetSpec::acquired("pet2crop", DataFormat::DIRECTORY),
          DatasetSpec::derived("pet_recon_dir_prepared", DataFormat::DIRECTORY, DATA_PREPARATION),
          DatasetSpec::derived("pet_data_cropped", DataFormat::DIRECTORY, FOV_CROPPING),
          DatasetSpec::derived("decomposed_file", DataFormat::NIFTI_GZ, ICA),
          DatasetSpec::derived("timeseries", DataFormat::NIFTI_GZ, ICA),
          DatasetSpec::derived("mixing_mat", DataFormat::TEXT, ICA),
          DatasetSpec::derived("registered_volume", DataFormat::NIFTI_GZ, IMAGE_NORMALIZATION),
          DatasetSpec::derived("warp_file", DataFormat::NIFTI_GZ, IMAGE_NORMALIZATION),
          DatasetSpec::derived("invwarp_file", DataFormat::NIFTI_GZ, IMAGE_NORMALIZATION),
          DatasetSpec::derived("affine_mat", DataFormat::TEXT_MATRIX, IMAGE_NORMALIZATION),
        ])
        .add_data_specs([
          FieldSpec::derived("pet_duration", FieldType::Int, TIME_INFO_EXTRACTION),
          FieldSpec::derived("pet_end_time", FieldType::Str, TIME_INFO_EXTRACTION),
          FieldSpec::derived("pet_start_time", FieldType::Str, TIME_INFO_EXTRACTION),
        ])
        .add_option_specs([
          OptionSpec::new("ica_n_components", 2),
          OptionSpec::new("ica_type", "spatial"),
          OptionSpec::new("norm_transformation", "s"),
          OptionSpec::new("norm_dim", 3),
          OptionSpec::new("norm_template", "reference_data/PET_template.nii.gz"),
          OptionSpec::new("crop_xmin", 100),
          OptionSpec::new("crop_xsize", 130),
          OptionSpec::new("crop_ymin", 100),
          OptionSpec::new("crop_ysize", 130),
          OptionSpec::new("crop_zmin", 20),
          OptionSpec::new("crop_zsize", 100),
          OptionSpec::new("image_orientation_check", false),
        ])
        .build()
    })
    .cloned()
}

fn ica_pipeline(study: &Study, overrides: &OptionOverrides) -> Result<Pipeline> {
  let mut pipeline = study
    .create_pipeline(
      "ICA",
      &["registered_volumes"],
      &["decomposed_file", "timeseries", "mixing_mat"],
      "Decompose a 4D dataset into a set of independent components using FastICA",
      overrides,
    )?
    .citation(citations::fastica());

  let ica = pipeline.create_node(FunctionInterface::new("sklearn.FastICA"), "ICA", vec![], None, None)?;
  let n_components = pipeline.option("ica_n_components")?;
  let ica_type = pipeline.option("ica_type")?;
  pipeline.set_input(&ica, "n_components", n_components)?;
  pipeline.set_input(&ica, "ica_type", ica_type)?;
  pipeline.connect_input("registered_volumes", &ica, "volume")?;
  pipeline.connect_output("decomposed_file", &ica, "ica_decomposition")?;
  pipeline.connect_output("timeseries", &ica, "ica_timeseries")?;
  pipeline.connect_output("mixing_mat", &ica, "mixing_mat")?;
  pipeline.assert_connected()
}

fn image_normalization_pipeline(study: &Study, overrides: &OptionOverrides) -> Result<Pipeline> {
  let mut pipeline = study
    .create_pipeline(
      "Image_registration",
      &["pet_image"],
      &["registered_volume", "warp_file", "invwarp_file", "affine_mat"],
      "Image registration to a template using ANTs",
      overrides,
    )?
    .citation(citations::ants());

  let reg = pipeline.create_node(
    ToolInterface::new("ants.AntsRegSyn", "antsRegistrationSyN.sh")
      .with_param("out_prefix", "vol2template"),
    "ANTs",
    vec![requirements::ants2()],
    None,
    None,
  )?;
  for (option, field) in [
    ("norm_dim", "num_dimensions"),
    ("norm_transformation", "transformation"),
    ("norm_template", "ref_file"),
  ] {
    let value = pipeline.option(option)?;
    pipeline.set_input(&reg, field, value)?;
  }
  pipeline.connect_input("pet_image", &reg, "input_file")?;
  pipeline.connect_output("registered_volume", &reg, "reg_file")?;
  pipeline.connect_output("warp_file", &reg, "warp_file")?;
  pipeline.connect_output("invwarp_file", &reg, "inv_warp")?;
  pipeline.connect_output("affine_mat", &reg, "regmat")?;
  pipeline.assert_connected()
}

fn data_preparation_pipeline(study: &Study, overrides: &OptionOverrides) -> Result<Pipeline> {
  let mut pipeline = study.create_pipeline(
    "pet_data_preparation",
    &["pet_recon_dir"],
    &["pet_recon_dir_prepared"],
    "Prepare a folder of reconstructed PET data for motion correction",
    overrides,
  )?;

  let prep = pipeline.create_node(
    FunctionInterface::new("pet.PreparePetDir"),
    "prepare_pet",
    vec![requirements::mrtrix3()],
    None,
    None,
  )?;
  let check = pipeline.option("image_orientation_check")?;
  pipeline.set_input(&prep, "image_orientation_check", check)?;
  pipeline.connect_input("pet_recon_dir", &prep, "pet_dir")?;
  pipeline.connect_output("pet_recon_dir_prepared", &prep, "pet_recon_dir_prepared")?;
  pipeline.assert_connected()
}

fn time_info_extraction_pipeline(study: &Study, overrides: &OptionOverrides) -> Result<Pipeline> {
  let mut pipeline = study.create_pipeline(
    "pet_info_extraction",
    &["pet_data_dir"],
    &["pet_end_time", "pet_start_time", "pet_duration"],
    "Extract PET time info from the list-mode header",
    overrides,
  )?;

  let time_info = pipeline.create_node(
    FunctionInterface::new("dicom.PetTimeInfo"),
    "PET_time_info",
    vec![],
    None,
    None,
  )?;
  pipeline.connect_input("pet_data_dir", &time_info, "pet_data_dir")?;
  for field in ["pet_end_time", "pet_start_time", "pet_duration"] {
    pipeline.connect_output(field, &time_info, field)?;
  }
  pipeline.assert_connected()
}

/// Crops the field of view of every image in the input directory.
fn fov_cropping_pipeline(study: &Study, overrides: &OptionOverrides) -> Result<Pipeline> {
  let mut pipeline = study.create_pipeline(
    "pet_fov_cropping",
    &["pet2crop"],
    &["pet_data_cropped"],
    "Crop the PET field of view of a folder of reconstructed images",
    overrides,
  )?;

  let list_dir = pipeline.create_node(FunctionInterface::new("utility.ListDir"), "list_pet_dir", vec![], None, None)?;
  pipeline.connect_input("pet2crop", &list_dir, "directory")?;

  let cropping = pipeline.create_map_node(
    FunctionInterface::new("pet.PETFovCropping"),
    "cropping",
    vec!["pet_image".to_string()],
    vec![requirements::fsl5()],
    None,
    None,
  )?;
  for (option, field) in [
    ("crop_xmin", "x_min"),
    ("crop_xsize", "x_size"),
    ("crop_ymin", "y_min"),
    ("crop_ysize", "y_size"),
    ("crop_zmin", "z_min"),
    ("crop_zsize", "z_size"),
  ] {
    let value = pipeline.option(option)?;
    pipeline.set_input(&cropping, field, value)?;
  }
  pipeline.connect(&list_dir, "files", &cropping, "pet_image")?;

  let copy = pipeline.create_node(FunctionInterface::new("utility.CopyToDir"), "copy2dir", vec![], None, None)?;
  pipeline.connect(&cropping, "pet_cropped", &copy, "in_files")?;
  pipeline.connect_output("pet_data_cropped", &copy, "out_dir")?;
  pipeline.assert_connected()
}
