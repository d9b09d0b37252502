//! Opaque semantic format tags for datasets.
//!
//! The core never inspects file contents. A format only carries a name, used in manifests,
//! and the file extension the local archive uses to recognise dataset names on disk.

use std::fmt;

/// Semantic file/value type of a dataset (e.g. gzipped NIfTI volume, text matrix).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DataFormat {
  pub name: &'static str,
  /// File extension including the leading dot; `None` for directory bundles.
  pub extension: Option<&'static str>,
  pub directory: bool,
}

impl DataFormat {
  pub const NIFTI_GZ: DataFormat = DataFormat::file("nifti_gz", ".nii.gz");
  pub const NIFTI: DataFormat = DataFormat::file("nifti", ".nii");
  pub const MRTRIX: DataFormat = DataFormat::file("mrtrix", ".mif");
  pub const TEXT_MATRIX: DataFormat = DataFormat::file("text_matrix", ".mat");
  pub const TEXT: DataFormat = DataFormat::file("text", ".txt");
  pub const CSV: DataFormat = DataFormat::file("csv", ".csv");
  pub const ZIP: DataFormat = DataFormat::file("zip", ".zip");
  pub const DIRECTORY: DataFormat = DataFormat::directory("directory");
  pub const DICOM: DataFormat = DataFormat::directory("dicom");

  pub const ALL: [DataFormat; 9] = [
    DataFormat::NIFTI_GZ,
    DataFormat::NIFTI,
    DataFormat::MRTRIX,
    DataFormat::TEXT_MATRIX,
    DataFormat::TEXT,
    DataFormat::CSV,
    DataFormat::ZIP,
    DataFormat::DIRECTORY,
    DataFormat::DICOM,
  ];

  pub const fn file(name: &'static str, extension: &'static str) -> Self {
    Self {
      name,
      extension: Some(extension),
      directory: false,
    }
  }

  pub const fn directory(name: &'static str) -> Self {
    Self {
      name,
      extension: None,
      directory: true,
    }
  }

  pub fn by_name(name: &str) -> Option<Self> {
    Self::ALL.into_iter().find(|f| f.name == name)
  }

  /// Identifies a regular file by its extension, returning the format and the dataset name.
  ///
  /// The longest matching extension wins, so `t1.nii.gz` is `nifti_gz` named `t1`.
  pub fn identify(file_name: &str) -> Option<(Self, &str)> {
    Self::ALL
      .into_iter()
      .filter_map(|f| {
        let ext = f.extension?;
        let stem = file_name.strip_suffix(ext)?;
        (!stem.is_empty()).then_some((f, stem, ext.len()))
      })
      .max_by_key(|(_, _, len)| *len)
      .map(|(f, stem, _)| (f, stem))
  }

  /// File name the dataset `name` takes when stored in this format.
  pub fn file_name(&self, name: &str) -> String {
    match self.extension {
      Some(ext) => format!("{name}{ext}"),
      None => name.to_string(),
    }
  }
}

impl fmt::Display for DataFormat {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.name)
  }
}
