//! References for the tools wrapped by the built-in studies.

use crate::types::Citation;

fn cite(
  key: &str,
  authors: &[&str],
  title: &str,
  journal: Option<&str>,
  year: u16,
  doi: Option<&str>,
) -> Citation {
  Citation {
    key: key.to_string(),
    authors: authors.iter().map(|a| a.to_string()).collect(),
    title: title.to_string(),
    journal: journal.map(str::to_string),
    year,
    doi: doi.map(str::to_string),
  }
}

pub fn fsl() -> Citation {
  cite(
    "fsl",
    &["Jenkinson M", "Beckmann CF", "Behrens TE", "Woolrich MW", "Smith SM"],
    "FSL",
    Some("NeuroImage"),
    2012,
    Some("10.1016/j.neuroimage.2011.09.015"),
  )
}

pub fn bet() -> Citation {
  cite(
    "bet",
    &["Smith SM"],
    "Fast robust automated brain extraction",
    Some("Human Brain Mapping"),
    2002,
    Some("10.1002/hbm.10062"),
  )
}

pub fn ants() -> Citation {
  cite(
    "ants",
    &["Avants BB", "Tustison NJ", "Song G", "Cook PA", "Klein A", "Gee JC"],
    "A reproducible evaluation of ANTs similarity metric performance in brain image registration",
    Some("NeuroImage"),
    2011,
    Some("10.1016/j.neuroimage.2010.09.025"),
  )
}

pub fn mrtrix() -> Citation {
  cite(
    "mrtrix",
    &["Tournier JD", "Calamante F", "Connelly A"],
    "MRtrix: Diffusion tractography in crossing fiber regions",
    Some("International Journal of Imaging Systems and Technology"),
    2012,
    Some("10.1002/ima.22005"),
  )
}

pub fn spm() -> Citation {
  cite(
    "spm",
    &["Friston KJ", "Ashburner JT", "Kiebel SJ", "Nichols TE", "Penny WD"],
    "Statistical Parametric Mapping: The Analysis of Functional Brain Images",
    None,
    2007,
    None,
  )
}

pub fn matlab() -> Citation {
  cite("matlab", &["The MathWorks Inc."], "MATLAB", None, 2015, None)
}

pub fn sti() -> Citation {
  cite(
    "sti",
    &["Li W", "Wu B", "Liu C"],
    "Quantitative susceptibility mapping of human brain reflects spatial variation in tissue composition",
    Some("NeuroImage"),
    2011,
    Some("10.1016/j.neuroimage.2010.11.088"),
  )
}

pub fn fastica() -> Citation {
  cite(
    "fastica",
    &["Hyvarinen A", "Oja E"],
    "Independent component analysis: algorithms and applications",
    Some("Neural Networks"),
    2000,
    Some("10.1016/S0893-6080(00)00026-5"),
  )
}
