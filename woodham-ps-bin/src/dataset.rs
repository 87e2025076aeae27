// SPDX-License-Identifier: MPL-2.0

//! Dataset loading: image files named `name_azimuth_polar.ext`.

use anyhow::Context;
use std::convert::TryFrom;
use std::path::{Path, PathBuf};
use thiserror::Error;

use woodham_ps_lib::interop::{self, IntoGrayMatrix};
use woodham_ps_lib::sample::LightSample;

/// Light angles encoded in an image file name, in degrees.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SampleName {
    pub azimuth: f64,
    pub polar: f64,
}

#[derive(Error, Debug)]
pub enum SampleNameError {
    #[error("File name is not valid unicode: {0:?}")]
    NotUnicode(PathBuf),
    #[error("File expected in the form \"name_azimuthalAngle_polarAngle.ext\" but got {0} parts")]
    WrongPartsCount(usize),
    #[error("Error parsing light angles")]
    Parse(#[from] std::num::ParseFloatError),
    #[error("Illegal azimuthal angle: {0} is not within [0, 360)")]
    IllegalAzimuth(f64),
    #[error("Illegal polar angle: {0} is not within [0, 90]")]
    IllegalPolar(f64),
}

impl TryFrom<&Path> for SampleName {
    type Error = SampleNameError;
    fn try_from(path: &Path) -> Result<Self, Self::Error> {
        let stem = path
            .file_stem()
            .and_then(|s| s.to_str())
            .ok_or_else(|| SampleNameError::NotUnicode(path.to_path_buf()))?;
        let parts: Vec<&str> = stem.split('_').collect();
        if parts.len() != 3 {
            return Err(SampleNameError::WrongPartsCount(parts.len()));
        }
        let azimuth: f64 = parts[1].parse()?;
        let polar: f64 = parts[2].parse()?;
        if !(0.0..360.0).contains(&azimuth) {
            return Err(SampleNameError::IllegalAzimuth(azimuth));
        }
        if !(0.0..=90.0).contains(&polar) {
            return Err(SampleNameError::IllegalPolar(polar));
        }
        Ok(SampleName { azimuth, polar })
    }
}

/// Expand the program free arguments into a sorted list of image files.
/// Directories are listed, anything else is treated as a glob pattern.
pub fn image_paths(args: &[String]) -> anyhow::Result<Vec<PathBuf>> {
    let mut paths = Vec::new();
    for arg in args {
        let path = Path::new(arg);
        if path.is_dir() {
            paths.append(&mut list_files(path)?);
        } else {
            let mut matches: Vec<PathBuf> = glob::glob(arg)
                .with_context(|| format!("Invalid pattern: {}", arg))?
                .filter_map(|p| p.ok())
                .filter(|p| p.is_file())
                .collect();
            paths.append(&mut matches);
        }
    }
    paths.sort();
    paths.dedup();
    Ok(paths)
}

/// Regular files directly inside `dir`.
fn list_files(dir: &Path) -> anyhow::Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for entry in std::fs::read_dir(dir).with_context(|| format!("Not a directory: {:?}", dir))? {
        let path = entry?.path();
        if path.is_file() {
            files.push(path);
        }
    }
    Ok(files)
}

/// Load all images into memory, in the given order.
pub fn load_dataset<P: AsRef<Path>>(paths: &[P]) -> anyhow::Result<Vec<LightSample>> {
    if paths.is_empty() {
        anyhow::bail!("There is no such image. Use --help to know how to use this tool.");
    }
    log::info!("Loading {} images ...", paths.len());
    let pb = indicatif::ProgressBar::new(paths.len() as u64);
    let mut dataset = Vec::with_capacity(paths.len());
    for path in paths {
        let path = path.as_ref();
        log::debug!("    {:?}", path);
        dataset.push(load_sample(path).with_context(|| format!("Cannot read {:?}", path))?);
        pb.inc(1);
    }
    pb.finish();
    Ok(dataset)
}

fn load_sample(path: &Path) -> anyhow::Result<LightSample> {
    let name = SampleName::try_from(path)?;
    let gray = image::open(path)?.into_gray_matrix();
    Ok(interop::light_sample_from_matrix(
        &gray,
        name.azimuth,
        name.polar,
    )?)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(name: &str) -> Result<SampleName, SampleNameError> {
        SampleName::try_from(Path::new(name))
    }

    #[test]
    fn parse_valid_name() {
        let name = parse("data/stone_45_30.5.png").unwrap();
        assert_eq!(
            name,
            SampleName {
                azimuth: 45.0,
                polar: 30.5
            }
        );
    }

    #[test]
    fn parse_wrong_number_of_parts() {
        assert!(matches!(
            parse("stone_45.png"),
            Err(SampleNameError::WrongPartsCount(2))
        ));
        assert!(matches!(
            parse("my_stone_45_30.png"),
            Err(SampleNameError::WrongPartsCount(4))
        ));
    }

    #[test]
    fn parse_invalid_numbers() {
        assert!(matches!(
            parse("stone_north_30.png"),
            Err(SampleNameError::Parse(_))
        ));
    }

    #[test]
    fn parse_out_of_range_angles() {
        assert!(matches!(
            parse("stone_360_30.png"),
            Err(SampleNameError::IllegalAzimuth(_))
        ));
        assert!(matches!(
            parse("stone_0_91.png"),
            Err(SampleNameError::IllegalPolar(_))
        ));
    }

    #[test]
    fn empty_dataset_is_an_error() {
        let paths: Vec<PathBuf> = Vec::new();
        assert!(load_dataset(&paths).is_err());
    }
}
