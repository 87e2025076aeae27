// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Calibrated photometric stereo (Woodham, 1980) with orientation correction.

use crate::calibration::Calibration;
use crate::correction::CorrectionTables;
use crate::error::{Error, Result};
use crate::linalg::Vector;
use crate::sample::{LightSample, NormalField};
use crate::scheduler::RowScheduler;

/// Configuration (parameters) of the photometric stereo algorithm.
#[derive(Debug, Clone, Copy, Default)]
pub struct Config {
    /// Strength of the orientation correction, in degrees at the image borders.
    pub correction_factor: f64,
    /// Number of worker threads, defaults to the hardware concurrency.
    pub threads: Option<usize>,
}

/// Compute the normal map from a sequence of images
/// with different lighting conditions.
///
/// Nothing is returned unless every pixel was solved.
pub fn photometric_stereo(config: Config, dataset: &[LightSample]) -> Result<NormalField> {
    let (width, height) = check_dataset(dataset)?;
    log::info!(
        "Dataset: {} images of {}x{} pixels",
        dataset.len(),
        width,
        height
    );

    // Everything shared by the workers is computed once, up front.
    let calibration = Calibration::from_samples(dataset)?;
    let corrections = CorrectionTables::new(width, height, config.correction_factor)?;
    let scheduler = RowScheduler::new(config.threads)?;
    log::info!("Calculating ... ({} threads)", scheduler.nb_threads());

    let obs = Obs {
        width,
        samples: dataset,
        calibration: &calibration,
        corrections: &corrections,
    };
    let rows = scheduler.map_rows(height, |y| obs.solve_row(y))?;

    let mut normals = Vec::with_capacity(width * height * 3);
    rows.into_iter().for_each(|row| normals.extend(row));
    NormalField::new(width, height, normals)
}

/// Check that the dataset can be reconstructed and return its (width, height).
pub fn check_dataset(dataset: &[LightSample]) -> Result<(usize, usize)> {
    let first = dataset.first().ok_or(Error::EmptyDataset)?;
    if dataset.len() < 3 {
        return Err(Error::NotEnoughSamples(dataset.len()));
    }
    let expected = first.dimensions();
    if let Some((index, sample)) = dataset
        .iter()
        .enumerate()
        .find(|(_, s)| s.dimensions() != expected)
    {
        return Err(Error::ImageSizeMismatch {
            index,
            expected,
            actual: sample.dimensions(),
        });
    }
    let (width, height) = expected;
    if width < 2 || height < 2 {
        return Err(Error::ImageTooSmall { width, height });
    }
    Ok(expected)
}

/// Normal of a single pixel from its intensities under each light,
/// in the same order as the rows of the calibration.
/// The raw normal is corrected for position (`x`, `y`) before normalization.
pub fn solve_pixel(
    calibration: &Calibration,
    corrections: &CorrectionTables,
    intensities: &Vector,
    x: usize,
    y: usize,
) -> Result<Vector> {
    let raw_normal = calibration.solve(intensities)?;
    corrections.apply(&raw_normal, x, y)?.normalize()
}

/// "Observations" contains the data shared by all row tasks.
/// These are immutable references since nobody is supposed to mutate them.
struct Obs<'a> {
    width: usize,
    samples: &'a [LightSample],
    calibration: &'a Calibration,
    corrections: &'a CorrectionTables,
}

impl<'a> Obs<'a> {
    /// Normals of row `y`, three components per pixel.
    fn solve_row(&self, y: usize) -> Result<Vec<f64>> {
        let mut row = Vec::with_capacity(self.width * 3);
        for x in 0..self.width {
            let intensities = Vector::new(self.samples.iter().map(|s| s.at(x, y)).collect());
            let normal = solve_pixel(self.calibration, self.corrections, &intensities, x, y)
                    .map_err(|source| Error::Pixel {
                    x,
                    y,
                    source: Box::new(source),
                })?;
            row.extend_from_slice(normal.as_slice());
        }
        Ok(row)
    }
}
