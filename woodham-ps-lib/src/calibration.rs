// SPDX-License-Identifier: MPL-2.0

//! Light calibration: the least-squares operator shared by every pixel.

use crate::error::{Error, Result};
use crate::linalg::{Matrix, Vector};
use crate::sample::LightSample;

/// Lights directions matrix `L` (one row per image) and its pseudo-inverse.
#[derive(Debug, Clone)]
pub struct Calibration {
    lights: Matrix,         // L : nb_imgs x 3
    pseudo_inverse: Matrix, // (Lt L)^-1 Lt : 3 x nb_imgs
}

impl Calibration {
    /// Build the calibration from the samples, in dataset order.
    pub fn from_samples(samples: &[LightSample]) -> Result<Self> {
        let directions: Vec<Vector> = samples
            .iter()
            .map(LightSample::illumination_direction)
            .collect();
        Self::from_directions(&directions)
    }

    /// Build the calibration from unit illumination directions.
    ///
    /// Fails if there are less than three directions or if they do not
    /// span the whole space, in which case `Lt L` is singular.
    pub fn from_directions(directions: &[Vector]) -> Result<Self> {
        if directions.len() < 3 {
            return Err(Error::NotEnoughSamples(directions.len()));
        }
        if let Some(bad) = directions.iter().find(|d| d.len() != 3) {
            return Err(Error::DimensionMismatch {
                operation: "illumination direction",
                lhs: (3, 1),
                rhs: (bad.len(), 1),
            });
        }
        let lights = Matrix::from_rows(directions)?;
        let lights_t = lights.transpose();
        let pseudo_inverse = lights_t.multiply(&lights)?.inverse()?.multiply(&lights_t)?;
        log::debug!("Lights directions: {:?}", lights.as_slice());
        log::debug!("Pseudo-inverse: {:?}", pseudo_inverse.as_slice());
        Ok(Self {
            lights,
            pseudo_inverse,
        })
    }

    /// Number of images the calibration was built for.
    pub fn nb_images(&self) -> usize {
        self.lights.nrows()
    }

    pub fn lights(&self) -> &Matrix {
        &self.lights
    }

    pub fn pseudo_inverse(&self) -> &Matrix {
        &self.pseudo_inverse
    }

    /// Least-squares solution of `L n = intensities`.
    /// The result is not normalized, its length is the albedo.
    pub fn solve(&self, intensities: &Vector) -> Result<Vector> {
        self.pseudo_inverse.multiply_vector(intensities)
    }
}
