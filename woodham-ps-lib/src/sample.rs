// SPDX-License-Identifier: MPL-2.0

//! Input and output grids of the reconstruction.

use crate::error::{Error, Result};
use crate::linalg::Vector;
use crate::numerics::{degrees_to_radians, nearly_equal};

/// One photograph of the scene, lit by a single light source.
///
/// The angles describe the direction from the center of the
/// ground towards the lamp, in spherical coordinates and degrees.
#[derive(Debug, Clone)]
pub struct LightSample {
    width: usize,
    height: usize,
    intensities: Vec<f64>, // row major, within [0, 1]
    azimuth: f64,
    polar: f64,
}

impl LightSample {
    /// Fails if the grid has not `width * height` intensities,
    /// if one of them is outside of `[0, 1]`,
    /// or if the angles are outside `[0, 360)` (azimuth) and `[0, 90]` (polar).
    pub fn new(
        width: usize,
        height: usize,
        intensities: Vec<f64>,
        azimuth: f64,
        polar: f64,
    ) -> Result<Self> {
        if intensities.len() != width * height {
            return Err(Error::InvalidMatrixShape {
                rows: height,
                cols: width,
                len: intensities.len(),
            });
        }
        if let Some((index, &value)) = intensities
            .iter()
            .enumerate()
            .find(|(_, v)| !(0.0..=1.0).contains(*v))
        {
            return Err(Error::InvalidIntensity { index, value });
        }
        if !(0.0..360.0).contains(&azimuth) {
            return Err(Error::InvalidAngle {
                name: "azimuthal",
                value: azimuth,
            });
        }
        if !(0.0..=90.0).contains(&polar) {
            return Err(Error::InvalidAngle {
                name: "polar",
                value: polar,
            });
        }
        Ok(Self {
            width,
            height,
            intensities,
            azimuth,
            polar,
        })
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// (width, height)
    pub fn dimensions(&self) -> (usize, usize) {
        (self.width, self.height)
    }

    pub fn intensities(&self) -> &[f64] {
        &self.intensities
    }

    /// Intensity of pixel (`x`, `y`).
    pub fn at(&self, x: usize, y: usize) -> f64 {
        self.intensities[y * self.width + x]
    }

    pub fn azimuth(&self) -> f64 {
        self.azimuth
    }

    pub fn polar(&self) -> f64 {
        self.polar
    }

    /// Unit vector pointing towards the light source.
    pub fn illumination_direction(&self) -> Vector {
        let azimuth = degrees_to_radians(self.azimuth);
        let polar = degrees_to_radians(self.polar);
        let sin_polar = polar.sin();
        Vector::xyz(
            sin_polar * azimuth.cos(),
            sin_polar * azimuth.sin(),
            polar.cos(),
        )
    }
}

/// Reconstructed surface normals, one unit vector per pixel.
#[derive(Debug, Clone)]
pub struct NormalField {
    width: usize,
    height: usize,
    normals: Vec<f64>, // (x, y, z) one after another, row major
}

impl NormalField {
    /// Fails if the buffer does not hold `width * height` triples
    /// or if one of them is not of unit length.
    pub fn new(width: usize, height: usize, normals: Vec<f64>) -> Result<Self> {
        if normals.len() != width * height * 3 {
            return Err(Error::InvalidNormalField(format!(
                "expected {} values for a {}x{} field but got {}",
                width * height * 3,
                width,
                height,
                normals.len()
            )));
        }
        if let Some(index) = normals.chunks_exact(3).position(|n| !is_unit(n)) {
            return Err(Error::InvalidNormalField(format!(
                "normal {} is not of unit length",
                index
            )));
        }
        Ok(Self {
            width,
            height,
            normals,
        })
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// All components, three per pixel.
    pub fn as_slice(&self) -> &[f64] {
        &self.normals
    }

    /// Normal of pixel (`x`, `y`).
    pub fn at(&self, x: usize, y: usize) -> (f64, f64, f64) {
        let i = 3 * (y * self.width + x);
        (self.normals[i], self.normals[i + 1], self.normals[i + 2])
    }

    pub fn iter(&self) -> impl Iterator<Item = (f64, f64, f64)> + '_ {
        self.normals.chunks_exact(3).map(|n| (n[0], n[1], n[2]))
    }
}

fn is_unit(n: &[f64]) -> bool {
    nearly_equal((n[0] * n[0] + n[1] * n[1] + n[2] * n[2]).sqrt(), 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn light_sample_rejects_wrong_grid_size() {
        assert!(matches!(
            LightSample::new(2, 2, vec![0.5; 3], 0.0, 0.0),
            Err(Error::InvalidMatrixShape { .. })
        ));
    }

    #[test]
    fn light_sample_rejects_out_of_range_intensity() {
        let result = LightSample::new(2, 1, vec![0.5, 1.5], 0.0, 0.0);
        assert!(matches!(
            result,
            Err(Error::InvalidIntensity { index: 1, .. })
        ));
        assert!(LightSample::new(1, 1, vec![f64::NAN], 0.0, 0.0).is_err());
        assert!(LightSample::new(1, 1, vec![-0.1], 0.0, 0.0).is_err());
    }

    #[test]
    fn light_sample_rejects_out_of_range_angles() {
        assert!(LightSample::new(1, 1, vec![0.5], 360.0, 10.0).is_err());
        assert!(LightSample::new(1, 1, vec![0.5], -1.0, 10.0).is_err());
        assert!(LightSample::new(1, 1, vec![0.5], 10.0, 90.5).is_err());
        assert!(LightSample::new(1, 1, vec![0.5], 359.9, 90.0).is_ok());
    }

    #[test]
    fn pixel_access_is_row_major() {
        let s = LightSample::new(3, 2, vec![0.0, 0.1, 0.2, 0.3, 0.4, 0.5], 0.0, 0.0).unwrap();
        assert_eq!(s.at(0, 0), 0.0);
        assert_eq!(s.at(2, 0), 0.2);
        assert_eq!(s.at(0, 1), 0.3);
        assert_eq!(s.at(2, 1), 0.5);
    }

    #[test]
    fn illumination_direction_from_angles() {
        let zenith = LightSample::new(1, 1, vec![0.0], 123.0, 0.0).unwrap();
        assert!(zenith
            .illumination_direction()
            .nearly_equals(&Vector::xyz(0.0, 0.0, 1.0)));

        let grazing = LightSample::new(1, 1, vec![0.0], 90.0, 90.0).unwrap();
        assert!(grazing
            .illumination_direction()
            .nearly_equals(&Vector::xyz(0.0, 1.0, 0.0)));

        let oblique = LightSample::new(1, 1, vec![0.0], 0.0, 45.0).unwrap();
        let h = std::f64::consts::FRAC_1_SQRT_2;
        let dir = oblique.illumination_direction();
        assert!(dir.nearly_equals(&Vector::xyz(h, 0.0, h)));
        assert!(nearly_equal(dir.length(), 1.0));
    }

    #[test]
    fn normal_field_checks_invariants() {
        assert!(NormalField::new(1, 1, vec![0.0, 0.0, 1.0]).is_ok());
        assert!(NormalField::new(2, 1, vec![0.0, 0.0, 1.0]).is_err());
        assert!(NormalField::new(1, 1, vec![0.0, 0.0, 2.0]).is_err());
    }

    #[test]
    fn normal_field_access() {
        let field = NormalField::new(2, 1, vec![0.0, 0.0, 1.0, 1.0, 0.0, 0.0]).unwrap();
        assert_eq!(field.at(1, 0), (1.0, 0.0, 0.0));
        assert_eq!(field.iter().count(), 2);
    }
}
