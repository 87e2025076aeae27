// SPDX-License-Identifier: MPL-2.0

//! Orientation correction.
//!
//! Each pixel normal is rotated about the vertical axis by an angle
//! growing linearly with the horizontal position, then about the horizontal
//! axis by an angle growing with the vertical position.
//! Both angles are zero at the image center and reach the correction
//! factor (in degrees) at the borders. The vertical angle is scaled by
//! `height / width` so non-square images are corrected evenly.

use crate::error::{Error, Result};
use crate::linalg::{Matrix, Vector};
use crate::numerics::{aspect_ratio, centered_position, degrees_to_radians};

/// Precomputed rotation matrices, one per image column and one per image row.
#[derive(Debug, Clone)]
pub struct CorrectionTables {
    columns: Vec<Matrix>, // rotations about y, indexed by x
    rows: Vec<Matrix>,    // rotations about x, indexed by y
}

impl CorrectionTables {
    /// Fails if the image has less than 2 rows or 2 columns.
    pub fn new(width: usize, height: usize, correction_factor: f64) -> Result<Self> {
        if width < 2 || height < 2 {
            return Err(Error::ImageTooSmall { width, height });
        }
        let factor = degrees_to_radians(correction_factor);
        let row_factor = factor * aspect_ratio(width, height)?;
        let columns: Vec<Matrix> = (0..width)
            .map(|x| Ok(Matrix::rotation_y(centered_position(x, width)? * factor)))
            .collect::<Result<_>>()?;
        let rows: Vec<Matrix> = (0..height)
            .map(|y| Ok(Matrix::rotation_x(centered_position(y, height)? * row_factor)))
            .collect::<Result<_>>()?;
        Ok(Self { columns, rows })
    }

    pub fn width(&self) -> usize {
        self.columns.len()
    }

    pub fn height(&self) -> usize {
        self.rows.len()
    }

    /// Rotation applied to every pixel of column `x`.
    pub fn column(&self, x: usize) -> &Matrix {
        &self.columns[x]
    }

    /// Rotation applied to every pixel of row `y`.
    pub fn row(&self, y: usize) -> &Matrix {
        &self.rows[y]
    }

    /// `row(y) * (column(x) * normal)`
    pub fn apply(&self, normal: &Vector, x: usize, y: usize) -> Result<Vector> {
        correct(normal, self.column(x), self.row(y))
    }
}

/// Rotate by the column correction first, then by the row correction.
pub fn correct(normal: &Vector, column: &Matrix, row: &Matrix) -> Result<Vector> {
    row.multiply_vector(&column.multiply_vector(normal)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::numerics::nearly_equal;

    /// Recover the rotation angle from the matrix coefficients.
    fn angle_about_y(m: &Matrix) -> f64 {
        m.at(0, 2).atan2(m.at(0, 0))
    }

    fn angle_about_x(m: &Matrix) -> f64 {
        m.at(2, 1).atan2(m.at(1, 1))
    }

    #[test]
    fn boundary_and_center_angles() {
        let tables = CorrectionTables::new(5, 5, 10.0).unwrap();
        let rad = degrees_to_radians(10.0);
        assert!(nearly_equal(angle_about_y(tables.column(0)), -rad));
        assert!(nearly_equal(angle_about_y(tables.column(4)), rad));
        assert!(nearly_equal(angle_about_y(tables.column(2)), 0.0));
        assert!(nearly_equal(angle_about_x(tables.row(0)), -rad));
        assert!(nearly_equal(angle_about_x(tables.row(4)), rad));
        assert!(tables.row(2).nearly_equals(&Matrix::identity(3)));
    }

    #[test]
    fn row_angles_are_scaled_by_aspect_ratio() {
        let tables = CorrectionTables::new(8, 4, 20.0).unwrap();
        assert_eq!(tables.width(), 8);
        assert_eq!(tables.height(), 4);
        let rad = degrees_to_radians(20.0);
        assert!(nearly_equal(angle_about_y(tables.column(7)), rad));
        assert!(nearly_equal(angle_about_x(tables.row(0)), -rad * 0.5));
        assert!(nearly_equal(angle_about_x(tables.row(3)), rad * 0.5));
    }

    #[test]
    fn zero_factor_gives_identities() {
        let tables = CorrectionTables::new(3, 4, 0.0).unwrap();
        for x in 0..3 {
            assert_eq!(tables.column(x), &Matrix::identity(3));
        }
        for y in 0..4 {
            assert_eq!(tables.row(y), &Matrix::identity(3));
        }
    }

    #[test]
    fn single_row_or_column_is_rejected() {
        assert!(matches!(
            CorrectionTables::new(10, 1, 5.0),
            Err(Error::ImageTooSmall { width: 10, height: 1 })
        ));
        assert!(CorrectionTables::new(1, 10, 5.0).is_err());
    }

    #[test]
    fn column_rotation_is_applied_first() {
        let column = Matrix::rotation_y(std::f64::consts::FRAC_PI_2);
        let row = Matrix::rotation_x(std::f64::consts::FRAC_PI_2);
        let n = Vector::xyz(0.0, 0.0, 1.0);
        // z -> x by the column rotation, x is invariant by the row rotation.
        let corrected = correct(&n, &column, &row).unwrap();
        assert!(corrected.nearly_equals(&Vector::xyz(1.0, 0.0, 0.0)));
    }
}
