// SPDX-License-Identifier: MPL-2.0

//! Small dense linear algebra: just what the reconstruction needs.
//!
//! Both types are immutable values, every operation returns a new one.
//! Matrices are stored in row-major order.

use crate::error::{Error, Result};
use crate::numerics::{nearly_equal, EPSILON};
use std::ops::Index;

/// Fixed-length real vector.
#[derive(Debug, Clone, PartialEq)]
pub struct Vector {
    data: Vec<f64>,
}

impl Vector {
    pub fn new(data: Vec<f64>) -> Self {
        Self { data }
    }

    pub fn xyz(x: f64, y: f64, z: f64) -> Self {
        Self::new(vec![x, y, z])
    }

    /// Number of components.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.data
    }

    /// Euclidean length.
    pub fn length(&self) -> f64 {
        self.data.iter().map(|d| d * d).sum::<f64>().sqrt()
    }

    /// Same direction, unit length.
    pub fn normalize(&self) -> Result<Self> {
        let len = self.length();
        if len == 0.0 || !len.is_finite() {
            return Err(Error::ZeroLength);
        }
        Ok(Self::new(self.data.iter().map(|d| d / len).collect()))
    }

    pub fn nearly_equals(&self, other: &Self) -> bool {
        self.len() == other.len()
            && self
                .data
                .iter()
                .zip(&other.data)
                .all(|(&a, &b)| nearly_equal(a, b))
    }
}

impl Index<usize> for Vector {
    type Output = f64;
    fn index(&self, i: usize) -> &f64 {
        &self.data[i]
    }
}

/// Dense `rows x cols` real matrix.
#[derive(Debug, Clone, PartialEq)]
pub struct Matrix {
    rows: usize,
    cols: usize,
    data: Vec<f64>,
}

impl Matrix {
    /// Build a matrix from row-major data.
    pub fn new(rows: usize, cols: usize, data: Vec<f64>) -> Result<Self> {
        if data.len() != rows * cols {
            return Err(Error::InvalidMatrixShape {
                rows,
                cols,
                len: data.len(),
            });
        }
        Ok(Self { rows, cols, data })
    }

    /// Stack vectors of identical length as the rows of a matrix.
    pub fn from_rows(rows: &[Vector]) -> Result<Self> {
        let cols = rows.first().map_or(0, |r| r.len());
        let mut data = Vec::with_capacity(rows.len() * cols);
        for row in rows {
            if row.len() != cols {
                return Err(Error::DimensionMismatch {
                    operation: "matrix from rows",
                    lhs: (1, cols),
                    rhs: (1, row.len()),
                });
            }
            data.extend_from_slice(row.as_slice());
        }
        Self::new(rows.len(), cols, data)
    }

    pub fn identity(dim: usize) -> Self {
        let mut data = vec![0.0; dim * dim];
        for i in 0..dim {
            data[i * dim + i] = 1.0;
        }
        Self {
            rows: dim,
            cols: dim,
            data,
        }
    }

    #[rustfmt::skip]
    fn mat3(
        x11: f64, x12: f64, x13: f64,
        x21: f64, x22: f64, x23: f64,
        x31: f64, x32: f64, x33: f64,
    ) -> Self {
        Self {
            rows: 3,
            cols: 3,
            data: vec![x11, x12, x13, x21, x22, x23, x31, x32, x33],
        }
    }

    /// Rotation about the horizontal (x) axis.
    #[rustfmt::skip]
    pub fn rotation_x(rad: f64) -> Self {
        let (sin, cos) = rad.sin_cos();
        Self::mat3(
            1.0, 0.0, 0.0,
            0.0, cos, -sin,
            0.0, sin, cos,
        )
    }

    /// Rotation about the vertical (y) axis.
    #[rustfmt::skip]
    pub fn rotation_y(rad: f64) -> Self {
        let (sin, cos) = rad.sin_cos();
        Self::mat3(
            cos, 0.0, sin,
            0.0, 1.0, 0.0,
            -sin, 0.0, cos,
        )
    }

    pub fn shape(&self) -> (usize, usize) {
        (self.rows, self.cols)
    }

    pub fn nrows(&self) -> usize {
        self.rows
    }

    pub fn ncols(&self) -> usize {
        self.cols
    }

    /// Row-major view of the data.
    pub fn as_slice(&self) -> &[f64] {
        &self.data
    }

    /// Element at (`row`, `col`), `None` when out of bounds.
    pub fn get(&self, row: usize, col: usize) -> Option<f64> {
        if row < self.rows && col < self.cols {
            Some(self.data[row * self.cols + col])
        } else {
            None
        }
    }

    /// Element at (`row`, `col`). Panics when out of bounds, like slice indexing.
    pub fn at(&self, row: usize, col: usize) -> f64 {
        match self.get(row, col) {
            Some(value) => value,
            None => panic!(
                "index ({}, {}) out of bounds for a {}x{} matrix",
                row, col, self.rows, self.cols
            ),
        }
    }

    fn row(&self, row: usize) -> &[f64] {
        &self.data[row * self.cols..(row + 1) * self.cols]
    }

    pub fn transpose(&self) -> Self {
        let mut data = Vec::with_capacity(self.data.len());
        for j in 0..self.cols {
            for i in 0..self.rows {
                data.push(self.at(i, j));
            }
        }
        Self {
            rows: self.cols,
            cols: self.rows,
            data,
        }
    }

    /// Matrix product `self * other`.
    pub fn multiply(&self, other: &Self) -> Result<Self> {
        if self.cols != other.rows {
            return Err(Error::DimensionMismatch {
                operation: "matrix product",
                lhs: self.shape(),
                rhs: other.shape(),
            });
        }
        let mut data = Vec::with_capacity(self.rows * other.cols);
        for i in 0..self.rows {
            let row = self.row(i);
            for j in 0..other.cols {
                let sum = row
                    .iter()
                    .enumerate()
                    .map(|(k, a)| a * other.data[k * other.cols + j])
                    .sum::<f64>();
                data.push(sum);
            }
        }
        Ok(Self {
            rows: self.rows,
            cols: other.cols,
            data,
        })
    }

    /// Matrix-vector product `self * v`.
    pub fn multiply_vector(&self, v: &Vector) -> Result<Vector> {
        if self.cols != v.len() {
            return Err(Error::DimensionMismatch {
                operation: "matrix-vector product",
                lhs: self.shape(),
                rhs: (v.len(), 1),
            });
        }
        Ok(Vector::new(
            (0..self.rows)
                .map(|i| {
                    self.row(i)
                        .iter()
                        .zip(v.as_slice())
                        .map(|(a, b)| a * b)
                        .sum::<f64>()
                })
                .collect(),
        ))
    }

    /// Inverse by Gauss-Jordan elimination.
    ///
    /// Rows are only swapped when the pivot is exactly zero,
    /// in which case the first nonzero candidate below is used.
    /// If there is none, or if the pivot is negligible compared to the
    /// largest coefficient of the matrix, the matrix is singular.
    pub fn inverse(&self) -> Result<Self> {
        if self.rows != self.cols {
            return Err(Error::DimensionMismatch {
                operation: "inverse",
                lhs: self.shape(),
                rhs: (self.cols, self.rows),
            });
        }
        let dim = self.rows;
        let scale = self.data.iter().fold(0.0_f64, |m, x| m.max(x.abs()));
        let mut left: Vec<Vec<f64>> = (0..dim).map(|i| self.row(i).to_vec()).collect();
        let mut right: Vec<Vec<f64>> = (0..dim)
            .map(|i| {
                let mut row = vec![0.0; dim];
                row[i] = 1.0;
                row
            })
            .collect();

        // Forward pass: unit diagonal, zeros below.
        for i in 0..dim {
            let pivot_row = (i..dim)
                .find(|&r| left[r][i] != 0.0)
                .ok_or(Error::SingularMatrix { column: i })?;
            if pivot_row != i {
                left.swap(i, pivot_row);
                right.swap(i, pivot_row);
            }

            let pivot = left[i][i];
            if pivot.abs() <= EPSILON * scale {
                return Err(Error::SingularMatrix { column: i });
            }
            left[i].iter_mut().for_each(|x| *x /= pivot);
            right[i].iter_mut().for_each(|x| *x /= pivot);

            for k in i + 1..dim {
                let factor = left[k][i];
                if factor != 0.0 {
                    eliminate(&mut left, &mut right, k, i, factor);
                }
            }
        }

        // Backward pass: zeros above the diagonal.
        for i in (1..dim).rev() {
            for k in (0..i).rev() {
                let factor = left[k][i];
                if factor != 0.0 {
                    eliminate(&mut left, &mut right, k, i, factor);
                }
            }
        }

        let data: Vec<f64> = right.into_iter().flatten().collect();
        if let Some(p) = data.iter().position(|x| !x.is_finite()) {
            return Err(Error::SingularMatrix { column: p % dim });
        }
        Ok(Self {
            rows: dim,
            cols: dim,
            data,
        })
    }

    /// Element-wise comparison within the crate tolerance.
    pub fn nearly_equals(&self, other: &Self) -> bool {
        self.shape() == other.shape()
            && self
                .data
                .iter()
                .zip(&other.data)
                .all(|(&a, &b)| nearly_equal(a, b))
    }
}

/// Subtract `factor` times row `pivot` from row `target` in both halves.
fn eliminate(
    left: &mut [Vec<f64>],
    right: &mut [Vec<f64>],
    target: usize,
    pivot: usize,
    factor: f64,
) {
    for l in 0..left[target].len() {
        let delta_left = left[pivot][l] * factor;
        let delta_right = right[pivot][l] * factor;
        left[target][l] -= delta_left;
        right[target][l] -= delta_right;
    }
}
