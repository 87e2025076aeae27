// SPDX-License-Identifier: MPL-2.0

//! Error type shared by every stage of the reconstruction.

use thiserror::Error;

/// Everything that can go wrong between loading the light samples
/// and assembling the normal field.
#[derive(Error, Debug)]
pub enum Error {
    #[error("Dimension mismatch in {operation}: {lhs:?} vs {rhs:?}")]
    DimensionMismatch {
        operation: &'static str,
        lhs: (usize, usize),
        rhs: (usize, usize),
    },
    #[error("Invalid matrix shape: {rows}x{cols} cannot hold {len} values")]
    InvalidMatrixShape { rows: usize, cols: usize, len: usize },
    #[error("Singular matrix: elimination failed at column {column}")]
    SingularMatrix { column: usize },
    #[error("Cannot normalize a vector of length zero")]
    ZeroLength,
    #[error("The dataset is empty")]
    EmptyDataset,
    #[error("Not enough light samples: expected at least 3 but got {0}")]
    NotEnoughSamples(usize),
    #[error("Image {index} is {actual:?} but the first image is {expected:?} (width, height)")]
    ImageSizeMismatch {
        index: usize,
        expected: (usize, usize),
        actual: (usize, usize),
    },
    #[error("Image too small: {width}x{height}, at least 2 rows and 2 columns are required")]
    ImageTooSmall { width: usize, height: usize },
    #[error("Axis too short: {0} pixels, at least 2 are required")]
    AxisTooShort(usize),
    #[error("Invalid intensity {value} at index {index}, expected a value within [0, 1]")]
    InvalidIntensity { index: usize, value: f64 },
    #[error("Invalid {name} angle: {value} degrees")]
    InvalidAngle { name: &'static str, value: f64 },
    #[error("Invalid normal field: {0}")]
    InvalidNormalField(String),
    #[error("Failed to build the worker pool")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),
    #[error("Reconstruction failed at pixel ({x}, {y})")]
    Pixel {
        x: usize,
        y: usize,
        #[source]
        source: Box<Error>,
    },
}

pub type Result<T> = std::result::Result<T, Error>;
