// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Numeric constants and small pure helpers used all over the crate.

use crate::error::{Error, Result};

/// Tolerance used for every approximate comparison.
/// Input images are at most 16 bits deep, so finer differences are noise.
pub const EPSILON: f64 = 1.0 / 65536.0;

/// Approximate equality within [`EPSILON`].
pub fn nearly_equal(a: f64, b: f64) -> bool {
    (a - b).abs() < EPSILON
}

pub fn degrees_to_radians(deg: f64) -> f64 {
    deg * std::f64::consts::PI / 180.0
}

/// Map a pixel position in `[0, length-1]` linearly into `[-1, 1]`.
///
/// The first pixel maps to -1 and the last one to 1.
/// Fails if `length < 2` since there is no interval to map.
pub fn centered_position(position: usize, length: usize) -> Result<f64> {
    if length < 2 {
        return Err(Error::AxisTooShort(length));
    }
    Ok(position as f64 / (length - 1) as f64 * 2.0 - 1.0)
}

/// Ratio `height / width`, used to scale the vertical correction
/// so that non-square images get the same angular density on both axes.
pub fn aspect_ratio(width: usize, height: usize) -> Result<f64> {
    if width == 0 {
        return Err(Error::ImageTooSmall { width, height });
    }
    Ok(height as f64 / width as f64)
}
