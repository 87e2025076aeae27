// SPDX-License-Identifier: MPL-2.0

//! # Calibrated photometric stereo
//!
//! Per-pixel surface normals from a set of gray images of a static scene,
//! each lit by a single light source of known direction (Woodham, 1980),
//! followed by an orientation correction depending on the pixel position.
//!
//! The entry point is [`stereo::photometric_stereo`].

// #![warn(missing_docs)]

pub mod calibration;
pub mod correction;
pub mod error;
pub mod interop;
pub mod linalg;
pub mod numerics;
pub mod sample;
pub mod scheduler;
pub mod stereo;

pub use error::{Error, Result};
