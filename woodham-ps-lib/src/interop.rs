// SPDX-License-Identifier: MPL-2.0

//! Interoperability conversions between the image, matrix and sample types.

use crate::error::Result;
use crate::sample::{LightSample, NormalField};
use image::{DynamicImage, ImageBuffer, Luma, Primitive, Rgb};
use nalgebra::{DMatrix, Scalar};

// Convert a DMatrix into an Image ---------------------------------------------
// -----------------------------------------------------------------------------

/// Convert a `(T,T,T)` RGB matrix into an RGB image.
/// Inverse operation of matrix_from_rgb_image.
#[allow(clippy::cast_possible_truncation)]
pub fn rgb_from_matrix<T: Scalar + Primitive>(
    mat: &DMatrix<(T, T, T)>,
) -> ImageBuffer<Rgb<T>, Vec<T>> {
    let (nb_rows, nb_cols) = mat.shape();
    let mut img_buf = ImageBuffer::new(nb_cols as u32, nb_rows as u32);
    for (x, y, pixel) in img_buf.enumerate_pixels_mut() {
        let (r, g, b) = mat[(y as usize, x as usize)];
        *pixel = Rgb([r, g, b]);
    }
    img_buf
}

pub trait ToImage {
    fn to_image(&self) -> DynamicImage;
}

impl ToImage for DMatrix<(u8, u8, u8)> {
    fn to_image(&self) -> DynamicImage {
        DynamicImage::ImageRgb8(rgb_from_matrix(self))
    }
}

/// Normals are encoded as RGB, each component mapped from [-1, 1] to [0, 255].
impl ToImage for NormalField {
    fn to_image(&self) -> DynamicImage {
        normals_to_rgb(self).to_image()
    }
}

/// Map every normal from [-1, 1] into 8-bit RGB.
pub fn normals_to_rgb(field: &NormalField) -> DMatrix<(u8, u8, u8)> {
    let to_u8 = |c: f64| ((c + 1.0) / 2.0 * 255.0).max(0.0).min(255.0) as u8;
    DMatrix::from_fn(field.height(), field.width(), |y, x| {
        let (nx, ny, nz) = field.at(x, y);
        (to_u8(nx), to_u8(ny), to_u8(nz))
    })
}

// Convert an Image into a DMatrix ---------------------------------------------
// -----------------------------------------------------------------------------

/// Convert a gray image into a matrix.
pub fn matrix_from_image<T: Scalar + Primitive>(img: ImageBuffer<Luma<T>, Vec<T>>) -> DMatrix<T> {
    let (width, height) = img.dimensions();
    DMatrix::from_row_slice(height as usize, width as usize, &img.into_raw())
}

/// Convert an RGB image into a `(T, T, T)` RGB matrix.
/// Inverse operation of `rgb_from_matrix`.
pub fn matrix_from_rgb_image<T: Scalar + Primitive>(
    img: ImageBuffer<Rgb<T>, Vec<T>>,
) -> DMatrix<(T, T, T)> {
    let (width, height) = img.dimensions();
    DMatrix::from_iterator(
        width as usize,
        height as usize,
        img.as_raw().chunks_exact(3).map(|s| (s[0], s[1], s[2])),
    )
    .transpose()
}

/// Gray level of an RGB pixel: Rec.ITU-R BT.601-7, in [0, 1].
pub fn rgb_to_gray(rgb: (u8, u8, u8)) -> f64 {
    let (r, g, b) = rgb;
    ((0.299 * r as f64 + 0.587 * g as f64 + 0.114 * b as f64) / 255.0).min(1.0)
}

pub trait IntoGrayMatrix {
    /// Gray intensities in [0, 1], one per pixel.
    fn into_gray_matrix(self) -> DMatrix<f64>;
}

impl IntoGrayMatrix for DynamicImage {
    fn into_gray_matrix(self) -> DMatrix<f64> {
        match self {
            DynamicImage::ImageLuma8(img) => matrix_from_image(img).map(|v| v as f64 / 255.0),
            DynamicImage::ImageLuma16(img) => {
                matrix_from_image(img).map(|v| v as f64 / (256.0 * 256.0 - 1.0))
            }
            other => matrix_from_rgb_image(other.into_rgb8()).map(rgb_to_gray),
        }
    }
}

/// Wrap a gray matrix (rows are image rows) into a light sample.
pub fn light_sample_from_matrix(
    gray: &DMatrix<f64>,
    azimuth: f64,
    polar: f64,
) -> Result<LightSample> {
    let (height, width) = gray.shape();
    // nalgebra is column major, the sample is row major.
    let intensities = gray.transpose().as_slice().to_vec();
    LightSample::new(width, height, intensities, azimuth, polar)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn gray_conversion_stays_in_unit_interval() {
        assert_eq!(rgb_to_gray((0, 0, 0)), 0.0);
        assert!(rgb_to_gray((255, 255, 255)) <= 1.0);
        assert!((rgb_to_gray((255, 255, 255)) - 1.0).abs() < 1e-9);
    }

    #[test]
    fn rgb_matrix_round_trip_keeps_orientation() {
        let mat = DMatrix::from_row_slice(2, 3, &[(1u8, 2u8, 3u8); 6])
            .map_with_location(|r, c, _| (r as u8, c as u8, 7));
        let back = matrix_from_rgb_image(rgb_from_matrix(&mat));
        assert_eq!(back, mat);
    }

    #[test]
    fn light_sample_is_row_major() {
        let gray = DMatrix::from_row_slice(2, 3, &[0.0, 0.1, 0.2, 0.3, 0.4, 0.5]);
        let sample = light_sample_from_matrix(&gray, 10.0, 20.0).unwrap();
        assert_eq!(sample.dimensions(), (3, 2));
        assert_eq!(sample.at(2, 0), 0.2);
        assert_eq!(sample.at(0, 1), 0.3);
    }

    #[test]
    fn luma8_image_into_gray_matrix() {
        let img = ImageBuffer::from_raw(2, 1, vec![0u8, 255]).unwrap();
        let gray = DynamicImage::ImageLuma8(img).into_gray_matrix();
        assert_eq!(gray.shape(), (1, 2));
        assert_eq!(gray[(0, 0)], 0.0);
        assert_eq!(gray[(0, 1)], 1.0);
    }

    #[test]
    fn normals_encoding() {
        let field = NormalField::new(2, 1, vec![0.0, 0.0, 1.0, -1.0, 0.0, 0.0]).unwrap();
        let rgb = normals_to_rgb(&field);
        assert_eq!(rgb.shape(), (1, 2));
        assert_eq!(rgb[(0, 0)], (127, 127, 255));
        assert_eq!(rgb[(0, 1)], (0, 127, 127));
        let img = field.to_image().into_rgb8();
        assert_eq!(img.dimensions(), (2, 1));
        assert_eq!(img.get_pixel(1, 0).0, [0, 127, 127]);
    }
}
