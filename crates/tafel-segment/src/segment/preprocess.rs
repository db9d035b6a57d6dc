// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Preprocessing — grayscale conversion, 5x5 Gaussian denoise and inverted
// Otsu binarization, turning a whiteboard photo into an ink mask.

use image::{DynamicImage, GrayImage, Luma, Rgb, RgbImage};
use imageproc::contrast::{self, ThresholdType};
use imageproc::filter::separable_filter_equal;
use tafel_core::RawImage;
use tracing::{debug, instrument, warn};

/// Mask value for ink (foreground) pixels.
pub const INK: u8 = 255;
/// Mask value for board (background) pixels.
pub const BACKGROUND: u8 = 0;

/// Binomial approximation of a 5-tap Gaussian, normalised to sum to one.
const GAUSSIAN_5: [f32; 5] = [1.0 / 16.0, 4.0 / 16.0, 6.0 / 16.0, 4.0 / 16.0, 1.0 / 16.0];

/// Produce the ink mask for `image`: 255 where there is ink, 0 elsewhere.
///
/// 1. Convert to single-channel luma
/// 2. 5x5 Gaussian blur to suppress sensor and paper noise
/// 3. Otsu's global threshold with inverted polarity, so dark strokes on a
///    light board become foreground
///
/// Never fails. A blank board yields an all-background mask.
#[instrument(skip(image), fields(name = image.name(), width = image.width(), height = image.height()))]
pub fn binarize(image: &RawImage) -> GrayImage {
    let gray = to_grayscale(image);
    let blurred = separable_filter_equal(&gray, &GAUSSIAN_5);
    let level = contrast::otsu_level(&blurred);
    debug!(level, "Otsu level computed");

    let mask = contrast::threshold(&blurred, level, ThresholdType::BinaryInverted);
    if mask.pixels().all(|p| p.0[0] == BACKGROUND) {
        warn!("Binarized mask contains no ink");
    }
    mask
}

/// Convert a 1- or 3-channel `RawImage` to luma.
///
/// Colour images go through the `image` crate's sRGB luma conversion.
pub fn to_grayscale(image: &RawImage) -> GrayImage {
    let (width, height) = (image.width(), image.height());
    match image.channels() {
        1 => GrayImage::from_fn(width, height, |x, y| Luma([image.pixel(x, y)[0]])),
        _ => {
            let rgb = RgbImage::from_fn(width, height, |x, y| {
                let px = image.pixel(x, y);
                Rgb([px[0], px[1], px[2]])
            });
            DynamicImage::ImageRgb8(rgb).to_luma8()
        }
    }
}
