// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Region extraction — pad, clip and crop final regions into independent
// sub-images.

use tafel_core::config::validate_padding_ratio;
use tafel_core::error::Result;
use tafel_core::{RawImage, Region, SubImage};
use tracing::{debug, instrument};

/// Crop one sub-image per region, in region order.
///
/// Sub-images are named `"<image>_problem_<NN>"` with a 1-based sequence
/// number that is also stored in `SubImage::index`. `padding_ratio` outside
/// `0.0..=1.0` is rejected with `InvalidPaddingRatio`.
#[instrument(skip(image, regions), fields(name = image.name(), regions = regions.len()))]
pub fn extract_regions(
    image: &RawImage,
    regions: &[Region],
    padding_ratio: f64,
) -> Result<Vec<SubImage>> {
    validate_padding_ratio(padding_ratio)?;

    let problems = regions
        .iter()
        .enumerate()
        .map(|(i, region)| {
            let index = i + 1;
            let crop = pad_and_clip(region, padding_ratio, image.width(), image.height());
            debug!(index, %region, %crop, "Cropping problem");
            SubImage {
                name: problem_name(image.name(), index),
                index,
                region: crop,
                channels: image.channels(),
                data: image.copy_region(&crop),
            }
        })
        .collect();
    Ok(problems)
}

/// Grow `region` by `floor(width * ratio)` on the left and right and
/// `floor(height * ratio)` on the top and bottom, then clip to the image.
pub fn pad_and_clip(region: &Region, ratio: f64, image_width: u32, image_height: u32) -> Region {
    let pad_w = (region.width as f64 * ratio).floor() as u32;
    let pad_h = (region.height as f64 * ratio).floor() as u32;
    Region::from_edges(
        region.x.saturating_sub(pad_w),
        region.y.saturating_sub(pad_h),
        region.right().saturating_add(pad_w).min(image_width),
        region.bottom().saturating_add(pad_h).min(image_height),
    )
}

/// `"<base>_problem_<index:02>"`.
pub fn problem_name(base: &str, index: usize) -> String {
    format!("{base}_problem_{index:02}")
}
