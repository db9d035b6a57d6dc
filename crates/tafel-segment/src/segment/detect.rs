// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Region detection — morphological closing of the ink mask followed by
// external contour extraction and a resolution-relative area filter.

use image::GrayImage;
use imageproc::contours::{BorderType, find_contours};
use imageproc::distance_transform::Norm;
use imageproc::morphology;
use tafel_core::error::Result;
use tafel_core::{Region, SegmentConfig};
use tracing::{debug, info, instrument};

/// Find candidate ink regions in a binarized mask.
///
/// 1. Close the mask with a square element of `closing_kernel_size` pixels,
///    repeated `closing_iterations` times, to bridge strokes of one expression
/// 2. Trace outer contours, ignoring holes and anything nested inside them
/// 3. Take each contour's bounding box and drop boxes smaller than
///    `min_area_ratio` of the image area
///
/// Regions come back in contour discovery order (a raster scan of each
/// contour's first pixel), not reading order. An empty result is not an error
/// here; the orchestrator decides what it means. Fails with `InvalidConfig`
/// when the closing radius does not fit the morphology backend.
#[instrument(skip(mask, config), fields(width = mask.width(), height = mask.height()))]
pub fn detect_regions(mask: &GrayImage, config: &SegmentConfig) -> Result<Vec<Region>> {
    let closed = close_mask(mask, config)?;
    let min_area = min_region_area(mask.width(), mask.height(), config.min_area_ratio);

    let mut regions = Vec::new();
    let mut discarded = 0usize;
    for contour in find_contours::<u32>(&closed) {
        if !matches!(contour.border_type, BorderType::Outer) || contour.parent.is_some() {
            continue;
        }
        let Some(region) = bounding_region(&contour.points) else {
            continue;
        };
        if region.area() < min_area {
            discarded += 1;
            continue;
        }
        debug!(%region, "Candidate region");
        regions.push(region);
    }

    info!(
        regions = regions.len(),
        discarded,
        min_area,
        "Region detection complete"
    );
    Ok(regions)
}

/// Morphological closing (dilate then erode) with a square element.
///
/// `n` passes of a `(2r+1)`-pixel square compose into a single pass of a
/// `(2nr+1)`-pixel square, which is what the Chebyshev-norm backend computes.
/// Pixels beyond the image edge never erode the mask.
pub fn close_mask(mask: &GrayImage, config: &SegmentConfig) -> Result<GrayImage> {
    let radius = config.morphology_radius()?;
    if radius == 0 {
        return Ok(mask.clone());
    }
    debug!(
        radius,
        kernel = config.closing_kernel_size,
        iterations = config.closing_iterations,
        "Closing ink mask"
    );
    Ok(morphology::close(mask, Norm::LInf, radius))
}

/// Smallest bounding-box area kept, as a share of the image area.
pub fn min_region_area(width: u32, height: u32, ratio: f64) -> u64 {
    let image_area = width as u64 * height as u64;
    (image_area as f64 * ratio).ceil() as u64
}

/// Axis-aligned bounding box of a point set, `None` when empty.
fn bounding_region(points: &[imageproc::point::Point<u32>]) -> Option<Region> {
    let first = points.first()?;
    let (mut min_x, mut min_y, mut max_x, mut max_y) = (first.x, first.y, first.x, first.y);
    for p in &points[1..] {
        min_x = min_x.min(p.x);
        min_y = min_y.min(p.y);
        max_x = max_x.max(p.x);
        max_y = max_y.max(p.y);
    }
    Some(Region::from_edges(min_x, min_y, max_x + 1, max_y + 1))
}
