// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Segmentation entry point — binarize, detect, merge to the target count and
// crop, in that order.

use tafel_core::error::{Result, TafelError};
use tafel_core::{RawImage, Region, SegmentConfig, SubImage};
use tracing::{info, instrument};

use super::detect::detect_regions;
use super::extract::extract_regions;
use super::merge::merge_to_target;
use super::preprocess::binarize;

/// Split a whiteboard photo into one sub-image per expression.
///
/// Uses the default closing and area-filter settings. Fails with
/// `InvalidTargetCount` when `target_regions` is outside `1..=20`,
/// `InvalidPaddingRatio` when `padding_ratio` is outside `0.0..=1.0`, and
/// `NoRegionsDetected` when the board holds no ink. (`InvalidImage` is raised
/// earlier, when the `RawImage` is built.)
pub fn extract_problems(
    image: &RawImage,
    padding_ratio: f64,
    target_regions: usize,
) -> Result<Vec<SubImage>> {
    let config = SegmentConfig {
        padding_ratio,
        target_regions,
        ..Default::default()
    };
    Segmenter::new(config)?.extract_problems(image)
}

/// Validated segmentation settings. Holds no per-call state, so one value can
/// serve any number of images from any number of threads.
#[derive(Debug, Clone, PartialEq)]
pub struct Segmenter {
    config: SegmentConfig,
}

impl Segmenter {
    pub fn new(config: SegmentConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &SegmentConfig {
        &self.config
    }

    /// Candidate regions before any merging.
    pub fn detect(&self, image: &RawImage) -> Result<Vec<Region>> {
        let mask = binarize(image);
        detect_regions(&mask, &self.config)
    }

    /// Final regions: detected, then merged down to `target_regions`.
    ///
    /// Merged regions are appended after the untouched ones, so the order is
    /// not reading order.
    pub fn segment(&self, image: &RawImage) -> Result<Vec<Region>> {
        let detected = self.detect(image)?;
        if detected.is_empty() {
            return Err(TafelError::NoRegionsDetected);
        }
        if detected.len() <= self.config.target_regions {
            return Ok(detected);
        }
        Ok(merge_to_target(
            detected,
            self.config.target_regions,
            image.width(),
            image.height(),
        ))
    }

    /// Segment `image` and crop each final region.
    #[instrument(skip(self, image), fields(name = image.name(), target = self.config.target_regions))]
    pub fn extract_problems(&self, image: &RawImage) -> Result<Vec<SubImage>> {
        let regions = self.segment(image)?;
        let problems = extract_regions(image, &regions, self.config.padding_ratio)?;
        info!(problems = problems.len(), "Problems extracted");
        Ok(problems)
    }
}
