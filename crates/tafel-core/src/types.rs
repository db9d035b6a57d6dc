// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Core domain types for the Tafel whiteboard segmenter.

use serde::{Deserialize, Serialize};

use crate::error::{Result, TafelError};

/// Smallest `target_regions` value a caller may request.
pub const MIN_TARGET_REGIONS: usize = 1;
/// Largest `target_regions` value a caller may request.
pub const MAX_TARGET_REGIONS: usize = 20;

/// A decoded, 8-bit-per-channel pixel buffer handed to the segmenter.
///
/// The buffer is row-major with an explicit byte `stride` between rows, so
/// callers can pass padded scanlines straight from a camera or decoder.
/// Three-channel images are interpreted as RGB. Construction validates the
/// shape, so every `RawImage` in circulation is safe to index.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawImage {
    name: String,
    data: Vec<u8>,
    width: u32,
    height: u32,
    channels: u8,
    stride: usize,
}

impl RawImage {
    /// Wrap a strided buffer, rejecting shapes that cannot be pixel data.
    pub fn new(
        name: impl Into<String>,
        data: Vec<u8>,
        width: u32,
        height: u32,
        channels: u8,
        stride: usize,
    ) -> Result<Self> {
        if width == 0 || height == 0 {
            return Err(TafelError::InvalidImage(format!(
                "image must have non-zero dimensions, got {width}x{height}"
            )));
        }
        if channels != 1 && channels != 3 {
            return Err(TafelError::InvalidImage(format!(
                "expected 1 or 3 channels, got {channels}"
            )));
        }
        let row_bytes = width as usize * channels as usize;
        if stride < row_bytes {
            return Err(TafelError::InvalidImage(format!(
                "stride {stride} is smaller than one row of {row_bytes} bytes"
            )));
        }
        // The last row does not need trailing stride padding.
        let required = stride * (height as usize - 1) + row_bytes;
        if data.len() < required {
            return Err(TafelError::InvalidImage(format!(
                "buffer holds {} bytes but {width}x{height}x{channels} with stride {stride} needs {required}",
                data.len()
            )));
        }
        Ok(Self {
            name: name.into(),
            data,
            width,
            height,
            channels,
            stride,
        })
    }

    /// Wrap a tightly packed buffer (`stride == width * channels`).
    pub fn packed(
        name: impl Into<String>,
        data: Vec<u8>,
        width: u32,
        height: u32,
        channels: u8,
    ) -> Result<Self> {
        let stride = width as usize * channels as usize;
        Self::new(name, data, width, height, channels, stride)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn channels(&self) -> u8 {
        self.channels
    }

    pub fn stride(&self) -> usize {
        self.stride
    }

    /// The visible bytes of row `y`, without stride padding.
    pub fn row(&self, y: u32) -> &[u8] {
        let start = y as usize * self.stride;
        &self.data[start..start + self.width as usize * self.channels as usize]
    }

    /// The channel values of the pixel at `(x, y)`.
    pub fn pixel(&self, x: u32, y: u32) -> &[u8] {
        let c = self.channels as usize;
        let start = x as usize * c;
        &self.row(y)[start..start + c]
    }

    /// Copy the `region` into a new tightly packed buffer.
    ///
    /// The region must lie inside the image.
    pub fn copy_region(&self, region: &Region) -> Vec<u8> {
        let c = self.channels as usize;
        let x0 = region.x as usize * c;
        let x1 = region.right() as usize * c;
        let mut out = Vec::with_capacity(region.area() as usize * c);
        for y in region.y..region.bottom() {
            out.extend_from_slice(&self.row(y)[x0..x1]);
        }
        out
    }
}

/// Axis-aligned rectangle over a candidate (or merged) ink region.
///
/// `right()` and `bottom()` are exclusive edges. Regions produced by detection,
/// merging and extraction always have a non-zero width and height. The
/// constructors still accept zero sizes so the geometry helpers and the
/// distance metric stay total on degenerate input; `is_empty` tells them apart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Region {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl Region {
    pub fn new(x: u32, y: u32, width: u32, height: u32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Build a region from inclusive top-left and exclusive bottom-right edges.
    pub fn from_edges(left: u32, top: u32, right: u32, bottom: u32) -> Self {
        Self {
            x: left,
            y: top,
            width: right.saturating_sub(left),
            height: bottom.saturating_sub(top),
        }
    }

    pub fn right(&self) -> u32 {
        self.x + self.width
    }

    pub fn bottom(&self) -> u32 {
        self.y + self.height
    }

    /// True when the region covers no pixels.
    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    pub fn area(&self) -> u64 {
        self.width as u64 * self.height as u64
    }

    /// Geometric centre in pixel coordinates.
    pub fn center(&self) -> (f64, f64) {
        (
            self.x as f64 + self.width as f64 / 2.0,
            self.y as f64 + self.height as f64 / 2.0,
        )
    }

    /// Width over height, or 1.0 for a degenerate zero-height region.
    pub fn aspect_ratio(&self) -> f64 {
        if self.height == 0 {
            1.0
        } else {
            self.width as f64 / self.height as f64
        }
    }

    /// Number of rows shared by the vertical extents of both regions.
    pub fn vertical_overlap(&self, other: &Region) -> u32 {
        let top = self.y.max(other.y);
        let bottom = self.bottom().min(other.bottom());
        bottom.saturating_sub(top)
    }

    /// Tightest region covering both `self` and `other`.
    pub fn union(&self, other: &Region) -> Region {
        Region::from_edges(
            self.x.min(other.x),
            self.y.min(other.y),
            self.right().max(other.right()),
            self.bottom().max(other.bottom()),
        )
    }

    /// True when the region is non-empty and lies inside a `width` x `height` image.
    pub fn fits_within(&self, width: u32, height: u32) -> bool {
        self.width > 0 && self.height > 0 && self.right() <= width && self.bottom() <= height
    }
}

impl std::fmt::Display for Region {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}x{}+{}+{}",
            self.width, self.height, self.x, self.y
        )
    }
}

/// Two working-set indices and their composite distance.
///
/// Only lives inside a merge iteration; `first < second` always holds.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoredPair {
    pub first: usize,
    pub second: usize,
    pub distance: f64,
}

/// One cropped problem image.
///
/// `index` is the 1-based sequence number that also appears in `name`
/// (`"<image>_problem_<index:02>"`). The pixel buffer is an independent,
/// tightly packed copy with the same channel count as the source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubImage {
    pub name: String,
    pub index: usize,
    /// Padded and clipped source rectangle the pixels were copied from.
    pub region: Region,
    pub channels: u8,
    pub data: Vec<u8>,
}

impl SubImage {
    pub fn width(&self) -> u32 {
        self.region.width
    }

    pub fn height(&self) -> u32 {
        self.region.height
    }
}

/// Outcome of recognising one problem crop.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProblemResult {
    /// 1-based, matches `SubImage::index`.
    pub problem_id: usize,
    pub filename: String,
    pub formula_raw: Option<String>,
    pub formula_normalized: Option<String>,
    pub error: Option<String>,
    pub success: bool,
}

/// Summary of a full segmentation + recognition run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PipelineReport {
    pub total_problems: usize,
    pub successful: usize,
    pub failed: usize,
    pub results: Vec<ProblemResult>,
    pub processing_time_secs: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn raw_image_rejects_bad_channel_count() {
        let err = RawImage::packed("board", vec![0; 32], 4, 4, 2).unwrap_err();
        assert!(matches!(err, TafelError::InvalidImage(_)));
    }

    #[test]
    fn raw_image_rejects_short_buffer() {
        let err = RawImage::packed("board", vec![0; 47], 4, 4, 3).unwrap_err();
        assert!(matches!(err, TafelError::InvalidImage(_)));
    }

    #[test]
    fn raw_image_rejects_narrow_stride() {
        let err = RawImage::new("board", vec![0; 64], 4, 4, 3, 8).unwrap_err();
        assert!(matches!(err, TafelError::InvalidImage(_)));
    }

    #[test]
    fn raw_image_rejects_empty_dimensions() {
        assert!(RawImage::packed("board", Vec::new(), 0, 5, 1).is_err());
    }

    #[test]
    fn strided_rows_skip_padding() {
        // 2x2 gray image with 2 padding bytes per row; last row unpadded.
        let data = vec![1, 2, 99, 99, 3, 4];
        let img = RawImage::new("board", data, 2, 2, 1, 4).unwrap();
        assert_eq!(img.row(0), &[1, 2]);
        assert_eq!(img.row(1), &[3, 4]);
        assert_eq!(img.pixel(1, 1), &[4]);
    }

    #[test]
    fn copy_region_packs_rows() {
        let data: Vec<u8> = (0..16).collect();
        let img = RawImage::packed("board", data, 4, 4, 1).unwrap();
        let crop = img.copy_region(&Region::new(1, 1, 2, 2));
        assert_eq!(crop, vec![5, 6, 9, 10]);
    }

    #[test]
    fn union_covers_both() {
        let a = Region::new(10, 10, 5, 5);
        let b = Region::new(30, 2, 4, 20);
        assert_eq!(a.union(&b), Region::new(10, 2, 24, 20));
        assert_eq!(b.union(&a), a.union(&b));
    }

    #[test]
    fn vertical_overlap_is_zero_for_separate_lines() {
        let a = Region::new(0, 0, 10, 10);
        let b = Region::new(0, 10, 10, 10);
        assert_eq!(a.vertical_overlap(&b), 0);
        assert_eq!(a.vertical_overlap(&Region::new(50, 5, 3, 20)), 5);
    }

    #[test]
    fn zero_sized_regions_are_empty() {
        assert!(Region::new(5, 5, 0, 10).is_empty());
        assert!(Region::from_edges(8, 3, 8, 9).is_empty());
        assert!(Region::from_edges(9, 3, 4, 9).is_empty());
        assert!(!Region::new(0, 0, 1, 1).is_empty());
    }

    #[test]
    fn zero_height_aspect_defaults_to_one() {
        assert_eq!(Region::new(0, 0, 7, 0).aspect_ratio(), 1.0);
        assert_eq!(Region::new(0, 0, 8, 4).aspect_ratio(), 2.0);
    }

    #[test]
    fn fits_within_checks_exclusive_edges() {
        assert!(Region::new(0, 0, 10, 10).fits_within(10, 10));
        assert!(!Region::new(1, 0, 10, 10).fits_within(10, 10));
        assert!(!Region::new(0, 0, 0, 10).fits_within(10, 10));
    }
}
