// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Segmentation and upload configuration.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Result, TafelError};
use crate::types::{MAX_TARGET_REGIONS, MIN_TARGET_REGIONS};

/// Tunable parameters for one segmentation run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SegmentConfig {
    /// Fractional margin added around each region before cropping (0.0..=1.0).
    pub padding_ratio: f64,
    /// Expected number of expressions on the board (1..=20).
    pub target_regions: usize,
    /// Side length of the square closing element, in pixels. Must be odd.
    pub closing_kernel_size: u32,
    /// Dilate/erode passes of the closing. Keep this low: the merge stage
    /// consolidates, the closing should only bridge strokes.
    pub closing_iterations: u32,
    /// Minimum bounding-box area as a fraction of the image area.
    pub min_area_ratio: f64,
}

impl Default for SegmentConfig {
    fn default() -> Self {
        Self {
            padding_ratio: 0.1,
            target_regions: 1,
            closing_kernel_size: 15,
            closing_iterations: 2,
            min_area_ratio: 0.0005,
        }
    }
}

impl SegmentConfig {
    /// Load a config from a JSON file. Missing fields take their defaults.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let text = std::fs::read_to_string(path.as_ref())?;
        let config: Self = serde_json::from_str(&text)?;
        config.validate()?;
        Ok(config)
    }

    /// Check every field against its accepted range.
    pub fn validate(&self) -> Result<()> {
        validate_target_regions(self.target_regions)?;
        validate_padding_ratio(self.padding_ratio)?;
        if self.closing_kernel_size == 0 || self.closing_kernel_size % 2 == 0 {
            return Err(TafelError::InvalidConfig(format!(
                "closing_kernel_size must be a positive odd number, got {}",
                self.closing_kernel_size
            )));
        }
        self.morphology_radius()?;
        if !(0.0..1.0).contains(&self.min_area_ratio) {
            return Err(TafelError::InvalidConfig(format!(
                "min_area_ratio must be in 0.0..1.0, got {}",
                self.min_area_ratio
            )));
        }
        Ok(())
    }

    /// Effective Chebyshev radius of the whole closing.
    pub fn closing_radius(&self) -> u32 {
        (self.closing_kernel_size / 2).saturating_mul(self.closing_iterations)
    }

    /// The closing radius as the morphology backend takes it.
    ///
    /// Repeated square dilations compose into one larger square, whose radius
    /// must fit in a `u8`.
    pub fn morphology_radius(&self) -> Result<u8> {
        u8::try_from(self.closing_radius()).map_err(|_| {
            TafelError::InvalidConfig(format!(
                "closing of {} passes with a {}px element exceeds the maximum radius of {}",
                self.closing_iterations,
                self.closing_kernel_size,
                u8::MAX
            ))
        })
    }
}

/// Reject target counts outside `MIN_TARGET_REGIONS..=MAX_TARGET_REGIONS`.
pub fn validate_target_regions(target: usize) -> Result<()> {
    if !(MIN_TARGET_REGIONS..=MAX_TARGET_REGIONS).contains(&target) {
        return Err(TafelError::InvalidTargetCount {
            target,
            min: MIN_TARGET_REGIONS,
            max: MAX_TARGET_REGIONS,
        });
    }
    Ok(())
}

/// Reject padding ratios outside `0.0..=1.0` (NaN included).
pub fn validate_padding_ratio(ratio: f64) -> Result<()> {
    if !(0.0..=1.0).contains(&ratio) {
        return Err(TafelError::InvalidPaddingRatio(ratio));
    }
    Ok(())
}

/// Limits applied to encoded uploads before they are decoded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UploadLimits {
    /// Maximum encoded payload size in bytes.
    pub max_bytes: usize,
    /// Accepted lowercase file extensions, without the dot.
    pub extensions: Vec<String>,
}

impl Default for UploadLimits {
    fn default() -> Self {
        Self {
            max_bytes: 10 * 1024 * 1024,
            extensions: ["png", "jpg", "jpeg", "webp", "bmp"]
                .iter()
                .map(|ext| ext.to_string())
                .collect(),
        }
    }
}

impl UploadLimits {
    pub fn accepts_extension(&self, ext: &str) -> bool {
        let ext = ext.to_ascii_lowercase();
        self.extensions.iter().any(|allowed| *allowed == ext)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn defaults_are_valid() {
        assert!(SegmentConfig::default().validate().is_ok());
        assert_eq!(SegmentConfig::default().closing_radius(), 14);
    }

    #[test]
    fn target_range_is_enforced() {
        assert!(validate_target_regions(0).is_err());
        assert!(validate_target_regions(1).is_ok());
        assert!(validate_target_regions(20).is_ok());
        assert!(matches!(
            validate_target_regions(21),
            Err(TafelError::InvalidTargetCount { target: 21, .. })
        ));
    }

    #[test]
    fn padding_rejects_nan_and_negative() {
        assert!(validate_padding_ratio(f64::NAN).is_err());
        assert!(validate_padding_ratio(-0.01).is_err());
        assert!(validate_padding_ratio(1.5).is_err());
        assert!(validate_padding_ratio(0.0).is_ok());
        assert!(validate_padding_ratio(1.0).is_ok());
    }

    #[test]
    fn even_kernel_is_rejected() {
        let config = SegmentConfig {
            closing_kernel_size: 14,
            ..Default::default()
        };
        assert!(matches!(config.validate(), Err(TafelError::InvalidConfig(_))));
    }

    #[test]
    fn oversized_closing_is_rejected() {
        let config = SegmentConfig {
            closing_iterations: 40,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn json_file_fills_missing_fields() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{ "target_regions": 4, "closing_iterations": 3 }}"#).unwrap();

        let config = SegmentConfig::from_json_file(file.path()).unwrap();
        assert_eq!(config.target_regions, 4);
        assert_eq!(config.closing_iterations, 3);
        assert_eq!(config.closing_kernel_size, 15);
        assert_eq!(config.padding_ratio, 0.1);
    }

    #[test]
    fn json_file_with_bad_target_fails_validation() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{ "target_regions": 0 }}"#).unwrap();
        assert!(matches!(
            SegmentConfig::from_json_file(file.path()),
            Err(TafelError::InvalidTargetCount { .. })
        ));
    }

    #[test]
    fn extension_check_ignores_case() {
        let limits = UploadLimits::default();
        assert!(limits.accepts_extension("PNG"));
        assert!(limits.accepts_extension("jpeg"));
        assert!(!limits.accepts_extension("gif"));
    }
}
