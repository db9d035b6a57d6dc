// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Unified error types for Tafel.

use thiserror::Error;

/// Top-level error type for all Tafel operations.
#[derive(Debug, Error)]
pub enum TafelError {
    // -- Segmentation errors --
    #[error("invalid image: {0}")]
    InvalidImage(String),

    #[error("target region count {target} is outside the accepted range {min}..={max}")]
    InvalidTargetCount { target: usize, min: usize, max: usize },

    #[error("padding ratio {0} is outside the accepted range 0.0..=1.0")]
    InvalidPaddingRatio(f64),

    #[error("no mathematical problems detected")]
    NoRegionsDetected,

    #[error("invalid segmentation config: {0}")]
    InvalidConfig(String),

    // -- Raster boundary --
    #[error("image processing failed: {0}")]
    ImageError(String),

    #[error("unsupported image format: {0}")]
    UnsupportedFormat(String),

    #[error("file too large: {size} bytes (max {max} bytes)")]
    FileTooLarge { size: usize, max: usize },

    // -- Recognition collaborators --
    #[error("formula recognition failed: {0}")]
    Recognition(String),

    #[error("formula normalization failed: {0}")]
    Normalization(String),

    // -- Storage / persistence --
    #[error("file I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Alias used throughout the codebase.
pub type Result<T> = std::result::Result<T, TafelError>;
