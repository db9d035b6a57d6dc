// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Segmentation pipeline — ink mask, candidate regions, composite distance,
// greedy merge to the expected count, and padded crops.

pub mod detect;
pub mod extract;
pub mod merge;
pub mod metric;
pub mod orchestrate;
pub mod preprocess;

pub use orchestrate::{Segmenter, extract_problems};
