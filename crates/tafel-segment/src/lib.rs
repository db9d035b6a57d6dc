// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// tafel-segment — Whiteboard segmentation for the Tafel problem extractor.
//
// Splits a photo of a whiteboard into one crop per handwritten expression:
// Otsu binarization, morphological closing, external contour boxes, a greedy
// merge of the globally closest boxes down to the expected count, and padded
// crops. Also provides the raster decode/encode boundary and the interfaces
// of the recognition collaborators that consume the crops.

pub mod pipeline;
pub mod raster;
pub mod segment;

// Re-export the primary entry points so callers can use `tafel_segment::extract_problems` etc.
pub use pipeline::{FormulaNormalizer, FormulaRecognizer, TrimNormalizer, run_pipeline};
pub use raster::{decode_image, open_image, sub_image_to_png};
pub use segment::{Segmenter, extract_problems};
