// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Composite dissimilarity between two regions, used to rank merge candidates.
// Pure geometry: no pixel data is consulted.

use tafel_core::Region;

pub const SPATIAL_WEIGHT: f64 = 0.5;
pub const SIZE_WEIGHT: f64 = 0.2;
pub const ASPECT_WEIGHT: f64 = 0.1;
pub const ALIGNMENT_WEIGHT: f64 = 0.2;

/// The four normalised dissimilarity terms, each in `0.0..=1.0`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DistanceTerms {
    /// Centre-to-centre distance over the image diagonal.
    pub spatial: f64,
    /// Relative area difference.
    pub size: f64,
    /// Relative width/height ratio difference.
    pub aspect: f64,
    /// One minus the shared vertical extent over the shorter height.
    pub alignment: f64,
}

impl DistanceTerms {
    pub fn composite(&self) -> f64 {
        SPATIAL_WEIGHT * self.spatial
            + SIZE_WEIGHT * self.size
            + ASPECT_WEIGHT * self.aspect
            + ALIGNMENT_WEIGHT * self.alignment
    }
}

/// Weighted composite distance between `a` and `b` on an image of the given size.
///
/// Symmetric: `distance(a, b, ..) == distance(b, a, ..)` bit for bit.
pub fn distance(a: &Region, b: &Region, image_width: u32, image_height: u32) -> f64 {
    distance_terms(a, b, image_width, image_height).composite()
}

/// Break the distance down into its terms.
pub fn distance_terms(a: &Region, b: &Region, image_width: u32, image_height: u32) -> DistanceTerms {
    DistanceTerms {
        spatial: spatial_term(a, b, image_width, image_height),
        size: relative_difference(a.area() as f64, b.area() as f64),
        aspect: relative_difference(a.aspect_ratio(), b.aspect_ratio()),
        alignment: alignment_term(a, b),
    }
}

fn spatial_term(a: &Region, b: &Region, image_width: u32, image_height: u32) -> f64 {
    let diagonal = (image_width as f64).hypot(image_height as f64);
    if diagonal == 0.0 {
        return 0.0;
    }
    let (ax, ay) = a.center();
    let (bx, by) = b.center();
    (ax - bx).hypot(ay - by) / diagonal
}

/// `|p - q| / max(p, q)`, 0 when both are zero.
fn relative_difference(p: f64, q: f64) -> f64 {
    let max = p.max(q);
    if max <= 0.0 {
        return 0.0;
    }
    (p - q).abs() / max
}

fn alignment_term(a: &Region, b: &Region) -> f64 {
    let min_height = a.height.min(b.height);
    if min_height == 0 {
        return 1.0;
    }
    let overlap = a.vertical_overlap(b) as f64;
    (1.0 - overlap / min_height as f64).clamp(0.0, 1.0)
}
