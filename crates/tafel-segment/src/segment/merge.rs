// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Greedy count-constrained merging — repeatedly fuse the globally closest
// pair of regions until the expected number of expressions remains.

use tafel_core::{Region, ScoredPair};
use tracing::{debug, info, instrument};

use super::metric::distance;

/// One merge decision: which working-set entries were fused, and into what.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MergeStep {
    /// Indices into the working set as it was before this step.
    pub pair: ScoredPair,
    pub merged: Region,
}

/// Final regions plus the merge decisions that produced them.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct MergeOutcome {
    pub regions: Vec<Region>,
    pub steps: Vec<MergeStep>,
}

/// Merge `regions` down to `min(target, regions.len())` entries.
///
/// See [`merge_with_history`] for the ordering contract.
pub fn merge_to_target(
    regions: Vec<Region>,
    target: usize,
    image_width: u32,
    image_height: u32,
) -> Vec<Region> {
    merge_with_history(regions, target, image_width, image_height).regions
}

/// Merge `regions` down to `min(target, regions.len())` entries, recording
/// every step.
///
/// Each iteration scores all unordered pairs, picks the global minimum (the
/// first pair in index order wins ties), removes both parents and appends
/// their bounding union to the end of the working set. Untouched regions keep
/// their detection order and merged regions follow in creation order; the
/// result is *not* in reading order.
///
/// A target at or above the input length returns the input unchanged. A
/// target of zero is treated as one. Cost is O(n²) per step and O(n³) overall.
#[instrument(skip(regions), fields(initial = regions.len(), target))]
pub fn merge_with_history(
    regions: Vec<Region>,
    target: usize,
    image_width: u32,
    image_height: u32,
) -> MergeOutcome {
    let target = target.max(1);
    let mut working = regions;
    let mut steps = Vec::with_capacity(working.len().saturating_sub(target));

    while working.len() > target {
        let Some(pair) = closest_pair(&working, image_width, image_height) else {
            break;
        };
        // Remove the higher index first so the lower one stays valid.
        let second = working.remove(pair.second);
        let first = working.remove(pair.first);
        let merged = first.union(&second);
        debug!(
            first = %first,
            second = %second,
            merged = %merged,
            distance = pair.distance,
            remaining = working.len() + 1,
            "Merged closest pair"
        );
        working.push(merged);
        steps.push(MergeStep { pair, merged });
    }

    info!(
        merges = steps.len(),
        regions = working.len(),
        "Greedy merge complete"
    );
    MergeOutcome {
        regions: working,
        steps,
    }
}

/// The globally closest pair `(i, j)`, `i < j`, or `None` with fewer than two regions.
///
/// Pairs are visited in index order and only a strictly smaller distance
/// replaces the incumbent, so ties resolve to the earliest pair.
pub fn closest_pair(regions: &[Region], image_width: u32, image_height: u32) -> Option<ScoredPair> {
    let mut best: Option<ScoredPair> = None;
    for (i, a) in regions.iter().enumerate() {
        for (j, b) in regions.iter().enumerate().skip(i + 1) {
            let d = distance(a, b, image_width, image_height);
            if best.is_none_or(|incumbent| d < incumbent.distance) {
                best = Some(ScoredPair {
                    first: i,
                    second: j,
                    distance: d,
                });
            }
        }
    }
    best
}

#[cfg(test)]
mod tests {
    use super::*;

    const W: u32 = 1000;
    const H: u32 = 1000;

    /// Two adjacent boxes top-left, one top-right, two along the bottom.
    fn five_boxes() -> Vec<Region> {
        vec![
            Region::new(100, 100, 50, 50),
            Region::new(160, 100, 50, 50),
            Region::new(700, 100, 50, 50),
            Region::new(100, 700, 50, 50),
            Region::new(700, 700, 50, 50),
        ]
    }

    #[test]
    fn merges_globally_closest_pairs_first() {
        let outcome = merge_with_history(five_boxes(), 2, W, H);

        // Step 1: the two touching boxes.
        assert_eq!((outcome.steps[0].pair.first, outcome.steps[0].pair.second), (0, 1));
        assert_eq!(outcome.steps[0].merged, Region::new(100, 100, 110, 50));
        // Step 2: the bottom row, now at indices 1 and 2.
        assert_eq!((outcome.steps[1].pair.first, outcome.steps[1].pair.second), (1, 2));
        assert_eq!(outcome.steps[1].merged, Region::new(100, 700, 650, 50));
        // Step 3: the lone top-right box joins the merged top-left pair.
        assert_eq!((outcome.steps[2].pair.first, outcome.steps[2].pair.second), (0, 1));

        assert_eq!(
            outcome.regions,
            vec![Region::new(100, 700, 650, 50), Region::new(100, 100, 650, 50)]
        );
    }

    #[test]
    fn each_step_removes_exactly_one() {
        let boxes = five_boxes();
        for target in 1..=5 {
            let outcome = merge_with_history(boxes.clone(), target, W, H);
            assert_eq!(outcome.steps.len(), boxes.len() - target);
            assert_eq!(outcome.regions.len(), target);
        }
    }

    #[test]
    fn slack_target_is_a_no_op() {
        let boxes = five_boxes();
        assert_eq!(merge_to_target(boxes.clone(), 5, W, H), boxes);
        assert_eq!(merge_to_target(boxes.clone(), 20, W, H), boxes);
    }

    #[test]
    fn target_one_yields_global_bounding_box() {
        let merged = merge_to_target(five_boxes(), 1, W, H);
        assert_eq!(merged, vec![Region::new(100, 100, 650, 650)]);
    }

    #[test]
    fn zero_target_behaves_like_one() {
        assert_eq!(merge_to_target(five_boxes(), 0, W, H).len(), 1);
    }

    #[test]
    fn ties_resolve_to_first_pair() {
        // Three equal boxes, equally spaced on one line: (0,1) and (1,2) tie.
        let boxes = vec![
            Region::new(0, 0, 10, 10),
            Region::new(20, 0, 10, 10),
            Region::new(40, 0, 10, 10),
        ];
        let pair = closest_pair(&boxes, 100, 100).unwrap();
        assert_eq!((pair.first, pair.second), (0, 1));
    }

    #[test]
    fn closest_pair_needs_two_regions() {
        assert!(closest_pair(&[], W, H).is_none());
        assert!(closest_pair(&[Region::new(0, 0, 5, 5)], W, H).is_none());
    }

    #[test]
    fn merging_is_deterministic() {
        let a = merge_with_history(five_boxes(), 2, W, H);
        let b = merge_with_history(five_boxes(), 2, W, H);
        assert_eq!(a, b);
    }
}
