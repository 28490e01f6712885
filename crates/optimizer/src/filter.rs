//! Pen-overlap filtering: removes paths whose ink would be invisible
//! because previously drawn (longer) paths already cover their footprint.
//!
//! # Algorithm
//!
//! 1. Order paths by drawing length, longest first — long strokes lay down
//!    ink first, which keeps redundancy decisions stable.
//! 2. Build a segment index incrementally as paths are accepted.
//! 3. Sample each candidate along its polyline and count the samples lying
//!    within half a pen width of already-accepted ink.
//! 4. A candidate whose covered fraction reaches `1 - visibility/100` is
//!    redundant and dropped; everything else is accepted and indexed.

use std::cmp::Ordering;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use plotpath_core::{OptimizeConfig, PlotPath, Point};

use crate::ink_index::SegmentIndex;

/// Longest sampling step along a candidate polyline, in mm.
const MAX_SAMPLE_STEP: f64 = 0.5;

/// Outcome of the overlap filter: a partition of the original indices.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct FilterResult {
    /// Original indices of surviving paths, ascending.
    pub kept_indices: Vec<usize>,
    /// Original indices of removed paths, ascending.
    pub removed_indices: Vec<usize>,
}

impl FilterResult {
    /// A result that keeps all `n` paths.
    pub fn keep_all(n: usize) -> Self {
        Self {
            kept_indices: (0..n).collect(),
            removed_indices: Vec::new(),
        }
    }

    /// Number of surviving paths.
    pub fn kept_count(&self) -> usize {
        self.kept_indices.len()
    }

    /// Number of removed paths.
    pub fn removed_count(&self) -> usize {
        self.removed_indices.len()
    }
}

/// Removes paths whose footprint is already covered by accepted ink.
///
/// Reads `pen_width`, `visibility_threshold` and `merge_threshold` from the
/// configuration. With `pen_width == 0`, `visibility_threshold >= 100` or
/// fewer than two paths the stage is skipped and everything is kept. The
/// filter never fails; malformed paths are rejected before it runs.
pub fn filter_overlapped(paths: &[PlotPath], config: &OptimizeConfig) -> FilterResult {
    let n = paths.len();
    if !config.filter_enabled() || n < 2 {
        return FilterResult::keep_all(n);
    }

    let pen_width = config.pen_width;
    let radius = pen_width / 2.0;
    let step = (pen_width / 4.0).min(MAX_SAMPLE_STEP);
    // Covered fraction at which a path becomes redundant.
    let coverage_limit = 1.0 - config.visibility_threshold / 100.0;

    let lengths: Vec<f64> = paths.iter().map(PlotPath::draw_length).collect();

    // Longest first; the sort is stable so equal lengths keep input order,
    // which makes the first of two identical paths the survivor.
    let mut order: Vec<usize> = (0..n).collect();
    order.sort_by(|&a, &b| lengths[b].partial_cmp(&lengths[a]).unwrap_or(Ordering::Equal));

    let mut ink = SegmentIndex::new();
    let mut kept = Vec::with_capacity(n);
    let mut removed = Vec::new();

    for &i in &order {
        let path = &paths[i];

        // The very first path has nothing to be covered by.
        if kept.is_empty() {
            ink.insert_polyline(path.points());
            kept.push(i);
            continue;
        }

        let samples = if lengths[i] < config.merge_threshold {
            // Point-like path: a single visibility probe at its start.
            vec![path.start()]
        } else {
            sample_polyline(path.points(), step)
        };

        let covered = samples.iter().filter(|&&p| ink.any_within(p, radius)).count();
        let covered_fraction = covered as f64 / samples.len() as f64;

        if covered_fraction >= coverage_limit {
            removed.push(i);
        } else {
            ink.insert_polyline(path.points());
            kept.push(i);
        }
    }

    kept.sort_unstable();
    removed.sort_unstable();

    log::debug!(
        "overlap filter kept {}/{} paths (pen_width {}, visibility {}%)",
        kept.len(),
        n,
        pen_width,
        config.visibility_threshold
    );

    FilterResult {
        kept_indices: kept,
        removed_indices: removed,
    }
}

/// Evenly spaced samples along a polyline.
///
/// The first and last points are always included; zero-length segments are
/// skipped.
fn sample_polyline(points: &[Point], interval: f64) -> Vec<Point> {
    if points.is_empty() {
        return Vec::new();
    }
    let mut samples = vec![points[0]];
    if points.len() == 1 {
        return samples;
    }

    let mut residual = 0.0;
    for w in points.windows(2) {
        let seg_len = w[0].distance(w[1]);
        if seg_len < 1e-12 {
            continue;
        }
        let ux = (w[1].x - w[0].x) / seg_len;
        let uy = (w[1].y - w[0].y) / seg_len;

        let mut pos = interval - residual;
        while pos < seg_len - 1e-12 {
            samples.push(Point::new(w[0].x + ux * pos, w[0].y + uy * pos));
            pos += interval;
        }
        residual = seg_len - (pos - interval);
    }

    let last = points[points.len() - 1];
    if samples[samples.len() - 1].distance(last) > 1e-12 {
        samples.push(last);
    }
    samples
}
