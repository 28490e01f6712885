//! 2-opt refinement of an ordered path sequence.
//!
//! Reverses sub-ranges of the drawing order whenever that shortens pen-up
//! travel. Paths are oriented, so reversing the range `[i..j]` also flips
//! the drawing direction of every path inside it; only then do the two gap
//! distances at the range boundary tell the whole cost story.
//!
//! The refiner works on six parallel buffers (`sx`, `sy`, `ex`, `ey`,
//! `order`, `flipped`) allocated once per job and reordered in place —
//! the inner loop touches nothing but contiguous coordinate arrays.

use plotpath_core::{Error, PathPlacement, PlotPath, Result};

use crate::context::JobContext;

/// Strict improvement margin in mm; reversals below it are rounding noise.
const EPSILON: f64 = 1e-6;

/// Parallel coordinate buffers for one job.
///
/// Slot `k` holds the effective start (`sx[k]`, `sy[k]`) and effective end
/// (`ex[k]`, `ey[k]`) of the path drawn `k`-th, alongside its original
/// index and flip flag.
#[derive(Debug, Clone)]
pub struct SegmentBuffers {
    sx: Vec<f64>,
    sy: Vec<f64>,
    ex: Vec<f64>,
    ey: Vec<f64>,
    order: Vec<usize>,
    flipped: Vec<bool>,
}

impl SegmentBuffers {
    /// Lays out a placement sequence as parallel buffers.
    pub fn from_sequence(paths: &[PlotPath], sequence: &[PathPlacement]) -> Self {
        let n = sequence.len();
        let mut buffers = Self {
            sx: Vec::with_capacity(n),
            sy: Vec::with_capacity(n),
            ex: Vec::with_capacity(n),
            ey: Vec::with_capacity(n),
            order: Vec::with_capacity(n),
            flipped: Vec::with_capacity(n),
        };
        for placement in sequence {
            let start = placement.effective_start(paths);
            let end = placement.effective_end(paths);
            buffers.sx.push(start.x);
            buffers.sy.push(start.y);
            buffers.ex.push(end.x);
            buffers.ey.push(end.y);
            buffers.order.push(placement.original_index);
            buffers.flipped.push(placement.reversed);
        }
        buffers
    }

    /// Number of slots.
    pub fn len(&self) -> usize {
        self.order.len()
    }

    /// Returns true if there are no slots.
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Pen-up travel of the current layout: origin to the first start plus
    /// every inter-path gap.
    pub fn total_pen_up(&self) -> f64 {
        if self.is_empty() {
            return 0.0;
        }
        let mut total = self.sx[0].hypot(self.sy[0]);
        for i in 0..self.len() - 1 {
            total += dist(self.ex[i], self.ey[i], self.sx[i + 1], self.sy[i + 1]);
        }
        total
    }

    /// The current layout as a placement sequence.
    pub fn sequence(&self) -> Vec<PathPlacement> {
        self.order
            .iter()
            .zip(&self.flipped)
            .map(|(&index, &reversed)| PathPlacement::new(index, reversed))
            .collect()
    }

    /// Reverses the slot range `[i..=j]` and flips each path inside it.
    fn reverse_range(&mut self, i: usize, j: usize) {
        let (mut l, mut r) = (i, j);
        while l < r {
            self.sx.swap(l, r);
            self.sy.swap(l, r);
            self.ex.swap(l, r);
            self.ey.swap(l, r);
            self.order.swap(l, r);
            self.flipped.swap(l, r);
            self.flip_slot(l);
            self.flip_slot(r);
            l += 1;
            r -= 1;
        }
        if l == r {
            self.flip_slot(l);
        }
    }

    /// Flips a single slot's drawing direction.
    fn flip_slot(&mut self, k: usize) {
        std::mem::swap(&mut self.sx[k], &mut self.ex[k]);
        std::mem::swap(&mut self.sy[k], &mut self.ey[k]);
        self.flipped[k] = !self.flipped[k];
    }

    /// Verifies the buffers against the original path geometry.
    ///
    /// Every reversal only swaps and flips existing values, so `order` must
    /// still be a permutation and every slot's coordinates must equal the
    /// original path's endpoints under its flip flag. A mismatch means a
    /// corrupted reversal.
    pub fn audit(&self, paths: &[PlotPath]) -> Result<()> {
        let mut seen = vec![false; paths.len()];
        for k in 0..self.len() {
            let index = self.order[k];
            if index >= paths.len() || seen[index] {
                return Err(Error::Internal(format!(
                    "slot {} holds invalid or duplicate path index {}",
                    k, index
                )));
            }
            seen[index] = true;

            let placement = PathPlacement::new(index, self.flipped[k]);
            let start = placement.effective_start(paths);
            let end = placement.effective_end(paths);
            if self.sx[k] != start.x
                || self.sy[k] != start.y
                || self.ex[k] != end.x
                || self.ey[k] != end.y
            {
                return Err(Error::Internal(format!(
                    "slot {} coordinates disagree with path {} (flipped: {})",
                    k, index, self.flipped[k]
                )));
            }
        }
        Ok(())
    }
}

/// Result of 2-opt refinement.
#[derive(Debug, Clone)]
pub struct TwoOptResult {
    /// Refined placements in drawing order.
    pub sequence: Vec<PathPlacement>,
    /// Pen-up travel before refinement and after each improving pass.
    pub dist_history: Vec<f64>,
    /// Number of improving passes performed.
    pub iterations: usize,
}

/// Refines a placement sequence with first-improvement 2-opt passes.
///
/// Each pass scans `(i, j)` pairs in order and applies the first reversal
/// that shortens pen-up travel by more than [`EPSILON`], then restarts.
/// Terminates when a pass finds no improvement or after `max_iterations`
/// improving passes. `dist_history[0]` is the incoming pen-up travel and
/// one entry is appended per improving pass, so
/// `dist_history.len() == iterations + 1` and the history is monotone
/// non-increasing. Deterministic: no randomness anywhere.
///
/// Cancellation is polled at pass boundaries; the in-flight pass always
/// finishes first.
pub fn refine(
    paths: &[PlotPath],
    sequence: &[PathPlacement],
    max_iterations: usize,
    ctx: &JobContext,
) -> Result<TwoOptResult> {
    let mut buffers = SegmentBuffers::from_sequence(paths, sequence);
    let mut dist_history = vec![buffers.total_pen_up()];
    let mut iterations = 0;

    if buffers.len() >= 2 {
        while iterations < max_iterations {
            if ctx.is_cancelled() {
                return Err(Error::Cancelled);
            }
            if !improve_pass(&mut buffers) {
                break;
            }
            iterations += 1;
            dist_history.push(buffers.total_pen_up());
        }
    }

    buffers.audit(paths)?;

    Ok(TwoOptResult {
        sequence: buffers.sequence(),
        dist_history,
        iterations,
    })
}

/// One first-improvement scan. Returns true if a reversal was applied.
fn improve_pass(buffers: &mut SegmentBuffers) -> bool {
    let n = buffers.len();
    for i in 0..n - 1 {
        let (px, py) = if i > 0 {
            (buffers.ex[i - 1], buffers.ey[i - 1])
        } else {
            (0.0, 0.0)
        };

        for j in i + 1..n {
            let mut current = dist(px, py, buffers.sx[i], buffers.sy[i]);
            let mut proposed = dist(px, py, buffers.ex[j], buffers.ey[j]);
            if j < n - 1 {
                current += dist(buffers.ex[j], buffers.ey[j], buffers.sx[j + 1], buffers.sy[j + 1]);
                proposed += dist(buffers.sx[i], buffers.sy[i], buffers.sx[j + 1], buffers.sy[j + 1]);
            }

            if proposed < current - EPSILON {
                buffers.reverse_range(i, j);
                return true;
            }
        }
    }
    false
}

fn dist(x1: f64, y1: f64, x2: f64, y2: f64) -> f64 {
    (x1 - x2).hypot(y1 - y2)
}
