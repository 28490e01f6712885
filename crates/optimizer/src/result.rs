//! Optimization result representation.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use plotpath_core::{PathPlacement, PlotPath};

use crate::filter::FilterResult;

/// Result of a full optimization job.
///
/// `paths` is the caller's input arena, returned untouched; `sequence`
/// says in which order and direction to draw it. Keeping geometry and
/// ordering separate lets callers re-emit with any per-path metadata
/// they carried alongside the input.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct OptimizationResult {
    /// Final drawing order with flip bits, covering every surviving path.
    pub sequence: Vec<PathPlacement>,

    /// The original input paths, in input order.
    pub paths: Vec<PlotPath>,

    /// Which input paths survived the overlap filter.
    pub filter: FilterResult,

    /// Pen-up travel before refinement and after each improving 2-opt
    /// pass. The first entry is the greedy baseline.
    pub pen_up_history: Vec<f64>,

    /// Number of improving 2-opt passes performed.
    pub iterations: usize,

    /// Pen-up travel of the surviving paths in their original input order.
    pub input_pen_up: f64,

    /// Pen-up travel of the greedy ordering (the 2-opt baseline).
    pub original_pen_up: f64,

    /// Pen-up travel of the final ordering.
    pub final_pen_up: f64,

    /// Wall-clock time of the whole job in milliseconds.
    pub computation_time_ms: u64,
}

impl OptimizationResult {
    /// The paths in drawing order with flips applied to the geometry.
    pub fn ordered_paths(&self) -> Vec<PlotPath> {
        self.sequence
            .iter()
            .map(|placement| {
                let path = &self.paths[placement.original_index];
                if placement.reversed {
                    path.reversed()
                } else {
                    path.clone()
                }
            })
            .collect()
    }

    /// Travel saved by 2-opt relative to the greedy baseline, in percent.
    pub fn savings_percent(&self) -> f64 {
        if self.original_pen_up > 0.0 {
            (1.0 - self.final_pen_up / self.original_pen_up) * 100.0
        } else {
            0.0
        }
    }
}
