//! Configuration for a toolpath optimization job.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Configuration parameters recognized by the engine and its G-code
/// companions.
///
/// The optimizer core reads `pen_width`, `visibility_threshold`,
/// `max_iterations` and `merge_threshold`; the remaining options are
/// consumed at ingest/emission time by `plotpath-gcode`.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct OptimizeConfig {
    /// Pen-tip diameter in mm, the ink footprint width used by the overlap
    /// filter. `0.0` disables the filter.
    pub pen_width: f64,

    /// Minimum visible (un-inked) fraction of a path's footprint, as a
    /// percentage in [0, 100], required for it to survive the filter.
    pub visibility_threshold: f64,

    /// Cap on improving 2-opt passes. `0` keeps the greedy ordering as-is.
    pub max_iterations: usize,

    /// Endpoint-coincidence tolerance in mm: two endpoints within this
    /// distance count as the same point.
    pub merge_threshold: f64,

    /// Curve discretization step in mm used when converting curved input.
    pub curve_tolerance: f64,

    /// Drawing feedrate (mm/min) written on `G1` moves.
    pub feedrate: f64,

    /// Pen-up traverse speed (mm/min).
    pub travel_speed: f64,

    /// Z height with the pen lifted.
    pub z_up: f64,

    /// Z height with the pen on paper.
    pub z_down: f64,

    /// Z axis plunge/lift speed (mm/min).
    pub z_speed: f64,

    /// Replacement G-code preamble. `None` emits the built-in header.
    pub gcode_header: Option<String>,

    /// Replacement G-code postamble. `None` emits the built-in footer.
    pub gcode_footer: Option<String>,
}

impl Default for OptimizeConfig {
    fn default() -> Self {
        Self {
            pen_width: 0.0,
            visibility_threshold: 50.0,
            max_iterations: 500,
            merge_threshold: 0.05,
            curve_tolerance: 0.1,
            feedrate: 1000.0,
            travel_speed: 3000.0,
            z_up: 2.0,
            z_down: 0.0,
            z_speed: 500.0,
            gcode_header: None,
            gcode_footer: None,
        }
    }
}

impl OptimizeConfig {
    /// Creates a new configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the pen width.
    pub fn with_pen_width(mut self, width: f64) -> Self {
        self.pen_width = width;
        self
    }

    /// Sets the visibility threshold (percent).
    pub fn with_visibility_threshold(mut self, percent: f64) -> Self {
        self.visibility_threshold = percent;
        self
    }

    /// Sets the maximum number of improving 2-opt passes.
    pub fn with_max_iterations(mut self, iterations: usize) -> Self {
        self.max_iterations = iterations;
        self
    }

    /// Sets the endpoint-merge tolerance.
    pub fn with_merge_threshold(mut self, threshold: f64) -> Self {
        self.merge_threshold = threshold;
        self
    }

    /// Sets the drawing feedrate.
    pub fn with_feedrate(mut self, feedrate: f64) -> Self {
        self.feedrate = feedrate;
        self
    }

    /// Sets the pen-up and pen-down Z heights.
    pub fn with_z_range(mut self, z_down: f64, z_up: f64) -> Self {
        self.z_down = z_down;
        self.z_up = z_up;
        self
    }

    /// Sets a custom G-code header.
    pub fn with_gcode_header(mut self, header: impl Into<String>) -> Self {
        self.gcode_header = Some(header.into());
        self
    }

    /// Sets a custom G-code footer.
    pub fn with_gcode_footer(mut self, footer: impl Into<String>) -> Self {
        self.gcode_footer = Some(footer.into());
        self
    }

    /// Returns true when the overlap filter should run.
    pub fn filter_enabled(&self) -> bool {
        self.pen_width > 0.0 && self.visibility_threshold < 100.0
    }

    /// Validates every option against its documented range.
    pub fn validate(&self) -> Result<()> {
        if !(0.0..=100.0).contains(&self.visibility_threshold) {
            return Err(Error::ConfigRange(format!(
                "visibility_threshold {} outside [0, 100]",
                self.visibility_threshold
            )));
        }
        if self.pen_width < 0.0 || !self.pen_width.is_finite() {
            return Err(Error::ConfigRange(format!(
                "pen_width {} must be finite and >= 0",
                self.pen_width
            )));
        }
        if self.merge_threshold < 0.0 || !self.merge_threshold.is_finite() {
            return Err(Error::ConfigRange(format!(
                "merge_threshold {} must be finite and >= 0",
                self.merge_threshold
            )));
        }
        if self.curve_tolerance <= 0.0 || !self.curve_tolerance.is_finite() {
            return Err(Error::ConfigRange(format!(
                "curve_tolerance {} must be finite and > 0",
                self.curve_tolerance
            )));
        }
        for (name, value) in [
            ("feedrate", self.feedrate),
            ("travel_speed", self.travel_speed),
            ("z_speed", self.z_speed),
        ] {
            if value <= 0.0 || !value.is_finite() {
                return Err(Error::ConfigRange(format!(
                    "{} {} must be finite and > 0",
                    name, value
                )));
            }
        }
        if !self.z_up.is_finite() || !self.z_down.is_finite() {
            return Err(Error::ConfigRange("z_up/z_down must be finite".into()));
        }
        Ok(())
    }
}
