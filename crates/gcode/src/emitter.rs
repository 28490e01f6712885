//! Plotter G-code emission.
//!
//! Writes an ordered path list back out as G-code: travel to each path's
//! start with the pen up, drop the pen, draw, lift. Consecutive paths
//! whose adjoining endpoints coincide are merged first so the pen stays
//! down across them.

use plotpath_core::{OptimizeConfig, PlotPath};

/// Concatenates consecutive paths whose adjoining endpoints lie within
/// `tolerance` of each other.
///
/// The joined path reuses the meeting point once, so the pen draws
/// straight through instead of lifting and landing on the same spot.
pub fn merge_touching(paths: &[PlotPath], tolerance: f64) -> Vec<PlotPath> {
    let mut merged: Vec<PlotPath> = Vec::with_capacity(paths.len());
    let mut iter = paths.iter();
    let Some(first) = iter.next() else {
        return merged;
    };

    let mut current: Vec<plotpath_core::Point> = first.points().to_vec();
    for path in iter {
        let gap = current[current.len() - 1].distance(path.start());
        if gap <= tolerance {
            current.extend_from_slice(&path.points()[1..]);
        } else {
            merged.push(PlotPath::new(std::mem::replace(
                &mut current,
                path.points().to_vec(),
            )));
        }
    }
    merged.push(PlotPath::new(current));

    if merged.len() < paths.len() {
        log::debug!("merged {} paths into {}", paths.len(), merged.len());
    }
    merged
}

/// Emits G-code for paths already in drawing order (flips applied).
///
/// `config` supplies the pen heights, speeds, merge tolerance and the
/// optional header/footer overrides.
pub fn generate(paths: &[PlotPath], config: &OptimizeConfig) -> String {
    let paths = merge_touching(paths, config.merge_threshold);
    let mut out: Vec<String> = Vec::new();

    match &config.gcode_header {
        Some(header) => out.extend(header.lines().map(str::to_owned)),
        None => {
            out.push("; Optimized by plotpath".to_string());
            out.push("G90 ; Absolute positioning".to_string());
            out.push("G21 ; Millimeters".to_string());
        }
    }
    out.push(format!("G0 Z{:.2} F{:.0} ; Pen up", config.z_up, config.z_speed));

    for path in &paths {
        let start = path.start();
        out.push(format!(
            "G0 X{:.3} Y{:.3} F{:.0}",
            start.x, start.y, config.travel_speed
        ));
        out.push(format!("G0 Z{:.2} F{:.0}", config.z_down, config.z_speed));
        for point in &path.points()[1..] {
            out.push(format!(
                "G1 X{:.3} Y{:.3} F{:.0}",
                point.x, point.y, config.feedrate
            ));
        }
        out.push(format!("G0 Z{:.2} F{:.0}", config.z_up, config.z_speed));
    }

    match &config.gcode_footer {
        Some(footer) => out.extend(footer.lines().map(str::to_owned)),
        None => out.push("G0 X0 Y0 ; Return to home".to_string()),
    }

    let mut text = out.join("\n");
    text.push('\n');
    text
}
