//! Plotter G-code ingest.
//!
//! Splits a G-code program into drawn paths by watching the Z axis: a move
//! down to drawing height opens a path at the current head position, a
//! move back up closes it, and XY moves in between extend it. The drawing
//! and travel heights are inferred from the program itself when it moves Z
//! to at least two distinct values.

use plotpath_core::{OptimizeConfig, PlotPath, Point};

/// How far above the detected drawing height still counts as pen-down.
const PEN_DOWN_SLACK: f64 = 0.1;

/// A parsed G-code program: the drawn paths plus the machine parameters
/// recovered from the text.
#[derive(Debug, Clone)]
pub struct ParsedProgram {
    /// Drawn paths in program order.
    pub paths: Vec<PlotPath>,
    /// Travel (pen-up) height.
    pub z_up: f64,
    /// Drawing (pen-down) height.
    pub z_down: f64,
    /// Drawing feedrate taken from the last `G1 ... F` word.
    pub feedrate: f64,
}

/// One decoded G-code line: the command word plus any axis words.
#[derive(Debug, Default)]
struct Words {
    command: Option<String>,
    x: Option<f64>,
    y: Option<f64>,
    z: Option<f64>,
    f: Option<f64>,
}

/// Parses a plotter G-code program.
///
/// `config` supplies the fallback `z_up`/`z_down`/`feedrate` used when the
/// program never discloses its own. Paths with fewer than two points are
/// dropped; malformed words are skipped.
pub fn parse(gcode: &str, config: &OptimizeConfig) -> ParsedProgram {
    let mut program = ParsedProgram {
        paths: Vec::new(),
        z_up: config.z_up,
        z_down: config.z_down,
        feedrate: config.feedrate,
    };

    // First pass: find the distinct Z heights used by motion commands. The
    // lowest is the drawing height, the highest the travel height.
    let mut z_values: Vec<f64> = gcode
        .lines()
        .filter_map(|line| decode(line))
        .filter(|words| words.is_motion())
        .filter_map(|words| words.z)
        .collect();
    z_values.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
    z_values.dedup();
    if z_values.len() >= 2 {
        program.z_down = z_values[0];
        program.z_up = z_values[z_values.len() - 1];
    } else {
        log::warn!(
            "G-code has {} distinct Z height(s); keeping configured pen heights",
            z_values.len()
        );
    }

    // Second pass: split into paths.
    let mut head = Point::ORIGIN;
    let mut drawing = false;
    let mut current: Vec<Point> = Vec::new();

    for line in gcode.lines() {
        let Some(words) = decode(line) else {
            continue;
        };

        if let Some(x) = words.x {
            head.x = x;
        }
        if let Some(y) = words.y {
            head.y = y;
        }

        if !words.is_motion() {
            continue;
        }
        if matches!(words.command.as_deref(), Some("G1") | Some("G01")) {
            if let Some(f) = words.f {
                program.feedrate = f;
            }
        }

        match words.z {
            Some(z) if z <= program.z_down + PEN_DOWN_SLACK => {
                // Pen down: a fresh path starts wherever the head is.
                drawing = true;
                current = vec![head];
            }
            Some(_) => {
                if drawing {
                    drawing = false;
                    finish_path(&mut program.paths, std::mem::take(&mut current));
                }
            }
            None => {
                if drawing {
                    current.push(head);
                }
            }
        }
    }

    if drawing {
        finish_path(&mut program.paths, current);
    }

    log::debug!("parsed {} drawn paths", program.paths.len());
    program
}

fn finish_path(paths: &mut Vec<PlotPath>, points: Vec<Point>) {
    if points.len() > 1 {
        paths.push(PlotPath::new(points));
    }
}

/// Strips the comment, splits a line into words and decodes the addresses
/// this crate cares about. Returns `None` for blank/comment-only lines.
fn decode(line: &str) -> Option<Words> {
    let code = line.split(';').next().unwrap_or("").trim();
    if code.is_empty() {
        return None;
    }

    let mut words = Words::default();
    for (i, token) in code.split_whitespace().enumerate() {
        if i == 0 {
            words.command = Some(token.to_ascii_uppercase());
            continue;
        }
        let mut chars = token.chars();
        let Some(address) = chars.next() else {
            continue;
        };
        let Ok(value) = chars.as_str().parse::<f64>() else {
            log::warn!("skipping malformed G-code word {:?}", token);
            continue;
        };
        match address.to_ascii_uppercase() {
            'X' => words.x = Some(value),
            'Y' => words.y = Some(value),
            'Z' => words.z = Some(value),
            'F' => words.f = Some(value),
            _ => {}
        }
    }
    Some(words)
}

impl Words {
    /// True for the linear motion commands that move the pen.
    fn is_motion(&self) -> bool {
        matches!(
            self.command.as_deref(),
            Some("G0") | Some("G00") | Some("G1") | Some("G01")
        )
    }
}
