//! The optimization pipeline: validate → filter → greedy → 2-opt.
//!
//! [`optimize`] is the engine entry point. It is single-threaded and
//! CPU-bound; the only suspension points are pushes onto the progress
//! bus, and the only shared state with the outside world is the progress
//! channel and the cancel token carried by the [`JobContext`].

use std::time::Instant;

use plotpath_core::{
    pen_up_distance, CancelToken, Error, OptimizeConfig, PathPlacement, PlotPath, ProgressEvent,
    ProgressSender, Result,
};

use crate::context::JobContext;
use crate::filter::{filter_overlapped, FilterResult};
use crate::greedy::order_paths;
use crate::result::OptimizationResult;
use crate::two_opt::refine;

/// Runs the full optimization pipeline over `paths`.
///
/// Progress events stream into `sender` in production order; `complete`
/// is always the final event, success or not. On cancellation the
/// in-flight pass finishes, a `log` event narrates the abort, and
/// [`Error::Cancelled`] is returned with all partial state discarded.
pub fn optimize(
    paths: Vec<PlotPath>,
    config: &OptimizeConfig,
    sender: ProgressSender,
    cancel: CancelToken,
) -> Result<OptimizationResult> {
    let mut ctx = JobContext::new(sender, cancel);
    match run_pipeline(paths, config, &mut ctx) {
        Ok(result) => {
            ctx.emit(ProgressEvent::Complete);
            Ok(result)
        }
        Err(err) => {
            match &err {
                Error::Cancelled => ctx.log("cancelled"),
                other => ctx.log(format!("optimization failed: {}", other)),
            }
            ctx.emit(ProgressEvent::Complete);
            Err(err)
        }
    }
}

fn run_pipeline(
    paths: Vec<PlotPath>,
    config: &OptimizeConfig,
    ctx: &mut JobContext,
) -> Result<OptimizationResult> {
    let started = Instant::now();

    config.validate()?;
    if paths.is_empty() {
        return Err(Error::EmptyInput);
    }
    for (i, path) in paths.iter().enumerate() {
        path.validate().map_err(|err| match err {
            Error::MalformedPath(msg) => Error::MalformedPath(format!("path {}: {}", i, msg)),
            other => other,
        })?;
    }

    ctx.log(format!("Loaded {} paths", paths.len()));

    let filter = if config.filter_enabled() {
        ctx.emit(ProgressEvent::FilterStart {
            path_count: paths.len(),
            pen_width: config.pen_width,
            visibility_threshold: config.visibility_threshold,
        });
        let filter = filter_overlapped(&paths, config);
        ctx.emit(ProgressEvent::FilterResult {
            original_count: paths.len(),
            kept_count: filter.kept_count(),
            removed_count: filter.removed_count(),
            removed_indices: filter.removed_indices.clone(),
            pen_width: config.pen_width,
            visibility_threshold: config.visibility_threshold,
        });
        filter
    } else {
        FilterResult::keep_all(paths.len())
    };

    if ctx.is_cancelled() {
        return Err(Error::Cancelled);
    }

    // Baseline the caller can compare against: the survivors drawn in the
    // order they arrived, nothing reversed.
    let input_sequence: Vec<PathPlacement> = filter
        .kept_indices
        .iter()
        .map(|&i| PathPlacement::new(i, false))
        .collect();
    let input_pen_up = pen_up_distance(&paths, &input_sequence);

    ctx.log("Running greedy nearest-neighbor ordering");
    let greedy = order_paths(&paths, &filter.kept_indices, ctx)?;
    ctx.emit(ProgressEvent::GreedyResult {
        path_count: greedy.sequence.len(),
        progress_history: greedy.sequence.clone(),
        original_dist: input_pen_up,
        phase1_dist: greedy.pen_up,
        paths: greedy.sequence.clone(),
    });

    ctx.emit(ProgressEvent::TwoOptStart);
    let refined = refine(&paths, &greedy.sequence, config.max_iterations, ctx)?;

    let original_pen_up = refined.dist_history[0];
    let final_pen_up = refined.dist_history.last().copied().unwrap_or(0.0);
    ctx.emit(ProgressEvent::Phase2Result {
        dist_history: refined.dist_history.clone(),
        iterations: refined.iterations,
        final_dist: final_pen_up,
        original_dist: original_pen_up,
        paths: refined.sequence.clone(),
    });

    log::debug!(
        "job done: {:.3} -> {:.3} -> {:.3}mm pen-up in {} passes",
        input_pen_up,
        original_pen_up,
        final_pen_up,
        refined.iterations
    );

    Ok(OptimizationResult {
        sequence: refined.sequence,
        paths,
        filter,
        pen_up_history: refined.dist_history,
        iterations: refined.iterations,
        input_pen_up,
        original_pen_up,
        final_pen_up,
        computation_time_ms: started.elapsed().as_millis() as u64,
    })
}
