//! Greedy nearest-neighbor path ordering.
//!
//! Construction heuristic for the initial drawing order: starting at the
//! machine origin, repeatedly jump to the closest endpoint of any unused
//! path. When a path's far end is the closer endpoint it is placed
//! reversed, so the pen enters it from that side.

use plotpath_core::{Error, PathPlacement, PlotPath, Result};

use crate::context::JobContext;

/// Result of greedy ordering.
#[derive(Debug, Clone)]
pub struct GreedyResult {
    /// Placements in drawing order.
    pub sequence: Vec<PathPlacement>,
    /// Pen-up travel of the produced ordering.
    pub pen_up: f64,
}

/// Orders the surviving paths by nearest-endpoint jumps.
///
/// `survivors` holds the original indices greedy may use, ascending.
/// Ties between equidistant candidates resolve to the lowest original
/// index, and a path whose two ends are equidistant from the head is
/// placed unreversed; both rules use strict `<` comparisons against the
/// running best. Emits one throttled progress event per placement and
/// polls cancellation between placements.
pub fn order_paths(
    paths: &[PlotPath],
    survivors: &[usize],
    ctx: &mut JobContext,
) -> Result<GreedyResult> {
    let total = survivors.len();
    let mut unused = survivors.to_vec();
    let mut sequence = Vec::with_capacity(total);
    let mut head = plotpath_core::Point::ORIGIN;
    let mut pen_up = 0.0;

    while !unused.is_empty() {
        if ctx.is_cancelled() {
            return Err(Error::Cancelled);
        }

        let mut best_slot = 0usize;
        let mut best_dist = f64::INFINITY;
        let mut best_reversed = false;

        // `unused` stays ascending, so strict `<` keeps the earliest index.
        for (slot, &index) in unused.iter().enumerate() {
            let d_start = head.distance(paths[index].start());
            let d_end = head.distance(paths[index].end());

            if d_start < best_dist {
                best_dist = d_start;
                best_slot = slot;
                best_reversed = false;
            }
            if d_end < best_dist {
                best_dist = d_end;
                best_slot = slot;
                best_reversed = true;
            }
        }

        let index = unused.remove(best_slot);
        let placement = PathPlacement::new(index, best_reversed);
        pen_up += best_dist;
        head = placement.effective_end(paths);
        sequence.push(placement);

        ctx.emit_progress(sequence.len(), total, placement);
    }

    Ok(GreedyResult { sequence, pen_up })
}

#[cfg(test)]
mod tests {
    use super::*;
    use plotpath_core::{progress_channel, CancelToken};

    fn path(points: &[(f64, f64)]) -> PlotPath {
        PlotPath::from_xy(points)
    }

    fn run(paths: &[PlotPath]) -> GreedyResult {
        let (tx, _rx) = progress_channel(1024);
        let mut ctx = JobContext::new(tx, CancelToken::new());
        let survivors: Vec<usize> = (0..paths.len()).collect();
        order_paths(paths, &survivors, &mut ctx).expect("greedy should not fail")
    }

    #[test]
    fn test_orders_by_proximity() {
        // A at the origin, C one unit past it, B far away.
        let paths = vec![
            path(&[(0.0, 0.0), (1.0, 0.0)]),
            path(&[(10.0, 10.0), (11.0, 10.0)]),
            path(&[(2.0, 0.0), (3.0, 0.0)]),
        ];
        let result = run(&paths);
        let order: Vec<usize> = result.sequence.iter().map(|p| p.original_index).collect();
        assert_eq!(order, vec![0, 2, 1]);
        assert!(result.sequence.iter().all(|p| !p.reversed));

        let expected = 1.0 + ((10.0f64 - 3.0).powi(2) + 10.0f64.powi(2)).sqrt();
        assert!((result.pen_up - expected).abs() < 1e-9);
    }

    #[test]
    fn test_reverses_when_far_end_is_closer() {
        let paths = vec![path(&[(5.0, 0.0), (1.0, 0.0)])];
        let result = run(&paths);
        assert!(result.sequence[0].reversed);
        assert!((result.pen_up - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_equidistant_ends_stay_unreversed() {
        // Both endpoints are 5.0 from the origin.
        let paths = vec![path(&[(5.0, 0.0), (0.0, 5.0)])];
        let result = run(&paths);
        assert!(!result.sequence[0].reversed);
    }

    #[test]
    fn test_tie_breaks_to_lowest_index() {
        // Identical twins: the earlier index must be placed first.
        let paths = vec![
            path(&[(1.0, 0.0), (2.0, 0.0)]),
            path(&[(1.0, 0.0), (2.0, 0.0)]),
        ];
        let result = run(&paths);
        let order: Vec<usize> = result.sequence.iter().map(|p| p.original_index).collect();
        assert_eq!(order, vec![0, 1]);
    }

    #[test]
    fn test_output_is_permutation_of_survivors() {
        let paths: Vec<PlotPath> = (0..20)
            .map(|i| {
                let x = (i as f64 * 7.3) % 40.0;
                let y = (i as f64 * 13.7) % 40.0;
                path(&[(x, y), (x + 1.0, y)])
            })
            .collect();
        let survivors: Vec<usize> = (0..paths.len()).filter(|i| i % 2 == 0).collect();

        let (tx, _rx) = progress_channel(1024);
        let mut ctx = JobContext::new(tx, CancelToken::new());
        let result = order_paths(&paths, &survivors, &mut ctx).unwrap();

        let mut placed: Vec<usize> = result.sequence.iter().map(|p| p.original_index).collect();
        placed.sort_unstable();
        assert_eq!(placed, survivors);
    }

    #[test]
    fn test_direction_flip_chains_through_sequence() {
        // Two vertical strokes; drawing the first leaves the head at (0, 10),
        // right next to the second one's start.
        let paths = vec![
            path(&[(0.0, 0.0), (0.0, 10.0)]),
            path(&[(0.0, 11.0), (0.0, 20.0)]),
        ];
        let result = run(&paths);
        assert_eq!(result.sequence[0].original_index, 0);
        assert!(!result.sequence[0].reversed);
        assert_eq!(result.sequence[1].original_index, 1);
        assert!(!result.sequence[1].reversed);
        assert!((result.pen_up - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_cancellation_aborts_ordering() {
        let paths = vec![
            path(&[(0.0, 0.0), (1.0, 0.0)]),
            path(&[(2.0, 0.0), (3.0, 0.0)]),
        ];
        let (tx, _rx) = progress_channel(16);
        let cancel = CancelToken::new();
        cancel.cancel();
        let mut ctx = JobContext::new(tx, cancel);
        let survivors = vec![0, 1];
        assert!(matches!(
            order_paths(&paths, &survivors, &mut ctx),
            Err(Error::Cancelled)
        ));
    }

    #[test]
    fn test_empty_survivor_set() {
        let paths = vec![path(&[(0.0, 0.0), (1.0, 0.0)])];
        let (tx, _rx) = progress_channel(16);
        let mut ctx = JobContext::new(tx, CancelToken::new());
        let result = order_paths(&paths, &[], &mut ctx).unwrap();
        assert!(result.sequence.is_empty());
        assert_eq!(result.pen_up, 0.0);
    }
}
