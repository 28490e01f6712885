//! # Plotpath Optimizer
//!
//! Reorders pen-plotter toolpaths to minimize pen-up travel, the distance
//! the head moves between drawn paths with the pen lifted.
//!
//! # Pipeline
//!
//! 1. **Overlap filter** ([`filter`]): drops paths whose ink would be
//!    invisible because a wider pen already drew over their footprint.
//! 2. **Greedy ordering** ([`greedy`]): nearest-neighbor construction with
//!    direction flipping, always jumping to the closest endpoint of any
//!    unused path.
//! 3. **2-opt refinement** ([`two_opt`]): first-improvement sub-range
//!    reversals on six parallel coordinate buffers, flipping every path in
//!    the reversed range.
//!
//! Data flows strictly forward; each job streams typed events into a
//! [`plotpath_core::ProgressReceiver`] and polls a
//! [`plotpath_core::CancelToken`] at pass boundaries.
//!
//! # Example
//!
//! ```rust
//! use plotpath_core::{progress_channel, CancelToken, OptimizeConfig, PlotPath};
//! use plotpath_optimizer::optimize;
//!
//! let paths = vec![
//!     PlotPath::from_xy(&[(0.0, 0.0), (1.0, 0.0)]),
//!     PlotPath::from_xy(&[(10.0, 10.0), (11.0, 10.0)]),
//!     PlotPath::from_xy(&[(2.0, 0.0), (3.0, 0.0)]),
//! ];
//! let (tx, rx) = progress_channel(256);
//! let result = optimize(paths, &OptimizeConfig::default(), tx, CancelToken::new()).unwrap();
//! assert_eq!(result.sequence.len(), 3);
//! drop(rx);
//! ```
//!
//! # References
//!
//! - Croes (1958), "A method for solving traveling-salesman problems"
//!   (the 2-opt move)

pub mod context;
pub mod filter;
pub mod greedy;
pub mod ink_index;
pub mod pipeline;
pub mod result;
pub mod two_opt;

pub use context::JobContext;
pub use filter::{filter_overlapped, FilterResult};
pub use greedy::{order_paths, GreedyResult};
pub use pipeline::optimize;
pub use result::OptimizationResult;
pub use two_opt::{refine, SegmentBuffers, TwoOptResult};
