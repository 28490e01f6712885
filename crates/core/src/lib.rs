//! # Plotpath Core
//!
//! Shared types for the plotpath toolpath optimization engine.
//!
//! A pen plotter spends a large share of its wall-clock time with the pen
//! lifted, travelling between the end of one drawn path and the start of the
//! next. The optimizer crates reorder (and optionally reverse) paths to
//! shrink that pen-up travel; this crate holds everything those crates and
//! their callers share:
//!
//! - **Path model**: [`Point`], [`PlotPath`] and the pen-up distance math
//! - **Configuration**: [`OptimizeConfig`] with validation
//! - **Errors**: [`Error`], [`Result`]
//! - **Progress streaming**: [`ProgressEvent`] and the bounded
//!   single-producer/single-consumer [`progress_channel`]
//! - **Cancellation**: [`CancelToken`]
//!
//! ## Feature Flags
//!
//! - `serde`: Enable serialization/deserialization support. Progress events
//!   serialize to the tagged wire format consumed by UI clients.

pub mod cancel;
pub mod config;
pub mod error;
pub mod path;
pub mod progress;

// Re-exports
pub use cancel::CancelToken;
pub use config::OptimizeConfig;
pub use error::{Error, Result};
pub use path::{pen_up_distance, PathPlacement, PlotPath, Point};
pub use progress::{progress_channel, ProgressEvent, ProgressReceiver, ProgressSender};
