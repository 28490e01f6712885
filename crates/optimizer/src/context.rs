//! Per-job state bundle passed into each pipeline stage.

use std::time::{Duration, Instant};

use plotpath_core::{CancelToken, PathPlacement, ProgressEvent, ProgressSender};

/// Minimum spacing between enqueued greedy `progress` events.
const PROGRESS_INTERVAL: Duration = Duration::from_millis(5);

/// Everything a stage needs besides its own inputs: the progress handle,
/// the cancellation flag and the progress throttle. One per job; nothing
/// is process-wide.
pub struct JobContext {
    sender: ProgressSender,
    cancel: CancelToken,
    last_progress: Option<Instant>,
}

impl JobContext {
    /// Creates a context for one job.
    pub fn new(sender: ProgressSender, cancel: CancelToken) -> Self {
        Self {
            sender,
            cancel,
            last_progress: None,
        }
    }

    /// Pushes an event onto the job's progress bus.
    pub fn emit(&self, event: ProgressEvent) {
        self.sender.push(event);
    }

    /// Pushes a log event.
    pub fn log(&self, msg: impl Into<String>) {
        self.sender.log(msg);
    }

    /// Pushes a greedy placement event, coalesced to at most one per 5 ms.
    pub fn emit_progress(&mut self, current: usize, total: usize, latest_path: PathPlacement) {
        let now = Instant::now();
        if let Some(last) = self.last_progress {
            if now.duration_since(last) < PROGRESS_INTERVAL {
                return;
            }
        }
        self.last_progress = Some(now);
        self.emit(ProgressEvent::Progress {
            phase: 1,
            current,
            total,
            latest_path,
        });
    }

    /// Returns true once the job's cancel token has tripped.
    pub fn is_cancelled(&self) -> bool {
        self.cancel.is_cancelled()
    }
}
