//! Progress streaming: typed events and the job-scoped channel.
//!
//! Each optimization job owns one bounded single-producer/single-consumer
//! event queue. The engine pushes from inside its hot loops, so pushes never
//! block for droppable traffic: when the queue is full the oldest
//! `progress`/`ping` event is evicted to make room, while result-class
//! events wait briefly for the consumer instead. Event order is preserved
//! exactly as produced.
//!
//! With the `serde` feature enabled, events serialize to a tagged record
//! with a `type` discriminator. That format is an external contract
//! consumed by UI clients; field names are stable and case-sensitive.

use std::collections::VecDeque;
use std::sync::{Arc, Condvar, Mutex, MutexGuard};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::path::PathPlacement;

/// A progress event emitted by the optimization pipeline.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(tag = "type", rename_all = "snake_case"))]
pub enum ProgressEvent {
    /// The overlap filter is starting.
    FilterStart {
        /// Number of input paths.
        path_count: usize,
        /// Ink footprint width in mm.
        pen_width: f64,
        /// Visibility threshold in percent.
        visibility_threshold: f64,
    },

    /// The overlap filter finished.
    FilterResult {
        /// Number of input paths.
        original_count: usize,
        /// Number of surviving paths.
        kept_count: usize,
        /// Number of removed paths.
        removed_count: usize,
        /// Original indices of removed paths, ascending.
        removed_indices: Vec<usize>,
        /// Ink footprint width in mm.
        pen_width: f64,
        /// Visibility threshold in percent.
        visibility_threshold: f64,
    },

    /// One greedy placement happened. Throttled and droppable.
    Progress {
        /// Pipeline phase; the greedy orderer is phase 1.
        phase: u32,
        /// Placements made so far.
        current: usize,
        /// Total placements to make.
        total: usize,
        /// The placement just made.
        latest_path: PathPlacement,
    },

    /// The greedy orderer finished.
    GreedyResult {
        /// Number of ordered paths.
        path_count: usize,
        /// One record per placement, in placement order.
        progress_history: Vec<PathPlacement>,
        /// Pen-up travel of the input in its original order.
        original_dist: f64,
        /// Pen-up travel after greedy ordering.
        phase1_dist: f64,
        /// The full greedy ordering.
        paths: Vec<PathPlacement>,
    },

    /// The 2-opt refiner is starting.
    #[cfg_attr(feature = "serde", serde(rename = "twoopt_start"))]
    TwoOptStart,

    /// The 2-opt refiner finished.
    Phase2Result {
        /// Pen-up travel after each improving pass; first entry is the
        /// greedy baseline.
        dist_history: Vec<f64>,
        /// Number of improving passes.
        iterations: usize,
        /// Final pen-up travel.
        final_dist: f64,
        /// Pen-up travel before refinement (greedy baseline).
        original_dist: f64,
        /// The refined ordering.
        paths: Vec<PathPlacement>,
    },

    /// Free-text narration for the UI.
    Log {
        /// Message text.
        msg: String,
    },

    /// The job is over; no further events follow.
    Complete,

    /// Heartbeat. Droppable.
    Ping,
}

impl ProgressEvent {
    /// Returns true for events the channel may drop under pressure.
    ///
    /// Result-class events, log lines and the completion marker are always
    /// delivered.
    pub fn is_droppable(&self) -> bool {
        matches!(self, ProgressEvent::Progress { .. } | ProgressEvent::Ping)
    }
}

struct ChannelState {
    queue: VecDeque<ProgressEvent>,
    sender_alive: bool,
    receiver_alive: bool,
}

struct Shared {
    state: Mutex<ChannelState>,
    not_full: Condvar,
    not_empty: Condvar,
    capacity: usize,
}

impl Shared {
    fn lock(&self) -> MutexGuard<'_, ChannelState> {
        // A poisoned lock only means the peer panicked mid-push/pop; the
        // queue itself is still structurally sound.
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }
}

/// Creates a bounded progress channel for one job.
///
/// `capacity` is clamped to at least 1.
pub fn progress_channel(capacity: usize) -> (ProgressSender, ProgressReceiver) {
    let shared = Arc::new(Shared {
        state: Mutex::new(ChannelState {
            queue: VecDeque::with_capacity(capacity.max(1)),
            sender_alive: true,
            receiver_alive: true,
        }),
        not_full: Condvar::new(),
        not_empty: Condvar::new(),
        capacity: capacity.max(1),
    });
    (
        ProgressSender {
            shared: shared.clone(),
        },
        ProgressReceiver { shared },
    )
}

/// Producer half of the progress channel. Held by the engine.
pub struct ProgressSender {
    shared: Arc<Shared>,
}

impl ProgressSender {
    /// Pushes an event, applying the per-kind drop policy.
    ///
    /// Droppable events never block: under pressure the oldest droppable
    /// event already queued is evicted, and if none exists the incoming
    /// event is discarded instead. Non-droppable events block until the
    /// consumer makes room. Once the receiver is gone every push is a no-op.
    pub fn push(&self, event: ProgressEvent) {
        let mut state = self.shared.lock();
        if !state.receiver_alive {
            return;
        }
        if state.queue.len() >= self.shared.capacity {
            if let Some(pos) = state.queue.iter().position(|e| e.is_droppable()) {
                state.queue.remove(pos);
            } else if event.is_droppable() {
                return;
            } else {
                while state.queue.len() >= self.shared.capacity && state.receiver_alive {
                    state = self
                        .shared
                        .not_full
                        .wait(state)
                        .unwrap_or_else(|e| e.into_inner());
                }
                if !state.receiver_alive {
                    return;
                }
            }
        }
        state.queue.push_back(event);
        self.shared.not_empty.notify_one();
    }

    /// Pushes a log event.
    pub fn log(&self, msg: impl Into<String>) {
        self.push(ProgressEvent::Log { msg: msg.into() });
    }
}

impl Drop for ProgressSender {
    fn drop(&mut self) {
        let mut state = self.shared.lock();
        state.sender_alive = false;
        drop(state);
        self.shared.not_empty.notify_all();
    }
}

/// Consumer half of the progress channel.
pub struct ProgressReceiver {
    shared: Arc<Shared>,
}

impl ProgressReceiver {
    /// Blocks until the next event, or returns `None` once the sender is
    /// gone and the queue is drained.
    pub fn recv(&self) -> Option<ProgressEvent> {
        let mut state = self.shared.lock();
        loop {
            if let Some(event) = state.queue.pop_front() {
                self.shared.not_full.notify_one();
                return Some(event);
            }
            if !state.sender_alive {
                return None;
            }
            state = self
                .shared
                .not_empty
                .wait(state)
                .unwrap_or_else(|e| e.into_inner());
        }
    }

    /// Returns the next event if one is queued.
    pub fn try_recv(&self) -> Option<ProgressEvent> {
        let mut state = self.shared.lock();
        let event = state.queue.pop_front();
        if event.is_some() {
            self.shared.not_full.notify_one();
        }
        event
    }

    /// Blocking iterator over events until the stream closes.
    pub fn iter(&self) -> impl Iterator<Item = ProgressEvent> + '_ {
        std::iter::from_fn(move || self.recv())
    }
}

impl Drop for ProgressReceiver {
    fn drop(&mut self) {
        let mut state = self.shared.lock();
        state.receiver_alive = false;
        drop(state);
        self.shared.not_full.notify_all();
    }
}
