#![forbid(unsafe_code)]

//! Frame scheduler: the per-frame callback queue, as an injected capability.
//!
//! Effects do not call a platform frame timer. They hand a job to a
//! [`FrameScheduler`] and the host drains due jobs once per frame with
//! [`FrameScheduler::drain_due`]. Jobs requested while a drained batch is
//! being processed land in the queue and run on the following frame, which
//! gives strict frame-to-frame ordering for a self-rescheduling job.
//!
//! # Invariants
//!
//! 1. A job requested with [`request_frame`](FrameScheduler::request_frame)
//!    is returned by the next `drain_due`, whatever `now` is.
//! 2. A job requested with [`request_at`](FrameScheduler::request_at) is
//!    returned by the first `drain_due` whose `now >= due`.
//! 3. Within one drain, jobs are ordered by due time, then request order.
//! 4. A cancelled job is never returned.

use std::fmt;
use std::time::Duration;

/// Handle for a pending job, usable for cancellation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FrameHandle(u64);

/// Per-frame job queue.
pub trait FrameScheduler<J> {
    /// Run `job` on the next frame.
    fn request_frame(&mut self, job: J) -> FrameHandle;

    /// Run `job` on the first frame at or after `due`.
    fn request_at(&mut self, due: Duration, job: J) -> FrameHandle;

    /// Cancel a pending job. Returns `false` if it already ran or was cancelled.
    fn cancel(&mut self, handle: FrameHandle) -> bool;

    /// Remove and return every job due at `now`, in dispatch order.
    fn drain_due(&mut self, now: Duration) -> Vec<J>;

    /// Number of pending jobs.
    fn pending(&self) -> usize;

    /// Earliest `request_at` deadline still pending, if any.
    fn next_deadline(&self) -> Option<Duration>;
}

struct Entry<J> {
    handle: FrameHandle,
    /// `None` = next frame.
    due: Option<Duration>,
    job: J,
}

/// Default [`FrameScheduler`]: a flat list scanned once per frame.
///
/// Effect workloads keep at most a few jobs per target pending, so a linear
/// scan beats maintaining a heap.
pub struct FrameQueue<J> {
    entries: Vec<Entry<J>>,
    next_handle: u64,
}

impl<J> fmt::Debug for FrameQueue<J> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FrameQueue")
            .field("pending", &self.entries.len())
            .field("next_deadline", &self.next_deadline())
            .finish()
    }
}

impl<J> FrameQueue<J> {
    /// Create an empty queue.
    #[must_use]
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
            next_handle: 0,
        }
    }

    fn push(&mut self, due: Option<Duration>, job: J) -> FrameHandle {
        let handle = FrameHandle(self.next_handle);
        self.next_handle += 1;
        self.entries.push(Entry { handle, due, job });
        handle
    }

    /// Whether any job is waiting for the next frame.
    #[must_use]
    pub fn has_frame_request(&self) -> bool {
        self.entries.iter().any(|e| e.due.is_none())
    }
}

impl<J> Default for FrameQueue<J> {
    fn default() -> Self {
        Self::new()
    }
}

impl<J> FrameScheduler<J> for FrameQueue<J> {
    fn request_frame(&mut self, job: J) -> FrameHandle {
        self.push(None, job)
    }

    fn request_at(&mut self, due: Duration, job: J) -> FrameHandle {
        self.push(Some(due), job)
    }

    fn cancel(&mut self, handle: FrameHandle) -> bool {
        let before = self.entries.len();
        self.entries.retain(|e| e.handle != handle);
        self.entries.len() < before
    }

    fn drain_due(&mut self, now: Duration) -> Vec<J> {
        let (mut ready, waiting): (Vec<_>, Vec<_>) = std::mem::take(&mut self.entries)
            .into_iter()
            .partition(|e| e.due.is_none_or(|due| due <= now));
        self.entries = waiting;
        ready.sort_by_key(|e| (e.due.unwrap_or(now), e.handle));
        ready.into_iter().map(|e| e.job).collect()
    }

    fn pending(&self) -> usize {
        self.entries.len()
    }

    fn next_deadline(&self) -> Option<Duration> {
        self.entries.iter().filter_map(|e| e.due).min()
    }
}
