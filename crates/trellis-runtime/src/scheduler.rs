//! Virtual-clock scheduler for timeouts and next-frame callbacks.
//!
//! The clock only moves when the host advances it, which keeps every delayed
//! behaviour (exit animations, toast expiry, deferred focus) deterministic.
//!
//! # Example
//!
//! ```
//! use std::time::Duration;
//! use trellis_runtime::{Owner, Scheduler, WidgetKey};
//!
//! let mut scheduler = Scheduler::new(Duration::from_millis(16));
//! let owner = Owner::Widget(WidgetKey(1));
//! let handle = scheduler.set_timeout(owner, Duration::from_millis(200), "hide");
//!
//! let until = scheduler.now() + Duration::from_millis(250);
//! let fired = scheduler.pop_due(until).unwrap();
//! assert_eq!(fired.handle, handle);
//! assert_eq!(fired.task, "hide");
//! scheduler.settle(until);
//! ```

use std::time::Duration;

use indexmap::IndexMap;

use crate::owner::Owner;

/// Handle to a scheduled callback. Never reused, so cancelling a handle that
/// already fired is a harmless no-op.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimerHandle(u64);

/// How a callback was scheduled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerKind {
    /// Fixed delay (`setTimeout`).
    Timeout,
    /// Next paint opportunity (`requestAnimationFrame`).
    Frame,
}

#[derive(Debug)]
struct Timer<T> {
    owner: Owner,
    deadline: Duration,
    kind: TimerKind,
    task: T,
}

/// A callback that came due.
#[derive(Debug)]
pub struct Fired<T> {
    pub handle: TimerHandle,
    pub owner: Owner,
    pub kind: TimerKind,
    pub deadline: Duration,
    pub task: T,
}

/// Single-threaded scheduler over a virtual clock.
#[derive(Debug)]
pub struct Scheduler<T> {
    now: Duration,
    frame_interval: Duration,
    next_id: u64,
    timers: IndexMap<TimerHandle, Timer<T>>,
}

impl<T> Scheduler<T> {
    pub fn new(frame_interval: Duration) -> Self {
        Self {
            now: Duration::ZERO,
            frame_interval: frame_interval.max(Duration::from_millis(1)),
            next_id: 1,
            timers: IndexMap::new(),
        }
    }

    /// Time elapsed since the page started.
    pub fn now(&self) -> Duration {
        self.now
    }

    pub fn frame_interval(&self) -> Duration {
        self.frame_interval
    }

    /// Schedule `task` to fire after `delay`. Deadlines past the end of the
    /// clock clamp to `Duration::MAX`.
    pub fn set_timeout(&mut self, owner: Owner, delay: Duration, task: T) -> TimerHandle {
        let deadline = self.now.saturating_add(delay);
        self.insert(owner, deadline, TimerKind::Timeout, task)
    }

    /// Schedule `task` for the next frame boundary strictly after now.
    pub fn request_frame(&mut self, owner: Owner, task: T) -> TimerHandle {
        let deadline = self.next_frame_boundary();
        self.insert(owner, deadline, TimerKind::Frame, task)
    }

    fn insert(&mut self, owner: Owner, deadline: Duration, kind: TimerKind, task: T) -> TimerHandle {
        let handle = TimerHandle(self.next_id);
        self.next_id += 1;
        self.timers.insert(handle, Timer { owner, deadline, kind, task });
        handle
    }

    fn next_frame_boundary(&self) -> Duration {
        let interval = self.frame_interval.as_nanos();
        let frames = self.now.as_nanos() / interval + 1;
        let nanos = frames * interval;
        u64::try_from(nanos / 1_000_000_000).map_or(Duration::MAX, |secs| {
            Duration::new(secs, (nanos % 1_000_000_000) as u32)
        })
    }

    /// Cancel a pending callback. Returns whether anything was cancelled.
    pub fn cancel(&mut self, handle: TimerHandle) -> bool {
        self.timers.shift_remove(&handle).is_some()
    }

    /// Cancel every callback belonging to `owner`.
    pub fn cancel_owned(&mut self, owner: Owner) -> usize {
        let before = self.timers.len();
        self.timers.retain(|_, timer| timer.owner != owner);
        before - self.timers.len()
    }

    pub fn is_pending(&self, handle: TimerHandle) -> bool {
        self.timers.contains_key(&handle)
    }

    pub fn pending(&self) -> usize {
        self.timers.len()
    }

    pub fn pending_for(&self, owner: Owner) -> usize {
        self.timers.values().filter(|t| t.owner == owner).count()
    }

    /// Remaining time until `handle` fires.
    pub fn remaining(&self, handle: TimerHandle) -> Option<Duration> {
        self.timers
            .get(&handle)
            .map(|t| t.deadline.saturating_sub(self.now))
    }

    /// Pop the earliest callback due at or before `until`, moving the clock to
    /// its deadline. Ties fire in scheduling order. Callbacks scheduled while
    /// draining are picked up by later calls.
    pub fn pop_due(&mut self, until: Duration) -> Option<Fired<T>> {
        let (index, _) = self
            .timers
            .iter()
            .enumerate()
            .filter(|(_, (_, timer))| timer.deadline <= until)
            .min_by_key(|(_, (handle, timer))| (timer.deadline, **handle))?;
        let (handle, timer) = self.timers.shift_remove_index(index)?;
        self.now = self.now.max(timer.deadline);
        Some(Fired {
            handle,
            owner: timer.owner,
            kind: timer.kind,
            deadline: timer.deadline,
            task: timer.task,
        })
    }

    /// Move the clock forward to `until` once everything due has been popped.
    pub fn settle(&mut self, until: Duration) {
        self.now = self.now.max(until);
    }
}
