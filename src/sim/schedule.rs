//! Virtual-clock timer queue
//!
//! Stands in for the UI framework's timer dispatch: a periodic spawn tick plus
//! one-shot auto-hide timers, all released in deadline order on one thread.
//! Timers sharing a deadline fire in the order they were scheduled.

use std::cmp::Reverse;
use std::collections::BinaryHeap;
use std::time::Duration;

/// A timer callback to run
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Timer {
    /// Periodic spawn tick
    Tick,
    /// One-shot hide for the given spawn
    AutoHide { spawn_id: u32 },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
struct Deadline {
    at: Duration,
    seq: u64,
    timer: Timer,
}

#[derive(Debug, Clone)]
pub struct Scheduler {
    /// Time of the last released timer, or the horizon once drained
    now: Duration,
    /// Time up to which timers may be released
    horizon: Duration,
    tick_interval: Duration,
    queue: BinaryHeap<Reverse<Deadline>>,
    next_seq: u64,
}

impl Scheduler {
    /// First tick fires one interval after start
    pub fn new(tick_interval: Duration) -> Self {
        let mut scheduler = Self {
            now: Duration::ZERO,
            horizon: Duration::ZERO,
            tick_interval,
            queue: BinaryHeap::new(),
            next_seq: 0,
        };
        scheduler.push(tick_interval, Timer::Tick);
        scheduler
    }

    pub fn now(&self) -> Duration {
        self.now
    }

    pub fn tick_interval(&self) -> Duration {
        self.tick_interval
    }

    /// Number of timers waiting, the periodic tick included
    pub fn pending(&self) -> usize {
        self.queue.len()
    }

    /// Allow timers up to `dt` past the current horizon to be released
    pub fn advance(&mut self, dt: Duration) {
        self.horizon += dt;
    }

    /// Schedule a one-shot timer `delay` after the current time
    pub fn schedule_after(&mut self, delay: Duration, timer: Timer) {
        self.push(self.now + delay, timer);
    }

    /// Release the next timer due within the horizon.
    ///
    /// The clock jumps to that timer's deadline, so anything it schedules is
    /// relative to when it was due rather than when the frame ran. Once
    /// nothing is due the clock catches up with the horizon.
    pub fn next_due(&mut self) -> Option<Timer> {
        let due = matches!(self.queue.peek(), Some(Reverse(d)) if d.at <= self.horizon);
        if !due {
            self.now = self.horizon;
            return None;
        }

        let Reverse(deadline) = self.queue.pop()?;
        self.now = deadline.at;
        if deadline.timer == Timer::Tick {
            // Re-arm from the deadline, not from now, so ticks never drift
            self.push(deadline.at + self.tick_interval, Timer::Tick);
        }
        Some(deadline.timer)
    }

    fn push(&mut self, at: Duration, timer: Timer) {
        let seq = self.next_seq;
        self.next_seq += 1;
        self.queue.push(Reverse(Deadline { at, seq, timer }));
    }
}
