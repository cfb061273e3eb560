//! Frame time sources.
//!
//! The simulation is driven by a monotonic elapsed-seconds value sampled once
//! per tick. [`SystemClock`] reads the wall clock; [`ManualClock`] is advanced
//! explicitly by tests and the headless harness.

use std::time::Instant;

/// A monotonic source of elapsed seconds since some fixed start.
pub trait Clock {
    fn elapsed_secs(&mut self) -> f32;
}

/// Wall-clock time since construction.
#[derive(Debug, Clone, Copy)]
pub struct SystemClock {
    start: Instant,
}

impl SystemClock {
    pub fn new() -> Self {
        Self {
            start: Instant::now(),
        }
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for SystemClock {
    fn elapsed_secs(&mut self) -> f32 {
        self.start.elapsed().as_secs_f32()
    }
}

/// Injected time for deterministic runs.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ManualClock {
    now: f32,
}

impl ManualClock {
    pub fn new(now: f32) -> Self {
        Self { now }
    }

    pub fn advance(&mut self, secs: f32) {
        self.now += secs;
    }

    pub fn set(&mut self, now: f32) {
        self.now = now;
    }
}

impl Clock for ManualClock {
    fn elapsed_secs(&mut self) -> f32 {
        self.now
    }
}

/// Turns absolute time samples into per-frame deltas.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct FrameTimer {
    last: f32,
}

impl FrameTimer {
    /// Record `now` and return the time since the previous sample.
    ///
    /// The first sample is measured against time zero. A sample earlier than
    /// the previous one yields a zero delta and does not move the timer back.
    pub fn sample(&mut self, now: f32) -> f32 {
        if now < self.last {
            return 0.0;
        }
        let delta = now - self.last;
        self.last = now;
        delta
    }

    pub fn last(&self) -> f32 {
        self.last
    }
}
