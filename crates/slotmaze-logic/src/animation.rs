//! Ping-pong linear animation between two endpoints.
//!
//! Shared by lifts and doors. An animation is started at an absolute time,
//! then sampled with later times; once `duration` has elapsed it snaps to its
//! end point and swaps the endpoints so the next run goes back the other way.

use glam::Vec3;
use serde::{Deserialize, Serialize};

/// Endpoints and timing for an interactive object's motion.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AnimationConfig {
    pub start: Vec3,
    pub end: Vec3,
    /// Seconds for one full transition.
    pub duration: f32,
}

/// Result of advancing an animation by one frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AnimationEvent {
    /// Not running.
    Idle,
    /// Still interpolating.
    InProgress,
    /// Reached its end this frame; endpoints have been swapped.
    Finished,
}

/// A single ping-pong transition and its current sample.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct InteractionAnimation {
    start: Vec3,
    end: Vec3,
    current: Vec3,
    duration: f32,
    moving: bool,
    started_at: f32,
    elapsed: f32,
}

impl InteractionAnimation {
    pub fn new(config: &AnimationConfig) -> Self {
        Self {
            start: config.start,
            end: config.end,
            current: config.start,
            duration: config.duration,
            moving: false,
            started_at: 0.0,
            elapsed: 0.0,
        }
    }

    pub fn start(&self) -> Vec3 {
        self.start
    }

    pub fn end(&self) -> Vec3 {
        self.end
    }

    pub fn current(&self) -> Vec3 {
        self.current
    }

    pub fn duration(&self) -> f32 {
        self.duration
    }

    pub fn is_moving(&self) -> bool {
        self.moving
    }

    /// Seconds since the running transition began (0 when idle).
    pub fn elapsed(&self) -> f32 {
        self.elapsed
    }

    /// Vertical speed of the running transition, in units per second.
    pub fn vertical_velocity(&self) -> f32 {
        (self.end.y - self.start.y) / self.duration
    }

    /// Position at `t` seconds into the transition.
    pub fn sample(&self, t: f32) -> Vec3 {
        let f = t.clamp(0.0, self.duration) / self.duration;
        self.start + (self.end - self.start) * f
    }

    /// Begin a transition at absolute time `now`. Returns `false` (and does
    /// nothing) if one is already running.
    pub fn begin(&mut self, now: f32) -> bool {
        if self.moving {
            return false;
        }
        self.moving = true;
        self.started_at = now;
        self.elapsed = 0.0;
        self.current = self.start;
        true
    }

    /// Re-sample at absolute time `now`.
    pub fn update(&mut self, now: f32) -> AnimationEvent {
        if !self.moving {
            return AnimationEvent::Idle;
        }
        self.elapsed = (now - self.started_at).max(0.0);
        if self.elapsed >= self.duration {
            self.current = self.end;
            self.moving = false;
            self.elapsed = 0.0;
            std::mem::swap(&mut self.start, &mut self.end);
            return AnimationEvent::Finished;
        }
        self.current = self.sample(self.elapsed);
        AnimationEvent::InProgress
    }
}
