//! Lifts and the platforms they carry.
//!
//! A [`Lift`] is a ping-pong vertical animation started by the interact
//! command. Each [`Platform`] belongs to one lift and has a floor footprint;
//! while the lift runs, a player standing on the footprint of the nearest
//! platform rides along.
//!
//! | State | Interact | Tick |
//! |-------|----------|------|
//! | `Idle` | start animation → `Animating` | nothing |
//! | `Animating` | ignored | interpolate; at duration snap, swap ends → `Idle` |

use glam::{Vec2, Vec3};
use serde::{Deserialize, Serialize};

use crate::animation::{AnimationConfig, AnimationEvent, InteractionAnimation};
use crate::geometry::{floor_point, Polygon};

/// A standable platform, static after level load.
#[derive(Debug, Clone, PartialEq)]
pub struct Platform {
    /// Owning lift.
    pub lift: usize,
    /// Floor extent used for "is the player standing on it".
    pub footprint: Polygon,
    /// Defining point for nearest-platform lookup.
    pub center: Vec2,
    /// Model placement on the floor plane; height comes from the lift.
    pub anchor: Vec2,
}

impl Platform {
    pub fn is_standing_on(&self, position: Vec3) -> bool {
        self.footprint.contains_position(position)
    }

    /// World translation of the platform model for the given lift height.
    pub fn translation(&self, lift_height: f32) -> Vec3 {
        Vec3::new(self.anchor.x, lift_height, self.anchor.y)
    }
}

/// Index of the platform whose defining point is closest to `position` on
/// the floor plane. Ties go to the lower index.
pub fn nearest_platform(platforms: &[Platform], position: Vec3) -> Option<usize> {
    let here = floor_point(position);
    let mut best: Option<(usize, f32)> = None;
    for (i, p) in platforms.iter().enumerate() {
        let d = here.distance_squared(p.center);
        match best {
            Some((_, bd)) if bd <= d => {}
            _ => best = Some((i, d)),
        }
    }
    best.map(|(i, _)| i)
}

/// How the interact command starts a lift.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InteractTrigger {
    /// Only the frame the command goes from released to pressed.
    #[default]
    Edge,
    /// Every frame the command is held (an idle lift restarts immediately).
    Held,
}

/// Tracks the previous interact state for edge detection.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct InteractLatch {
    was_down: bool,
}

impl InteractLatch {
    /// Whether this frame's interact state should fire.
    pub fn fire(&mut self, down: bool, mode: InteractTrigger) -> bool {
        let rising = down && !self.was_down;
        self.was_down = down;
        match mode {
            InteractTrigger::Edge => rising,
            InteractTrigger::Held => down,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LiftState {
    Idle,
    Animating,
}

/// Outcome of one lift tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LiftStep {
    pub event: AnimationEvent,
    /// Vertical offset to apply to a riding player this frame.
    pub rise: f32,
}

/// One lift: a ping-pong animation carrying any number of platforms.
#[derive(Debug, Clone, PartialEq)]
pub struct Lift {
    animation: InteractionAnimation,
}

impl Lift {
    pub fn new(config: &AnimationConfig) -> Self {
        Self {
            animation: InteractionAnimation::new(config),
        }
    }

    pub fn state(&self) -> LiftState {
        if self.animation.is_moving() {
            LiftState::Animating
        } else {
            LiftState::Idle
        }
    }

    pub fn animation(&self) -> &InteractionAnimation {
        &self.animation
    }

    /// Current lift position.
    pub fn position(&self) -> Vec3 {
        self.animation.current()
    }

    /// `Idle → Animating`. Returns `false` when already animating.
    pub fn trigger(&mut self, now: f32) -> bool {
        self.animation.begin(now)
    }

    /// Advance to `now`. `riding` says whether the player stands on one of
    /// this lift's platforms; the returned `rise` is non-zero only while the
    /// transition is still in progress.
    pub fn update(&mut self, now: f32, delta: f32, riding: bool) -> LiftStep {
        // Velocity must be read before a finishing update swaps the ends.
        let velocity = self.animation.vertical_velocity();
        let event = self.animation.update(now);
        let rise = if event == AnimationEvent::InProgress && riding {
            velocity * delta
        } else {
            0.0
        };
        LiftStep { event, rise }
    }
}
