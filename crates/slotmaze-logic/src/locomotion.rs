//! First-person locomotion: rotation, yaw-relative movement and the boundary check.
//!
//! Algorithm: "rotate, move, validate"
//! 1. Apply every active rotation command to yaw/pitch/roll
//! 2. Sum the active movement commands along the (new) yaw-rotated axes,
//!    plus world-vertical movement
//! 3. Test the candidate's floor projection against the level boundary
//! 4. Outside → restore the pre-tick position (rotation is kept)

use glam::{Quat, Vec3};
use serde::{Deserialize, Serialize};

use crate::geometry::Polygon;
use crate::input::{Command, InputSnapshot};

/// Player camera pose. Orientation stays as three independent angles until
/// render time.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PlayerState {
    pub position: Vec3,
    pub yaw: f32,
    pub pitch: f32,
    pub roll: f32,
}

impl PlayerState {
    pub fn new(position: Vec3, yaw: f32) -> Self {
        Self {
            position,
            yaw,
            pitch: 0.0,
            roll: 0.0,
        }
    }

    /// Local +X (strafe right) on the floor plane for the current yaw.
    pub fn right(&self) -> Vec3 {
        Quat::from_rotation_y(self.yaw) * Vec3::X
    }

    /// Local +Z (backwards) on the floor plane for the current yaw.
    pub fn back(&self) -> Vec3 {
        Quat::from_rotation_y(self.yaw) * Vec3::Z
    }
}

/// Movement tuning.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LocomotionConfig {
    /// Radians per second for every rotation command.
    pub rot_speed: f32,
    /// World units per second for every movement command.
    pub move_speed: f32,
    /// Scale combined horizontal input to unit length. Off by default, so
    /// forward+strafe is faster than either alone.
    pub normalize_diagonal: bool,
}

impl Default for LocomotionConfig {
    fn default() -> Self {
        Self {
            rot_speed: 90f32.to_radians(),
            move_speed: 6.75,
            normalize_diagonal: false,
        }
    }
}

/// What happened to the position this frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum StepOutcome {
    /// No movement command was active.
    Idle,
    /// The candidate position was inside the boundary and was accepted.
    Moved,
    /// The candidate left the boundary; position unchanged.
    Blocked,
}

fn axis(input: &InputSnapshot, positive: Command, negative: Command) -> f32 {
    let mut v = 0.0;
    if input.is_active(positive) {
        v += 1.0;
    }
    if input.is_active(negative) {
        v -= 1.0;
    }
    v
}

/// Apply active rotation commands only.
pub fn rotate(player: &mut PlayerState, input: &InputSnapshot, delta: f32, rot_speed: f32) {
    let step = delta * rot_speed;
    player.yaw += axis(input, Command::RotateLeft, Command::RotateRight) * step;
    player.pitch += axis(input, Command::RotateUp, Command::RotateDown) * step;
    player.roll += axis(input, Command::RollRight, Command::RollLeft) * step;
}

/// Displacement requested by the movement commands for this frame.
pub fn displacement(
    player: &PlayerState,
    input: &InputSnapshot,
    delta: f32,
    config: &LocomotionConfig,
) -> Vec3 {
    let strafe = axis(input, Command::MoveRight, Command::MoveLeft);
    let backward = axis(input, Command::MoveBack, Command::MoveForward);
    let vertical = axis(input, Command::MoveUp, Command::MoveDown);

    let mut horizontal = player.right() * strafe + player.back() * backward;
    if config.normalize_diagonal {
        horizontal = horizontal.normalize_or_zero();
    }
    (horizontal + Vec3::Y * vertical) * config.move_speed * delta
}

/// Advance the player by one frame, keeping its floor position inside
/// `boundary`.
pub fn step(
    player: &mut PlayerState,
    input: &InputSnapshot,
    delta: f32,
    config: &LocomotionConfig,
    boundary: &Polygon,
) -> StepOutcome {
    rotate(player, input, delta, config.rot_speed);

    let offset = displacement(player, input, delta, config);
    if offset == Vec3::ZERO {
        return StepOutcome::Idle;
    }

    let candidate = player.position + offset;
    if !boundary.contains_position(candidate) {
        log::debug!(
            "move blocked at ({:.2}, {:.2}, {:.2})",
            candidate.x,
            candidate.y,
            candidate.z
        );
        return StepOutcome::Blocked;
    }
    player.position = candidate;
    StepOutcome::Moved
}
