//! Camera parameters handed to the renderer.
//!
//! The player pose stays as yaw/pitch/roll in the simulation; this module
//! turns it into the matrices and vectors the global uniform block expects.

use glam::{Mat4, Vec3, Vec4};
use serde::{Deserialize, Serialize};

use crate::locomotion::PlayerState;

/// Projection and lighting settings.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    /// Vertical field of view in degrees.
    pub fov_deg: f32,
    /// Viewport width / height.
    pub aspect: f32,
    pub near: f32,
    pub far: f32,
    /// Head-lamp spotlight: inner cone, outer cone, decay, exponent.
    pub spot_cone: Vec4,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            fov_deg: 45.0,
            aspect: 1024.0 / 768.0,
            near: 0.1,
            far: 150.0,
            spot_cone: Vec4::new(0.0, 0.3, 2.0, 2.0),
        }
    }
}

/// Unit look direction for a yaw/pitch pair.
pub fn view_direction(yaw: f32, pitch: f32) -> Vec3 {
    Vec3::new(yaw.cos() * pitch.cos(), pitch.sin(), yaw.sin() * pitch.cos()).normalize()
}

/// World-to-view matrix looking along the player's yaw/pitch/roll.
pub fn look_in_direction(position: Vec3, yaw: f32, pitch: f32, roll: f32) -> Mat4 {
    Mat4::from_rotation_z(-roll)
        * Mat4::from_rotation_x(-pitch)
        * Mat4::from_rotation_y(-yaw)
        * Mat4::from_translation(-position)
}

/// Perspective projection with Y flipped for a top-left-origin viewport.
pub fn projection(config: &CameraConfig) -> Mat4 {
    let mut proj = Mat4::perspective_rh_gl(
        config.fov_deg.to_radians(),
        config.aspect,
        config.near,
        config.far,
    );
    proj.y_axis.y *= -1.0;
    proj
}

/// Camera state for one frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraView {
    pub position: Vec3,
    pub yaw: f32,
    pub pitch: f32,
    pub roll: f32,
    pub direction: Vec3,
    pub view: Mat4,
}

impl CameraView {
    pub fn from_player(player: &PlayerState) -> Self {
        Self {
            position: player.position,
            yaw: player.yaw,
            pitch: player.pitch,
            roll: player.roll,
            direction: view_direction(player.yaw, player.pitch),
            view: look_in_direction(player.position, player.yaw, player.pitch, player.roll),
        }
    }
}

/// Per-frame global uniform block.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GlobalUniforms {
    pub view: Mat4,
    pub proj: Mat4,
    /// Fractional part of the elapsed time, for shader effects.
    pub time: f32,
    pub eye_pos: Vec3,
    pub cone_in_out_decay_exp: Vec4,
    pub camera_dir: Vec3,
}

impl GlobalUniforms {
    pub fn new(camera: &CameraView, config: &CameraConfig, time: f32) -> Self {
        Self {
            view: camera.view,
            proj: projection(config),
            time: time.fract(),
            eye_pos: camera.position,
            cone_in_out_decay_exp: config.spot_cone,
            camera_dir: camera.direction,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::FRAC_PI_2;

    fn close(a: Vec3, b: Vec3) -> bool {
        (a - b).length() < 1e-5
    }

    #[test]
    fn direction_axes() {
        assert!(close(view_direction(0.0, 0.0), Vec3::X));
        assert!(close(view_direction(FRAC_PI_2, 0.0), Vec3::Z));
        assert!(close(view_direction(0.3, FRAC_PI_2), Vec3::Y));
    }

    #[test]
    fn view_moves_eye_to_origin() {
        let eye = Vec3::new(11.0, 1.0, -25.0);
        let view = look_in_direction(eye, 3.0, 0.2, -0.1);
        assert!(close(view.transform_point3(eye), Vec3::ZERO));
    }

    #[test]
    fn zero_angles_view_is_translation() {
        let view = look_in_direction(Vec3::new(1.0, 2.0, 3.0), 0.0, 0.0, 0.0);
        assert!(close(view.transform_point3(Vec3::new(1.0, 2.0, 2.0)), Vec3::new(0.0, 0.0, -1.0)));
    }

    #[test]
    fn projection_flips_y() {
        let config = CameraConfig::default();
        let flipped = projection(&config);
        let plain = Mat4::perspective_rh_gl(45f32.to_radians(), config.aspect, 0.1, 150.0);
        assert_eq!(flipped.y_axis.y, -plain.y_axis.y);
        assert_eq!(flipped.x_axis, plain.x_axis);
    }

    #[test]
    fn globals_use_fractional_time() {
        let player = PlayerState::new(Vec3::new(0.0, 1.0, 0.0), 0.0);
        let cam = CameraView::from_player(&player);
        let g = GlobalUniforms::new(&cam, &CameraConfig::default(), 12.25);
        assert!((g.time - 0.25).abs() < 1e-6);
        assert_eq!(g.eye_pos, player.position);
        assert_eq!(g.cone_in_out_decay_exp, Vec4::new(0.0, 0.3, 2.0, 2.0));
    }
}
