//! Scene objects and their per-frame model data.
//!
//! Each object in a level is one of a few kinds; the kind decides where its
//! model matrix comes from (fixed, a lift, a door) and whether it carries a
//! highlight colour.

use glam::{Mat4, Vec3};
use serde::{Deserialize, Serialize};

use crate::platform::{Lift, Platform};
use crate::puzzle::DoorPuzzle;

fn unit_scale() -> Vec3 {
    Vec3::ONE
}

/// Where an object's transform comes from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SceneObjectKind {
    /// Fixed placement.
    Static {
        #[serde(default)]
        translation: Vec3,
        #[serde(default = "unit_scale")]
        scale: Vec3,
    },
    /// Follows the height of the platform's lift.
    Platform { platform: usize },
    /// Follows a puzzle's door animation.
    Door { puzzle: usize },
    /// Fixed placement, shows the puzzle's highlight colour.
    PuzzleBlock {
        puzzle: usize,
        translation: Vec3,
        #[serde(default = "unit_scale")]
        scale: Vec3,
    },
}

/// A named object in the level.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SceneObjectConfig {
    pub name: String,
    #[serde(flatten)]
    pub kind: SceneObjectKind,
}

/// Per-object data for one frame.
#[derive(Debug, Clone, PartialEq)]
pub struct ObjectFrame {
    pub name: String,
    pub model: Mat4,
    pub highlight: Option<Vec3>,
}

fn translate_scale(translation: Vec3, scale: Vec3) -> Mat4 {
    Mat4::from_translation(translation) * Mat4::from_scale(scale)
}

/// Build the model data for every object. References were checked when the
/// level was loaded.
pub fn frame_objects(
    objects: &[SceneObjectConfig],
    platforms: &[Platform],
    lifts: &[Lift],
    puzzles: &[DoorPuzzle],
) -> Vec<ObjectFrame> {
    objects
        .iter()
        .map(|obj| {
            let (model, highlight) = match &obj.kind {
                SceneObjectKind::Static { translation, scale } => {
                    (translate_scale(*translation, *scale), None)
                }
                SceneObjectKind::Platform { platform } => {
                    let p = &platforms[*platform];
                    let height = lifts[p.lift].position().y;
                    (Mat4::from_translation(p.translation(height)), None)
                }
                SceneObjectKind::Door { puzzle } => (
                    Mat4::from_translation(puzzles[*puzzle].door().current()),
                    None,
                ),
                SceneObjectKind::PuzzleBlock {
                    puzzle,
                    translation,
                    scale,
                } => (
                    translate_scale(*translation, *scale),
                    Some(puzzles[*puzzle].highlight()),
                ),
            };
            ObjectFrame {
                name: obj.name.clone(),
                model,
                highlight,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn static_translate_then_scale() {
        let objects = vec![SceneObjectConfig {
            name: "block".into(),
            kind: SceneObjectKind::Static {
                translation: Vec3::new(-26.0, -1.8, 33.0),
                scale: Vec3::splat(0.5),
            },
        }];
        let frames = frame_objects(&objects, &[], &[], &[]);
        let p = frames[0].model.transform_point3(Vec3::new(2.0, 0.0, 0.0));
        assert!((p - Vec3::new(-25.0, -1.8, 33.0)).length() < 1e-5);
        assert_eq!(frames[0].highlight, None);
    }

    #[test]
    fn parse_tagged_objects() {
        let json = r#"[
            {"name": "cave", "kind": "static"},
            {"name": "handle2", "kind": "platform", "platform": 1},
            {"name": "door", "kind": "door", "puzzle": 0},
            {"name": "block", "kind": "puzzle_block", "puzzle": 0,
             "translation": [-26.0, -1.8, 33.0], "scale": [0.5, 0.5, 0.5]}
        ]"#;
        let objects: Vec<SceneObjectConfig> = serde_json::from_str(json).unwrap();
        assert_eq!(objects.len(), 4);
        assert_eq!(
            objects[0].kind,
            SceneObjectKind::Static {
                translation: Vec3::ZERO,
                scale: Vec3::ONE
            }
        );
        assert_eq!(objects[1].kind, SceneObjectKind::Platform { platform: 1 });
        assert!(matches!(
            objects[3].kind,
            SceneObjectKind::PuzzleBlock { puzzle: 0, .. }
        ));
    }
}
