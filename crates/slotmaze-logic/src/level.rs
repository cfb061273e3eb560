//! Level description. One data-driven config per scene variant.
//!
//! A [`LevelConfig`] lists the maze boundary, the player spawn, every lift,
//! platform and puzzle, and the scene objects the renderer draws. Geometry is
//! kept as raw vertex lists so that [`validate_level`] can report every
//! problem in one pass instead of failing on the first bad polygon.
//!
//! `LevelConfig::default()` is the slot-machine maze demo scene.

use std::fmt;

use glam::{Vec2, Vec3};
use serde::{Deserialize, Serialize};

use crate::animation::AnimationConfig;
use crate::camera::CameraConfig;
use crate::geometry::{GeometryError, Point2D, Polygon};
use crate::locomotion::LocomotionConfig;
use crate::platform::{InteractTrigger, Platform};
use crate::puzzle::{validate_puzzle, PuzzleConfig, PuzzleError};
use crate::scene::{SceneObjectConfig, SceneObjectKind};

/// Player start pose.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SpawnConfig {
    pub position: Vec3,
    #[serde(default)]
    pub yaw: f32,
}

/// A lift: the motion shared by all of its platforms.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LiftConfig {
    pub name: String,
    pub motion: AnimationConfig,
}

/// A platform carried by a lift.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlatformConfig {
    pub lift: usize,
    pub footprint: Vec<Point2D>,
    /// Model placement (x, z). The lift supplies the height.
    pub anchor: Vec2,
    /// Point used for nearest-platform lookup; footprint centroid if absent.
    #[serde(default)]
    pub center: Option<Vec2>,
}

impl PlatformConfig {
    pub fn build(&self) -> Result<Platform, GeometryError> {
        let footprint = Polygon::new(self.footprint.clone())?;
        let center = self.center.unwrap_or_else(|| footprint.centroid());
        Ok(Platform {
            lift: self.lift,
            footprint,
            center,
            anchor: self.anchor,
        })
    }
}

/// Complete level description.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LevelConfig {
    pub name: String,
    /// Walkable floor area (x, z).
    pub boundary: Vec<Point2D>,
    pub spawn: SpawnConfig,
    #[serde(default)]
    pub locomotion: LocomotionConfig,
    #[serde(default)]
    pub interact_trigger: InteractTrigger,
    #[serde(default)]
    pub camera: CameraConfig,
    #[serde(default)]
    pub lifts: Vec<LiftConfig>,
    #[serde(default)]
    pub platforms: Vec<PlatformConfig>,
    #[serde(default)]
    pub puzzles: Vec<PuzzleConfig>,
    #[serde(default)]
    pub objects: Vec<SceneObjectConfig>,
}

fn square(x: f32, z: f32, half: f32) -> Vec<Point2D> {
    vec![
        Vec2::new(x - half, z - half),
        Vec2::new(x + half, z - half),
        Vec2::new(x + half, z + half),
        Vec2::new(x - half, z + half),
    ]
}

impl Default for LevelConfig {
    fn default() -> Self {
        Self {
            name: "slot-maze".into(),
            // Start room, corridor north-west to the second platform, puzzle room.
            boundary: vec![
                Vec2::new(-32.0, 40.0),
                Vec2::new(-32.0, 26.0),
                Vec2::new(-22.0, 26.0),
                Vec2::new(-22.0, 6.0),
                Vec2::new(-4.0, 6.0),
                Vec2::new(-4.0, -32.0),
                Vec2::new(16.0, -32.0),
                Vec2::new(16.0, 10.0),
                Vec2::new(-12.0, 10.0),
                Vec2::new(-12.0, 40.0),
            ],
            spawn: SpawnConfig {
                position: Vec3::new(11.0, 1.0, -25.0),
                yaw: 3.0,
            },
            locomotion: LocomotionConfig::default(),
            interact_trigger: InteractTrigger::default(),
            camera: CameraConfig::default(),
            lifts: vec![LiftConfig {
                name: "handle".into(),
                motion: AnimationConfig {
                    start: Vec3::new(0.0, -1.9, 0.1),
                    end: Vec3::new(0.0, 8.0, 0.1),
                    duration: 2.0,
                },
            }],
            platforms: vec![
                PlatformConfig {
                    lift: 0,
                    footprint: square(0.0, 0.1, 2.0),
                    anchor: Vec2::new(0.0, 0.1),
                    center: None,
                },
                PlatformConfig {
                    lift: 0,
                    footprint: square(-17.9, 12.0, 2.0),
                    anchor: Vec2::new(-17.9, 12.0),
                    center: None,
                },
            ],
            puzzles: vec![PuzzleConfig {
                palette: vec![
                    Vec3::new(1.0, 0.0, 0.0),
                    Vec3::new(0.0, 1.0, 0.0),
                    Vec3::new(0.0, 0.0, 1.0),
                    Vec3::new(0.0, 0.5, 1.0),
                    Vec3::new(0.4, 0.1, 1.0),
                ],
                target: 0,
                color_period: 1.0,
                trigger: square(-26.0, 33.0, 1.0),
                door: AnimationConfig {
                    start: Vec3::ZERO,
                    end: Vec3::new(0.0, -8.0, 0.0),
                    duration: 2.0,
                },
            }],
            objects: vec![
                SceneObjectConfig {
                    name: "cave".into(),
                    kind: SceneObjectKind::Static {
                        translation: Vec3::ZERO,
                        scale: Vec3::ONE,
                    },
                },
                SceneObjectConfig {
                    name: "handle".into(),
                    kind: SceneObjectKind::Platform { platform: 0 },
                },
                SceneObjectConfig {
                    name: "handle2".into(),
                    kind: SceneObjectKind::Platform { platform: 1 },
                },
                SceneObjectConfig {
                    name: "int_block".into(),
                    kind: SceneObjectKind::PuzzleBlock {
                        puzzle: 0,
                        translation: Vec3::new(-26.0, -1.8, 33.0),
                        scale: Vec3::splat(0.5),
                    },
                },
                SceneObjectConfig {
                    name: "door".into(),
                    kind: SceneObjectKind::Door { puzzle: 0 },
                },
                SceneObjectConfig {
                    name: "hint".into(),
                    kind: SceneObjectKind::Static {
                        translation: Vec3::ZERO,
                        scale: Vec3::ONE,
                    },
                },
            ],
        }
    }
}

/// Level validation error.
#[derive(Debug, Clone, PartialEq)]
pub enum LevelError {
    /// Maze boundary is not a usable polygon.
    Boundary(GeometryError),
    /// A platform footprint is not a usable polygon.
    PlatformFootprint {
        platform: usize,
        source: GeometryError,
    },
    /// A puzzle cannot be built.
    Puzzle { puzzle: usize, source: PuzzleError },
    /// Platform refers to a lift that does not exist.
    UnknownLift { platform: usize, lift: usize },
    /// Scene object refers to a platform that does not exist.
    UnknownPlatform { object: String, platform: usize },
    /// Scene object refers to a puzzle that does not exist.
    UnknownPuzzle { object: String, puzzle: usize },
    /// A lift with zero or negative travel time.
    NonPositiveLiftDuration { lift: usize, duration: f32 },
    /// The player would start outside the boundary.
    SpawnOutsideBoundary { position: Vec3 },
}

impl fmt::Display for LevelError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LevelError::Boundary(e) => write!(f, "boundary: {}", e),
            LevelError::PlatformFootprint { platform, source } => {
                write!(f, "platform #{} footprint: {}", platform, source)
            }
            LevelError::Puzzle { puzzle, source } => write!(f, "puzzle #{}: {}", puzzle, source),
            LevelError::UnknownLift { platform, lift } => {
                write!(f, "platform #{} references missing lift #{}", platform, lift)
            }
            LevelError::UnknownPlatform { object, platform } => {
                write!(f, "object '{}' references missing platform #{}", object, platform)
            }
            LevelError::UnknownPuzzle { object, puzzle } => {
                write!(f, "object '{}' references missing puzzle #{}", object, puzzle)
            }
            LevelError::NonPositiveLiftDuration { lift, duration } => {
                write!(f, "lift #{} has non-positive duration {}", lift, duration)
            }
            LevelError::SpawnOutsideBoundary { position } => write!(
                f,
                "spawn ({:.2}, {:.2}, {:.2}) is outside the boundary",
                position.x, position.y, position.z
            ),
        }
    }
}

impl std::error::Error for LevelError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            LevelError::Boundary(e) | LevelError::PlatformFootprint { source: e, .. } => Some(e),
            LevelError::Puzzle { source, .. } => Some(source),
            _ => None,
        }
    }
}

/// Validate a level, returning all errors found.
pub fn validate_level(config: &LevelConfig) -> Vec<LevelError> {
    let mut errors = Vec::new();

    match Polygon::new(config.boundary.clone()) {
        Ok(boundary) => {
            if !boundary.contains_position(config.spawn.position) {
                errors.push(LevelError::SpawnOutsideBoundary {
                    position: config.spawn.position,
                });
            }
        }
        Err(e) => errors.push(LevelError::Boundary(e)),
    }

    for (i, lift) in config.lifts.iter().enumerate() {
        if lift.motion.duration <= 0.0 {
            errors.push(LevelError::NonPositiveLiftDuration {
                lift: i,
                duration: lift.motion.duration,
            });
        }
    }

    for (i, p) in config.platforms.iter().enumerate() {
        if let Err(e) = Polygon::new(p.footprint.clone()) {
            errors.push(LevelError::PlatformFootprint {
                platform: i,
                source: e,
            });
        }
        if p.lift >= config.lifts.len() {
            errors.push(LevelError::UnknownLift {
                platform: i,
                lift: p.lift,
            });
        }
    }

    for (i, pz) in config.puzzles.iter().enumerate() {
        errors.extend(
            validate_puzzle(pz)
                .into_iter()
                .map(|source| LevelError::Puzzle { puzzle: i, source }),
        );
    }

    for obj in &config.objects {
        match obj.kind {
            SceneObjectKind::Platform { platform } if platform >= config.platforms.len() => {
                errors.push(LevelError::UnknownPlatform {
                    object: obj.name.clone(),
                    platform,
                });
            }
            SceneObjectKind::Door { puzzle } | SceneObjectKind::PuzzleBlock { puzzle, .. }
                if puzzle >= config.puzzles.len() =>
            {
                errors.push(LevelError::UnknownPuzzle {
                    object: obj.name.clone(),
                    puzzle,
                });
            }
            _ => {}
        }
    }

    errors
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_level_is_valid() {
        let errors = validate_level(&LevelConfig::default());
        assert!(errors.is_empty(), "Expected no errors, got: {:?}", errors);
    }

    #[test]
    fn default_level_landmarks_inside_boundary() {
        let config = LevelConfig::default();
        let boundary = Polygon::new(config.boundary.clone()).unwrap();
        for p in &config.platforms {
            assert!(boundary.contains(p.build().unwrap().center));
        }
        for pz in &config.puzzles {
            let trigger = Polygon::new(pz.trigger.clone()).unwrap();
            assert!(boundary.contains(trigger.centroid()));
        }
    }

    #[test]
    fn degenerate_boundary() {
        let mut config = LevelConfig::default();
        config.boundary.truncate(2);
        let errors = validate_level(&config);
        assert!(matches!(errors[0], LevelError::Boundary(_)));
        assert!(errors[0].to_string().contains("at least 3"));
    }

    #[test]
    fn spawn_outside() {
        let mut config = LevelConfig::default();
        config.spawn.position = Vec3::new(100.0, 0.0, 100.0);
        assert!(validate_level(&config)
            .iter()
            .any(|e| matches!(e, LevelError::SpawnOutsideBoundary { .. })));
    }

    #[test]
    fn bad_references() {
        let mut config = LevelConfig::default();
        config.platforms[1].lift = 7;
        config.objects.push(SceneObjectConfig {
            name: "ghost".into(),
            kind: SceneObjectKind::Platform { platform: 9 },
        });
        config.objects.push(SceneObjectConfig {
            name: "phantom_door".into(),
            kind: SceneObjectKind::Door { puzzle: 3 },
        });
        let errors = validate_level(&config);
        assert!(errors.contains(&LevelError::UnknownLift {
            platform: 1,
            lift: 7
        }));
        assert!(errors.contains(&LevelError::UnknownPlatform {
            object: "ghost".into(),
            platform: 9
        }));
        assert!(errors.contains(&LevelError::UnknownPuzzle {
            object: "phantom_door".into(),
            puzzle: 3
        }));
    }

    #[test]
    fn puzzle_errors() {
        let mut config = LevelConfig::default();
        config.puzzles[0].target = 5;
        config.puzzles[0].color_period = 0.0;
        config.puzzles[0].door.duration = -1.0;
        let dup = config.puzzles[0].trigger[3];
        config.puzzles[0].trigger.push(dup);
        let errors = validate_level(&config);
        let sources: Vec<PuzzleError> = errors
            .iter()
            .filter_map(|e| match e {
                LevelError::Puzzle { puzzle: 0, source } => Some(*source),
                _ => None,
            })
            .collect();
        assert_eq!(sources.len(), 4, "{:?}", errors);
        assert!(matches!(sources[0], PuzzleError::Trigger(_)));
        assert!(sources.contains(&PuzzleError::TargetOutOfRange {
            target: 5,
            palette: 5
        }));
        assert!(sources.contains(&PuzzleError::NonPositivePeriod(0.0)));
        assert!(sources.contains(&PuzzleError::NonPositiveDoorDuration(-1.0)));

        config.puzzles[0].palette.clear();
        assert!(validate_level(&config).contains(&LevelError::Puzzle {
            puzzle: 0,
            source: PuzzleError::EmptyPalette
        }));
    }

    #[test]
    fn puzzle_error_keeps_source() {
        use std::error::Error;
        let e = LevelError::Puzzle {
            puzzle: 2,
            source: PuzzleError::EmptyPalette,
        };
        assert_eq!(e.to_string(), "puzzle #2: empty palette");
        assert!(e.source().is_some());
    }

    #[test]
    fn lift_duration_and_footprint() {
        let mut config = LevelConfig::default();
        config.lifts[0].motion.duration = 0.0;
        config.platforms[0].footprint.clear();
        let errors = validate_level(&config);
        assert_eq!(errors.len(), 2, "{:?}", errors);
        assert_eq!(
            errors[0],
            LevelError::NonPositiveLiftDuration {
                lift: 0,
                duration: 0.0
            }
        );
        assert_eq!(errors[0].to_string(), "lift #0 has non-positive duration 0");
        assert!(matches!(
            errors[1],
            LevelError::PlatformFootprint { platform: 0, .. }
        ));
    }

    #[test]
    fn platform_center_defaults_to_centroid() {
        let config = LevelConfig::default();
        let p = config.platforms[1].build().unwrap();
        assert!((p.center - Vec2::new(-17.9, 12.0)).length() < 1e-4);

        let mut custom = config.platforms[1].clone();
        custom.center = Some(Vec2::new(-18.0, 11.0));
        assert_eq!(custom.build().unwrap().center, Vec2::new(-18.0, 11.0));
    }

    #[test]
    fn minimal_json_uses_defaults() {
        let json = r#"{
            "name": "box",
            "boundary": [[0.0, 0.0], [10.0, 0.0], [10.0, 10.0], [0.0, 10.0]],
            "spawn": {"position": [5.0, 1.0, 5.0]}
        }"#;
        let config: LevelConfig = serde_json::from_str(json).unwrap();
        assert_eq!(config.locomotion, LocomotionConfig::default());
        assert_eq!(config.interact_trigger, InteractTrigger::Edge);
        assert_eq!(config.spawn.yaw, 0.0);
        assert!(config.lifts.is_empty());
        assert!(validate_level(&config).is_empty());
    }
}
