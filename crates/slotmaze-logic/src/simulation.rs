//! Top-level simulation state and the per-frame tick.
//!
//! [`Simulation`] owns everything that changes between frames: the player,
//! every lift and puzzle, and the frame timer. One call to
//! [`Simulation::tick`] per rendered frame, in order, advances all of it.
//!
//! Tick order:
//! 1. Frame delta from the time sample
//! 2. Locomotion (rotation, movement, boundary check)
//! 3. Nearest-platform lookup
//! 4. Interact → start the nearest platform's lift
//! 5. Lift animation, carrying a player standing on the nearest platform
//! 6. Puzzle freeze/unlock and door animation
//! 7. Camera, global uniforms and per-object output

use crate::animation::AnimationEvent;
use crate::camera::{CameraConfig, CameraView, GlobalUniforms};
use crate::clock::{Clock, FrameTimer};
use crate::geometry::Polygon;
use crate::input::{Command, InputSnapshot};
use crate::level::{validate_level, LevelConfig, LevelError};
use crate::locomotion::{self, LocomotionConfig, PlayerState, StepOutcome};
use crate::platform::{nearest_platform, InteractLatch, InteractTrigger, Lift, Platform};
use crate::puzzle::DoorPuzzle;
use crate::scene::{frame_objects, ObjectFrame, SceneObjectConfig};

/// Notable state changes during a tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SimEvent {
    MoveBlocked,
    LiftStarted { lift: usize, platform: usize },
    LiftFinished { lift: usize },
    ColorFrozen { puzzle: usize, color: usize },
    DoorUnlocked { puzzle: usize },
    DoorFinished { puzzle: usize },
}

/// Everything the renderer needs for one frame.
#[derive(Debug, Clone, PartialEq)]
pub struct FrameOutput {
    pub time: f32,
    pub delta: f32,
    pub camera: CameraView,
    pub globals: GlobalUniforms,
    pub objects: Vec<ObjectFrame>,
    pub nearest_platform: Option<usize>,
    pub movement: StepOutcome,
    pub events: Vec<SimEvent>,
}

impl FrameOutput {
    pub fn object(&self, name: &str) -> Option<&ObjectFrame> {
        self.objects.iter().find(|o| o.name == name)
    }
}

pub struct Simulation {
    boundary: Polygon,
    locomotion: LocomotionConfig,
    interact_trigger: InteractTrigger,
    camera: CameraConfig,
    objects: Vec<SceneObjectConfig>,
    platforms: Vec<Platform>,
    player: PlayerState,
    lifts: Vec<Lift>,
    puzzles: Vec<DoorPuzzle>,
    interact: InteractLatch,
    timer: FrameTimer,
    nearest: Option<usize>,
}

impl Simulation {
    /// Build a simulation from a level, rejecting it if validation fails.
    pub fn new(config: &LevelConfig) -> Result<Self, LevelError> {
        if let Some(first) = validate_level(config).into_iter().next() {
            return Err(first);
        }

        let boundary = Polygon::new(config.boundary.clone()).map_err(LevelError::Boundary)?;
        let platforms = config
            .platforms
            .iter()
            .enumerate()
            .map(|(i, p)| {
                p.build().map_err(|source| LevelError::PlatformFootprint {
                    platform: i,
                    source,
                })
            })
            .collect::<Result<Vec<_>, _>>()?;
        let puzzles = config
            .puzzles
            .iter()
            .enumerate()
            .map(|(i, p)| {
                DoorPuzzle::new(p).map_err(|source| LevelError::Puzzle { puzzle: i, source })
            })
            .collect::<Result<Vec<_>, _>>()?;

        log::info!(
            "level '{}' loaded: {} lifts, {} platforms, {} puzzles, {} objects",
            config.name,
            config.lifts.len(),
            platforms.len(),
            puzzles.len(),
            config.objects.len()
        );

        Ok(Self {
            boundary,
            locomotion: config.locomotion,
            interact_trigger: config.interact_trigger,
            camera: config.camera,
            objects: config.objects.clone(),
            platforms,
            player: PlayerState::new(config.spawn.position, config.spawn.yaw),
            lifts: config.lifts.iter().map(|l| Lift::new(&l.motion)).collect(),
            puzzles,
            interact: InteractLatch::default(),
            timer: FrameTimer::default(),
            nearest: None,
        })
    }

    pub fn player(&self) -> &PlayerState {
        &self.player
    }

    /// Teleport/re-orient the player. Not checked against the boundary.
    pub fn set_player(&mut self, player: PlayerState) {
        self.player = player;
    }

    pub fn lifts(&self) -> &[Lift] {
        &self.lifts
    }

    pub fn platforms(&self) -> &[Platform] {
        &self.platforms
    }

    pub fn puzzles(&self) -> &[DoorPuzzle] {
        &self.puzzles
    }

    pub fn boundary(&self) -> &Polygon {
        &self.boundary
    }

    /// Time of the latest tick.
    pub fn time(&self) -> f32 {
        self.timer.last()
    }

    /// Sample `clock` and tick.
    pub fn tick_with<C: Clock>(&mut self, clock: &mut C, input: &InputSnapshot) -> FrameOutput {
        let now = clock.elapsed_secs();
        self.tick(now, input)
    }

    /// Advance one frame to absolute time `now` (seconds since start).
    pub fn tick(&mut self, now: f32, input: &InputSnapshot) -> FrameOutput {
        let delta = self.timer.sample(now);
        let now = self.timer.last();
        let mut events = Vec::new();

        let movement =
            locomotion::step(&mut self.player, input, delta, &self.locomotion, &self.boundary);
        if movement == StepOutcome::Blocked {
            events.push(SimEvent::MoveBlocked);
        }

        let nearest = nearest_platform(&self.platforms, self.player.position);
        if nearest != self.nearest {
            log::debug!("nearest platform now {:?}", nearest);
        }
        self.nearest = nearest;

        let fire = self
            .interact
            .fire(input.is_active(Command::Interact), self.interact_trigger);
        if fire {
            if let Some(i) = self.nearest {
                let lift = self.platforms[i].lift;
                if self.lifts[lift].trigger(now) {
                    log::info!("lift {} started from nearest platform {}", lift, i);
                    events.push(SimEvent::LiftStarted { lift, platform: i });
                }
            }
        }

        let riding_lift = self
            .nearest
            .map(|i| &self.platforms[i])
            .filter(|p| p.is_standing_on(self.player.position))
            .map(|p| p.lift);
        for (i, lift) in self.lifts.iter_mut().enumerate() {
            let step = lift.update(now, delta, riding_lift == Some(i));
            self.player.position.y += step.rise;
            if step.event == AnimationEvent::Finished {
                log::info!("lift {} finished at height {:.2}", i, lift.position().y);
                events.push(SimEvent::LiftFinished { lift: i });
            }
        }

        for (i, puzzle) in self.puzzles.iter_mut().enumerate() {
            let step = puzzle.update(now, self.player.position);
            if let Some(color) = step.froze {
                events.push(SimEvent::ColorFrozen { puzzle: i, color });
            }
            if step.unlocked_now {
                events.push(SimEvent::DoorUnlocked { puzzle: i });
            }
            if step.door == AnimationEvent::Finished {
                events.push(SimEvent::DoorFinished { puzzle: i });
            }
        }

        let camera = CameraView::from_player(&self.player);
        let globals = GlobalUniforms::new(&camera, &self.camera, now);
        let objects = frame_objects(&self.objects, &self.platforms, &self.lifts, &self.puzzles);

        FrameOutput {
            time: now,
            delta,
            camera,
            globals,
            objects,
            nearest_platform: self.nearest,
            movement,
            events,
        }
    }
}
