//! Colour-matching door puzzle.
//!
//! A block cycles through a fixed palette, one colour per `color_period`
//! seconds. Stepping onto the trigger footprint freezes the colour showing
//! at that moment; stepping off lets it flow again. If the frozen colour is
//! the target, the door unlock latch trips (once, forever) and the door runs
//! its lowering animation.
//!
//! Within one tick the freeze is evaluated before the unlock check, so the
//! colour captured on the entry frame is the one compared against the target.

use std::fmt;

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::animation::{AnimationConfig, AnimationEvent, InteractionAnimation};
use crate::geometry::{GeometryError, Point2D, Polygon};

fn default_color_period() -> f32 {
    1.0
}

/// Static description of one puzzle + door pair.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PuzzleConfig {
    /// Highlight colours (RGB, 0..1).
    pub palette: Vec<Vec3>,
    /// Palette index that opens the door.
    pub target: usize,
    /// Seconds each colour stays selected.
    #[serde(default = "default_color_period")]
    pub color_period: f32,
    /// Floor area the player stands on to freeze the colour.
    pub trigger: Vec<Point2D>,
    pub door: AnimationConfig,
}

/// Why a puzzle config cannot be built.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PuzzleError {
    /// Trigger footprint is not a usable polygon.
    Trigger(GeometryError),
    /// No colours to cycle through.
    EmptyPalette,
    /// Target is not a palette index.
    TargetOutOfRange { target: usize, palette: usize },
    /// Colour cycle period must be positive.
    NonPositivePeriod(f32),
    /// Door animation duration must be positive.
    NonPositiveDoorDuration(f32),
}

impl fmt::Display for PuzzleError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PuzzleError::Trigger(e) => write!(f, "trigger: {}", e),
            PuzzleError::EmptyPalette => write!(f, "empty palette"),
            PuzzleError::TargetOutOfRange { target, palette } => {
                write!(f, "target {} outside palette of {}", target, palette)
            }
            PuzzleError::NonPositivePeriod(p) => {
                write!(f, "non-positive colour period {}", p)
            }
            PuzzleError::NonPositiveDoorDuration(d) => {
                write!(f, "door has non-positive duration {}", d)
            }
        }
    }
}

impl std::error::Error for PuzzleError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            PuzzleError::Trigger(e) => Some(e),
            _ => None,
        }
    }
}

/// Check a puzzle config, returning all errors found.
pub fn validate_puzzle(config: &PuzzleConfig) -> Vec<PuzzleError> {
    let mut errors = Vec::new();
    if let Err(e) = Polygon::new(config.trigger.clone()) {
        errors.push(PuzzleError::Trigger(e));
    }
    if config.palette.is_empty() {
        errors.push(PuzzleError::EmptyPalette);
    } else if config.target >= config.palette.len() {
        errors.push(PuzzleError::TargetOutOfRange {
            target: config.target,
            palette: config.palette.len(),
        });
    }
    if config.color_period <= 0.0 {
        errors.push(PuzzleError::NonPositivePeriod(config.color_period));
    }
    if config.door.duration <= 0.0 {
        errors.push(PuzzleError::NonPositiveDoorDuration(config.door.duration));
    }
    errors
}

/// Mutable puzzle state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PuzzleState {
    /// Live colour index from the time cycle.
    pub selected: usize,
    /// Colour captured on trigger entry.
    pub frozen: Option<usize>,
    pub flowing: bool,
    /// One-way latch.
    pub unlocked: bool,
}

impl Default for PuzzleState {
    fn default() -> Self {
        Self {
            selected: 0,
            frozen: None,
            flowing: true,
            unlocked: false,
        }
    }
}

/// What changed during one puzzle tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PuzzleStep {
    /// Colour frozen this tick, if any.
    pub froze: Option<usize>,
    /// The latch tripped this tick.
    pub unlocked_now: bool,
    pub door: AnimationEvent,
}

/// Colour index shown at time `now` for a palette of `len` colours.
pub fn cycle_index(now: f32, period: f32, len: usize) -> usize {
    if len == 0 {
        return 0;
    }
    let slot = (now.max(0.0) / period).floor() as usize;
    slot % len
}

/// One puzzle block and the door it controls.
#[derive(Debug, Clone, PartialEq)]
pub struct DoorPuzzle {
    palette: Vec<Vec3>,
    target: usize,
    color_period: f32,
    trigger: Polygon,
    door: InteractionAnimation,
    state: PuzzleState,
}

impl DoorPuzzle {
    /// Build a puzzle, rejecting configs that [`validate_puzzle`] flags.
    pub fn new(config: &PuzzleConfig) -> Result<Self, PuzzleError> {
        if let Some(first) = validate_puzzle(config).into_iter().next() {
            return Err(first);
        }
        Ok(Self {
            palette: config.palette.clone(),
            target: config.target,
            color_period: config.color_period,
            trigger: Polygon::new(config.trigger.clone()).map_err(PuzzleError::Trigger)?,
            door: InteractionAnimation::new(&config.door),
            state: PuzzleState::default(),
        })
    }

    pub fn state(&self) -> &PuzzleState {
        &self.state
    }

    pub fn door(&self) -> &InteractionAnimation {
        &self.door
    }

    pub fn target(&self) -> usize {
        self.target
    }

    pub fn trigger(&self) -> &Polygon {
        &self.trigger
    }

    /// Colour fed to rendering: the frozen colour while frozen or unlocked,
    /// the live one otherwise.
    pub fn highlight(&self) -> Vec3 {
        let index = match self.state.frozen {
            Some(f) if !self.state.flowing || self.state.unlocked => f,
            _ => self.state.selected,
        };
        self.palette[index]
    }

    /// Advance the puzzle to `now` with the player at `player`.
    pub fn update(&mut self, now: f32, player: Vec3) -> PuzzleStep {
        let s = &mut self.state;
        s.selected = cycle_index(now, self.color_period, self.palette.len());

        let on_trigger = self.trigger.contains_position(player);
        let mut froze = None;

        if on_trigger && s.flowing {
            s.frozen = Some(s.selected);
            s.flowing = false;
            froze = s.frozen;
            log::debug!("puzzle colour frozen at index {}", s.selected);
        }
        if !on_trigger && !s.unlocked && !s.flowing {
            s.flowing = true;
            s.frozen = None;
        }

        let mut unlocked_now = false;
        if on_trigger && !self.door.is_moving() && s.frozen == Some(self.target) && !s.unlocked {
            s.unlocked = true;
            unlocked_now = true;
            self.door.begin(now);
            log::info!("door unlocked with colour {}", self.target);
        }

        let door = self.door.update(now);
        if door == AnimationEvent::Finished {
            log::info!("door animation finished");
        }

        PuzzleStep {
            froze,
            unlocked_now,
            door,
        }
    }
}
