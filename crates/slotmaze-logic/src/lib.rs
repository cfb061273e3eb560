//! Pure interaction logic for SlotMaze.
//!
//! This crate contains the gameplay core of the slot-machine maze: movement,
//! containment, lifts and the colour door puzzle. It has no graphics,
//! windowing or input-polling dependency. Functions take plain data and
//! return results; the renderer consumes [`simulation::FrameOutput`] once per
//! frame.
//!
//! # Module Overview
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`animation`] | Ping-pong linear interpolation between two endpoints |
//! | [`camera`] | View direction, view/projection matrices, global uniforms |
//! | [`clock`] | Monotonic time sources and frame delta tracking |
//! | [`geometry`] | Polygons, even-odd point containment |
//! | [`input`] | Logical commands and per-frame input snapshots |
//! | [`level`] | Data-driven level description and validation |
//! | [`locomotion`] | First-person movement constrained to the maze boundary |
//! | [`platform`] | Platforms, nearest-platform lookup, lift state machine |
//! | [`puzzle`] | Colour cycle, freeze/flow, unlock latch, door |
//! | [`scene`] | Per-object model matrices and highlight colours |
//! | [`simulation`] | Top-level state and the per-frame tick |

pub mod animation;
pub mod camera;
pub mod clock;
pub mod geometry;
pub mod input;
pub mod level;
pub mod locomotion;
pub mod platform;
pub mod puzzle;
pub mod scene;
pub mod simulation;
