//! Scenario tests for the full per-frame pipeline.
//!
//! Exercises: LevelConfig → Simulation → tick (locomotion → lifts → puzzle)
//! → FrameOutput
//!
//! All tests are pure logic with injected time. No window, no GPU.

use glam::Vec3;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use slotmaze_logic::clock::ManualClock;
use slotmaze_logic::input::{Command, InputSnapshot};
use slotmaze_logic::level::LevelConfig;
use slotmaze_logic::locomotion::{PlayerState, StepOutcome};
use slotmaze_logic::simulation::{FrameOutput, SimEvent, Simulation};

// ── Helpers ────────────────────────────────────────────────────────────

const FRAME: f32 = 1.0 / 60.0;

fn default_sim() -> Simulation {
    Simulation::new(&LevelConfig::default()).unwrap()
}

fn puzzle_sim(target: usize) -> Simulation {
    let mut config = LevelConfig::default();
    config.puzzles[0].target = target;
    Simulation::new(&config).unwrap()
}

fn teleport(sim: &mut Simulation, position: Vec3, yaw: f32) {
    sim.set_player(PlayerState::new(position, yaw));
}

/// Hold `input` for `secs` at 60 fps, collecting every event.
fn hold(
    sim: &mut Simulation,
    clock: &mut ManualClock,
    input: InputSnapshot,
    secs: f32,
) -> Vec<SimEvent> {
    let frames = (secs / FRAME).round() as usize;
    let mut events = Vec::new();
    for _ in 0..frames {
        clock.advance(FRAME);
        let out = sim.tick_with(clock, &input);
        events.extend(out.events);
    }
    events
}

fn count(events: &[SimEvent], pred: impl Fn(&SimEvent) -> bool) -> usize {
    events.iter().filter(|e| pred(e)).count()
}

fn door_height(out: &FrameOutput) -> f32 {
    out.object("door")
        .unwrap()
        .model
        .transform_point3(Vec3::ZERO)
        .y
}

const ON_TRIGGER: Vec3 = Vec3::new(-26.0, 1.0, 33.0);
const OFF_TRIGGER: Vec3 = Vec3::new(-26.0, 1.0, 28.0);

// ── Door puzzle end to end ─────────────────────────────────────────────

#[test]
fn matching_colour_opens_door_once() {
    let mut sim = puzzle_sim(2);
    let palette = LevelConfig::default().puzzles[0].palette.clone();

    teleport(&mut sim, OFF_TRIGGER, 0.0);
    let out = sim.tick(0.0, &InputSnapshot::none());
    assert_eq!(door_height(&out), 0.0);

    // t = 2.0 → selected colour 2, player steps on the trigger.
    teleport(&mut sim, ON_TRIGGER, 0.0);
    let out = sim.tick(2.0, &InputSnapshot::none());
    assert!(out.events.contains(&SimEvent::ColorFrozen { puzzle: 0, color: 2 }));
    assert!(out.events.contains(&SimEvent::DoorUnlocked { puzzle: 0 }));
    let state = *sim.puzzles()[0].state();
    assert_eq!(state.frozen, Some(2));
    assert!(!state.flowing);
    assert!(state.unlocked);
    assert_eq!(out.object("int_block").unwrap().highlight, Some(palette[2]));

    // Halfway down.
    let out = sim.tick(3.0, &InputSnapshot::none());
    assert!((door_height(&out) + 4.0).abs() < 1e-4);

    // t = 4.0 → animation complete.
    let out = sim.tick(4.0, &InputSnapshot::none());
    assert!(out.events.contains(&SimEvent::DoorFinished { puzzle: 0 }));
    assert_eq!(door_height(&out), -8.0);
    assert!(sim.puzzles()[0].state().unlocked);

    // Leave and come back on the same colour: nothing restarts.
    teleport(&mut sim, OFF_TRIGGER, 0.0);
    sim.tick(5.0, &InputSnapshot::none());
    teleport(&mut sim, ON_TRIGGER, 0.0);
    let out = sim.tick(7.0, &InputSnapshot::none());
    let restarted = count(&out.events, |e| {
        matches!(e, SimEvent::DoorUnlocked { .. } | SimEvent::ColorFrozen { .. })
    });
    assert_eq!(restarted, 0);
    assert!(!sim.puzzles()[0].door().is_moving());
    assert_eq!(door_height(&out), -8.0);
    assert_eq!(out.object("int_block").unwrap().highlight, Some(palette[2]));
}

#[test]
fn wrong_colour_then_retry() {
    let mut sim = puzzle_sim(2);
    teleport(&mut sim, ON_TRIGGER, 0.0);
    let out = sim.tick(1.5, &InputSnapshot::none());
    assert!(out.events.contains(&SimEvent::ColorFrozen { puzzle: 0, color: 1 }));
    assert!(!sim.puzzles()[0].state().unlocked);

    // Standing still keeps colour 1 frozen even as the cycle moves on.
    let out = sim.tick(2.5, &InputSnapshot::none());
    assert!(out.events.is_empty());
    assert_eq!(sim.puzzles()[0].state().frozen, Some(1));

    teleport(&mut sim, OFF_TRIGGER, 0.0);
    sim.tick(6.2, &InputSnapshot::none());
    assert!(sim.puzzles()[0].state().flowing);

    teleport(&mut sim, ON_TRIGGER, 0.0);
    let out = sim.tick(7.2, &InputSnapshot::none());
    assert!(out.events.contains(&SimEvent::DoorUnlocked { puzzle: 0 }));
}

// ── Walking the maze ───────────────────────────────────────────────────

#[test]
fn walk_from_spawn_to_trigger() {
    let mut sim = default_sim();
    let mut clock = ManualClock::default();
    // Yaw 0: Back is +z, MoveLeft is -x.
    let spawn = sim.player().position;
    teleport(&mut sim, spawn, 0.0);

    let back = InputSnapshot::none().with(Command::MoveBack);
    let left = InputSnapshot::none().with(Command::MoveLeft);

    let mut events = hold(&mut sim, &mut clock, back, 33.0 / 6.75);
    events.extend(hold(&mut sim, &mut clock, left, 28.0 / 6.75));
    events.extend(hold(&mut sim, &mut clock, back, 25.0 / 6.75));
    events.extend(hold(&mut sim, &mut clock, left, 9.0 / 6.75));

    assert_eq!(count(&events, |e| *e == SimEvent::MoveBlocked), 0);
    let p = sim.player().position;
    assert!((p - Vec3::new(-26.0, 1.0, 33.0)).length() < 0.3, "ended at {p:?}");
    assert_eq!(
        count(&events, |e| matches!(e, SimEvent::ColorFrozen { .. })),
        1
    );
    assert!(!sim.puzzles()[0].state().flowing);
}

#[test]
fn wall_stops_walk() {
    let mut sim = default_sim();
    let mut clock = ManualClock::default();
    let spawn = sim.player().position;
    teleport(&mut sim, spawn, 0.0);

    // Heading -x at z = -25 runs into the start room's west wall at x = -4.
    let left = InputSnapshot::none().with(Command::MoveLeft);
    let events = hold(&mut sim, &mut clock, left, 4.0);
    assert!(count(&events, |e| *e == SimEvent::MoveBlocked) > 0);
    let p = sim.player().position;
    assert!(p.x >= -4.0 && p.x < -3.8, "x={}", p.x);
    assert_eq!(p.z, -25.0);
}

#[test]
fn random_walk_never_leaves_boundary() {
    let mut sim = default_sim();
    let mut clock = ManualClock::default();
    let mut rng = StdRng::seed_from_u64(2024);
    let movers = [
        Command::MoveForward,
        Command::MoveBack,
        Command::MoveLeft,
        Command::MoveRight,
        Command::RotateLeft,
        Command::RotateRight,
    ];
    for _ in 0..5000 {
        let input: InputSnapshot = movers
            .into_iter()
            .filter(|_| rng.gen_bool(0.3))
            .collect();
        clock.advance(rng.gen_range(0.005..0.05));
        let before = sim.player().position;
        let out = sim.tick_with(&mut clock, &input);
        assert!(sim.boundary().contains_position(sim.player().position));
        if out.movement == StepOutcome::Blocked {
            assert_eq!(sim.player().position, before);
        }
    }
}

#[test]
fn diagonal_speed_is_unnormalized() {
    // Forward + strafe held together cover ~1.41x the single-axis distance.
    let mut sim = default_sim();
    teleport(&mut sim, Vec3::new(6.0, 1.0, -10.0), 0.0);
    sim.tick(0.0, &InputSnapshot::none());
    let diag = InputSnapshot::none()
        .with(Command::MoveForward)
        .with(Command::MoveRight);
    sim.tick(1.0, &diag);
    let moved = sim.player().position - Vec3::new(6.0, 1.0, -10.0);
    assert!((moved.length() - 6.75 * std::f32::consts::SQRT_2).abs() < 1e-3);
}

// ── Lift ride ──────────────────────────────────────────────────────────

#[test]
fn ride_lift_up_and_back_down() {
    let mut sim = default_sim();
    let mut clock = ManualClock::default();
    teleport(&mut sim, Vec3::new(0.5, 1.0, 0.5), 0.0);
    sim.tick_with(&mut clock, &InputSnapshot::none());

    let press = InputSnapshot::none().with(Command::Interact);
    let mut events = hold(&mut sim, &mut clock, press, FRAME);
    events.extend(hold(&mut sim, &mut clock, InputSnapshot::none(), 2.5));
    assert_eq!(count(&events, |e| matches!(e, SimEvent::LiftStarted { .. })), 1);
    assert_eq!(count(&events, |e| matches!(e, SimEvent::LiftFinished { .. })), 1);
    let top = sim.player().position.y;
    assert!((top - 10.9).abs() < 0.3, "top={top}");

    events = hold(&mut sim, &mut clock, press, FRAME);
    events.extend(hold(&mut sim, &mut clock, InputSnapshot::none(), 2.5));
    assert_eq!(count(&events, |e| matches!(e, SimEvent::LiftFinished { .. })), 1);
    let bottom = sim.player().position.y;
    assert!((bottom - 1.0).abs() < 0.3, "bottom={bottom}");
    assert_eq!(sim.lifts()[0].position().y, -1.9);
}

#[test]
fn interact_from_far_side_uses_second_platform() {
    let mut sim = default_sim();
    teleport(&mut sim, Vec3::new(-17.0, 1.0, 13.0), 0.0);
    let out = sim.tick(0.5, &InputSnapshot::none().with(Command::Interact));
    assert_eq!(out.nearest_platform, Some(1));
    assert!(out
        .events
        .contains(&SimEvent::LiftStarted { lift: 0, platform: 1 }));
}
