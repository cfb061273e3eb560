//! SlotMaze Headless Simulation Harness
//!
//! Loads a level, then drives the interaction logic with scripted and
//! randomised input against an injected clock. No window, no GPU, no
//! wall-clock time.
//!
//! Usage:
//!   cargo run -p slotmaze-simtest
//!   cargo run -p slotmaze-simtest -- --verbose
//!   cargo run -p slotmaze-simtest -- --level path/to/level.json --seed 7

use glam::Vec3;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use slotmaze_logic::clock::ManualClock;
use slotmaze_logic::geometry::{floor_point, Polygon};
use slotmaze_logic::input::{Command, InputSnapshot};
use slotmaze_logic::level::{validate_level, LevelConfig};
use slotmaze_logic::locomotion::{PlayerState, StepOutcome};
use slotmaze_logic::puzzle::cycle_index;
use slotmaze_logic::simulation::{SimEvent, Simulation};

// ── Bundled level (used unless --level is given) ────────────────────────
const LEVEL_JSON: &str = include_str!("../../../data/level.json");

const FRAME: f32 = 1.0 / 60.0;

// ── Test harness ────────────────────────────────────────────────────────

struct TestResult {
    name: String,
    passed: bool,
    detail: String,
}

fn check(name: &str, passed: bool, detail: String) -> TestResult {
    TestResult {
        name: name.into(),
        passed,
        detail,
    }
}

struct Options {
    verbose: bool,
    level: Option<String>,
    seed: u64,
}

impl Options {
    fn from_args() -> Self {
        let args: Vec<String> = std::env::args().collect();
        let value_of = |flag: &str| {
            args.iter()
                .position(|a| a == flag)
                .and_then(|i| args.get(i + 1))
                .cloned()
        };
        Self {
            verbose: args.iter().any(|a| a == "--verbose"),
            level: value_of("--level"),
            seed: value_of("--seed")
                .and_then(|s| s.parse().ok())
                .unwrap_or(0x5107),
        }
    }
}

fn init_logging(verbose: bool) {
    let mut builder = env_logger::Builder::new();
    if let Ok(filter) = std::env::var("RUST_LOG") {
        builder.parse_filters(&filter);
    } else if verbose {
        builder.filter_level(log::LevelFilter::Debug);
    } else {
        builder.filter_level(log::LevelFilter::Warn);
    }
    builder.init();
    log::debug!("logging initialized");
}

fn main() {
    let opts = Options::from_args();
    init_logging(opts.verbose);
    println!("=== SlotMaze Simulation Harness ===\n");

    let mut results = Vec::new();

    // 1. Level parsing & validation
    let (level_results, level) = validate_level_config(&opts);
    results.extend(level_results);

    if let Some(level) = level {
        // 2. Boundary containment
        results.extend(validate_containment(&level, opts.verbose));

        // 3. Locomotion
        results.extend(validate_locomotion(&level, opts.verbose));

        // 4. Scripted walk through the default maze
        results.extend(validate_default_walk(opts.verbose));

        // 5. Lifts and riding
        results.extend(validate_lifts(&level, opts.verbose));

        // 6. Door puzzles
        results.extend(validate_puzzles(&level, opts.verbose));

        // 7. Randomised input
        results.extend(validate_random_walk(&level, opts.seed, opts.verbose));
    }

    // ── Summary ──
    println!();
    let passed = results.iter().filter(|r| r.passed).count();
    let failed = results.iter().filter(|r| !r.passed).count();
    let total = results.len();

    for r in &results {
        let icon = if r.passed { "✓" } else { "✗" };
        if !r.passed || opts.verbose {
            println!("  {} {}: {}", icon, r.name, r.detail);
        }
    }

    println!(
        "\n=== RESULT: {}/{} passed, {} failed ===",
        passed, total, failed
    );

    if failed > 0 {
        std::process::exit(1);
    }
}

// ── Helpers ─────────────────────────────────────────────────────────────

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
        events.extend(sim.tick_with(clock, &input).events);
    }
    events
}

fn on_floor(point: glam::Vec2, height: f32) -> Vec3 {
    Vec3::new(point.x, height, point.y)
}

// ── 1. Level ────────────────────────────────────────────────────────────

fn validate_level_config(opts: &Options) -> (Vec<TestResult>, Option<LevelConfig>) {
    println!("--- Level ---");
    let mut results = Vec::new();

    let (source, json) = match &opts.level {
        Some(path) => match std::fs::read_to_string(path) {
            Ok(json) => (path.clone(), json),
            Err(e) => {
                results.push(check(
                    "level_read",
                    false,
                    format!("cannot read {}: {}", path, e),
                ));
                return (results, None);
            }
        },
        None => ("bundled level.json".to_string(), LEVEL_JSON.to_string()),
    };

    let level: LevelConfig = match serde_json::from_str(&json) {
        Ok(l) => l,
        Err(e) => {
            results.push(check(
                "level_parse",
                false,
                format!("{}: JSON parse error: {}", source, e),
            ));
            return (results, None);
        }
    };
    results.push(check(
        "level_parse",
        true,
        format!(
            "'{}' from {}: {} lifts, {} platforms, {} puzzles, {} objects",
            level.name,
            source,
            level.lifts.len(),
            level.platforms.len(),
            level.puzzles.len(),
            level.objects.len()
        ),
    ));

    let errors = validate_level(&level);
    results.push(check(
        "level_valid",
        errors.is_empty(),
        if errors.is_empty() {
            "no validation errors".into()
        } else {
            errors
                .iter()
                .map(|e| e.to_string())
                .collect::<Vec<_>>()
                .join("; ")
        },
    ));

    let default_errors = validate_level(&LevelConfig::default());
    results.push(check(
        "default_level_valid",
        default_errors.is_empty(),
        format!("{} errors in built-in level", default_errors.len()),
    ));

    // A level round-trips through JSON without loss.
    let roundtrip = serde_json::to_string(&level)
        .ok()
        .and_then(|s| serde_json::from_str::<LevelConfig>(&s).ok());
    results.push(check(
        "level_roundtrip",
        roundtrip.as_ref() == Some(&level),
        "serialise → parse preserves the level".into(),
    ));

    if !errors.is_empty() {
        return (results, None);
    }

    if opts.verbose {
        println!(
            "  spawn {:?} yaw {:.2}, trigger mode {:?}",
            level.spawn.position, level.spawn.yaw, level.interact_trigger
        );
    }

    (results, Some(level))
}

// ── 2. Containment ──────────────────────────────────────────────────────

fn validate_containment(level: &LevelConfig, verbose: bool) -> Vec<TestResult> {
    println!("--- Containment ---");
    let mut results = Vec::new();

    let boundary = match Polygon::new(level.boundary.clone()) {
        Ok(b) => b,
        Err(e) => {
            results.push(check("boundary_polygon", false, e.to_string()));
            return results;
        }
    };

    results.push(check(
        "spawn_inside",
        boundary.contains_position(level.spawn.position),
        format!("spawn at {:?}", level.spawn.position),
    ));

    let stray_platforms: Vec<usize> = level
        .platforms
        .iter()
        .enumerate()
        .filter_map(|(i, p)| p.build().ok().map(|built| (i, built)))
        .filter(|(_, p)| !boundary.contains(p.center))
        .map(|(i, _)| i)
        .collect();
    results.push(check(
        "platforms_inside",
        stray_platforms.is_empty(),
        if stray_platforms.is_empty() {
            format!("all {} platform centres reachable", level.platforms.len())
        } else {
            format!("platforms outside boundary: {:?}", stray_platforms)
        },
    ));

    let stray_triggers: Vec<usize> = level
        .puzzles
        .iter()
        .enumerate()
        .filter(|(_, pz)| {
            Polygon::new(pz.trigger.clone())
                .map(|t| !boundary.contains(t.centroid()))
                .unwrap_or(true)
        })
        .map(|(i, _)| i)
        .collect();
    results.push(check(
        "triggers_inside",
        stray_triggers.is_empty(),
        format!("{} unreachable triggers", stray_triggers.len()),
    ));

    // Winding must not matter: sweep a grid over the bounds.
    let reversed = boundary.reversed();
    let (min, max) = boundary.bounds();
    let mut samples = 0;
    let mut inside = 0;
    let mut mismatches = 0;
    let mut escaped = 0;
    let mut x = min.x - 2.0;
    while x <= max.x + 2.0 {
        let mut z = min.y - 2.0;
        while z <= max.y + 2.0 {
            let p = glam::Vec2::new(x, z);
            let a = boundary.contains(p);
            if a != reversed.contains(p) {
                mismatches += 1;
            }
            if a {
                inside += 1;
                if p.x < min.x || p.x > max.x || p.y < min.y || p.y > max.y {
                    escaped += 1;
                }
            }
            samples += 1;
            z += 0.37;
        }
        x += 0.37;
    }
    results.push(check(
        "winding_independent",
        mismatches == 0,
        format!("{} mismatches over {} samples", mismatches, samples),
    ));
    results.push(check(
        "inside_within_bounds",
        escaped == 0 && inside > 0,
        format!("{} inside samples, {} outside the bounding box", inside, escaped),
    ));

    if verbose {
        println!(
            "  bounds ({:.1}, {:.1}) .. ({:.1}, {:.1}), {:.0}% of grid inside",
            min.x,
            min.y,
            max.x,
            max.y,
            100.0 * inside as f32 / samples.max(1) as f32
        );
    }

    results
}

// ── 3. Locomotion ───────────────────────────────────────────────────────

fn validate_locomotion(level: &LevelConfig, verbose: bool) -> Vec<TestResult> {
    println!("--- Locomotion ---");
    let mut results = Vec::new();
    let Ok(mut sim) = Simulation::new(level) else {
        results.push(check("locomotion_sim", false, "level rejected".into()));
        return results;
    };
    let mut clock = ManualClock::default();

    let start = *sim.player();
    hold(&mut sim, &mut clock, InputSnapshot::none(), 1.0);
    results.push(check(
        "idle_is_still",
        *sim.player() == start,
        "one second without input leaves the pose untouched".into(),
    ));

    let turn = InputSnapshot::none().with(Command::RotateLeft);
    hold(&mut sim, &mut clock, turn, 1.0);
    let turned = sim.player().yaw - start.yaw;
    results.push(check(
        "rotation_rate",
        (turned - level.locomotion.rot_speed).abs() < 1e-3,
        format!(
            "yaw +{:.4} rad in 1s (expected {:.4})",
            turned, level.locomotion.rot_speed
        ),
    ));
    results.push(check(
        "rotation_keeps_position",
        sim.player().position == start.position,
        "rotating in place does not move".into(),
    ));

    let rise = InputSnapshot::none().with(Command::MoveUp);
    hold(&mut sim, &mut clock, rise, 1.0);
    let climbed = sim.player().position.y - start.position.y;
    results.push(check(
        "vertical_speed",
        (climbed - level.locomotion.move_speed).abs() < 1e-2,
        format!("climbed {:.3} in 1s", climbed),
    ));

    // Backwards time must not move anything.
    let before = *sim.player();
    let now = sim.time();
    let out = sim.tick(now - 0.5, &InputSnapshot::none().with(Command::MoveForward));
    results.push(check(
        "backwards_time_zero_delta",
        out.delta == 0.0 && *sim.player() == before,
        format!("delta {} at t={:.3}", out.delta, out.time),
    ));

    if verbose {
        println!("  pose after checks: {:?}", sim.player());
    }

    results
}

// ── 4. Default maze walk ────────────────────────────────────────────────

fn validate_default_walk(verbose: bool) -> Vec<TestResult> {
    println!("--- Default Maze Walk ---");
    let mut results = Vec::new();
    let level = LevelConfig::default();
    let Ok(mut sim) = Simulation::new(&level) else {
        results.push(check("walk_sim", false, "default level rejected".into()));
        return results;
    };
    let mut clock = ManualClock::default();
    let speed = level.locomotion.move_speed;

    // Face yaw 0 so Back is +z and MoveLeft is -x.
    sim.set_player(PlayerState::new(level.spawn.position, 0.0));
    let back = InputSnapshot::none().with(Command::MoveBack);
    let left = InputSnapshot::none().with(Command::MoveLeft);

    let legs = [
        ("start room north", back, 33.0),
        ("west along the strip", left, 28.0),
        ("corridor north", back, 25.0),
        ("into the puzzle room", left, 9.0),
    ];
    let mut events = Vec::new();
    for (label, input, distance) in legs {
        let leg = hold(&mut sim, &mut clock, input, distance / speed);
        if verbose {
            println!("  {} → {:?}", label, sim.player().position);
        }
        events.extend(leg);
    }

    let blocked = events.iter().filter(|e| **e == SimEvent::MoveBlocked).count();
    results.push(check(
        "walk_unobstructed",
        blocked == 0,
        format!("{} blocked frames along the route", blocked),
    ));

    let end = sim.player().position;
    let trigger_hit = sim.puzzles()[0].trigger().contains_position(end);
    results.push(check(
        "walk_reaches_trigger",
        trigger_hit,
        format!("ended at ({:.2}, {:.2}, {:.2})", end.x, end.y, end.z),
    ));

    let freezes = events
        .iter()
        .filter(|e| matches!(e, SimEvent::ColorFrozen { .. }))
        .count();
    results.push(check(
        "walk_freezes_once",
        freezes == 1,
        format!("{} freeze events", freezes),
    ));

    // From spawn heading west the start room wall stops the player.
    sim.set_player(PlayerState::new(level.spawn.position, 0.0));
    let wall = hold(&mut sim, &mut clock, left, 4.0);
    let x = sim.player().position.x;
    results.push(check(
        "wall_blocks",
        wall.contains(&SimEvent::MoveBlocked) && (-4.0..-3.8).contains(&x),
        format!("stopped at x={:.3}", x),
    ));

    results
}

// ── 5. Lifts ────────────────────────────────────────────────────────────

fn validate_lifts(level: &LevelConfig, verbose: bool) -> Vec<TestResult> {
    println!("--- Lifts ---");
    let mut results = Vec::new();

    for (i, platform) in level.platforms.iter().enumerate() {
        let Ok(built) = platform.build() else {
            continue;
        };
        let Ok(mut sim) = Simulation::new(level) else {
            results.push(check("lift_sim", false, "level rejected".into()));
            return results;
        };
        let mut clock = ManualClock::default();
        let motion = level.lifts[platform.lift].motion;
        let travel = motion.end.y - motion.start.y;

        let stand = on_floor(built.center, 1.0);
        sim.set_player(PlayerState::new(stand, 0.0));
        sim.tick_with(&mut clock, &InputSnapshot::none());

        let press = InputSnapshot::none().with(Command::Interact);
        let mut events = hold(&mut sim, &mut clock, press, FRAME);
        events.extend(hold(
            &mut sim,
            &mut clock,
            InputSnapshot::none(),
            motion.duration + 0.5,
        ));

        let started = events.contains(&SimEvent::LiftStarted {
            lift: platform.lift,
            platform: i,
        });
        let finished = events.contains(&SimEvent::LiftFinished {
            lift: platform.lift,
        });
        results.push(check(
            &format!("lift_cycle_p{}", i),
            started && finished,
            format!("started={} finished={}", started, finished),
        ));

        let rose = sim.player().position.y - stand.y;
        let tolerance = travel.abs() * FRAME / motion.duration * 2.0 + 1e-3;
        results.push(check(
            &format!("lift_rider_p{}", i),
            (rose - travel).abs() <= tolerance,
            format!("rider moved {:.3}, lift travel {:.3}", rose, travel),
        ));

        let lift_y = sim.lifts()[platform.lift].position().y;
        results.push(check(
            &format!("lift_snaps_p{}", i),
            lift_y == motion.end.y,
            format!("lift at y={}", lift_y),
        ));

        // Second press takes it back.
        let mut back = hold(&mut sim, &mut clock, press, FRAME);
        back.extend(hold(
            &mut sim,
            &mut clock,
            InputSnapshot::none(),
            motion.duration + 0.5,
        ));
        let home = sim.lifts()[platform.lift].position().y;
        let settled = sim.player().position.y;
        results.push(check(
            &format!("lift_returns_p{}", i),
            home == motion.start.y && (settled - stand.y).abs() <= 2.0 * tolerance,
            format!("lift y={} rider y={:.3}", home, settled),
        ));

        if verbose {
            println!("  platform {} on lift {}: travel {:.2}", i, platform.lift, travel);
        }
    }

    // Far from every platform the lift still runs but nobody rides.
    if let Ok(mut sim) = Simulation::new(level) {
        if !level.platforms.is_empty() {
            let stand = level.spawn.position;
            let riding = sim.platforms().iter().any(|p| p.is_standing_on(stand));
            if !riding {
                let mut clock = ManualClock::default();
                let press = InputSnapshot::none().with(Command::Interact);
                hold(&mut sim, &mut clock, press, FRAME);
                hold(&mut sim, &mut clock, InputSnapshot::none(), 1.0);
                results.push(check(
                    "lift_no_ride_from_spawn",
                    sim.player().position.y == stand.y,
                    format!("player y={:.3}", sim.player().position.y),
                ));
            }
        }
    }

    results
}

// ── 6. Puzzles ──────────────────────────────────────────────────────────

fn validate_puzzles(level: &LevelConfig, verbose: bool) -> Vec<TestResult> {
    println!("--- Door Puzzles ---");
    let mut results = Vec::new();

    for (i, config) in level.puzzles.iter().enumerate() {
        let Ok(trigger) = Polygon::new(config.trigger.clone()) else {
            continue;
        };
        let Ok(mut sim) = Simulation::new(level) else {
            results.push(check("puzzle_sim", false, "level rejected".into()));
            return results;
        };
        let on = on_floor(trigger.centroid(), 1.0);
        let off = level.spawn.position;
        if trigger.contains_position(off) {
            results.push(check(
                &format!("puzzle_{}_setup", i),
                false,
                "spawn sits on the trigger".into(),
            ));
            continue;
        }

        let period = config.color_period;
        let len = config.palette.len();
        let enter_at = (config.target as f32 + 0.5) * period;
        let selected = cycle_index(enter_at, period, len);

        sim.set_player(PlayerState::new(off, 0.0));
        sim.tick(0.0, &InputSnapshot::none());
        sim.set_player(PlayerState::new(on, 0.0));
        let out = sim.tick(enter_at, &InputSnapshot::none());

        let froze = out.events.contains(&SimEvent::ColorFrozen {
            puzzle: i,
            color: selected,
        });
        let unlocked = out.events.contains(&SimEvent::DoorUnlocked { puzzle: i });
        results.push(check(
            &format!("puzzle_{}_unlocks", i),
            selected == config.target && froze && unlocked,
            format!(
                "entered at t={:.2} on colour {} (target {})",
                enter_at, selected, config.target
            ),
        ));

        let out = sim.tick(enter_at + config.door.duration, &InputSnapshot::none());
        let door = sim.puzzles()[i].door().current();
        results.push(check(
            &format!("puzzle_{}_door_opens", i),
            out.events.contains(&SimEvent::DoorFinished { puzzle: i })
                && (door - config.door.end).length() < 1e-4,
            format!("door at {:?}", door),
        ));

        // Leaving and re-entering must not restart the door.
        sim.set_player(PlayerState::new(off, 0.0));
        sim.tick(enter_at + config.door.duration + 1.0, &InputSnapshot::none());
        sim.set_player(PlayerState::new(on, 0.0));
        let out = sim.tick(
            enter_at + config.door.duration + 1.0 + len as f32 * period,
            &InputSnapshot::none(),
        );
        results.push(check(
            &format!("puzzle_{}_latch_holds", i),
            !out.events.contains(&SimEvent::DoorUnlocked { puzzle: i })
                && !sim.puzzles()[i].door().is_moving()
                && sim.puzzles()[i].state().unlocked,
            "re-entry on the target colour is ignored".into(),
        ));

        // Any other colour leaves the door shut.
        if len > 1 {
            let Ok(mut sim) = Simulation::new(level) else {
                continue;
            };
            let wrong = (config.target + 1) % len;
            let at = (wrong as f32 + 0.5) * period;
            sim.set_player(PlayerState::new(on, 0.0));
            let out = sim.tick(at, &InputSnapshot::none());
            let state = *sim.puzzles()[i].state();
            results.push(check(
                &format!("puzzle_{}_wrong_colour", i),
                state.frozen == Some(wrong)
                    && !out.events.contains(&SimEvent::DoorUnlocked { puzzle: i }),
                format!("frozen {:?}, unlocked {}", state.frozen, state.unlocked),
            ));
        }

        if verbose {
            println!(
                "  puzzle {}: palette {} colours, period {:.2}s, trigger at ({:.1}, {:.1})",
                i,
                len,
                period,
                trigger.centroid().x,
                trigger.centroid().y
            );
        }
    }

    results
}

// ── 7. Random walk ──────────────────────────────────────────────────────

fn validate_random_walk(level: &LevelConfig, seed: u64, verbose: bool) -> Vec<TestResult> {
    println!("--- Random Walk (seed {}) ---", seed);
    let mut results = Vec::new();
    let Ok(mut sim) = Simulation::new(level) else {
        results.push(check("random_sim", false, "level rejected".into()));
        return results;
    };
    let boundary = sim.boundary().clone();
    let mut clock = ManualClock::default();
    let mut rng = StdRng::seed_from_u64(seed);

    let mut escapes = 0;
    let mut bad_blocks = 0;
    let mut blocked = 0;
    let mut moved = 0;
    let mut lift_starts = 0;
    let mut input = InputSnapshot::none();

    for frame in 0..20_000 {
        // Re-roll held commands now and then, like a player mashing keys.
        if frame % 15 == 0 {
            input = Command::ALL
                .into_iter()
                .filter(|c| *c != Command::MoveUp && *c != Command::MoveDown)
                .filter(|_| rng.gen_bool(0.25))
                .collect();
        }
        clock.advance(rng.gen_range(0.004..0.04));

        let before = sim.player().position;
        let out = sim.tick_with(&mut clock, &input);
        match out.movement {
            StepOutcome::Blocked => {
                blocked += 1;
                if floor_point(sim.player().position) != floor_point(before) {
                    bad_blocks += 1;
                }
            }
            StepOutcome::Moved => moved += 1,
            StepOutcome::Idle => {}
        }
        if !boundary.contains_position(sim.player().position) {
            escapes += 1;
        }
        lift_starts += out
            .events
            .iter()
            .filter(|e| matches!(e, SimEvent::LiftStarted { .. }))
            .count();
    }

    results.push(check(
        "random_stays_inside",
        escapes == 0,
        format!("{} frames outside the boundary", escapes),
    ));
    results.push(check(
        "random_blocked_keeps_floor",
        bad_blocks == 0,
        format!("{} blocked frames, {} moved floor position", blocked, bad_blocks),
    ));

    if verbose {
        println!(
            "  {} moved, {} blocked, {} lift starts, final {:?}",
            moved,
            blocked,
            lift_starts,
            sim.player().position
        );
    }

    results
}
