//! Marble Run headless runner
//!
//! Plays one level with the forward key held, paced by the frame scheduler
//! against a simulated 120 Hz display, and prints a summary.
//!
//! Usage: `marble-run [level] [ticks] [tuning.json]`

use marble_run::best_times::format_time;
use marble_run::input::{InputAggregator, Key};
use marble_run::scheduler::{Clock, FrameScheduler, ManualClock};
use marble_run::sim::GamePhase;
use marble_run::{Game, GameEvent, Tuning};

/// Display refresh interval of the simulated host (120 Hz)
const HOST_FRAME_MS: f64 = 1000.0 / 120.0;

fn load_tuning(path: Option<&String>) -> Tuning {
    let Some(path) = path else {
        return Tuning::default();
    };
    match Tuning::load(path) {
        Ok(tuning) => tuning,
        Err(e) => {
            log::warn!("Failed to load tuning from {path}: {e}, using defaults");
            Tuning::default()
        }
    }
}

fn parse_arg(arg: Option<&String>, name: &str, default: u64) -> u64 {
    match arg.map(|s| s.parse::<u64>()) {
        None => default,
        Some(Ok(v)) => v,
        Some(Err(e)) => {
            log::warn!("Ignoring invalid {name} argument: {e}");
            default
        }
    }
}

fn main() {
    #[cfg(not(target_arch = "wasm32"))]
    env_logger::init();
    log::info!("Marble Run (headless) starting...");

    let args: Vec<String> = std::env::args().skip(1).collect();
    let level = parse_arg(args.first(), "level", 1) as usize;
    let max_ticks = parse_arg(args.get(1), "ticks", 1200);
    let tuning = load_tuning(args.get(2));
    let dead_zone = tuning.joystick_dead_zone;

    let mut game = Game::new(marble_run::levels::builtin_levels(), tuning);
    if !game.start_level(level) {
        eprintln!(
            "No level {level}; choose 1..={} ({})",
            game.level_count(),
            (1..=game.level_count())
                .filter_map(|i| game.level_name(i))
                .collect::<Vec<_>>()
                .join(", ")
        );
        std::process::exit(2);
    }

    let mut input = InputAggregator::new();
    input.key_down(Key::Forward);

    let clock = ManualClock::new();
    let mut scheduler = FrameScheduler::new();
    let mut frames = 0u64;

    while scheduler.is_running() && scheduler.ticks_run() < max_ticks {
        clock.advance(HOST_FRAME_MS);
        frames += 1;
        scheduler.frame(&clock, || {
            let snapshot = input.snapshot(dead_zone);
            game.tick(&snapshot);
        });

        if game.phase() != GamePhase::Playing {
            scheduler.stop();
        }
    }

    println!(
        "Level {level} \"{}\": {} ticks over {frames} host frames ({:.0} ms simulated)",
        game.level_name(level).unwrap_or("?"),
        scheduler.ticks_run(),
        clock.now_ms()
    );

    if let Some(frame) = game.frame() {
        let p = frame.marble_position;
        println!(
            "Marble at ({:.2}, {:.2}, {:.2}), on ground: {}, can jump: {}",
            p.x, p.y, p.z, frame.on_ground, frame.can_jump
        );
    }

    let mut finished = false;
    for event in game.drain_events() {
        if let GameEvent::Finished {
            elapsed,
            is_new_best,
            ..
        } = event
        {
            finished = true;
            println!(
                "Finished in {}{}",
                format_time(elapsed),
                if is_new_best { " (new best)" } else { "" }
            );
        }
    }
    if !finished {
        println!("Did not finish");
    }

    for (level, time) in game.best_times().iter() {
        println!("Best time level {level}: {}", format_time(time));
    }
}
