//! Rewind Runner entry point
//!
//! Runs a headless seeded session with a simple autopilot and logs the outcome.
//!
//! Usage: `rewind-runner [seed] [max_ticks] [tuning.json]`

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    log::info!("Rewind Runner (headless) starting...");

    let mut args = std::env::args().skip(1);
    let seed = args.next().and_then(|s| s.parse().ok()).unwrap_or(12345);
    let max_ticks: u64 = args.next().and_then(|s| s.parse().ok()).unwrap_or(20_000);

    let tuning = match args.next() {
        Some(path) => match load_tuning(&path) {
            Ok(tuning) => tuning,
            Err(e) => {
                log::error!("Failed to load tuning from {path}: {e}");
                std::process::exit(1);
            }
        },
        None => rewind_runner::Tuning::default(),
    };

    autopilot::run(seed, max_ticks, tuning);
}

#[cfg(target_arch = "wasm32")]
fn main() {}

#[cfg(not(target_arch = "wasm32"))]
fn load_tuning(path: &str) -> Result<rewind_runner::Tuning, Box<dyn std::error::Error>> {
    let json = std::fs::read_to_string(path)?;
    Ok(rewind_runner::Tuning::from_json(&json)?)
}

#[cfg(not(target_arch = "wasm32"))]
mod autopilot {
    use rewind_runner::consts::BRICK_SPACING;
    use rewind_runner::sim::{BrickKind, GameEvent, Phase, TickInput, World, tick};
    use rewind_runner::Tuning;

    /// How far ahead the autopilot looks for footing
    const LOOKAHEAD: f32 = 5.0 * BRICK_SPACING;

    pub fn run(seed: u64, max_ticks: u64, tuning: Tuning) {
        let mut world = World::with_tuning(seed, tuning);
        let mut rewinding = false;
        let mut deaths = 0u32;
        let mut diamonds = 0u32;

        while world.tick < max_ticks && !world.is_over() {
            let input = decide(&world, &mut rewinding);
            let snapshot = tick(&mut world, &input);

            for event in &snapshot.events {
                match event {
                    GameEvent::HeroFell => deaths += 1,
                    GameEvent::DiamondCollected { .. } => diamonds += 1,
                    _ => {}
                }
            }
        }

        let outcome = if world.phase == Phase::GameOver { "game over" } else { "time limit" };
        log::info!(
            "Session ended ({outcome}): seed={} ticks={} score={} deaths={deaths} diamonds={diamonds}",
            world.seed,
            world.tick,
            world.score
        );
        println!("seed {} | score {} | ticks {} | {outcome}", world.seed, world.score, world.tick);
    }

    fn decide(world: &World, rewinding: &mut bool) -> TickInput {
        let hero = &world.hero;

        // Dead: rewind until alive again, as long as the budget lasts
        if !hero.alive && world.rewind_budget > 0 {
            *rewinding = true;
        }
        if *rewinding {
            if (hero.alive && hero.is_grounded()) || world.rewind_budget == 0 {
                *rewinding = false;
            } else {
                return TickInput {
                    rewind: true,
                    ..Default::default()
                };
            }
        }

        let footing = world
            .bricks()
            .map(|(_, brick)| brick)
            .filter(|b| b.kind.is_solid())
            .filter(|b| {
                b.position.z <= hero.position.z && b.position.z > hero.position.z - LOOKAHEAD
            })
            .min_by(|a, b| {
                (a.position.x - hero.position.x)
                    .abs()
                    .total_cmp(&(b.position.x - hero.position.x).abs())
            });

        let hole_ahead = world.bricks().any(|(_, b)| {
            b.kind == BrickKind::Hole
                && (b.position.x - hero.position.x).abs() < 4.0
                && (b.position.z - (hero.position.z - BRICK_SPACING)).abs() < 1.0
        });

        let steer = match footing {
            Some(brick) if brick.position.x > hero.position.x + 0.5 => 1,
            Some(brick) if brick.position.x < hero.position.x - 0.5 => -1,
            _ => 0,
        };

        TickInput {
            steer,
            jump: hole_ahead,
            rewind: false,
            freeze: world.rewind_budget >= world.tuning.rewind_capacity,
        }
    }
}
