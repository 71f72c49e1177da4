//! Fixed timestep simulation tick
//!
//! Every call runs exactly one of two modes. A forward tick steps the lane
//! automaton, then each lane (prune, spawn, mutate, advance), then the hero,
//! then resolves the terrain under where the hero stood when the tick began.
//! A rewind tick replays the hero and every brick one tick backward and spends
//! one unit of rewind budget.

use glam::Vec3;

use super::brick::Brick;
use super::hero::Hero;
use super::path::PathContext;
use super::proximity::{NearestSegment, nearest_segment};
use super::state::{GameEvent, Phase, World, WorldSnapshot};
use super::terrain::BrickKind;
use crate::consts::*;

/// Input commands for a single tick (deterministic)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickInput {
    /// Steering: -1 left, 0 straight, 1 right
    pub steer: i8,
    pub jump: bool,
    /// Held to replay history backward
    pub rewind: bool,
    /// Spend budget to freeze hazards
    pub freeze: bool,
}

/// Advance the world by one tick and return what the renderer should draw
pub fn tick(world: &mut World, input: &TickInput) -> WorldSnapshot {
    world.events.clear();

    if world.is_over() {
        return world.snapshot();
    }

    let was_rewinding = world.phase == Phase::Rewinding;
    let rewinding = input.rewind && world.rewind_budget > 0 && world.hero.can_rewind();

    if rewinding {
        if !was_rewinding {
            log::info!("Rewind started at tick {} (budget {})", world.tick, world.rewind_budget);
            world.events.push(GameEvent::RewindStarted);
        }
        step_backward(world);
    } else {
        if was_rewinding {
            log::info!("Rewind ended at tick {} (budget {})", world.tick, world.rewind_budget);
            world.events.push(GameEvent::RewindEnded);
            restore_modifiers(world);
        }
        step_forward(world, input);
    }

    world.tick += 1;
    world.snapshot()
}

fn step_backward(world: &mut World) {
    world.phase = Phase::Rewinding;

    world.hero.rewind();
    for path in &mut world.paths {
        path.rewind();
    }

    world.rewind_budget -= 1;
    world.governing = None;
    world.cues.rewind_tint = (world.cues.rewind_tint + 0.04).min(1.0);
    world.cues.relax_brightness();
}

fn step_forward(world: &mut World, input: &TickInput) {
    world.phase = Phase::Running;

    world.cues.rewind_tint = (world.cues.rewind_tint - 0.04).max(0.0);
    world.cues.relax_brightness();
    world.cues.freeze = (world.cues.freeze - world.tuning.freeze_decay).max(0.0);

    if input.freeze && !world.is_frozen() && world.rewind_budget >= world.tuning.freeze_cost {
        world.rewind_budget -= world.tuning.freeze_cost;
        world.cues.freeze = 1.0;
        log::info!("Freeze activated (budget left {})", world.rewind_budget);
        world.events.push(GameEvent::FreezeStarted);
    }

    if let Some((from, to)) = world.lanes.step(&mut world.rng) {
        world.events.push(GameEvent::LanesChanged { from, to });
    }

    // Terrain and the proximity query see the hero where it stood at the start of the tick
    let start = world.hero.position;
    let lanes = world.lanes.current();
    let progress = world.hero.progress();
    let mut ctx = PathContext {
        active: false,
        hero: start,
        visibility_window: world.visibility_window(),
        frozen: world.is_frozen(),
        diamond_chance: world.tuning.diamond_chance,
        diamond_value: world.tuning.diamond_value,
    };
    for path in &mut world.paths {
        ctx.active = lanes.is_active(path.index);
        path.update(&ctx, progress, &mut world.rng);
    }

    world.hero.apply_controls(input.steer, input.jump);
    world.hero.advance();

    let distance = world.hero.progress().max(0.0).floor() as u32;
    world.score = world.score.max(distance);

    resolve_terrain(world, start);

    if world.hero.position.y < GAME_OVER_DEPTH {
        world.phase = Phase::GameOver;
        log::info!("Game over: score={} tick={}", world.score, world.tick);
        world.events.push(GameEvent::GameOver { score: world.score });
    }
}

/// Look up the segment under `at` and apply its effects for the next tick
fn resolve_terrain(world: &mut World, at: Vec3) {
    world.hero.reset_modifiers(world.score);

    let nearest = nearest_segment(at, &world.paths);
    world.governing = nearest;

    if !world.hero.alive || !is_grounded(at) {
        return;
    }

    let Some(segment) = nearest.filter(is_within_footprint) else {
        kill_hero(world);
        return;
    };

    let Some(brick) = world.paths[segment.lane].bricks.get_mut(segment.slot) else {
        return;
    };

    apply_surface(&mut world.hero, segment.kind, brick);

    match segment.kind {
        BrickKind::Bomb => {
            world.hero.falling_speed = BOMB_LAUNCH_FACTOR * world.hero.jump_speed;
            world.cues.brightness *= 2.0;
            log::debug!("Bomb launched hero at z={}", at.z);
            world.events.push(GameEvent::BombLaunched);
        }
        BrickKind::Hammer => {
            if brick.hammer.as_ref().is_some_and(|h| h.position.y < HAMMER_STRIKE_HEIGHT) {
                world.cues.brightness = 0.0;
                world.events.push(GameEvent::HammerStrike);
            }
        }
        _ => {}
    }

    if let Some(diamond) = brick.diamond.as_mut().filter(|d| !d.is_collected()) {
        let value = diamond.collect();
        world.rewind_budget = world
            .rewind_budget
            .saturating_add(value)
            .min(world.tuning.rewind_capacity);
        world.cues.brightness *= 1.5;
        log::debug!("Diamond collected: +{value} (budget {})", world.rewind_budget);
        world.events.push(GameEvent::DiamondCollected { value });
    }
}

/// Rebuild the hero's speed modifiers from the ground it stands on, without one-shot effects.
///
/// Rewinding restores the rates a tick ran with, not the ones its terrain set for the next.
fn restore_modifiers(world: &mut World) {
    world.hero.reset_modifiers(world.score);

    let at = world.hero.position;
    if !world.hero.alive || !is_grounded(at) {
        return;
    }

    let Some(segment) = nearest_segment(at, &world.paths).filter(is_within_footprint) else {
        return;
    };
    if let Some(brick) = world.paths[segment.lane].bricks.get(segment.slot) {
        apply_surface(&mut world.hero, segment.kind, brick);
    }
}

/// Ice, sticky and moving-platform modifiers
fn apply_surface(hero: &mut Hero, kind: BrickKind, brick: &Brick) {
    if kind.is_icy() {
        hero.external_speed = ICE_DRIFT;
    }
    if kind.is_sticky() {
        hero.walking_speed *= STICKY_WALK_FACTOR;
        hero.turning_speed = STICKY_TURN_SPEED;
        hero.jump_speed = -STICKY_JUMP_SPEED;
    }
    if kind == BrickKind::Moving {
        hero.external_direction = brick.direction;
        hero.external_speed = brick.moving_speed;
    }
}

fn is_grounded(at: Vec3) -> bool {
    at.y <= 0.0
}

fn is_within_footprint(segment: &NearestSegment) -> bool {
    // Sticky narrow kinds keep the full width
    let half_width = if segment.kind.is_narrow() && !segment.kind.is_sticky() {
        NARROW_SAFE_HALF_WIDTH
    } else {
        SAFE_HALF_WIDTH
    };
    segment.lateral <= half_width && segment.longitudinal <= SAFE_HALF_LENGTH
}

fn kill_hero(world: &mut World) {
    world.hero.alive = false;
    log::info!(
        "Hero fell at x={:.1} z={:.1} (score {})",
        world.hero.position.x,
        world.hero.position.z,
        world.score
    );
    world.events.push(GameEvent::HeroFell);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::diamond::Diamond;
    use crate::sim::hero::speed_factor;

    fn run(world: &mut World, input: TickInput, ticks: usize) -> WorldSnapshot {
        let mut snapshot = world.snapshot();
        for _ in 0..ticks {
            snapshot = tick(world, &input);
        }
        snapshot
    }

    fn rewind_input() -> TickInput {
        TickInput {
            rewind: true,
            ..Default::default()
        }
    }

    #[test]
    fn test_tick_runs_forward() {
        let mut world = World::new(12345);
        let snapshot = tick(&mut world, &TickInput::default());
        assert_eq!(snapshot.tick, 1);
        assert_eq!(snapshot.phase, Phase::Running);
        assert!(snapshot.hero.position.z < 0.0);
        assert!(snapshot.hero.alive);
        assert!(snapshot.governing.is_some());
    }

    #[test]
    fn test_determinism() {
        let inputs: Vec<TickInput> = (0..400)
            .map(|i| TickInput {
                steer: [0, 1, 0, -1][(i / 7) % 4],
                jump: i % 53 == 0,
                rewind: (200..230).contains(&i),
                freeze: i == 300,
            })
            .collect();

        let play = |seed| {
            let mut world = World::new(seed);
            world.grant_rewind(100);
            inputs.iter().map(|input| tick(&mut world, input)).collect::<Vec<_>>()
        };

        assert_eq!(play(777), play(777));
    }

    #[test]
    fn test_rewind_retraces_hero_trail() {
        let mut world = World::new(9);
        world.grant_rewind(100);

        let mut trail = vec![world.hero.position];
        for i in 0..60 {
            let input = TickInput {
                steer: match i % 20 {
                    0..=2 => 1,
                    10..=12 => -1,
                    _ => 0,
                },
                jump: i == 30,
                ..Default::default()
            };
            trail.push(tick(&mut world, &input).hero.position);
        }
        assert!(world.hero.alive);

        trail.pop();
        while let Some(expected) = trail.pop() {
            let snapshot = tick(&mut world, &rewind_input());
            assert_eq!(snapshot.phase, Phase::Rewinding);
            assert!((snapshot.hero.position - expected).abs().max_element() < 1e-3);
        }
        assert_eq!(world.rewind_budget, 40);
        assert!(!world.hero.can_rewind());
    }

    #[test]
    fn test_rewind_spends_budget_then_runs_forward() {
        let mut world = World::new(3);
        run(&mut world, TickInput::default(), 30);
        world.rewind_budget = 5;

        let first = tick(&mut world, &rewind_input());
        assert!(first.events.contains(&GameEvent::RewindStarted));

        let snapshot = run(&mut world, rewind_input(), 4);
        assert_eq!(snapshot.phase, Phase::Rewinding);
        assert_eq!(world.rewind_budget, 0);

        let z_before = world.hero.position.z;
        let snapshot = tick(&mut world, &rewind_input());
        assert_eq!(snapshot.phase, Phase::Running);
        assert!(snapshot.events.contains(&GameEvent::RewindEnded));
        assert!(world.hero.position.z < z_before);
    }

    #[test]
    fn test_rewind_without_history_runs_forward() {
        let mut world = World::new(3);
        world.grant_rewind(50);
        let snapshot = tick(&mut world, &rewind_input());
        assert_eq!(snapshot.phase, Phase::Running);
        assert_eq!(world.rewind_budget, 50);
    }

    #[test]
    fn test_score_survives_rewind() {
        let mut world = World::new(4);
        run(&mut world, TickInput::default(), 40);
        let score = world.score;
        assert!(score >= 39);

        world.grant_rewind(20);
        run(&mut world, rewind_input(), 20);
        assert_eq!(world.score, score);
        assert!(world.hero.progress() < score as f32);
    }

    #[test]
    fn test_collected_diamond_stays_collected_through_rewind() {
        let mut world = World::new(21);
        let brick = world.paths[1]
            .bricks
            .iter_mut()
            .find(|b| b.position.z == -12.0);
        if let Some(brick) = brick {
            brick.diamond = Some(Diamond::new(30));
        }

        let mut collected = false;
        for _ in 0..20 {
            let snapshot = tick(&mut world, &TickInput::default());
            collected |= snapshot.events.contains(&GameEvent::DiamondCollected { value: 30 });
        }
        assert!(collected);
        assert_eq!(world.rewind_budget, 30);

        run(&mut world, rewind_input(), 15);
        assert_eq!(world.rewind_budget, 15);

        let diamond = world
            .bricks()
            .find(|(_, b)| b.position.z == -12.0)
            .and_then(|(_, b)| b.diamond.as_ref());
        assert!(diamond.is_some_and(|d| !d.visible && d.value == 0));
    }

    #[test]
    fn test_fresh_world_only_spawns_normal_terrain() {
        let mut world = World::new(99);
        for _ in 0..300 {
            let snapshot = tick(&mut world, &TickInput::default());
            assert!(snapshot.bricks.iter().all(|b| b.kind == BrickKind::Normal));
        }
    }

    #[test]
    fn test_steering_off_the_lane_kills() {
        let mut world = World::new(8);
        let steer_right = TickInput {
            steer: 1,
            ..Default::default()
        };
        let mut fell = false;
        for _ in 0..20 {
            fell |= tick(&mut world, &steer_right).events.contains(&GameEvent::HeroFell);
        }
        assert!(fell);
        assert!(!world.hero.alive);

        // Rewinding far enough brings the hero back
        world.grant_rewind(20);
        run(&mut world, rewind_input(), 20);
        assert!(world.hero.alive);
    }

    #[test]
    fn test_game_over_is_terminal() {
        let mut world = World::new(2);
        world.hero.alive = false;
        world.hero.position.y = -199.95;
        world.hero.falling_speed = 1.0;

        let snapshot = tick(&mut world, &TickInput::default());
        assert_eq!(snapshot.phase, Phase::GameOver);
        assert!(snapshot.events.contains(&GameEvent::GameOver { score: 0 }));

        world.grant_rewind(50);
        let after = run(&mut world, rewind_input(), 10);
        assert_eq!(after.tick, snapshot.tick);
        assert_eq!(after.hero.position, snapshot.hero.position);
        assert!(!after.hero.alive);
        assert!(after.events.is_empty());
    }

    #[test]
    fn test_freeze_halts_moving_platforms() {
        let mut world = World::new(6);
        world.paths[0]
            .bricks
            .push_back(Brick::new(Vec3::new(-15.0, 0.0, -100.0), BrickKind::Moving, None));
        world.grant_rewind(20);

        let freeze = TickInput {
            freeze: true,
            ..Default::default()
        };
        let snapshot = tick(&mut world, &freeze);
        assert!(snapshot.events.contains(&GameEvent::FreezeStarted));
        assert_eq!(world.rewind_budget, 5);
        assert_eq!(snapshot.cues.freeze, 1.0);

        let platform_x = |world: &World| {
            world.paths[0]
                .bricks
                .iter()
                .find(|b| b.kind == BrickKind::Moving)
                .map(|b| b.position.x)
        };
        let frozen_x = platform_x(&world);
        assert_eq!(frozen_x, Some(-15.0));

        run(&mut world, TickInput::default(), 10);
        assert_eq!(platform_x(&world), frozen_x);

        // Not enough budget for a second freeze
        run(&mut world, freeze, 1);
        assert_eq!(world.rewind_budget, 5);

        run(&mut world, TickInput::default(), 60);
        assert!(!world.is_frozen());
        assert_ne!(platform_x(&world), frozen_x);
    }

    #[test]
    fn test_rewind_tint_rises_and_fades() {
        let mut world = World::new(1);
        run(&mut world, TickInput::default(), 20);
        world.grant_rewind(10);
        let snapshot = run(&mut world, rewind_input(), 10);
        assert!((snapshot.cues.rewind_tint - 0.4).abs() < 1e-4);

        let snapshot = run(&mut world, TickInput::default(), 20);
        assert_eq!(snapshot.cues.rewind_tint, 0.0);
    }

    /// Swap the runway brick at z = 0 for one of `kind`
    fn set_start_brick(world: &mut World, kind: BrickKind) {
        if let Some(brick) = world.paths[1].bricks.back_mut() {
            *brick = Brick::new(Vec3::ZERO, kind, None);
        }
    }

    #[test]
    fn test_proximity_uses_start_of_tick_position() {
        let mut world = World::new(12345);
        let snapshot = tick(&mut world, &TickInput::default());
        assert!(snapshot.hero.position.z < -0.5);

        let governing = snapshot.governing.map(|g| (g.slot, g.longitudinal));
        assert_eq!(governing, Some((world.paths[1].bricks.len() - 1, 0.0)));
    }

    #[test]
    fn test_airborne_hero_does_not_collect() {
        let mut world = World::new(14);
        if let Some(brick) = world.paths[1].bricks.back_mut() {
            brick.diamond = Some(Diamond::new(30));
        }
        world.hero.position.y = 5.0;

        let snapshot = tick(&mut world, &TickInput::default());
        assert!(!snapshot.events.contains(&GameEvent::DiamondCollected { value: 30 }));
        assert_eq!(world.rewind_budget, 0);
        let diamond = world.paths[1].bricks.back().and_then(|b| b.diamond.as_ref());
        assert!(diamond.is_some_and(|d| d.visible && d.value == 30));
    }

    #[test]
    fn test_flashes_multiply_brightness() {
        let mut world = World::new(15);
        set_start_brick(&mut world, BrickKind::Bomb);
        world.cues.brightness = 1.5;

        let snapshot = tick(&mut world, &TickInput::default());
        assert!(snapshot.events.contains(&GameEvent::BombLaunched));
        assert!((snapshot.cues.brightness - 2.9).abs() < 1e-4);
        assert!(world.hero.falling_speed < 0.0);

        let mut world = World::new(15);
        if let Some(brick) = world.paths[1].bricks.back_mut() {
            brick.diamond = Some(Diamond::new(30));
        }
        let snapshot = tick(&mut world, &TickInput::default());
        assert!(snapshot.events.contains(&GameEvent::DiamondCollected { value: 30 }));
        assert!((snapshot.cues.brightness - 1.5).abs() < 1e-4);
    }

    #[test]
    fn test_narrow_width_applies_to_plain_and_icy_kinds() {
        let outcome = |kind| {
            let mut world = World::new(16);
            set_start_brick(&mut world, kind);
            world.hero.position.x = 1.5;
            tick(&mut world, &TickInput::default());
            world.hero.alive
        };

        assert!(!outcome(BrickKind::NarrowLeft));
        assert!(!outcome(BrickKind::NarrowLeftIce));
        assert!(outcome(BrickKind::NarrowLeftSticky));
        assert!(outcome(BrickKind::Normal));
    }

    #[test]
    fn test_forward_after_rewind_uses_current_terrain() {
        let mut world = World::new(17);
        run(&mut world, TickInput::default(), 20);
        world.grant_rewind(10);
        run(&mut world, rewind_input(), 10);

        for brick in &mut world.paths[1].bricks {
            brick.kind = BrickKind::Sticky;
        }

        let z_before = world.hero.position.z;
        let snapshot = tick(&mut world, &TickInput::default());
        assert!(snapshot.events.contains(&GameEvent::RewindEnded));
        let step = z_before - world.hero.position.z;
        assert!((step - 0.5 * speed_factor(world.score)).abs() < 1e-3, "step {step}");
        assert_eq!(world.hero.jump_speed, -STICKY_JUMP_SPEED);
    }
}
