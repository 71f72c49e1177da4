//! One lane of terrain
//!
//! A path owns its queue of bricks (newest, farthest-ahead first) and the small
//! Markov state deciding which kind it emits next.

use std::collections::VecDeque;

use glam::Vec3;
use rand::Rng;

use super::brick::Brick;
use super::terrain::BrickKind;
use crate::consts::{BRICK_SPACING, LANE_SPACING, RUNWAY_LENGTH, SPAWN_LOOKAHEAD};

/// What a path needs to know about the world for one forward tick
#[derive(Debug, Clone, Copy)]
pub struct PathContext {
    /// Whether this lane currently spawns
    pub active: bool,
    /// Hero position at the start of the tick
    pub hero: Vec3,
    /// Bricks further than this behind the hero are dropped
    pub visibility_window: f32,
    pub frozen: bool,
    pub diamond_chance: f32,
    pub diamond_value: u32,
}

#[derive(Debug, Clone)]
pub struct Path {
    pub index: usize,
    /// Kind the next spawned brick will have
    pub kind: BrickKind,
    /// Front = newest (farthest ahead)
    pub bricks: VecDeque<Brick>,
}

impl Path {
    pub fn new(index: usize) -> Self {
        Self {
            index,
            kind: BrickKind::Normal,
            bricks: VecDeque::new(),
        }
    }

    /// A lane pre-filled with plain bricks from z = 0 forward
    pub fn with_runway(index: usize) -> Self {
        let mut path = Self::new(index);
        let x = lane_x(index);
        for i in 0..RUNWAY_LENGTH {
            let z = -(i as f32) * BRICK_SPACING;
            path.bricks.push_front(Brick::new(Vec3::new(x, 0.0, z), BrickKind::Normal, None));
        }
        path
    }

    /// Spawn point for this lane given the hero's z
    pub fn head(&self, hero_z: f32) -> Vec3 {
        let z = ((hero_z - SPAWN_LOOKAHEAD) / BRICK_SPACING).floor() * BRICK_SPACING;
        Vec3::new(lane_x(self.index), 0.0, z)
    }

    /// Prune, maybe spawn + mutate, then advance every brick
    pub fn update<R: Rng + ?Sized>(&mut self, ctx: &PathContext, progress: f32, rng: &mut R) {
        self.prune(ctx.hero.z, ctx.visibility_window);

        let head = self.head(ctx.hero.z);
        if ctx.active && self.head_is_free(head.z) {
            self.spawn(head, ctx, rng);
            self.mutate(progress, rng);
        }

        for brick in &mut self.bricks {
            brick.advance(ctx.frozen);
        }
    }

    /// Drop bricks that fell behind the visibility window. Returns how many went.
    pub fn prune(&mut self, hero_z: f32, window: f32) -> usize {
        let before = self.bricks.len();
        self.bricks.retain(|brick| is_visible(brick, hero_z, window));
        before - self.bricks.len()
    }

    fn head_is_free(&self, head_z: f32) -> bool {
        self.bricks.front().is_none_or(|newest| newest.position.z > head_z)
    }

    fn spawn<R: Rng + ?Sized>(&mut self, head: Vec3, ctx: &PathContext, rng: &mut R) {
        let diamond = (rng.random::<f32>() < ctx.diamond_chance).then_some(ctx.diamond_value);
        let mut brick = Brick::new(head, self.kind, diamond);

        if let Some(previous) = self.bricks.front() {
            if self.kind == BrickKind::Moving && previous.kind == BrickKind::Moving {
                brick.continue_motion(previous);
            }
        }

        log::trace!("Lane {} spawned {:?} at z={}", self.index, brick.kind, brick.position.z);
        self.bricks.push_front(brick);
    }

    /// Maybe switch to a successor kind. Returns the new kind when it changed.
    pub fn mutate<R: Rng + ?Sized>(&mut self, progress: f32, rng: &mut R) -> Option<BrickKind> {
        if rng.random::<f32>() >= self.kind.mutation_chance() {
            return None;
        }

        let options = self.kind.successors(progress);
        if options.is_empty() {
            return None;
        }

        let next = options[rng.random_range(0..options.len())];
        log::debug!("Lane {} terrain {:?} -> {:?}", self.index, self.kind, next);
        self.kind = next;
        Some(next)
    }

    /// Step every brick (and its children) back one tick
    pub fn rewind(&mut self) {
        for brick in &mut self.bricks {
            brick.rewind();
        }
    }
}

/// Lateral centre of a lane
pub fn lane_x(index: usize) -> f32 {
    LANE_SPACING * (index as f32 - 1.0)
}

/// A brick stays while it is less than `window` behind the hero (the hero runs toward -z)
pub fn is_visible(brick: &Brick, hero_z: f32, window: f32) -> bool {
    brick.position.z < hero_z + window
}
