//! Rewind Runner - an endless three-lane runner with time rewind
//!
//! Core modules:
//! - `sim`: Deterministic simulation (terrain generation, hero physics, rewind log)
//! - `tuning`: Data-driven game balance

pub mod sim;
pub mod tuning;

pub use sim::{TickInput, World, WorldSnapshot, tick};
pub use tuning::{Tuning, TuningError};

/// Game configuration constants
///
/// Distances are world units, speeds are units per tick.
pub mod consts {
    /// Number of parallel lanes
    pub const LANE_COUNT: usize = 3;
    /// Lateral distance between lane centres
    pub const LANE_SPACING: f32 = 15.0;
    /// Length of one brick along the run
    pub const BRICK_SPACING: f32 = 6.0;
    /// How far ahead of the hero new bricks appear
    pub const SPAWN_LOOKAHEAD: f32 = 200.0;
    /// Plain bricks laid in the centre lane at the start of a run
    pub const RUNWAY_LENGTH: usize = 34;
    /// Bricks kept behind the hero even with an empty rewind budget
    pub const BASE_VISIBILITY: f32 = 25.0;

    /// Score at which walking speed has doubled
    pub const SPEED_RAMP: f32 = 3000.0;
    pub const MAX_SPEED_FACTOR: f32 = 5.0;

    /// Hero defaults
    pub const HERO_WALK_SPEED: f32 = 1.0;
    pub const HERO_TURN_SPEED: f32 = 0.5;
    pub const HERO_JUMP_SPEED: f32 = 1.5;
    pub const GRAVITY: f32 = 0.1;

    /// Terrain modifiers
    pub const STICKY_JUMP_SPEED: f32 = 1.2;
    pub const STICKY_TURN_SPEED: f32 = 0.1;
    pub const STICKY_WALK_FACTOR: f32 = 0.5;
    pub const ICE_DRIFT: f32 = 0.15;
    /// Bomb launch relative to the current jump speed
    pub const BOMB_LAUNCH_FACTOR: f32 = 1.5;

    /// Hero height at which the run ends
    pub const GAME_OVER_DEPTH: f32 = -200.0;
    /// Max |dx| from a brick centre before the hero falls off
    pub const SAFE_HALF_WIDTH: f32 = 4.0;
    pub const NARROW_SAFE_HALF_WIDTH: f32 = 2.5;
    /// Max |dz| from a brick centre before the hero falls off
    pub const SAFE_HALF_LENGTH: f32 = 4.0;

    /// Moving platforms
    pub const MOVING_SPEED: f32 = 0.1;
    pub const MOVING_RANGE: f32 = 5.0;
    /// Sideways shift of narrow bricks
    pub const NARROW_OFFSET: f32 = 1.5;

    /// Hammer hazard
    pub const HAMMER_DROP_HEIGHT: f32 = 30.0;
    pub const HAMMER_ACCEL: f32 = 0.5;
    pub const HAMMER_RISE_SPEED: f32 = 1.0;
    pub const HAMMER_REST_HEIGHT: f32 = 20.0;
    /// Below this the hammer hits anyone standing on its brick
    pub const HAMMER_STRIKE_HEIGHT: f32 = 8.0;

    /// Diamond spin per tick (radians)
    pub const DIAMOND_SPIN_SPEED: f32 = std::f32::consts::PI / 36.0;
}
