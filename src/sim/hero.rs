//! Hero physics
//!
//! The hero walks toward -z. Per tick it drifts (ice / platforms), falls or lands,
//! walks and steers, in that order. Terrain effects set the speed modifiers that
//! the *next* tick integrates with.

use glam::Vec3;
use serde::{Deserialize, Serialize};

use super::rewind::{Rewindable, TemporalBuffer, record_into, replay_from};
use crate::consts::*;

/// Rates recorded per tick (everything the forward delta depends on)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HeroFrame {
    pub walking_speed: f32,
    pub falling_speed: f32,
    pub direction: i8,
    pub turning_speed: f32,
    pub external_direction: i8,
    pub external_speed: f32,
    /// Height correction applied when landing this tick
    pub ground_snap: f32,
    pub alive: bool,
}

#[derive(Debug, Clone)]
pub struct Hero {
    pub position: Vec3,
    /// Positive = falling, negative = rising
    pub falling_speed: f32,
    /// Negative: the hero walks toward -z
    pub walking_speed: f32,
    /// Steering input (-1, 0, 1)
    pub direction: i8,
    pub turning_speed: f32,
    /// Drift direction (last steer, or the platform's direction)
    pub external_direction: i8,
    pub external_speed: f32,
    /// Initial vertical speed of a jump (negative = up)
    pub jump_speed: f32,
    pub ground_snap: f32,
    pub alive: bool,
    history: TemporalBuffer<HeroFrame>,
}

impl Default for Hero {
    fn default() -> Self {
        Self::new(Vec3::ZERO)
    }
}

impl Hero {
    pub fn new(position: Vec3) -> Self {
        Self {
            position,
            falling_speed: 0.0,
            walking_speed: -HERO_WALK_SPEED,
            direction: 0,
            turning_speed: HERO_TURN_SPEED,
            external_direction: 1,
            external_speed: 0.0,
            jump_speed: -HERO_JUMP_SPEED,
            ground_snap: 0.0,
            alive: true,
            history: TemporalBuffer::new(),
        }
    }

    /// Distance run so far (positive forward)
    pub fn progress(&self) -> f32 {
        -self.position.z
    }

    pub fn is_grounded(&self) -> bool {
        self.position.y <= 0.0
    }

    /// Reset per-tick modifiers to their defaults for the given score
    pub fn reset_modifiers(&mut self, score: u32) {
        self.turning_speed = HERO_TURN_SPEED;
        self.external_speed = 0.0;
        self.jump_speed = -HERO_JUMP_SPEED;
        self.walking_speed = -HERO_WALK_SPEED * speed_factor(score);
    }

    /// Apply steering and jump input ahead of the physics step
    pub fn apply_controls(&mut self, steer: i8, jump: bool) {
        let steer = steer.signum();
        self.direction = steer;
        if steer != 0 {
            self.external_direction = steer;
        }

        if jump && self.alive && self.is_grounded() && self.falling_speed == 0.0 {
            self.falling_speed = self.jump_speed;
        }
    }

    /// Integrate one forward tick and record it
    pub fn advance(&mut self) {
        if !self.alive {
            self.falling_speed = self.falling_speed.max(0.0);
        }

        self.position.x += f32::from(self.external_direction) * self.external_speed;

        if self.is_grounded() && self.alive && self.falling_speed >= 0.0 {
            self.ground_snap = -self.position.y;
            self.position.y = 0.0;
            self.falling_speed = 0.0;
        } else {
            self.ground_snap = 0.0;
            self.falling_speed += GRAVITY;
            self.position.y -= self.falling_speed;
        }

        if !self.alive {
            self.walking_speed = 0.0;
        }
        self.position.z += self.walking_speed;

        self.position.x += f32::from(self.direction) * self.turning_speed;

        record_into(self, |h| &mut h.history);
    }

    pub fn rewind(&mut self) -> bool {
        replay_from(self, |h| &mut h.history)
    }

    pub fn history(&self) -> &TemporalBuffer<HeroFrame> {
        &self.history
    }

    /// Whether there is anything left to rewind
    pub fn can_rewind(&self) -> bool {
        !self.history.is_empty()
    }
}

impl Rewindable for Hero {
    type Snapshot = HeroFrame;

    fn capture(&self) -> HeroFrame {
        HeroFrame {
            walking_speed: self.walking_speed,
            falling_speed: self.falling_speed,
            direction: self.direction,
            turning_speed: self.turning_speed,
            external_direction: self.external_direction,
            external_speed: self.external_speed,
            ground_snap: self.ground_snap,
            alive: self.alive,
        }
    }

    fn apply_backward(&mut self, s: &HeroFrame) {
        self.position.x -= f32::from(s.direction) * s.turning_speed;
        self.position.z -= s.walking_speed;
        self.position.y += s.falling_speed;
        self.position.y -= s.ground_snap;
        self.position.x -= f32::from(s.external_direction) * s.external_speed;
        self.resume(s);
    }

    fn resume(&mut self, s: &HeroFrame) {
        self.walking_speed = s.walking_speed;
        self.falling_speed = s.falling_speed;
        self.direction = s.direction;
        self.turning_speed = s.turning_speed;
        self.external_direction = s.external_direction;
        self.external_speed = s.external_speed;
        self.ground_snap = s.ground_snap;
        self.alive = s.alive;
    }
}

/// Walking speed multiplier: ramps from 1 at score 0 up to a cap
pub fn speed_factor(score: u32) -> f32 {
    ((score as f32 + SPEED_RAMP) / SPEED_RAMP).min(MAX_SPEED_FACTOR)
}
