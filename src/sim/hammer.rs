//! Falling hammer hazard
//!
//! Drops from above its brick, bounces back up to a rest height, then falls again.

use glam::Vec3;
use serde::{Deserialize, Serialize};

use super::rewind::{Rewindable, TemporalBuffer, record_into, replay_from};
use crate::consts::{HAMMER_ACCEL, HAMMER_REST_HEIGHT, HAMMER_RISE_SPEED};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HammerFrame {
    pub direction: i8,
    pub falling_speed: f32,
}

#[derive(Debug, Clone)]
pub struct Hammer {
    pub position: Vec3,
    /// 1 while moving, 0 while frozen
    pub direction: i8,
    /// Positive = falling, negative = rising
    pub falling_speed: f32,
    history: TemporalBuffer<HammerFrame>,
}

impl Hammer {
    pub fn new(position: Vec3) -> Self {
        Self {
            position,
            direction: 1,
            falling_speed: 0.0,
            history: TemporalBuffer::new(),
        }
    }

    pub fn advance(&mut self, frozen: bool) {
        self.direction = if frozen { 0 } else { 1 };

        if self.direction != 0 {
            if self.position.y >= 0.0 && self.falling_speed >= 0.0 {
                self.falling_speed += f32::from(self.direction) * HAMMER_ACCEL;
            } else if self.position.y > HAMMER_REST_HEIGHT {
                self.falling_speed = 0.0;
            } else {
                self.falling_speed = -HAMMER_RISE_SPEED;
            }
        }

        self.position.y -= f32::from(self.direction) * self.falling_speed;
        record_into(self, |h| &mut h.history);
    }

    pub fn rewind(&mut self) -> bool {
        replay_from(self, |h| &mut h.history)
    }

    pub fn history(&self) -> &TemporalBuffer<HammerFrame> {
        &self.history
    }
}

impl Rewindable for Hammer {
    type Snapshot = HammerFrame;

    fn capture(&self) -> HammerFrame {
        HammerFrame {
            direction: self.direction,
            falling_speed: self.falling_speed,
        }
    }

    fn apply_backward(&mut self, snapshot: &HammerFrame) {
        self.position.y += f32::from(snapshot.direction) * snapshot.falling_speed;
        self.resume(snapshot);
    }

    fn resume(&mut self, snapshot: &HammerFrame) {
        self.direction = snapshot.direction;
        self.falling_speed = snapshot.falling_speed;
    }
}
