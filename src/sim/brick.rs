//! Terrain segment
//!
//! A brick exclusively owns its optional diamond and hammer. Rewinding a brick
//! always steps its children in the same call so the subtree stays frame-aligned.

use glam::Vec3;
use serde::{Deserialize, Serialize};

use super::diamond::Diamond;
use super::hammer::Hammer;
use super::rewind::{Rewindable, TemporalBuffer, record_into, replay_from};
use super::terrain::BrickKind;
use crate::consts::{HAMMER_DROP_HEIGHT, MOVING_RANGE, MOVING_SPEED};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BrickFrame {
    pub direction: i8,
    pub moving_speed: f32,
}

#[derive(Debug, Clone)]
pub struct Brick {
    pub kind: BrickKind,
    pub position: Vec3,
    /// Spawn position; moving platforms oscillate around its x
    pub origin: Vec3,
    /// -1 / 1 for moving platforms, 0 otherwise
    pub direction: i8,
    pub moving_speed: f32,
    pub diamond: Option<Diamond>,
    pub hammer: Option<Hammer>,
    history: TemporalBuffer<BrickFrame>,
}

impl Brick {
    /// Spawn a brick at a lane head. `diamond_value` attaches a diamond unless the kind forbids it.
    pub fn new(head: Vec3, kind: BrickKind, diamond_value: Option<u32>) -> Self {
        let position = head + Vec3::X * kind.lateral_offset();

        let diamond = diamond_value
            .filter(|_| kind.can_hold_diamond())
            .map(Diamond::new);

        let hammer = (kind == BrickKind::Hammer)
            .then(|| Hammer::new(Vec3::new(position.x, HAMMER_DROP_HEIGHT, position.z)));

        Self {
            kind,
            position,
            origin: position,
            direction: if kind == BrickKind::Moving { -1 } else { 0 },
            moving_speed: MOVING_SPEED,
            diamond,
            hammer,
            history: TemporalBuffer::new(),
        }
    }

    /// Continue a predecessor platform's motion across the spawn seam
    pub fn continue_motion(&mut self, previous: &Brick) {
        self.position.x = previous.position.x;
        self.origin.x = previous.origin.x;
        self.direction = previous.direction;
        self.moving_speed = previous.moving_speed;
    }

    /// Advance one forward tick (children included) and record it
    pub fn advance(&mut self, frozen: bool) {
        if self.kind == BrickKind::Moving {
            if frozen {
                self.moving_speed = 0.0;
            } else {
                self.moving_speed = MOVING_SPEED;
                if (self.position.x - self.origin.x).abs() > MOVING_RANGE {
                    self.direction = -self.direction;
                }
                self.position.x += f32::from(self.direction) * self.moving_speed;
            }
        }

        if let Some(diamond) = &mut self.diamond {
            diamond.advance(frozen);
        }
        if let Some(hammer) = &mut self.hammer {
            hammer.advance(frozen);
        }

        record_into(self, |b| &mut b.history);
    }

    /// Step this brick and its children back one tick
    pub fn rewind(&mut self) -> bool {
        let stepped = replay_from(self, |b| &mut b.history);
        if let Some(diamond) = &mut self.diamond {
            diamond.rewind();
        }
        if let Some(hammer) = &mut self.hammer {
            hammer.rewind();
        }
        stepped
    }

    pub fn history(&self) -> &TemporalBuffer<BrickFrame> {
        &self.history
    }

    /// Where the diamond (if any) is drawn
    pub fn diamond_position(&self) -> Vec3 {
        self.position
    }
}

impl Rewindable for Brick {
    type Snapshot = BrickFrame;

    fn capture(&self) -> BrickFrame {
        BrickFrame {
            direction: self.direction,
            moving_speed: self.moving_speed,
        }
    }

    fn apply_backward(&mut self, snapshot: &BrickFrame) {
        // Frozen ticks record speed 0, so this is a no-op for them
        if self.kind == BrickKind::Moving {
            self.position.x -= f32::from(snapshot.direction) * snapshot.moving_speed;
        }
        self.resume(snapshot);
    }

    fn resume(&mut self, snapshot: &BrickFrame) {
        self.direction = snapshot.direction;
        self.moving_speed = snapshot.moving_speed;
    }
}
