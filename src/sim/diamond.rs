//! Spinning collectible riding on a brick
//!
//! A diamond has no position of its own: it sits on its parent brick.
//! Collection is permanent and is *not* part of the rewind snapshot.

use serde::{Deserialize, Serialize};

use super::rewind::{Rewindable, TemporalBuffer, record_into, replay_from};
use crate::consts::DIAMOND_SPIN_SPEED;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DiamondFrame {
    pub direction: i8,
}

#[derive(Debug, Clone)]
pub struct Diamond {
    /// Rewind budget granted on pickup (0 once collected)
    pub value: u32,
    pub visible: bool,
    /// Spin angle (radians)
    pub rotation: f32,
    /// 1 while spinning, 0 while frozen
    pub direction: i8,
    history: TemporalBuffer<DiamondFrame>,
}

impl Diamond {
    pub fn new(value: u32) -> Self {
        Self {
            value,
            visible: true,
            rotation: 0.0,
            direction: 1,
            history: TemporalBuffer::new(),
        }
    }

    /// Take the diamond's value. Returns 0 if it was already collected.
    pub fn collect(&mut self) -> u32 {
        let value = self.value;
        self.value = 0;
        self.visible = false;
        value
    }

    pub fn is_collected(&self) -> bool {
        !self.visible
    }

    /// Spin one tick and record it
    pub fn advance(&mut self, frozen: bool) {
        self.direction = if frozen { 0 } else { 1 };
        self.rotation += f32::from(self.direction) * DIAMOND_SPIN_SPEED;
        record_into(self, |d| &mut d.history);
    }

    pub fn rewind(&mut self) -> bool {
        replay_from(self, |d| &mut d.history)
    }

    pub fn history(&self) -> &TemporalBuffer<DiamondFrame> {
        &self.history
    }
}

impl Rewindable for Diamond {
    type Snapshot = DiamondFrame;

    fn capture(&self) -> DiamondFrame {
        DiamondFrame {
            direction: self.direction,
        }
    }

    fn has_changed(&self, last: &DiamondFrame) -> bool {
        last.direction != self.direction
    }

    fn apply_backward(&mut self, snapshot: &DiamondFrame) {
        self.rotation -= f32::from(snapshot.direction) * DIAMOND_SPIN_SPEED;
        self.direction = snapshot.direction;
    }

    fn resume(&mut self, snapshot: &DiamondFrame) {
        self.direction = snapshot.direction;
    }
}
