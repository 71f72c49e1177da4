//! World-level lane configuration
//!
//! Which of the three lanes currently spawn terrain is a Markov chain over the
//! seven non-empty lane masks. The transition graph is fixed and deliberately
//! asymmetric: from `LEFT_RIGHT` there is no direct edge to a single side lane.

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::consts::LANE_COUNT;

/// Non-empty subset of {left, center, right}; bit `i` is lane `i`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LaneMask(u8);

impl LaneMask {
    pub const LEFT: LaneMask = LaneMask(0b001);
    pub const CENTER: LaneMask = LaneMask(0b010);
    pub const RIGHT: LaneMask = LaneMask(0b100);
    pub const LEFT_CENTER: LaneMask = LaneMask(0b011);
    pub const CENTER_RIGHT: LaneMask = LaneMask(0b110);
    pub const LEFT_RIGHT: LaneMask = LaneMask(0b101);
    pub const ALL: LaneMask = LaneMask(0b111);

    /// Every valid configuration
    pub const STATES: [LaneMask; 7] = [
        Self::LEFT,
        Self::CENTER,
        Self::RIGHT,
        Self::LEFT_CENTER,
        Self::CENTER_RIGHT,
        Self::LEFT_RIGHT,
        Self::ALL,
    ];

    /// Build from raw bits; `None` for the empty mask or stray bits
    pub fn from_bits(bits: u8) -> Option<Self> {
        (bits != 0 && bits & !Self::ALL.0 == 0).then_some(Self(bits))
    }

    pub fn bits(self) -> u8 {
        self.0
    }

    pub fn is_active(self, lane: usize) -> bool {
        lane < LANE_COUNT && self.0 & (1 << lane) != 0
    }

    pub fn active_count(self) -> u32 {
        self.0.count_ones()
    }

    /// Outgoing edges of the transition graph
    pub fn successors(self) -> &'static [LaneMask] {
        use LaneMask as M;
        match self {
            M::LEFT => &[M::CENTER, M::LEFT_CENTER, M::CENTER_RIGHT, M::LEFT_RIGHT, M::ALL],
            M::CENTER => &[
                M::LEFT,
                M::RIGHT,
                M::LEFT_CENTER,
                M::CENTER_RIGHT,
                M::LEFT_RIGHT,
                M::ALL,
            ],
            M::RIGHT => &[M::CENTER, M::LEFT_CENTER, M::CENTER_RIGHT, M::LEFT_RIGHT, M::ALL],
            M::LEFT_CENTER => &[
                M::LEFT,
                M::CENTER,
                M::RIGHT,
                M::CENTER_RIGHT,
                M::LEFT_RIGHT,
                M::ALL,
            ],
            M::CENTER_RIGHT => &[
                M::LEFT,
                M::CENTER,
                M::RIGHT,
                M::LEFT_CENTER,
                M::LEFT_RIGHT,
                M::ALL,
            ],
            M::LEFT_RIGHT => &[M::CENTER, M::LEFT_CENTER, M::CENTER_RIGHT, M::ALL],
            M::ALL => &[
                M::LEFT,
                M::CENTER,
                M::RIGHT,
                M::LEFT_CENTER,
                M::CENTER_RIGHT,
                M::LEFT_RIGHT,
            ],
            _ => &[],
        }
    }
}

impl Default for LaneMask {
    fn default() -> Self {
        Self::CENTER
    }
}

/// Owns the current lane configuration; threaded through `tick` by the world
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LaneAutomaton {
    current: LaneMask,
    /// Per-tick chance of switching configuration
    switch_chance: f32,
}

impl LaneAutomaton {
    pub fn new(switch_chance: f32) -> Self {
        Self {
            current: LaneMask::CENTER,
            switch_chance,
        }
    }

    pub fn current(&self) -> LaneMask {
        self.current
    }

    pub fn switch_chance(&self) -> f32 {
        self.switch_chance
    }

    /// Roll once for a transition. Returns `(from, to)` when the configuration changed.
    pub fn step<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Option<(LaneMask, LaneMask)> {
        if rng.random::<f32>() >= self.switch_chance {
            return None;
        }

        let options = self.current.successors();
        if options.is_empty() {
            return None;
        }

        let from = self.current;
        self.current = options[rng.random_range(0..options.len())];
        log::debug!("Lanes {:03b} -> {:03b}", from.bits(), self.current.bits());
        Some((from, self.current))
    }
}
