//! World state and the per-tick snapshot handed to the renderer
//!
//! The world owns everything: hero, lanes, the lane automaton and the RNG.
//! Nothing here is global; callers thread one `World` through `tick`.

use glam::Vec3;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::brick::Brick;
use super::hero::{Hero, speed_factor};
use super::lanes::{LaneAutomaton, LaneMask};
use super::path::Path;
use super::proximity::NearestSegment;
use super::terrain::BrickKind;
use crate::consts::{BASE_VISIBILITY, LANE_COUNT};
use crate::tuning::Tuning;

/// Mode of the most recent tick
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Phase {
    /// Forward simulation
    Running,
    /// Replaying history backward
    Rewinding,
    /// Hero fell out of the world; ticks are no-ops
    GameOver,
}

/// Things that happened during a tick (for audio / UI)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    LanesChanged { from: LaneMask, to: LaneMask },
    DiamondCollected { value: u32 },
    BombLaunched,
    HammerStrike,
    HeroFell,
    FreezeStarted,
    RewindStarted,
    RewindEnded,
    GameOver { score: u32 },
}

/// Screen-effect levels the renderer blends in
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Cues {
    /// 1.0 is neutral; flashes push it up, hammer strikes black it out
    pub brightness: f32,
    /// Grayscale amount from rewinding (0-1)
    pub rewind_tint: f32,
    /// Freeze timer (0-1); the world is frozen while > 0
    pub freeze: f32,
}

impl Default for Cues {
    fn default() -> Self {
        Self {
            brightness: 1.0,
            rewind_tint: 0.0,
            freeze: 0.0,
        }
    }
}

impl Cues {
    /// Ease brightness back toward neutral
    pub fn relax_brightness(&mut self) {
        if self.brightness >= 1.05 {
            self.brightness -= 0.05;
        } else if self.brightness <= 0.95 {
            self.brightness += 0.01;
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HeroView {
    pub position: Vec3,
    pub alive: bool,
    pub score: u32,
    pub rewind_budget: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DiamondView {
    pub position: Vec3,
    pub visible: bool,
    pub rotation: f32,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HammerView {
    pub position: Vec3,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BrickView {
    pub lane: usize,
    pub kind: BrickKind,
    pub position: Vec3,
    pub diamond: Option<DiamondView>,
    pub hammer: Option<HammerView>,
}

impl BrickView {
    fn of(lane: usize, brick: &Brick) -> Self {
        Self {
            lane,
            kind: brick.kind,
            position: brick.position,
            diamond: brick.diamond.as_ref().map(|d| DiamondView {
                position: brick.diamond_position(),
                visible: d.visible,
                rotation: d.rotation,
            }),
            hammer: brick.hammer.as_ref().map(|h| HammerView { position: h.position }),
        }
    }
}

/// Read-only picture of the world between ticks
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorldSnapshot {
    pub tick: u64,
    pub phase: Phase,
    pub hero: HeroView,
    pub lanes: LaneMask,
    pub bricks: Vec<BrickView>,
    /// Segment under the hero (forward ticks only)
    pub governing: Option<NearestSegment>,
    pub events: Vec<GameEvent>,
    pub cues: Cues,
}

/// Complete simulation state for one run
#[derive(Debug, Clone)]
pub struct World {
    /// Run seed for reproducibility
    pub seed: u64,
    pub tuning: Tuning,
    pub(crate) rng: Pcg32,
    /// Ticks processed (forward and rewind)
    pub tick: u64,
    pub phase: Phase,
    pub hero: Hero,
    pub lanes: LaneAutomaton,
    pub paths: [Path; LANE_COUNT],
    /// Best distance reached; rewinding never lowers it
    pub score: u32,
    /// Ticks of rewind available
    pub rewind_budget: u32,
    pub cues: Cues,
    /// Result of the latest proximity query
    pub governing: Option<NearestSegment>,
    /// Events raised by the latest tick
    pub events: Vec<GameEvent>,
}

impl World {
    /// Create a new run with stock tuning
    pub fn new(seed: u64) -> Self {
        Self::with_tuning(seed, Tuning::default())
    }

    pub fn with_tuning(seed: u64, tuning: Tuning) -> Self {
        log::info!("New run: seed={seed}");
        Self {
            seed,
            rng: Pcg32::seed_from_u64(seed),
            tick: 0,
            phase: Phase::Running,
            hero: Hero::default(),
            lanes: LaneAutomaton::new(tuning.lane_switch_chance),
            paths: [Path::new(0), Path::with_runway(1), Path::new(2)],
            score: 0,
            rewind_budget: 0,
            cues: Cues::default(),
            governing: None,
            events: Vec::new(),
            tuning,
        }
    }

    /// How far behind the hero bricks are kept.
    ///
    /// Grows with the rewind budget so there is still ground to rewind onto.
    pub fn visibility_window(&self) -> f32 {
        speed_factor(self.score) * self.rewind_budget as f32 + BASE_VISIBILITY
    }

    pub fn is_frozen(&self) -> bool {
        self.cues.freeze > 0.0
    }

    pub fn is_over(&self) -> bool {
        self.phase == Phase::GameOver
    }

    /// Every live brick with its lane, in lane-then-queue order
    pub fn bricks(&self) -> impl Iterator<Item = (usize, &Brick)> {
        self.paths
            .iter()
            .flat_map(|path| path.bricks.iter().map(move |brick| (path.index, brick)))
    }

    /// Add budget, clamped to capacity
    pub fn grant_rewind(&mut self, ticks: u32) {
        self.rewind_budget = self
            .rewind_budget
            .saturating_add(ticks)
            .min(self.tuning.rewind_capacity);
    }

    pub fn snapshot(&self) -> WorldSnapshot {
        WorldSnapshot {
            tick: self.tick,
            phase: self.phase,
            hero: HeroView {
                position: self.hero.position,
                alive: self.hero.alive,
                score: self.score,
                rewind_budget: self.rewind_budget,
            },
            lanes: self.lanes.current(),
            bricks: self
                .bricks()
                .map(|(lane, brick)| BrickView::of(lane, brick))
                .collect(),
            governing: self.governing,
            events: self.events.clone(),
            cues: self.cues,
        }
    }
}
