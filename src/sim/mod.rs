//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - One tick per call, no wall-clock time
//! - Seeded RNG only, owned by the `World`
//! - Stable iteration order (lane, then queue position)
//! - No rendering or platform dependencies

pub mod brick;
pub mod diamond;
pub mod hammer;
pub mod hero;
pub mod lanes;
pub mod path;
pub mod proximity;
pub mod rewind;
pub mod state;
pub mod terrain;
pub mod tick;

pub use brick::Brick;
pub use diamond::Diamond;
pub use hammer::Hammer;
pub use hero::{Hero, speed_factor};
pub use lanes::{LaneAutomaton, LaneMask};
pub use path::{Path, PathContext};
pub use proximity::{NearestSegment, nearest_segment};
pub use rewind::{Frame, Rewindable, TemporalBuffer};
pub use state::{
    BrickView, Cues, DiamondView, GameEvent, HammerView, HeroView, Phase, World, WorldSnapshot,
};
pub use terrain::BrickKind;
pub use tick::{TickInput, tick};
