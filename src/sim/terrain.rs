//! Terrain kinds and their mutation table
//!
//! Each lane emits one kind at a time. After every spawn the lane may mutate to a
//! successor kind; which successors exist depends on how far the hero has run.

use serde::{Deserialize, Serialize};

/// Distance the hero must exceed before a kind can appear
pub const BOMB_UNLOCK: f32 = 500.0;
pub const ICE_UNLOCK: f32 = 500.0;
pub const HOLE_UNLOCK: f32 = 750.0;
pub const STICKY_UNLOCK: f32 = 1000.0;
pub const NARROW_UNLOCK: f32 = 1500.0;
pub const HAMMER_UNLOCK: f32 = 2000.0;
pub const MOVING_UNLOCK: f32 = 2000.0;

/// Surface / hazard category of a spawned brick
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum BrickKind {
    #[default]
    Normal,
    NarrowLeft,
    NarrowRight,
    Sticky,
    NarrowLeftSticky,
    NarrowRightSticky,
    Ice,
    NarrowLeftIce,
    NarrowRightIce,
    Hole,
    Moving,
    Bomb,
    Hammer,
}

/// A successor kind, optionally gated behind a progress distance
type Edge = (BrickKind, Option<f32>);

struct Rule {
    mutation_chance: f32,
    successors: &'static [Edge],
}

use BrickKind as K;

/// Indexed by `BrickKind as usize`
const RULES: [Rule; 13] = [
    // Normal
    Rule {
        mutation_chance: 0.1,
        successors: &[
            (K::Bomb, Some(BOMB_UNLOCK)),
            (K::Hammer, Some(HAMMER_UNLOCK)),
            (K::Sticky, Some(STICKY_UNLOCK)),
            (K::Ice, Some(ICE_UNLOCK)),
            (K::Hole, Some(HOLE_UNLOCK)),
            (K::NarrowLeft, Some(NARROW_UNLOCK)),
            (K::NarrowRight, Some(NARROW_UNLOCK)),
        ],
    },
    // NarrowLeft
    Rule {
        mutation_chance: 0.5,
        successors: &[(K::Normal, None)],
    },
    // NarrowRight
    Rule {
        mutation_chance: 0.5,
        successors: &[(K::Normal, None)],
    },
    // Sticky
    Rule {
        mutation_chance: 0.3,
        successors: &[
            (K::Normal, None),
            (K::Hole, Some(HOLE_UNLOCK)),
            (K::NarrowLeftSticky, Some(NARROW_UNLOCK)),
            (K::NarrowRightSticky, Some(NARROW_UNLOCK)),
        ],
    },
    // NarrowLeftSticky
    Rule {
        mutation_chance: 0.3,
        successors: &[(K::Sticky, None)],
    },
    // NarrowRightSticky
    Rule {
        mutation_chance: 0.3,
        successors: &[(K::Sticky, None)],
    },
    // Ice
    Rule {
        mutation_chance: 0.3,
        successors: &[
            (K::Normal, None),
            (K::Hole, Some(HOLE_UNLOCK)),
            (K::NarrowLeftIce, Some(NARROW_UNLOCK)),
            (K::NarrowRightIce, Some(NARROW_UNLOCK)),
        ],
    },
    // NarrowLeftIce
    Rule {
        mutation_chance: 0.3,
        successors: &[(K::Ice, None)],
    },
    // NarrowRightIce
    Rule {
        mutation_chance: 0.3,
        successors: &[(K::Ice, None)],
    },
    // Hole
    Rule {
        mutation_chance: 1.0,
        successors: &[
            (K::Normal, None),
            (K::Ice, Some(ICE_UNLOCK)),
            (K::Sticky, Some(STICKY_UNLOCK)),
            (K::Moving, Some(MOVING_UNLOCK)),
        ],
    },
    // Moving
    Rule {
        mutation_chance: 0.3,
        successors: &[(K::Hole, Some(HOLE_UNLOCK))],
    },
    // Bomb
    Rule {
        mutation_chance: 1.0,
        successors: &[(K::Normal, None)],
    },
    // Hammer
    Rule {
        mutation_chance: 1.0,
        successors: &[(K::Normal, None)],
    },
];

impl BrickKind {
    pub const ALL: [BrickKind; 13] = [
        K::Normal,
        K::NarrowLeft,
        K::NarrowRight,
        K::Sticky,
        K::NarrowLeftSticky,
        K::NarrowRightSticky,
        K::Ice,
        K::NarrowLeftIce,
        K::NarrowRightIce,
        K::Hole,
        K::Moving,
        K::Bomb,
        K::Hammer,
    ];

    fn rule(self) -> &'static Rule {
        &RULES[self as usize]
    }

    /// Chance that a lane emitting this kind mutates after a spawn
    pub fn mutation_chance(self) -> f32 {
        self.rule().mutation_chance
    }

    /// Kinds this one may mutate into at the given progress distance.
    ///
    /// Order follows the table so random picks stay reproducible for a seed.
    pub fn successors(self, progress: f32) -> Vec<BrickKind> {
        self.rule()
            .successors
            .iter()
            .filter(|(_, unlock)| unlock.is_none_or(|threshold| progress > threshold))
            .map(|&(kind, _)| kind)
            .collect()
    }

    pub fn is_narrow(self) -> bool {
        matches!(
            self,
            K::NarrowLeft
                | K::NarrowRight
                | K::NarrowLeftSticky
                | K::NarrowRightSticky
                | K::NarrowLeftIce
                | K::NarrowRightIce
        )
    }

    pub fn is_icy(self) -> bool {
        matches!(self, K::Ice | K::NarrowLeftIce | K::NarrowRightIce)
    }

    pub fn is_sticky(self) -> bool {
        matches!(self, K::Sticky | K::NarrowLeftSticky | K::NarrowRightSticky)
    }

    /// Lateral shift applied to narrow bricks at spawn
    pub fn lateral_offset(self) -> f32 {
        match self {
            K::NarrowLeft | K::NarrowLeftSticky | K::NarrowLeftIce => -crate::consts::NARROW_OFFSET,
            K::NarrowRight | K::NarrowRightSticky | K::NarrowRightIce => {
                crate::consts::NARROW_OFFSET
            }
            _ => 0.0,
        }
    }

    /// Holes have no surface: they are skipped by the proximity query
    pub fn is_solid(self) -> bool {
        self != K::Hole
    }

    /// Whether a diamond may sit on this kind
    pub fn can_hold_diamond(self) -> bool {
        self != K::Hole
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_table_is_indexed_by_kind() {
        for (i, kind) in BrickKind::ALL.iter().enumerate() {
            assert_eq!(*kind as usize, i);
        }
    }

    #[test]
    fn test_fresh_run_has_no_normal_successors() {
        assert!(BrickKind::Normal.successors(0.0).is_empty());
        // Exactly at a threshold is still locked
        assert!(BrickKind::Normal.successors(BOMB_UNLOCK).is_empty());
    }

    #[test]
    fn test_unlock_order() {
        let at = |d: f32| BrickKind::Normal.successors(d);
        assert_eq!(at(600.0), vec![K::Bomb, K::Ice]);
        assert_eq!(at(800.0), vec![K::Bomb, K::Ice, K::Hole]);
        assert_eq!(at(1200.0), vec![K::Bomb, K::Sticky, K::Ice, K::Hole]);
        assert_eq!(at(5000.0).len(), 7);
    }

    #[test]
    fn test_successors_grow_with_progress() {
        let distances = [0.0, 100.0, 500.0, 501.0, 751.0, 1001.0, 1501.0, 2001.0, 10_000.0];
        for kind in BrickKind::ALL {
            let mut previous: HashSet<BrickKind> = HashSet::new();
            for d in distances {
                let current: HashSet<_> = kind.successors(d).into_iter().collect();
                assert!(
                    current.is_superset(&previous),
                    "{kind:?} lost successors at {d}"
                );
                previous = current;
            }
        }
    }

    #[test]
    fn test_one_shot_hazards_always_revert() {
        for kind in [K::Bomb, K::Hammer, K::Hole] {
            assert_eq!(kind.mutation_chance(), 1.0);
            assert!(kind.successors(0.0).contains(&K::Normal));
        }
        assert_eq!(K::Normal.mutation_chance(), 0.1);
    }

    #[test]
    fn test_moving_stays_put_until_holes_unlock() {
        assert!(K::Moving.successors(700.0).is_empty());
        assert_eq!(K::Moving.successors(800.0), vec![K::Hole]);
    }

    #[test]
    fn test_narrow_offsets() {
        assert!(K::NarrowLeftIce.lateral_offset() < 0.0);
        assert!(K::NarrowRightSticky.lateral_offset() > 0.0);
        assert_eq!(K::Ice.lateral_offset(), 0.0);
        assert!(K::NarrowRight.is_narrow() && !K::Moving.is_narrow());
    }
}
