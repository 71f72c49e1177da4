//! Which terrain segment is under the hero
//!
//! Scans every solid brick across all lanes and picks the closest one in the
//! ground plane (x/z). Ties keep the first candidate in lane-then-queue order.

use glam::{Vec2, Vec3};
use serde::{Deserialize, Serialize};

use super::path::Path;
use super::terrain::BrickKind;

/// The governing segment for a hero position
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NearestSegment {
    pub lane: usize,
    /// Index into the lane's queue (0 = newest)
    pub slot: usize,
    pub kind: BrickKind,
    /// |dx| between hero and brick centre
    pub lateral: f32,
    /// |dz| between hero and brick centre
    pub longitudinal: f32,
    pub distance: f32,
}

/// Closest non-hole brick to `hero`, or `None` if there is nothing solid at all
pub fn nearest_segment(hero: Vec3, paths: &[Path]) -> Option<NearestSegment> {
    let mut best: Option<NearestSegment> = None;

    for path in paths {
        for (slot, brick) in path.bricks.iter().enumerate() {
            if !brick.kind.is_solid() {
                continue;
            }

            let offset = Vec2::new(brick.position.x - hero.x, brick.position.z - hero.z);
            let distance = offset.length();

            // Strict comparison: earlier candidates win ties
            if best.is_none_or(|b| distance < b.distance) {
                best = Some(NearestSegment {
                    lane: path.index,
                    slot,
                    kind: brick.kind,
                    lateral: offset.x.abs(),
                    longitudinal: offset.y.abs(),
                    distance,
                });
            }
        }
    }

    best
}
