//! Nearest-flower selection and the rstar-backed obstacle index.

use crate::flower::Flower;
use crate::math;
use crate::placement::OverlapQuery;
use rstar::{RTree, AABB};

/// Find the index of the nearest flower with nectar, measured from `observer`
/// to each flower's anchor position.
///
/// `previous` models target stickiness: a still-active previous target is
/// kept unless some other active flower is strictly closer, so equally close
/// candidates never cause target thrashing. Without a usable `previous`, the
/// first active flower encountered wins ties (strict `<` comparison).
///
/// Returns `None` iff no flower has nectar. That is a valid terminal state
/// for a depleted field, not an error.
pub fn find_nearest(
    observer: [f64; 3],
    flowers: &[Flower],
    previous: Option<usize>,
) -> Option<usize> {
    let mut best: Option<(usize, f64)> = previous
        .filter(|&idx| flowers.get(idx).is_some_and(|f| f.has_nectar()))
        .map(|idx| (idx, math::distance(observer, flowers[idx].anchor().position)));

    for (idx, flower) in flowers.iter().enumerate() {
        if !flower.has_nectar() {
            continue;
        }
        let dist = math::distance(observer, flower.anchor().position);
        match best {
            Some((_, best_dist)) if dist >= best_dist => {}
            _ => best = Some((idx, dist)),
        }
    }
    best.map(|(idx, _)| idx)
}

/// Static point index answering the spawn sampler's overlap queries.
///
/// Built once per scene from obstacle positions (flower anchors in the
/// headless driver); an AABB envelope query followed by a Euclidean distance
/// filter counts the points inside the clearance sphere.
pub struct ObstacleIndex {
    tree: RTree<[f64; 3]>,
}

impl ObstacleIndex {
    pub fn new(points: Vec<[f64; 3]>) -> Self {
        Self {
            tree: RTree::bulk_load(points),
        }
    }

    pub fn count_within(&self, center: [f64; 3], radius: f64) -> usize {
        let envelope = AABB::from_corners(
            [center[0] - radius, center[1] - radius, center[2] - radius],
            [center[0] + radius, center[1] + radius, center[2] + radius],
        );
        let r_sq = radius * radius;
        self.tree
            .locate_in_envelope(&envelope)
            .filter(|p| {
                let dx = p[0] - center[0];
                let dy = p[1] - center[1];
                let dz = p[2] - center[2];
                dx * dx + dy * dy + dz * dz <= r_sq
            })
            .count()
    }
}

impl OverlapQuery for ObstacleIndex {
    fn overlap_count(&self, point: [f64; 3], radius: f64) -> usize {
        self.count_within(point, radius)
    }
}
