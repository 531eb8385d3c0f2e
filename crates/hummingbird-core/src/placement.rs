//! Rejection-sampling spawn placement with a bounded retry budget.

use crate::agent::Pose;
use crate::field::FlowerField;
use crate::math;
use rand::Rng;
use std::{error::Error, fmt};

/// Maximum candidate poses tried before placement fails.
pub const MAX_SPAWN_ATTEMPTS: usize = 100;

/// Clearance radius the candidate position must keep free of obstacles.
pub const SPAWN_CLEARANCE_RADIUS: f64 = 0.05;

const FRONT_STANDOFF_MIN: f64 = 0.10;
const FRONT_STANDOFF_MAX: f64 = 0.20;
const FREE_HEIGHT_MIN: f64 = 1.2;
const FREE_HEIGHT_MAX: f64 = 2.5;
const FREE_RADIUS_MIN: f64 = 2.0;
const FREE_RADIUS_MAX: f64 = 7.0;
const FREE_PITCH_LIMIT: f64 = 60.0;

/// Overlap query answered by the external collision system: how many
/// obstacles intersect the sphere at `point` with the given `radius`.
pub trait OverlapQuery {
    fn overlap_count(&self, point: [f64; 3], radius: f64) -> usize;
}

impl<F: Fn([f64; 3], f64) -> usize> OverlapQuery for F {
    fn overlap_count(&self, point: [f64; 3], radius: f64) -> usize {
        self(point, radius)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SpawnError {
    /// Every attempt overlapped an obstacle. The environment is considered
    /// misconfigured (too dense or too small for the clearance radius), so
    /// episode setup must abort rather than place the agent in a collision.
    Exhausted { attempts: usize },
}

impl fmt::Display for SpawnError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SpawnError::Exhausted { attempts } => write!(
                f,
                "no collision-free spawn pose after {attempts} attempts; \
                 field is too dense for a {SPAWN_CLEARANCE_RADIUS} clearance radius"
            ),
        }
    }
}

impl Error for SpawnError {}

/// Accepted spawn pose plus how many attempts the rejection loop used.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SpawnOutcome {
    pub pose: Pose,
    pub attempts: usize,
}

/// Sample a collision-free pose for the agent.
///
/// With `in_front_of_flower` the candidate stands a random 0.10-0.20 off a
/// uniformly chosen flower's anchor along its up axis, oriented to look at
/// the anchor. Otherwise the candidate floats freely: height in [1.2, 2.5],
/// radius in [2.0, 7.0] and heading in [-180, 180] degrees around the field
/// center, with pitch in [-60, 60] and yaw in [-180, 180] drawn
/// independently. The first candidate whose clearance sphere reports zero
/// overlaps is returned.
pub fn sample_pose<R: Rng + ?Sized>(
    field: &FlowerField,
    in_front_of_flower: bool,
    overlap: &impl OverlapQuery,
    rng: &mut R,
) -> Result<SpawnOutcome, SpawnError> {
    for attempt in 1..=MAX_SPAWN_ATTEMPTS {
        let pose = if in_front_of_flower {
            let flower = &field.flowers()[field.pick_random(rng)];
            let standoff = rng.random_range(FRONT_STANDOFF_MIN..=FRONT_STANDOFF_MAX);
            let position = math::add(
                flower.anchor().position,
                math::scale(flower.anchor().up, standoff),
            );
            let to_flower = math::sub(flower.anchor().position, position);
            let (pitch_deg, yaw_deg) = math::look_at_pitch_yaw(to_flower);
            Pose {
                position,
                pitch_deg,
                yaw_deg,
            }
        } else {
            let height = rng.random_range(FREE_HEIGHT_MIN..=FREE_HEIGHT_MAX);
            let radius = rng.random_range(FREE_RADIUS_MIN..=FREE_RADIUS_MAX);
            let heading = rng.random_range(-180.0..=180.0);
            let position = math::add(
                math::add(field.center(), [0.0, height, 0.0]),
                math::scale(math::yaw_forward(heading), radius),
            );
            Pose {
                position,
                pitch_deg: rng.random_range(-FREE_PITCH_LIMIT..=FREE_PITCH_LIMIT),
                yaw_deg: rng.random_range(-180.0..=180.0),
            }
        };

        if overlap.overlap_count(pose.position, SPAWN_CLEARANCE_RADIUS) == 0 {
            return Ok(SpawnOutcome {
                pose,
                attempts: attempt,
            });
        }
    }
    Err(SpawnError::Exhausted {
        attempts: MAX_SPAWN_ATTEMPTS,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::flower::{AnchorPose, Flower};
    use rand::SeedableRng;
    use rand_chacha::ChaCha12Rng;
    use std::cell::Cell;

    fn ring_field() -> FlowerField {
        let flowers = (0..6)
            .map(|i| {
                let theta = i as f64 * std::f64::consts::TAU / 6.0;
                Flower::new(
                    1.0,
                    AnchorPose::new(
                        [4.0 * theta.sin(), 1.5, 4.0 * theta.cos()],
                        [theta.sin(), 2.0, theta.cos()],
                    ),
                )
            })
            .collect();
        FlowerField::new(flowers, [0.0, 0.0, 0.0]).unwrap()
    }

    #[test]
    fn clear_space_accepts_first_attempt_with_one_query() {
        let field = ring_field();
        let queries = Cell::new(0usize);
        let overlap = |_point: [f64; 3], _radius: f64| {
            queries.set(queries.get() + 1);
            0
        };
        let mut rng = ChaCha12Rng::seed_from_u64(1);
        let outcome = sample_pose(&field, true, &overlap, &mut rng).unwrap();
        assert_eq!(outcome.attempts, 1);
        assert_eq!(queries.get(), 1);
    }

    #[test]
    fn blocked_space_issues_exactly_one_hundred_queries_then_fails() {
        let field = ring_field();
        let queries = Cell::new(0usize);
        let overlap = |_point: [f64; 3], _radius: f64| {
            queries.set(queries.get() + 1);
            3
        };
        let mut rng = ChaCha12Rng::seed_from_u64(1);
        let err = sample_pose(&field, false, &overlap, &mut rng).unwrap_err();
        assert_eq!(err, SpawnError::Exhausted { attempts: 100 });
        assert_eq!(queries.get(), 100);
    }

    #[test]
    fn front_pose_stands_off_along_the_up_axis_looking_back() {
        let field = ring_field();
        let clear = |_p: [f64; 3], _r: f64| 0usize;
        let mut rng = ChaCha12Rng::seed_from_u64(3);
        for _ in 0..50 {
            let outcome = sample_pose(&field, true, &clear, &mut rng).unwrap();
            let standoff = field
                .flowers()
                .iter()
                .map(|f| math::distance(outcome.pose.position, f.anchor().position))
                .fold(f64::INFINITY, f64::min);
            assert!(
                (FRONT_STANDOFF_MIN - 1e-9..=FRONT_STANDOFF_MAX + 1e-9).contains(&standoff),
                "standoff {standoff} outside [0.10, 0.20]"
            );
        }
    }

    #[test]
    fn front_pose_points_at_the_chosen_anchor() {
        let flowers = vec![Flower::new(
            1.0,
            AnchorPose::new([0.0, 1.5, 0.0], [0.0, 1.0, 0.0]),
        )];
        let field = FlowerField::new(flowers, [0.0, 0.0, 0.0]).unwrap();
        let clear = |_p: [f64; 3], _r: f64| 0usize;
        let mut rng = ChaCha12Rng::seed_from_u64(5);
        let outcome = sample_pose(&field, true, &clear, &mut rng).unwrap();
        // Candidate sits straight above the anchor, so it must look straight down.
        assert!((outcome.pose.pitch_deg - 90.0).abs() < 1e-9);
    }

    #[test]
    fn free_pose_stays_within_the_sampling_annulus() {
        let field = ring_field();
        let clear = |_p: [f64; 3], _r: f64| 0usize;
        let mut rng = ChaCha12Rng::seed_from_u64(9);
        for _ in 0..100 {
            let outcome = sample_pose(&field, false, &clear, &mut rng).unwrap();
            let p = outcome.pose.position;
            let horizontal = (p[0] * p[0] + p[2] * p[2]).sqrt();
            assert!((FREE_HEIGHT_MIN..=FREE_HEIGHT_MAX).contains(&p[1]));
            assert!((FREE_RADIUS_MIN - 1e-9..=FREE_RADIUS_MAX + 1e-9).contains(&horizontal));
            assert!(outcome.pose.pitch_deg.abs() <= FREE_PITCH_LIMIT);
            assert!(outcome.pose.yaw_deg.abs() <= 180.0);
        }
    }

    #[test]
    fn sampling_is_deterministic_for_a_fixed_seed() {
        let field = ring_field();
        let clear = |_p: [f64; 3], _r: f64| 0usize;
        let mut a = ChaCha12Rng::seed_from_u64(21);
        let mut b = ChaCha12Rng::seed_from_u64(21);
        let pose_a = sample_pose(&field, false, &clear, &mut a).unwrap().pose;
        let pose_b = sample_pose(&field, false, &clear, &mut b).unwrap().pose;
        assert_eq!(pose_a, pose_b);
    }

    #[test]
    fn retries_until_a_clear_candidate_appears() {
        let field = ring_field();
        let queries = Cell::new(0usize);
        let overlap = |_point: [f64; 3], _radius: f64| {
            queries.set(queries.get() + 1);
            // First four candidates blocked, fifth is clear.
            usize::from(queries.get() < 5)
        };
        let mut rng = ChaCha12Rng::seed_from_u64(2);
        let outcome = sample_pose(&field, true, &overlap, &mut rng).unwrap();
        assert_eq!(outcome.attempts, 5);
        assert_eq!(queries.get(), 5);
    }
}
