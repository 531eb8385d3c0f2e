//! Hummingbird agent state and the per-tick observation vector.

use crate::flower::Flower;
use crate::math;
use serde::{Deserialize, Serialize};

/// Position plus pitch/yaw orientation in degrees. Roll is always zero.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Pose {
    pub position: [f64; 3],
    pub pitch_deg: f64,
    pub yaw_deg: f64,
}

/// Mutable per-agent state. The position is the beak reference point: the
/// external rigid body owns linear motion and writes the integrated position
/// back here, while orientation kinematics are owned by the motion step.
#[derive(Clone, Debug)]
pub struct Agent {
    pub position: [f64; 3],
    pub pitch_deg: f64,
    pub yaw_deg: f64,
    pub(crate) smooth_pitch_rate: f64,
    pub(crate) smooth_yaw_rate: f64,
    /// Index into the owning field's collection, re-validated on every read.
    pub nearest_flower: Option<usize>,
    pub nectar_obtained: f32,
    frozen: bool,
}

impl Default for Agent {
    fn default() -> Self {
        Self::new()
    }
}

impl Agent {
    pub fn new() -> Self {
        Self {
            position: [0.0, 0.0, 0.0],
            pitch_deg: 0.0,
            yaw_deg: 0.0,
            smooth_pitch_rate: 0.0,
            smooth_yaw_rate: 0.0,
            nearest_flower: None,
            nectar_obtained: 0.0,
            frozen: false,
        }
    }

    pub fn set_pose(&mut self, pose: &Pose) {
        self.position = pose.position;
        self.pitch_deg = pose.pitch_deg;
        self.yaw_deg = pose.yaw_deg;
    }

    pub fn pose(&self) -> Pose {
        Pose {
            position: self.position,
            pitch_deg: self.pitch_deg,
            yaw_deg: self.yaw_deg,
        }
    }

    /// Episode-boundary reset: clears the nectar accumulator, the smoothed
    /// rotation rates, and the cached target. Pose is set separately by the
    /// placement sampler; rigid-body velocities are zeroed externally.
    pub fn reset_for_episode(&mut self) {
        self.nectar_obtained = 0.0;
        self.smooth_pitch_rate = 0.0;
        self.smooth_yaw_rate = 0.0;
        self.nearest_flower = None;
    }

    /// A frozen agent ignores actions entirely.
    pub fn freeze(&mut self) {
        self.frozen = true;
    }

    pub fn unfreeze(&mut self) {
        self.frozen = false;
    }

    pub fn is_frozen(&self) -> bool {
        self.frozen
    }

    /// 7-component observation: normalized orientation quaternion (4) plus
    /// the normalized beak-to-target direction (3).
    ///
    /// With no valid target the direction components are zero; a depleted
    /// field is a valid state, not an error.
    pub fn observe(&self, flowers: &[Flower]) -> [f32; 7] {
        let q = math::quat_from_pitch_yaw(self.pitch_deg, self.yaw_deg);
        let dir = self
            .nearest_flower
            .and_then(|idx| flowers.get(idx))
            .filter(|f| f.has_nectar())
            .map(|f| math::normalize_or_zero(math::sub(f.anchor().position, self.position)))
            .unwrap_or([0.0, 0.0, 0.0]);
        [
            q[0],
            q[1],
            q[2],
            q[3],
            dir[0] as f32,
            dir[1] as f32,
            dir[2] as f32,
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::flower::AnchorPose;

    fn flowers_at(xs: &[f64]) -> Vec<Flower> {
        xs.iter()
            .map(|&x| Flower::new(1.0, AnchorPose::new([x, 0.0, 0.0], [0.0, 1.0, 0.0])))
            .collect()
    }

    #[test]
    fn observation_has_unit_quaternion_and_unit_direction() {
        let flowers = flowers_at(&[3.0]);
        let mut agent = Agent::new();
        agent.pitch_deg = 30.0;
        agent.yaw_deg = -45.0;
        agent.nearest_flower = Some(0);
        let obs = agent.observe(&flowers);
        let q_norm: f32 = obs[..4].iter().map(|c| c * c).sum::<f32>().sqrt();
        let d_norm: f32 = obs[4..].iter().map(|c| c * c).sum::<f32>().sqrt();
        assert!((q_norm - 1.0).abs() < 1e-6);
        assert!((d_norm - 1.0).abs() < 1e-6);
        assert!((obs[4] - 1.0).abs() < 1e-6, "target along +x");
    }

    #[test]
    fn observation_direction_is_zero_without_target() {
        let flowers = flowers_at(&[3.0]);
        let agent = Agent::new();
        let obs = agent.observe(&flowers);
        assert_eq!(&obs[4..], &[0.0, 0.0, 0.0]);
    }

    #[test]
    fn observation_direction_is_zero_for_emptied_target() {
        let mut flowers = flowers_at(&[3.0]);
        flowers[0].feed(2.0).unwrap();
        let mut agent = Agent::new();
        agent.nearest_flower = Some(0);
        let obs = agent.observe(&flowers);
        assert_eq!(&obs[4..], &[0.0, 0.0, 0.0]);
    }

    #[test]
    fn stale_target_index_is_not_dereferenced() {
        let flowers = flowers_at(&[3.0]);
        let mut agent = Agent::new();
        agent.nearest_flower = Some(42);
        let obs = agent.observe(&flowers);
        assert_eq!(&obs[4..], &[0.0, 0.0, 0.0]);
    }

    #[test]
    fn episode_reset_clears_accumulators_but_not_pose() {
        let mut agent = Agent::new();
        agent.position = [1.0, 2.0, 3.0];
        agent.nectar_obtained = 4.0;
        agent.smooth_pitch_rate = 0.5;
        agent.smooth_yaw_rate = -0.5;
        agent.nearest_flower = Some(0);
        agent.reset_for_episode();
        assert_eq!(agent.nectar_obtained, 0.0);
        assert_eq!(agent.smooth_pitch_rate, 0.0);
        assert_eq!(agent.smooth_yaw_rate, 0.0);
        assert_eq!(agent.nearest_flower, None);
        assert_eq!(agent.position, [1.0, 2.0, 3.0]);
    }
}
