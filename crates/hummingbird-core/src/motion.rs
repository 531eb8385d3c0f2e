//! Action-to-motion mapping: linear force plus smoothed, clamped rotation.

use crate::agent::Agent;
use crate::math;
use serde::{Deserialize, Serialize};

/// Rate limit on the smoothed pitch/yaw rates, in rate units per second.
const ROTATION_RAMP_RATE: f64 = 2.0;

#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct MotionConfig {
    /// Scale applied to the linear components of the action vector.
    pub move_force: f64,
    /// Pitch rotation speed in degrees per second at full deflection.
    pub pitch_speed: f64,
    /// Yaw rotation speed in degrees per second at full deflection.
    pub yaw_speed: f64,
    /// Hard clamp on pitch, keeping the bird from flipping upside down.
    pub max_pitch_deg: f64,
}

impl Default for MotionConfig {
    fn default() -> Self {
        Self {
            move_force: 2.0,
            pitch_speed: 100.0,
            yaw_speed: 100.0,
            max_pitch_deg: 80.0,
        }
    }
}

/// Per-tick motion result: an instantaneous force for the external rigid
/// body and the orientation already written back to the agent.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MotionOutput {
    pub force: [f64; 3],
    pub pitch_deg: f64,
    pub yaw_deg: f64,
}

/// Map a 5-component action onto the agent for one tick.
///
/// `action[0..3]` are the linear force axes, `action[3]` the pitch rate and
/// `action[4]` the yaw rate. Components are clamped to `[-1, 1]` since the
/// action source is not trusted. The smoothed rates ramp linearly toward the
/// requested rates by at most `2.0 * dt` per tick; pitch wraps then clamps to
/// `±max_pitch_deg`, yaw wraps freely, roll stays zero.
///
/// A frozen agent produces zero force and an unchanged orientation, leaving
/// the smoothed rates untouched.
pub fn step(agent: &mut Agent, action: [f32; 5], dt: f64, config: &MotionConfig) -> MotionOutput {
    if agent.is_frozen() {
        return MotionOutput {
            force: [0.0, 0.0, 0.0],
            pitch_deg: agent.pitch_deg,
            yaw_deg: agent.yaw_deg,
        };
    }

    let action = action.map(|a| a.clamp(-1.0, 1.0) as f64);
    let force = [
        action[0] * config.move_force,
        action[1] * config.move_force,
        action[2] * config.move_force,
    ];

    let max_delta = ROTATION_RAMP_RATE * dt;
    agent.smooth_pitch_rate = math::move_toward(agent.smooth_pitch_rate, action[3], max_delta);
    agent.smooth_yaw_rate = math::move_toward(agent.smooth_yaw_rate, action[4], max_delta);

    let pitch = math::wrap_deg(agent.pitch_deg + agent.smooth_pitch_rate * dt * config.pitch_speed);
    agent.pitch_deg = pitch.clamp(-config.max_pitch_deg, config.max_pitch_deg);
    agent.yaw_deg = math::wrap_deg(agent.yaw_deg + agent.smooth_yaw_rate * dt * config.yaw_speed);

    MotionOutput {
        force,
        pitch_deg: agent.pitch_deg,
        yaw_deg: agent.yaw_deg,
    }
}
