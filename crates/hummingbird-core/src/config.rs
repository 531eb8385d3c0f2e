//! Simulation configuration with validation.

use crate::motion::MotionConfig;
use serde::{Deserialize, Serialize};
use std::{error::Error, fmt};

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    /// Deterministic seed for reproducible runs.
    pub seed: u64,
    /// Training mode resets the field each episode and mixes free spawns in;
    /// outside training the agent always spawns in front of a flower.
    pub training_mode: bool,
    /// Probability of a front-of-flower spawn in training mode.
    pub front_spawn_probability: f64,
    /// Number of flowers arranged around the field center.
    pub flower_count: usize,
    /// Nectar capacity of each flower.
    pub flower_capacity: f32,
    /// Center of the foraging area.
    pub field_center: [f64; 3],
    /// Horizontal radius of the flower ring.
    pub flower_ring_radius: f64,
    /// Height of the flower anchors above the field center.
    pub flower_height: f64,
    /// Beak-tip distance within which nectar contact is accepted.
    pub contact_radius: f64,
    /// Nectar drawn per second while the beak stays in contact.
    pub feed_rate: f32,
    /// Simulation timestep in seconds.
    pub dt: f64,
    /// Action-to-motion parameters.
    pub motion: MotionConfig,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            seed: 0,
            training_mode: true,
            front_spawn_probability: 0.5,
            flower_count: 12,
            flower_capacity: 1.0,
            field_center: [0.0, 0.0, 0.0],
            flower_ring_radius: 5.0,
            flower_height: 1.5,
            contact_radius: 0.008,
            feed_rate: 0.5,
            dt: 0.02,
            motion: MotionConfig::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum SimConfigError {
    NoFlowers,
    NonPositiveCapacity(f32),
    NonPositiveDt(f64),
    NonPositiveRingRadius(f64),
    ProbabilityOutOfRange(f64),
    NegativeContactRadius(f64),
    NegativeFeedRate(f32),
    InvalidMaxPitch(f64),
}

impl fmt::Display for SimConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SimConfigError::NoFlowers => write!(f, "flower_count must be at least 1"),
            SimConfigError::NonPositiveCapacity(v) => {
                write!(f, "flower_capacity must be positive, got {v}")
            }
            SimConfigError::NonPositiveDt(v) => write!(f, "dt must be positive, got {v}"),
            SimConfigError::NonPositiveRingRadius(v) => {
                write!(f, "flower_ring_radius must be positive, got {v}")
            }
            SimConfigError::ProbabilityOutOfRange(v) => {
                write!(f, "front_spawn_probability must be in [0, 1], got {v}")
            }
            SimConfigError::NegativeContactRadius(v) => {
                write!(f, "contact_radius cannot be negative, got {v}")
            }
            SimConfigError::NegativeFeedRate(v) => {
                write!(f, "feed_rate cannot be negative, got {v}")
            }
            SimConfigError::InvalidMaxPitch(v) => {
                write!(f, "motion.max_pitch_deg must be in (0, 180], got {v}")
            }
        }
    }
}

impl Error for SimConfigError {}

impl SimConfig {
    pub fn validate(&self) -> Result<(), SimConfigError> {
        if self.flower_count == 0 {
            return Err(SimConfigError::NoFlowers);
        }
        if !(self.flower_capacity > 0.0) {
            return Err(SimConfigError::NonPositiveCapacity(self.flower_capacity));
        }
        if !(self.dt > 0.0) {
            return Err(SimConfigError::NonPositiveDt(self.dt));
        }
        if !(self.flower_ring_radius > 0.0) {
            return Err(SimConfigError::NonPositiveRingRadius(self.flower_ring_radius));
        }
        if !(0.0..=1.0).contains(&self.front_spawn_probability) {
            return Err(SimConfigError::ProbabilityOutOfRange(
                self.front_spawn_probability,
            ));
        }
        if !(self.contact_radius >= 0.0) {
            return Err(SimConfigError::NegativeContactRadius(self.contact_radius));
        }
        if !(self.feed_rate >= 0.0) {
            return Err(SimConfigError::NegativeFeedRate(self.feed_rate));
        }
        if !(self.motion.max_pitch_deg > 0.0 && self.motion.max_pitch_deg <= 180.0) {
            return Err(SimConfigError::InvalidMaxPitch(self.motion.max_pitch_deg));
        }
        Ok(())
    }
}
