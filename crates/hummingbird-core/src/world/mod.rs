pub mod episode;
pub mod metrics;

pub use metrics::*;

use crate::agent::Agent;
use crate::config::{SimConfig, SimConfigError};
use crate::field::FlowerField;
use crate::flower::{AnchorPose, Flower};
use crate::spatial::ObstacleIndex;
use rand::SeedableRng;
use rand_chacha::ChaCha12Rng;
use std::f64::consts::TAU;
use std::{error::Error, fmt};

/// Outward tilt applied to each flower's up axis so spawn standoffs point
/// away from the ring center.
const FLOWER_UP_TILT: f64 = 0.4;

#[derive(Debug, Clone, PartialEq)]
pub enum SimInitError {
    Config(SimConfigError),
}

impl fmt::Display for SimInitError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SimInitError::Config(e) => write!(f, "{}", e),
        }
    }
}

impl From<SimConfigError> for SimInitError {
    fn from(err: SimConfigError) -> Self {
        SimInitError::Config(err)
    }
}

impl Error for SimInitError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            SimInitError::Config(e) => Some(e),
        }
    }
}

/// One foraging area with its agent: the tick-driven simulation core.
///
/// The external driver owns the loop: it calls [`Simulation::begin_episode`]
/// at episode boundaries and [`Simulation::step`] once per tick, applying the
/// returned force to its rigid body and writing the integrated position back
/// through [`Simulation::agent_mut`]. Single-threaded by design; a driver
/// running several areas gives each `Simulation` to exactly one thread.
pub struct Simulation {
    pub(crate) field: FlowerField,
    pub(crate) agent: Agent,
    pub(crate) config: SimConfig,
    pub(crate) rng: ChaCha12Rng,
    pub(crate) episode_index: usize,
    pub(crate) steps_this_episode: usize,
    pub(crate) last_spawn_in_front: bool,
    pub(crate) last_spawn_attempts: usize,
}

impl Simulation {
    pub fn new(config: SimConfig) -> Result<Self, SimInitError> {
        config.validate()?;
        let flowers = Self::build_flower_ring(&config);
        let field = FlowerField::new(flowers, config.field_center)
            .expect("validated flower_count produces a non-empty field");
        let rng = ChaCha12Rng::seed_from_u64(config.seed);
        Ok(Self {
            field,
            agent: Agent::new(),
            config,
            rng,
            episode_index: 0,
            steps_this_episode: 0,
            last_spawn_in_front: false,
            last_spawn_attempts: 0,
        })
    }

    /// Evenly spaced flowers on a horizontal ring, anchors tilted outward.
    fn build_flower_ring(config: &SimConfig) -> Vec<Flower> {
        (0..config.flower_count)
            .map(|i| {
                let theta = i as f64 * TAU / config.flower_count as f64;
                let (sin, cos) = theta.sin_cos();
                let position = [
                    config.field_center[0] + config.flower_ring_radius * sin,
                    config.field_center[1] + config.flower_height,
                    config.field_center[2] + config.flower_ring_radius * cos,
                ];
                let up = [sin * FLOWER_UP_TILT, 1.0, cos * FLOWER_UP_TILT];
                Flower::new(config.flower_capacity, AnchorPose::new(position, up))
            })
            .collect()
    }

    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    pub fn field(&self) -> &FlowerField {
        &self.field
    }

    pub fn agent(&self) -> &Agent {
        &self.agent
    }

    /// Mutable agent access for the external rigid-body integrator (position
    /// write-back) and freeze control.
    pub fn agent_mut(&mut self) -> &mut Agent {
        &mut self.agent
    }

    pub fn episode_index(&self) -> usize {
        self.episode_index
    }

    pub fn nectar_obtained(&self) -> f32 {
        self.agent.nectar_obtained
    }

    /// True when no flower holds nectar. A valid terminal state the driver
    /// may use to end the episode by policy.
    pub fn field_depleted(&self) -> bool {
        !self.field.flowers().iter().any(|f| f.has_nectar())
    }

    /// Obstacle index over the flower anchors, the built-in stand-in for the
    /// physics engine's overlap query.
    pub fn obstacle_index(&self) -> ObstacleIndex {
        ObstacleIndex::new(
            self.field
                .flowers()
                .iter()
                .map(|f| f.anchor().position)
                .collect(),
        )
    }

    pub fn episode_summary(&self) -> EpisodeSummary {
        EpisodeSummary {
            episode: self.episode_index,
            steps: self.steps_this_episode,
            nectar_obtained: self.agent.nectar_obtained,
            field_nectar_remaining: self.field.total_nectar(),
            field_depleted: self.field_depleted(),
            spawned_in_front: self.last_spawn_in_front,
            spawn_attempts: self.last_spawn_attempts,
        }
    }
}
