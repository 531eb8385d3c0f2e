//! Hummingbird foraging simulation core.
//!
//! Mobile agents seek depletable nectar flowers in a bounded area. This crate
//! owns the simulation logic only: flower lifecycle and depletion, nearest
//! -target selection, collision-free spawn sampling, and the action-to-motion
//! mapping. Rendering, physics integration and the learning policy are
//! external collaborators reached through the [`placement::OverlapQuery`]
//! trait, the force output of [`world::episode::StepOutcome`], and the
//! 7-component observation vector.

pub mod agent;
pub mod config;
pub mod field;
pub mod flower;
pub mod math;
pub mod motion;
pub mod placement;
pub mod spatial;
pub mod world;

pub use agent::{Agent, Pose};
pub use config::{SimConfig, SimConfigError};
pub use field::{FieldError, FlowerField};
pub use flower::{AnchorPose, FeedError, Flower, Indicator};
pub use motion::MotionConfig;
pub use placement::{OverlapQuery, SpawnError};
pub use spatial::{find_nearest, ObstacleIndex};
pub use world::{EpisodeSummary, RunSummary, SimInitError, Simulation};
