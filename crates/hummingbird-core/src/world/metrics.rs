//! Serializable episode and run summaries.

use serde::{Deserialize, Serialize};

fn default_schema_version() -> u32 {
    1
}

/// Snapshot of one episode, taken at its end.
#[derive(Clone, Debug, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct EpisodeSummary {
    pub episode: usize,
    pub steps: usize,
    pub nectar_obtained: f32,
    pub field_nectar_remaining: f32,
    pub field_depleted: bool,
    pub spawned_in_front: bool,
    pub spawn_attempts: usize,
}

/// Full headless run for one seed.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct RunSummary {
    #[serde(default = "default_schema_version")]
    pub schema_version: u32,
    pub seed: u64,
    pub training_mode: bool,
    pub episodes: Vec<EpisodeSummary>,
    pub total_nectar_obtained: f32,
}
