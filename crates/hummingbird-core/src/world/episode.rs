//! Episode boundary handling and the per-tick step.

use super::{RunSummary, Simulation};
use crate::agent::Pose;
use crate::math;
use crate::motion;
use crate::placement::{self, OverlapQuery, SpawnError};
use crate::spatial;
use rand::Rng;

/// Result of one simulation tick, handed to the external driver.
#[derive(Clone, Copy, Debug)]
pub struct StepOutcome {
    /// Instantaneous force for the external rigid body.
    pub force: [f64; 3],
    /// Orientation after this tick, already applied to the agent.
    pub pitch_deg: f64,
    pub yaw_deg: f64,
    /// Orientation quaternion (4) + normalized to-target direction (3).
    pub observation: [f32; 7],
    /// Nectar taken this tick through beak contact.
    pub nectar_taken: f32,
}

impl Simulation {
    /// Start a new episode. In order: reset the field (training mode only),
    /// clear the agent's episode state, decide front-of-flower versus free
    /// placement, sample a collision-free pose, recompute the nearest flower.
    ///
    /// Returns the spawn pose on success. Placement exhaustion is fatal for
    /// episode setup and must reach the outermost driver.
    pub fn begin_episode(&mut self, overlap: &impl OverlapQuery) -> Result<Pose, SpawnError> {
        self.episode_index += 1;
        self.steps_this_episode = 0;
        if self.config.training_mode {
            self.field.reset_flowers();
        }
        self.agent.reset_for_episode();

        let in_front = if self.config.training_mode {
            self.rng.random_bool(self.config.front_spawn_probability)
        } else {
            true
        };
        let outcome = placement::sample_pose(&self.field, in_front, overlap, &mut self.rng)?;
        self.last_spawn_in_front = in_front;
        self.last_spawn_attempts = outcome.attempts;
        self.agent.set_pose(&outcome.pose);
        self.agent.nearest_flower =
            spatial::find_nearest(self.agent.position, self.field.flowers(), None);
        Ok(outcome.pose)
    }

    /// Advance one tick: apply the action through the motion controller,
    /// feed from the target flower while the beak is in contact, and refresh
    /// the nearest-flower index when the current target runs dry.
    pub fn step(&mut self, action: [f32; 5], dt: f64) -> StepOutcome {
        self.steps_this_episode += 1;
        let motion_out = motion::step(&mut self.agent, action, dt, &self.config.motion);

        self.refresh_target_if_stale();
        let nectar_taken = self.feed_on_contact(dt);
        if nectar_taken > 0.0 {
            self.refresh_target_if_stale();
        }

        let observation = self.agent.observe(self.field.flowers());
        StepOutcome {
            force: motion_out.force,
            pitch_deg: motion_out.pitch_deg,
            yaw_deg: motion_out.yaw_deg,
            observation,
            nectar_taken,
        }
    }

    /// Draw nectar when the beak reference point is inside the contact
    /// radius of the current target's pickup zone. The sip is feed-rate
    /// scaled by `dt`, reproducing the per-contact-tick rate model.
    fn feed_on_contact(&mut self, dt: f64) -> f32 {
        let Some(idx) = self.agent.nearest_flower else {
            return 0.0;
        };
        let Some(flower) = self.field.get_mut(idx) else {
            return 0.0;
        };
        if !flower.nectar_collider_active()
            || math::distance(self.agent.position, flower.anchor().position)
                > self.config.contact_radius
        {
            return 0.0;
        }
        let sip = self.config.feed_rate * dt as f32;
        match flower.feed(sip) {
            Ok(taken) => {
                self.agent.nectar_obtained += taken;
                taken
            }
            // Unreachable with a validated non-negative feed rate.
            Err(_) => 0.0,
        }
    }

    /// Re-derive the nearest flower whenever the cached index no longer
    /// refers to a flower with nectar. The index is never trusted blindly.
    fn refresh_target_if_stale(&mut self) {
        let stale = self
            .agent
            .nearest_flower
            .and_then(|idx| self.field.get(idx))
            .is_none_or(|f| !f.has_nectar());
        if stale {
            self.agent.nearest_flower = spatial::find_nearest(
                self.agent.position,
                self.field.flowers(),
                self.agent.nearest_flower,
            );
        }
    }

    /// Run a fixed number of episodes headlessly, querying `policy` for an
    /// action each tick. Linear motion is not integrated here (that belongs
    /// to the external physics collaborator), so this exercises orientation,
    /// targeting and episode bookkeeping only.
    pub fn run<Q, F>(
        &mut self,
        episodes: usize,
        steps_per_episode: usize,
        overlap: &Q,
        mut policy: F,
    ) -> Result<RunSummary, SpawnError>
    where
        Q: OverlapQuery,
        F: FnMut(&Simulation) -> [f32; 5],
    {
        let mut summaries = Vec::with_capacity(episodes);
        let mut total_nectar = 0.0;
        for _ in 0..episodes {
            self.begin_episode(overlap)?;
            for _ in 0..steps_per_episode {
                let action = policy(self);
                self.step(action, self.config.dt);
            }
            let summary = self.episode_summary();
            total_nectar += summary.nectar_obtained;
            summaries.push(summary);
        }
        Ok(RunSummary {
            schema_version: 1,
            seed: self.config.seed,
            training_mode: self.config.training_mode,
            episodes: summaries,
            total_nectar_obtained: total_nectar,
        })
    }
}
