//! Headless episode runner: drives the simulation core with a scripted chase
//! policy and a toy rigid-body integrator standing in for the physics engine.

use anyhow::{Context, Result};
use clap::Parser;
use hummingbird_core::{math, world::episode::StepOutcome, RunSummary, SimConfig, Simulation};
use rayon::prelude::*;
use serde::Serialize;

#[derive(Parser, Debug)]
#[command(name = "hummingbird", about = "Headless hummingbird foraging runs")]
struct Args {
    /// Base seed; seed sweeps use base..base+seeds.
    #[arg(long, default_value_t = 42)]
    seed: u64,

    /// Number of seeds to sweep in parallel.
    #[arg(long, default_value_t = 1)]
    seeds: usize,

    /// Episodes per seed.
    #[arg(long, default_value_t = 10)]
    episodes: usize,

    /// Steps per episode.
    #[arg(long, default_value_t = 1000)]
    steps: usize,

    /// Flowers in the field.
    #[arg(long, default_value_t = 12)]
    flowers: usize,

    /// Run in training mode (field resets each episode, mixed spawns).
    #[arg(long, action = clap::ArgAction::Set, default_value_t = true)]
    training: bool,

    /// Contact acceptance radius; widened from the beak-tip default so the
    /// toy integrator can actually reach nectar.
    #[arg(long, default_value_t = 0.1)]
    contact_radius: f64,

    /// Pretty-print the JSON summary.
    #[arg(long)]
    pretty: bool,
}

#[derive(Serialize)]
struct SweepSummary {
    schema_version: u32,
    runs: Vec<RunSummary>,
    total_nectar_obtained: f32,
}

/// Point-mass stand-in for the external rigid body.
struct Body {
    velocity: [f64; 3],
}

impl Body {
    const MASS: f64 = 0.05;
    const DRAG: f64 = 2.0;

    fn new() -> Self {
        Self {
            velocity: [0.0, 0.0, 0.0],
        }
    }

    fn integrate(&mut self, position: [f64; 3], force: [f64; 3], dt: f64) -> [f64; 3] {
        let damping = (1.0 - Self::DRAG * dt).max(0.0);
        for axis in 0..3 {
            self.velocity[axis] = (self.velocity[axis] + force[axis] / Self::MASS * dt) * damping;
        }
        math::add(position, math::scale(self.velocity, dt))
    }
}

/// Steer straight at the current target: linear action along the to-target
/// direction, pitch/yaw proportional to the orientation error.
fn chase_action(sim: &Simulation) -> [f32; 5] {
    let agent = sim.agent();
    let Some(flower) = agent.nearest_flower.and_then(|idx| sim.field().get(idx)) else {
        return [0.0; 5];
    };
    let to_target = math::sub(flower.anchor().position, agent.position);
    let dir = math::normalize_or_zero(to_target);
    let (desired_pitch, desired_yaw) = math::look_at_pitch_yaw(to_target);
    let pitch_err = math::wrap_deg(desired_pitch - agent.pitch_deg);
    let yaw_err = math::wrap_deg(desired_yaw - agent.yaw_deg);
    [
        dir[0] as f32,
        dir[1] as f32,
        dir[2] as f32,
        (pitch_err / 45.0).clamp(-1.0, 1.0) as f32,
        (yaw_err / 45.0).clamp(-1.0, 1.0) as f32,
    ]
}

fn run_seed(args: &Args, seed: u64) -> Result<RunSummary> {
    let config = SimConfig {
        seed,
        training_mode: args.training,
        flower_count: args.flowers,
        contact_radius: args.contact_radius,
        ..SimConfig::default()
    };
    let dt = config.dt;
    let mut sim = Simulation::new(config).with_context(|| format!("seed {seed}"))?;
    let obstacles = sim.obstacle_index();

    let mut episodes = Vec::with_capacity(args.episodes);
    let mut total_nectar = 0.0;
    for _ in 0..args.episodes {
        sim.begin_episode(&obstacles)
            .with_context(|| format!("episode setup failed for seed {seed}"))?;
        let mut body = Body::new();
        for _ in 0..args.steps {
            if sim.field_depleted() {
                break;
            }
            let action = chase_action(&sim);
            let StepOutcome { force, .. } = sim.step(action, dt);
            let position = sim.agent().position;
            sim.agent_mut().position = body.integrate(position, force, dt);
        }
        let summary = sim.episode_summary();
        total_nectar += summary.nectar_obtained;
        episodes.push(summary);
    }
    Ok(RunSummary {
        schema_version: 1,
        seed,
        training_mode: args.training,
        episodes,
        total_nectar_obtained: total_nectar,
    })
}

fn main() -> Result<()> {
    let args = Args::parse();

    // One simulation per seed, each exclusively owned by its worker.
    let runs: Vec<RunSummary> = (0..args.seeds.max(1))
        .into_par_iter()
        .map(|offset| run_seed(&args, args.seed + offset as u64))
        .collect::<Result<_>>()?;

    let summary = SweepSummary {
        schema_version: 1,
        total_nectar_obtained: runs.iter().map(|r| r.total_nectar_obtained).sum(),
        runs,
    };
    let json = if args.pretty {
        serde_json::to_string_pretty(&summary)?
    } else {
        serde_json::to_string(&summary)?
    };
    println!("{json}");
    Ok(())
}
