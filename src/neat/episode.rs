//! Episode driving: the boundary between the engine and an environment.
//!
//! An [`Environment`] owns all game state. The [`EpisodeRunner`] feeds each
//! living agent's observation to its network, hands the decisions back to the
//! environment, and once the episode ends reports the per-agent outcome to the
//! [`Population`].

use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use super::error::{NeatError, Result};
use super::population::Population;

/// Outcome of one agent's episode, as reported by the environment.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EpisodeResult {
    /// Raw score, frames survived in the flappy environment.
    pub score: f32,
    /// Whether the agent was still alive when the episode ended.
    pub alive: bool,
}

/// A simulated world with one controllable entity per agent.
///
/// Agents are addressed by their index in the population roster, which does
/// not change during an episode.
pub trait Environment {
    /// Starts a new episode with `agents` entities, all alive.
    fn reset(&mut self, agents: usize);

    /// Frames elapsed since the last reset.
    fn frame(&self) -> u32;

    /// Whether the agent can still act.
    fn is_alive(&self, agent: usize) -> bool;

    /// Normalized observation for a living agent.
    fn observe(&self, agent: usize) -> Vec<f32>;

    /// Advances one frame. `decisions[i]` is `None` for dead agents.
    fn step(&mut self, decisions: &[Option<u8>]);

    /// Per-agent outcome of the current episode, in agent order.
    fn results(&self) -> Vec<EpisodeResult>;
}

/// Summary of one evaluated and evolved generation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerationReport {
    /// Generation that was evaluated.
    pub generation: u32,
    /// Frames the episode lasted.
    pub frames: u32,
    /// Highest fitness, including the survival bonus.
    pub best_fitness: f32,
    /// Raw score of the best network.
    pub best_score: f32,
    /// Mean fitness over the population.
    pub mean_fitness: f32,
    /// Agents alive when the episode stopped.
    pub survivors: usize,
}

/// Runs episodes against an environment and feeds the outcome to a population.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EpisodeRunner {
    /// Frame cutoff after which an episode stops with agents still alive.
    pub max_frames: u32,
}

impl Default for EpisodeRunner {
    fn default() -> Self {
        Self { max_frames: 5_000 }
    }
}

impl EpisodeRunner {
    /// Creates a runner with the given frame cutoff.
    pub fn new(max_frames: u32) -> Self {
        Self { max_frames }
    }

    /// Plays one episode and returns one result per population member.
    ///
    /// The episode ends when every agent is dead or `max_frames` is reached.
    /// Agents alive at the cutoff are reported with `alive = true`.
    pub fn run_episode<E: Environment>(
        &self,
        population: &Population,
        env: &mut E,
    ) -> Result<Vec<EpisodeResult>> {
        let members = population.members();
        env.reset(members.len());

        while env.frame() < self.max_frames {
            let observations: Vec<Option<Vec<f32>>> = (0..members.len())
                .map(|agent| env.is_alive(agent).then(|| env.observe(agent)))
                .collect();

            if observations.iter().all(Option::is_none) {
                break;
            }

            // Predictions are independent and side-effect free.
            let decisions = members
                .par_iter()
                .zip(observations.par_iter())
                .map(|(network, observation)| {
                    observation
                        .as_deref()
                        .map(|inputs| network.predict(inputs))
                        .transpose()
                })
                .collect::<Result<Vec<Option<u8>>>>()?;

            env.step(&decisions);
        }

        let results = env.results();
        if results.len() != members.len() {
            return Err(NeatError::LengthMismatch {
                expected: members.len(),
                actual: results.len(),
            });
        }
        Ok(results)
    }

    /// Evaluates the current generation, ranks it and breeds the next one.
    pub fn run_generation<E: Environment>(
        &self,
        population: &mut Population,
        env: &mut E,
    ) -> Result<GenerationReport> {
        let results = self.run_episode(population, env)?;
        population.update_fitness(&results)?;

        let best = population.best_network();
        let report = GenerationReport {
            generation: population.generation(),
            frames: env.frame(),
            best_fitness: best.fitness(),
            best_score: best.score(),
            mean_fitness: population
                .history()
                .last()
                .map_or(0.0, |stats| stats.mean_fitness),
            survivors: results.iter().filter(|r| r.alive).count(),
        };

        log::info!(
            "generation {}: best fitness {:.0} (score {:.0}), mean {:.1}, {} survivors after {} frames",
            report.generation,
            report.best_fitness,
            report.best_score,
            report.mean_fitness,
            report.survivors,
            report.frames
        );

        population.evolve();
        Ok(report)
    }
}
