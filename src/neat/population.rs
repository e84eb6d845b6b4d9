//! Population lifecycle: fitness ranking and generational turnover.
//!
//! A population alternates between [`Population::update_fitness`], which
//! ranks members by the last episode, and [`Population::evolve`], which
//! replaces the roster with the offspring of the top half.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

use super::config::NeatConfig;
use super::episode::EpisodeResult;
use super::error::{NeatError, Result};
use super::network::FeedForwardNetwork;

/// Flat fitness bonus for agents still alive when the episode was stopped.
pub const SURVIVAL_BONUS: f32 = 10.0;

/// Summary of one ranked generation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerationStats {
    /// Generation the fitness update was applied to.
    pub generation: u32,
    /// Highest fitness in the generation.
    pub best_fitness: f32,
    /// Mean fitness over all members.
    pub mean_fitness: f32,
    /// Number of agents reported alive at the end of the episode.
    pub survivors: usize,
}

/// An evolving set of equally-shaped networks.
#[derive(Debug, Clone)]
pub struct Population {
    config: NeatConfig,
    members: Vec<FeedForwardNetwork>,
    generation: u32,
    rng: ChaCha8Rng,
    /// Set by `update_fitness`, cleared by `evolve`.
    ranked: bool,
    history: Vec<GenerationStats>,
}

impl Population {
    /// Creates a population seeded from the thread-local generator.
    pub fn new(config: NeatConfig) -> Result<Self> {
        Self::from_generator(config, ChaCha8Rng::from_rng(&mut rand::rng()))
    }

    /// Creates a reproducible population from a fixed seed.
    pub fn with_seed(config: NeatConfig, seed: u64) -> Result<Self> {
        Self::from_generator(config, ChaCha8Rng::seed_from_u64(seed))
    }

    fn from_generator(config: NeatConfig, mut rng: ChaCha8Rng) -> Result<Self> {
        config.validate()?;
        let members = initialize_population(&config, &mut rng);

        log::debug!(
            "initialized {} networks ({}-{}-{})",
            members.len(),
            config.input_size,
            config.hidden_size,
            config.output_size
        );

        Ok(Self {
            config,
            members,
            generation: 0,
            rng,
            ranked: false,
            history: Vec::new(),
        })
    }

    /// Rebuilds a population from saved members.
    ///
    /// Every member must match the configured topology and the roster must
    /// hold exactly `population_size` networks.
    pub(crate) fn restore(
        config: NeatConfig,
        members: Vec<FeedForwardNetwork>,
        generation: u32,
        ranked: bool,
        seed: u64,
    ) -> Result<Self> {
        config.validate()?;
        if members.len() != config.population_size {
            return Err(NeatError::LengthMismatch {
                expected: config.population_size,
                actual: members.len(),
            });
        }

        for member in &members {
            member.check_integrity()?;
            let shape = [
                (config.input_size, member.input_size()),
                (config.hidden_size, member.hidden_size()),
                (config.output_size, member.output_size()),
            ];
            for (expected, actual) in shape {
                if expected != actual {
                    return Err(NeatError::DimensionMismatch { expected, actual });
                }
            }
        }

        Ok(Self {
            config,
            members,
            generation,
            rng: ChaCha8Rng::seed_from_u64(seed),
            ranked,
            history: Vec::new(),
        })
    }

    /// Applies one episode report and ranks members by fitness, best first.
    ///
    /// `results[i]` belongs to `members()[i]`. Fitness is the score plus
    /// [`SURVIVAL_BONUS`] for agents still alive. The sort is stable, so tied
    /// members keep their relative order. Non-finite scores are refused
    /// before any member is touched.
    pub fn update_fitness(&mut self, results: &[EpisodeResult]) -> Result<()> {
        if results.len() != self.members.len() {
            return Err(NeatError::LengthMismatch {
                expected: self.members.len(),
                actual: results.len(),
            });
        }
        if let Some((agent, result)) = results
            .iter()
            .enumerate()
            .find(|(_, result)| !result.score.is_finite())
        {
            return Err(NeatError::NonFiniteScore {
                agent,
                score: result.score,
            });
        }

        for (member, result) in self.members.iter_mut().zip(results) {
            member.score = result.score;
            member.fitness = result.score + if result.alive { SURVIVAL_BONUS } else { 0.0 };
        }

        self.members.sort_by(|a, b| b.fitness.total_cmp(&a.fitness));
        self.ranked = true;

        let total: f32 = self.members.iter().map(|m| m.fitness).sum();
        let stats = GenerationStats {
            generation: self.generation,
            best_fitness: self.members[0].fitness,
            mean_fitness: total / self.members.len() as f32,
            survivors: results.iter().filter(|r| r.alive).count(),
        };
        log::debug!(
            "generation {} ranked: best {:.1}, mean {:.1}",
            stats.generation,
            stats.best_fitness,
            stats.mean_fitness
        );
        self.history.push(stats);

        Ok(())
    }

    /// Number of members kept by selection.
    ///
    /// Half the population, rounded down, but never fewer than one parent.
    pub fn parent_count(&self) -> usize {
        (self.config.population_size / 2).max(1)
    }

    /// Members selection would keep as parents: the top of the current ranking.
    pub fn breeding_pool(&self) -> &[FeedForwardNetwork] {
        &self.members[..self.parent_count()]
    }

    /// Replaces the roster with a new generation.
    ///
    /// Runs selection, crossover and mutation in that order and advances the
    /// generation counter. Breeding from a ranking that predates the current
    /// generation is allowed but logged.
    pub fn evolve(&mut self) {
        if !self.ranked {
            log::warn!(
                "evolving generation {} without a fitness update, breeding from stale ranking",
                self.generation
            );
        }

        let pool = self.select();
        self.members = self.breed(&pool);
        self.mutate_members();

        self.generation += 1;
        self.ranked = false;
    }

    fn select(&mut self) -> Vec<FeedForwardNetwork> {
        let parents = self.parent_count();
        self.members.truncate(parents);
        log::debug!("selected {} parents", parents);
        std::mem::take(&mut self.members)
    }

    fn breed(&mut self, pool: &[FeedForwardNetwork]) -> Vec<FeedForwardNetwork> {
        let mut children = Vec::with_capacity(self.config.population_size);

        while children.len() < self.config.population_size {
            let parent_1 = &pool[self.rng.random_range(0..pool.len())];
            let parent_2 = &pool[self.rng.random_range(0..pool.len())];

            // Every member is built from the same config, so shapes always agree.
            children.push(parent_1.inherit(parent_2, &mut self.rng));
        }

        children
    }

    fn mutate_members(&mut self) {
        let rate = f64::from(self.config.mutation_rate);
        let mut mutated = 0usize;
        for member in &mut self.members {
            if self.rng.random_bool(rate) {
                member.mutate(&mut self.rng);
                mutated += 1;
            }
        }
        log::debug!("mutated {} of {} children", mutated, self.members.len());
    }

    /// The top-ranked network.
    ///
    /// Before the first [`update_fitness`](Self::update_fitness) this is simply
    /// the first member in construction order.
    pub fn best_network(&self) -> &FeedForwardNetwork {
        &self.members[0]
    }

    /// Number of completed [`evolve`](Self::evolve) calls.
    pub fn generation(&self) -> u32 {
        self.generation
    }

    /// Current roster, best first once ranked.
    pub fn members(&self) -> &[FeedForwardNetwork] {
        &self.members
    }

    /// Configuration the population was built with.
    pub fn config(&self) -> &NeatConfig {
        &self.config
    }

    /// Whether the roster reflects a fitness update for the current generation.
    pub fn is_ranked(&self) -> bool {
        self.ranked
    }

    /// Statistics of every ranked generation, oldest first.
    pub fn history(&self) -> &[GenerationStats] {
        &self.history
    }
}

fn initialize_population<R: Rng>(config: &NeatConfig, rng: &mut R) -> Vec<FeedForwardNetwork> {
    (0..config.population_size)
        .map(|_| {
            FeedForwardNetwork::new_random(
                config.input_size,
                config.hidden_size,
                config.output_size,
                rng,
            )
        })
        .collect()
}
