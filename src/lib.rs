//! # Flappy Evo - Neuroevolution for a Side-Scrolling Game
//!
//! A population of small feed-forward networks learns to play a headless
//! flappy-bird game through a genetic algorithm.
//!
//! ## Features
//!
//! - Fixed-topology networks (one ReLU hidden layer, thresholded output)
//! - Truncation selection of the top half, uniform crossover, sparse mutation
//! - Seeded, reproducible evolution
//! - Parallel per-agent inference with rayon
//! - Headless game environment behind the [`neat::episode::Environment`] trait
//! - Save/load of whole populations as JSON
//!
//! ## Core Modules
//!
//! - [`neat::network`] - Network inference and genetic operators
//! - [`neat::population`] - Fitness ranking and generational turnover
//! - [`neat::episode`] - Episode runner and environment boundary
//! - [`game::flappy`] - The flappy-bird environment

/// Evolutionary engine, independent of any particular game.
pub mod neat {
    /// Validated population configuration.
    pub mod config;
    /// Episode runner and the environment boundary.
    pub mod episode;
    /// Engine error type.
    pub mod error;
    /// Feed-forward network with crossover and mutation.
    pub mod network;
    /// Population ranking, selection and breeding.
    pub mod population;
    /// JSON snapshots of populations.
    pub mod snapshot;
}

/// Headless flappy-bird game.
pub mod game {
    /// Bird, pipe and environment implementation.
    pub mod flappy;
    /// Game physics parameters.
    pub mod params;
}

/// Command line run configuration.
pub mod config;

pub use neat::config::NeatConfig;
pub use neat::episode::{EpisodeResult, EpisodeRunner, Environment, GenerationReport};
pub use neat::error::NeatError;
pub use neat::network::FeedForwardNetwork;
pub use neat::population::Population;
