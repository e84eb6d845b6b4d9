//! JSON export and import of a whole population.

use std::path::Path;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::config::NeatConfig;
use super::error::Result;
use super::network::FeedForwardNetwork;
use super::population::Population;

/// Serializable copy of a population's roster.
///
/// The random generator state is not captured; a restored population is
/// reseeded explicitly.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PopulationSnapshot {
    /// When the snapshot was taken.
    pub saved_at: DateTime<Utc>,
    /// Generation counter at capture time.
    pub generation: u32,
    /// Whether members were ranked for that generation.
    pub ranked: bool,
    /// Population configuration.
    pub config: NeatConfig,
    /// Members in roster order.
    pub members: Vec<FeedForwardNetwork>,
}

impl PopulationSnapshot {
    /// Copies the current state of `population`.
    pub fn capture(population: &Population) -> Self {
        Self {
            saved_at: Utc::now(),
            generation: population.generation(),
            ranked: population.is_ranked(),
            config: population.config().clone(),
            members: population.members().to_vec(),
        }
    }

    /// Saves the snapshot to a JSON file.
    pub fn save_to_file(&self, path: impl AsRef<Path>) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        Ok(())
    }

    /// Loads a snapshot from a JSON file.
    pub fn load_from_file(path: impl AsRef<Path>) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        let snapshot = serde_json::from_str(&json)?;
        Ok(snapshot)
    }

    /// Rebuilds a population, validating every member against the config.
    pub fn into_population(self, seed: u64) -> Result<Population> {
        Population::restore(
            self.config,
            self.members,
            self.generation,
            self.ranked,
            seed,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::neat::error::NeatError;

    fn config() -> NeatConfig {
        NeatConfig {
            population_size: 6,
            ..NeatConfig::default()
        }
    }

    #[test]
    fn json_round_trip_preserves_behavior() {
        let mut population = Population::with_seed(config(), 1).unwrap();
        population.evolve();

        let snapshot = PopulationSnapshot::capture(&population);
        let json = serde_json::to_string(&snapshot).unwrap();
        let restored: PopulationSnapshot = serde_json::from_str(&json).unwrap();
        let restored = restored.into_population(2).unwrap();

        assert_eq!(restored.generation(), 1);
        assert!(!restored.is_ranked());
        assert_eq!(restored.config(), population.config());
        let inputs = [0.2, -0.4, 0.9, 0.3];
        for (a, b) in restored.members().iter().zip(population.members()) {
            assert_eq!(a.predict(&inputs).unwrap(), b.predict(&inputs).unwrap());
            for (x, y) in a.parameters().zip(b.parameters()) {
                assert!((x - y).abs() < 1e-6);
            }
        }
    }

    #[test]
    fn restore_rejects_short_roster() {
        let population = Population::with_seed(config(), 3).unwrap();
        let mut snapshot = PopulationSnapshot::capture(&population);
        snapshot.members.pop();

        assert!(matches!(
            snapshot.into_population(0),
            Err(NeatError::LengthMismatch {
                expected: 6,
                actual: 5
            })
        ));
    }

    #[test]
    fn restore_rejects_foreign_topology() {
        let population = Population::with_seed(config(), 4).unwrap();
        let mut snapshot = PopulationSnapshot::capture(&population);
        snapshot.config.hidden_size = 9;

        assert!(matches!(
            snapshot.into_population(0),
            Err(NeatError::DimensionMismatch { .. })
        ));
    }
}
