//! Run configuration for the command line driver.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::game::params::GameParams;
use crate::neat::config::NeatConfig;
use crate::neat::error::{NeatError, Result};

/// Everything needed to run an evolution from the command line.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunConfig {
    /// Population and network configuration.
    pub neat: NeatConfig,
    /// Game physics.
    #[serde(default)]
    pub game: GameParams,
    /// Number of generations to evaluate.
    pub generations: u32,
    /// Frame cutoff per episode; agents alive at the cutoff earn the survival bonus.
    pub max_frames: u32,
    /// Seed for both the population and the game. Random when absent.
    #[serde(default)]
    pub seed: Option<u64>,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            neat: NeatConfig::default(),
            game: GameParams::default(),
            generations: 50,
            max_frames: 5_000,
            seed: None,
        }
    }
}

impl RunConfig {
    /// Validates all sections and their compatibility.
    pub fn validate(&self) -> Result<()> {
        self.neat.validate()?;
        self.game.validate()?;

        if self.neat.input_size != crate::game::flappy::OBSERVATION_SIZE {
            return Err(NeatError::InvalidConfig(format!(
                "the flappy game provides {} inputs, input_size is {}",
                crate::game::flappy::OBSERVATION_SIZE,
                self.neat.input_size
            )));
        }
        if self.max_frames == 0 {
            return Err(NeatError::InvalidConfig(
                "max_frames must be positive".to_string(),
            ));
        }

        Ok(())
    }

    /// Loads and validates a configuration from a JSON file.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&json)?;
        config.validate()?;
        Ok(config)
    }

    /// Writes the configuration as pretty JSON.
    pub fn save_to_file(&self, path: impl AsRef<Path>) -> Result<()> {
        std::fs::write(path, serde_json::to_string_pretty(self)?)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_run_config_is_valid() {
        assert!(RunConfig::default().validate().is_ok());
    }

    #[test]
    fn input_size_must_match_observation() {
        let mut config = RunConfig::default();
        config.neat.input_size = 5;
        assert!(matches!(config.validate(), Err(NeatError::InvalidConfig(_))));
    }

    #[test]
    fn game_section_is_optional() {
        let json = r#"{
            "neat": {
                "input_size": 4,
                "hidden_size": 6,
                "output_size": 1,
                "population_size": 20,
                "mutation_rate": 0.2,
                "crossover_rate": 0.7
            },
            "generations": 3,
            "max_frames": 1000
        }"#;
        let config: RunConfig = serde_json::from_str(json).unwrap();
        assert_eq!(config.game, GameParams::default());
        assert_eq!(config.seed, None);
        assert!(config.validate().is_ok());
    }
}
