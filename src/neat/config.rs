//! Population configuration.

use std::path::Path;

use serde::{Deserialize, Serialize};

use super::error::{NeatError, Result};

/// Immutable construction record for a [`Population`](super::population::Population).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NeatConfig {
    /// Length of every observation vector.
    pub input_size: usize,
    /// Width of the single hidden layer.
    pub hidden_size: usize,
    /// Number of output units. Only unit 0 drives the decision.
    pub output_size: usize,
    /// Number of networks alive in every generation.
    pub population_size: usize,
    /// Probability that a freshly bred network is mutated at all.
    pub mutation_rate: f32,
    /// Stored for compatibility, not consulted by the crossover policy.
    pub crossover_rate: f32,
}

impl Default for NeatConfig {
    fn default() -> Self {
        Self {
            input_size: 4,
            hidden_size: 4,
            output_size: 1,
            population_size: 50,
            mutation_rate: 0.1,
            crossover_rate: 0.7,
        }
    }
}

impl NeatConfig {
    /// Checks that every size is positive and both rates lie in `[0, 1]`.
    pub fn validate(&self) -> Result<()> {
        let sizes = [
            ("input_size", self.input_size),
            ("hidden_size", self.hidden_size),
            ("output_size", self.output_size),
            ("population_size", self.population_size),
        ];
        for (name, value) in sizes {
            if value == 0 {
                return Err(NeatError::InvalidConfig(format!("{name} must be positive")));
            }
        }

        let rates = [
            ("mutation_rate", self.mutation_rate),
            ("crossover_rate", self.crossover_rate),
        ];
        for (name, value) in rates {
            if !(0.0..=1.0).contains(&value) {
                return Err(NeatError::InvalidConfig(format!(
                    "{name} must be in [0, 1], got {value}"
                )));
            }
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
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        assert!(NeatConfig::default().validate().is_ok());
    }

    #[test]
    fn zero_sizes_are_rejected() {
        let config = NeatConfig {
            hidden_size: 0,
            ..NeatConfig::default()
        };
        assert!(matches!(config.validate(), Err(NeatError::InvalidConfig(_))));

        let config = NeatConfig {
            population_size: 0,
            ..NeatConfig::default()
        };
        assert!(matches!(config.validate(), Err(NeatError::InvalidConfig(_))));
    }

    #[test]
    fn rates_outside_unit_interval_are_rejected() {
        let config = NeatConfig {
            mutation_rate: 1.5,
            ..NeatConfig::default()
        };
        assert!(config.validate().is_err());

        let config = NeatConfig {
            crossover_rate: -0.1,
            ..NeatConfig::default()
        };
        assert!(config.validate().is_err());

        let config = NeatConfig {
            mutation_rate: f32::NAN,
            ..NeatConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn boundary_rates_are_accepted() {
        let config = NeatConfig {
            mutation_rate: 0.0,
            crossover_rate: 1.0,
            ..NeatConfig::default()
        };
        assert!(config.validate().is_ok());
    }
}
