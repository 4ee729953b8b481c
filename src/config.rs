//! Configuration for the evolution engine.
//!
//! Strongly-typed configuration structures that map to a TOML file. The
//! defaults are a known-good parameter set for small control tasks, so a
//! pool built from `NeatConfig::default()` works without any file at all.
//!
//! ## Example `neat.toml`
//!
//! ```toml
//! [topology]
//! inputs = 4
//! outputs = 1
//!
//! [population]
//! size = 50
//! seed = 42
//!
//! [mutation]
//! link = 2.0
//! node = 0.5
//! ```

use serde::{Deserialize, Serialize};

/// Fixed network interface: how many input and output neurons every genome
/// has. Input ids are `0..inputs` (the last input is conventionally a bias
/// held at 1.0 by the environment), output ids are `inputs..inputs+outputs`.
#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(default)]
pub struct TopologyConfig {
    pub inputs: usize,
    pub outputs: usize,
}

impl Default for TopologyConfig {
    fn default() -> Self {
        Self {
            inputs: 4,
            outputs: 1,
        }
    }
}

/// Population-level parameters.
#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(default)]
pub struct PopulationConfig {
    /// Target number of genomes per generation.
    pub size: usize,
    /// Generations without improvement before a species is dropped.
    pub stale_species: u32,
    /// RNG seed; `None` seeds from entropy.
    pub seed: Option<u64>,
}

impl Default for PopulationConfig {
    fn default() -> Self {
        Self {
            size: 50,
            stale_species: 15,
            seed: None,
        }
    }
}

/// Initial per-genome mutation rates. Each genome owns its own copy of these
/// seven rates and jitters them every time it mutates, so mutation strength
/// self-adapts along a lineage.
#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(default)]
pub struct MutationConfig {
    /// Probability of a point-mutation pass over all weights.
    pub connection: f64,
    /// Expected number of new-link attempts per mutation.
    pub link: f64,
    /// Expected number of bias-link attempts per mutation.
    pub bias: f64,
    /// Expected number of node-split attempts per mutation.
    pub node: f64,
    /// Expected number of re-enable attempts per mutation.
    pub enable: f64,
    /// Expected number of disable attempts per mutation.
    pub disable: f64,
    /// Weight perturbation half-range for point mutation.
    pub step: f64,
    /// Probability that point mutation perturbs a weight rather than
    /// replacing it with a fresh uniform value in [-2, 2].
    pub perturbation: f64,
}

impl Default for MutationConfig {
    fn default() -> Self {
        Self {
            connection: 0.25,
            link: 2.0,
            bias: 0.4,
            node: 0.5,
            enable: 0.2,
            disable: 0.4,
            step: 0.1,
            perturbation: 0.9,
        }
    }
}

/// Genetic-distance coefficients for the compatibility test.
#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(default)]
pub struct SpeciationConfig {
    /// Weight of the disjoint-gene fraction.
    pub delta_disjoint: f64,
    /// Weight of the mean matched-gene weight difference.
    pub delta_weights: f64,
    /// Two genomes are the same species iff the weighted sum is below this.
    pub delta_threshold: f64,
}

impl Default for SpeciationConfig {
    fn default() -> Self {
        Self {
            delta_disjoint: 2.0,
            delta_weights: 0.4,
            delta_threshold: 1.0,
        }
    }
}

/// Reproduction parameters.
#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(default)]
pub struct BreedingConfig {
    /// Probability that a child is bred by crossover rather than cloning.
    pub crossover: f64,
}

impl Default for BreedingConfig {
    fn default() -> Self {
        Self { crossover: 0.75 }
    }
}

/// Complete engine configuration.
#[derive(Serialize, Deserialize, Debug, Clone, Default)]
#[serde(default)]
pub struct NeatConfig {
    pub topology: TopologyConfig,
    pub population: PopulationConfig,
    pub mutation: MutationConfig,
    pub speciation: SpeciationConfig,
    pub breeding: BreedingConfig,
}

impl NeatConfig {
    /// Validates all configuration parameters.
    ///
    /// Returns `Ok(())` if all parameters are valid, or `Err` with a
    /// description of the first validation failure.
    pub fn validate(&self) -> anyhow::Result<()> {
        anyhow::ensure!(
            self.topology.inputs >= 1,
            "At least one input neuron is required (the bias input)"
        );
        anyhow::ensure!(
            self.topology.outputs >= 1,
            "At least one output neuron is required"
        );
        anyhow::ensure!(self.population.size >= 1, "Population must be positive");
        anyhow::ensure!(
            self.population.size <= 100_000,
            "Population too large (max 100000)"
        );
        anyhow::ensure!(
            self.population.stale_species >= 1,
            "Stale-species threshold must be positive"
        );

        anyhow::ensure!(
            (0.0..=1.0).contains(&self.mutation.connection),
            "Point-mutation probability must be in [0.0, 1.0]"
        );
        for (name, rate) in [
            ("link", self.mutation.link),
            ("bias", self.mutation.bias),
            ("node", self.mutation.node),
            ("enable", self.mutation.enable),
            ("disable", self.mutation.disable),
        ] {
            anyhow::ensure!(rate >= 0.0, "Mutation rate `{name}` must be non-negative");
        }
        anyhow::ensure!(
            self.mutation.step >= 0.0,
            "Perturbation step must be non-negative"
        );
        anyhow::ensure!(
            (0.0..=1.0).contains(&self.mutation.perturbation),
            "Perturbation probability must be in [0.0, 1.0]"
        );

        anyhow::ensure!(
            self.speciation.delta_disjoint >= 0.0,
            "Disjoint coefficient must be non-negative"
        );
        anyhow::ensure!(
            self.speciation.delta_weights >= 0.0,
            "Weights coefficient must be non-negative"
        );
        anyhow::ensure!(
            self.speciation.delta_threshold > 0.0,
            "Compatibility threshold must be positive"
        );

        anyhow::ensure!(
            (0.0..=1.0).contains(&self.breeding.crossover),
            "Crossover probability must be in [0.0, 1.0]"
        );

        Ok(())
    }

    /// Loads and validates configuration from TOML text. Missing sections and
    /// fields fall back to defaults.
    pub fn from_toml(content: &str) -> anyhow::Result<Self> {
        let config = toml::from_str::<Self>(content)?;
        config.validate()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_validates() {
        let config = NeatConfig::default();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_zero_inputs_rejected() {
        let config = NeatConfig {
            topology: TopologyConfig {
                inputs: 0,
                ..Default::default()
            },
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_zero_population_rejected() {
        let config = NeatConfig {
            population: PopulationConfig {
                size: 0,
                ..Default::default()
            },
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_perturbation_out_of_range_rejected() {
        let config = NeatConfig {
            mutation: MutationConfig {
                perturbation: 1.5,
                ..Default::default()
            },
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_negative_link_rate_rejected() {
        let config = NeatConfig {
            mutation: MutationConfig {
                link: -0.1,
                ..Default::default()
            },
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_partial_toml_overrides_defaults() {
        let config = NeatConfig::from_toml(
            r#"
            [topology]
            inputs = 6

            [population]
            seed = 7
            "#,
        )
        .expect("partial toml should parse");
        assert_eq!(config.topology.inputs, 6);
        assert_eq!(config.topology.outputs, 1);
        assert_eq!(config.population.seed, Some(7));
        assert_eq!(config.population.size, 50);
    }

    #[test]
    fn test_invalid_toml_rejected() {
        assert!(NeatConfig::from_toml("[population]\nsize = 0").is_err());
    }
}
