//! Species: clusters of mutually compatible genomes.
//!
//! Membership is decided by the compatibility test against the species'
//! representative (its first genome after the fitness sort). Average fitness
//! is rank-based, not raw: each member contributes its global rank, so weak
//! species still earn breeding slots proportional to where their members land
//! in the whole population.

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::config::NeatConfig;
use crate::genome::{crossover, Genome};
use crate::innovation::InnovationCounter;

/// A cluster of compatible genomes with its selection bookkeeping.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct Species {
    /// Member genomes, sorted descending by fitness during selection.
    pub genomes: Vec<Genome>,
    /// Best fitness this species has ever recorded.
    pub top_fitness: f64,
    /// Mean global rank of the members, updated each generation.
    pub average_fitness: f64,
    /// Consecutive generations without a `top_fitness` improvement.
    pub staleness: u32,
}

impl Species {
    /// Creates a species holding a single founding genome.
    #[must_use]
    pub fn with_genome(genome: Genome) -> Self {
        Self {
            genomes: vec![genome],
            top_fitness: 0.0,
            average_fitness: 0.0,
            staleness: 0,
        }
    }

    /// The genome new candidates are compared against.
    #[must_use]
    pub fn representative(&self) -> Option<&Genome> {
        self.genomes.first()
    }

    /// Recomputes `average_fitness` as the mean global rank of the members.
    pub fn calculate_average_fitness(&mut self) {
        if self.genomes.is_empty() {
            self.average_fitness = 0.0;
            return;
        }
        let total: f64 = self
            .genomes
            .iter()
            .map(|genome| genome.global_rank as f64)
            .sum();
        self.average_fitness = total / self.genomes.len() as f64;
    }

    /// Breeds one child: crossover of two random members with probability
    /// `breeding.crossover` (possibly the same member twice), otherwise a
    /// clone of one member. The child is always mutated.
    ///
    /// Callers must only invoke this on a non-empty species; the replacement
    /// algorithm guarantees that by culling before breeding.
    pub fn breed_child<R: Rng>(
        &self,
        config: &NeatConfig,
        innovation: &InnovationCounter,
        rng: &mut R,
    ) -> Genome {
        let mut child = if rng.gen::<f64>() < config.breeding.crossover {
            let g1 = &self.genomes[rng.gen_range(0..self.genomes.len())];
            let g2 = &self.genomes[rng.gen_range(0..self.genomes.len())];
            crossover::crossover(g1, g2, rng)
        } else {
            self.genomes[rng.gen_range(0..self.genomes.len())].inherit()
        };
        child.mutate(config, innovation, rng);
        child
    }
}
