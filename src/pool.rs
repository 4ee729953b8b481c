//! Population state and the generational replacement algorithm.
//!
//! [`Pool`] is an explicit, owned state struct — no globals — so multiple
//! independent populations can evolve side by side. The environment drives
//! the cycle: evaluate every live genome's network each tick, write each
//! genome's fitness once its episode ends, then call
//! [`Pool::new_generation`] to run selection and breeding.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use crate::config::NeatConfig;
use crate::error::{EvolutionError, Result};
use crate::genome::Genome;
use crate::innovation::InnovationCounter;
use crate::species::Species;

/// Snapshot of population-level counters, for logging and dashboards.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PoolStats {
    pub generation: u64,
    pub species: usize,
    pub genomes: usize,
    pub max_fitness: f64,
}

/// Process-lifetime population state: all species, the generation counter,
/// the shared innovation counter, and the all-time best fitness.
#[derive(Debug)]
pub struct Pool {
    config: NeatConfig,
    species: Vec<Species>,
    generation: u64,
    innovation: InnovationCounter,
    max_fitness: f64,
    rng: ChaCha8Rng,
}

impl Pool {
    /// Creates an empty pool. The RNG is seeded from
    /// `config.population.seed`, or from entropy when unset.
    #[must_use]
    pub fn new(config: NeatConfig) -> Self {
        let rng = match config.population.seed {
            Some(seed) => ChaCha8Rng::seed_from_u64(seed),
            None => ChaCha8Rng::from_entropy(),
        };
        let innovation = InnovationCounter::new(config.topology.outputs as u64);
        Self {
            config,
            species: Vec::new(),
            generation: 0,
            innovation,
            max_fitness: 0.0,
            rng,
        }
    }

    /// Seeds the initial population: `population.size` empty genomes, each
    /// given one mutation pass, then speciated.
    pub fn initialize(&mut self) {
        for _ in 0..self.config.population.size {
            let mut genome = Genome::new(&self.config);
            genome.mutate(&self.config, &self.innovation, &mut self.rng);
            self.add_to_species(genome);
        }
        tracing::info!(
            genomes = self.genome_count(),
            species = self.species.len(),
            "pool initialized"
        );
    }

    pub fn config(&self) -> &NeatConfig {
        &self.config
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn max_fitness(&self) -> f64 {
        self.max_fitness
    }

    pub fn species(&self) -> &[Species] {
        &self.species
    }

    /// Shared innovation counter, for embeddings that mutate genomes outside
    /// the pool's own breeding (e.g. parallel experiments).
    pub fn innovation(&self) -> &InnovationCounter {
        &self.innovation
    }

    /// Iterates every live genome. The environment uses the mutable variant
    /// to build/evaluate networks and to write episode fitness back.
    pub fn genomes(&self) -> impl Iterator<Item = &Genome> {
        self.species.iter().flat_map(|species| species.genomes.iter())
    }

    pub fn genomes_mut(&mut self) -> impl Iterator<Item = &mut Genome> {
        self.species
            .iter_mut()
            .flat_map(|species| species.genomes.iter_mut())
    }

    pub fn genome_count(&self) -> usize {
        self.species.iter().map(|species| species.genomes.len()).sum()
    }

    pub fn stats(&self) -> PoolStats {
        PoolStats {
            generation: self.generation,
            species: self.species.len(),
            genomes: self.genome_count(),
            max_fitness: self.max_fitness,
        }
    }

    /// Inserts a genome into the first species whose representative it is
    /// compatible with, scanning species in insertion order; first match
    /// wins. With no match the genome founds a new species. The
    /// order-dependence is intentional.
    pub fn add_to_species(&mut self, genome: Genome) {
        for species in &mut self.species {
            if let Some(representative) = species.representative() {
                if genome.same_species(representative, &self.config.speciation) {
                    species.genomes.push(genome);
                    return;
                }
            }
        }
        self.species.push(Species::with_genome(genome));
    }

    /// Runs one full generational replacement. Call once per episode
    /// boundary, after every individual has terminated and its fitness is
    /// final.
    pub fn new_generation(&mut self) -> Result<()> {
        self.update_max_fitness();
        self.cull_species(false);
        self.rank_globally();
        self.remove_stale_species();
        self.rank_globally();
        for species in &mut self.species {
            species.calculate_average_fitness();
        }
        self.remove_weak_species();

        if self.species.is_empty() {
            return Err(EvolutionError::PopulationExtinct {
                generation: self.generation,
            });
        }

        let population = self.config.population.size;
        let sum = self.total_average_fitness();
        let mut children: Vec<Genome> = Vec::new();

        // Each surviving species breeds proportionally to its share of the
        // rank mass, reserving one slot for its champion. A zero rank sum
        // (single surviving genome) skips straight to the top-up loop.
        if sum > 0.0 {
            for species in &self.species {
                let allocation =
                    (species.average_fitness / sum * population as f64).floor() as i64 - 1;
                for _ in 0..allocation.max(0) {
                    children.push(species.breed_child(
                        &self.config,
                        &self.innovation,
                        &mut self.rng,
                    ));
                }
            }
        }

        self.cull_species(true);

        while children.len() + self.species.len() < population {
            let index = self.rng.gen_range(0..self.species.len());
            let child =
                self.species[index].breed_child(&self.config, &self.innovation, &mut self.rng);
            children.push(child);
        }

        for child in children {
            self.add_to_species(child);
        }
        self.generation += 1;

        tracing::info!(
            generation = self.generation,
            species = self.species.len(),
            genomes = self.genome_count(),
            max_fitness = self.max_fitness,
            "generation transition complete"
        );
        Ok(())
    }

    /// Folds the episode's best fitness into the all-time maximum. Running
    /// this once at the transition boundary keeps fitness a plain field write
    /// for the environment.
    fn update_max_fitness(&mut self) {
        let episode_best = self
            .species
            .iter()
            .flat_map(|species| species.genomes.iter())
            .map(|genome| genome.fitness)
            .fold(f64::NEG_INFINITY, f64::max);
        if episode_best > self.max_fitness {
            self.max_fitness = episode_best;
        }
    }

    /// Sorts each species descending by fitness and keeps the top half
    /// (rounded up), or exactly the champion with `cut_to_one`.
    fn cull_species(&mut self, cut_to_one: bool) {
        for species in &mut self.species {
            species
                .genomes
                .sort_by(|a, b| b.fitness.total_cmp(&a.fitness));
            let keep = if cut_to_one {
                1
            } else {
                species.genomes.len().div_ceil(2)
            };
            species.genomes.truncate(keep);
        }
    }

    /// Assigns `global_rank` across all genomes: the whole population sorted
    /// ascending by fitness, rank = index (worst genome gets rank 0).
    fn rank_globally(&mut self) {
        let mut global: Vec<&mut Genome> = self
            .species
            .iter_mut()
            .flat_map(|species| species.genomes.iter_mut())
            .collect();
        global.sort_by(|a, b| a.fitness.total_cmp(&b.fitness));
        for (rank, genome) in global.into_iter().enumerate() {
            genome.global_rank = rank;
        }
    }

    /// Drops species that have gone `stale_species` generations without
    /// improving their best fitness, unless they hold the all-time record.
    fn remove_stale_species(&mut self) {
        let max_fitness = self.max_fitness;
        let stale_limit = self.config.population.stale_species;
        let before = self.species.len();

        self.species.retain_mut(|species| {
            species
                .genomes
                .sort_by(|a, b| b.fitness.total_cmp(&a.fitness));
            let best = species
                .genomes
                .first()
                .map_or(f64::NEG_INFINITY, |genome| genome.fitness);
            if best > species.top_fitness {
                species.top_fitness = best;
                species.staleness = 0;
            } else {
                species.staleness += 1;
            }
            species.staleness < stale_limit || species.top_fitness >= max_fitness
        });

        if self.species.len() < before {
            tracing::debug!(removed = before - self.species.len(), "stale species removed");
        }
    }

    /// Drops species whose proportional breeding allocation rounds to zero.
    fn remove_weak_species(&mut self) {
        let sum = self.total_average_fitness();
        if sum <= 0.0 {
            return;
        }
        let population = self.config.population.size as f64;
        let before = self.species.len();

        self.species
            .retain(|species| (species.average_fitness / sum * population).floor() >= 1.0);

        if self.species.len() < before {
            tracing::debug!(removed = before - self.species.len(), "weak species removed");
        }
    }

    fn total_average_fitness(&self) -> f64 {
        self.species
            .iter()
            .map(|species| species.average_fitness)
            .sum()
    }
}
