//! Evolvable network blueprints.
//!
//! A [`Genome`] is an ordered list of synapse genes plus the metadata
//! evolution needs: fitness, the high-water mark for hidden neuron ids, a
//! global rank assigned across the whole population, and a private vector of
//! self-adapting mutation rates. The phenotype network is built lazily from
//! the gene list and cached on the genome.

pub mod crossover;
pub mod distance;
pub mod mutation;
pub mod network;

use std::collections::BTreeMap;

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::config::{MutationConfig, NeatConfig, SpeciationConfig};
use crate::error::Result;
use crate::gene::{Neuron, Synapse};
use crate::innovation::InnovationCounter;

/// Per-genome mutation rates. Every mutation pass multiplies each rate by
/// 0.95 or 1.05263 with equal probability, so mutation strength drifts
/// independently along each lineage.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MutationRates {
    pub connection: f64,
    pub link: f64,
    pub bias: f64,
    pub node: f64,
    pub enable: f64,
    pub disable: f64,
    pub step: f64,
}

impl MutationRates {
    #[must_use]
    pub fn from_config(config: &MutationConfig) -> Self {
        Self {
            connection: config.connection,
            link: config.link,
            bias: config.bias,
            node: config.node,
            enable: config.enable,
            disable: config.disable,
            step: config.step,
        }
    }

    /// Randomly scales every rate up or down by ~5%.
    pub fn jitter<R: Rng>(&mut self, rng: &mut R) {
        for rate in [
            &mut self.connection,
            &mut self.link,
            &mut self.bias,
            &mut self.node,
            &mut self.enable,
            &mut self.disable,
            &mut self.step,
        ] {
            *rate *= if rng.gen_bool(0.5) { 0.95 } else { 1.05263 };
        }
    }
}

/// An individual's evolvable neural-network blueprint.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Genome {
    /// Connection genes. Network construction sorts these by ascending
    /// output id in place.
    pub genes: Vec<Synapse>,
    /// Episode fitness, written by the environment once the individual is
    /// terminated. Only meaningful after a full evaluation episode.
    pub fitness: f64,
    /// Highest neuron id this lineage has allocated. Always at least the
    /// largest hidden id referenced by any enabled gene.
    pub max_neuron: usize,
    /// Index of this genome when the surviving population is sorted
    /// ascending by fitness.
    pub global_rank: usize,
    /// Self-adapting mutation rates, inherited from the fitter parent.
    pub mutation_rates: MutationRates,
    /// Number of input neurons (ids `0..inputs`, last one is the bias).
    pub inputs: usize,
    /// Number of output neurons (ids `inputs..inputs+outputs`).
    pub outputs: usize,
    /// Cached phenotype, built by [`Genome::generate_network`]. Not
    /// serialized; rebuild after deserializing.
    #[serde(skip)]
    pub network: Option<BTreeMap<usize, Neuron>>,
}

impl Genome {
    /// Creates an empty genome for the configured topology. The first hidden
    /// neuron a node mutation allocates will get id `inputs + outputs`.
    #[must_use]
    pub fn new(config: &NeatConfig) -> Self {
        Self {
            genes: Vec::new(),
            fitness: 0.0,
            max_neuron: config.topology.inputs + config.topology.outputs - 1,
            global_rank: 0,
            mutation_rates: MutationRates::from_config(&config.mutation),
            inputs: config.topology.inputs,
            outputs: config.topology.outputs,
            network: None,
        }
    }

    /// Deep copy carrying only heritable state: genes, `max_neuron`, the
    /// mutation-rate vector, and the topology. Fitness, rank, and the cached
    /// network are reset.
    #[must_use]
    pub fn inherit(&self) -> Self {
        Self {
            genes: self.genes.clone(),
            fitness: 0.0,
            max_neuron: self.max_neuron,
            global_rank: 0,
            mutation_rates: self.mutation_rates.clone(),
            inputs: self.inputs,
            outputs: self.outputs,
            network: None,
        }
    }

    /// First id past the output range; hidden neurons live at or above it.
    #[must_use]
    pub fn hidden_start(&self) -> usize {
        self.inputs + self.outputs
    }

    /// Whether a gene with this exact (input, output) pair already exists.
    /// Used to reject parallel edges when proposing new links.
    #[must_use]
    pub fn contains_link(&self, input: usize, output: usize) -> bool {
        self.genes
            .iter()
            .any(|gene| gene.input == input && gene.output == output)
    }

    /// Builds the phenotype network from the enabled genes.
    pub fn generate_network(&mut self) {
        network::generate_network(self);
    }

    /// Feeds an input vector through the built network and returns the
    /// output-neuron values in id order.
    pub fn evaluate_network(&mut self, inputs: &[f64]) -> Result<Vec<f64>> {
        network::evaluate_network(self, inputs)
    }

    /// Applies one full mutation pass: jitters the rate vector, then runs
    /// each operator according to its rate.
    pub fn mutate<R: Rng>(
        &mut self,
        config: &NeatConfig,
        innovation: &InnovationCounter,
        rng: &mut R,
    ) {
        mutation::mutate(self, config, innovation, rng);
    }

    /// Fraction of this genome's genes with no innovation match in `other`.
    #[must_use]
    pub fn disjoint(&self, other: &Genome) -> f64 {
        distance::disjoint(self, other)
    }

    /// Mean absolute weight difference over innovation-matched genes, or
    /// `None` when no genes match.
    #[must_use]
    pub fn weights(&self, other: &Genome) -> Option<f64> {
        distance::weights(self, other)
    }

    /// Compatibility test against a species representative. Always invoked
    /// in this direction (candidate against representative), never
    /// symmetrized.
    #[must_use]
    pub fn same_species(&self, other: &Genome, config: &SpeciationConfig) -> bool {
        distance::same_species(self, other, config)
    }

    /// Hex-encoded JSON snapshot of the heritable state, for exporting
    /// champions between runs.
    #[must_use]
    pub fn to_hex(&self) -> String {
        match serde_json::to_vec(self) {
            Ok(bytes) => hex::encode(bytes),
            Err(e) => {
                tracing::error!(error = %e, "Failed to serialize genome to JSON");
                String::new()
            }
        }
    }

    /// Decodes a genome exported by [`Genome::to_hex`]. The cached network is
    /// not part of the snapshot; call [`Genome::generate_network`] before
    /// evaluating.
    pub fn from_hex(hex_str: &str) -> anyhow::Result<Self> {
        let bytes =
            hex::decode(hex_str).map_err(|e| anyhow::anyhow!("Invalid hex encoding: {}", e))?;
        if bytes.is_empty() {
            return Err(anyhow::anyhow!("Empty hex string"));
        }
        let genome = serde_json::from_slice(&bytes)
            .map_err(|e| anyhow::anyhow!("Failed to deserialize genome: {}", e))?;
        Ok(genome)
    }
}
