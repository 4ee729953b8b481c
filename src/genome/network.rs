//! Phenotype construction and evaluation.
//!
//! The network is a map from neuron id to [`Neuron`], built from the enabled
//! genes. Evaluation is a fixed two-pass sweep, not a topological sort: it
//! recomputes all hidden neurons (ascending id), then all outputs. One layer
//! of indirection through hidden neurons is therefore evaluated exactly;
//! longer hidden chains see the previous evaluation's values for upstream
//! hidden neurons. That single-sweep behavior is the model's defined
//! semantics, and it gives deep topologies a one-tick memory.

use std::collections::BTreeMap;

use crate::error::{EvolutionError, Result};
use crate::gene::{sigmoid, Neuron};
use crate::genome::Genome;

/// Builds `genome.network` from the gene list.
///
/// All input and output neurons are seeded unconditionally, even if nothing
/// connects to them. Genes are sorted in place by ascending output id before
/// wiring; both endpoints of every enabled gene are created on demand.
pub fn generate_network(genome: &mut Genome) {
    let mut network: BTreeMap<usize, Neuron> = BTreeMap::new();
    for id in 0..genome.inputs {
        network.insert(id, Neuron::default());
    }
    for id in 0..genome.outputs {
        network.insert(genome.inputs + id, Neuron::default());
    }

    genome.genes.sort_by_key(|gene| gene.output);
    for gene in &genome.genes {
        if !gene.enabled {
            continue;
        }
        network.entry(gene.output).or_default().inputs.push(gene.clone());
        network.entry(gene.input).or_default();
    }

    genome.network = Some(network);
}

/// Evaluates the built network on an input vector and returns the output
/// values in id order.
///
/// A neuron with no incoming synapses keeps its previous value; everything
/// else becomes `sigmoid(sum of weight * source value)`. Evaluation is fully
/// deterministic for a given gene list and input vector.
pub fn evaluate_network(genome: &mut Genome, inputs: &[f64]) -> Result<Vec<f64>> {
    if inputs.len() != genome.inputs {
        return Err(EvolutionError::InputSizeMismatch {
            expected: genome.inputs,
            actual: inputs.len(),
        });
    }
    let hidden_start = genome.hidden_start();
    let output_range = genome.inputs..hidden_start;
    let network = genome.network.as_mut().ok_or(EvolutionError::NetworkNotBuilt)?;

    for (id, value) in inputs.iter().enumerate() {
        if let Some(neuron) = network.get_mut(&id) {
            neuron.value = *value;
        }
    }

    let hidden_ids: Vec<usize> = network.range(hidden_start..).map(|(id, _)| *id).collect();
    for id in hidden_ids {
        recompute(network, id);
    }
    for id in output_range.clone() {
        recompute(network, id);
    }

    Ok(output_range
        .map(|id| network.get(&id).map_or(0.0, |neuron| neuron.value))
        .collect())
}

fn recompute(network: &mut BTreeMap<usize, Neuron>, id: usize) {
    let Some(neuron) = network.get(&id) else {
        return;
    };
    if neuron.inputs.is_empty() {
        return;
    }
    let sum: f64 = neuron
        .inputs
        .iter()
        .map(|synapse| {
            synapse.weight * network.get(&synapse.input).map_or(0.0, |source| source.value)
        })
        .sum();
    if let Some(neuron) = network.get_mut(&id) {
        neuron.value = sigmoid(sum);
    }
}
