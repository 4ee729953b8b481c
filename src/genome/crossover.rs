//! Innovation-aligned crossover.

use std::collections::HashMap;

use rand::Rng;

use crate::gene::Synapse;
use crate::genome::Genome;

/// Combines two parents into a child genome.
///
/// The fitter parent dominates: every one of its genes is inherited, with a
/// coin flip swapping in the weaker parent's copy of a matched gene only when
/// that copy is enabled. The weaker parent's disjoint genes are never
/// inherited. The child gets the larger `max_neuron` and the fitter parent's
/// mutation rates; fitness, rank, and the cached network start fresh.
pub fn crossover<R: Rng>(g1: &Genome, g2: &Genome, rng: &mut R) -> Genome {
    let (g1, g2) = if g2.fitness > g1.fitness {
        (g2, g1)
    } else {
        (g1, g2)
    };

    let matched: HashMap<u64, &Synapse> = g2
        .genes
        .iter()
        .map(|gene| (gene.innovation, gene))
        .collect();

    let mut child = g1.inherit();
    child.genes.clear();
    for gene in &g1.genes {
        match matched.get(&gene.innovation) {
            Some(other) if rng.gen_bool(0.5) && other.enabled => {
                child.genes.push((*other).clone());
            }
            _ => child.genes.push(gene.clone()),
        }
    }

    child.max_neuron = g1.max_neuron.max(g2.max_neuron);
    child
}
