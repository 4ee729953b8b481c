//! Genetic distance and the species-compatibility test.
//!
//! Genes are aligned by innovation number. The compatibility test is always
//! invoked with the candidate on the left and a fixed species representative
//! on the right; it is not symmetrized.

use std::collections::{HashMap, HashSet};

use crate::config::SpeciationConfig;
use crate::genome::Genome;

/// Fraction of `genome`'s genes whose innovation number has no match in
/// `other`, normalized by the larger gene count. Zero when both are empty.
pub fn disjoint(genome: &Genome, other: &Genome) -> f64 {
    let normalizer = genome.genes.len().max(other.genes.len());
    if normalizer == 0 {
        return 0.0;
    }

    let innovations: HashSet<u64> = other.genes.iter().map(|gene| gene.innovation).collect();
    let disjoint_genes = genome
        .genes
        .iter()
        .filter(|gene| !innovations.contains(&gene.innovation))
        .count();
    disjoint_genes as f64 / normalizer as f64
}

/// Mean absolute weight difference over innovation-matched genes, or `None`
/// when the genomes share no innovation numbers.
pub fn weights(genome: &Genome, other: &Genome) -> Option<f64> {
    let other_weights: HashMap<u64, f64> = other
        .genes
        .iter()
        .map(|gene| (gene.innovation, gene.weight))
        .collect();

    let mut sum = 0.0;
    let mut coincident = 0usize;
    for gene in &genome.genes {
        if let Some(weight) = other_weights.get(&gene.innovation) {
            sum += (gene.weight - weight).abs();
            coincident += 1;
        }
    }
    (coincident > 0).then(|| sum / coincident as f64)
}

/// Compatibility test:
/// `delta_disjoint * disjoint + delta_weights * weights < delta_threshold`.
///
/// Two gene-less genomes are trivially the same species. Genomes that share
/// no innovation numbers have an undefined weight distance and are treated as
/// maximally dissimilar rather than silently dividing by zero.
pub fn same_species(genome: &Genome, other: &Genome, config: &SpeciationConfig) -> bool {
    if genome.genes.is_empty() && other.genes.is_empty() {
        return true;
    }
    let Some(weight_diff) = weights(genome, other) else {
        return false;
    };
    config.delta_disjoint * disjoint(genome, other) + config.delta_weights * weight_diff
        < config.delta_threshold
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::NeatConfig;
    use crate::gene::Synapse;

    fn genome_with(weights: &[(u64, f64)]) -> Genome {
        let config = NeatConfig::default();
        let mut genome = Genome::new(&config);
        for &(innovation, weight) in weights {
            genome.genes.push(Synapse {
                input: 0,
                output: 4,
                weight,
                enabled: true,
                innovation,
            });
        }
        genome
    }

    #[test]
    fn test_disjoint_self_is_zero() {
        let genome = genome_with(&[(1, 0.5), (2, -0.5), (3, 1.0)]);
        assert_eq!(genome.disjoint(&genome), 0.0);
    }

    #[test]
    fn test_disjoint_counts_unmatched_fraction() {
        let a = genome_with(&[(1, 0.0), (2, 0.0), (3, 0.0), (4, 0.0)]);
        let b = genome_with(&[(1, 0.0), (2, 0.0)]);
        assert!((a.disjoint(&b) - 0.5).abs() < 1e-12);
        // Direction matters: all of b's genes match a.
        assert_eq!(b.disjoint(&a), 0.0);
    }

    #[test]
    fn test_weights_mean_absolute_difference() {
        let a = genome_with(&[(1, 2.0)]);
        let b = genome_with(&[(1, 2.5)]);
        assert_eq!(a.weights(&b), Some(0.5));
    }

    #[test]
    fn test_weights_undefined_without_shared_genes() {
        let a = genome_with(&[(1, 2.0)]);
        let b = genome_with(&[(2, 2.0)]);
        assert_eq!(a.weights(&b), None);
    }

    #[test]
    fn test_same_species_self_always_true() {
        let config = NeatConfig::default();
        let populated = genome_with(&[(1, 0.5), (2, -1.5)]);
        assert!(populated.same_species(&populated, &config.speciation));

        let empty = Genome::new(&config);
        assert!(empty.same_species(&empty, &config.speciation));
    }

    #[test]
    fn test_no_shared_innovations_means_different_species() {
        let config = NeatConfig::default();
        let a = genome_with(&[(1, 0.0)]);
        let b = genome_with(&[(2, 0.0)]);
        assert!(!a.same_species(&b, &config.speciation));
    }

    #[test]
    fn test_weight_divergence_splits_species() {
        let config = NeatConfig::default();
        let a = genome_with(&[(1, 2.0)]);
        let near = genome_with(&[(1, 2.1)]);
        let far = genome_with(&[(1, -2.0)]);
        // 0.4 * 0.1 < 1.0, 0.4 * 4.0 >= 1.0
        assert!(a.same_species(&near, &config.speciation));
        assert!(!a.same_species(&far, &config.speciation));
    }

    #[test]
    fn test_disjoint_excess_splits_species() {
        let config = NeatConfig::default();
        let a = genome_with(&[(1, 0.0), (2, 0.0), (3, 0.0), (4, 0.0)]);
        let b = genome_with(&[(1, 0.0)]);
        // 2.0 * 0.75 + 0.4 * 0.0 >= 1.0
        assert!(!a.same_species(&b, &config.speciation));
    }
}
