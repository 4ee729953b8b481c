//! Mutation operators.
//!
//! A full mutation pass first jitters the genome's private rate vector, then
//! runs each operator. Rates above 1.0 are treated as expected counts: the
//! operator runs `floor(rate)` times plus one Bernoulli trial on the
//! remainder. Operators that find no valid change (duplicate link, empty
//! genome, no flippable gene) are silent no-ops.

use rand::Rng;

use crate::config::NeatConfig;
use crate::gene::Synapse;
use crate::genome::Genome;
use crate::innovation::InnovationCounter;

/// Full mutation pass over one genome.
pub fn mutate<R: Rng>(
    genome: &mut Genome,
    config: &NeatConfig,
    innovation: &InnovationCounter,
    rng: &mut R,
) {
    genome.mutation_rates.jitter(rng);

    if rng.gen::<f64>() < genome.mutation_rates.connection {
        mutate_point(genome, config.mutation.perturbation, rng);
    }

    let mut rate = genome.mutation_rates.link;
    while rate > 0.0 {
        if rng.gen::<f64>() < rate {
            mutate_link(genome, false, innovation, rng);
        }
        rate -= 1.0;
    }

    rate = genome.mutation_rates.bias;
    while rate > 0.0 {
        if rng.gen::<f64>() < rate {
            mutate_link(genome, true, innovation, rng);
        }
        rate -= 1.0;
    }

    rate = genome.mutation_rates.node;
    while rate > 0.0 {
        if rng.gen::<f64>() < rate {
            mutate_node(genome, innovation, rng);
        }
        rate -= 1.0;
    }

    rate = genome.mutation_rates.enable;
    while rate > 0.0 {
        if rng.gen::<f64>() < rate {
            mutate_enable_disable(genome, true, rng);
        }
        rate -= 1.0;
    }

    rate = genome.mutation_rates.disable;
    while rate > 0.0 {
        if rng.gen::<f64>() < rate {
            mutate_enable_disable(genome, false, rng);
        }
        rate -= 1.0;
    }
}

/// Perturbs or replaces every gene's weight.
pub fn mutate_point<R: Rng>(genome: &mut Genome, perturbation: f64, rng: &mut R) {
    let step = genome.mutation_rates.step;
    for gene in &mut genome.genes {
        if rng.gen::<f64>() < perturbation {
            gene.weight += rng.gen::<f64>() * step * 2.0 - step;
        } else {
            gene.weight = rng.gen::<f64>() * 4.0 - 2.0;
        }
    }
}

/// Proposes a new enabled link between two random neurons. With `force_bias`
/// the source is pinned to the bias input. Duplicate (input, output) pairs
/// are rejected before an innovation number is consumed.
pub fn mutate_link<R: Rng>(
    genome: &mut Genome,
    force_bias: bool,
    innovation: &InnovationCounter,
    rng: &mut R,
) {
    let source = random_neuron(genome, false, true, rng);
    let target = random_neuron(genome, true, false, rng);
    let input = if force_bias { genome.inputs - 1 } else { source };

    if genome.contains_link(input, target) {
        return;
    }

    genome.genes.push(Synapse {
        input,
        output: target,
        weight: rng.gen::<f64>() * 4.0 - 2.0,
        enabled: true,
        innovation: innovation.next(),
    });
}

/// Splits a random enabled gene: disables it, allocates a fresh hidden
/// neuron, and adds `input -> new` (weight 1.0) and `new -> output` (original
/// weight), each with its own innovation number.
pub fn mutate_node<R: Rng>(genome: &mut Genome, innovation: &InnovationCounter, rng: &mut R) {
    if genome.genes.is_empty() {
        return;
    }

    let index = rng.gen_range(0..genome.genes.len());
    if !genome.genes[index].enabled {
        return;
    }
    genome.genes[index].enabled = false;
    genome.max_neuron += 1;

    let split = genome.genes[index].clone();

    let mut front = split.clone();
    front.output = genome.max_neuron;
    front.weight = 1.0;
    front.innovation = innovation.next();
    front.enabled = true;
    genome.genes.push(front);

    let mut back = split;
    back.input = genome.max_neuron;
    back.innovation = innovation.next();
    back.enabled = true;
    genome.genes.push(back);
}

/// Flips one random gene whose enabled flag differs from `enable`.
pub fn mutate_enable_disable<R: Rng>(genome: &mut Genome, enable: bool, rng: &mut R) {
    let candidates: Vec<usize> = genome
        .genes
        .iter()
        .enumerate()
        .filter(|(_, gene)| gene.enabled != enable)
        .map(|(index, _)| index)
        .collect();

    if candidates.is_empty() {
        return;
    }

    let index = candidates[rng.gen_range(0..candidates.len())];
    genome.genes[index].enabled = !genome.genes[index].enabled;
}

/// Picks a random neuron id for a link proposal.
///
/// Candidates are the full input range (unless `non_input`), the full output
/// range (unless `non_output`), and every qualifying endpoint of every gene.
/// Gene endpoints are kept with multiplicity, so heavily connected hidden
/// neurons are proportionally more likely — and previously orphaned hidden
/// neurons remain reachable at all.
pub fn random_neuron<R: Rng>(
    genome: &Genome,
    non_input: bool,
    non_output: bool,
    rng: &mut R,
) -> usize {
    let hidden_start = genome.hidden_start();
    let mut candidates: Vec<usize> = Vec::new();

    if !non_input {
        candidates.extend(0..genome.inputs);
    }
    if !non_output {
        candidates.extend(genome.inputs..hidden_start);
    }
    for gene in &genome.genes {
        if (!non_input || gene.input >= genome.inputs)
            && (!non_output || gene.input >= hidden_start)
        {
            candidates.push(gene.input);
        }
        if (!non_input || gene.output >= genome.inputs)
            && (!non_output || gene.output >= hidden_start)
        {
            candidates.push(gene.output);
        }
    }

    candidates[rng.gen_range(0..candidates.len())]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::NeatConfig;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn seeded() -> ChaCha8Rng {
        ChaCha8Rng::seed_from_u64(42)
    }

    fn genome_with_gene(config: &NeatConfig) -> Genome {
        let mut genome = Genome::new(config);
        genome.genes.push(Synapse {
            input: 0,
            output: 4,
            weight: 0.5,
            enabled: true,
            innovation: 2,
        });
        genome
    }

    #[test]
    fn test_link_mutation_appends_monotonic_innovations() {
        let config = NeatConfig::default();
        let counter = InnovationCounter::new(config.topology.outputs as u64);
        let mut genome = Genome::new(&config);
        let mut rng = seeded();

        let mut last = counter.current();
        for _ in 0..20 {
            let before = genome.genes.len();
            mutate_link(&mut genome, false, &counter, &mut rng);
            if genome.genes.len() > before {
                let issued = genome.genes.last().unwrap().innovation;
                assert!(issued > last, "innovation {issued} not above {last}");
                last = issued;
            }
        }
        assert!(!genome.genes.is_empty());
    }

    #[test]
    fn test_duplicate_link_is_rejected_without_innovation() {
        // One input and one output: every proposal is 0 -> 1, so after the
        // first gene every further attempt must be a no-op.
        let mut config = NeatConfig::default();
        config.topology.inputs = 1;
        config.topology.outputs = 1;
        let counter = InnovationCounter::new(1);
        let mut genome = Genome::new(&config);
        let mut rng = seeded();

        mutate_link(&mut genome, false, &counter, &mut rng);
        assert_eq!(genome.genes.len(), 1);
        let issued = counter.current();

        for _ in 0..10 {
            mutate_link(&mut genome, false, &counter, &mut rng);
        }
        assert_eq!(genome.genes.len(), 1);
        assert_eq!(counter.current(), issued);
    }

    #[test]
    fn test_bias_mutation_pins_source_to_bias_input() {
        let config = NeatConfig::default();
        let counter = InnovationCounter::new(1);
        let mut genome = Genome::new(&config);
        let mut rng = seeded();

        mutate_link(&mut genome, true, &counter, &mut rng);
        assert_eq!(genome.genes.len(), 1);
        assert_eq!(genome.genes[0].input, config.topology.inputs - 1);
    }

    #[test]
    fn test_node_mutation_splits_gene() {
        let config = NeatConfig::default();
        let counter = InnovationCounter::new(2);
        let mut genome = genome_with_gene(&config);
        let max_neuron = genome.max_neuron;
        let mut rng = seeded();

        mutate_node(&mut genome, &counter, &mut rng);

        assert_eq!(genome.genes.len(), 3);
        assert!(!genome.genes[0].enabled, "split gene must be disabled");
        assert_eq!(genome.max_neuron, max_neuron + 1);

        let front = &genome.genes[1];
        let back = &genome.genes[2];
        assert_eq!(front.input, 0);
        assert_eq!(front.output, genome.max_neuron);
        assert_eq!(front.weight, 1.0);
        assert_eq!(back.input, genome.max_neuron);
        assert_eq!(back.output, 4);
        assert_eq!(back.weight, 0.5);
        assert!(front.enabled && back.enabled);
        assert_ne!(front.innovation, back.innovation);
    }

    #[test]
    fn test_node_mutation_on_empty_genome_is_noop() {
        let config = NeatConfig::default();
        let counter = InnovationCounter::new(1);
        let mut genome = Genome::new(&config);
        let mut rng = seeded();

        mutate_node(&mut genome, &counter, &mut rng);
        assert!(genome.genes.is_empty());
        assert_eq!(counter.current(), 1);
    }

    #[test]
    fn test_node_mutation_skips_disabled_gene() {
        let config = NeatConfig::default();
        let counter = InnovationCounter::new(2);
        let mut genome = genome_with_gene(&config);
        genome.genes[0].enabled = false;
        let mut rng = seeded();

        mutate_node(&mut genome, &counter, &mut rng);
        assert_eq!(genome.genes.len(), 1);
        assert_eq!(counter.current(), 2);
    }

    #[test]
    fn test_enable_disable_flips_and_noops() {
        let config = NeatConfig::default();
        let mut genome = genome_with_gene(&config);
        let mut rng = seeded();

        // All genes enabled: enabling is a no-op, disabling flips.
        mutate_enable_disable(&mut genome, true, &mut rng);
        assert!(genome.genes[0].enabled);
        mutate_enable_disable(&mut genome, false, &mut rng);
        assert!(!genome.genes[0].enabled);
        mutate_enable_disable(&mut genome, true, &mut rng);
        assert!(genome.genes[0].enabled);
    }

    #[test]
    fn test_point_mutation_perturbs_within_step() {
        let config = NeatConfig::default();
        let mut genome = genome_with_gene(&config);
        let original = genome.genes[0].weight;
        let step = genome.mutation_rates.step;
        let mut rng = seeded();

        // perturbation = 1.0 forces the perturb branch every time.
        mutate_point(&mut genome, 1.0, &mut rng);
        let delta = (genome.genes[0].weight - original).abs();
        assert!(delta <= step + 1e-12, "delta {delta} exceeds step {step}");
    }

    #[test]
    fn test_point_mutation_replacement_stays_in_range() {
        let config = NeatConfig::default();
        let mut genome = genome_with_gene(&config);
        let mut rng = seeded();

        // perturbation = 0.0 forces the replacement branch.
        mutate_point(&mut genome, 0.0, &mut rng);
        let weight = genome.genes[0].weight;
        assert!((-2.0..2.0).contains(&weight));
    }

    #[test]
    fn test_random_neuron_reaches_orphaned_hidden() {
        let config = NeatConfig::default();
        let mut genome = Genome::new(&config);
        // A disabled gene still advertises its endpoints as candidates.
        genome.genes.push(Synapse {
            input: 9,
            output: 4,
            weight: 0.0,
            enabled: false,
            innovation: 2,
        });
        genome.max_neuron = 9;
        let mut rng = seeded();

        let mut saw_orphan = false;
        for _ in 0..200 {
            if random_neuron(&genome, true, true, &mut rng) == 9 {
                saw_orphan = true;
                break;
            }
        }
        assert!(saw_orphan, "orphaned hidden neuron never proposed");
    }

    #[test]
    fn test_random_neuron_respects_exclusions() {
        let config = NeatConfig::default();
        let genome = genome_with_gene(&config);
        let mut rng = seeded();

        for _ in 0..100 {
            let source = random_neuron(&genome, false, true, &mut rng);
            assert!(source < genome.inputs, "source {source} is not an input");
            let target = random_neuron(&genome, true, false, &mut rng);
            assert!(target >= genome.inputs, "target {target} is an input");
        }
    }

    #[test]
    fn test_full_mutation_pass_on_empty_genome() {
        let config = NeatConfig::default();
        let counter = InnovationCounter::new(config.topology.outputs as u64);
        let mut genome = Genome::new(&config);
        let mut rng = seeded();

        mutate(&mut genome, &config, &counter, &mut rng);

        // The default link rate of 2.0 makes new links near-certain, and
        // every issued innovation must be above the counter's start.
        for gene in &genome.genes {
            assert!(gene.innovation > config.topology.outputs as u64);
            assert!(gene.output >= genome.inputs);
        }
    }
}
