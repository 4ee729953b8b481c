use neatpool::{Genome, NeatConfig, Pool, Synapse};

#[allow(dead_code)]
pub struct PoolBuilder {
    config: NeatConfig,
}

#[allow(dead_code)]
impl PoolBuilder {
    pub fn new() -> Self {
        Self {
            config: NeatConfig::default(),
        }
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.config.population.seed = Some(seed);
        self
    }

    pub fn with_config<F>(mut self, modifier: F) -> Self
    where
        F: FnOnce(&mut NeatConfig),
    {
        modifier(&mut self.config);
        self
    }

    pub fn config(&self) -> NeatConfig {
        self.config.clone()
    }

    pub fn build(self) -> Pool {
        Pool::new(self.config)
    }
}

#[allow(dead_code)]
pub struct GenomeBuilder {
    config: NeatConfig,
    genes: Vec<Synapse>,
    fitness: f64,
}

#[allow(dead_code)]
impl GenomeBuilder {
    pub fn new() -> Self {
        Self {
            config: NeatConfig::default(),
            genes: Vec::new(),
            fitness: 0.0,
        }
    }

    pub fn gene(mut self, innovation: u64, input: usize, output: usize, weight: f64) -> Self {
        self.genes.push(Synapse {
            input,
            output,
            weight,
            enabled: true,
            innovation,
        });
        self
    }

    pub fn fitness(mut self, fitness: f64) -> Self {
        self.fitness = fitness;
        self
    }

    pub fn build(self) -> Genome {
        let mut genome = Genome::new(&self.config);
        let max_referenced = self
            .genes
            .iter()
            .flat_map(|gene| [gene.input, gene.output])
            .max()
            .unwrap_or(0);
        genome.max_neuron = genome.max_neuron.max(max_referenced);
        genome.genes = self.genes;
        genome.fitness = self.fitness;
        genome
    }
}
