//! # neatpool
//!
//! A neuroevolution engine in the NEAT (Neuroevolution of Augmenting
//! Topologies) family: populations of small feed-forward networks evolve
//! through weight and topology mutation, innovation-aligned crossover,
//! speciation, and fitness-proportionate generational replacement.
//!
//! The engine is environment-agnostic. An embedding (a game, a control task,
//! a benchmark) owns the evaluation loop: it feeds each live genome's network
//! an input vector per tick, interprets the outputs, writes a scalar fitness
//! back once the individual terminates, and asks the pool for the next
//! generation when everyone is done.
//!
//! ## Example
//!
//! ```
//! use neatpool::{NeatConfig, Pool};
//!
//! let mut config = NeatConfig::default();
//! config.population.seed = Some(42);
//!
//! let mut pool = Pool::new(config);
//! pool.initialize();
//!
//! // One evaluation episode: the environment scores every genome.
//! for genome in pool.genomes_mut() {
//!     genome.generate_network();
//!     let outputs = genome.evaluate_network(&[0.2, -0.4, 0.7, 1.0]).unwrap();
//!     genome.fitness = outputs[0];
//! }
//!
//! pool.new_generation().unwrap();
//! assert_eq!(pool.generation(), 1);
//! assert_eq!(pool.genome_count(), 50);
//! ```
//!
//! ## Evaluation semantics
//!
//! Network evaluation is a fixed two-pass sweep (hidden neurons, then
//! outputs), not a topological sort: exactly one layer of hidden indirection
//! is evaluated within a tick, and deeper hidden chains see the previous
//! tick's upstream values. See [`genome::network`] for details.

/// Engine configuration with TOML loading and validation
pub mod config;
/// Error types for evolution operations
pub mod error;
/// Synapse gene and neuron primitives
pub mod gene;
/// Evolvable network blueprints: construction, evaluation, mutation
pub mod genome;
/// Global innovation numbering
pub mod innovation;
/// Tracing subscriber setup
pub mod logging;
/// Population state and generational replacement
pub mod pool;
/// Species clustering and breeding
pub mod species;

pub use config::NeatConfig;
pub use error::{EvolutionError, Result};
pub use gene::{sigmoid, Neuron, Synapse};
pub use genome::{Genome, MutationRates};
pub use innovation::InnovationCounter;
pub use logging::init_logging;
pub use pool::{Pool, PoolStats};
pub use species::Species;
