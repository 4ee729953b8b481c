//! Error types for the evolution engine.
//!
//! The core is pure computation over in-memory structures, so the taxonomy is
//! narrow: precondition violations on network evaluation and the one fatal
//! population-level invariant. No-op mutations (duplicate link proposals,
//! enable/disable with no candidates, node splits on empty genomes) are valid
//! outcomes, not errors.

use thiserror::Error;

/// Main error type for evolution operations.
#[derive(Error, Debug)]
pub enum EvolutionError {
    /// A network was evaluated before being built.
    #[error("network not built: call generate_network before evaluate_network")]
    NetworkNotBuilt,

    /// The input vector does not match the configured input layer.
    #[error("input vector has {actual} values, expected {expected}")]
    InputSizeMismatch { expected: usize, actual: usize },

    /// Every species was eliminated during selection, so breeding cannot
    /// allocate offspring (the total average fitness would be zero).
    #[error("no species survived selection at generation {generation}")]
    PopulationExtinct { generation: u64 },
}

/// Result type alias for evolution operations.
pub type Result<T> = std::result::Result<T, EvolutionError>;
