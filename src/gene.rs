//! Gene and neuron primitives.
//!
//! A [`Synapse`] is a single directed, weighted connection between two neuron
//! ids, tagged with the innovation number assigned when the connection first
//! appeared. Two synapses are the same gene iff their innovation numbers
//! match; the (input, output) pair is only used to reject parallel edges when
//! proposing new links.

use serde::{Deserialize, Serialize};

/// A directed weighted connection gene with a historical marker.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Synapse {
    /// Source neuron id.
    pub input: usize,
    /// Target neuron id.
    pub output: usize,
    /// Connection weight.
    pub weight: f64,
    /// Whether the connection participates in the network.
    pub enabled: bool,
    /// Globally monotonic innovation number.
    pub innovation: u64,
}

/// A computation unit in a built network: its current activation value and
/// the enabled synapses feeding it.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct Neuron {
    /// Current activation value. Neurons with no incoming synapses keep this
    /// at its previous (initially zero) value across evaluations.
    pub value: f64,
    /// Incoming enabled synapses.
    pub inputs: Vec<Synapse>,
}

/// Steepened sigmoid used by network evaluation, range (-1, 1).
pub fn sigmoid(x: f64) -> f64 {
    2.0 / (1.0 + (-4.9 * x).exp()) - 1.0
}
