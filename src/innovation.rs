//! Global innovation numbering.
//!
//! Innovation numbers are assigned once per structurally new gene and never
//! reused, which lets crossover and the compatibility metric align genes
//! across genomes with divergent topologies. The counter is atomic so that an
//! embedding which mutates genomes from several threads still gets distinct,
//! monotonically increasing numbers.

use std::sync::atomic::{AtomicU64, Ordering};

/// Monotonic counter for innovation numbers.
///
/// Starts at the number of output neurons so the low ids stay reserved for
/// the fixed interface; the first issued number is `outputs + 1`.
#[derive(Debug)]
pub struct InnovationCounter {
    next: AtomicU64,
}

impl InnovationCounter {
    /// Creates a counter whose first issued number is `start + 1`.
    #[must_use]
    pub fn new(start: u64) -> Self {
        Self {
            next: AtomicU64::new(start),
        }
    }

    /// Issues the next innovation number.
    pub fn next(&self) -> u64 {
        self.next.fetch_add(1, Ordering::Relaxed) + 1
    }

    /// The most recently issued number, or the start value if none issued.
    #[must_use]
    pub fn current(&self) -> u64 {
        self.next.load(Ordering::Relaxed)
    }
}
