use tracing::trace;

use super::bits::{bucket_index, clamp_bucket_bits, rho_leftmost, value_field, BIAS_CONSTANT};
use super::hash_key::{hash_key, Key};

/// A HyperLogLog cardinality sketch over a single flat register array.
///
/// Each of the `2^n_bits` registers tracks the largest "leftmost-one position" seen among
/// the hashes routed to its bucket; [`compute_cardinality`](Self::compute_cardinality) turns
/// that into an approximate distinct-key count. `add` is monotonic (a register only ever
/// grows) and the estimator never shrinks, so repeated `add`s of the same key are harmless.
#[derive(Debug, Clone)]
pub struct HyperLogLog {
    n_bits: u32,
    registers: Vec<u8>,
    cardinality: u64,
}

impl HyperLogLog {
    /// Allocates `2^n_bits` zeroed registers. `n_bits` is clamped into `[0, 64]` (negative
    /// values collapse to 0); see [`clamp_bucket_bits`] for the upper-bound caveat.
    pub fn new(n_bits: i32) -> Self {
        let b = clamp_bucket_bits(n_bits);
        let m = 1usize << b;
        Self {
            n_bits: b,
            registers: vec![0u8; m],
            cardinality: 0,
        }
    }

    /// Number of registers (`2^n_bits`).
    pub fn num_registers(&self) -> usize {
        self.registers.len()
    }

    /// Folds one key into the sketch.
    pub fn add(&mut self, key: impl Into<Key>) {
        let hash = hash_key(&key.into());
        let bucket = bucket_index(hash, self.n_bits);
        let field = value_field(hash, self.n_bits);
        let rho = rho_leftmost(field, self.n_bits);

        let slot = &mut self.registers[bucket];
        if rho > *slot {
            *slot = rho;
            trace!(bucket, rho, "hyperloglog register updated");
        }
    }

    /// Recomputes and stores the cardinality estimate from the current register state.
    /// Returns the same value as a subsequent [`cardinality`](Self::cardinality) call.
    ///
    /// A sketch that has never seen an `add` has every register at 0, which the raw formula
    /// would read as `⌊alpha · m⌋` rather than the correct "no data yet" answer of 0.
    pub fn compute_cardinality(&mut self) -> u64 {
        if self.registers.iter().all(|&r| r == 0) {
            self.cardinality = 0;
            return self.cardinality;
        }
        let m = self.registers.len() as f64;
        let sum: f64 = self
            .registers
            .iter()
            .map(|&r| 2f64.powi(-(r as i32)))
            .sum();
        let estimate = (BIAS_CONSTANT * m * m / sum).floor();
        self.cardinality = estimate as u64;
        self.cardinality
    }

    /// The last computed cardinality estimate, or 0 if [`compute_cardinality`](Self::compute_cardinality)
    /// has never been called.
    pub fn cardinality(&self) -> u64 {
        self.cardinality
    }
}
