use std::collections::HashMap;

use tracing::trace;

use super::bits::{bucket_index, clamp_bucket_bits, rho_trailing, value_field, BIAS_CONSTANT};
use super::hash_key::{hash_key, Key};

/// Width of the dense, always-allocated low bits of each logical register.
pub const DENSE_BITS: u32 = 4;
/// Width of the sparse overflow bits, stored only for buckets that actually need them.
pub const OVERFLOW_BITS: u32 = 3;

const DENSE_MASK: u16 = (1 << DENSE_BITS) - 1;

/// A HyperLogLog cardinality sketch using the "Presto" dense/overflow register encoding.
///
/// Each logical register is `DENSE_BITS + OVERFLOW_BITS` bits wide — enough to hold any
/// trailing-zero count up to 64 — but the low `DENSE_BITS` live in a packed, always-resident
/// array while the high `OVERFLOW_BITS` are only materialized, in a sparse `bucket -> bits`
/// map, for the (rare) buckets whose register actually needs them. This trades a small
/// amount of extra bookkeeping for a much smaller resident footprint than [`super::HyperLogLog`]
/// at the same bucket count, at the cost of a slightly pricier per-access update path.
///
/// The estimator differs from the plain variant in one more way: it counts **trailing**
/// zeros (from the LSB side) rather than the leftmost one (from the MSB side) when deriving
/// a register value from a hash. The cardinality formula itself is unchanged.
#[derive(Debug, Clone)]
pub struct HyperLogLogPresto {
    n_bits: u32,
    dense: Vec<u8>,
    overflow: HashMap<usize, u8>,
    cardinality: u64,
}

impl HyperLogLogPresto {
    /// Allocates `2^n_bits` dense registers (zeroed) and an empty overflow map. `n_bits` is
    /// clamped the same way as [`super::HyperLogLog::new`].
    pub fn new(n_bits: i32) -> Self {
        let b = clamp_bucket_bits(n_bits);
        let m = 1usize << b;
        Self {
            n_bits: b,
            dense: vec![0u8; m],
            overflow: HashMap::new(),
            cardinality: 0,
        }
    }

    /// Number of registers (`2^n_bits`).
    pub fn num_registers(&self) -> usize {
        self.dense.len()
    }

    fn current(&self, bucket: usize) -> u16 {
        let low = self.dense[bucket] as u16;
        let high = self.overflow.get(&bucket).copied().unwrap_or(0) as u16;
        low | (high << DENSE_BITS)
    }

    /// Folds one key into the sketch.
    pub fn add(&mut self, key: impl Into<Key>) {
        let hash = hash_key(&key.into());
        let bucket = bucket_index(hash, self.n_bits);
        let field = value_field(hash, self.n_bits);
        let candidate = rho_trailing(field, self.n_bits) as u16;

        let current = self.current(bucket);
        if candidate > current {
            self.dense[bucket] = (candidate & DENSE_MASK) as u8;
            let high = (candidate >> DENSE_BITS) as u8;
            if high == 0 {
                self.overflow.remove(&bucket);
            } else {
                self.overflow.insert(bucket, high);
            }
            trace!(bucket, candidate, "hyperloglog-presto register updated");
        }
    }

    /// Recomputes and stores the cardinality estimate from the current register state. Uses
    /// the same formula as [`super::HyperLogLog::compute_cardinality`], reading each logical
    /// register as `dense | (overflow << DENSE_BITS)`.
    ///
    /// A sketch that has never seen an `add` has every dense register at 0 and no overflow
    /// entries, which the raw formula would read as `⌊alpha · m⌋` rather than 0.
    pub fn compute_cardinality(&mut self) -> u64 {
        if self.overflow.is_empty() && self.dense.iter().all(|&r| r == 0) {
            self.cardinality = 0;
            return self.cardinality;
        }
        let m = self.dense.len() as f64;
        let sum: f64 = (0..self.dense.len())
            .map(|bucket| 2f64.powi(-(self.current(bucket) as i32)))
            .sum();
        let estimate = (BIAS_CONSTANT * m * m / sum).floor();
        self.cardinality = estimate as u64;
        self.cardinality
    }

    /// The last computed cardinality estimate, or 0 if `compute_cardinality` has never been
    /// called.
    pub fn cardinality(&self) -> u64 {
        self.cardinality
    }
}
