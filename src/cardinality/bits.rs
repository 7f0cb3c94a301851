//! Bit-layout helpers shared by [`super::HyperLogLog`] and [`super::HyperLogLogPresto`].
//!
//! Both estimators split a 64-bit hash into a `b`-bit bucket index (the top bits) and a
//! `64-b`-bit value field (the remaining low bits), then derive a small register value from
//! that field. They differ only in which end of the field they scan from, so the shared
//! plumbing — clamping `b`, slicing the field out of the hash, the fixed bias constant — lives
//! here once.

/// `alpha` from the original HyperLogLog paper's bias-correction term. BusTub (and this
/// crate, for bit-compatibility with it) uses a single fixed constant instead of the
/// size-dependent alpha table from the paper. This is known to be less accurate for large
/// register counts than the full table, but it is the contract this estimator preserves.
pub const BIAS_CONSTANT: f64 = 0.79402;

/// Clamps a caller-supplied bucket-index width into `[0, 64]` (negative widths collapse to
/// 0, per the estimator's numeric-boundary contract), then further caps it at 63 so that
/// `2^n_bits` register slots fit in a `usize` on a 64-bit target and can actually be
/// allocated. `n_bits == 64` would otherwise ask for more registers than exist physical
/// memory to back; 63 is already far past any value a real cardinality sketch would use.
pub fn clamp_bucket_bits(n_bits: i32) -> u32 {
    let clamped = n_bits.clamp(0, 64);
    if clamped == 64 {
        63
    } else {
        clamped as u32
    }
}

/// The top `b` bits of `hash`, used as the bucket index.
pub fn bucket_index(hash: u64, b: u32) -> usize {
    if b == 0 {
        0
    } else {
        (hash >> (64 - b)) as usize
    }
}

/// The low `64-b` bits of `hash` (the "value field" the register is derived from).
pub fn value_field(hash: u64, b: u32) -> u64 {
    let w = 64 - b;
    if w >= 64 {
        hash
    } else {
        hash & ((1u64 << w) - 1)
    }
}

/// Standard HyperLogLog register update: `1 + ` the position of the leftmost 1-bit in the
/// `w`-bit value field, counted from the field's MSB, or `0` if the field is entirely zero.
///
/// `value_field` is assumed to already have its upper `b` bits cleared (as produced by
/// [`value_field`]), so `value_field.leading_zeros()` is always at least `b` and the
/// subtraction below never underflows.
pub fn rho_leftmost(value_field: u64, b: u32) -> u8 {
    if value_field == 0 {
        return 0;
    }
    (1 + value_field.leading_zeros() - b) as u8
}

/// HyperLogLog-Presto's register update: `1 + ` the count of trailing zero bits in the `w`-bit
/// value field, capped at `w` when the field is entirely zero (the worst case: no 1-bit
/// anywhere in the field).
pub fn rho_trailing(value_field: u64, b: u32) -> u8 {
    let w = 64 - b;
    let trailing = if value_field == 0 {
        w
    } else {
        value_field.trailing_zeros().min(w)
    };
    (trailing + 1) as u8
}
