//! Approximate distinct-count sketches: a flat-register [`HyperLogLog`] and the
//! dense/overflow-packed [`HyperLogLogPresto`] variant.
mod bits;
mod hash_key;
mod hyperloglog;
mod hyperloglog_presto;

pub use hash_key::Key;
pub use hyperloglog::HyperLogLog;
pub use hyperloglog_presto::HyperLogLogPresto;
