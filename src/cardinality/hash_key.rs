use std::hash::Hasher;

use twox_hash::XxHash64;

/// Fixed seed so hashing is reproducible across runs and processes — required for the
/// determinism property the estimators promise (same keys in, same cardinality out).
const HASH_SEED: u64 = 0x5bd1_e995_9e37_79b9;

/// The two key shapes the cardinality estimators accept. Kept as an explicit, closed set of
/// monomorphisations (mirroring how BusTub's typed `Value` column supports a fixed list of
/// SQL types) rather than a generic `T: Hash` bound, so the hash domains for integers and
/// strings can be kept provably distinct rather than merely "probably distinct by luck of
/// bit width".
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Key {
    Integer(i64),
    Varlen(String),
}

impl From<i64> for Key {
    fn from(value: i64) -> Self {
        Key::Integer(value)
    }
}

impl From<i32> for Key {
    fn from(value: i32) -> Self {
        Key::Integer(value as i64)
    }
}

impl From<&str> for Key {
    fn from(value: &str) -> Self {
        Key::Varlen(value.to_owned())
    }
}

impl From<String> for Key {
    fn from(value: String) -> Self {
        Key::Varlen(value)
    }
}

/// Produces a uniform 64-bit hash of a typed key. A one-byte type tag is mixed in ahead of
/// the value so that, e.g., `Key::Integer(53)` and `Key::Varlen("53")` land in unrelated
/// parts of the hash space instead of merely differing by coincidence of encoding.
pub(crate) fn hash_key(key: &Key) -> u64 {
    let mut hasher = XxHash64::with_seed(HASH_SEED);
    match key {
        Key::Integer(value) => {
            hasher.write_u8(0);
            hasher.write_i64(*value);
        }
        Key::Varlen(value) => {
            hasher.write_u8(1);
            hasher.write(value.as_bytes());
        }
    }
    hasher.finish()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_is_deterministic() {
        let a = hash_key(&Key::Integer(42));
        let b = hash_key(&Key::Integer(42));
        assert_eq!(a, b);
    }

    #[test]
    fn integer_and_string_domains_are_distinct() {
        let int_hash = hash_key(&Key::Integer(53));
        let str_hash = hash_key(&Key::Varlen("53".to_owned()));
        assert_ne!(int_hash, str_hash);
    }

    #[test]
    fn distinct_values_usually_hash_differently() {
        let a = hash_key(&Key::Varlen("alpha".to_owned()));
        let b = hash_key(&Key::Varlen("beta".to_owned()));
        assert_ne!(a, b);
    }
}
