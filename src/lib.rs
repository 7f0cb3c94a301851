//! Buffer-pool replacement policy and cardinality-estimation sketches, lifted out of a larger
//! database engine as two self-contained pieces:
//!
//! - [`buffer`]: an LRU-K victim-selection policy ([`buffer::LRUKReplacer`]) for a buffer pool's
//!   frame table. It tracks access history per frame and picks an eviction victim by backward
//!   K-distance, but does not itself own any pages — a caller (a buffer pool manager) drives it
//!   through `record_access`/`set_evictable`/`evict`.
//! - [`cardinality`]: two HyperLogLog-family distinct-count sketches,
//!   [`cardinality::HyperLogLog`] and [`cardinality::HyperLogLogPresto`], sharing a typed
//!   [`cardinality::Key`] so integer and string columns hash into separate domains.
//!
//! Both pieces use [`tracing`] for structured, level-gated diagnostics rather than bare
//! `println!`s — set up a subscriber (e.g. `tracing_subscriber::fmt`) in the embedding
//! application to see them.
//!
//! # Example
//!
//! ```
//! use lru_k_buffer_core::buffer::{AccessType, LRUKReplacer};
//!
//! let mut replacer = LRUKReplacer::new(4, 2);
//! replacer.record_access(0, AccessType::Unknown);
//! replacer.record_access(0, AccessType::Unknown);
//! replacer.set_evictable(0, true);
//! assert_eq!(Some(0), replacer.evict());
//! ```
pub mod buffer;
pub mod cardinality;
pub mod common;
