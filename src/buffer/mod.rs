//! Buffer pool internals: the LRU-K victim-selection policy.
//!
//! This module intentionally stops at the replacer. A real buffer pool manager sits on top
//! of it — pairing [`LRUKReplacer`] with a page table and a disk scheduler — but that
//! manager is an external collaborator here: it is specified only by the contract it
//! consumes from the replacer (`record_access` on every fetch/unpin, `set_evictable(false)`
//! while a page is pinned, `evict` when a free frame is needed), documented on
//! [`LRUKReplacer`] itself.
pub mod lru_k_replacer;

pub use lru_k_replacer::{AccessType, LRUKReplacer};
