/// Opaque identifier for a buffer-pool frame. Frame ids are handed out and owned by the
/// buffer pool manager; the replacer only ever sees them as plain integers.
pub type FrameId = u32;

/// Monotonically increasing logical clock value assigned to each recorded access.
pub type Timestamp = u64;

/// Default look-back window used by the LRU-K replacer when a caller doesn't have a more
/// specific value in mind. Mirrors BUSTUB's own `LRUK_REPLACER_K`.
pub const LRUK_REPLACER_K: usize = 2;
