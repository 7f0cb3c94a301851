pub mod config;

pub use config::{FrameId, Timestamp, LRUK_REPLACER_K};
