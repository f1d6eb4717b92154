//! urlcount: bounded-concurrency streaming word counter over URLs

pub mod engine;
pub mod pipeline;
pub mod types;
pub mod utils;

/// Re-export types for API
pub use types::*;

pub use engine::fetch::WordCounter;
pub use pipeline::{ResultStream, count_all, stream, stream_buf, stream_items, stream_with_opts};

/// Result alias used by public urlcount API
pub use anyhow::Error;
pub type Result<T> = std::result::Result<T, Error>;
