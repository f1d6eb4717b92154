//! Public and internal types for the urlcount API and pipeline.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use crate::utils::config::Defaults;

/// One unit of input: a source line without its terminator (a URL in the CLI).
pub type WorkItem = String;

/// Outcome for a single [`WorkItem`]. Exactly one is produced per item the pipeline consumes.
///
/// When `error` is `Some`, `count` is 0 and carries no meaning.
#[derive(Debug)]
pub struct ScanResult {
    pub item: WorkItem,
    pub count: usize,
    pub error: Option<anyhow::Error>,
}

impl ScanResult {
    pub fn ok(item: WorkItem, count: usize) -> Self {
        Self {
            item,
            count,
            error: None,
        }
    }

    pub fn failed(item: WorkItem, error: anyhow::Error) -> Self {
        Self {
            item,
            count: 0,
            error: Some(error),
        }
    }

    pub fn is_ok(&self) -> bool {
        self.error.is_none()
    }
}

/// Per-item operation run by the worker stage. Must be safe to call from many threads at once.
///
/// Any closure `Fn(&str) -> anyhow::Result<usize>` is a counter, which is what tests use.
pub trait Counter: Send + Sync + 'static {
    fn count(&self, item: &str) -> anyhow::Result<usize>;
}

impl<F> Counter for F
where
    F: Fn(&str) -> anyhow::Result<usize> + Send + Sync + 'static,
{
    fn count(&self, item: &str) -> anyhow::Result<usize> {
        self(item)
    }
}

/// Shared handle to a counter, cloned into every worker thread.
pub type SharedCounter = Arc<dyn Counter>;

/// Cooperative cancellation flag shared by the source, the dispatch loop and every worker.
#[derive(Clone, Debug, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

/// Parameters for [`stream_with_opts`](crate::pipeline::stream_with_opts).
#[derive(Clone, Debug)]
pub struct StreamOpts {
    /// Max counter calls in flight at once. Must be at least 1.
    pub pool_size: usize,
    /// Capacity of the item and result channels. 0 means rendezvous handoff (max backpressure).
    pub buffer_cap: usize,
    /// Token checked by every stage; set it to stop the pipeline early.
    pub cancel: CancelToken,
}

impl StreamOpts {
    pub fn new(pool_size: usize) -> Self {
        Self {
            pool_size,
            buffer_cap: 0,
            cancel: CancelToken::new(),
        }
    }

    pub fn with_buffer(mut self, buffer_cap: usize) -> Self {
        self.buffer_cap = buffer_cap;
        self
    }

    pub fn with_cancel(mut self, cancel: CancelToken) -> Self {
        self.cancel = cancel;
        self
    }
}

/// Full options (CLI). Built from defaults, then `.urlcount.toml`, then environment, then flags.
#[derive(Clone, Debug)]
pub struct Opts {
    /// Whole word to count in each fetched page.
    pub word: String,
    /// Worker pool size (max concurrent fetches).
    pub workers: usize,
    /// Item/result channel capacity.
    pub buffer_cap: usize,
    /// Per-fetch timeout.
    pub timeout: Duration,
    /// Print one JSON object per result instead of plain lines.
    pub json: bool,
    /// Debug logging and progress counter.
    pub verbose: bool,
}

impl Default for Opts {
    fn default() -> Self {
        Opts {
            word: Defaults::WORD.to_string(),
            workers: Defaults::WORKERS,
            buffer_cap: Defaults::BUFFER_CAP,
            timeout: Duration::from_secs(Defaults::FETCH_TIMEOUT_SECS),
            json: false,
            verbose: false,
        }
    }
}

impl From<&Opts> for StreamOpts {
    fn from(o: &Opts) -> Self {
        StreamOpts::new(o.workers).with_buffer(o.buffer_cap)
    }
}
