//! Pipeline context: channels and shared state handed to the source, dispatch and collector threads.

use crossbeam_channel::{Receiver, Sender, bounded};
use std::sync::{Arc, Mutex};
use std::thread::JoinHandle;

use crate::{CancelToken, ScanResult, WorkItem};

/// First stage fault, if any (a source read error or a dispatch panic). Read by
/// `ResultStream::finish`.
pub type FirstError = Arc<Mutex<Option<String>>>;

/// Store `msg` unless an earlier fault is already recorded.
pub fn record_first_error(slot: &FirstError, msg: String) {
    let mut first = slot.lock().unwrap_or_else(|p| p.into_inner());
    first.get_or_insert(msg);
}

/// Shared context for the source thread: cancellation plus the slot for its first I/O error.
#[derive(Clone)]
pub struct SourceContext {
    pub cancel: CancelToken,
    pub first_error: FirstError,
}

/// Channels and shared state for one pipeline run. Source gets `item_tx`; dispatch gets `item_rx`
/// and a clone of `result_tx`; the collector keeps the original `result_tx`; the caller keeps `result_rx`.
pub struct PipelineChannels {
    pub item_tx: Sender<WorkItem>,
    pub item_rx: Receiver<WorkItem>,
    pub result_tx: Sender<ScanResult>,
    pub result_rx: Receiver<ScanResult>,
    pub first_error: FirstError,
    pub ctx: SourceContext,
}

/// Stage handles kept by [`ResultStream`](crate::pipeline::ResultStream) so it can join them.
pub struct PipelineHandles {
    pub source_handle: JoinHandle<usize>,
    pub collector_handle: JoinHandle<usize>,
}

/// Both channels share `channel_cap`; 0 gives rendezvous channels.
pub fn create_pipeline_channels(channel_cap: usize, cancel: &CancelToken) -> PipelineChannels {
    let (item_tx, item_rx) = bounded::<WorkItem>(channel_cap);
    let (result_tx, result_rx) = bounded::<ScanResult>(channel_cap);
    let first_error: FirstError = Arc::new(Mutex::new(None));

    let ctx = SourceContext {
        cancel: cancel.clone(),
        first_error: Arc::clone(&first_error),
    };

    PipelineChannels {
        item_tx,
        item_rx,
        result_tx,
        result_rx,
        first_error,
        ctx,
    }
}
