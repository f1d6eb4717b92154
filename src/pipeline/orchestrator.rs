use anyhow::Result;
use crossbeam_channel::Receiver;
use log::debug;
use std::io::{self, BufRead};
use std::sync::Arc;
use std::thread::JoinHandle;

use crate::pipeline::{
    self, AdmissionGate, FirstError, LineSource, PipelineChannels, PipelineHandles,
};
use crate::{CancelToken, ScanResult, SharedCounter, StreamOpts, WorkItem};

/// Live stream of results. Yields each [`ScanResult`] as soon as its worker finishes and ends once
/// every consumed item has a result.
///
/// Dropping the stream before it ends cancels the pipeline: the source stops at its next item,
/// queued items are not dispatched, and in-flight workers finish without blocking on the dropped
/// channel.
pub struct ResultStream {
    result_rx: Receiver<ScanResult>,
    handles: Option<PipelineHandles>,
    first_error: FirstError,
    cancel: CancelToken,
    /// Set once `result_rx` reported closed.
    exhausted: bool,
}

impl ResultStream {
    /// Stop reading input and dispatching. Items already admitted still produce results.
    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    pub fn cancel_token(&self) -> &CancelToken {
        &self.cancel
    }

    /// Drain any remaining results (discarding them), join every stage, and report the number of
    /// items read from the source, or the first stage fault (source I/O error, dispatch panic).
    pub fn finish(mut self) -> Result<usize> {
        let drained = self.result_rx.iter().count();
        if drained > 0 {
            debug!("finish: discarded {} unread results", drained);
        }
        let Some(PipelineHandles {
            source_handle,
            collector_handle,
        }) = self.handles.take()
        else {
            return Ok(0);
        };
        let read = join_stage(source_handle, "source")?;
        let received = join_stage(collector_handle, "collector")?;
        debug!("finish: {} items read, {} received by dispatch", read, received);

        let first_error = self
            .first_error
            .lock()
            .unwrap_or_else(|p| p.into_inner())
            .take();
        if let Some(msg) = first_error {
            return Err(anyhow::anyhow!("{}", msg));
        }
        Ok(read)
    }
}

fn join_stage(handle: JoinHandle<usize>, name: &str) -> Result<usize> {
    handle
        .join()
        .map_err(|_| anyhow::anyhow!("{} thread panicked", name))
}

impl Iterator for ResultStream {
    type Item = ScanResult;

    fn next(&mut self) -> Option<ScanResult> {
        let next = self.result_rx.recv().ok();
        if next.is_none() {
            self.exhausted = true;
        }
        next
    }
}

impl Drop for ResultStream {
    fn drop(&mut self) {
        // Abandoned mid-stream: stop every stage. A drained or finished stream leaves the
        // (possibly shared) token alone.
        if self.handles.is_some() && !self.exhausted {
            self.cancel.cancel();
        }
    }
}

/// Unbuffered stream: rendezvous handoff between stages.
pub fn stream<R>(reader: R, counter: SharedCounter, pool_size: usize) -> ResultStream
where
    R: BufRead + Send + 'static,
{
    stream_buf(reader, counter, pool_size, 0)
}

/// Stream with `buffer_cap` items/results allowed to queue ahead of the slowest stage.
pub fn stream_buf<R>(
    reader: R,
    counter: SharedCounter,
    pool_size: usize,
    buffer_cap: usize,
) -> ResultStream
where
    R: BufRead + Send + 'static,
{
    stream_with_opts(
        reader,
        counter,
        &StreamOpts::new(pool_size).with_buffer(buffer_cap),
    )
}

/// Stream lines of `reader` through the pipeline.
pub fn stream_with_opts<R>(reader: R, counter: SharedCounter, opts: &StreamOpts) -> ResultStream
where
    R: BufRead + Send + 'static,
{
    stream_items(LineSource::new(reader), counter, opts)
}

/// Start the source → dispatch → collector pipeline over any fallible item iterator and return
/// the result stream immediately.
///
/// Panics if `opts.pool_size` is 0, before any thread is started or any item is read.
pub fn stream_items<I>(iter: I, counter: SharedCounter, opts: &StreamOpts) -> ResultStream
where
    I: Iterator<Item = io::Result<WorkItem>> + Send + 'static,
{
    let gate = AdmissionGate::new(opts.pool_size);
    debug!(
        "pipeline: pool size {}, channel capacity {}",
        opts.pool_size, opts.buffer_cap
    );

    let PipelineChannels {
        item_tx,
        item_rx,
        result_tx,
        result_rx,
        first_error,
        ctx,
    } = pipeline::create_pipeline_channels(opts.buffer_cap, &opts.cancel);

    let source_handle = pipeline::spawn_source_thread(item_tx, ctx, iter);
    let dispatch_handle = pipeline::spawn_dispatch_thread(
        item_rx,
        result_tx.clone(),
        gate.clone(),
        counter,
        opts.cancel.clone(),
    );
    // The collector holds the last sender; dropping it is what closes `result_rx`.
    let collector_handle = pipeline::spawn_collector_thread(
        dispatch_handle,
        gate,
        result_tx,
        Arc::clone(&first_error),
    );

    ResultStream {
        result_rx,
        handles: Some(PipelineHandles {
            source_handle,
            collector_handle,
        }),
        first_error,
        cancel: opts.cancel.clone(),
        exhausted: false,
    }
}

/// Parallel map over an already-loaded list: the same pipeline with one pool slot and one buffer
/// slot per item, so nothing ever waits on admission or on a full channel.
pub fn count_all(items: Vec<WorkItem>, counter: SharedCounter) -> Vec<ScanResult> {
    let n = items.len().max(1);
    let opts = StreamOpts::new(n).with_buffer(n);
    let mut results_stream = stream_items(items.into_iter().map(Ok), counter, &opts);
    let results: Vec<ScanResult> = results_stream.by_ref().collect();
    if let Err(e) = results_stream.finish() {
        log::warn!("count_all: {}", e);
    }
    results
}
