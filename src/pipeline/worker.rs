//! Dispatch and worker stage: gate-limited worker threads, one per item.

use crossbeam_channel::{Receiver, Sender};
use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;
use std::thread::{self, JoinHandle};

use crate::{CancelToken, ScanResult, SharedCounter, WorkItem};

use super::gate::{AdmissionGate, Permit};

/// Run the counter on one item. Errors and panics both become the item's error.
fn scan_item(counter: &SharedCounter, item: WorkItem, cancel: &CancelToken) -> ScanResult {
    if cancel.is_cancelled() {
        return ScanResult::failed(item, anyhow::anyhow!("cancelled before fetch"));
    }
    match panic::catch_unwind(AssertUnwindSafe(|| counter.count(&item))) {
        Ok(Ok(count)) => ScanResult::ok(item, count),
        Ok(Err(err)) => ScanResult::failed(item, err),
        Err(payload) => {
            let msg = panic_message(payload.as_ref());
            ScanResult::failed(item, anyhow::anyhow!("counter panicked: {msg}"))
        }
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic payload".to_string()
    }
}

/// Single worker: scan, send the result, then release. The permit is taken by value so it is
/// dropped last, after the sender.
fn worker_task(
    item: WorkItem,
    counter: SharedCounter,
    result_tx: Sender<ScanResult>,
    cancel: CancelToken,
    permit: Permit,
) {
    let result = scan_item(&counter, item, &cancel);
    if let Err(unsent) = result_tx.send(result) {
        log::debug!("worker: result for {} dropped, consumer gone", unsent.0.item);
    }
    drop(result_tx);
    drop(permit);
}

/// Dispatch loop: for each item, take a gate permit, then hand the item to a fresh worker thread
/// without waiting for it. Exits when `item_rx` is closed and empty. Returns the number of items
/// received.
///
/// After cancellation the loop keeps receiving until the source stops, and answers every item with
/// a `cancelled before dispatch` error, so each item the source sent still has one result.
fn dispatch_loop(
    item_rx: Receiver<WorkItem>,
    result_tx: Sender<ScanResult>,
    gate: Arc<AdmissionGate>,
    counter: SharedCounter,
    cancel: CancelToken,
) -> usize {
    let mut received = 0_usize;
    let mut skipped = 0_usize;
    while let Ok(item) = item_rx.recv() {
        received += 1;
        if cancel.is_cancelled() {
            skipped += 1;
            let result = ScanResult::failed(item, anyhow::anyhow!("cancelled before dispatch"));
            // Fails only once the consumer is gone.
            let _ = result_tx.send(result);
            continue;
        }
        let permit = gate.acquire();
        let counter = Arc::clone(&counter);
        let worker_tx = result_tx.clone();
        let cancel_w = cancel.clone();
        let name = item.clone();
        let spawned = thread::Builder::new()
            .name("urlcount-worker".into())
            .spawn(move || worker_task(item, counter, worker_tx, cancel_w, permit));
        // On failure the closure is dropped, which releases the permit.
        if let Err(e) = spawned {
            log::warn!("Failed to spawn worker for {}: {}", name, e);
            let result = ScanResult::failed(name, anyhow::anyhow!("spawn worker thread: {e}"));
            let _ = result_tx.send(result);
        }
    }
    drop(result_tx);
    log::debug!(
        "dispatch: item channel closed, {} items received, {} skipped after cancel",
        received,
        skipped
    );
    received
}

/// Spawn the dispatch thread. `result_tx` is a clone; the collector owns the original.
pub fn spawn_dispatch_thread(
    item_rx: Receiver<WorkItem>,
    result_tx: Sender<ScanResult>,
    gate: Arc<AdmissionGate>,
    counter: SharedCounter,
    cancel: CancelToken,
) -> JoinHandle<usize> {
    thread::Builder::new()
        .name("urlcount-dispatch".into())
        .spawn(move || dispatch_loop(item_rx, result_tx, gate, counter, cancel))
        .unwrap_or_else(|e| panic!("spawn dispatch thread: {e}"))
}
