//! Completion stage: closes the result stream once dispatch has drained and the gate is idle.

use crossbeam_channel::Sender;
use std::sync::Arc;
use std::thread::{self, JoinHandle};

use crate::ScanResult;

use super::context::{FirstError, record_first_error};
use super::gate::AdmissionGate;

/// Completion stage: join the dispatch loop (drain), wait for the gate to go idle, then drop the
/// last result sender so the consumer's iteration ends. Returns the number of items dispatched.
/// A panicked dispatch thread is recorded in `first_error` so that `ResultStream::finish` fails.
///
/// The order matters: `wait_idle` before the dispatch loop has exited could see zero outstanding
/// between two admissions and close the stream under a worker that is about to send.
pub fn spawn_collector_thread(
    dispatch_handle: JoinHandle<usize>,
    gate: Arc<AdmissionGate>,
    result_tx: Sender<ScanResult>,
    first_error: FirstError,
) -> JoinHandle<usize> {
    thread::Builder::new()
        .name("urlcount-collector".into())
        .spawn(move || {
            let dispatched = dispatch_handle.join().unwrap_or_else(|_| {
                log::error!("dispatch thread panicked; closing stream after in-flight work");
                record_first_error(&first_error, "dispatch thread panicked".to_string());
                0
            });
            gate.wait_idle();
            drop(result_tx);
            log::debug!(
                "collector: {} items dispatched, all workers idle, result stream closed",
                dispatched
            );
            dispatched
        })
        .unwrap_or_else(|e| panic!("spawn collector thread: {e}"))
}
