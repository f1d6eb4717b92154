//! Pipeline components: admission gate, source, dispatch/workers, collector, facade.
//!
//! Source thread → item channel → dispatch thread (gate-limited worker threads) → result channel
//! → caller. The collector closes the result channel once the dispatch loop has drained and the
//! gate is idle.

pub mod collector;
pub mod context;
pub mod gate;
pub mod orchestrator;
pub mod source;
pub mod worker;

pub use collector::spawn_collector_thread;
pub use context::{
    FirstError, PipelineChannels, PipelineHandles, SourceContext, create_pipeline_channels,
    record_first_error,
};
pub use gate::{AdmissionGate, Permit};
pub use orchestrator::{
    ResultStream, count_all, stream, stream_buf, stream_items, stream_with_opts,
};
pub use source::{LineSource, run_source_loop, spawn_source_thread};
pub use worker::spawn_dispatch_thread;
