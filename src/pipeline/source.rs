//! Source stage: reads work items from a line source and sends them to `item_tx`.

use crossbeam_channel::Sender;
use std::io::{self, BufRead};
use std::thread::{self, JoinHandle};

use crate::WorkItem;

use super::context::{SourceContext, record_first_error};

/// Line iterator over any `BufRead`: every line is one item, with only its `\n` or `\r\n`
/// terminator removed. Bytes that are not valid UTF-8 are replaced with U+FFFD, so a malformed
/// line still becomes an item (and fails in the counter) instead of ending the input.
pub struct LineSource<R> {
    reader: R,
    buf: Vec<u8>,
}

impl<R: BufRead> LineSource<R> {
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            buf: Vec::new(),
        }
    }
}

impl<R: BufRead> Iterator for LineSource<R> {
    type Item = io::Result<WorkItem>;

    fn next(&mut self) -> Option<Self::Item> {
        self.buf.clear();
        match self.reader.read_until(b'\n', &mut self.buf) {
            Ok(0) => None,
            Ok(_) => {
                let mut line = self.buf.as_slice();
                if let Some(rest) = line.strip_suffix(b"\n") {
                    line = rest;
                }
                if let Some(rest) = line.strip_suffix(b"\r") {
                    line = rest;
                }
                Some(Ok(String::from_utf8_lossy(line).into_owned()))
            }
            Err(e) => Some(Err(e)),
        }
    }
}

pub fn spawn_source_thread<I>(
    item_tx: Sender<WorkItem>,
    ctx: SourceContext,
    iter: I,
) -> JoinHandle<usize>
where
    I: Iterator<Item = io::Result<WorkItem>> + Send + 'static,
{
    thread::Builder::new()
        .name("urlcount-source".into())
        .spawn(move || run_source_loop(item_tx, ctx, iter))
        .unwrap_or_else(|e| panic!("spawn source thread: {e}"))
}

/// Run the source loop: send each item from `iter` to `item_tx` in order.
/// Stops on cancellation, on a disconnected item channel, or on the first I/O error (recorded in
/// `ctx.first_error`). Drops `item_tx` when done so the dispatch loop sees the channel close.
/// Returns the count of items sent.
pub fn run_source_loop<I>(item_tx: Sender<WorkItem>, ctx: SourceContext, iter: I) -> usize
where
    I: Iterator<Item = io::Result<WorkItem>>,
{
    let mut count = 0_usize;
    for next in iter {
        if ctx.cancel.is_cancelled() {
            log::debug!("source: cancelled after {} items", count);
            break;
        }
        match next {
            Ok(item) => {
                if item_tx.send(item).is_err() {
                    log::debug!("source: item channel closed after {} items", count);
                    break;
                }
                count += 1;
            }
            Err(err) => {
                log::warn!("Failed to read input after {} items: {}", count, err);
                record_first_error(&ctx.first_error, format!("read input: {err}"));
                break;
            }
        }
    }
    drop(item_tx);
    log::debug!("source: done, {} items sent", count);
    count
}
