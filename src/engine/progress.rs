//! Progress counter for the CLI's verbose mode

use kdam::{Animation, Bar, BarExt};
use std::sync::{Arc, Mutex};

use crate::utils::config::ProgressConsts;

// Progress bar type alias
pub type ProgressBar = Arc<Mutex<Bar>>;

/// Create a counter for unknown total (shows count without percentage)
pub fn create_counter(desc: &'static str) -> ProgressBar {
    Arc::new(Mutex::new(kdam::tqdm!(
        total = 0,
        desc = desc,
        animation = Animation::Classic,
        position = 0,
        unit = " urls"
    )))
}

/// Force a refresh of the bar (e.g. so counter shows "0 urls" immediately).
pub fn refresh_bar(pb: &ProgressBar) {
    if let Ok(mut bar) = pb.try_lock() {
        let _ = bar.refresh();
    }
}

/// Update progress bar if available
/// Uses try_lock to avoid blocking the result loop if the mutex is contended
pub fn update_progress_bar(pb: &ProgressBar, n: usize) {
    if let Ok(mut pb) = pb.try_lock() {
        let _ = pb.update(n);
    }
}

/// Counts results and pushes them to the bar in batches.
pub struct ResultProgress {
    bar: Option<ProgressBar>,
    pending: usize,
}

impl ResultProgress {
    /// No bar unless `verbose`.
    pub fn new(verbose: bool) -> Self {
        let bar = verbose.then(|| {
            let b = create_counter("Scanning");
            refresh_bar(&b);
            b
        });
        Self { bar, pending: 0 }
    }

    pub fn tick(&mut self) {
        let Some(bar) = &self.bar else { return };
        self.pending += 1;
        if self.pending >= ProgressConsts::PROGRESS_UPDATE_BATCH_SIZE {
            update_progress_bar(bar, self.pending);
            self.pending = 0;
        }
    }

    /// Flush the remainder after the stream ends.
    pub fn finish(&mut self) {
        if let Some(bar) = &self.bar
            && self.pending > 0
        {
            update_progress_bar(bar, self.pending);
            self.pending = 0;
        }
    }
}
