//! Result formatting and tallies for CLI output

use serde::Serialize;

use crate::ScanResult;
use crate::utils::Colors;

/// One output line in `--json` mode.
#[derive(Debug, Serialize)]
pub struct ResultRecord<'a> {
    pub url: &'a str,
    pub count: Option<usize>,
    pub error: Option<String>,
}

impl<'a> From<&'a ScanResult> for ResultRecord<'a> {
    fn from(r: &'a ScanResult) -> Self {
        ResultRecord {
            url: &r.item,
            count: r.is_ok().then_some(r.count),
            error: r.error.as_ref().map(|e| format!("{:#}", e)),
        }
    }
}

/// Plain text line for a result.
pub fn format_plain(r: &ScanResult) -> String {
    match &r.error {
        Some(err) => format!("Error for {}: {:#}", r.item, err),
        None => format!("Count for {}: {}", r.item, r.count),
    }
}

pub fn format_json(r: &ScanResult) -> serde_json::Result<String> {
    serde_json::to_string(&ResultRecord::from(r))
}

/// Ok / failed counts over everything the stream produced.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Tally {
    pub ok: usize,
    pub failed: usize,
}

impl Tally {
    pub fn record(&mut self, r: &ScanResult) {
        if r.is_ok() {
            self.ok += 1;
        } else {
            self.failed += 1;
        }
    }

    pub fn total(&self) -> usize {
        self.ok + self.failed
    }
}

/// Print tally summary
pub fn print_tally(tally: &Tally) {
    if tally.total() == 0 {
        log::info!("No URLs to scan.");
        return;
    }
    log::info!(
        "{} | {}",
        Colors::colorize(Colors::OK, &format!("Counted: {}", tally.ok)),
        Colors::colorize(Colors::FAILED, &format!("Failed: {}", tally.failed))
    );
}
