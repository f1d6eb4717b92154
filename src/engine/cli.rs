//! CLI command handler: build options, pick the input, stream results to stdout.

use anyhow::{Context, Result};
use log::{debug, info};
use std::io::{self, BufRead, BufReader, Cursor, IsTerminal, Write};
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use crate::engine::arg_parser::Cli;
use crate::engine::fetch::WordCounter;
use crate::engine::progress::ResultProgress;
use crate::engine::report::{Tally, format_json, format_plain, print_tally};
use crate::pipeline::{LineSource, stream_items};
use crate::utils::{
    apply_env_to_opts, apply_file_to_opts, cap_pool_size, load_urlcount_toml, setup_logging,
};
use crate::{CancelToken, Opts, StreamOpts, WorkItem};

/// Overwrite opts with every flag the user passed.
pub fn apply_cli_to_opts(cli: &Cli, opts: &mut Opts) {
    if let Some(ref w) = cli.word {
        opts.word = w.clone();
    }
    if let Some(n) = cli.workers {
        opts.workers = n;
    }
    if let Some(n) = cli.buffer {
        opts.buffer_cap = n;
    }
    if let Some(secs) = cli.timeout {
        opts.timeout = Duration::from_secs(secs);
    }
    if let Some(json) = cli.json {
        opts.json = json;
    }
    if let Some(verbose) = cli.verbose {
        opts.verbose = verbose;
    }
}

/// Defaults < `.urlcount.toml` in `dir` < environment (and `.env`) < flags.
pub fn build_opts(cli: &Cli, dir: &Path) -> Opts {
    let mut opts = Opts::default();
    if let Some(file) = load_urlcount_toml(dir) {
        apply_file_to_opts(&file, &mut opts);
    }
    apply_env_to_opts(dir, &mut opts);
    apply_cli_to_opts(cli, &mut opts);
    opts.workers = cap_pool_size(opts.workers);
    opts
}

/// Input: URL arguments joined by newlines, else piped stdin.
pub fn select_input(cli: &Cli) -> Result<Box<dyn BufRead + Send>> {
    if !cli.urls.is_empty() {
        debug!("reading {} URLs from arguments", cli.urls.len());
        return Ok(Box::new(Cursor::new(cli.urls.join("\n"))));
    }
    let stdin = io::stdin();
    if stdin.is_terminal() {
        anyhow::bail!("no input: pass URLs as arguments or pipe them on stdin");
    }
    debug!("reading URLs from stdin");
    Ok(Box::new(BufReader::new(stdin)))
}

/// URL lines of `reader`, trimmed, with blank lines skipped. Read errors pass through.
pub fn url_items<R>(reader: R) -> impl Iterator<Item = io::Result<WorkItem>> + Send
where
    R: BufRead + Send,
{
    LineSource::new(reader).filter_map(|line| match line {
        Ok(url) => {
            let url = url.trim();
            (!url.is_empty()).then(|| Ok(url.to_string()))
        }
        Err(e) => Some(Err(e)),
    })
}

/// Run the scan and print one line per URL as results arrive.
pub fn handle_run(cli: &Cli) -> Result<()> {
    setup_logging(cli.verbose.unwrap_or(false));
    let cwd = std::env::current_dir().context("read current directory")?;
    let opts = build_opts(cli, &cwd);
    let config_str = format!(
        "{} CONFIG:{:#?}",
        env!("CARGO_PKG_NAME").to_string().to_uppercase(),
        opts
    );
    debug!("{}", config_str);

    let reader = select_input(cli)?;
    let counter = Arc::new(WordCounter::new(&opts.word, opts.timeout)?);
    debug!("pattern: {}", counter.pattern());

    let cancel = CancelToken::new();
    let cancel_handler = cancel.clone();
    ctrlc::set_handler(move || {
        cancel_handler.cancel();
    })
    .context("set Ctrl+C handler")?;

    let stream_opts = StreamOpts::from(&opts).with_cancel(cancel.clone());
    let mut results = stream_items(url_items(reader), counter, &stream_opts);

    let mut tally = Tally::default();
    let mut progress = ResultProgress::new(opts.verbose);
    let stdout = io::stdout();
    for r in results.by_ref() {
        tally.record(&r);
        progress.tick();
        let line = if opts.json {
            format_json(&r)?
        } else {
            format_plain(&r)
        };
        let mut out = stdout.lock();
        if writeln!(out, "{}", line).is_err() {
            // Broken pipe: nobody is reading; stop the pipeline.
            cancel.cancel();
            break;
        }
    }
    progress.finish();
    let finished = results.finish();
    print_tally(&tally);
    let read = finished?;
    debug!("{} URLs read", read);

    if cancel.is_cancelled() {
        info!("Cancelled; remaining input was not scanned");
        return Err(anyhow::anyhow!("Scan cancelled by user"));
    }
    Ok(())
}
