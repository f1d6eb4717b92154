//! urlcount CLI: count a word across URLs from arguments or piped stdin.

use anyhow::Result;
use clap::Parser;
use std::time::Instant;
use urlcount::engine::arg_parser::Cli;
use urlcount::engine::handle_run;

fn main() -> Result<()> {
    let start_time = Instant::now();
    let cli = Cli::parse();
    handle_run(&cli)?;
    log::debug!("Total time: {:?}", start_time.elapsed());
    Ok(())
}
