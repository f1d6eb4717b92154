//! Engine module: the word counter and the CLI around the pipeline

pub mod arg_parser;
pub mod cli;
pub mod fetch;
pub mod progress;
pub mod report;

// Re-export commonly used functions
pub use arg_parser::{Cli, parse_pool_size};
pub use cli::{apply_cli_to_opts, build_opts, handle_run, url_items};
pub use fetch::{WordCounter, word_pattern};
pub use report::{ResultRecord, Tally, format_json, format_plain};
