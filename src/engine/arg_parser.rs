use clap::Parser;

/// Count whole-word occurrences of a search term across many URLs, a bounded number at a time.
#[derive(Clone, Debug, Parser)]
#[command(name = "urlcount")]
#[command(about = "Fetch URLs concurrently and count a word in each. Reads URLs from arguments or piped stdin.")]
pub struct Cli {
    /// URLs to scan. When empty, URLs are read from piped stdin, one per line.
    #[arg(value_name = "URL")]
    pub urls: Vec<String>,

    /// Number of URLs fetched concurrently. Default: 5.
    #[arg(long, short = 'k', allow_hyphen_values = true, value_parser = parse_pool_size)]
    pub workers: Option<usize>,

    /// Whole word to count. Default: "go".
    #[arg(long, short = 'q')]
    pub word: Option<String>,

    /// Items/results allowed to queue ahead of the slowest stage. Default: 0 (unbuffered).
    #[arg(long, short = 'b')]
    pub buffer: Option<usize>,

    /// Per-URL fetch timeout in seconds. Default: 10.
    #[arg(long, short = 't', value_parser = clap::value_parser!(u64).range(1..))]
    pub timeout: Option<u64>,

    /// Print one JSON object per result.
    #[arg(long, short = 'j', num_args = 0..=1, default_missing_value = "true", value_parser = clap::value_parser!(bool))]
    pub json: Option<bool>,

    /// Verbose output.
    #[arg(long, short = 'v', num_args = 0..=1, default_missing_value = "true", value_parser = clap::value_parser!(bool))]
    pub verbose: Option<bool>,
}

/// Pool size must be a positive integer; reject 0 and negatives before the pipeline sees them.
pub fn parse_pool_size(s: &str) -> Result<usize, String> {
    let n: i64 = s
        .trim()
        .parse()
        .map_err(|_| format!("`{s}` is not an integer"))?;
    if n <= 0 {
        return Err(format!("pool size must be positive, got {n}"));
    }
    usize::try_from(n).map_err(|_| format!("pool size {n} is too large"))
}
