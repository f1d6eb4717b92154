//! Environment overrides: `URLCOUNT_*` variables, with `.env` in the working directory loaded first.

use std::path::Path;

use crate::Opts;
use crate::utils::config::PackagePaths;

/// Load `.env` from `dir` if present. Variables already set in the process win.
pub fn load_dotenv(dir: &Path) {
    let env_path = dir.join(".env");
    if env_path.is_file()
        && let Err(e) = dotenvy::from_path(&env_path)
    {
        log::warn!("{}: {}", env_path.display(), e);
    }
}

/// Apply `URLCOUNT_WORD` / `URLCOUNT_WORKERS` as looked up by `lookup`.
/// Blank or unparsable values are ignored (unparsable ones with a warning).
pub fn apply_env_with<F>(lookup: F, opts: &mut Opts)
where
    F: Fn(&str) -> Option<String>,
{
    let paths = PackagePaths::get();
    let word_var = paths.env_var("word");
    if let Some(word) = lookup(&word_var)
        && !word.trim().is_empty()
    {
        opts.word = word.trim().to_string();
    }
    let workers_var = paths.env_var("workers");
    if let Some(raw) = lookup(&workers_var) {
        match raw.trim().parse::<usize>() {
            Ok(n) if n > 0 => opts.workers = n,
            _ => log::warn!("ignoring {}={:?}: not a positive integer", workers_var, raw),
        }
    }
}

/// Load `.env` from `dir`, then apply process environment overrides to `opts`.
pub fn apply_env_to_opts(dir: &Path, opts: &mut Opts) {
    load_dotenv(dir);
    apply_env_with(|k| std::env::var(k).ok(), opts);
}
