//! Load `.urlcount.toml` from a directory (CLI only). Lib callers pass options directly.
//! Verbosity is flag-only: logging is set up before the file is read.

use serde::Deserialize;
use std::path::Path;
use std::time::Duration;

use crate::Opts;
use crate::utils::config::PackagePaths;

#[derive(Debug, Deserialize)]
pub struct UrlcountToml {
    #[serde(default)]
    settings: SettingsSection,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct SettingsSection {
    word: Option<String>,
    workers: Option<usize>,
    buffer: Option<usize>,
    timeout: Option<u64>,
    json: Option<bool>,
}

/// Parse config text. Errors carry the toml message.
pub fn parse_urlcount_toml(s: &str) -> Result<UrlcountToml, toml::de::Error> {
    toml::from_str(s)
}

/// Load `.urlcount.toml` from `dir` if present. Returns None if the file is missing, unreadable or
/// malformed (malformed is logged).
pub fn load_urlcount_toml(dir: &Path) -> Option<UrlcountToml> {
    let path = dir.join(PackagePaths::get().config_filename());
    let s = std::fs::read_to_string(&path).ok()?;
    parse_urlcount_toml(&s)
        .map_err(|e| log::warn!("{}: {}", path.display(), e))
        .ok()
}

/// Overwrite opts field from file when present.
macro_rules! apply_file_opt {
    ($idx:expr, $opts:expr, $idx_field:ident => $opts_field:ident) => {
        if let Some(v) = $idx.$idx_field {
            $opts.$opts_field = v;
        }
    };
}

/// Apply file config to opts (only fields present in the file). Zero workers or timeout are
/// ignored with a warning so a bad file never reaches the pipeline.
pub fn apply_file_to_opts(file: &UrlcountToml, opts: &mut Opts) {
    let idx = &file.settings;
    if let Some(ref w) = idx.word {
        opts.word = w.clone();
    }
    match idx.workers {
        Some(0) => log::warn!("ignoring workers = 0 in config file"),
        Some(n) => opts.workers = n,
        None => {}
    }
    apply_file_opt!(idx, opts, buffer => buffer_cap);
    match idx.timeout {
        Some(0) => log::warn!("ignoring timeout = 0 in config file"),
        Some(secs) => opts.timeout = Duration::from_secs(secs),
        None => {}
    }
    apply_file_opt!(idx, opts, json => json);
}
