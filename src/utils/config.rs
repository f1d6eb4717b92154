//! Application configuration constants.
//! Defaults and package-derived names in one place.

use std::sync::OnceLock;

// ---- Package / names (from CARGO_PKG_NAME, cached) ----

/// Package-derived names: built once from `CARGO_PKG_NAME`, then cached.
pub struct PackagePaths {
    pkg_name: &'static str,
    config_filename: String,
    env_prefix: String,
}

static PACKAGE_PATHS: OnceLock<PackagePaths> = OnceLock::new();

impl PackagePaths {
    /// Build and cache names from `CARGO_PKG_NAME`. Called once on first use.
    pub fn get() -> &'static PackagePaths {
        PACKAGE_PATHS.get_or_init(|| {
            let pkg = env!("CARGO_PKG_NAME");
            PackagePaths {
                pkg_name: pkg,
                config_filename: format!(".{pkg}.toml"),
                env_prefix: pkg.to_uppercase(),
            }
        })
    }

    pub fn pkg_name(&self) -> &str {
        self.pkg_name
    }

    /// Per-directory config file, e.g. `.urlcount.toml`.
    pub fn config_filename(&self) -> &str {
        &self.config_filename
    }

    /// Environment variable name for a setting, e.g. `URLCOUNT_WORD`.
    pub fn env_var(&self, setting: &str) -> String {
        format!("{}_{}", self.env_prefix, setting.to_uppercase())
    }
}

// ---- Defaults ----

/// Defaults used when neither file, environment nor flags set a value.
pub struct Defaults;

impl Defaults {
    /// Search term.
    pub const WORD: &'static str = "go";
    /// Worker pool size.
    pub const WORKERS: usize = 5;
    /// Item/result channel capacity (0 = unbuffered).
    pub const BUFFER_CAP: usize = 0;
    /// Per-fetch timeout in seconds.
    pub const FETCH_TIMEOUT_SECS: u64 = 10;
}

// ---- Progress ----

/// Progress counter tuning.
pub struct ProgressConsts;

impl ProgressConsts {
    /// Results between progress counter refreshes (reduce lock contention).
    pub const PROGRESS_UPDATE_BATCH_SIZE: usize = 10;
}

