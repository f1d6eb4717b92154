pub mod config;
pub mod env;
pub mod fd_limit;
pub mod logger;
pub mod urlcount_toml;

pub use config::*;
pub use env::{apply_env_to_opts, apply_env_with, load_dotenv};
pub use fd_limit::{FDS_PER_WORKER, cap_pool_size, max_open_fds, max_workers_by_fd_limit};
pub use logger::{Colors, setup_logging};
pub use urlcount_toml::{apply_file_to_opts, load_urlcount_toml, parse_urlcount_toml};
