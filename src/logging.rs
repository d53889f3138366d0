use std::fs::OpenOptions;
use std::sync::{Mutex, Once};

use tracing_subscriber::{fmt, EnvFilter};

use crate::config::{Config, DEFAULT_LOG_FILTER};

static INIT_TRACING: Once = Once::new();

/// Install the global subscriber, writing to the log file in the data
/// directory. The terminal belongs to the TUI, so nothing goes to stdout.
pub(crate) fn init(config: &Config) {
    INIT_TRACING.call_once(|| {
        let filter = EnvFilter::try_new(&config.log_filter)
            .unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));

        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&config.log_path);

        let installed = match file {
            Ok(file) => fmt()
                .with_env_filter(filter)
                .with_ansi(false)
                .with_writer(Mutex::new(file))
                .try_init()
                .is_ok(),
            // No usable log file: keep stdout clean and log to stderr instead
            Err(_) => fmt()
                .with_env_filter(filter)
                .with_writer(std::io::stderr)
                .try_init()
                .is_ok(),
        };

        if installed {
            tracing::info!(version = env!("CARGO_PKG_VERSION"), "SpendLens tracing initialized");
        }
    });
}
