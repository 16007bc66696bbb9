//! File-only logging.
//!
//! The terminal belongs to the UI, so events go to `<cache dir>/airdash/airdash.log`
//! through a non-blocking writer. `AIRDASH_LOG` takes an `EnvFilter` directive
//! (e.g. `AIRDASH_LOG=airdash=trace`) and overrides the default level.

use std::path::PathBuf;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
    EnvFilter,
};

use crate::APP_NAME;

pub const LOG_ENV: &str = "AIRDASH_LOG";
pub const LOG_FILE: &str = "airdash.log";

/// Directory the log file is written to.
pub fn log_dir() -> Option<PathBuf> {
    dirs::cache_dir().map(|dir| dir.join(APP_NAME))
}

/// Default filter directive: info, or debug for this crate when `debug` is set.
pub fn default_directive(debug: bool) -> &'static str {
    if debug {
        "info,airdash=debug"
    } else {
        "info"
    }
}

/// Initialize logging.
///
/// Returns a `WorkerGuard` that must be held until exit so buffered events
/// are flushed. Returns `None` when no log file can be opened, in which case
/// nothing is logged.
pub fn init(debug: bool) -> Option<WorkerGuard> {
    let log_dir = log_dir()?;
    if std::fs::create_dir_all(&log_dir).is_err() {
        return None;
    }

    let appender = RollingFileAppender::builder()
        .rotation(Rotation::NEVER)
        .filename_prefix(LOG_FILE)
        .build(&log_dir)
        .ok()?;
    let (non_blocking, guard) = tracing_appender::non_blocking(appender);

    let file_layer = fmt::layer()
        .with_writer(non_blocking)
        .with_ansi(false)
        .with_target(true)
        .with_span_events(FmtSpan::NONE);

    let filter = EnvFilter::try_from_env(LOG_ENV)
        .unwrap_or_else(|_| EnvFilter::new(default_directive(debug)));

    // A subscriber may already be installed (tests); keep it.
    if tracing_subscriber::registry()
        .with(file_layer)
        .with(filter)
        .try_init()
        .is_err()
    {
        return None;
    }

    let debug_enabled = debug;
    tracing::info!(
        log_file = ?log_dir.join(LOG_FILE),
        debug = debug_enabled,
        version = env!("CARGO_PKG_VERSION"),
        "airdash logging initialized"
    );

    Some(guard)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn debug_raises_crate_level() {
        assert_eq!(default_directive(false), "info");
        assert!(default_directive(true).contains("airdash=debug"));
        assert!(EnvFilter::try_new(default_directive(true)).is_ok());
    }

    #[test]
    fn log_dir_is_namespaced() {
        if let Some(dir) = log_dir() {
            assert!(dir.ends_with(APP_NAME));
        }
    }
}
