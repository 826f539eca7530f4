//! Structured Logger
//!
//! Wraps `tracing` with environment-based level control: a console layer
//! always, and a daily-rolling NDJSON file layer when a log directory is
//! configured.

use std::path::Path;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Initialize the global structured logger.
///
/// `RUST_LOG` wins over `level` when set. Safe to call more than once; later
/// calls are no-ops.
pub fn init_logger(log_dir: Option<&Path>, level: &str) {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    let console_layer = fmt::layer()
        .with_writer(std::io::stdout)
        .with_target(false)
        .with_ansi(true);

    let file_layer = log_dir.map(|dir| {
        // writes NDJSON to `<dir>/scribe.log.YYYY-MM-DD`
        let file_appender = RollingFileAppender::new(Rotation::DAILY, dir, "scribe.log");
        fmt::layer().json().with_writer(file_appender).with_ansi(false)
    });

    let _ = tracing_subscriber::registry()
        .with(env_filter)
        .with(console_layer)
        .with(file_layer)
        .try_init();
}
