//! Structured Logger
//!
//! Wraps `tracing` with console output, optional daily-rolling NDJSON files,
//! and environment-based level control.

use std::path::Path;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{
    fmt::{self, writer::BoxMakeWriter},
    layer::SubscriberExt,
    util::SubscriberInitExt,
    EnvFilter,
};

/// Where human-readable log lines go.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConsoleStream {
    Stdout,
    /// Keeps stdout clean for commands whose output is piped.
    Stderr,
}

/// Initialize the global logger. `RUST_LOG` overrides `level` when set.
///
/// With a `log_dir`, JSON lines are also written to `medlens.log.YYYY-MM-DD`
/// in that directory. Calling this twice is a no-op.
pub fn init_logger<P: AsRef<Path>>(level: &str, log_dir: Option<P>, console: ConsoleStream) {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    let file_layer = log_dir.map(|dir| {
        let file_appender = RollingFileAppender::new(Rotation::DAILY, dir, "medlens.log");
        fmt::layer().json().with_writer(file_appender).with_ansi(false)
    });

    let console_writer = match console {
        ConsoleStream::Stdout => BoxMakeWriter::new(std::io::stdout),
        ConsoleStream::Stderr => BoxMakeWriter::new(std::io::stderr),
    };
    let console_layer = fmt::layer()
        .with_writer(console_writer)
        .with_target(false)
        .with_ansi(true);

    let _ = tracing_subscriber::registry()
        .with(env_filter)
        .with(console_layer)
        .with(file_layer)
        .try_init();
}
