//! ---
//! omb_section: "03-persistence-logging"
//! omb_subsection: "module"
//! omb_type: "source"
//! omb_scope: "code"
//! omb_description: "Structured logging setup and sinks."
//! omb_version: "v0.0.0-prealpha"
//! omb_owner: "tbd"
//! ---
#![warn(missing_docs)]

use std::io;

use tracing::Level;
use tracing_subscriber::{fmt as subscriber_fmt, prelude::*, EnvFilter, Registry};

/// Where step and progress logging is routed for the lifetime of the
/// process. Chosen once at startup; the engine never branches on it again.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogSink {
    /// Forward log lines to standard output.
    #[default]
    Stdout,
    /// Discard all log lines (the `--quiet` mode).
    Discard,
}

impl LogSink {
    /// Map the CLI quiet flag onto a sink selection.
    pub fn from_quiet(quiet: bool) -> Self {
        if quiet {
            LogSink::Discard
        } else {
            LogSink::Stdout
        }
    }
}

/// Initialize the tracing subscriber for a command invocation.
///
/// Honours `RUST_LOG` when set, defaulting to `info`. Initialization is
/// idempotent so tests can call it repeatedly.
pub fn init(sink: LogSink) {
    let filter = EnvFilter::from_default_env().add_directive(Level::INFO.into());
    let registry = Registry::default().with(filter);
    match sink {
        LogSink::Stdout => {
            let _ = registry
                .with(subscriber_fmt::layer().with_writer(io::stdout))
                .try_init();
        }
        LogSink::Discard => {
            let _ = registry
                .with(subscriber_fmt::layer().with_writer(io::sink))
                .try_init();
        }
    }
}
