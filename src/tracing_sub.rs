use std::io::{self, Write};

use tracing::Level;

use crate::debug_log::global_debug_log;

/// Destination for one formatted record: the global debug log when one is
/// registered, otherwise stderr.
pub fn log_writer() -> Box<dyn Write> {
    match global_debug_log() {
        Some(handle) => Box::new(handle.writer()),
        None => Box::new(io::stderr()),
    }
}

/// Install a plain-text subscriber at `level`. Later calls are no-ops.
pub fn init(level: Level) {
    let _ = tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(log_writer)
        .with_target(false)
        .with_ansi(false)
        .without_time()
        .try_init();
}
