use std::io::{self, IsTerminal};

use tracing::Level;

/// Most verbose level compiled into this build. Errors are always shown; the
/// `verbose` feature adds the step-by-step trace.
pub const MAX_LEVEL: Level = if cfg!(feature = "verbose") {
    Level::TRACE
} else {
    Level::ERROR
};

/// Install the stderr subscriber. Call once, before the launch starts.
/// Colour is only used when stderr is a terminal.
pub fn init() {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_ansi(io::stderr().is_terminal())
        .with_max_level(MAX_LEVEL)
        .with_target(false)
        .without_time()
        .init();
}
