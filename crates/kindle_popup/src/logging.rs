//! Logger setup for the command-line client.
//!
//! Output goes to the terminal unless `--log-file` is given. Only warnings
//! and errors are shown by default so they do not drown the rendered popup.

use std::path::Path;

use kindle_logging::LogDestination;
use log::LevelFilter;

pub fn initialize(log_file: Option<&Path>, verbose: bool) {
    let level = if verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Warn
    };
    let destination = match log_file {
        Some(path) => LogDestination::File(path.to_path_buf()),
        None => LogDestination::Terminal,
    };
    kindle_logging::initialize(destination, level);
}
