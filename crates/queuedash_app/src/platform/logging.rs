//! Where the `queuedash` binary sends its log.
//!
//! The dashboard owns the terminal while it runs, so the log file is the
//! default. Stderr output is meant to be redirected.

use std::fs::File;
use std::path::Path;

use log::LevelFilter;
use serde::{Deserialize, Serialize};
use simplelog::{
    ColorChoice, CombinedLogger, Config, ConfigBuilder, SharedLogger, TermLogger, TerminalMode,
    WriteLogger,
};

const LEVEL: LevelFilter = LevelFilter::Info;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
pub enum LogDestination {
    /// `log_file` from the configuration.
    #[default]
    File,
    /// Stderr.
    Terminal,
    /// `log_file` and stderr.
    Both,
}

/// Installs the process logger at info level. `log_path` is recreated on every
/// run; if it cannot be opened, `File` logs nowhere and `Both` keeps stderr.
pub fn initialize(destination: LogDestination, log_path: &Path) {
    let config = build_config();
    let mut loggers: Vec<Box<dyn SharedLogger>> = Vec::new();
    if matches!(destination, LogDestination::Terminal | LogDestination::Both) {
        loggers.push(terminal_logger(LEVEL, config.clone()));
    }
    if matches!(destination, LogDestination::File | LogDestination::Both) {
        loggers.extend(create_file_logger(LEVEL, config, log_path));
    }
    if !loggers.is_empty() {
        let _ = CombinedLogger::init(loggers);
    }
}

/// RFC 3339 timestamps; the target module is only printed on errors.
fn build_config() -> Config {
    ConfigBuilder::new()
        .set_time_format_rfc3339()
        .set_target_level(LevelFilter::Error)
        .build()
}

fn terminal_logger(level: LevelFilter, config: Config) -> Box<dyn SharedLogger> {
    TermLogger::new(level, config, TerminalMode::Stderr, ColorChoice::Auto)
}

fn create_file_logger(
    level: LevelFilter,
    config: Config,
    log_path: &Path,
) -> Option<Box<dyn SharedLogger>> {
    match File::create(log_path) {
        Ok(file) => Some(WriteLogger::new(level, config, file)),
        Err(err) => {
            eprintln!("queuedash: cannot open log file {}: {}", log_path.display(), err);
            None
        }
    }
}
