#![deny(missing_docs)]
//! `dash_*` log macros for every queuedash crate.
//!
//! Callers only depend on this crate; the macros reach `log` through a hidden
//! re-export. The poll tick counter lets a log line be matched to the refresh
//! cycle that produced it.

use std::sync::atomic::{AtomicU64, Ordering};

#[doc(hidden)]
pub use log;

static POLL_TICK: AtomicU64 = AtomicU64::new(0);

/// Stores the number of the refresh cycle now running.
pub fn set_poll_tick(tick: u64) {
    POLL_TICK.store(tick, Ordering::Relaxed);
}

/// Refresh cycle last stored with [`set_poll_tick`], or 0 before polling starts.
pub fn poll_tick() -> u64 {
    POLL_TICK.load(Ordering::Relaxed)
}

/// `log::trace!` for queuedash crates.
#[macro_export]
macro_rules! dash_trace {
    ($($arg:tt)*) => {{
        $crate::log::trace!($($arg)*);
    }};
}

/// `log::debug!` for queuedash crates.
#[macro_export]
macro_rules! dash_debug {
    ($($arg:tt)*) => {{
        $crate::log::debug!($($arg)*);
    }};
}

/// `log::info!` for queuedash crates.
#[macro_export]
macro_rules! dash_info {
    ($($arg:tt)*) => {{
        $crate::log::info!($($arg)*);
    }};
}

/// `log::warn!` for queuedash crates.
#[macro_export]
macro_rules! dash_warn {
    ($($arg:tt)*) => {{
        $crate::log::warn!($($arg)*);
    }};
}

/// `log::error!` for queuedash crates.
#[macro_export]
macro_rules! dash_error {
    ($($arg:tt)*) => {{
        $crate::log::error!($($arg)*);
    }};
}

/// Sends log output of integration tests to the terminal.
///
/// Safe to call from every test; only the first call installs a logger.
pub fn initialize_for_tests() {
    use simplelog::{ColorChoice, CombinedLogger, Config, TermLogger, TerminalMode};

    let level = if cfg!(debug_assertions) {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Info
    };

    let _ = CombinedLogger::init(vec![TermLogger::new(
        level,
        Config::default(),
        TerminalMode::Mixed,
        ColorChoice::Auto,
    )]);
}
