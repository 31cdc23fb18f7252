// SPDX-FileCopyrightText: 2025 Caspar Water Company
//
// SPDX-License-Identifier: Apache-2.0

//! Structured logging for the vitrine workspace.
//!
//! Usage:
//! - Set VITRINE_LOG=off (default) - no logs
//! - Set VITRINE_LOG=info - fetches, section summaries
//! - Set VITRINE_LOG=debug - every request URL, page counts, fallbacks

use std::sync::Once;

// Re-export emit so macros can use it
pub use emit;

/// Environment variable holding the log level.
pub const LOG_ENV: &str = "VITRINE_LOG";

static INIT: Once = Once::new();

/// How much the process logs to stderr.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verbosity {
    Off,
    Error,
    Warn,
    Info,
    Debug,
}

impl Verbosity {
    /// Parse a `VITRINE_LOG` value. Case and surrounding blanks are ignored.
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "off" | "" => Some(Verbosity::Off),
            "error" => Some(Verbosity::Error),
            "warn" | "warning" => Some(Verbosity::Warn),
            "info" => Some(Verbosity::Info),
            "debug" | "trace" => Some(Verbosity::Debug),
            _ => None,
        }
    }

    fn min_level(self) -> Option<emit::Level> {
        match self {
            Verbosity::Off => None,
            Verbosity::Error => Some(emit::Level::Error),
            Verbosity::Warn => Some(emit::Level::Warn),
            Verbosity::Info => Some(emit::Level::Info),
            Verbosity::Debug => Some(emit::Level::Debug),
        }
    }
}

/// Initialize diagnostics from `VITRINE_LOG`, logging nothing when unset.
pub fn init_diagnostics() {
    init_with_default(Verbosity::Off);
}

/// Initialize diagnostics from `VITRINE_LOG`, using `default` when unset.
///
/// Only the first call in a process has any effect.
pub fn init_with_default(default: Verbosity) {
    INIT.call_once(|| {
        let verbosity = match std::env::var(LOG_ENV) {
            Ok(raw) => match Verbosity::parse(&raw) {
                Some(v) => v,
                None => {
                    // Bootstrap warning: no emitter exists yet
                    eprintln!("Warning: Unknown {} value '{}', using 'info'", LOG_ENV, raw);
                    Verbosity::Info
                }
            },
            Err(_) => default,
        };

        let Some(level) = verbosity.min_level() else {
            return;
        };

        let rt = emit::setup()
            .emit_to(emit_term::stderr())
            .emit_when(emit::level::min_filter(level))
            .init();

        // The runtime lives for the whole process
        std::mem::forget(rt);
    });
}

/// Log basic operations (fetches, section summaries, files written)
#[macro_export]
macro_rules! log_info {
    ($($arg:tt)*) => {
        $crate::emit::info!($($arg)*)
    };
}

/// Log detailed diagnostics (request URLs, page counts, fallback strategies)
#[macro_export]
macro_rules! log_debug {
    ($($arg:tt)*) => {
        $crate::emit::debug!($($arg)*)
    };
}

/// Log recoverable problems (skipped sections, unusable media)
#[macro_export]
macro_rules! log_warn {
    ($($arg:tt)*) => {
        $crate::emit::warn!($($arg)*)
    };
}

/// Log failures that end an operation
#[macro_export]
macro_rules! log_error {
    ($($arg:tt)*) => {
        $crate::emit::error!($($arg)*)
    };
}

#[macro_export]
macro_rules! info {
    ($($arg:tt)*) => {
        $crate::emit::info!($($arg)*)
    };
}

#[macro_export]
macro_rules! debug {
    ($($arg:tt)*) => {
        $crate::emit::debug!($($arg)*)
    };
}

#[macro_export]
macro_rules! warn {
    ($($arg:tt)*) => {
        $crate::emit::warn!($($arg)*)
    };
}

#[macro_export]
macro_rules! error {
    ($($arg:tt)*) => {
        $crate::emit::error!($($arg)*)
    };
}

pub use init_diagnostics as init;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_levels() {
        assert_eq!(Verbosity::parse("off"), Some(Verbosity::Off));
        assert_eq!(Verbosity::parse(""), Some(Verbosity::Off));
        assert_eq!(Verbosity::parse(" DEBUG "), Some(Verbosity::Debug));
        assert_eq!(Verbosity::parse("warning"), Some(Verbosity::Warn));
        assert_eq!(Verbosity::parse("loud"), None);
    }

    #[test]
    fn test_off_has_no_level() {
        assert!(Verbosity::Off.min_level().is_none());
        assert_eq!(Verbosity::Info.min_level(), Some(emit::Level::Info));
    }

    #[test]
    fn test_init_is_safe_to_call_multiple_times() {
        init_diagnostics();
        init_with_default(Verbosity::Debug);
        init_diagnostics();
    }

    #[test]
    fn test_macros_compile() {
        log_info!("Test message");
        log_debug!("Debug message with {value}", value: 42);
        info!("Fetched {count} items", count: 3);
        warn!("Section {name} skipped", name: "products");
    }
}
