//! Takara's logging utilities, a thin shell over `tracing`.

use std::{
    str::FromStr,
    sync::atomic::{AtomicBool, Ordering},
};

use eyre::{eyre, Result};
use serde::{Deserialize, Serialize};
pub use tracing::{
    debug, debug_span, error, error_span, info, info_span, instrument as log, trace, trace_span,
    warn, warn_span,
};
use tracing_subscriber::fmt::format::FmtSpan;

/// Verbosity threshold of the logger.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Deserialize, Serialize,
)]
#[serde(rename_all = "UPPERCASE")]
pub enum Level {
    /// Everything, including per-instruction traces.
    Trace,
    /// Diagnostic details.
    Debug,
    /// Normal operation.
    #[default]
    Info,
    /// Suspicious but recoverable situations.
    Warn,
    /// Failures.
    Error,
}

impl FromStr for Level {
    type Err = eyre::Report;

    fn from_str(candidate: &str) -> Result<Self> {
        match candidate.to_ascii_uppercase().as_str() {
            "TRACE" => Ok(Self::Trace),
            "DEBUG" => Ok(Self::Debug),
            "INFO" => Ok(Self::Info),
            "WARN" => Ok(Self::Warn),
            "ERROR" => Ok(Self::Error),
            other => Err(eyre!("`{other}` is not a log level")),
        }
    }
}

impl From<Level> for tracing::Level {
    fn from(level: Level) -> Self {
        match level {
            Level::Trace => Self::TRACE,
            Level::Debug => Self::DEBUG,
            Level::Info => Self::INFO,
            Level::Warn => Self::WARN,
            Level::Error => Self::ERROR,
        }
    }
}

/// `Configuration` of the logging subsystem.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct Configuration {
    /// Verbosity threshold.
    pub max_log_level: Level,
    /// Use the compact line format instead of the full one.
    pub compact_mode: bool,
}

static LOGGER_SET: AtomicBool = AtomicBool::new(false);

fn try_set_logger() -> Result<()> {
    if LOGGER_SET
        .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
        .is_err()
    {
        return Err(eyre!("Logger is already set."));
    }
    Ok(())
}

/// Initialize the logger globally with the given [`Configuration`].
///
/// Works only once per process; all subsequent invocations fail.
///
/// For usage in tests consider [`init_test_logger`].
///
/// # Errors
/// If the logger is already set.
pub fn init_global(configuration: &Configuration) -> Result<()> {
    try_set_logger()?;

    let builder = tracing_subscriber::fmt()
        .with_max_level(tracing::Level::from(configuration.max_log_level))
        .with_span_events(FmtSpan::NONE);
    if configuration.compact_mode {
        builder.compact().try_init()
    } else {
        builder.try_init()
    }
    .map_err(|err| eyre!("Failed to install the global logger: {err}"))
}

/// Initialize a logger suitable for test binaries: verbose, writing
/// through the test capture, never failing when some other test got
/// there first.
pub fn init_test_logger() {
    let _result = tracing_subscriber::fmt()
        .with_max_level(tracing::Level::TRACE)
        .with_test_writer()
        .try_init();
}

/// The prelude re-exports the logging macros.
pub mod prelude {
    pub use super::{debug, error, info, trace, warn};
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn level_parses_case_insensitively() {
        assert_eq!("debug".parse::<Level>().expect("Valid"), Level::Debug);
        assert_eq!("ERROR".parse::<Level>().expect("Valid"), Level::Error);
        assert!("loud".parse::<Level>().is_err());
    }

    #[test]
    fn second_global_initialization_fails() {
        let configuration = Configuration::default();
        if init_global(&configuration).is_ok() {
            assert!(init_global(&configuration).is_err());
        }
    }
}
