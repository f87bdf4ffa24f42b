#![forbid(unsafe_code)]

//! Logging and tracing support.
//!
//! With the `tracing` feature the usual tracing macros are re-exported here
//! (and at the crate root). Without it, no-op macros with the same names keep
//! call sites compiling at zero cost.
//!
//! The `tracing-json` feature adds [`init_json_logging`], which installs a JSON
//! formatter filtered by the `CAUSEBOARD_LOG` environment variable. Hosts that
//! run inside a browser normally install their own subscriber instead.

#[cfg(feature = "tracing")]
pub use tracing::{debug, debug_span, error, info, trace, warn};

/// Environment variable read by [`init_json_logging`].
pub const LOG_ENV_VAR: &str = "CAUSEBOARD_LOG";

#[cfg(not(feature = "tracing"))]
mod noop_macros {
    /// No-op debug macro when tracing is disabled.
    #[macro_export]
    macro_rules! debug {
        ($($arg:tt)*) => {};
    }

    /// No-op info macro when tracing is disabled.
    #[macro_export]
    macro_rules! info {
        ($($arg:tt)*) => {};
    }

    /// No-op warn macro when tracing is disabled.
    #[macro_export]
    macro_rules! warn {
        ($($arg:tt)*) => {};
    }

    /// No-op error macro when tracing is disabled.
    #[macro_export]
    macro_rules! error {
        ($($arg:tt)*) => {};
    }

    /// No-op trace macro when tracing is disabled.
    #[macro_export]
    macro_rules! trace {
        ($($arg:tt)*) => {};
    }

    /// No-op debug_span macro when tracing is disabled.
    #[macro_export]
    macro_rules! debug_span {
        ($($arg:tt)*) => {
            $crate::logging::NoopSpan
        };
    }
}

/// A no-op span guard for when tracing is disabled.
#[cfg(not(feature = "tracing"))]
pub struct NoopSpan;

#[cfg(not(feature = "tracing"))]
impl NoopSpan {
    /// Enter the no-op span (does nothing).
    pub fn enter(&self) -> NoopGuard {
        NoopGuard
    }
}

/// A no-op span guard.
#[cfg(not(feature = "tracing"))]
pub struct NoopGuard;

/// Failure to install the global JSON subscriber.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoggingError {
    /// A global subscriber was already installed.
    AlreadyInitialized(String),
}

impl core::fmt::Display for LoggingError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::AlreadyInitialized(msg) => write!(f, "logging already initialized: {msg}"),
        }
    }
}

impl std::error::Error for LoggingError {}

/// Install a global JSON subscriber.
///
/// The filter comes from [`LOG_ENV_VAR`] when set and parseable, otherwise
/// from `default_directive` (for example `"causeboard=info"`).
#[cfg(feature = "tracing-json")]
pub fn init_json_logging(default_directive: &str) -> Result<(), LoggingError> {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_env(LOG_ENV_VAR)
        .unwrap_or_else(|_| EnvFilter::new(default_directive));
    tracing_subscriber::fmt()
        .json()
        .with_env_filter(filter)
        .with_target(true)
        .try_init()
        .map_err(|err| LoggingError::AlreadyInitialized(err.to_string()))
}
