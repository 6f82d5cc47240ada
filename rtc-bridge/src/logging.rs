//! Logging setup and the per-event diagnostics gate
//!
//! Internal warnings go through `tracing` unconditionally. The chatty
//! per-notification lines ("Connected to session: s1") go through
//! [`DiagnosticsGate`] instead, which the host toggles with `enable_logs`.
//! While the gate is closed those lines make no `tracing` calls at all.

use std::sync::atomic::{AtomicBool, Ordering};

use tracing_subscriber::{fmt, EnvFilter, Registry};

/// Target used by gated diagnostics
pub const DIAGNOSTICS_TARGET: &str = "rtc_bridge::diagnostics";

/// Logging mode for different hosts
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoggingMode {
    /// No subscriber installed; the host owns logging
    Silent,
    /// Compact stderr output
    Development,
    /// Verbose output with thread ids and source locations
    Debug,
}

/// Logging configuration error
#[derive(Debug, thiserror::Error)]
pub enum LoggingError {
    #[error("Failed to initialize tracing subscriber: {0}")]
    TracingInit(String),

    #[error("Invalid environment variable: {0}")]
    InvalidEnv(String),
}

/// Install a global `tracing` subscriber for `mode`
///
/// # Environment Variables
///
/// - `RTC_BRIDGE_LOG_LEVEL`: filter directive, e.g. `rtc_bridge=debug`
/// - `RUST_LOG`: used when `RTC_BRIDGE_LOG_LEVEL` is unset
pub fn init_logging(mode: LoggingMode) -> Result<(), LoggingError> {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

    match mode {
        LoggingMode::Silent => Ok(()),
        LoggingMode::Development => {
            let filter = create_env_filter("info")?;

            Registry::default()
                .with(
                    fmt::layer()
                        .with_target(false)
                        .with_thread_names(true)
                        .compact(),
                )
                .with(filter)
                .try_init()
                .map_err(|e| LoggingError::TracingInit(e.to_string()))
        }
        LoggingMode::Debug => {
            let filter = create_env_filter("debug")?;

            Registry::default()
                .with(
                    fmt::layer()
                        .pretty()
                        .with_thread_ids(true)
                        .with_thread_names(true)
                        .with_file(true)
                        .with_line_number(true),
                )
                .with(filter)
                .try_init()
                .map_err(|e| LoggingError::TracingInit(e.to_string()))
        }
    }
}

/// Initialize logging from `RTC_BRIDGE_LOG_MODE`
///
/// `"development"` and `"debug"` select those modes; anything else, including
/// an unset variable, is `Silent`.
pub fn init_logging_from_env() -> Result<(), LoggingError> {
    let mode = match std::env::var("RTC_BRIDGE_LOG_MODE").as_deref() {
        Ok("development") => LoggingMode::Development,
        Ok("debug") => LoggingMode::Debug,
        _ => LoggingMode::Silent,
    };

    init_logging(mode)
}

fn create_env_filter(default_level: &str) -> Result<EnvFilter, LoggingError> {
    let directives = std::env::var("RTC_BRIDGE_LOG_LEVEL")
        .or_else(|_| std::env::var("RUST_LOG"))
        .unwrap_or_else(|_| default_level.to_string());

    EnvFilter::try_new(&directives)
        .map_err(|e| LoggingError::InvalidEnv(format!("{}: {}", directives, e)))
}

/// Check if a global subscriber has been installed
pub fn is_initialized() -> bool {
    tracing::dispatcher::has_been_set()
}

/// Runtime switch for per-event diagnostics
#[derive(Debug, Default)]
pub struct DiagnosticsGate {
    enabled: AtomicBool,
}

impl DiagnosticsGate {
    pub fn new(enabled: bool) -> Self {
        Self {
            enabled: AtomicBool::new(enabled),
        }
    }

    pub fn set_enabled(&self, enabled: bool) {
        self.enabled.store(enabled, Ordering::Relaxed);
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled.load(Ordering::Relaxed)
    }
}

/// Log a diagnostics line when the context's gate is open
macro_rules! diag {
    ($gate:expr, $($arg:tt)+) => {
        if $gate.is_enabled() {
            tracing::info!(target: $crate::logging::DIAGNOSTICS_TARGET, $($arg)+);
        }
    };
}

pub(crate) use diag;
