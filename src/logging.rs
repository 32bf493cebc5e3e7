//! Logging abstraction layer
//!
//! Every record emitted by this crate goes through the macros below so the
//! backend can be picked at compile time and filtered by a single target,
//! [`LOG_TARGET`].
//!
//! # Features
//!
//! - `log` (default) - Uses the standard `log` crate
//! - `tracing` - Uses the `tracing` crate for structured logging
//!
//! Choose one feature at compile time. They are mutually exclusive.
//!
//! # Usage
//!
//! ```ignore
//! use route_navigation::{debug_log, trace_log};
//!
//! trace_log!("visiting node {:?}", node.label());
//! debug_log!("injected route '{}' into {} nodes", name, count);
//! ```
//!
//! With `env_logger`, enable the output with
//! `RUST_LOG=route_navigation=trace`.

/// Target attached to every log record emitted by this crate.
pub const LOG_TARGET: &str = "route_navigation";

/// Trace-level logging: per-node traversal and cache lookups.
#[macro_export]
macro_rules! trace_log {
    ($($arg:tt)*) => {
        #[cfg(feature = "tracing")]
        ::tracing::trace!(target: "route_navigation", $($arg)*);
        #[cfg(feature = "log")]
        ::log::trace!(target: "route_navigation", $($arg)*);
    };
}

/// Debug-level logging: per-request and per-build events.
#[macro_export]
macro_rules! debug_log {
    ($($arg:tt)*) => {
        #[cfg(feature = "tracing")]
        ::tracing::debug!(target: "route_navigation", $($arg)*);
        #[cfg(feature = "log")]
        ::log::debug!(target: "route_navigation", $($arg)*);
    };
}

/// Info-level logging.
#[macro_export]
macro_rules! info_log {
    ($($arg:tt)*) => {
        #[cfg(feature = "tracing")]
        ::tracing::info!(target: "route_navigation", $($arg)*);
        #[cfg(feature = "log")]
        ::log::info!(target: "route_navigation", $($arg)*);
    };
}

/// Warn-level logging: recoverable misconfiguration.
#[macro_export]
macro_rules! warn_log {
    ($($arg:tt)*) => {
        #[cfg(feature = "tracing")]
        ::tracing::warn!(target: "route_navigation", $($arg)*);
        #[cfg(feature = "log")]
        ::log::warn!(target: "route_navigation", $($arg)*);
    };
}

/// Error-level logging.
#[macro_export]
macro_rules! error_log {
    ($($arg:tt)*) => {
        #[cfg(feature = "tracing")]
        ::tracing::error!(target: "route_navigation", $($arg)*);
        #[cfg(feature = "log")]
        ::log::error!(target: "route_navigation", $($arg)*);
    };
}
