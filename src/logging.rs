//! Logging abstraction layer
//!
//! The router logs through these macros so the backend can be picked at
//! compile time without touching call sites.
//!
//! # Features
//!
//! - `log` (default) - forwards to the `log` facade
//! - `tracing` - forwards to `tracing` events
//!
//! The two features are meant to be mutually exclusive. With neither
//! enabled the macros expand to nothing.
//!
//! # Usage
//!
//! ```ignore
//! use shell_router::{debug_log, trace_log};
//!
//! trace_log!("matching segment {} of {}", index, segments.len());
//! debug_log!("redirect {} -> {}", from, to);
//! ```

/// Trace-level logging
///
/// Used for per-node matching detail.
#[macro_export]
macro_rules! trace_log {
    ($($arg:tt)*) => {
        #[cfg(feature = "tracing")]
        ::tracing::trace!($($arg)*);
        #[cfg(feature = "log")]
        ::log::trace!($($arg)*);
    };
}

/// Debug-level logging
///
/// Used for redirects and stack commits.
#[macro_export]
macro_rules! debug_log {
    ($($arg:tt)*) => {
        #[cfg(feature = "tracing")]
        ::tracing::debug!($($arg)*);
        #[cfg(feature = "log")]
        ::log::debug!($($arg)*);
    };
}

/// Info-level logging
#[macro_export]
macro_rules! info_log {
    ($($arg:tt)*) => {
        #[cfg(feature = "tracing")]
        ::tracing::info!($($arg)*);
        #[cfg(feature = "log")]
        ::log::info!($($arg)*);
    };
}

/// Warn-level logging
///
/// Failed resolutions are reported at this level.
#[macro_export]
macro_rules! warn_log {
    ($($arg:tt)*) => {
        #[cfg(feature = "tracing")]
        ::tracing::warn!($($arg)*);
        #[cfg(feature = "log")]
        ::log::warn!($($arg)*);
    };
}

/// Error-level logging
#[macro_export]
macro_rules! error_log {
    ($($arg:tt)*) => {
        #[cfg(feature = "tracing")]
        ::tracing::error!($($arg)*);
        #[cfg(feature = "log")]
        ::log::error!($($arg)*);
    };
}
