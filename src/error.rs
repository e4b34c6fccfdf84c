//! Error handling for the router
//!
//! Resolution failures (`NoMatch`, `RedirectLoop`, `TooManyRedirects`) are
//! carried inside a [`RouteMatchList`](crate::RouteMatchList) and become
//! representable destinations. Named-route and tree-construction failures are
//! returned to the caller directly.

use crate::state::RouterState;
use std::sync::Arc;
use thiserror::Error;

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, RouterError>;

/// Errors produced while building the tree, resolving names or matching locations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RouterError {
    /// No path through the tree consumes every segment of the location
    #[error("no route matches location: {location}")]
    NoMatch { location: String },

    /// A redirect target was produced twice within one resolution
    #[error("redirect loop detected: {location} has already been visited (visited: {visited:?})")]
    RedirectLoop {
        location: String,
        visited: Vec<String>,
    },

    /// The redirect hop counter exceeded the configured maximum
    #[error("too many redirects (max={max}), last location: {location}")]
    TooManyRedirects { max: usize, location: String },

    /// `resolve`/`go_named`/`push_named` was given an unknown name
    #[error("unknown route name: '{name}'")]
    MissingNamedRoute { name: String },

    /// Required `:token`s were not supplied
    #[error("missing path parameters for route '{name}': {missing:?}")]
    MissingPathParameter { name: String, missing: Vec<String> },

    /// Two routes in the tree share a name
    #[error("duplicate route name: '{name}'")]
    DuplicateRouteName { name: String },

    /// A route path pattern failed validation
    #[error("invalid route path '{path}': {reason}")]
    InvalidRoutePath { path: String, reason: String },
}

impl RouterError {
    /// Whether this error comes out of the matcher / redirect pipeline
    /// (as opposed to a synchronous API misuse).
    pub fn is_resolution_error(&self) -> bool {
        matches!(
            self,
            RouterError::NoMatch { .. }
                | RouterError::RedirectLoop { .. }
                | RouterError::TooManyRedirects { .. }
        )
    }
}

// ============================================================================
// Navigation Result Types
// ============================================================================

/// Result of a navigation attempt
///
/// The stack policy is applied before this is returned; an `Error` result
/// may still have pushed an error destination (see [`RouterBuilder::on_exception`](crate::RouterBuilder::on_exception)).
#[derive(Debug, Clone, PartialEq)]
pub enum NavigationResult {
    /// The resolved entry was committed
    Success { location: String },
    /// Resolution failed
    Error(RouterError),
}

impl NavigationResult {
    /// Check if navigation was successful
    pub fn is_success(&self) -> bool {
        matches!(self, NavigationResult::Success { .. })
    }

    /// Check if there was an error
    pub fn is_error(&self) -> bool {
        matches!(self, NavigationResult::Error(_))
    }

    /// Get the error, if any
    pub fn error(&self) -> Option<&RouterError> {
        match self {
            NavigationResult::Error(error) => Some(error),
            NavigationResult::Success { .. } => None,
        }
    }
}

// ============================================================================
// Error Handler
// ============================================================================

/// Hook receiving failed resolutions instead of having them pushed as entries
pub type ErrorHandler = Arc<dyn Fn(&RouterState) + Send + Sync>;
