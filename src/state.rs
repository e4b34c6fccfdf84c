//! Router state view
//!
//! [`RouterState`] is the read-only snapshot of a resolved location that
//! redirect hooks, exit guards and error handlers receive.

use crate::params::{QueryParams, RouteParams};
use crate::{Extra, RouterError};
use std::any::Any;

/// Snapshot of a resolved (or failed) location
#[derive(Debug, Clone, Default)]
pub struct RouterState {
    /// The requested location, as given
    pub uri: String,
    /// The leaf route's own path pattern (e.g. `:id`)
    pub path: String,
    /// Concrete location consumed by the leaf (e.g. `/42`)
    pub matched_location: String,
    /// Leaf route name
    pub name: Option<String>,
    /// Path parameters merged over the whole chain, deeper wins
    pub path_params: RouteParams,
    /// Decoded query parameters
    pub query_params: QueryParams,
    /// Navigation payload
    pub extra: Option<Extra>,
    /// Resolution error, if any
    pub error: Option<RouterError>,
    /// Cumulative concrete location up to the leaf (e.g. `/users/42`)
    pub full_path: String,
}

impl RouterState {
    /// Get a path parameter by name
    pub fn path_param(&self, name: &str) -> Option<&str> {
        self.path_params.get(name)
    }

    /// Get the first value of a query parameter
    pub fn query_param(&self, name: &str) -> Option<&str> {
        self.query_params.get(name)
    }

    /// Downcast the payload
    pub fn extra_as<T: Any + Send + Sync>(&self) -> Option<&T> {
        self.extra.as_deref()?.downcast_ref::<T>()
    }

    pub fn is_error(&self) -> bool {
        self.error.is_some()
    }
}
