//! # Shell Router
//!
//! A declarative tree router with:
//!
//! - **Route Tree** - Routes, shells and stateful shells described as plain data
//! - **Matching** - Literal, `:param` and `*` segments, depth-first with backtracking
//! - **Named Routes** - Navigate by name with percent-encoded parameters
//! - **Redirects** - Global and per-route async hooks with loop detection
//! - **Shell-aware Stacks** - `go` prunes within a tab, `push` always appends
//! - **Restoration** - Rebuild the stacks from saved location strings
//! - **Observers** - Navigation events for logging and analytics
//!
//! Rendering is left to the embedding UI: the router exposes the ordered
//! match lists and the opaque builder references attached to routes.
//!
//! # Quick Start
//!
//! ```
//! use shell_router::{QueryParams, Route, RouteParams, Router, ShellRoute};
//!
//! # pollster::block_on(async {
//! let mut router = Router::new(vec![
//!     Route::new("/").name("home").into(),
//!     ShellRoute::new()
//!         .route(
//!             Route::new("/users")
//!                 .name("users")
//!                 .route(Route::new(":id").name("user-profile")),
//!         )
//!         .route(Route::new("/settings").name("settings"))
//!         .into(),
//! ])
//! .unwrap();
//!
//! router.initialize().await;
//! router.go("/users").await;
//!
//! let params = RouteParams::new().with("id", "42");
//! router
//!     .push_named("user-profile", &params, &QueryParams::new())
//!     .await
//!     .unwrap();
//!
//! assert_eq!(router.current_state().path_param("id"), Some("42"));
//! assert!(router.pop());
//! # });
//! ```
//!
//! # Redirects
//!
//! Hooks receive a [`NavigationContext`] instead of reading global state:
//!
//! ```
//! use shell_router::{redirect_fn, Route, Router};
//!
//! struct SignedIn(bool);
//!
//! # pollster::block_on(async {
//! let mut router = Router::builder(vec![
//!     Route::new("/").into(),
//!     Route::new("/login").into(),
//! ])
//! .redirect(redirect_fn(|cx, state| {
//!     let signed_in = cx.get::<SignedIn>().is_some_and(|s| s.0);
//!     let on_login = state.matched_location == "/login";
//!     async move { (!signed_in && !on_login).then(|| "/login".to_string()) }
//! }))
//! .build()
//! .unwrap();
//!
//! router.go("/").await;
//! assert_eq!(router.current_state().uri, "/login");
//!
//! router.context_mut().insert(SignedIn(true));
//! router.go("/").await;
//! assert_eq!(router.current_state().uri, "/");
//! # });
//! ```
//!
//! # Feature Flags
//!
//! - `log` (default) - Uses the standard `log` crate for logging
//! - `tracing` - Uses the `tracing` crate for structured logging (mutually exclusive with `log`)
//! - `cache` (default) - LRU cache of match results
//! - `transition` (default) - Per-route transition metadata

#![cfg_attr(docsrs, feature(doc_cfg))]
// Lints are configured in Cargo.toml [lints] section

// Logging abstraction
pub mod logging;

// Cache (optional)
#[cfg(feature = "cache")]
pub mod cache;

// Route tree
pub mod nested;
pub mod route;
pub mod tree;

// Resolution
pub mod matcher;
pub mod named;
pub mod params;
pub mod redirect;
pub mod state;

// Error handling
pub mod error;

// Hooks
pub mod context;
pub mod lifecycle;
pub mod observer;

// Navigation
pub mod history;
pub mod router;

// Transitions
#[cfg(feature = "transition")]
pub mod transition;

// Re-export main types for convenient access
#[cfg(feature = "cache")]
pub use cache::{CacheStats, MatchCache};
pub use context::NavigationContext;
pub use error::{ErrorHandler, NavigationResult, Result, RouterError};
pub use history::{LocationEntry, NavigationStack};
pub use lifecycle::{exit_fn, BoxedExit, RouteExit};
pub use matcher::{RouteMatch, RouteMatchList, RouteMatcher, RoutePattern, Segment};
pub use named::NamedRouteResolver;
pub use nested::join_route_path;
pub use observer::{
    observer_fn, BoxedObserver, CompositeObserver, LoggingObserver, NavigationEvent,
    NavigationObserver, NavigationType,
};
pub use params::{QueryParams, RouteParams};
pub use redirect::{redirect_fn, BoxedRedirect, RouteRedirect, DEFAULT_MAX_REDIRECTS};
pub use route::{
    validate_route_path, BuilderRef, Route, RouteBase, RouteRef, ShellBranch, ShellRoute,
    StatefulShellRoute,
};
pub use router::{Router, RouterBuilder};
pub use state::RouterState;
#[cfg(feature = "transition")]
pub use transition::{SlideDirection, Transition};
pub use tree::{NodeKind, RouteId, RouteTree, TreeNode};

use std::any::Any;
use std::sync::Arc;

/// Opaque navigation payload.
///
/// Carried through matching and redirects, stored next to the location it
/// was pushed with, and retrieved by downcast (see [`RouterState::extra_as`]).
pub type Extra = Arc<dyn Any + Send + Sync>;
