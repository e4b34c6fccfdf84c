//! Route tree declarations
//!
//! The tree is plain data: [`Route`] nodes consume path segments,
//! [`ShellRoute`] nodes wrap their children in persistent chrome without
//! consuming anything, and [`StatefulShellRoute`] nodes group several
//! [`ShellBranch`] sub-trees. Render references and transition metadata are
//! carried through untouched.

use crate::error::RouterError;
use crate::lifecycle::{BoxedExit, RouteExit};
use crate::redirect::{BoxedRedirect, RouteRedirect};
#[cfg(feature = "transition")]
use crate::transition::Transition;
use std::any::Any;
use std::collections::HashSet;
use std::fmt;
use std::sync::Arc;

/// Opaque render reference attached to a route or shell.
///
/// The router never calls it; the rendering layer downcasts it back to
/// whatever it registered.
pub type BuilderRef = Arc<dyn Any + Send + Sync>;

/// Shared route handle.
///
/// Routes contain non-cloneable hooks, so tree nodes are shared through `Arc`.
pub type RouteRef = Arc<Route>;

// ============================================================================
// Route Validation
// ============================================================================

/// Validate a route path pattern
///
/// # Validation Rules
///
/// - Path can be empty or `/` (root / index routes)
/// - A leading `/` makes the path absolute, otherwise it is relative to the parent
/// - No consecutive slashes (`//`)
/// - Trailing slashes are allowed (normalized during matching)
/// - Parameter names must be non-empty; any characters other than `/` are allowed
/// - No duplicate parameter names within one path
pub fn validate_route_path(path: &str) -> Result<(), String> {
    if path.is_empty() {
        return Ok(());
    }

    if path.contains("//") {
        return Err("Route path cannot contain consecutive slashes".to_string());
    }

    let mut param_names = HashSet::new();
    for segment in path.split('/') {
        if let Some(param) = segment.strip_prefix(':') {
            if param.is_empty() {
                return Err("Route parameter name cannot be empty".to_string());
            }

            if !param_names.insert(param) {
                return Err(format!("Duplicate route parameter: '{}'", param));
            }
        }
    }

    Ok(())
}

// ============================================================================
// Route
// ============================================================================

/// A navigable route: consumes path segments and owns render content.
///
/// # Example
///
/// ```
/// use shell_router::{Route, RouteBase};
///
/// let users: RouteBase = Route::new("/users")
///     .name("users")
///     .route(Route::new(":id").name("user-profile"))
///     .into();
/// # let _ = users;
/// ```
#[derive(Clone)]
pub struct Route {
    /// Path pattern (`/users`, `:id`, `files/*`)
    pub path: String,
    /// Unique name for named navigation
    pub name: Option<String>,
    /// Opaque render reference
    pub builder: Option<BuilderRef>,
    /// Per-route redirect hook, consulted when this route is the leaf
    pub redirect: Option<BoxedRedirect>,
    /// Exit guard, consulted by [`Router::maybe_pop`](crate::Router::maybe_pop)
    pub on_exit: Option<BoxedExit>,
    /// Transition metadata handed to the renderer
    #[cfg(feature = "transition")]
    pub transition: Option<Transition>,
    /// Child nodes
    pub routes: Vec<RouteBase>,
}

impl Route {
    /// Create a route with path validation
    ///
    /// # Panics
    ///
    /// Panics if the path is invalid. Use [`Route::try_new`] for non-panicking validation.
    pub fn new(path: impl Into<String>) -> Self {
        let path = path.into();
        if let Err(e) = validate_route_path(&path) {
            panic!("Invalid route path '{}': {}", path, e);
        }
        Self::unchecked(path)
    }

    /// Create a route, returning an error for an invalid path
    pub fn try_new(path: impl Into<String>) -> Result<Self, RouterError> {
        let path = path.into();
        validate_route_path(&path)
            .map_err(|reason| RouterError::InvalidRoutePath {
                path: path.clone(),
                reason,
            })
            .map(|()| Self::unchecked(path))
    }

    fn unchecked(path: String) -> Self {
        Self {
            path,
            name: None,
            builder: None,
            redirect: None,
            on_exit: None,
            #[cfg(feature = "transition")]
            transition: None,
            routes: Vec::new(),
        }
    }

    /// Set route name
    ///
    /// Named routes can be navigated to with `go_named` / `push_named`.
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Attach an opaque render reference
    pub fn builder<T: Any + Send + Sync>(mut self, builder: T) -> Self {
        self.builder = Some(Arc::new(builder));
        self
    }

    /// Set the redirect hook for this route
    ///
    /// ```
    /// use shell_router::{redirect_fn, Route};
    ///
    /// Route::new("/old").redirect(redirect_fn(|_cx, _state| async {
    ///     Some("/new".to_string())
    /// }));
    /// ```
    pub fn redirect<R: RouteRedirect>(mut self, redirect: R) -> Self {
        self.redirect = Some(crate::redirect::boxed(redirect));
        self
    }

    /// Set the exit guard for this route
    pub fn on_exit<E: RouteExit>(mut self, on_exit: E) -> Self {
        self.on_exit = Some(crate::lifecycle::boxed(on_exit));
        self
    }

    /// Set the transition metadata for this route
    #[cfg(feature = "transition")]
    pub fn transition(mut self, transition: Transition) -> Self {
        self.transition = Some(transition);
        self
    }

    /// Replace the child nodes
    pub fn routes(mut self, routes: Vec<RouteBase>) -> Self {
        self.routes = routes;
        self
    }

    /// Add a single child node
    pub fn route(mut self, route: impl Into<RouteBase>) -> Self {
        self.routes.push(route.into());
        self
    }

    /// Downcast the render reference
    pub fn builder_as<T: Any + Send + Sync>(&self) -> Option<&T> {
        self.builder.as_deref()?.downcast_ref::<T>()
    }

    /// Whether the path is absolute (starts with `/`)
    pub fn is_absolute(&self) -> bool {
        self.path.starts_with('/')
    }
}

impl fmt::Debug for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Route")
            .field("path", &self.path)
            .field("name", &self.name)
            .field("builder", &self.builder.is_some())
            .field("redirect", &self.redirect.is_some())
            .field("on_exit", &self.on_exit.is_some())
            .field("routes", &self.routes.len())
            .finish()
    }
}

// ============================================================================
// Shells
// ============================================================================

/// Wraps its children in persistent chrome; consumes no path segments.
#[derive(Clone, Default)]
pub struct ShellRoute {
    /// Opaque render reference for the chrome
    pub builder: Option<BuilderRef>,
    /// Child nodes, each a tab root when it is a [`Route`]
    pub routes: Vec<RouteBase>,
}

impl ShellRoute {
    pub fn new() -> Self {
        Self::default()
    }

    /// Attach an opaque render reference
    pub fn builder<T: Any + Send + Sync>(mut self, builder: T) -> Self {
        self.builder = Some(Arc::new(builder));
        self
    }

    /// Replace the child nodes
    pub fn routes(mut self, routes: Vec<RouteBase>) -> Self {
        self.routes = routes;
        self
    }

    /// Add a single child node
    pub fn route(mut self, route: impl Into<RouteBase>) -> Self {
        self.routes.push(route.into());
        self
    }
}

impl fmt::Debug for ShellRoute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ShellRoute")
            .field("builder", &self.builder.is_some())
            .field("routes", &self.routes.len())
            .finish()
    }
}

/// One branch of a [`StatefulShellRoute`]
#[derive(Debug, Clone, Default)]
pub struct ShellBranch {
    pub routes: Vec<RouteBase>,
    pub initial_path: Option<String>,
}

impl ShellBranch {
    pub fn new(routes: Vec<RouteBase>) -> Self {
        Self {
            routes,
            initial_path: None,
        }
    }

    /// Location to open when the branch is first selected
    pub fn initial_path(mut self, path: impl Into<String>) -> Self {
        self.initial_path = Some(path.into());
        self
    }
}

/// A shell with several branch sub-trees, matched in declared order.
///
/// Branches do not get independent back stacks; for navigation purposes the
/// router treats them as plain sub-trees.
#[derive(Clone, Default)]
pub struct StatefulShellRoute {
    pub branches: Vec<ShellBranch>,
    pub builder: Option<BuilderRef>,
}

impl StatefulShellRoute {
    pub fn new(branches: Vec<ShellBranch>) -> Self {
        Self {
            branches,
            builder: None,
        }
    }

    /// Attach an opaque render reference
    pub fn builder<T: Any + Send + Sync>(mut self, builder: T) -> Self {
        self.builder = Some(Arc::new(builder));
        self
    }
}

impl fmt::Debug for StatefulShellRoute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StatefulShellRoute")
            .field("branches", &self.branches)
            .field("builder", &self.builder.is_some())
            .finish()
    }
}

// ============================================================================
// RouteBase
// ============================================================================

/// A node of the declarative route tree
#[derive(Debug, Clone)]
pub enum RouteBase {
    Route(RouteRef),
    Shell(Arc<ShellRoute>),
    StatefulShell(Arc<StatefulShellRoute>),
}

impl From<Route> for RouteBase {
    fn from(route: Route) -> Self {
        RouteBase::Route(Arc::new(route))
    }
}

impl From<RouteRef> for RouteBase {
    fn from(route: RouteRef) -> Self {
        RouteBase::Route(route)
    }
}

impl From<ShellRoute> for RouteBase {
    fn from(shell: ShellRoute) -> Self {
        RouteBase::Shell(Arc::new(shell))
    }
}

impl From<StatefulShellRoute> for RouteBase {
    fn from(shell: StatefulShellRoute) -> Self {
        RouteBase::StatefulShell(Arc::new(shell))
    }
}
