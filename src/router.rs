//! Navigation controller
//!
//! [`Router`] owns the route tree, the two aligned navigation stacks and the
//! hook configuration. All mutation goes through its operations; resolution
//! (matching plus redirects) runs first and the stacks are only touched once
//! it has finished.
//!
//! # Example
//!
//! ```
//! use shell_router::{Route, Router, ShellRoute};
//!
//! # pollster::block_on(async {
//! let mut router = Router::builder(vec![
//!     Route::new("/").into(),
//!     ShellRoute::new()
//!         .route(Route::new("/users").route(Route::new(":id")))
//!         .route(Route::new("/settings"))
//!         .into(),
//! ])
//! .initial_location("/users")
//! .build()
//! .unwrap();
//!
//! router.initialize().await;
//! router.push("/users/42").await;
//! router.go("/settings").await;
//!
//! assert_eq!(router.location_strings(), vec!["/users", "/settings"]);
//! # });
//! ```

use crate::context::NavigationContext;
use crate::error::{ErrorHandler, NavigationResult};
use crate::history::{LocationEntry, NavigationStack};
use crate::matcher::{RouteMatchList, RouteMatcher};
use crate::named::NamedRouteResolver;
use crate::nested::{find_owner_shell, find_tab_root, is_direct_tab_route};
use crate::observer::{BoxedObserver, NavigationEvent, NavigationObserver, NavigationType};
use crate::params::{QueryParams, RouteParams};
use crate::redirect::{self, run_redirect_pipeline, BoxedRedirect, RouteRedirect};
use crate::route::RouteBase;
use crate::state::RouterState;
use crate::tree::{RouteId, RouteTree};
use crate::{debug_log, info_log, warn_log, Extra, Result, RouterError};
#[cfg(feature = "cache")]
use crate::cache::{CacheStats, MatchCache};
use std::fmt;
use std::sync::Arc;

// ============================================================================
// Builder
// ============================================================================

/// Configuration for a [`Router`]
pub struct RouterBuilder {
    routes: Vec<RouteBase>,
    initial_location: String,
    redirect: Option<BoxedRedirect>,
    max_redirects: usize,
    on_exception: Option<ErrorHandler>,
    observer: Option<BoxedObserver>,
    debug_log_diagnostics: bool,
    context: NavigationContext,
    #[cfg(feature = "cache")]
    cache_capacity: usize,
}

impl RouterBuilder {
    pub fn new(routes: Vec<RouteBase>) -> Self {
        Self {
            routes,
            initial_location: "/".to_string(),
            redirect: None,
            max_redirects: redirect::DEFAULT_MAX_REDIRECTS,
            on_exception: None,
            observer: None,
            debug_log_diagnostics: false,
            context: NavigationContext::new(),
            #[cfg(feature = "cache")]
            cache_capacity: MatchCache::DEFAULT_CAPACITY,
        }
    }

    /// Location used by [`Router::initialize`]
    pub fn initial_location(mut self, location: impl Into<String>) -> Self {
        self.initial_location = location.into();
        self
    }

    /// Global redirect hook, consulted before the leaf route's own hook
    pub fn redirect<R: RouteRedirect>(mut self, redirect: R) -> Self {
        self.redirect = Some(redirect::boxed(redirect));
        self
    }

    /// Maximum redirect hops per resolution
    pub fn max_redirects(mut self, max: usize) -> Self {
        self.max_redirects = max;
        self
    }

    /// Report failed resolutions here instead of pushing an error entry
    pub fn on_exception<F>(mut self, handler: F) -> Self
    where
        F: Fn(&RouterState) + Send + Sync + 'static,
    {
        self.on_exception = Some(Arc::new(handler));
        self
    }

    /// Receive a [`NavigationEvent`] after every operation
    pub fn observer<O: NavigationObserver>(mut self, observer: O) -> Self {
        self.observer = Some(Arc::new(observer));
        self
    }

    /// Log every event together with the location stack at info level
    pub fn debug_log_diagnostics(mut self, enabled: bool) -> Self {
        self.debug_log_diagnostics = enabled;
        self
    }

    /// Initial hook context
    pub fn context(mut self, context: NavigationContext) -> Self {
        self.context = context;
        self
    }

    /// Match cache size; 0 disables caching
    #[cfg(feature = "cache")]
    pub fn cache_capacity(mut self, capacity: usize) -> Self {
        self.cache_capacity = capacity;
        self
    }

    /// Build the router
    ///
    /// Fails with [`RouterError::DuplicateRouteName`] if two routes share a name.
    pub fn build(self) -> Result<Router> {
        let tree = Arc::new(RouteTree::new(&self.routes));
        let named = NamedRouteResolver::new(&tree)?;

        debug_log!(
            "router built: {} nodes, {} named routes, initial location {}",
            tree.len(),
            named.len(),
            self.initial_location
        );

        Ok(Router {
            matcher: RouteMatcher::new(Arc::clone(&tree)),
            tree,
            named,
            stack: NavigationStack::new(),
            initial_location: self.initial_location,
            redirect: self.redirect,
            max_redirects: self.max_redirects,
            on_exception: self.on_exception,
            observer: self.observer,
            debug_log_diagnostics: self.debug_log_diagnostics,
            context: self.context,
            #[cfg(feature = "cache")]
            cache: MatchCache::with_capacity(self.cache_capacity),
        })
    }
}

impl fmt::Debug for RouterBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RouterBuilder")
            .field("routes", &self.routes.len())
            .field("initial_location", &self.initial_location)
            .field("max_redirects", &self.max_redirects)
            .field("debug_log_diagnostics", &self.debug_log_diagnostics)
            .finish()
    }
}

// ============================================================================
// Router
// ============================================================================

/// The navigation controller
pub struct Router {
    tree: Arc<RouteTree>,
    matcher: RouteMatcher,
    named: NamedRouteResolver,
    stack: NavigationStack,
    initial_location: String,
    redirect: Option<BoxedRedirect>,
    max_redirects: usize,
    on_exception: Option<ErrorHandler>,
    observer: Option<BoxedObserver>,
    debug_log_diagnostics: bool,
    context: NavigationContext,
    #[cfg(feature = "cache")]
    cache: Option<MatchCache>,
}

impl Router {
    pub fn builder(routes: Vec<RouteBase>) -> RouterBuilder {
        RouterBuilder::new(routes)
    }

    /// Build a router with default configuration
    pub fn new(routes: Vec<RouteBase>) -> Result<Self> {
        RouterBuilder::new(routes).build()
    }

    // ------------------------------------------------------------------------
    // Initialization
    // ------------------------------------------------------------------------

    /// Go to the initial location if nothing has been navigated yet
    pub async fn initialize(&mut self) -> NavigationResult {
        if let Some(current) = self.current_location() {
            return NavigationResult::Success {
                location: current.to_string(),
            };
        }
        let location = self.initial_location.clone();
        self.go(&location).await
    }

    /// Rebuild from saved locations, falling back to the initial location
    pub async fn initialize_from<S: AsRef<str>>(&mut self, saved: &[S]) -> NavigationResult {
        if !self.stack.is_empty() || saved.is_empty() {
            return self.initialize().await;
        }
        self.restore(saved).await;
        self.initialize().await
    }

    // ------------------------------------------------------------------------
    // Navigation
    // ------------------------------------------------------------------------

    /// Declarative navigation with shell-aware pruning
    pub async fn go(&mut self, location: &str) -> NavigationResult {
        self.go_inner(location, None).await
    }

    pub async fn go_with_extra(&mut self, location: &str, extra: Extra) -> NavigationResult {
        self.go_inner(location, Some(extra)).await
    }

    async fn go_inner(&mut self, location: &str, extra: Option<Extra>) -> NavigationResult {
        let previous = self.current_location().map(str::to_string);
        let resolved = self.resolve_reporting(location, extra.clone(), false).await;
        if resolved.is_error() {
            return self.handle_error(resolved);
        }

        let target_leaf = resolved.leaf().map(|m| m.id);
        let current_leaf = self.current_leaf();
        let target_shell = target_leaf.and_then(|id| find_owner_shell(&self.tree, id));
        let current_shell = current_leaf.and_then(|id| find_owner_shell(&self.tree, id));
        let entry = LocationEntry::with_extra(location, extra);

        match (target_shell, current_shell, current_leaf) {
            (Some(target), Some(current), Some(leaf)) if target == current => {
                self.prune_tab(current, leaf);
                self.stack.push(resolved, entry);
            }
            _ => self.stack.reset(resolved, entry),
        }

        self.emit(NavigationType::Go, location, previous);
        NavigationResult::Success {
            location: location.to_string(),
        }
    }

    /// Pop entries deeper than the tab root the current leaf belongs to
    fn prune_tab(&mut self, shell: RouteId, current_leaf: RouteId) {
        let Some(tab_root) = find_tab_root(&self.tree, shell, current_leaf) else {
            return;
        };

        while self.stack.can_pop() {
            let Some(top) = self.current_leaf() else {
                break;
            };
            if find_tab_root(&self.tree, shell, top) != Some(tab_root)
                || is_direct_tab_route(&self.tree, shell, top)
            {
                break;
            }
            debug_log!(
                "pruning {:?} from tab {}",
                self.current_location(),
                tab_root
            );
            self.stack.pop();
        }
    }

    /// Append a new entry, never pruning
    pub async fn push(&mut self, location: &str) -> NavigationResult {
        self.push_inner(location, None).await
    }

    pub async fn push_with_extra(&mut self, location: &str, extra: Extra) -> NavigationResult {
        self.push_inner(location, Some(extra)).await
    }

    async fn push_inner(&mut self, location: &str, extra: Option<Extra>) -> NavigationResult {
        let previous = self.current_location().map(str::to_string);
        let resolved = self.resolve_reporting(location, extra.clone(), true).await;
        if resolved.is_error() {
            return self.handle_error(resolved);
        }

        self.stack
            .push(resolved, LocationEntry::with_extra(location, extra));

        self.emit(NavigationType::Push, location, previous);
        NavigationResult::Success {
            location: location.to_string(),
        }
    }

    /// Replace the top entry, or push onto an empty stack
    pub async fn push_replacement(&mut self, location: &str) -> NavigationResult {
        self.push_replacement_inner(location, None).await
    }

    pub async fn push_replacement_with_extra(
        &mut self,
        location: &str,
        extra: Extra,
    ) -> NavigationResult {
        self.push_replacement_inner(location, Some(extra)).await
    }

    async fn push_replacement_inner(
        &mut self,
        location: &str,
        extra: Option<Extra>,
    ) -> NavigationResult {
        let previous = self.current_location().map(str::to_string);
        let resolved = self.resolve_reporting(location, extra.clone(), false).await;
        if resolved.is_error() {
            return self.handle_error(resolved);
        }

        self.stack
            .replace_top(resolved, LocationEntry::with_extra(location, extra));

        self.emit(NavigationType::PushReplacement, location, previous);
        NavigationResult::Success {
            location: location.to_string(),
        }
    }

    /// Remove the top entry; the first entry is never removed
    pub fn pop(&mut self) -> bool {
        if !self.stack.can_pop() {
            return false;
        }
        let popped = self.stack.pop().map(|(_, entry)| entry.location);
        let location = self.current_location().unwrap_or("/").to_string();

        self.emit(NavigationType::Pop, &location, popped);
        true
    }

    /// Pop unless the top route's exit guard refuses
    pub async fn maybe_pop(&mut self) -> bool {
        if !self.stack.can_pop() {
            return false;
        }

        if let Some(top) = self.stack.top_match() {
            if let Some(guard) = top.leaf().and_then(|leaf| leaf.route.on_exit.clone()) {
                let state = top.to_state();
                if !guard.on_exit(&self.context, &state).await {
                    debug_log!("exit guard '{}' kept {}", guard.name(), state.uri);
                    return false;
                }
            }
        }

        self.pop()
    }

    pub fn can_pop(&self) -> bool {
        self.stack.can_pop()
    }

    /// Resolve a named route and `go` there
    pub async fn go_named(
        &mut self,
        name: &str,
        path_params: &RouteParams,
        query_params: &QueryParams,
    ) -> Result<NavigationResult> {
        let location = self.named.resolve(name, path_params, query_params)?;
        Ok(self.go_inner(&location, None).await)
    }

    pub async fn go_named_with_extra(
        &mut self,
        name: &str,
        path_params: &RouteParams,
        query_params: &QueryParams,
        extra: Extra,
    ) -> Result<NavigationResult> {
        let location = self.named.resolve(name, path_params, query_params)?;
        Ok(self.go_inner(&location, Some(extra)).await)
    }

    /// Resolve a named route and `push` it
    pub async fn push_named(
        &mut self,
        name: &str,
        path_params: &RouteParams,
        query_params: &QueryParams,
    ) -> Result<NavigationResult> {
        let location = self.named.resolve(name, path_params, query_params)?;
        Ok(self.push_inner(&location, None).await)
    }

    pub async fn push_named_with_extra(
        &mut self,
        name: &str,
        path_params: &RouteParams,
        query_params: &QueryParams,
        extra: Extra,
    ) -> Result<NavigationResult> {
        let location = self.named.resolve(name, path_params, query_params)?;
        Ok(self.push_inner(&location, Some(extra)).await)
    }

    /// Rebuild both stacks from saved locations
    ///
    /// Locations that no longer resolve are skipped. Returns the new depth.
    pub async fn restore<S: AsRef<str>>(&mut self, locations: &[S]) -> usize {
        self.stack.clear();

        for location in locations {
            let location = location.as_ref();
            let resolved = self.resolve(location, None, false).await;
            if let Some(error) = resolved.error() {
                debug_log!("skipping saved location {}: {}", location, error);
                continue;
            }
            self.stack.push(resolved, LocationEntry::new(location));
        }

        let current = self
            .current_location()
            .unwrap_or(&self.initial_location)
            .to_string();
        self.emit(NavigationType::Restore, &current, None);
        self.stack.len()
    }

    // ------------------------------------------------------------------------
    // Resolution
    // ------------------------------------------------------------------------

    /// Match and run redirects without touching the stacks
    pub async fn resolve(
        &mut self,
        location: &str,
        extra: Option<Extra>,
        transition_enabled: bool,
    ) -> RouteMatchList {
        let initial = self.match_initial(location, extra, transition_enabled);
        run_redirect_pipeline(
            self.redirect.as_ref(),
            &self.matcher,
            &self.context,
            initial,
            self.max_redirects,
        )
        .await
    }

    async fn resolve_reporting(
        &mut self,
        location: &str,
        extra: Option<Extra>,
        transition_enabled: bool,
    ) -> RouteMatchList {
        let resolved = self.resolve(location, extra, transition_enabled).await;
        if !resolved.is_error() && resolved.uri() != location {
            let target = resolved.uri().to_string();
            self.emit(NavigationType::Redirect, &target, Some(location.to_string()));
        }
        resolved
    }

    #[cfg(feature = "cache")]
    fn match_initial(
        &mut self,
        location: &str,
        extra: Option<Extra>,
        transition_enabled: bool,
    ) -> RouteMatchList {
        let Some(cache) = self.cache.as_mut() else {
            return self
                .matcher
                .match_location(location, extra, transition_enabled);
        };
        if let Some(hit) = cache.get(location, extra.clone(), transition_enabled) {
            return hit;
        }
        let matched = self
            .matcher
            .match_location(location, extra, transition_enabled);
        cache.insert(location, &matched);
        matched
    }

    #[cfg(not(feature = "cache"))]
    fn match_initial(
        &mut self,
        location: &str,
        extra: Option<Extra>,
        transition_enabled: bool,
    ) -> RouteMatchList {
        self.matcher
            .match_location(location, extra, transition_enabled)
    }

    fn handle_error(&mut self, resolved: RouteMatchList) -> NavigationResult {
        let uri = resolved.uri().to_string();
        let error = resolved
            .error()
            .cloned()
            .unwrap_or_else(|| RouterError::NoMatch {
                location: uri.clone(),
            });
        warn_log!("navigation to {} failed: {}", uri, error);

        if let Some(handler) = &self.on_exception {
            handler(&resolved.to_state());
        } else {
            self.stack.push(resolved, LocationEntry::new(uri.as_str()));
        }

        self.emit(NavigationType::Error, &uri, None);
        NavigationResult::Error(error)
    }

    fn emit(&self, kind: NavigationType, location: &str, previous: Option<String>) {
        let event = NavigationEvent::new(kind, location, previous, self.stack.len());

        if self.debug_log_diagnostics {
            info_log!("{} | stack: {:?}", event, self.stack.location_strings());
        } else {
            debug_log!("{}", event);
        }

        if let Some(observer) = &self.observer {
            observer.on_navigate(&event);
        }
    }

    fn current_leaf(&self) -> Option<RouteId> {
        self.stack.top_match()?.leaf().map(|m| m.id)
    }

    // ------------------------------------------------------------------------
    // Queries
    // ------------------------------------------------------------------------

    /// The top match list
    pub fn current_match(&self) -> Option<&RouteMatchList> {
        self.stack.top_match()
    }

    /// State view of the top entry, empty before initialization
    pub fn current_state(&self) -> RouterState {
        self.stack
            .top_match()
            .map(RouteMatchList::to_state)
            .unwrap_or_default()
    }

    /// The raw location of the top entry
    pub fn current_location(&self) -> Option<&str> {
        self.stack.top_location().map(|e| e.location.as_str())
    }

    /// Every committed match list, bottom to top
    pub fn matches(&self) -> &[RouteMatchList] {
        self.stack.matches()
    }

    pub fn locations(&self) -> &[LocationEntry] {
        self.stack.locations()
    }

    /// Raw locations, bottom to top; feed these back to [`Router::restore`]
    pub fn location_strings(&self) -> Vec<String> {
        self.stack.location_strings()
    }

    pub fn depth(&self) -> usize {
        self.stack.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stack.is_empty()
    }

    pub fn has_route(&self, name: &str) -> bool {
        self.named.has_route(name)
    }

    /// Build a location for a named route without navigating
    pub fn named_location(
        &self,
        name: &str,
        path_params: &RouteParams,
        query_params: &QueryParams,
    ) -> Result<String> {
        self.named.resolve(name, path_params, query_params)
    }

    pub fn initial_location(&self) -> &str {
        &self.initial_location
    }

    pub fn tree(&self) -> &RouteTree {
        &self.tree
    }

    pub fn context(&self) -> &NavigationContext {
        &self.context
    }

    /// Mutable hook context, e.g. to record sign-in
    pub fn context_mut(&mut self) -> &mut NavigationContext {
        &mut self.context
    }

    /// Match cache statistics, `None` when caching is disabled
    #[cfg(feature = "cache")]
    pub fn cache_stats(&self) -> Option<&CacheStats> {
        self.cache.as_ref().map(MatchCache::stats)
    }

    #[cfg(feature = "cache")]
    pub fn clear_cache(&mut self) {
        if let Some(cache) = self.cache.as_mut() {
            cache.clear();
        }
    }
}

impl fmt::Debug for Router {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Router")
            .field("locations", &self.stack.location_strings())
            .field("initial_location", &self.initial_location)
            .field("max_redirects", &self.max_redirects)
            .field("context", &self.context)
            .finish()
    }
}
