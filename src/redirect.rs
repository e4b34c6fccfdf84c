//! Redirect hooks and the redirect pipeline
//!
//! A redirect hook looks at the [`RouterState`] of a resolved match and
//! either returns a new location or `None` to accept it. The pipeline
//! re-matches until no hook fires, a target repeats, or the hop limit is
//! exceeded.

use crate::context::NavigationContext;
use crate::matcher::{RouteMatchList, RouteMatcher};
use crate::state::RouterState;
use crate::{debug_log, trace_log, RouterError};
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

/// Default maximum number of redirect hops for one resolution
pub const DEFAULT_MAX_REDIRECTS: usize = 10;

/// Boxed future returned by type-erased redirect hooks
pub type RedirectFuture = Pin<Box<dyn Future<Output = Option<String>> + Send>>;

/// Trait for redirect hooks
///
/// Hooks read whatever they need from the context and state synchronously
/// and return a `'static` future, so they may suspend on external checks.
///
/// # Example
///
/// ```
/// use shell_router::{NavigationContext, RouteRedirect, RouterState};
/// use std::future::Future;
/// use std::pin::Pin;
///
/// struct RequireSession;
/// struct Session;
///
/// impl RouteRedirect for RequireSession {
///     type Future = Pin<Box<dyn Future<Output = Option<String>> + Send>>;
///
///     fn redirect(&self, cx: &NavigationContext, state: &RouterState) -> Self::Future {
///         let signed_in = cx.contains::<Session>();
///         let on_login = state.matched_location == "/login";
///         Box::pin(async move {
///             (!signed_in && !on_login).then(|| "/login".to_string())
///         })
///     }
/// }
/// ```
pub trait RouteRedirect: Send + Sync + 'static {
    /// The future returned by `redirect`
    type Future: Future<Output = Option<String>> + Send + 'static;

    /// Return `Some(location)` to redirect, `None` to accept the match
    fn redirect(&self, cx: &NavigationContext, state: &RouterState) -> Self::Future;

    /// Hook name for logging
    fn name(&self) -> &str {
        "RouteRedirect"
    }
}

/// Type-erased redirect hook
pub type BoxedRedirect = Arc<dyn RouteRedirect<Future = RedirectFuture>>;

/// Create a redirect hook from a closure returning a future
///
/// ```
/// use shell_router::redirect_fn;
///
/// let legacy = redirect_fn(|_cx, state| {
///     let id = state.path_param("id").map(str::to_owned);
///     async move { id.map(|id| format!("/users/{id}")) }
/// });
/// # let _ = legacy;
/// ```
pub fn redirect_fn<F, Fut>(f: F) -> FnRedirect<F>
where
    F: Fn(&NavigationContext, &RouterState) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Option<String>> + Send + 'static,
{
    FnRedirect { f }
}

/// Redirect hook created from a closure
pub struct FnRedirect<F> {
    f: F,
}

impl<F, Fut> RouteRedirect for FnRedirect<F>
where
    F: Fn(&NavigationContext, &RouterState) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Option<String>> + Send + 'static,
{
    type Future = Fut;

    fn redirect(&self, cx: &NavigationContext, state: &RouterState) -> Self::Future {
        (self.f)(cx, state)
    }
}

struct Boxed<R>(R);

impl<R: RouteRedirect> RouteRedirect for Boxed<R> {
    type Future = RedirectFuture;

    fn redirect(&self, cx: &NavigationContext, state: &RouterState) -> Self::Future {
        Box::pin(self.0.redirect(cx, state))
    }

    fn name(&self) -> &str {
        self.0.name()
    }
}

/// Erase the future type of a redirect hook
pub fn boxed<R: RouteRedirect>(redirect: R) -> BoxedRedirect {
    Arc::new(Boxed(redirect))
}

// ============================================================================
// Pipeline
// ============================================================================

/// Run the redirect pipeline to a fixed point.
///
/// The global hook is consulted first; the leaf route's own hook only when
/// the global one returns `None`. Each redirect re-matches the target with
/// the original payload and transition flag. A target seen twice fails with
/// [`RouterError::RedirectLoop`], more than `max_redirects` hops with
/// [`RouterError::TooManyRedirects`]. Match failures propagate immediately,
/// ahead of the hop limit.
pub async fn run_redirect_pipeline(
    global: Option<&BoxedRedirect>,
    matcher: &RouteMatcher,
    cx: &NavigationContext,
    initial: RouteMatchList,
    max_redirects: usize,
) -> RouteMatchList {
    let mut current = initial;
    let mut visited: Vec<String> = Vec::new();

    loop {
        let state = current.to_state();

        let mut target = match global {
            Some(hook) => hook.redirect(cx, &state).await,
            None => None,
        };

        if target.is_none() {
            if let Some(hook) = current.leaf().and_then(|leaf| leaf.route.redirect.clone()) {
                trace_log!("running route redirect '{}' for {}", hook.name(), current.uri());
                target = hook.redirect(cx, &state).await;
            }
        }

        let Some(target) = target else {
            return current;
        };

        if visited.contains(&target) {
            debug_log!("redirect loop at {} (visited: {:?})", target, visited);
            return current.into_failed(RouterError::RedirectLoop {
                location: target,
                visited,
            });
        }

        debug_log!("redirect {} -> {}", current.uri(), target);
        visited.push(target.clone());

        let extra = current.extra().cloned();
        let transition_enabled = current.is_transition_enabled();
        current = matcher.match_location(&target, extra, transition_enabled);

        if current.is_error() {
            return current;
        }

        if visited.len() > max_redirects {
            return current.into_failed(RouterError::TooManyRedirects {
                max: max_redirects,
                location: target,
            });
        }
    }
}
