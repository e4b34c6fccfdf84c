//! Route exit guards
//!
//! An exit guard is asked before the top entry is popped through
//! [`Router::maybe_pop`](crate::Router::maybe_pop). Returning `false` keeps
//! the entry on the stack (unsaved changes, pending uploads, ...).

use crate::context::NavigationContext;
use crate::state::RouterState;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

/// Boxed future returned by type-erased exit guards
pub type ExitFuture = Pin<Box<dyn Future<Output = bool> + Send>>;

/// Trait for route exit guards
///
/// # Example
///
/// ```
/// use shell_router::{NavigationContext, RouteExit, RouterState};
/// use std::future::Future;
/// use std::pin::Pin;
///
/// struct Draft {
///     dirty: bool,
/// }
///
/// struct KeepDirtyDraft;
///
/// impl RouteExit for KeepDirtyDraft {
///     type Future = Pin<Box<dyn Future<Output = bool> + Send>>;
///
///     fn on_exit(&self, cx: &NavigationContext, _state: &RouterState) -> Self::Future {
///         let dirty = cx.get::<Draft>().is_some_and(|d| d.dirty);
///         Box::pin(async move { !dirty })
///     }
/// }
/// ```
pub trait RouteExit: Send + Sync + 'static {
    /// The future returned by `on_exit`
    type Future: Future<Output = bool> + Send + 'static;

    /// Resolve to `true` to allow leaving the route
    fn on_exit(&self, cx: &NavigationContext, state: &RouterState) -> Self::Future;

    /// Guard name for logging
    fn name(&self) -> &str {
        "RouteExit"
    }
}

/// Type-erased exit guard
pub type BoxedExit = Arc<dyn RouteExit<Future = ExitFuture>>;

/// Create an exit guard from a closure returning a future
pub fn exit_fn<F, Fut>(f: F) -> FnExit<F>
where
    F: Fn(&NavigationContext, &RouterState) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = bool> + Send + 'static,
{
    FnExit { f }
}

/// Exit guard created from a closure
pub struct FnExit<F> {
    f: F,
}

impl<F, Fut> RouteExit for FnExit<F>
where
    F: Fn(&NavigationContext, &RouterState) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = bool> + Send + 'static,
{
    type Future = Fut;

    fn on_exit(&self, cx: &NavigationContext, state: &RouterState) -> Self::Future {
        (self.f)(cx, state)
    }
}

struct Boxed<E>(E);

impl<E: RouteExit> RouteExit for Boxed<E> {
    type Future = ExitFuture;

    fn on_exit(&self, cx: &NavigationContext, state: &RouterState) -> Self::Future {
        Box::pin(self.0.on_exit(cx, state))
    }

    fn name(&self) -> &str {
        self.0.name()
    }
}

/// Erase the future type of an exit guard
pub fn boxed<E: RouteExit>(on_exit: E) -> BoxedExit {
    Arc::new(Boxed(on_exit))
}
