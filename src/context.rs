//! Navigation context handed to hooks
//!
//! Redirect hooks and exit guards often need application state (is the user
//! signed in, is a form dirty). Instead of reading globals they receive a
//! [`NavigationContext`]: a typed map owned by the router and updated through
//! [`Router::context_mut`](crate::Router::context_mut).

use std::any::{Any, TypeId};
use std::collections::HashMap;
use std::fmt;

/// Typed capability map, one value per type
///
/// # Example
///
/// ```
/// use shell_router::NavigationContext;
///
/// struct Session {
///     signed_in: bool,
/// }
///
/// let mut cx = NavigationContext::new();
/// cx.insert(Session { signed_in: true });
///
/// assert!(cx.get::<Session>().is_some_and(|s| s.signed_in));
/// ```
#[derive(Default)]
pub struct NavigationContext {
    values: HashMap<TypeId, Box<dyn Any + Send + Sync>>,
}

impl NavigationContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a value, returning the previous value of the same type
    pub fn insert<T: Any + Send + Sync>(&mut self, value: T) -> Option<T> {
        self.values
            .insert(TypeId::of::<T>(), Box::new(value))
            .and_then(|old| old.downcast::<T>().ok())
            .map(|old| *old)
    }

    /// Builder-style insert
    #[must_use]
    pub fn with<T: Any + Send + Sync>(mut self, value: T) -> Self {
        self.insert(value);
        self
    }

    pub fn get<T: Any + Send + Sync>(&self) -> Option<&T> {
        self.values.get(&TypeId::of::<T>())?.downcast_ref::<T>()
    }

    pub fn get_mut<T: Any + Send + Sync>(&mut self) -> Option<&mut T> {
        self.values.get_mut(&TypeId::of::<T>())?.downcast_mut::<T>()
    }

    pub fn remove<T: Any + Send + Sync>(&mut self) -> Option<T> {
        self.values
            .remove(&TypeId::of::<T>())
            .and_then(|old| old.downcast::<T>().ok())
            .map(|old| *old)
    }

    pub fn contains<T: Any + Send + Sync>(&self) -> bool {
        self.values.contains_key(&TypeId::of::<T>())
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl fmt::Debug for NavigationContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NavigationContext")
            .field("values", &self.values.len())
            .finish()
    }
}
