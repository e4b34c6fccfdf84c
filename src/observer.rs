//! Navigation events and observers
//!
//! Every mutating router operation emits a [`NavigationEvent`]. Observers
//! receive events synchronously after the stacks are committed and have no
//! influence on navigation. Use them for analytics, screen tracking or
//! debugging.
//!
//! # Example
//!
//! ```
//! use shell_router::{observer_fn, NavigationType};
//!
//! let screens = observer_fn(|event| {
//!     if event.kind == NavigationType::Push {
//!         println!("screen view: {}", event.location);
//!     }
//! });
//! # let _ = screens;
//! ```

use crate::info_log;
use std::fmt;
use std::sync::Arc;
use std::time::SystemTime;

/// Kind of navigation that produced an event
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NavigationType {
    Go,
    Push,
    PushReplacement,
    Pop,
    Restore,
    Redirect,
    Error,
}

impl NavigationType {
    pub fn as_str(self) -> &'static str {
        match self {
            NavigationType::Go => "GO",
            NavigationType::Push => "PUSH",
            NavigationType::PushReplacement => "PUSH_REPLACEMENT",
            NavigationType::Pop => "POP",
            NavigationType::Restore => "RESTORE",
            NavigationType::Redirect => "REDIRECT",
            NavigationType::Error => "ERROR",
        }
    }
}

impl fmt::Display for NavigationType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A navigation event record
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavigationEvent {
    pub kind: NavigationType,
    /// Location navigated to
    pub location: String,
    /// Location before the operation, if any
    pub previous_location: Option<String>,
    /// Stack depth after the operation
    pub stack_depth: usize,
    pub timestamp: SystemTime,
}

impl NavigationEvent {
    pub fn new(
        kind: NavigationType,
        location: impl Into<String>,
        previous_location: Option<String>,
        stack_depth: usize,
    ) -> Self {
        Self {
            kind,
            location: location.into(),
            previous_location,
            stack_depth,
            timestamp: SystemTime::now(),
        }
    }
}

impl fmt::Display for NavigationEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.kind, self.location)?;
        if let Some(previous) = &self.previous_location {
            write!(f, " (from: {})", previous)?;
        }
        write!(f, " [depth={}]", self.stack_depth)
    }
}

/// Receives navigation events
pub trait NavigationObserver: Send + Sync + 'static {
    fn on_navigate(&self, event: &NavigationEvent);

    /// Observer name for debugging
    fn name(&self) -> &str {
        "NavigationObserver"
    }
}

/// Type-erased observer
pub type BoxedObserver = Arc<dyn NavigationObserver>;

/// Create an observer from a closure
pub fn observer_fn<F>(f: F) -> FnObserver<F>
where
    F: Fn(&NavigationEvent) + Send + Sync + 'static,
{
    FnObserver { f }
}

/// Observer created from a closure
pub struct FnObserver<F> {
    f: F,
}

impl<F> NavigationObserver for FnObserver<F>
where
    F: Fn(&NavigationEvent) + Send + Sync + 'static,
{
    fn on_navigate(&self, event: &NavigationEvent) {
        (self.f)(event);
    }
}

/// Writes every event through the crate's logging macros at info level
#[derive(Debug, Clone)]
pub struct LoggingObserver {
    tag: String,
}

impl LoggingObserver {
    pub fn new(tag: impl Into<String>) -> Self {
        Self { tag: tag.into() }
    }

    pub fn tag(&self) -> &str {
        &self.tag
    }
}

impl Default for LoggingObserver {
    fn default() -> Self {
        Self::new("shell-router")
    }
}

impl NavigationObserver for LoggingObserver {
    fn on_navigate(&self, event: &NavigationEvent) {
        info_log!("{} {}", self.tag, event);
    }

    fn name(&self) -> &str {
        "LoggingObserver"
    }
}

/// Fans events out to several observers in insertion order
#[derive(Default, Clone)]
pub struct CompositeObserver {
    observers: Vec<BoxedObserver>,
}

impl CompositeObserver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with<O: NavigationObserver>(mut self, observer: O) -> Self {
        self.observers.push(Arc::new(observer));
        self
    }

    pub fn push(&mut self, observer: BoxedObserver) {
        self.observers.push(observer);
    }

    pub fn len(&self) -> usize {
        self.observers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.observers.is_empty()
    }
}

impl NavigationObserver for CompositeObserver {
    fn on_navigate(&self, event: &NavigationEvent) {
        for observer in &self.observers {
            observer.on_navigate(event);
        }
    }

    fn name(&self) -> &str {
        "CompositeObserver"
    }
}

impl fmt::Debug for CompositeObserver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names: Vec<&str> = self.observers.iter().map(|o| o.name()).collect();
        f.debug_struct("CompositeObserver")
            .field("observers", &names)
            .finish()
    }
}
