//! Route transition metadata
//!
//! Routes may carry a [`Transition`] describing how a renderer should animate
//! to them. The router never interprets it: the value is stored on the route
//! and surfaced through [`RouteMatchList::transition`](crate::RouteMatchList::transition)
//! when the navigation had transitions enabled (`push`), and hidden otherwise
//! (`go`, `push_replacement`, `restore`).

use std::any::Any;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;

/// Direction for slide transitions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SlideDirection {
    /// Enter from the right, moving left
    Left,
    /// Enter from the left, moving right
    Right,
    Up,
    Down,
}

/// Transition description handed to the renderer
#[derive(Clone, Default)]
pub enum Transition {
    #[default]
    None,

    Fade {
        duration_ms: u64,
    },

    Slide {
        direction: SlideDirection,
        duration_ms: u64,
    },

    /// Scale from `from` to `to` (1.0 is natural size)
    Scale {
        from: f32,
        to: f32,
        duration_ms: u64,
    },

    /// Renderer-specific description, retrieved by downcast
    Custom(Arc<dyn Any + Send + Sync>),
}

impl Transition {
    pub fn fade(duration_ms: u64) -> Self {
        Self::Fade { duration_ms }
    }

    pub fn slide(direction: SlideDirection, duration_ms: u64) -> Self {
        Self::Slide {
            direction,
            duration_ms,
        }
    }

    pub fn slide_left(duration_ms: u64) -> Self {
        Self::slide(SlideDirection::Left, duration_ms)
    }

    pub fn slide_right(duration_ms: u64) -> Self {
        Self::slide(SlideDirection::Right, duration_ms)
    }

    pub fn slide_up(duration_ms: u64) -> Self {
        Self::slide(SlideDirection::Up, duration_ms)
    }

    pub fn slide_down(duration_ms: u64) -> Self {
        Self::slide(SlideDirection::Down, duration_ms)
    }

    pub fn scale(from: f32, to: f32, duration_ms: u64) -> Self {
        Self::Scale {
            from,
            to,
            duration_ms,
        }
    }

    /// Wrap a renderer-specific value
    pub fn custom<T: Any + Send + Sync>(value: T) -> Self {
        Self::Custom(Arc::new(value))
    }

    /// Downcast a custom transition
    pub fn custom_as<T: Any + Send + Sync>(&self) -> Option<&T> {
        match self {
            Self::Custom(value) => value.downcast_ref::<T>(),
            _ => None,
        }
    }

    /// Declared duration; zero for `None` and custom transitions
    pub fn duration(&self) -> Duration {
        match self {
            Self::Fade { duration_ms }
            | Self::Slide { duration_ms, .. }
            | Self::Scale { duration_ms, .. } => Duration::from_millis(*duration_ms),
            Self::None | Self::Custom(_) => Duration::ZERO,
        }
    }

    pub fn is_none(&self) -> bool {
        matches!(self, Self::None)
    }
}

impl fmt::Debug for Transition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::None => write!(f, "Transition::None"),
            Self::Fade { duration_ms } => f
                .debug_struct("Transition::Fade")
                .field("duration_ms", duration_ms)
                .finish(),
            Self::Slide {
                direction,
                duration_ms,
            } => f
                .debug_struct("Transition::Slide")
                .field("direction", direction)
                .field("duration_ms", duration_ms)
                .finish(),
            Self::Scale {
                from,
                to,
                duration_ms,
            } => f
                .debug_struct("Transition::Scale")
                .field("from", from)
                .field("to", to)
                .field("duration_ms", duration_ms)
                .finish(),
            Self::Custom(_) => write!(f, "Transition::Custom(..)"),
        }
    }
}
