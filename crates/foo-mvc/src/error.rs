//! Error types for dispatching.

use thiserror::Error;

/// Dispatcher errors.
#[derive(Debug, Error)]
pub enum DispatchError {
    /// The route table failed to compile.
    #[error("route error: {0}")]
    Route(#[from] foo_router::RouteError),

    /// No route matched and no fallback target could be derived.
    #[error("no route matched: {path}")]
    NotFound {
        /// The request path.
        path: String,
    },

    /// The resolved controller is not registered.
    #[error("controller not registered: {0}")]
    ControllerNotRegistered(String),

    /// The view selected for rendering is not registered.
    #[error("view not registered: {0}")]
    ViewNotRegistered(String),

    /// A controller forwarded back to one already running.
    #[error("forward loop: {}", .chain.join(" -> "))]
    ForwardLoop {
        /// Active controllers, outermost first, ending with the repeated one.
        chain: Vec<String>,
    },

    /// A controller action failed.
    #[error("controller error: {0}")]
    Controller(String),

    /// A view failed to render.
    #[error("view error: {0}")]
    View(String),
}

impl DispatchError {
    /// Creates a controller error.
    pub fn controller(message: impl Into<String>) -> Self {
        Self::Controller(message.into())
    }

    /// Creates a view error.
    pub fn view(message: impl Into<String>) -> Self {
        Self::View(message.into())
    }

    /// Returns true if this error means "nothing to serve here".
    #[must_use]
    pub const fn is_not_found(&self) -> bool {
        matches!(
            self,
            Self::NotFound { .. } | Self::ControllerNotRegistered(_) | Self::ViewNotRegistered(_)
        )
    }
}

/// Result type alias for dispatch operations.
pub type Result<T> = std::result::Result<T, DispatchError>;
