//! Error and future types shared by hook handlers and the dispatcher.

use futures::future::BoxFuture;
use thiserror::Error;

/// Boxed error produced by plugin code.
pub type BoxError = Box<dyn core::error::Error + Send + Sync + 'static>;

/// Result of a hook handler or a dispatch call.
pub type HookResult<T> = Result<T, HookError>;

/// Future returned by hook handlers and default implementations.
pub type HookFuture<T> = BoxFuture<'static, HookResult<T>>;

/// Errors surfaced by hook dispatch.
///
/// Handler failures travel as [`HookError::Handler`] and reach the dispatch
/// caller exactly as the handler produced them.
#[derive(Debug, Error)]
pub enum HookError {
    /// A context-bearing hook was dispatched before a context was installed.
    #[error("hooks of category '{category}' need a hook context, but none has been set")]
    ContextUnavailable {
        /// The category that was dispatched.
        category: &'static str,
    },

    /// A hook context was installed on a manager that already has one.
    #[error("a hook context is already installed and cannot be replaced")]
    ContextAlreadySet,

    /// Two different hook types were declared under the same category and name.
    #[error("hook '{category}.{name}' is already registered with a different type")]
    HandlerTypeMismatch {
        /// The hook category.
        category: &'static str,
        /// The hook name.
        name: &'static str,
    },

    /// Error raised by plugin handler code.
    #[error(transparent)]
    Handler(BoxError),
}

impl HookError {
    /// Wraps an error raised inside a handler.
    pub fn handler(error: impl Into<BoxError>) -> Self {
        Self::Handler(error.into())
    }
}
