//! User interruptions: messages and input requests routed through hooks.
//!
//! Plugins that own the terminal (or a GUI, or a test harness) take over
//! user interaction by registering chain handlers for the
//! `userInterruptions` hooks. Without handlers, messages are logged and
//! input requests fail.

use std::sync::{Arc, Weak};

use thiserror::Error;
use tokio::sync::Mutex;

use crate::error::{HookError, HookResult};
use crate::hook::{Hook, UserInterruptionHooks};
use crate::manager::HookManager;

/// Shows a message to the user. Args: `(interruptor, message)`.
pub struct DisplayMessage;

impl Hook for DisplayMessage {
    type Category = UserInterruptionHooks;
    const NAME: &'static str = "displayMessage";
    type Args = (String, String);
    type Output = ();
}

/// Asks the user for a value. Args: `(interruptor, description)`.
pub struct RequestInput;

impl Hook for RequestInput {
    type Category = UserInterruptionHooks;
    const NAME: &'static str = "requestInput";
    type Args = (String, String);
    type Output = String;
}

/// Asks the user for a value that must not be echoed. Args: `(interruptor, description)`.
pub struct RequestSecretInput;

impl Hook for RequestSecretInput {
    type Category = UserInterruptionHooks;
    const NAME: &'static str = "requestSecretInput";
    type Args = (String, String);
    type Output = String;
}

/// Errors raised by [`UserInterruptions`].
#[derive(Debug, Error)]
pub enum InterruptionError {
    /// Input was requested but no plugin handles input requests.
    #[error("{interruptor} requested input ({description}), but no input handler is registered")]
    NoInputHandler {
        /// Who asked.
        interruptor: String,
        /// What was asked for.
        description: String,
    },

    /// The hook manager behind this handle no longer exists.
    #[error("the hook manager has been dropped")]
    ManagerDropped,

    /// Hook dispatch failed.
    #[error(transparent)]
    Hook(#[from] HookError),
}

impl InterruptionError {
    /// Unwraps interruption errors that travelled through the hook chain as handler errors.
    fn from_hook(error: HookError) -> Self {
        match error {
            HookError::Handler(source) => match source.downcast::<InterruptionError>() {
                Ok(interruption) => *interruption,
                Err(source) => Self::Hook(HookError::Handler(source)),
            },
            other => Self::Hook(other),
        }
    }
}

/// Serialized access to the user.
///
/// At most one interruption runs at a time; a second caller waits until the
/// first one completes. Handlers must not start another interruption
/// themselves, as that would wait on itself.
#[derive(Debug, Clone)]
pub struct UserInterruptions {
    hooks: Weak<HookManager>,
    lock: Arc<Mutex<()>>,
}

impl UserInterruptions {
    pub(crate) fn new(hooks: &Arc<HookManager>) -> Self {
        Self {
            hooks: Arc::downgrade(hooks),
            lock: Arc::new(Mutex::new(())),
        }
    }

    fn manager(&self) -> Result<Arc<HookManager>, InterruptionError> {
        self.hooks.upgrade().ok_or(InterruptionError::ManagerDropped)
    }

    /// Shows `message` to the user on behalf of `interruptor`.
    ///
    /// # Errors
    ///
    /// Errors raised by a `displayMessage` handler.
    pub async fn display_message(
        &self,
        interruptor: &str,
        message: &str,
    ) -> Result<(), InterruptionError> {
        let hooks = self.manager()?;
        let _guard = self.lock.lock().await;
        hooks
            .run_handler_chain::<DisplayMessage, _>(
                (interruptor.to_owned(), message.to_owned()),
                |_, (interruptor, message)| async move {
                    tracing::info!(%interruptor, "{message}");
                    Ok(())
                },
            )
            .await
            .map_err(InterruptionError::from_hook)
    }

    /// Requests a value from the user.
    ///
    /// # Errors
    ///
    /// [`InterruptionError::NoInputHandler`] when no plugin handles input,
    /// or errors raised by a `requestInput` handler.
    pub async fn request_input(
        &self,
        interruptor: &str,
        description: &str,
    ) -> Result<String, InterruptionError> {
        let hooks = self.manager()?;
        let _guard = self.lock.lock().await;
        hooks
            .run_handler_chain::<RequestInput, _>(
                (interruptor.to_owned(), description.to_owned()),
                |_, (interruptor, description)| async move {
                    no_input_handler(interruptor, description)
                },
            )
            .await
            .map_err(InterruptionError::from_hook)
    }

    /// Requests a secret value from the user.
    ///
    /// # Errors
    ///
    /// [`InterruptionError::NoInputHandler`] when no plugin handles input,
    /// or errors raised by a `requestSecretInput` handler.
    pub async fn request_secret_input(
        &self,
        interruptor: &str,
        description: &str,
    ) -> Result<String, InterruptionError> {
        let hooks = self.manager()?;
        let _guard = self.lock.lock().await;
        hooks
            .run_handler_chain::<RequestSecretInput, _>(
                (interruptor.to_owned(), description.to_owned()),
                |_, (interruptor, description)| async move {
                    no_input_handler(interruptor, description)
                },
            )
            .await
            .map_err(InterruptionError::from_hook)
    }
}

fn no_input_handler(interruptor: String, description: String) -> HookResult<String> {
    Err(HookError::handler(InterruptionError::NoInputHandler {
        interruptor,
        description,
    }))
}
