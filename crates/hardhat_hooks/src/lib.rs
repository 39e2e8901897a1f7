//! Hook manager for the task runner.
//!
//! Plugins extend lifecycle events by registering handlers for typed hook
//! points. The [`HookManager`] stores them per `(category, name)` and offers
//! three ways to dispatch:
//!
//! | Dispatch | Handlers | Result |
//! |----------|----------|--------|
//! | [`run_handler_chain`](HookManager::run_handler_chain) | chain, onion-style around a default | single value |
//! | [`run_sequential_handlers`](HookManager::run_sequential_handlers) | plain, one at a time | list |
//! | [`run_parallel_handlers`](HookManager::run_parallel_handlers) | plain, concurrently | list |
//!
//! All three walk handlers most-recently-registered first. Handlers of
//! every category except `config` receive the shared [`HookContext`].

/// Handler context.
pub mod context;

/// Error types.
pub mod error;

/// Handler storage and the chain continuation.
pub mod handler;

/// Hook and category traits.
pub mod hook;

/// User interruption hooks.
pub mod interruptions;

/// The hook manager.
pub mod manager;

pub use context::HookContext;
pub use error::{BoxError, HookError, HookFuture, HookResult};
pub use handler::Next;
pub use hook::{
    ConfigHooks, Hook, HookCategory, HookId, HookScope, HreHooks, NoContext, ScopeOf,
    UserInterruptionHooks,
};
pub use interruptions::{
    DisplayMessage, InterruptionError, RequestInput, RequestSecretInput, UserInterruptions,
};
pub use manager::{HookManager, HookRegistrar};
