//! The hook manager: handler registry and the three dispatch primitives.
//!
//! Handlers are stored per [`HookId`] in registration order. Every dispatch
//! primitive walks them most-recently-registered first:
//!
//! - [`run_handler_chain`](HookManager::run_handler_chain) composes chain
//!   handlers onion-style around a default implementation;
//! - [`run_sequential_handlers`](HookManager::run_sequential_handlers) awaits
//!   each plain handler before starting the next;
//! - [`run_parallel_handlers`](HookManager::run_parallel_handlers) polls all
//!   plain handlers concurrently and fails as soon as one fails.
//!
//! # Locking
//!
//! The handler table is guarded by a [`RwLock`]. Dispatch clones the handler
//! `Arc`s out of the table and releases the lock before awaiting anything, so
//! handlers may register or unregister other handlers while running.
//!
//! # Example
//!
//! ```
//! use hardhat_hooks::{ConfigHooks, Hook, HookManager};
//!
//! struct Greeting;
//! impl Hook for Greeting {
//!     type Category = ConfigHooks;
//!     const NAME: &'static str = "greeting";
//!     type Args = String;
//!     type Output = String;
//! }
//!
//! # futures::executor::block_on(async {
//! let hooks = HookManager::new();
//! hooks
//!     .registrar("shouting-plugin")
//!     .register_config_chain::<Greeting, _>(|name, next| async move {
//!         let inner = next.run(name).await?;
//!         Ok(inner.to_uppercase())
//!     })
//!     .unwrap();
//!
//! let greeting = hooks
//!     .run_config_handler_chain::<Greeting, _>("world".to_string(), |name| async move {
//!         Ok(format!("hello {name}"))
//!     })
//!     .await
//!     .unwrap();
//! assert_eq!(greeting, "HELLO WORLD");
//! # });
//! ```

use core::fmt;
use core::future::Future;
use std::sync::{Arc, OnceLock};

use futures::future::try_join_all;
use hashbrown::HashMap;
use parking_lot::RwLock;

use crate::context::HookContext;
use crate::error::{HookError, HookFuture, HookResult};
use crate::handler::{ChainFn, DefaultFn, Entry, ErasedHandlerSet, HandlerSet, Next, PlainFn};
use crate::hook::{ConfigHooks, Hook, HookCategory, HookId, HookScope, NoContext, ScopeOf};

// ─────────────────────────────────────────────────────────────────────────────
// HookManager
// ─────────────────────────────────────────────────────────────────────────────

/// Registry of hook handlers and dispatcher over them.
///
/// Shared as `Arc<HookManager>`; every method takes `&self`.
#[derive(Default)]
pub struct HookManager {
    handlers: RwLock<HashMap<HookId, Box<dyn ErasedHandlerSet>>>,
    context: OnceLock<HookContext>,
}

impl fmt::Debug for HookManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let handlers = self.handlers.read();
        f.debug_struct("HookManager")
            .field("hooks", &handlers.len())
            .field("has_context", &self.context.get().is_some())
            .finish()
    }
}

impl HookManager {
    /// Creates a manager with no handlers and no context.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a registrar that records `owner` on every handler it registers.
    pub fn registrar(&self, owner: impl Into<Arc<str>>) -> HookRegistrar<'_> {
        HookRegistrar {
            manager: self,
            owner: owner.into(),
        }
    }

    /// Registers a batch of handlers on behalf of `owner`.
    ///
    /// May be called at any point after construction. Handlers registered
    /// here are newer than everything registered before and therefore
    /// dispatch first.
    pub fn register_handlers<F>(&self, owner: impl Into<Arc<str>>, register: F) -> HookResult<()>
    where
        F: FnOnce(&HookRegistrar<'_>) -> HookResult<()>,
    {
        let registrar = self.registrar(owner);
        register(&registrar)
    }

    /// Removes every handler registered by `owner` and returns how many were removed.
    pub fn unregister_handlers(&self, owner: &str) -> usize {
        let mut handlers = self.handlers.write();
        let removed: usize = handlers
            .values_mut()
            .map(|set| set.remove_owner(owner))
            .sum();
        tracing::debug!(owner, removed, "unregistered hook handlers");
        removed
    }

    /// Installs the context threaded into context-bearing dispatch.
    ///
    /// The context can be installed once; it then lives as long as the
    /// manager.
    ///
    /// # Errors
    ///
    /// [`HookError::ContextAlreadySet`] if a context is already installed.
    /// The installed context is kept.
    pub fn set_context(&self, context: HookContext) -> HookResult<()> {
        self.context
            .set(context)
            .map_err(|_| HookError::ContextAlreadySet)
    }

    /// Returns the installed context, if any.
    #[must_use]
    pub fn context(&self) -> Option<HookContext> {
        self.context.get().cloned()
    }

    /// Number of handlers (chain and plain) registered for `category.name`.
    #[must_use]
    pub fn handler_count(&self, category: &str, name: &str) -> usize {
        self.handlers
            .read()
            .iter()
            .find(|(id, _)| id.category() == category && id.name() == name)
            .map_or(0, |(_, set)| set.len())
    }

    /// Returns whether any handler is registered for hook `H`.
    #[must_use]
    pub fn has_handlers<H: Hook>(&self) -> bool {
        self.handlers
            .read()
            .get(&HookId::of::<H>())
            .is_some_and(|set| set.len() > 0)
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Dispatch
    // ─────────────────────────────────────────────────────────────────────────

    /// Runs the chain of a context-bearing hook around `default`.
    ///
    /// The most recently registered handler runs outermost. With no handlers
    /// this is `default(context, args)`.
    ///
    /// # Errors
    ///
    /// [`HookError::ContextUnavailable`] if no context is installed, or
    /// whatever error a handler or `default` returns.
    pub async fn run_handler_chain<H, Fut>(
        &self,
        args: H::Args,
        default: impl FnOnce(HookContext, H::Args) -> Fut + Send + 'static,
    ) -> HookResult<H::Output>
    where
        H: Hook,
        H::Category: HookCategory<Context = HookContext>,
        Fut: Future<Output = HookResult<H::Output>> + Send + 'static,
    {
        let default: DefaultFn<H> = Box::new(move |context, args| -> HookFuture<H::Output> {
            Box::pin(default(context, args))
        });
        self.run_chain::<H>(args, default).await
    }

    /// Runs the chain of a `config` hook around `default`.
    ///
    /// Config hooks carry no context, so this works before any context exists.
    ///
    /// # Errors
    ///
    /// Whatever error a handler or `default` returns.
    pub async fn run_config_handler_chain<H, Fut>(
        &self,
        args: H::Args,
        default: impl FnOnce(H::Args) -> Fut + Send + 'static,
    ) -> HookResult<H::Output>
    where
        H: Hook<Category = ConfigHooks>,
        Fut: Future<Output = HookResult<H::Output>> + Send + 'static,
    {
        let default: DefaultFn<H> = Box::new(move |NoContext, args| -> HookFuture<H::Output> {
            Box::pin(default(args))
        });
        self.run_chain::<H>(args, default).await
    }

    async fn run_chain<H: Hook>(
        &self,
        args: H::Args,
        default: DefaultFn<H>,
    ) -> HookResult<H::Output> {
        let scope = <ScopeOf<H> as HookScope>::acquire(self, H::Category::NAME)?;
        let handlers = self.snapshot::<H, _>(HandlerSet::<H>::chain_snapshot)?;
        tracing::trace!(
            category = H::Category::NAME,
            hook = H::NAME,
            handlers = handlers.len(),
            "running handler chain"
        );
        Next::new(scope, handlers, default).run(args).await
    }

    /// Runs every plain handler of `H` one after another, most recent first.
    ///
    /// Each handler gets its own clone of `args` and is awaited before the
    /// next starts. Results are returned in call order.
    ///
    /// # Errors
    ///
    /// [`HookError::ContextUnavailable`] for a context-bearing category with
    /// no context installed, or the first handler error (later handlers are
    /// not run).
    pub async fn run_sequential_handlers<H: Hook>(
        &self,
        args: H::Args,
    ) -> HookResult<Vec<H::Output>> {
        let scope = <ScopeOf<H> as HookScope>::acquire(self, H::Category::NAME)?;
        let handlers = self.snapshot::<H, _>(HandlerSet::<H>::plain_snapshot)?;
        tracing::trace!(
            category = H::Category::NAME,
            hook = H::NAME,
            handlers = handlers.len(),
            "running sequential handlers"
        );

        let mut results = Vec::with_capacity(handlers.len());
        for handler in handlers.iter().rev() {
            results.push(handler(scope.clone(), args.clone()).await?);
        }
        Ok(results)
    }

    /// Runs every plain handler of `H` concurrently.
    ///
    /// Results are ordered most recent handler first, like
    /// [`run_sequential_handlers`](Self::run_sequential_handlers), whatever
    /// the completion order.
    ///
    /// # Errors
    ///
    /// [`HookError::ContextUnavailable`] for a context-bearing category with
    /// no context installed, or the first handler error to surface; the
    /// remaining handler futures are dropped.
    pub async fn run_parallel_handlers<H: Hook>(
        &self,
        args: H::Args,
    ) -> HookResult<Vec<H::Output>> {
        let scope = <ScopeOf<H> as HookScope>::acquire(self, H::Category::NAME)?;
        let handlers = self.snapshot::<H, _>(HandlerSet::<H>::plain_snapshot)?;
        tracing::trace!(
            category = H::Category::NAME,
            hook = H::NAME,
            handlers = handlers.len(),
            "running parallel handlers"
        );

        try_join_all(
            handlers
                .iter()
                .rev()
                .map(|handler| handler(scope.clone(), args.clone())),
        )
        .await
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Internals
    // ─────────────────────────────────────────────────────────────────────────

    /// Clones handlers of `H` out of the table; the lock is released on return.
    fn snapshot<H: Hook, T>(
        &self,
        take: impl FnOnce(&HandlerSet<H>) -> Vec<T>,
    ) -> HookResult<Vec<T>> {
        let handlers = self.handlers.read();
        match handlers.get(&HookId::of::<H>()) {
            None => Ok(Vec::new()),
            Some(set) => set
                .downcast_ref::<HandlerSet<H>>()
                .map(take)
                .ok_or_else(type_mismatch::<H>),
        }
    }

    fn insert<H: Hook>(&self, add: impl FnOnce(&mut HandlerSet<H>)) -> HookResult<()> {
        let mut handlers = self.handlers.write();
        let set = handlers
            .entry(HookId::of::<H>())
            .or_insert_with(|| Box::new(HandlerSet::<H>::default()));
        let set = set
            .downcast_mut::<HandlerSet<H>>()
            .ok_or_else(type_mismatch::<H>)?;
        add(set);
        Ok(())
    }
}

fn type_mismatch<H: Hook>() -> HookError {
    HookError::HandlerTypeMismatch {
        category: H::Category::NAME,
        name: H::NAME,
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// HookRegistrar
// ─────────────────────────────────────────────────────────────────────────────

/// Registers handlers on a [`HookManager`] on behalf of one owner.
///
/// Every method returns `&Self` so registrations can be chained with `?`.
pub struct HookRegistrar<'a> {
    manager: &'a HookManager,
    owner: Arc<str>,
}

impl HookRegistrar<'_> {
    /// The owner recorded on registered handlers.
    #[must_use]
    pub fn owner(&self) -> &str {
        &self.owner
    }

    /// Registers a chain handler for a context-bearing hook.
    ///
    /// The handler receives the hook context, the arguments and the
    /// continuation. Not calling [`Next::run`] short-circuits the chain.
    ///
    /// # Errors
    ///
    /// [`HookError::HandlerTypeMismatch`] if another hook type already uses
    /// the same category and name.
    pub fn register_chain<H, Fut>(
        &self,
        handler: impl Fn(HookContext, H::Args, Next<H>) -> Fut + Send + Sync + 'static,
    ) -> HookResult<&Self>
    where
        H: Hook,
        H::Category: HookCategory<Context = HookContext>,
        Fut: Future<Output = HookResult<H::Output>> + Send + 'static,
    {
        let handler: ChainFn<H> =
            Arc::new(move |context, args, next| -> HookFuture<H::Output> {
                Box::pin(handler(context, args, next))
            });
        self.add_chain::<H>(handler)
    }

    /// Registers a chain handler for a `config` hook.
    ///
    /// # Errors
    ///
    /// [`HookError::HandlerTypeMismatch`] if another hook type already uses
    /// the same category and name.
    pub fn register_config_chain<H, Fut>(
        &self,
        handler: impl Fn(H::Args, Next<H>) -> Fut + Send + Sync + 'static,
    ) -> HookResult<&Self>
    where
        H: Hook<Category = ConfigHooks>,
        Fut: Future<Output = HookResult<H::Output>> + Send + 'static,
    {
        let handler: ChainFn<H> =
            Arc::new(move |NoContext, args, next| -> HookFuture<H::Output> {
                Box::pin(handler(args, next))
            });
        self.add_chain::<H>(handler)
    }

    /// Registers a plain handler for a context-bearing hook, used by
    /// sequential and parallel dispatch.
    ///
    /// # Errors
    ///
    /// [`HookError::HandlerTypeMismatch`] if another hook type already uses
    /// the same category and name.
    pub fn register<H, Fut>(
        &self,
        handler: impl Fn(HookContext, H::Args) -> Fut + Send + Sync + 'static,
    ) -> HookResult<&Self>
    where
        H: Hook,
        H::Category: HookCategory<Context = HookContext>,
        Fut: Future<Output = HookResult<H::Output>> + Send + 'static,
    {
        let handler: PlainFn<H> = Arc::new(move |context, args| -> HookFuture<H::Output> {
            Box::pin(handler(context, args))
        });
        self.add_plain::<H>(handler)
    }

    /// Registers a plain handler for a `config` hook.
    ///
    /// # Errors
    ///
    /// [`HookError::HandlerTypeMismatch`] if another hook type already uses
    /// the same category and name.
    pub fn register_config<H, Fut>(
        &self,
        handler: impl Fn(H::Args) -> Fut + Send + Sync + 'static,
    ) -> HookResult<&Self>
    where
        H: Hook<Category = ConfigHooks>,
        Fut: Future<Output = HookResult<H::Output>> + Send + 'static,
    {
        let handler: PlainFn<H> = Arc::new(move |NoContext, args| -> HookFuture<H::Output> {
            Box::pin(handler(args))
        });
        self.add_plain::<H>(handler)
    }

    fn add_chain<H: Hook>(&self, handler: ChainFn<H>) -> HookResult<&Self> {
        let owner = Arc::clone(&self.owner);
        self.manager
            .insert::<H>(|set| set.chained.push(Entry { owner, handler }))?;
        tracing::debug!(
            owner = %self.owner,
            category = H::Category::NAME,
            hook = H::NAME,
            "registered chain handler"
        );
        Ok(self)
    }

    fn add_plain<H: Hook>(&self, handler: PlainFn<H>) -> HookResult<&Self> {
        let owner = Arc::clone(&self.owner);
        self.manager
            .insert::<H>(|set| set.plain.push(Entry { owner, handler }))?;
        tracing::debug!(
            owner = %self.owner,
            category = H::Category::NAME,
            hook = H::NAME,
            "registered handler"
        );
        Ok(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hook::HreHooks;

    struct Counted;
    impl Hook for Counted {
        type Category = ConfigHooks;
        const NAME: &'static str = "counted";
        type Args = ();
        type Output = ();
    }

    // Same category and name as `Counted`, different types.
    struct Impostor;
    impl Hook for Impostor {
        type Category = ConfigHooks;
        const NAME: &'static str = "counted";
        type Args = u8;
        type Output = u8;
    }

    struct Lifecycle;
    impl Hook for Lifecycle {
        type Category = HreHooks;
        const NAME: &'static str = "lifecycle";
        type Args = ();
        type Output = ();
    }

    #[test]
    fn registration_increments_count() {
        let hooks = HookManager::new();
        assert_eq!(hooks.handler_count("config", "counted"), 0);
        assert!(!hooks.has_handlers::<Counted>());

        hooks
            .registrar("a")
            .register_config::<Counted, _>(|()| async { Ok(()) })
            .unwrap()
            .register_config_chain::<Counted, _>(|(), next| next.run(()))
            .unwrap();

        assert_eq!(hooks.handler_count("config", "counted"), 2);
        assert!(hooks.has_handlers::<Counted>());
    }

    #[test]
    fn conflicting_hook_types_are_rejected() {
        let hooks = HookManager::new();
        hooks
            .registrar("a")
            .register_config::<Counted, _>(|()| async { Ok(()) })
            .unwrap();

        let err = hooks
            .registrar("b")
            .register_config::<Impostor, _>(|n| async move { Ok(n) })
            .err()
            .unwrap();
        assert!(matches!(
            err,
            HookError::HandlerTypeMismatch {
                category: "config",
                name: "counted"
            }
        ));
    }

    #[test]
    fn unregister_removes_only_owner_handlers() {
        let hooks = HookManager::new();
        hooks
            .register_handlers("a", |registrar| {
                registrar
                    .register_config::<Counted, _>(|()| async { Ok(()) })?
                    .register::<Lifecycle, _>(|_, ()| async { Ok(()) })?;
                Ok(())
            })
            .unwrap();
        hooks
            .registrar("b")
            .register_config::<Counted, _>(|()| async { Ok(()) })
            .unwrap();

        assert_eq!(hooks.unregister_handlers("a"), 2);
        assert_eq!(hooks.handler_count("config", "counted"), 1);
        assert_eq!(hooks.handler_count("hre", "lifecycle"), 0);
        assert_eq!(hooks.unregister_handlers("a"), 0);
    }
}
