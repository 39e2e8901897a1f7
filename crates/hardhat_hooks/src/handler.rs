//! Handler storage and the chain continuation.

use std::sync::Arc;

use downcast_rs::{DowncastSync, impl_downcast};

use crate::error::HookFuture;
use crate::hook::{Hook, ScopeOf};

/// Type-erased chain handler of hook `H`.
pub(crate) type ChainFn<H> = Arc<
    dyn Fn(ScopeOf<H>, <H as Hook>::Args, Next<H>) -> HookFuture<<H as Hook>::Output>
        + Send
        + Sync,
>;

/// Type-erased plain handler of hook `H`, used by sequential and parallel dispatch.
pub(crate) type PlainFn<H> =
    Arc<dyn Fn(ScopeOf<H>, <H as Hook>::Args) -> HookFuture<<H as Hook>::Output> + Send + Sync>;

/// Innermost step of a chain.
pub(crate) type DefaultFn<H> =
    Box<dyn FnOnce(ScopeOf<H>, <H as Hook>::Args) -> HookFuture<<H as Hook>::Output> + Send>;

// ─────────────────────────────────────────────────────────────────────────────
// Next
// ─────────────────────────────────────────────────────────────────────────────

/// Continuation handed to chain handlers.
///
/// Calling [`run`](Next::run) invokes the next-inner handler, or the default
/// implementation once every handler has been entered. A handler that drops
/// its `Next` without running it short-circuits the rest of the chain.
pub struct Next<H: Hook> {
    scope: ScopeOf<H>,
    /// Handlers not yet entered, oldest first. The last one runs next.
    remaining: Vec<ChainFn<H>>,
    default: DefaultFn<H>,
}

impl<H: Hook> Next<H> {
    pub(crate) fn new(
        scope: ScopeOf<H>,
        remaining: Vec<ChainFn<H>>,
        default: DefaultFn<H>,
    ) -> Self {
        Self {
            scope,
            remaining,
            default,
        }
    }

    /// Runs the rest of the chain with `args`.
    pub fn run(mut self, args: H::Args) -> HookFuture<H::Output> {
        match self.remaining.pop() {
            Some(handler) => {
                let scope = self.scope.clone();
                handler(scope, args, self)
            }
            None => (self.default)(self.scope, args),
        }
    }

    /// Number of handlers that have not been entered yet.
    #[must_use]
    pub fn remaining(&self) -> usize {
        self.remaining.len()
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// HandlerSet
// ─────────────────────────────────────────────────────────────────────────────

pub(crate) struct Entry<F> {
    pub(crate) owner: Arc<str>,
    pub(crate) handler: F,
}

/// Handlers of one hook point, in registration order.
pub(crate) struct HandlerSet<H: Hook> {
    pub(crate) chained: Vec<Entry<ChainFn<H>>>,
    pub(crate) plain: Vec<Entry<PlainFn<H>>>,
}

impl<H: Hook> Default for HandlerSet<H> {
    fn default() -> Self {
        Self {
            chained: Vec::new(),
            plain: Vec::new(),
        }
    }
}

impl<H: Hook> HandlerSet<H> {
    pub(crate) fn chain_snapshot(&self) -> Vec<ChainFn<H>> {
        self.chained
            .iter()
            .map(|entry| Arc::clone(&entry.handler))
            .collect()
    }

    pub(crate) fn plain_snapshot(&self) -> Vec<PlainFn<H>> {
        self.plain
            .iter()
            .map(|entry| Arc::clone(&entry.handler))
            .collect()
    }
}

/// Object-safe view of a [`HandlerSet`] so sets of different hooks share one table.
pub(crate) trait ErasedHandlerSet: DowncastSync {
    /// Removes every handler registered by `owner`, returning how many were removed.
    fn remove_owner(&mut self, owner: &str) -> usize;

    /// Total number of handlers.
    fn len(&self) -> usize;
}

impl_downcast!(sync ErasedHandlerSet);

impl<H: Hook> ErasedHandlerSet for HandlerSet<H> {
    fn remove_owner(&mut self, owner: &str) -> usize {
        let before = self.len();
        self.chained.retain(|entry| &*entry.owner != owner);
        self.plain.retain(|entry| &*entry.owner != owner);
        before - self.len()
    }

    fn len(&self) -> usize {
        self.chained.len() + self.plain.len()
    }
}
