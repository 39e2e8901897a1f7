//! Hook points and hook categories.
//!
//! A hook point is a marker type implementing [`Hook`]. It names its
//! category, its hook name and the argument/output types that every handler
//! and every dispatch call must agree on.
//!
//! Categories are marker types implementing [`HookCategory`]. The category
//! decides whether handlers receive the shared [`HookContext`]: categories
//! whose `Context` is [`NoContext`] are dispatched before a context exists
//! (the built-in [`ConfigHooks`] category is one of them).
//!
//! ```
//! use hardhat_hooks::{Hook, HookCategory, HookContext};
//!
//! pub struct NetworkHooks;
//! impl HookCategory for NetworkHooks {
//!     const NAME: &'static str = "network";
//!     type Context = HookContext;
//! }
//!
//! /// Called before a network connection is opened.
//! pub struct NewConnection;
//! impl Hook for NewConnection {
//!     type Category = NetworkHooks;
//!     const NAME: &'static str = "newConnection";
//!     type Args = String;
//!     type Output = u64;
//! }
//! ```

use crate::context::HookContext;
use crate::error::{HookError, HookResult};
use crate::manager::HookManager;
use core::fmt;

// ─────────────────────────────────────────────────────────────────────────────
// Scopes
// ─────────────────────────────────────────────────────────────────────────────

/// The value handlers of a category receive in front of their arguments.
///
/// Implemented by [`HookContext`] and [`NoContext`].
pub trait HookScope: Clone + Send + Sync + 'static {
    /// Obtains the scope value for dispatching `category` on `hooks`.
    fn acquire(hooks: &HookManager, category: &'static str) -> HookResult<Self>;
}

/// Scope of context-free categories. Handlers never see it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NoContext;

impl HookScope for NoContext {
    fn acquire(_hooks: &HookManager, _category: &'static str) -> HookResult<Self> {
        Ok(NoContext)
    }
}

impl HookScope for HookContext {
    fn acquire(hooks: &HookManager, category: &'static str) -> HookResult<Self> {
        hooks
            .context()
            .ok_or(HookError::ContextUnavailable { category })
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Categories
// ─────────────────────────────────────────────────────────────────────────────

/// A named group of hook points.
pub trait HookCategory: Send + Sync + 'static {
    /// Category name, e.g. `"config"`.
    const NAME: &'static str;

    /// What handlers of this category receive in front of their arguments.
    type Context: HookScope;
}

/// Configuration loading hooks.
///
/// Context-free: configuration is loaded before any context exists.
pub struct ConfigHooks;

impl HookCategory for ConfigHooks {
    const NAME: &'static str = "config";
    type Context = NoContext;
}

/// Runtime environment lifecycle hooks.
pub struct HreHooks;

impl HookCategory for HreHooks {
    const NAME: &'static str = "hre";
    type Context = HookContext;
}

/// Hooks that let plugins take over user interaction.
pub struct UserInterruptionHooks;

impl HookCategory for UserInterruptionHooks {
    const NAME: &'static str = "userInterruptions";
    type Context = HookContext;
}

// ─────────────────────────────────────────────────────────────────────────────
// Hook
// ─────────────────────────────────────────────────────────────────────────────

/// A hook point within a category.
pub trait Hook: Send + Sync + 'static {
    /// The category this hook belongs to.
    type Category: HookCategory;

    /// Hook name, unique within the category.
    const NAME: &'static str;

    /// Arguments passed to every handler.
    ///
    /// Sequential and parallel dispatch hand each handler its own clone.
    type Args: Clone + Send + 'static;

    /// Value produced by each handler.
    type Output: Send + 'static;
}

/// Shorthand for the scope value a hook's handlers receive.
pub type ScopeOf<H> = <<H as Hook>::Category as HookCategory>::Context;

/// `(category, name)` pair identifying a hook point.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct HookId {
    category: &'static str,
    name: &'static str,
}

impl HookId {
    /// Returns the id of hook `H`.
    #[must_use]
    pub fn of<H: Hook>() -> Self {
        Self {
            category: H::Category::NAME,
            name: H::NAME,
        }
    }

    /// The category name.
    #[must_use]
    pub fn category(&self) -> &'static str {
        self.category
    }

    /// The hook name.
    #[must_use]
    pub fn name(&self) -> &'static str {
        self.name
    }
}

impl fmt::Display for HookId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.category, self.name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Extend;
    impl Hook for Extend {
        type Category = ConfigHooks;
        const NAME: &'static str = "extendUserConfig";
        type Args = ();
        type Output = ();
    }

    #[test]
    fn hook_id_uses_category_and_name() {
        let id = HookId::of::<Extend>();
        assert_eq!(id.category(), "config");
        assert_eq!(id.name(), "extendUserConfig");
        assert_eq!(id.to_string(), "config.extendUserConfig");
    }

    #[test]
    fn context_free_scope_is_always_available() {
        let hooks = HookManager::new();
        assert_eq!(NoContext::acquire(&hooks, "config").unwrap(), NoContext);
    }

    #[test]
    fn context_scope_requires_installed_context() {
        let hooks = HookManager::new();
        let err = HookContext::acquire(&hooks, "hre").unwrap_err();
        assert!(matches!(err, HookError::ContextUnavailable { category: "hre" }));
    }
}
