//! The context shared by every context-bearing hook invocation.

use core::fmt;
use std::sync::{Arc, Weak};

use hardhat_config::ResolvedConfig;
use hardhat_params::GlobalArguments;

use crate::interruptions::UserInterruptions;
use crate::manager::HookManager;

/// Read-only view of one runtime environment, handed to hook handlers.
///
/// Created once per environment and installed with
/// [`HookManager::set_context`]. Cloning is cheap and every clone refers to
/// the same environment.
#[derive(Clone)]
pub struct HookContext {
    inner: Arc<ContextInner>,
}

struct ContextInner {
    config: ResolvedConfig,
    global_arguments: GlobalArguments,
    interruptions: UserInterruptions,
    hooks: Weak<HookManager>,
}

impl HookContext {
    /// Creates a context over `hooks`.
    ///
    /// The context keeps only a weak handle to the manager, which in turn
    /// holds the context once installed.
    #[must_use]
    pub fn new(
        config: ResolvedConfig,
        global_arguments: GlobalArguments,
        hooks: &Arc<HookManager>,
    ) -> Self {
        Self {
            inner: Arc::new(ContextInner {
                config,
                global_arguments,
                interruptions: UserInterruptions::new(hooks),
                hooks: Arc::downgrade(hooks),
            }),
        }
    }

    /// The resolved configuration.
    #[must_use]
    pub fn config(&self) -> &ResolvedConfig {
        &self.inner.config
    }

    /// The resolved global arguments.
    #[must_use]
    pub fn global_arguments(&self) -> &GlobalArguments {
        &self.inner.global_arguments
    }

    /// Handle for interacting with the user.
    #[must_use]
    pub fn interruptions(&self) -> &UserInterruptions {
        &self.inner.interruptions
    }

    /// The hook manager, unless the environment has been dropped.
    #[must_use]
    pub fn hooks(&self) -> Option<Arc<HookManager>> {
        self.inner.hooks.upgrade()
    }

    /// Returns whether both handles refer to the same context.
    #[must_use]
    pub fn same_as(&self, other: &HookContext) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }
}

impl fmt::Debug for HookContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HookContext")
            .field("config", &self.inner.config)
            .field("global_arguments", &self.inner.global_arguments)
            .finish_non_exhaustive()
    }
}
