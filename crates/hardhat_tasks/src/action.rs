//! Task actions and the handle overrides use to call the action they replace.

use core::future::Future;
use std::sync::Arc;

use futures::future::BoxFuture;
use hardhat_hooks::HookContext;

use crate::error::TaskError;
use crate::parameter::TaskArguments;

/// Result of running a task action.
pub type TaskResult = Result<serde_json::Value, TaskError>;

/// Future returned by task actions.
pub type ActionFuture = BoxFuture<'static, TaskResult>;

/// Type-erased task action.
#[derive(Clone)]
pub struct TaskAction {
    run: Arc<dyn Fn(TaskArguments, HookContext) -> ActionFuture + Send + Sync>,
}

impl core::fmt::Debug for TaskAction {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str("TaskAction")
    }
}

impl TaskAction {
    /// Wraps an async function as a task action.
    pub fn new<F, Fut>(action: F) -> Self
    where
        F: Fn(TaskArguments, HookContext) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = TaskResult> + Send + 'static,
    {
        Self {
            run: Arc::new(move |args, context| -> ActionFuture { Box::pin(action(args, context)) }),
        }
    }

    /// Wraps `action` around `previous`.
    ///
    /// Each call hands the override a [`RunSuper`] bound to `previous` and
    /// the caller's context.
    pub(crate) fn wrap(previous: TaskAction, action: OverrideAction) -> Self {
        Self {
            run: Arc::new(move |args, context: HookContext| -> ActionFuture {
                let run_super = RunSuper {
                    previous: previous.clone(),
                    context: context.clone(),
                };
                (action.run)(args, context, run_super)
            }),
        }
    }

    /// Runs the action.
    pub fn call(&self, args: TaskArguments, context: HookContext) -> ActionFuture {
        (self.run)(args, context)
    }
}

/// Type-erased action of a task override.
#[derive(Clone)]
pub struct OverrideAction {
    run: Arc<dyn Fn(TaskArguments, HookContext, RunSuper) -> ActionFuture + Send + Sync>,
}

impl core::fmt::Debug for OverrideAction {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str("OverrideAction")
    }
}

impl OverrideAction {
    /// Wraps an async function as an override action.
    pub fn new<F, Fut>(action: F) -> Self
    where
        F: Fn(TaskArguments, HookContext, RunSuper) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = TaskResult> + Send + 'static,
    {
        Self {
            run: Arc::new(move |args, context, run_super| -> ActionFuture {
                Box::pin(action(args, context, run_super))
            }),
        }
    }
}

/// Handle to the action an override replaced.
pub struct RunSuper {
    previous: TaskAction,
    context: HookContext,
}

impl RunSuper {
    /// Runs the replaced action with `args` and the caller's context.
    pub fn run(self, args: TaskArguments) -> ActionFuture {
        self.previous.call(args, self.context)
    }
}
