//! Tasks: named, nestable units of work with typed parameters.
//!
//! Plugins and the user contribute [`TaskDefinition`]s. The [`TaskManager`]
//! applies them in order into a tree keyed by [`TaskId`]:
//!
//! - a *new* task declares parameters and an action;
//! - an *empty* task is a namespace for sub-tasks;
//! - an *override* adds parameters to an existing task and wraps its
//!   action, reaching the previous one through [`RunSuper`].
//!
//! Running a task checks the supplied [`TaskArguments`] against its
//! parameters, fills in defaults and calls the action with the runtime's
//! [`HookContext`](hardhat_hooks::HookContext).

/// Task actions.
pub mod action;

/// Task definitions and builders.
pub mod definition;

/// Error types.
pub mod error;

/// Task ids.
pub mod id;

/// The task tree.
pub mod manager;

/// Task parameters and arguments.
pub mod parameter;

pub use action::{ActionFuture, OverrideAction, RunSuper, TaskAction, TaskResult};
pub use definition::{
    NewTaskBuilder, NewTaskDefinition, TaskDefinition, TaskOverrideBuilder, TaskOverrideDefinition,
};
pub use error::TaskError;
pub use id::TaskId;
pub use manager::{PluginTasks, Task, TaskManager};
pub use parameter::{ParameterKind, TaskArgument, TaskArguments, TaskParameter};
