//! Error types for task definition and execution.

use hardhat_hooks::BoxError;
use hardhat_params::{ParameterError, ParameterType};
use thiserror::Error;

use crate::id::TaskId;

/// Errors raised while building the task tree or running a task.
#[derive(Debug, Error)]
pub enum TaskError {
    /// A task id had no segments, or an empty segment.
    #[error("invalid task id '{id}': ids need at least one segment and no empty segments")]
    InvalidTaskId {
        /// The rejected id, segments joined by spaces.
        id: String,
    },

    /// A task with this id already exists.
    #[error("task '{task}' is already defined{}", defined_by_suffix(.defined_by.as_deref()))]
    TaskAlreadyDefined {
        /// The task id.
        task: TaskId,
        /// Plugin that defined it first, if any.
        defined_by: Option<String>,
    },

    /// A sub-task was defined before its parent.
    #[error("task '{task}' is a sub-task of '{parent}', which is not defined")]
    SubtaskWithoutParent {
        /// The sub-task.
        task: TaskId,
        /// The missing parent.
        parent: TaskId,
    },

    /// No task exists with this id.
    #[error("task '{task}' is not defined")]
    TaskNotFound {
        /// The requested id.
        task: TaskId,
    },

    /// An empty task has no action to run.
    #[error("task '{task}' is a namespace and cannot be run")]
    EmptyTask {
        /// The task id.
        task: TaskId,
    },

    /// Empty tasks have no action to override.
    #[error("task '{task}' is a namespace and cannot be overridden")]
    CannotOverrideEmptyTask {
        /// The task id.
        task: TaskId,
    },

    /// Two parameters of one task share a name.
    #[error("parameter '{name}' is already defined on task '{task}'")]
    ParameterAlreadyDefined {
        /// The task id.
        task: TaskId,
        /// The parameter name.
        name: String,
    },

    /// A task parameter shadows a global parameter.
    #[error(
        "parameter '{name}' of task '{task}' clashes with the global parameter of the same name"
    )]
    ClashesWithGlobalParameter {
        /// The task id.
        task: TaskId,
        /// The parameter name.
        name: String,
    },

    /// A positional parameter follows an optional or variadic one.
    #[error(
        "positional parameter '{name}' of task '{task}' comes after an optional or variadic positional parameter"
    )]
    InvalidPositionalOrder {
        /// The task id.
        task: TaskId,
        /// The misplaced parameter.
        name: String,
    },

    /// A parameter name or default value is invalid.
    #[error("task '{task}': {source}")]
    InvalidParameter {
        /// The task id.
        task: TaskId,
        /// What is wrong.
        #[source]
        source: ParameterError,
    },

    /// An argument was supplied for a parameter the task does not have.
    #[error("task '{task}' has no parameter '{name}'")]
    UnknownArgument {
        /// The task id.
        task: TaskId,
        /// The unknown name.
        name: String,
    },

    /// A required argument was not supplied.
    #[error("task '{task}' requires argument '{name}'")]
    MissingArgument {
        /// The task id.
        task: TaskId,
        /// The missing parameter.
        name: String,
    },

    /// A supplied argument does not match the parameter's type.
    #[error("argument '{name}' of task '{task}' must be of type {expected}")]
    InvalidArgumentType {
        /// The task id.
        task: TaskId,
        /// The parameter name.
        name: String,
        /// The declared type.
        expected: ParameterType,
    },

    /// Error raised by a task action.
    #[error(transparent)]
    Action(BoxError),
}

impl TaskError {
    /// Wraps an error raised inside a task action.
    pub fn action(error: impl Into<BoxError>) -> Self {
        Self::Action(error.into())
    }
}

fn defined_by_suffix(defined_by: Option<&str>) -> String {
    defined_by.map_or_else(String::new, |plugin| format!(" by plugin '{plugin}'"))
}
