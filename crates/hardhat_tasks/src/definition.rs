//! Task definitions as contributed by plugins and users.
//!
//! ```
//! use hardhat_params::ParameterType;
//! use hardhat_tasks::{TaskDefinition, TaskId};
//!
//! let greet = TaskDefinition::task(TaskId::parse("greet").unwrap())
//!     .description("Prints a greeting")
//!     .option("greeting", "What to say", "hello")
//!     .positional("name", "Who to greet", ParameterType::String)
//!     .action(|args, _context| async move {
//!         let greeting = args.get_str("greeting").unwrap_or_default();
//!         let name = args.get_str("name").unwrap_or_default();
//!         Ok(serde_json::json!(format!("{greeting} {name}")))
//!     });
//!
//! assert_eq!(greet.id().to_string(), "greet");
//! ```

use core::future::Future;

use hardhat_hooks::HookContext;
use hardhat_params::{ParameterType, ParameterValue};

use crate::action::{OverrideAction, RunSuper, TaskAction, TaskResult};
use crate::id::TaskId;
use crate::parameter::{ParameterKind, TaskArgument, TaskArguments, TaskParameter};

/// One entry of a plugin's or the user's task list.
#[derive(Debug, Clone)]
pub enum TaskDefinition {
    /// A namespace for sub-tasks, without an action.
    Empty {
        /// The task id.
        id: TaskId,
        /// Help text.
        description: String,
    },
    /// A new runnable task.
    New(NewTaskDefinition),
    /// Changes to an existing task.
    Override(TaskOverrideDefinition),
}

impl TaskDefinition {
    /// Starts a new runnable task.
    #[must_use]
    pub fn task(id: TaskId) -> NewTaskBuilder {
        NewTaskBuilder {
            id,
            description: String::new(),
            parameters: Vec::new(),
        }
    }

    /// Declares a namespace task.
    #[must_use]
    pub fn empty(id: TaskId, description: impl Into<String>) -> Self {
        Self::Empty {
            id,
            description: description.into(),
        }
    }

    /// Starts an override of an existing task.
    #[must_use]
    pub fn override_task(id: TaskId) -> TaskOverrideBuilder {
        TaskOverrideBuilder {
            id,
            description: None,
            parameters: Vec::new(),
        }
    }

    /// The id this definition applies to.
    #[must_use]
    pub fn id(&self) -> &TaskId {
        match self {
            Self::Empty { id, .. } => id,
            Self::New(definition) => &definition.id,
            Self::Override(definition) => &definition.id,
        }
    }
}

/// A new runnable task.
#[derive(Debug, Clone)]
pub struct NewTaskDefinition {
    pub(crate) id: TaskId,
    pub(crate) description: String,
    pub(crate) parameters: Vec<TaskParameter>,
    pub(crate) action: TaskAction,
}

/// Additions to an existing task and the action wrapping its current one.
#[derive(Debug, Clone)]
pub struct TaskOverrideDefinition {
    pub(crate) id: TaskId,
    pub(crate) description: Option<String>,
    pub(crate) parameters: Vec<TaskParameter>,
    pub(crate) action: OverrideAction,
}

// ─────────────────────────────────────────────────────────────────────────────
// Builders
// ─────────────────────────────────────────────────────────────────────────────

macro_rules! impl_parameter_methods {
    ($builder:ident) => {
        impl $builder {
            /// Adds a named option; its type is the type of `default`.
            #[must_use]
            pub fn option(
                self,
                name: impl Into<String>,
                description: impl Into<String>,
                default: impl Into<ParameterValue>,
            ) -> Self {
                let default = default.into();
                let parameter_type = default.parameter_type();
                self.parameter(
                    name,
                    description,
                    ParameterKind::Option,
                    parameter_type,
                    Some(TaskArgument::Value(default)),
                )
            }

            /// Adds a boolean flag defaulting to `false`.
            #[must_use]
            pub fn flag(self, name: impl Into<String>, description: impl Into<String>) -> Self {
                self.parameter(
                    name,
                    description,
                    ParameterKind::Flag,
                    ParameterType::Boolean,
                    Some(TaskArgument::Value(ParameterValue::Boolean(false))),
                )
            }

            /// Adds a required positional parameter.
            #[must_use]
            pub fn positional(
                self,
                name: impl Into<String>,
                description: impl Into<String>,
                parameter_type: ParameterType,
            ) -> Self {
                self.parameter(name, description, ParameterKind::Positional, parameter_type, None)
            }

            /// Adds an optional positional parameter; its type is the type of `default`.
            #[must_use]
            pub fn optional_positional(
                self,
                name: impl Into<String>,
                description: impl Into<String>,
                default: impl Into<ParameterValue>,
            ) -> Self {
                let default = default.into();
                let parameter_type = default.parameter_type();
                self.parameter(
                    name,
                    description,
                    ParameterKind::Positional,
                    parameter_type,
                    Some(TaskArgument::Value(default)),
                )
            }

            /// Adds a required variadic parameter taking every remaining positional value.
            #[must_use]
            pub fn variadic(
                self,
                name: impl Into<String>,
                description: impl Into<String>,
                parameter_type: ParameterType,
            ) -> Self {
                self.parameter(name, description, ParameterKind::Variadic, parameter_type, None)
            }

            /// Adds a variadic parameter that falls back to `defaults`.
            #[must_use]
            pub fn optional_variadic(
                self,
                name: impl Into<String>,
                description: impl Into<String>,
                parameter_type: ParameterType,
                defaults: Vec<ParameterValue>,
            ) -> Self {
                self.parameter(
                    name,
                    description,
                    ParameterKind::Variadic,
                    parameter_type,
                    Some(TaskArgument::List(defaults)),
                )
            }

            fn parameter(
                mut self,
                name: impl Into<String>,
                description: impl Into<String>,
                kind: ParameterKind,
                parameter_type: ParameterType,
                default_value: Option<TaskArgument>,
            ) -> Self {
                self.parameters.push(TaskParameter::new(
                    name,
                    description,
                    kind,
                    parameter_type,
                    default_value,
                ));
                self
            }
        }
    };
}

/// Builder returned by [`TaskDefinition::task`].
#[derive(Debug)]
pub struct NewTaskBuilder {
    id: TaskId,
    description: String,
    parameters: Vec<TaskParameter>,
}

impl_parameter_methods!(NewTaskBuilder);

impl NewTaskBuilder {
    /// Sets the help text.
    #[must_use]
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Sets the action and finishes the definition.
    pub fn action<F, Fut>(self, action: F) -> TaskDefinition
    where
        F: Fn(TaskArguments, HookContext) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = TaskResult> + Send + 'static,
    {
        TaskDefinition::New(NewTaskDefinition {
            id: self.id,
            description: self.description,
            parameters: self.parameters,
            action: TaskAction::new(action),
        })
    }
}

/// Builder returned by [`TaskDefinition::override_task`].
#[derive(Debug)]
pub struct TaskOverrideBuilder {
    id: TaskId,
    description: Option<String>,
    parameters: Vec<TaskParameter>,
}

impl_parameter_methods!(TaskOverrideBuilder);

impl TaskOverrideBuilder {
    /// Replaces the task's help text.
    #[must_use]
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Sets the wrapping action and finishes the definition.
    ///
    /// The action receives a [`RunSuper`] that runs the action being overridden.
    pub fn action<F, Fut>(self, action: F) -> TaskDefinition
    where
        F: Fn(TaskArguments, HookContext, RunSuper) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = TaskResult> + Send + 'static,
    {
        TaskDefinition::Override(TaskOverrideDefinition {
            id: self.id,
            description: self.description,
            parameters: self.parameters,
            action: OverrideAction::new(action),
        })
    }
}
