//! The task tree: building it from definitions and running tasks.
//!
//! Definitions are applied in order, plugin by plugin and then the user's.
//! Overrides therefore wrap whatever action was current when they were
//! applied, so the last override runs first and reaches earlier ones
//! through [`RunSuper`](crate::RunSuper).

use hardhat_hooks::HookContext;
use hardhat_params::{GlobalParametersMap, ParameterError, validate_parameter_name};
use indexmap::IndexMap;

use crate::action::{TaskAction, TaskResult};
use crate::definition::{NewTaskDefinition, TaskDefinition, TaskOverrideDefinition};
use crate::error::TaskError;
use crate::id::TaskId;
use crate::parameter::{ParameterKind, TaskArgument, TaskArguments, TaskParameter};

/// The tasks contributed by one plugin.
#[derive(Debug, Clone)]
pub struct PluginTasks {
    /// The contributing plugin.
    pub plugin_id: String,
    /// Its task definitions, applied in order.
    pub tasks: Vec<TaskDefinition>,
}

impl PluginTasks {
    /// Creates a plugin task list.
    pub fn new(plugin_id: impl Into<String>, tasks: Vec<TaskDefinition>) -> Self {
        Self {
            plugin_id: plugin_id.into(),
            tasks,
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Task
// ─────────────────────────────────────────────────────────────────────────────

/// A node of the task tree.
#[derive(Debug, Clone)]
pub struct Task {
    id: TaskId,
    description: String,
    parameters: Vec<TaskParameter>,
    action: Option<TaskAction>,
    plugin_id: Option<String>,
    subtasks: IndexMap<String, Task>,
}

impl Task {
    /// The task id.
    #[must_use]
    pub fn id(&self) -> &TaskId {
        &self.id
    }

    /// Help text.
    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Parameters in declaration order, override additions last.
    #[must_use]
    pub fn parameters(&self) -> &[TaskParameter] {
        &self.parameters
    }

    /// Returns the parameter called `name`.
    #[must_use]
    pub fn parameter(&self, name: &str) -> Option<&TaskParameter> {
        self.parameters.iter().find(|parameter| parameter.name() == name)
    }

    /// Plugin that defined the task, or `None` for user tasks.
    #[must_use]
    pub fn plugin_id(&self) -> Option<&str> {
        self.plugin_id.as_deref()
    }

    /// Sub-tasks keyed by their last id segment.
    #[must_use]
    pub fn subtasks(&self) -> &IndexMap<String, Task> {
        &self.subtasks
    }

    /// Returns whether the task is a namespace without an action.
    #[must_use]
    pub fn is_empty_task(&self) -> bool {
        self.action.is_none()
    }

    /// Checks `supplied` against the parameters and fills in defaults.
    ///
    /// # Errors
    ///
    /// [`TaskError::UnknownArgument`], [`TaskError::MissingArgument`] or
    /// [`TaskError::InvalidArgumentType`].
    pub fn resolve_arguments(
        &self,
        mut supplied: TaskArguments,
    ) -> Result<TaskArguments, TaskError> {
        if let Some(unknown) = supplied.names().find(|name| self.parameter(name).is_none()) {
            return Err(TaskError::UnknownArgument {
                task: self.id.clone(),
                name: unknown.to_owned(),
            });
        }

        let mut resolved = TaskArguments::new();
        for parameter in &self.parameters {
            let argument = match supplied.remove(parameter.name()) {
                Some(argument) if parameter.accepts(&argument) => argument,
                Some(_) => {
                    return Err(TaskError::InvalidArgumentType {
                        task: self.id.clone(),
                        name: parameter.name().to_owned(),
                        expected: parameter.parameter_type(),
                    });
                }
                None => parameter
                    .default_value()
                    .cloned()
                    .ok_or_else(|| TaskError::MissingArgument {
                        task: self.id.clone(),
                        name: parameter.name().to_owned(),
                    })?,
            };
            resolved.insert(parameter.name(), argument);
        }
        Ok(resolved)
    }

    /// Resolves `args` and runs the task's action with `context`.
    ///
    /// # Errors
    ///
    /// [`TaskError::EmptyTask`] for namespace tasks, argument errors from
    /// [`resolve_arguments`](Self::resolve_arguments), or whatever the
    /// action returns.
    pub async fn run(&self, args: TaskArguments, context: HookContext) -> TaskResult {
        let action = self.action.clone().ok_or_else(|| TaskError::EmptyTask {
            task: self.id.clone(),
        })?;
        let args = self.resolve_arguments(args)?;
        tracing::debug!(task = %self.id, arguments = args.len(), "running task");
        action.call(args, context).await
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// TaskManager
// ─────────────────────────────────────────────────────────────────────────────

/// The task tree of one runtime environment.
#[derive(Debug, Clone, Default)]
pub struct TaskManager {
    root_tasks: IndexMap<String, Task>,
}

impl TaskManager {
    /// Builds the task tree from plugin definitions, then the user's.
    ///
    /// Task parameters may not reuse a name from `global_parameters`.
    ///
    /// # Errors
    ///
    /// The first definition error encountered; see [`TaskError`].
    pub fn new(
        plugin_tasks: impl IntoIterator<Item = PluginTasks>,
        user_tasks: impl IntoIterator<Item = TaskDefinition>,
        global_parameters: &GlobalParametersMap,
    ) -> Result<Self, TaskError> {
        let mut manager = Self::default();
        for plugin in plugin_tasks {
            for definition in plugin.tasks {
                manager.apply(definition, Some(&plugin.plugin_id), global_parameters)?;
            }
        }
        for definition in user_tasks {
            manager.apply(definition, None, global_parameters)?;
        }
        Ok(manager)
    }

    /// Returns the task at `id`.
    ///
    /// # Errors
    ///
    /// [`TaskError::TaskNotFound`] if there is none.
    pub fn get_task(&self, id: &TaskId) -> Result<&Task, TaskError> {
        self.find(id)
            .ok_or_else(|| TaskError::TaskNotFound { task: id.clone() })
    }

    /// Top-level tasks keyed by name, in definition order.
    #[must_use]
    pub fn root_tasks(&self) -> &IndexMap<String, Task> {
        &self.root_tasks
    }

    fn find(&self, id: &TaskId) -> Option<&Task> {
        let (first, rest) = id.segments().split_first()?;
        rest.iter()
            .try_fold(self.root_tasks.get(first)?, |task, segment| {
                task.subtasks.get(segment)
            })
    }

    fn find_mut(&mut self, id: &TaskId) -> Option<&mut Task> {
        let (first, rest) = id.segments().split_first()?;
        rest.iter()
            .try_fold(self.root_tasks.get_mut(first)?, |task, segment| {
                task.subtasks.get_mut(segment)
            })
    }

    fn apply(
        &mut self,
        definition: TaskDefinition,
        plugin_id: Option<&str>,
        global_parameters: &GlobalParametersMap,
    ) -> Result<(), TaskError> {
        match definition {
            TaskDefinition::Empty { id, description } => {
                self.insert(Task {
                    id,
                    description,
                    parameters: Vec::new(),
                    action: None,
                    plugin_id: plugin_id.map(str::to_owned),
                    subtasks: IndexMap::new(),
                })
            }
            TaskDefinition::New(NewTaskDefinition {
                id,
                description,
                parameters,
                action,
            }) => {
                validate_parameters(&id, &[], &parameters, global_parameters)?;
                self.insert(Task {
                    id,
                    description,
                    parameters,
                    action: Some(action),
                    plugin_id: plugin_id.map(str::to_owned),
                    subtasks: IndexMap::new(),
                })
            }
            TaskDefinition::Override(definition) => {
                self.apply_override(definition, plugin_id, global_parameters)
            }
        }
    }

    fn insert(&mut self, task: Task) -> Result<(), TaskError> {
        if let Some(existing) = self.find(&task.id) {
            return Err(TaskError::TaskAlreadyDefined {
                task: task.id.clone(),
                defined_by: existing.plugin_id.clone(),
            });
        }

        tracing::debug!(
            task = %task.id,
            plugin = task.plugin_id.as_deref().unwrap_or("user"),
            empty = task.action.is_none(),
            "defined task"
        );

        let Some(parent_id) = task.id.parent() else {
            self.root_tasks.insert(task.id.name().to_owned(), task);
            return Ok(());
        };
        let Some(parent) = self.find_mut(&parent_id) else {
            return Err(TaskError::SubtaskWithoutParent {
                task: task.id,
                parent: parent_id,
            });
        };
        parent.subtasks.insert(task.id.name().to_owned(), task);
        Ok(())
    }

    fn apply_override(
        &mut self,
        definition: TaskOverrideDefinition,
        plugin_id: Option<&str>,
        global_parameters: &GlobalParametersMap,
    ) -> Result<(), TaskError> {
        let TaskOverrideDefinition {
            id,
            description,
            parameters,
            action,
        } = definition;

        let task = self
            .find_mut(&id)
            .ok_or_else(|| TaskError::TaskNotFound { task: id.clone() })?;
        let Some(previous) = task.action.take() else {
            return Err(TaskError::CannotOverrideEmptyTask { task: id });
        };
        if let Err(error) =
            validate_parameters(&id, &task.parameters, &parameters, global_parameters)
        {
            task.action = Some(previous);
            return Err(error);
        }

        tracing::debug!(
            task = %id,
            plugin = plugin_id.unwrap_or("user"),
            added_parameters = parameters.len(),
            "overrode task"
        );

        task.parameters.extend(parameters);
        if let Some(description) = description {
            task.description = description;
        }
        task.action = Some(TaskAction::wrap(previous, action));
        Ok(())
    }
}

/// Checks `added` parameters against naming rules, globals, `existing`
/// parameters and the positional ordering rule.
fn validate_parameters(
    task: &TaskId,
    existing: &[TaskParameter],
    added: &[TaskParameter],
    global_parameters: &GlobalParametersMap,
) -> Result<(), TaskError> {
    for (index, parameter) in added.iter().enumerate() {
        let name = parameter.name();
        validate_parameter_name(name).map_err(|source| TaskError::InvalidParameter {
            task: task.clone(),
            source,
        })?;

        if global_parameters.contains(name) {
            return Err(TaskError::ClashesWithGlobalParameter {
                task: task.clone(),
                name: name.to_owned(),
            });
        }

        let duplicate = existing
            .iter()
            .chain(&added[..index])
            .any(|other| other.name() == name);
        if duplicate {
            return Err(TaskError::ParameterAlreadyDefined {
                task: task.clone(),
                name: name.to_owned(),
            });
        }

        if let Some(default) = parameter.default_value()
            && !parameter.accepts(default)
        {
            return Err(TaskError::InvalidParameter {
                task: task.clone(),
                source: ParameterError::invalid_value(
                    name,
                    describe(default),
                    parameter.parameter_type(),
                ),
            });
        }
    }

    let mut open_ended = false;
    for parameter in existing
        .iter()
        .chain(added)
        .filter(|parameter| parameter.kind().is_positional())
    {
        if open_ended {
            return Err(TaskError::InvalidPositionalOrder {
                task: task.clone(),
                name: parameter.name().to_owned(),
            });
        }
        open_ended = parameter.kind() == ParameterKind::Variadic || !parameter.is_required();
    }
    Ok(())
}

fn describe(argument: &TaskArgument) -> String {
    match argument {
        TaskArgument::Value(value) => value.to_string(),
        TaskArgument::List(values) => {
            let values: Vec<String> = values.iter().map(ToString::to_string).collect();
            format!("[{}]", values.join(", "))
        }
    }
}
