//! The runtime environment: everything plugins contributed, assembled once.
//!
//! # Lifecycle
//!
//! [`RuntimeEnvironmentBuilder::build`] runs these steps in order and stops
//! at the first failure:
//!
//! 1. **Plugin resolution** - reject duplicate ids, order by dependencies
//! 2. **Global parameters** - merge every plugin's declarations
//! 3. **Hooks** - register each plugin's handlers, in plugin order
//! 4. **Config** - extend, validate and resolve the user config
//! 5. **Global arguments** - user > `HARDHAT_*` environment > default
//! 6. **Tasks** - plugin definitions, then the user's
//! 7. **Context** - install the single [`HookContext`]
//! 8. **Created** - run [`Created`] handlers one after another
//!
//! # Example
//!
//! ```
//! use hardhat_params::GlobalParameterSpec;
//! use hardhat_runtime::{Plugin, RuntimeEnvironment};
//! use hardhat_tasks::{TaskArguments, TaskDefinition, TaskId};
//!
//! struct Greeter;
//!
//! impl Plugin for Greeter {
//!     fn id(&self) -> &str {
//!         "greeter"
//!     }
//!
//!     fn global_parameters(&self) -> Vec<GlobalParameterSpec> {
//!         vec![GlobalParameterSpec::new("greeting", "What to say", "hello")]
//!     }
//!
//!     fn tasks(&self) -> Vec<TaskDefinition> {
//!         vec![TaskDefinition::task(TaskId::parse("greet").unwrap())
//!             .action(|_args, context| async move {
//!                 let arguments = context.global_arguments();
//!                 let greeting = arguments.get_str("greeting").unwrap_or_default();
//!                 Ok(serde_json::json!(greeting))
//!             })]
//!     }
//! }
//!
//! # futures::executor::block_on(async {
//! let hre = RuntimeEnvironment::builder().add_plugin(Greeter).build().await.unwrap();
//! let greeting = hre
//!     .run_task(&TaskId::parse("greet").unwrap(), TaskArguments::new())
//!     .await
//!     .unwrap();
//! assert_eq!(greeting, "hello");
//! # });
//! ```

use std::collections::HashMap;
use std::sync::Arc;

use hardhat_config::{ResolvedConfig, UserConfig};
use hardhat_hooks::{Hook, HookContext, HookManager, HreHooks, UserInterruptions};
use hardhat_params::{
    EnvSource, GlobalArguments, GlobalParametersMap, PluginParameters, ProcessEnv,
    build_global_parameters_map, resolve_global_arguments,
};
use hardhat_tasks::{PluginTasks, TaskArguments, TaskDefinition, TaskId, TaskManager, TaskResult};

use crate::config::resolve_user_config;
use crate::error::RuntimeError;
use crate::plugin::{Plugin, PluginList, Plugins};

/// Sequential `hre` hook run once the environment is fully assembled.
pub struct Created;

impl Hook for Created {
    type Category = HreHooks;
    const NAME: &'static str = "created";
    type Args = RuntimeEnvironment;
    type Output = ();
}

// ─────────────────────────────────────────────────────────────────────────────
// RuntimeEnvironment
// ─────────────────────────────────────────────────────────────────────────────

/// A fully assembled runtime environment. Cheap to clone.
#[derive(Clone)]
pub struct RuntimeEnvironment {
    inner: Arc<EnvironmentInner>,
}

struct EnvironmentInner {
    plugin_ids: Vec<String>,
    global_parameters: GlobalParametersMap,
    hooks: Arc<HookManager>,
    tasks: TaskManager,
    context: HookContext,
}

impl core::fmt::Debug for RuntimeEnvironment {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("RuntimeEnvironment")
            .field("plugins", &self.inner.plugin_ids)
            .field("global_arguments", self.global_arguments())
            .field("tasks", &self.inner.tasks.root_tasks().len())
            .finish_non_exhaustive()
    }
}

impl RuntimeEnvironment {
    /// Starts building an environment.
    #[must_use]
    pub fn builder() -> RuntimeEnvironmentBuilder {
        RuntimeEnvironmentBuilder::default()
    }

    /// Ids of the active plugins, dependencies first.
    #[must_use]
    pub fn plugin_ids(&self) -> &[String] {
        &self.inner.plugin_ids
    }

    /// The resolved config.
    #[must_use]
    pub fn config(&self) -> &ResolvedConfig {
        self.inner.context.config()
    }

    /// Every registered global parameter.
    #[must_use]
    pub fn global_parameters(&self) -> &GlobalParametersMap {
        &self.inner.global_parameters
    }

    /// One resolved value per global parameter.
    #[must_use]
    pub fn global_arguments(&self) -> &GlobalArguments {
        self.inner.context.global_arguments()
    }

    /// The hook manager. Handlers may still be added or removed.
    #[must_use]
    pub fn hooks(&self) -> &Arc<HookManager> {
        &self.inner.hooks
    }

    /// The task tree.
    #[must_use]
    pub fn tasks(&self) -> &TaskManager {
        &self.inner.tasks
    }

    /// The context handed to hook handlers and task actions.
    #[must_use]
    pub fn context(&self) -> &HookContext {
        &self.inner.context
    }

    /// Handle for asking the user for input.
    #[must_use]
    pub fn interruptions(&self) -> &UserInterruptions {
        self.inner.context.interruptions()
    }

    /// Runs the task at `id` with this environment's context.
    ///
    /// # Errors
    ///
    /// [`TaskError::TaskNotFound`](hardhat_tasks::TaskError::TaskNotFound),
    /// or any error from [`Task::run`](hardhat_tasks::Task::run).
    pub async fn run_task(&self, id: &TaskId, args: TaskArguments) -> TaskResult {
        let task = self.inner.tasks.get_task(id)?;
        task.run(args, self.inner.context.clone()).await
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// RuntimeEnvironmentBuilder
// ─────────────────────────────────────────────────────────────────────────────

/// Collects plugins and user input for [`RuntimeEnvironment`].
pub struct RuntimeEnvironmentBuilder {
    plugins: PluginList,
    user_config: UserConfig,
    user_arguments: HashMap<String, String>,
    env: Box<dyn EnvSource + Send + Sync>,
    user_tasks: Vec<TaskDefinition>,
}

impl Default for RuntimeEnvironmentBuilder {
    fn default() -> Self {
        Self {
            plugins: PluginList::new(),
            user_config: UserConfig::new(),
            user_arguments: HashMap::new(),
            env: Box::new(ProcessEnv),
            user_tasks: Vec::new(),
        }
    }
}

impl core::fmt::Debug for RuntimeEnvironmentBuilder {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("RuntimeEnvironmentBuilder")
            .field("plugins", &self.plugins)
            .field("user_config", &self.user_config)
            .field("user_arguments", &self.user_arguments)
            .field("user_tasks", &self.user_tasks.len())
            .finish_non_exhaustive()
    }
}

impl RuntimeEnvironmentBuilder {
    /// Adds a single plugin.
    #[must_use]
    pub fn add_plugin<P: Plugin>(mut self, plugin: P) -> Self {
        self.plugins.push(Box::new(plugin));
        self
    }

    /// Adds a plugin or a customized plugin group.
    #[must_use]
    pub fn add_plugins<P: Plugins>(mut self, plugins: P) -> Self {
        self.plugins.add(plugins);
        self
    }

    /// Removes a previously added plugin.
    #[must_use]
    pub fn disable_plugin(mut self, id: &str) -> Self {
        self.plugins.disable(id);
        self
    }

    /// Sets the user config.
    #[must_use]
    pub fn user_config(mut self, config: UserConfig) -> Self {
        self.user_config = config;
        self
    }

    /// Sets raw global arguments, typically parsed from the command line.
    #[must_use]
    pub fn user_arguments(mut self, arguments: HashMap<String, String>) -> Self {
        self.user_arguments = arguments;
        self
    }

    /// Replaces the process environment as the source of `HARDHAT_*` variables.
    #[must_use]
    pub fn env(mut self, env: impl EnvSource + Send + Sync + 'static) -> Self {
        self.env = Box::new(env);
        self
    }

    /// Adds task definitions applied after every plugin's.
    #[must_use]
    pub fn user_tasks(mut self, tasks: impl IntoIterator<Item = TaskDefinition>) -> Self {
        self.user_tasks.extend(tasks);
        self
    }

    /// Assembles the environment.
    ///
    /// # Errors
    ///
    /// The first [`RuntimeError`] raised by any step.
    pub async fn build(self) -> Result<RuntimeEnvironment, RuntimeError> {
        let Self {
            plugins,
            user_config,
            user_arguments,
            env,
            user_tasks,
        } = self;

        let plugins = plugins.resolve()?;
        let plugin_ids: Vec<String> = plugins.iter().map(|plugin| plugin.id().to_owned()).collect();
        tracing::debug!(plugins = ?plugin_ids, "resolved plugins");

        let declared: Vec<PluginParameters> = plugins
            .iter()
            .map(|plugin| PluginParameters::new(plugin.id(), plugin.global_parameters()))
            .collect();
        let global_parameters = build_global_parameters_map(&declared)?;

        let hooks = Arc::new(HookManager::new());
        for plugin in &plugins {
            hooks.register_handlers(plugin.id(), |registrar| plugin.register_hooks(registrar))?;
        }

        let config = resolve_user_config(&hooks, user_config).await?;
        let global_arguments =
            resolve_global_arguments(&user_arguments, &global_parameters, &*env)?;

        let tasks = TaskManager::new(
            plugins
                .iter()
                .map(|plugin| PluginTasks::new(plugin.id(), plugin.tasks())),
            user_tasks,
            &global_parameters,
        )?;

        let context = HookContext::new(config, global_arguments, &hooks);
        hooks.set_context(context.clone())?;

        let environment = RuntimeEnvironment {
            inner: Arc::new(EnvironmentInner {
                plugin_ids,
                global_parameters,
                hooks: Arc::clone(&hooks),
                tasks,
                context,
            }),
        };

        hooks
            .run_sequential_handlers::<Created>(environment.clone())
            .await?;

        tracing::info!(
            plugins = environment.plugin_ids().len(),
            global_parameters = environment.global_parameters().len(),
            tasks = environment.tasks().root_tasks().len(),
            "runtime environment created"
        );
        Ok(environment)
    }
}
