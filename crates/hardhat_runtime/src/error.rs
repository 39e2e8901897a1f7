use hardhat_config::ConfigValidationError;
use hardhat_hooks::HookError;
use hardhat_params::ParameterError;
use hardhat_tasks::TaskError;
use thiserror::Error;

/// Errors raised while assembling or using a runtime environment.
#[derive(Debug, Error)]
pub enum RuntimeError {
    /// Two plugins share an id.
    #[error("plugin `{id}` was added more than once")]
    DuplicatePluginId {
        /// The repeated id.
        id: String,
    },

    /// A plugin depends on one that is not in the list.
    #[error("plugin `{plugin}` depends on `{dependency}`, which was not added")]
    MissingPluginDependency {
        /// The dependent plugin.
        plugin: String,
        /// The absent dependency.
        dependency: String,
    },

    /// Plugin dependencies form a cycle.
    #[error("circular dependency among plugins: {}", plugins.join(", "))]
    PluginDependencyCycle {
        /// Plugins left unordered, in insertion order.
        plugins: Vec<String>,
    },

    /// Config validation handlers reported problems.
    #[error("invalid config:{}", format_validation_errors(errors))]
    InvalidConfig {
        /// Every reported problem, in dispatch order.
        errors: Vec<ConfigValidationError>,
    },

    /// Global parameter registration or resolution failed.
    #[error(transparent)]
    Parameter(#[from] ParameterError),

    /// Hook registration or dispatch failed.
    #[error(transparent)]
    Hook(#[from] HookError),

    /// Task definition or execution failed.
    #[error(transparent)]
    Task(#[from] TaskError),
}

fn format_validation_errors(errors: &[ConfigValidationError]) -> String {
    errors
        .iter()
        .map(|error| format!("\n  * {error}"))
        .collect()
}
