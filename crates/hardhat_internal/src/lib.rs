//! # Hardhat Internal Library
//!
//! Re-exports the hardhat crates for convenience.

/// Global parameter types, registry and resolution.
pub use hardhat_params;

/// User and resolved configuration.
pub use hardhat_config;

/// Hook categories, the hook manager and the hook context.
pub use hardhat_hooks;

/// Task definitions, overrides and the task tree.
pub use hardhat_tasks;

/// Plugins and runtime environment assembly.
pub use hardhat_runtime;

/// Built-in plugins.
pub use hardhat_core_plugins;

/// Re-export all common types for easy access.
pub mod prelude {
    pub use hardhat_config::{ConfigValidationError, ResolvedConfig, UserConfig};
    pub use hardhat_core_plugins::{DefaultPlugins, MinimalPlugins, TracingFormat, TracingPlugin};
    pub use hardhat_hooks::{
        ConfigHooks, Hook, HookCategory, HookContext, HookError, HookManager, HookRegistrar,
        HookResult, HreHooks, Next, UserInterruptionHooks,
    };
    pub use hardhat_params::{
        GlobalArguments, GlobalParameterSpec, ParameterType, ParameterValue,
    };
    pub use hardhat_runtime::{
        Created, Plugin, PluginGroup, PluginGroupBuilder, RuntimeEnvironment, RuntimeError,
    };
    pub use hardhat_tasks::{
        RunSuper, TaskArguments, TaskDefinition, TaskError, TaskId, TaskResult,
    };
}
