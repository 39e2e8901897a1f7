//! Runtime environment assembly.
//!
//! A [`RuntimeEnvironment`] is built from a list of [`Plugin`]s plus the
//! user's config, raw global arguments and task definitions. Building it
//! wires the other crates together: global parameters are merged and
//! resolved, hook handlers registered, the config pipeline run and the task
//! tree assembled. See [`environment`] for the exact order.

/// Config loading hooks.
pub mod config;

/// The runtime environment and its builder.
pub mod environment;

/// Error types.
pub mod error;

/// Plugins, plugin groups and plugin lists.
pub mod plugin;

pub use config::{ExtendUserConfig, ResolveUserConfig, ValidateUserConfig, resolve_user_config};
pub use environment::{Created, RuntimeEnvironment, RuntimeEnvironmentBuilder};
pub use error::RuntimeError;
pub use plugin::{Plugin, PluginGroup, PluginGroupBuilder, PluginList, Plugins};
