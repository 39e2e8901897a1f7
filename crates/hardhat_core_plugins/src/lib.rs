//! Built-in plugins.
//!
//! - [`BuiltinGlobalsPlugin`] - the `network` and `buildProfile` global parameters
//! - [`TracingPlugin`] - logging via the `tracing` crate, driven by the
//!   `verbose` and `logFormat` global parameters
//! - [`DefaultPlugins`] - both of the above
//!
//! # Example
//!
//! ```
//! use hardhat_core_plugins::{DefaultPlugins, TracingPlugin};
//! use hardhat_runtime::{PluginGroup, RuntimeEnvironment};
//!
//! # futures::executor::block_on(async {
//! let hre = RuntimeEnvironment::builder()
//!     .add_plugins(DefaultPlugins.build().disable(TracingPlugin::ID))
//!     .build()
//!     .await
//!     .unwrap();
//! assert_eq!(hre.global_arguments().get_str("network"), Some("default"));
//! # });
//! ```

mod builtin_globals;
mod tracing_plugin;

pub use builtin_globals::BuiltinGlobalsPlugin;
pub use tracing_plugin::{
    LOG_FORMAT_PARAMETER, TracingConfig, TracingFormat, TracingPlugin, UnknownTracingFormat,
    VERBOSE_PARAMETER,
};

use hardhat_runtime::{PluginGroup, PluginGroupBuilder};

/// Default plugins for most environments.
///
/// Includes:
/// - [`BuiltinGlobalsPlugin`] - built-in global parameters
/// - [`TracingPlugin`] - logging
///
/// # Customization
///
/// ```ignore
/// RuntimeEnvironment::builder()
///     .add_plugins(
///         DefaultPlugins
///             .build()
///             .disable(TracingPlugin::ID)
///             .add(TracingPlugin::new().with_format(TracingFormat::Json)),
///     )
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultPlugins;

impl PluginGroup for DefaultPlugins {
    fn build(self) -> PluginGroupBuilder {
        PluginGroupBuilder::new()
            .add(BuiltinGlobalsPlugin)
            .add(TracingPlugin::default())
    }
}

/// Built-in global parameters only; no subscriber is installed.
#[derive(Debug, Clone, Copy, Default)]
pub struct MinimalPlugins;

impl PluginGroup for MinimalPlugins {
    fn build(self) -> PluginGroupBuilder {
        PluginGroupBuilder::new().add(BuiltinGlobalsPlugin)
    }
}
