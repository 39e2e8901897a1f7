//! Global parameters every environment understands.

use hardhat_params::GlobalParameterSpec;
use hardhat_runtime::Plugin;

/// Declares the `network` and `buildProfile` global parameters.
///
/// Both default to `"default"`; plugins that manage networks or builds read
/// the resolved values from the hook context.
#[derive(Debug, Clone, Copy, Default)]
pub struct BuiltinGlobalsPlugin;

impl BuiltinGlobalsPlugin {
    /// Plugin id.
    pub const ID: &'static str = "hardhat:builtin-globals";
}

impl Plugin for BuiltinGlobalsPlugin {
    fn id(&self) -> &str {
        Self::ID
    }

    fn global_parameters(&self) -> Vec<GlobalParameterSpec> {
        vec![
            GlobalParameterSpec::new("network", "The network to connect to", "default"),
            GlobalParameterSpec::new(
                "buildProfile",
                "The build profile to use when compiling",
                "default",
            ),
        ]
    }
}
