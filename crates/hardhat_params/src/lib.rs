//! Typed global parameters for the task runner.
//!
//! Plugins declare global parameters (named, typed settings such as
//! `network` or `verbose`). This crate turns those declarations into a
//! conflict-free registry and resolves one typed value per parameter.
//!
//! - [`types`] - the closed set of parameter types and their parsing rules
//! - [`definition`] - naming rules and validated definitions
//! - [`registry`] - merging plugin declarations into a [`GlobalParametersMap`]
//! - [`resolver`] - user > environment > default resolution into [`GlobalArguments`]
//!
//! # Example
//!
//! ```
//! use std::collections::HashMap;
//! use hardhat_params::{
//!     GlobalParameterSpec, ParameterType, PluginParameters, build_global_parameters_map,
//!     resolve_global_arguments,
//! };
//!
//! let registry = build_global_parameters_map(&[PluginParameters::new(
//!     "my-plugin",
//!     vec![GlobalParameterSpec::new("retries", "How many times to retry", 3_i64)
//!         .with_type(ParameterType::Int)],
//! )])
//! .unwrap();
//!
//! let user: HashMap<String, String> = HashMap::from([("retries".into(), "5".into())]);
//! let env: HashMap<String, String> = HashMap::new();
//! let args = resolve_global_arguments(&user, &registry, &env).unwrap();
//!
//! assert_eq!(args.get_int("retries"), Some(5));
//! ```

/// Parameter naming rules and validated definitions.
pub mod definition;

/// Error types.
pub mod error;

/// Global parameter registry.
pub mod registry;

/// Global argument resolution.
pub mod resolver;

/// Parameter types and values.
pub mod types;

pub use definition::{
    GlobalParameterSpec, ParameterDefinition, RESERVED_PARAMETER_NAMES,
    build_global_parameter_definition, is_reserved_parameter_name, is_valid_parameter_name,
    validate_parameter_name,
};
pub use error::ParameterError;
pub use registry::{
    GlobalParameterEntry, GlobalParametersMap, PluginParameters, build_global_parameters_map,
};
pub use resolver::{
    ENV_PREFIX, EnvSource, GlobalArguments, ProcessEnv, env_variable_name,
    resolve_global_arguments,
};
pub use types::{ParameterType, ParameterValue, is_value_valid, parse_value};
