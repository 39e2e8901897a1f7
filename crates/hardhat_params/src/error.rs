//! Error types for parameter definition and resolution.

use crate::types::ParameterType;
use thiserror::Error;

/// Errors raised while defining, registering or resolving parameters.
///
/// Every variant carries the offending identifiers so that a CLI collaborator
/// can render an actionable message without re-deriving context.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ParameterError {
    /// The name does not follow the lower camel case convention.
    #[error("invalid parameter name '{name}': expected lower camel case, e.g. 'myParameter'")]
    InvalidName {
        /// The rejected name.
        name: String,
    },

    /// The name is reserved by the runtime.
    #[error("parameter name '{name}' is reserved by the runtime")]
    ReservedName {
        /// The rejected name.
        name: String,
    },

    /// A raw string or a default value does not fit the declared type.
    #[error("invalid value '{value}' for parameter '{name}' of type {parameter_type}")]
    InvalidValueForType {
        /// The parameter the value was meant for.
        name: String,
        /// The offending value, as text.
        value: String,
        /// The declared type.
        parameter_type: ParameterType,
    },

    /// Two plugins declared the same global parameter.
    #[error(
        "plugin '{plugin_id}' is trying to define the global parameter '{name}', \
         but it is already defined by plugin '{defined_by}'"
    )]
    GlobalParameterAlreadyDefined {
        /// The plugin whose declaration was rejected.
        plugin_id: String,
        /// The conflicting parameter name.
        name: String,
        /// The plugin that declared the parameter first.
        defined_by: String,
    },
}

impl ParameterError {
    /// Creates an [`InvalidValueForType`](Self::InvalidValueForType).
    pub fn invalid_value(
        name: impl Into<String>,
        value: impl Into<String>,
        parameter_type: ParameterType,
    ) -> Self {
        Self::InvalidValueForType {
            name: name.into(),
            value: value.into(),
            parameter_type,
        }
    }
}
