//! Parameter naming rules and validated global parameter definitions.

use crate::error::ParameterError;
use crate::types::{ParameterType, ParameterValue, is_value_valid};
use regex::Regex;
use std::sync::LazyLock;

/// Names the runtime keeps for its own command-line options.
pub const RESERVED_PARAMETER_NAMES: &[&str] =
    &["config", "help", "init", "showStackTraces", "version"];

static PARAMETER_NAME: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-z][a-zA-Z0-9]*$").expect("valid regex"));

/// Returns true if `name` is lower camel case.
#[must_use]
pub fn is_valid_parameter_name(name: &str) -> bool {
    PARAMETER_NAME.is_match(name)
}

/// Returns true if `name` is one of [`RESERVED_PARAMETER_NAMES`].
#[must_use]
pub fn is_reserved_parameter_name(name: &str) -> bool {
    RESERVED_PARAMETER_NAMES.contains(&name)
}

/// Checks casing first, then reserved-name membership.
///
/// Shared by global parameters and task parameters.
pub fn validate_parameter_name(name: &str) -> Result<(), ParameterError> {
    if !is_valid_parameter_name(name) {
        return Err(ParameterError::InvalidName {
            name: name.to_owned(),
        });
    }
    if is_reserved_parameter_name(name) {
        return Err(ParameterError::ReservedName {
            name: name.to_owned(),
        });
    }
    Ok(())
}

// ─────────────────────────────────────────────────────────────────────────────
// GlobalParameterSpec
// ─────────────────────────────────────────────────────────────────────────────

/// Unvalidated global parameter as declared by a plugin.
///
/// # Example
///
/// ```
/// use hardhat_params::{GlobalParameterSpec, ParameterType, build_global_parameter_definition};
///
/// let spec = GlobalParameterSpec::new("network", "The network to connect to", "default");
/// let definition = build_global_parameter_definition(&spec).unwrap();
/// assert_eq!(definition.parameter_type(), ParameterType::String);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct GlobalParameterSpec {
    /// Lower camel case name.
    pub name: String,
    /// Help text.
    pub description: String,
    /// Declared type. `None` means [`ParameterType::String`].
    pub parameter_type: Option<ParameterType>,
    /// Value used when neither the user nor the environment supplies one.
    pub default_value: ParameterValue,
}

impl GlobalParameterSpec {
    /// Creates a spec with no explicit type.
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        default_value: impl Into<ParameterValue>,
    ) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            parameter_type: None,
            default_value: default_value.into(),
        }
    }

    /// Sets the declared type.
    #[must_use]
    pub fn with_type(mut self, parameter_type: ParameterType) -> Self {
        self.parameter_type = Some(parameter_type);
        self
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// ParameterDefinition
// ─────────────────────────────────────────────────────────────────────────────

/// A validated, immutable parameter definition.
///
/// Only obtainable through [`build_global_parameter_definition`], so holding
/// one proves the name is well-formed and the default fits the type.
#[derive(Debug, Clone, PartialEq)]
pub struct ParameterDefinition {
    name: String,
    description: String,
    parameter_type: ParameterType,
    default_value: ParameterValue,
}

impl ParameterDefinition {
    /// The parameter name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The help text.
    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }

    /// The declared type.
    #[must_use]
    pub fn parameter_type(&self) -> ParameterType {
        self.parameter_type
    }

    /// The default value, already validated against the type.
    #[must_use]
    pub fn default_value(&self) -> &ParameterValue {
        &self.default_value
    }
}

/// Validates a spec and normalizes it into a [`ParameterDefinition`].
///
/// Checks run in this order: name casing ([`ParameterError::InvalidName`]),
/// reserved names ([`ParameterError::ReservedName`]), then the default value
/// against the declared (or defaulted) type
/// ([`ParameterError::InvalidValueForType`]).
pub fn build_global_parameter_definition(
    spec: &GlobalParameterSpec,
) -> Result<ParameterDefinition, ParameterError> {
    validate_parameter_name(&spec.name)?;

    let parameter_type = spec.parameter_type.unwrap_or_default();
    if !is_value_valid(parameter_type, &spec.default_value) {
        return Err(ParameterError::invalid_value(
            &spec.name,
            spec.default_value.to_string(),
            parameter_type,
        ));
    }

    Ok(ParameterDefinition {
        name: spec.name.clone(),
        description: spec.description.clone(),
        parameter_type,
        default_value: spec.default_value.clone(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_must_be_lower_camel_case() {
        assert!(is_valid_parameter_name("param"));
        assert!(is_valid_parameter_name("myParam2"));
        assert!(!is_valid_parameter_name("MyParam"));
        assert!(!is_valid_parameter_name("my_param"));
        assert!(!is_valid_parameter_name("my-param"));
        assert!(!is_valid_parameter_name("2param"));
        assert!(!is_valid_parameter_name(""));
    }

    #[test]
    fn casing_is_checked_before_reservation() {
        let spec = GlobalParameterSpec::new("Config", "", "x");
        assert_eq!(
            build_global_parameter_definition(&spec),
            Err(ParameterError::InvalidName {
                name: "Config".into()
            })
        );

        let spec = GlobalParameterSpec::new("config", "", "x");
        assert_eq!(
            build_global_parameter_definition(&spec),
            Err(ParameterError::ReservedName {
                name: "config".into()
            })
        );
    }

    #[test]
    fn type_defaults_to_string() {
        let spec = GlobalParameterSpec::new("greeting", "A greeting", "hello");
        let definition = build_global_parameter_definition(&spec).unwrap();
        assert_eq!(definition.parameter_type(), ParameterType::String);
        assert_eq!(definition.default_value(), &ParameterValue::from("hello"));
        assert_eq!(definition.description(), "A greeting");
    }

    #[test]
    fn default_must_match_declared_type() {
        let spec = GlobalParameterSpec::new("retries", "", "three").with_type(ParameterType::Int);
        assert_eq!(
            build_global_parameter_definition(&spec),
            Err(ParameterError::InvalidValueForType {
                name: "retries".into(),
                value: "three".into(),
                parameter_type: ParameterType::Int,
            })
        );

        // An untyped spec with a non-string default is a mismatch too.
        let spec = GlobalParameterSpec::new("retries", "", 3_i64);
        assert!(build_global_parameter_definition(&spec).is_err());
    }
}
