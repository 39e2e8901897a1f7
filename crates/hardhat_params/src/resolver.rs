//! Global argument resolution.
//!
//! For every registered parameter the resolver picks exactly one source:
//!
//! 1. the user-supplied raw value, if present;
//! 2. otherwise the `HARDHAT_<NAME_IN_UPPER_SNAKE_CASE>` environment variable;
//! 3. otherwise the definition's typed default.
//!
//! Raw values from steps 1 and 2 are parsed against the declared type. The
//! registry is the only source of names: user or environment entries for
//! unknown names are ignored.

use crate::error::ParameterError;
use crate::registry::GlobalParametersMap;
use crate::types::{ParameterValue, parse_value};
use core::hash::BuildHasher;
use indexmap::IndexMap;
use std::collections::HashMap;
use std::path::Path;

/// Prefix of every global parameter environment variable.
pub const ENV_PREFIX: &str = "HARDHAT_";

/// Maps a lower camel case parameter name to its environment variable.
///
/// Each upper-case letter starts a new `_`-separated word; digits stay
/// attached to the preceding word.
///
/// ```
/// use hardhat_params::env_variable_name;
///
/// assert_eq!(env_variable_name("showStackTraces"), "HARDHAT_SHOW_STACK_TRACES");
/// assert_eq!(env_variable_name("param3"), "HARDHAT_PARAM3");
/// ```
#[must_use]
pub fn env_variable_name(name: &str) -> String {
    let mut variable = String::with_capacity(ENV_PREFIX.len() + name.len() * 2);
    variable.push_str(ENV_PREFIX);
    for ch in name.chars() {
        if ch.is_ascii_uppercase() {
            variable.push('_');
        }
        variable.push(ch.to_ascii_uppercase());
    }
    variable
}

// ─────────────────────────────────────────────────────────────────────────────
// EnvSource
// ─────────────────────────────────────────────────────────────────────────────

/// Read access to environment variables.
pub trait EnvSource {
    /// Returns the value of `key`, if set and valid unicode.
    fn var(&self, key: &str) -> Option<String>;
}

/// The real process environment.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessEnv;

impl EnvSource for ProcessEnv {
    fn var(&self, key: &str) -> Option<String> {
        std::env::var(key).ok()
    }
}

impl<S: BuildHasher> EnvSource for HashMap<String, String, S> {
    fn var(&self, key: &str) -> Option<String> {
        self.get(key).cloned()
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// GlobalArguments
// ─────────────────────────────────────────────────────────────────────────────

/// One resolved value per registered global parameter.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GlobalArguments {
    values: IndexMap<String, ParameterValue>,
}

impl GlobalArguments {
    /// Returns the value of `name`.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&ParameterValue> {
        self.values.get(name)
    }

    /// Returns `name` as a string.
    #[must_use]
    pub fn get_str(&self, name: &str) -> Option<&str> {
        self.get(name).and_then(ParameterValue::as_str)
    }

    /// Returns `name` as a boolean.
    #[must_use]
    pub fn get_bool(&self, name: &str) -> Option<bool> {
        self.get(name).and_then(ParameterValue::as_bool)
    }

    /// Returns `name` as an int.
    #[must_use]
    pub fn get_int(&self, name: &str) -> Option<i64> {
        self.get(name).and_then(ParameterValue::as_int)
    }

    /// Returns `name` as a bigint.
    #[must_use]
    pub fn get_bigint(&self, name: &str) -> Option<i128> {
        self.get(name).and_then(ParameterValue::as_bigint)
    }

    /// Returns `name` as a float.
    #[must_use]
    pub fn get_float(&self, name: &str) -> Option<f64> {
        self.get(name).and_then(ParameterValue::as_float)
    }

    /// Returns `name` as a path.
    #[must_use]
    pub fn get_file(&self, name: &str) -> Option<&Path> {
        self.get(name).and_then(ParameterValue::as_file)
    }

    /// Returns whether `name` was resolved.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.values.contains_key(name)
    }

    /// Number of resolved values.
    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Returns true if nothing was resolved.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Iterates over `(name, value)` in registry order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &ParameterValue)> {
        self.values.iter().map(|(name, value)| (name.as_str(), value))
    }
}

/// Resolves every parameter in `registry` with user > environment > default
/// precedence.
///
/// # Errors
///
/// Fails fast with [`ParameterError::InvalidValueForType`] on the first raw
/// value that does not parse; no partial result is returned.
pub fn resolve_global_arguments<S, E>(
    user_arguments: &HashMap<String, String, S>,
    registry: &GlobalParametersMap,
    env: &E,
) -> Result<GlobalArguments, ParameterError>
where
    S: BuildHasher,
    E: EnvSource + ?Sized,
{
    let mut values = IndexMap::with_capacity(registry.len());

    for (name, entry) in registry.iter() {
        let definition = entry.definition();

        let raw = match user_arguments.get(name) {
            Some(raw) => Some(raw.clone()),
            None => env.var(&env_variable_name(name)),
        };

        let value = match raw {
            Some(raw) => parse_value(name, &raw, definition.parameter_type())?,
            None => definition.default_value().clone(),
        };

        tracing::trace!(parameter = %name, value = %value, "resolved global argument");
        values.insert(name.to_owned(), value);
    }

    Ok(GlobalArguments { values })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::definition::GlobalParameterSpec;
    use crate::registry::{PluginParameters, build_global_parameters_map};
    use crate::types::ParameterType;

    fn registry() -> GlobalParametersMap {
        build_global_parameters_map(&[PluginParameters::new(
            "plugin1",
            vec![
                GlobalParameterSpec::new("param1", "", true).with_type(ParameterType::Boolean),
                GlobalParameterSpec::new("param2", "", "default"),
                GlobalParameterSpec::new("param3", "", 0_i128).with_type(ParameterType::BigInt),
            ],
        )])
        .unwrap()
    }

    fn map(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect()
    }

    #[test]
    fn env_variable_names() {
        assert_eq!(env_variable_name("network"), "HARDHAT_NETWORK");
        assert_eq!(env_variable_name("buildProfile"), "HARDHAT_BUILD_PROFILE");
        assert_eq!(env_variable_name("myParam2x"), "HARDHAT_MY_PARAM2X");
    }

    #[test]
    fn no_sources_yields_defaults() {
        let args = resolve_global_arguments(&map(&[]), &registry(), &map(&[])).unwrap();

        assert_eq!(args.len(), 3);
        assert_eq!(args.get_bool("param1"), Some(true));
        assert_eq!(args.get_str("param2"), Some("default"));
        assert_eq!(args.get_bigint("param3"), Some(0));
    }

    #[test]
    fn env_is_used_when_user_value_is_absent() {
        let env = map(&[("HARDHAT_PARAM3", "5n")]);
        let args = resolve_global_arguments(&map(&[]), &registry(), &env).unwrap();
        assert_eq!(args.get("param3"), Some(&ParameterValue::BigInt(5)));
    }

    #[test]
    fn user_value_beats_env() {
        let user = map(&[("param2", "from-user")]);
        let env = map(&[("HARDHAT_PARAM2", "from-env")]);
        let args = resolve_global_arguments(&user, &registry(), &env).unwrap();
        assert_eq!(args.get_str("param2"), Some("from-user"));
    }

    #[test]
    fn unknown_names_are_ignored() {
        let user = map(&[("unknown", "1")]);
        let env = map(&[("HARDHAT_OTHER", "1")]);
        let args = resolve_global_arguments(&user, &registry(), &env).unwrap();
        assert_eq!(args.len(), 3);
        assert!(!args.contains("unknown"));
        assert!(!args.contains("other"));
    }

    #[test]
    fn invalid_user_value_fails_the_whole_resolution() {
        let user = map(&[("param1", "not a boolean")]);
        let err = resolve_global_arguments(&user, &registry(), &map(&[])).unwrap_err();
        assert_eq!(
            err,
            ParameterError::InvalidValueForType {
                name: "param1".into(),
                value: "not a boolean".into(),
                parameter_type: ParameterType::Boolean,
            }
        );
    }

    #[test]
    fn invalid_env_value_fails() {
        let env = map(&[("HARDHAT_PARAM3", "five")]);
        assert!(resolve_global_arguments(&map(&[]), &registry(), &env).is_err());
    }
}
