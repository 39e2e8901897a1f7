//! Global parameter registry.
//!
//! Plugins contribute global parameters; [`build_global_parameters_map`]
//! merges them into one [`GlobalParametersMap`] keyed by name. A name may be
//! owned by exactly one plugin.
//!
//! The map is built once at startup and never mutated afterwards. It keeps
//! declaration order so that listings and resolution are deterministic.

use crate::definition::{
    GlobalParameterSpec, ParameterDefinition, build_global_parameter_definition,
};
use crate::error::ParameterError;
use indexmap::IndexMap;

/// The global parameters one plugin declares.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PluginParameters {
    /// The declaring plugin.
    pub plugin_id: String,
    /// The declared parameters, in declaration order.
    pub parameters: Vec<GlobalParameterSpec>,
}

impl PluginParameters {
    /// Creates the declaration list for `plugin_id`.
    pub fn new(plugin_id: impl Into<String>, parameters: Vec<GlobalParameterSpec>) -> Self {
        Self {
            plugin_id: plugin_id.into(),
            parameters,
        }
    }
}

/// A registered global parameter and the plugin that owns it.
#[derive(Debug, Clone, PartialEq)]
pub struct GlobalParameterEntry {
    plugin_id: String,
    definition: ParameterDefinition,
}

impl GlobalParameterEntry {
    /// The owning plugin.
    #[must_use]
    pub fn plugin_id(&self) -> &str {
        &self.plugin_id
    }

    /// The validated definition.
    #[must_use]
    pub fn definition(&self) -> &ParameterDefinition {
        &self.definition
    }
}

/// Name → owner/definition map of every registered global parameter.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GlobalParametersMap {
    entries: IndexMap<String, GlobalParameterEntry>,
}

impl GlobalParametersMap {
    /// Creates an empty map.
    #[must_use]
    pub fn new() -> Self {
        Self {
            entries: IndexMap::new(),
        }
    }

    /// Returns the entry for `name`.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&GlobalParameterEntry> {
        self.entries.get(name)
    }

    /// Returns whether `name` is registered.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    /// Number of registered parameters.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if no parameter is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterates over `(name, entry)` in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &GlobalParameterEntry)> {
        self.entries.iter().map(|(name, entry)| (name.as_str(), entry))
    }

    /// Returns the registered names in declaration order.
    #[must_use]
    pub fn names(&self) -> Vec<&str> {
        self.entries.keys().map(String::as_str).collect()
    }
}

/// Builds the global parameter registry from plugins in load order.
///
/// Order only affects which plugin is reported as the original owner when
/// two plugins declare the same name.
///
/// # Errors
///
/// - [`ParameterError::GlobalParameterAlreadyDefined`] naming the later
///   plugin and the earlier owner.
/// - Any validation error from [`build_global_parameter_definition`].
pub fn build_global_parameters_map(
    plugins: &[PluginParameters],
) -> Result<GlobalParametersMap, ParameterError> {
    let mut map = GlobalParametersMap::new();

    for plugin in plugins {
        for spec in &plugin.parameters {
            if let Some(existing) = map.entries.get(&spec.name) {
                return Err(ParameterError::GlobalParameterAlreadyDefined {
                    plugin_id: plugin.plugin_id.clone(),
                    name: spec.name.clone(),
                    defined_by: existing.plugin_id.clone(),
                });
            }

            let definition = build_global_parameter_definition(spec)?;
            tracing::debug!(
                plugin = %plugin.plugin_id,
                parameter = %spec.name,
                parameter_type = %definition.parameter_type(),
                "registered global parameter"
            );
            map.entries.insert(
                spec.name.clone(),
                GlobalParameterEntry {
                    plugin_id: plugin.plugin_id.clone(),
                    definition,
                },
            );
        }
    }

    Ok(map)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ParameterType;

    fn plugin(id: &str, names: &[&str]) -> PluginParameters {
        PluginParameters::new(
            id,
            names
                .iter()
                .map(|name| GlobalParameterSpec::new(*name, "", "value"))
                .collect(),
        )
    }

    #[test]
    fn one_entry_per_declared_name() {
        let map = build_global_parameters_map(&[
            plugin("plugin1", &["param1", "param2"]),
            plugin("plugin2", &["param3"]),
            PluginParameters::new("plugin3", Vec::new()),
        ])
        .unwrap();

        assert_eq!(map.len(), 3);
        assert_eq!(map.names(), vec!["param1", "param2", "param3"]);
        assert_eq!(map.get("param1").unwrap().plugin_id(), "plugin1");
        assert_eq!(map.get("param3").unwrap().plugin_id(), "plugin2");
        assert_eq!(
            map.get("param3").unwrap().definition().parameter_type(),
            ParameterType::String
        );
    }

    #[test]
    fn second_declaration_is_a_conflict() {
        let err = build_global_parameters_map(&[
            plugin("plugin1", &["param1"]),
            plugin("plugin2", &["param1"]),
        ])
        .unwrap_err();

        assert_eq!(
            err,
            ParameterError::GlobalParameterAlreadyDefined {
                plugin_id: "plugin2".into(),
                name: "param1".into(),
                defined_by: "plugin1".into(),
            }
        );
    }

    #[test]
    fn duplicate_within_one_plugin_is_a_conflict() {
        let err = build_global_parameters_map(&[plugin("plugin1", &["param1", "param1"])])
            .unwrap_err();
        assert!(matches!(
            err,
            ParameterError::GlobalParameterAlreadyDefined { ref plugin_id, ref defined_by, .. }
                if plugin_id == "plugin1" && defined_by == "plugin1"
        ));
    }

    #[test]
    fn invalid_definition_aborts_the_build() {
        let result = build_global_parameters_map(&[
            plugin("plugin1", &["param1"]),
            plugin("plugin2", &["bad_name"]),
        ]);
        assert_eq!(
            result,
            Err(ParameterError::InvalidName {
                name: "bad_name".into()
            })
        );
    }

    #[test]
    fn empty_plugin_list_builds_empty_map() {
        let map = build_global_parameters_map(&[]).unwrap();
        assert!(map.is_empty());
    }
}
