//! Plugins: the unit of extension of a runtime environment.
//!
//! A plugin contributes any mix of global parameters, hook handlers and
//! task definitions. Built-in functionality is delivered the same way, so
//! everything a plugin adds can be replaced or disabled.
//!
//! # Example
//!
//! ```
//! use hardhat_hooks::{HookRegistrar, HookResult};
//! use hardhat_params::{GlobalParameterSpec, ParameterType};
//! use hardhat_runtime::{Plugin, PluginGroup, PluginGroupBuilder};
//!
//! struct GasReporter;
//!
//! impl Plugin for GasReporter {
//!     fn id(&self) -> &str {
//!         "gas-reporter"
//!     }
//!
//!     fn global_parameters(&self) -> Vec<GlobalParameterSpec> {
//!         vec![GlobalParameterSpec::new("reportGas", "Print gas usage", false)
//!             .with_type(ParameterType::Boolean)]
//!     }
//! }
//!
//! struct Toolbox;
//!
//! impl PluginGroup for Toolbox {
//!     fn build(self) -> PluginGroupBuilder {
//!         PluginGroupBuilder::new().add(GasReporter)
//!     }
//! }
//!
//! assert_eq!(Toolbox.build().len(), 1);
//! ```

use core::cmp::Reverse;
use std::collections::BinaryHeap;

use hardhat_hooks::{HookRegistrar, HookResult};
use hardhat_params::GlobalParameterSpec;
use hardhat_tasks::TaskDefinition;
use hashbrown::{HashMap, HashSet};

use crate::error::RuntimeError;

// ─────────────────────────────────────────────────────────────────────────────
// Plugin Trait
// ─────────────────────────────────────────────────────────────────────────────

/// A unit of extension.
///
/// Only [`id`](Plugin::id) is required; every contribution defaults to
/// nothing.
pub trait Plugin: Send + Sync + 'static {
    /// Unique id, recorded as the owner of everything the plugin contributes.
    fn id(&self) -> &str;

    /// Ids of plugins that must be set up before this one.
    fn dependencies(&self) -> Vec<&str> {
        Vec::new()
    }

    /// Global parameters declared by the plugin.
    fn global_parameters(&self) -> Vec<GlobalParameterSpec> {
        Vec::new()
    }

    /// Registers the plugin's hook handlers.
    ///
    /// # Errors
    ///
    /// Registration errors from the [`HookRegistrar`].
    fn register_hooks(&self, _hooks: &HookRegistrar<'_>) -> HookResult<()> {
        Ok(())
    }

    /// Task definitions contributed by the plugin, applied in order.
    fn tasks(&self) -> Vec<TaskDefinition> {
        Vec::new()
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Plugins Trait (for add_plugins polymorphism)
// ─────────────────────────────────────────────────────────────────────────────

/// Anything that can be added to a [`PluginList`]: a single plugin or a
/// [`PluginGroupBuilder`].
pub trait Plugins {
    /// Appends these plugins to `list`.
    fn add_to_list(self, list: &mut PluginList);
}

impl<P: Plugin> Plugins for P {
    fn add_to_list(self, list: &mut PluginList) {
        list.push(Box::new(self));
    }
}

impl Plugins for PluginGroupBuilder {
    fn add_to_list(self, list: &mut PluginList) {
        for plugin in self.plugins {
            list.push(plugin);
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// PluginGroup
// ─────────────────────────────────────────────────────────────────────────────

/// A bundle of plugins that can be customized before it is added.
pub trait PluginGroup {
    /// Returns the plugins in this group.
    fn build(self) -> PluginGroupBuilder;
}

/// Builder for customizing plugin groups.
///
/// ```ignore
/// DefaultPlugins
///     .build()
///     .disable("hardhat:tracing")
///     .add_after("hardhat:builtin-globals", MyGlobals)
/// ```
#[derive(Default)]
pub struct PluginGroupBuilder {
    plugins: Vec<Box<dyn Plugin>>,
}

impl core::fmt::Debug for PluginGroupBuilder {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("PluginGroupBuilder")
            .field("plugins", &self.ids())
            .finish()
    }
}

impl PluginGroupBuilder {
    /// Creates an empty builder.
    #[must_use]
    pub fn new() -> Self {
        Self {
            plugins: Vec::new(),
        }
    }

    /// Adds a plugin to the end of the group.
    #[must_use]
    #[expect(
        clippy::should_implement_trait,
        reason = "This is a builder method, not std::ops::Add"
    )]
    pub fn add<P: Plugin>(mut self, plugin: P) -> Self {
        self.plugins.push(Box::new(plugin));
        self
    }

    /// Adds a plugin before the plugin with id `target`, or at the start if
    /// there is none.
    #[must_use]
    pub fn add_before<P: Plugin>(mut self, target: &str, plugin: P) -> Self {
        let position = self.position(target).unwrap_or(0);
        self.plugins.insert(position, Box::new(plugin));
        self
    }

    /// Adds a plugin after the plugin with id `target`, or at the end if
    /// there is none.
    #[must_use]
    pub fn add_after<P: Plugin>(mut self, target: &str, plugin: P) -> Self {
        let position = self
            .position(target)
            .map_or(self.plugins.len(), |index| index + 1);
        self.plugins.insert(position, Box::new(plugin));
        self
    }

    /// Removes the plugin with id `id`. No-op if absent.
    #[must_use]
    pub fn disable(mut self, id: &str) -> Self {
        self.plugins.retain(|plugin| plugin.id() != id);
        self
    }

    /// Plugin ids in group order.
    #[must_use]
    pub fn ids(&self) -> Vec<&str> {
        self.plugins.iter().map(|plugin| plugin.id()).collect()
    }

    /// Returns the number of plugins in the group.
    #[must_use]
    pub fn len(&self) -> usize {
        self.plugins.len()
    }

    /// Returns true if the group contains no plugins.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.plugins.is_empty()
    }

    fn position(&self, id: &str) -> Option<usize> {
        self.plugins.iter().position(|plugin| plugin.id() == id)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// PluginList
// ─────────────────────────────────────────────────────────────────────────────

/// The plugins of one runtime environment, in insertion order.
#[derive(Default)]
pub struct PluginList {
    plugins: Vec<Box<dyn Plugin>>,
}

impl core::fmt::Debug for PluginList {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_list()
            .entries(self.plugins.iter().map(|plugin| plugin.id()))
            .finish()
    }
}

impl PluginList {
    /// Creates an empty list.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends `plugins`.
    pub fn add<P: Plugins>(&mut self, plugins: P) -> &mut Self {
        plugins.add_to_list(self);
        self
    }

    /// Appends a boxed plugin.
    pub fn push(&mut self, plugin: Box<dyn Plugin>) {
        self.plugins.push(plugin);
    }

    /// Removes every plugin with id `id`; returns whether any was removed.
    pub fn disable(&mut self, id: &str) -> bool {
        let before = self.plugins.len();
        self.plugins.retain(|plugin| plugin.id() != id);
        self.plugins.len() != before
    }

    /// Returns true if a plugin with id `id` was added.
    #[must_use]
    pub fn contains(&self, id: &str) -> bool {
        self.plugins.iter().any(|plugin| plugin.id() == id)
    }

    /// Plugin ids in insertion order.
    #[must_use]
    pub fn ids(&self) -> Vec<&str> {
        self.plugins.iter().map(|plugin| plugin.id()).collect()
    }

    /// Returns the number of plugins.
    #[must_use]
    pub fn len(&self) -> usize {
        self.plugins.len()
    }

    /// Returns true if the list is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.plugins.is_empty()
    }

    /// Orders the plugins so each comes after its dependencies.
    ///
    /// Plugins without an ordering constraint between them keep their
    /// insertion order.
    ///
    /// # Errors
    ///
    /// - [`RuntimeError::DuplicatePluginId`] if two plugins share an id.
    /// - [`RuntimeError::MissingPluginDependency`] if a dependency is absent.
    /// - [`RuntimeError::PluginDependencyCycle`] if dependencies are circular.
    pub fn resolve(self) -> Result<Vec<Box<dyn Plugin>>, RuntimeError> {
        let count = self.plugins.len();

        let mut index_of: HashMap<String, usize> = HashMap::with_capacity(count);
        for (index, plugin) in self.plugins.iter().enumerate() {
            if index_of.insert(plugin.id().to_owned(), index).is_some() {
                return Err(RuntimeError::DuplicatePluginId {
                    id: plugin.id().to_owned(),
                });
            }
        }

        let mut in_degree = vec![0_usize; count];
        let mut dependents: Vec<Vec<usize>> = vec![Vec::new(); count];
        for (index, plugin) in self.plugins.iter().enumerate() {
            let mut seen = HashSet::new();
            for dependency in plugin.dependencies() {
                if !seen.insert(dependency) {
                    continue;
                }
                let Some(&dependency_index) = index_of.get(dependency) else {
                    return Err(RuntimeError::MissingPluginDependency {
                        plugin: plugin.id().to_owned(),
                        dependency: dependency.to_owned(),
                    });
                };
                dependents[dependency_index].push(index);
                in_degree[index] += 1;
            }
        }

        // Kahn's algorithm, always taking the earliest ready plugin.
        let mut ready: BinaryHeap<Reverse<usize>> = in_degree
            .iter()
            .enumerate()
            .filter(|(_, degree)| **degree == 0)
            .map(|(index, _)| Reverse(index))
            .collect();
        let mut order = Vec::with_capacity(count);
        while let Some(Reverse(index)) = ready.pop() {
            order.push(index);
            for &dependent in &dependents[index] {
                in_degree[dependent] -= 1;
                if in_degree[dependent] == 0 {
                    ready.push(Reverse(dependent));
                }
            }
        }

        if order.len() != count {
            let plugins = in_degree
                .iter()
                .enumerate()
                .filter(|(_, degree)| **degree > 0)
                .map(|(index, _)| self.plugins[index].id().to_owned())
                .collect();
            return Err(RuntimeError::PluginDependencyCycle { plugins });
        }

        let mut slots: Vec<Option<Box<dyn Plugin>>> =
            self.plugins.into_iter().map(Some).collect();
        Ok(order
            .into_iter()
            .filter_map(|index| slots[index].take())
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Named(&'static str, Vec<&'static str>);

    impl Plugin for Named {
        fn id(&self) -> &str {
            self.0
        }

        fn dependencies(&self) -> Vec<&str> {
            self.1.clone()
        }
    }

    fn plugin(id: &'static str) -> Named {
        Named(id, Vec::new())
    }

    fn resolved_ids(list: PluginList) -> Vec<String> {
        list.resolve()
            .unwrap()
            .iter()
            .map(|plugin| plugin.id().to_owned())
            .collect()
    }

    #[test]
    fn plugin_defaults_contribute_nothing() {
        let plugin = plugin("a");
        assert!(plugin.dependencies().is_empty());
        assert!(plugin.global_parameters().is_empty());
        assert!(plugin.tasks().is_empty());
    }

    #[test]
    fn plugin_group_builder_add() {
        let builder = PluginGroupBuilder::new().add(plugin("a")).add(plugin("b"));
        assert_eq!(builder.len(), 2);
        assert_eq!(builder.ids(), vec!["a", "b"]);
    }

    #[test]
    fn plugin_group_builder_disable() {
        let builder = PluginGroupBuilder::new()
            .add(plugin("a"))
            .add(plugin("b"))
            .disable("a")
            .disable("missing");
        assert_eq!(builder.ids(), vec!["b"]);
    }

    #[test]
    fn plugin_group_builder_add_before_and_after() {
        let builder = PluginGroupBuilder::new()
            .add(plugin("a"))
            .add(plugin("b"))
            .add_before("b", plugin("c"))
            .add_after("a", plugin("d"))
            .add_before("missing", plugin("first"))
            .add_after("missing", plugin("last"));
        assert_eq!(builder.ids(), vec!["first", "a", "d", "c", "b", "last"]);
    }

    #[test]
    fn list_accepts_groups_and_single_plugins() {
        let mut list = PluginList::new();
        list.add(PluginGroupBuilder::new().add(plugin("a")).add(plugin("b")))
            .add(plugin("c"));
        assert_eq!(list.ids(), vec!["a", "b", "c"]);
        assert!(list.disable("b"));
        assert!(!list.disable("b"));
        assert!(list.contains("c"));
        assert_eq!(list.len(), 2);
    }

    #[test]
    fn resolve_keeps_insertion_order_without_dependencies() {
        let mut list = PluginList::new();
        list.add(plugin("c")).add(plugin("a")).add(plugin("b"));
        assert_eq!(resolved_ids(list), vec!["c", "a", "b"]);
    }

    #[test]
    fn resolve_puts_dependencies_first() {
        let mut list = PluginList::new();
        list.add(Named("app", vec!["ethers", "network"]))
            .add(plugin("network"))
            .add(Named("ethers", vec!["network"]));
        assert_eq!(resolved_ids(list), vec!["network", "ethers", "app"]);
    }

    #[test]
    fn resolve_rejects_duplicates() {
        let mut list = PluginList::new();
        list.add(plugin("a")).add(plugin("a"));
        assert!(matches!(
            list.resolve(),
            Err(RuntimeError::DuplicatePluginId { ref id }) if id == "a"
        ));
    }

    #[test]
    fn resolve_rejects_missing_dependencies() {
        let mut list = PluginList::new();
        list.add(Named("a", vec!["ghost"]));
        assert!(matches!(
            list.resolve(),
            Err(RuntimeError::MissingPluginDependency { ref dependency, .. })
                if dependency == "ghost"
        ));
    }

    #[test]
    fn resolve_rejects_cycles() {
        let mut list = PluginList::new();
        list.add(plugin("root"))
            .add(Named("a", vec!["b"]))
            .add(Named("b", vec!["a"]));
        let Err(RuntimeError::PluginDependencyCycle { plugins }) = list.resolve() else {
            panic!("expected a cycle error");
        };
        assert_eq!(plugins, vec!["a", "b"]);
    }
}
