//! Task parameters and the arguments supplied for them.

use hardhat_params::{ParameterType, ParameterValue, is_value_valid};
use indexmap::IndexMap;

/// How a task parameter is supplied on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ParameterKind {
    /// `--name value`, always has a default.
    Option,
    /// `--name`, a boolean defaulting to `false`.
    Flag,
    /// A single positional value.
    Positional,
    /// Every remaining positional value.
    Variadic,
}

impl ParameterKind {
    /// Returns whether the parameter is given by position rather than by name.
    #[must_use]
    pub fn is_positional(self) -> bool {
        matches!(self, Self::Positional | Self::Variadic)
    }
}

/// A parameter declared by a task.
#[derive(Debug, Clone, PartialEq)]
pub struct TaskParameter {
    name: String,
    description: String,
    kind: ParameterKind,
    parameter_type: ParameterType,
    default_value: Option<TaskArgument>,
}

impl TaskParameter {
    pub(crate) fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        kind: ParameterKind,
        parameter_type: ParameterType,
        default_value: Option<TaskArgument>,
    ) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            kind,
            parameter_type,
            default_value,
        }
    }

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

    /// How the parameter is supplied.
    #[must_use]
    pub fn kind(&self) -> ParameterKind {
        self.kind
    }

    /// The type of each value.
    #[must_use]
    pub fn parameter_type(&self) -> ParameterType {
        self.parameter_type
    }

    /// The value used when no argument is supplied.
    #[must_use]
    pub fn default_value(&self) -> Option<&TaskArgument> {
        self.default_value.as_ref()
    }

    /// Returns whether an argument must be supplied.
    #[must_use]
    pub fn is_required(&self) -> bool {
        self.default_value.is_none()
    }

    /// Returns whether `argument` has the right shape and type for this parameter.
    #[must_use]
    pub fn accepts(&self, argument: &TaskArgument) -> bool {
        match (self.kind, argument) {
            (ParameterKind::Variadic, TaskArgument::List(values)) => values
                .iter()
                .all(|value| is_value_valid(self.parameter_type, value)),
            (ParameterKind::Variadic, TaskArgument::Value(_)) | (_, TaskArgument::List(_)) => false,
            (_, TaskArgument::Value(value)) => is_value_valid(self.parameter_type, value),
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Arguments
// ─────────────────────────────────────────────────────────────────────────────

/// Value supplied for one task parameter.
#[derive(Debug, Clone, PartialEq)]
pub enum TaskArgument {
    /// Value of an option, flag or positional parameter.
    Value(ParameterValue),
    /// Values of a variadic parameter.
    List(Vec<ParameterValue>),
}

impl TaskArgument {
    /// The single value, if this is not a list.
    #[must_use]
    pub fn as_value(&self) -> Option<&ParameterValue> {
        match self {
            Self::Value(value) => Some(value),
            Self::List(_) => None,
        }
    }

    /// The values, if this is a list.
    #[must_use]
    pub fn as_list(&self) -> Option<&[ParameterValue]> {
        match self {
            Self::List(values) => Some(values),
            Self::Value(_) => None,
        }
    }
}

macro_rules! impl_from_value {
    ($($ty:ty),* $(,)?) => {
        $(
            impl From<$ty> for TaskArgument {
                fn from(value: $ty) -> Self {
                    Self::Value(value.into())
                }
            }
        )*
    };
}

impl_from_value!(ParameterValue, &str, String, bool, i64, i128, f64, std::path::PathBuf);

impl From<Vec<ParameterValue>> for TaskArgument {
    fn from(values: Vec<ParameterValue>) -> Self {
        Self::List(values)
    }
}

/// Arguments of one task invocation, keyed by parameter name.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TaskArguments {
    values: IndexMap<String, TaskArgument>,
}

impl TaskArguments {
    /// Creates an empty argument set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds an argument, builder style.
    #[must_use]
    pub fn with(mut self, name: impl Into<String>, argument: impl Into<TaskArgument>) -> Self {
        self.insert(name, argument);
        self
    }

    /// Sets an argument, returning the previous one.
    pub fn insert(
        &mut self,
        name: impl Into<String>,
        argument: impl Into<TaskArgument>,
    ) -> Option<TaskArgument> {
        self.values.insert(name.into(), argument.into())
    }

    /// Returns the argument for `name`.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&TaskArgument> {
        self.values.get(name)
    }

    /// Returns the single value for `name`.
    #[must_use]
    pub fn value(&self, name: &str) -> Option<&ParameterValue> {
        self.get(name).and_then(TaskArgument::as_value)
    }

    /// Returns the string value for `name`.
    #[must_use]
    pub fn get_str(&self, name: &str) -> Option<&str> {
        self.value(name).and_then(ParameterValue::as_str)
    }

    /// Returns the boolean value for `name`.
    #[must_use]
    pub fn get_bool(&self, name: &str) -> Option<bool> {
        self.value(name).and_then(ParameterValue::as_bool)
    }

    /// Returns the integer value for `name`.
    #[must_use]
    pub fn get_int(&self, name: &str) -> Option<i64> {
        self.value(name).and_then(ParameterValue::as_int)
    }

    /// Returns the list of values for `name`.
    #[must_use]
    pub fn get_list(&self, name: &str) -> Option<&[ParameterValue]> {
        self.get(name).and_then(TaskArgument::as_list)
    }

    /// Returns whether an argument is present for `name`.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.values.contains_key(name)
    }

    /// Number of arguments.
    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Returns whether there are no arguments.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Iterates over arguments in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &TaskArgument)> {
        self.values.iter().map(|(name, argument)| (name.as_str(), argument))
    }

    pub(crate) fn remove(&mut self, name: &str) -> Option<TaskArgument> {
        self.values.shift_remove(name)
    }

    pub(crate) fn names(&self) -> impl Iterator<Item = &str> {
        self.values.keys().map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn variadic_accepts_only_typed_lists() {
        let files =
            TaskParameter::new("files", "", ParameterKind::Variadic, ParameterType::Int, None);
        assert!(files.accepts(&TaskArgument::List(vec![1_i64.into(), 2_i64.into()])));
        assert!(files.accepts(&TaskArgument::List(Vec::new())));
        assert!(!files.accepts(&TaskArgument::List(vec!["x".into()])));
        assert!(!files.accepts(&1_i64.into()));
    }

    #[test]
    fn single_valued_parameters_reject_lists() {
        let name =
            TaskParameter::new("name", "", ParameterKind::Option, ParameterType::String, None);
        assert!(name.accepts(&"alice".into()));
        assert!(!name.accepts(&true.into()));
        assert!(!name.accepts(&TaskArgument::List(vec!["alice".into()])));
    }

    #[test]
    fn typed_getters() {
        let args = TaskArguments::new()
            .with("name", "alice")
            .with("count", 3_i64)
            .with("quiet", true)
            .with("files", vec![ParameterValue::from("a.sol")]);

        assert_eq!(args.get_str("name"), Some("alice"));
        assert_eq!(args.get_int("count"), Some(3));
        assert_eq!(args.get_bool("quiet"), Some(true));
        assert_eq!(args.get_list("files").map(<[_]>::len), Some(1));
        assert_eq!(args.get_str("files"), None);
    }
}
