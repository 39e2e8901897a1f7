//! Configuration values passed through the config hooks.
//!
//! The user writes a [`UserConfig`]; plugins extend and validate it through
//! the `config` hook category and finally resolve it into a
//! [`ResolvedConfig`], which the runtime environment exposes read-only.
//!
//! Both are open JSON objects: plugins own their own keys and read them with
//! [`get`](UserConfig::get), deserializing into their own types.
//!
//! ```
//! use hardhat_config::UserConfig;
//! use serde::Deserialize;
//!
//! #[derive(Deserialize)]
//! struct Paths { sources: String }
//!
//! let mut config = UserConfig::new();
//! config.set("paths", serde_json::json!({ "sources": "contracts" })).unwrap();
//!
//! let paths: Paths = config.get("paths").unwrap().unwrap();
//! assert_eq!(paths.sources, "contracts");
//! ```

use core::fmt;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;

/// Errors reading or writing configuration values.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The configuration root must be a JSON object.
    #[error("configuration must be an object, found {found}")]
    NotAnObject {
        /// JSON kind that was found instead.
        found: &'static str,
    },

    /// A value could not be converted to or from JSON.
    #[error("configuration key '{key}': {source}")]
    Serde {
        /// The key being read or written.
        key: String,
        /// The underlying serde error.
        #[source]
        source: serde_json::Error,
    },
}

/// A single problem found while validating a user config.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfigValidationError {
    /// Path of keys leading to the invalid value.
    pub path: Vec<String>,
    /// What is wrong with it.
    pub message: String,
}

impl ConfigValidationError {
    /// Creates a validation error at `path`.
    pub fn new<P, S>(path: P, message: impl Into<String>) -> Self
    where
        P: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            path: path.into_iter().map(Into::into).collect(),
            message: message.into(),
        }
    }
}

impl fmt::Display for ConfigValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.path.is_empty() {
            write!(f, "{}", self.message)
        } else {
            write!(f, "{}: {}", self.path.join("."), self.message)
        }
    }
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

macro_rules! impl_config_object {
    ($name:ident) => {
        impl $name {
            /// Creates an empty configuration.
            #[must_use]
            pub fn new() -> Self {
                Self { values: Map::new() }
            }

            /// Wraps a JSON value, which must be an object.
            pub fn from_value(value: Value) -> Result<Self, ConfigError> {
                match value {
                    Value::Object(values) => Ok(Self { values }),
                    other => Err(ConfigError::NotAnObject {
                        found: kind_of(&other),
                    }),
                }
            }

            /// Deserializes the value at `key`, or `None` if the key is absent.
            pub fn get<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>, ConfigError> {
                self.values
                    .get(key)
                    .map(|value| {
                        serde_json::from_value(value.clone()).map_err(|source| ConfigError::Serde {
                            key: key.to_owned(),
                            source,
                        })
                    })
                    .transpose()
            }

            /// Returns the raw JSON value at `key`.
            #[must_use]
            pub fn get_raw(&self, key: &str) -> Option<&Value> {
                self.values.get(key)
            }

            /// Serializes `value` under `key`, replacing any previous value.
            pub fn set(
                &mut self,
                key: impl Into<String>,
                value: impl Serialize,
            ) -> Result<(), ConfigError> {
                let key = key.into();
                let value = serde_json::to_value(value).map_err(|source| ConfigError::Serde {
                    key: key.clone(),
                    source,
                })?;
                self.values.insert(key, value);
                Ok(())
            }

            /// Returns whether `key` is present.
            #[must_use]
            pub fn contains(&self, key: &str) -> bool {
                self.values.contains_key(key)
            }

            /// Returns the top-level keys.
            pub fn keys(&self) -> impl Iterator<Item = &str> {
                self.values.keys().map(String::as_str)
            }

            /// Returns the underlying JSON object.
            #[must_use]
            pub fn as_map(&self) -> &Map<String, Value> {
                &self.values
            }
        }
    };
}

/// Configuration as written by the user and extended by plugins.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserConfig {
    values: Map<String, Value>,
}

impl_config_object!(UserConfig);

/// Configuration after every plugin had the chance to resolve it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ResolvedConfig {
    values: Map<String, Value>,
}

impl_config_object!(ResolvedConfig);

impl From<UserConfig> for ResolvedConfig {
    fn from(config: UserConfig) -> Self {
        Self {
            values: config.values,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn from_value_requires_object() {
        assert!(UserConfig::from_value(json!({ "a": 1 })).is_ok());
        let err = UserConfig::from_value(json!([1, 2])).unwrap_err();
        assert!(matches!(err, ConfigError::NotAnObject { found: "an array" }));
    }

    #[test]
    fn get_reports_type_errors_with_key() {
        let config = UserConfig::from_value(json!({ "count": "many" })).unwrap();
        let err = config.get::<u32>("count").unwrap_err();
        assert!(matches!(err, ConfigError::Serde { ref key, .. } if key == "count"));
        assert_eq!(config.get::<u32>("missing").unwrap(), None);
    }

    #[test]
    fn resolving_keeps_values() {
        let mut user = UserConfig::new();
        user.set("solidity", "0.8.28").unwrap();
        let resolved = ResolvedConfig::from(user);
        assert_eq!(
            resolved.get::<String>("solidity").unwrap().as_deref(),
            Some("0.8.28")
        );
        assert_eq!(resolved.keys().collect::<Vec<_>>(), vec!["solidity"]);
    }

    #[test]
    fn validation_error_display_joins_path() {
        let err = ConfigValidationError::new(["networks", "local", "url"], "expected a url");
        assert_eq!(err.to_string(), "networks.local.url: expected a url");
        let err = ConfigValidationError::new(Vec::<String>::new(), "empty");
        assert_eq!(err.to_string(), "empty");
    }
}
