//! Dynamically-typed values held by the layered store.
//!
//! Every layer (defaults, file, environment, overrides) speaks [`Value`].
//! Typed reads go through the fallible `to_*` coercions, which report the
//! offending key instead of silently falling back to a zero value.

use std::fmt;

use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};

use super::ConfigError;

/// A single configuration value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Value {
    Str(String),
    Bool(bool),
    List(Vec<String>),
    /// A nested mapping. Its entries live under dotted keys; the marker only
    /// records that the parent key itself holds no scalar or list.
    Map,
}

impl Value {
    /// Short type name used in error messages.
    pub fn kind(&self) -> &'static str {
        match self {
            Value::Str(_) => "string",
            Value::Bool(_) => "bool",
            Value::List(_) => "list",
            Value::Map => "mapping",
        }
    }

    /// Coerce to a bool. Strings accept `true/false/t/f/1/0` in any case.
    pub fn to_bool(&self, key: &str) -> Result<bool, ConfigError> {
        match self {
            Value::Bool(b) => Ok(*b),
            Value::Str(s) => match s.trim().to_lowercase().as_str() {
                "true" | "t" | "1" => Ok(true),
                "false" | "f" | "0" => Ok(false),
                _ => Err(self.mismatch(key, "bool")),
            },
            Value::List(_) | Value::Map => Err(self.mismatch(key, "bool")),
        }
    }

    /// Coerce to a string. Bools render as `true` / `false`.
    pub fn to_string_value(&self, key: &str) -> Result<String, ConfigError> {
        match self {
            Value::Str(s) => Ok(s.clone()),
            Value::Bool(b) => Ok(b.to_string()),
            Value::List(_) | Value::Map => Err(self.mismatch(key, "string")),
        }
    }

    /// Coerce to a list of strings.
    ///
    /// A string is split on commas and whitespace, which is how list values
    /// arrive from environment variables (`INIQ_KEYS="github:a gitlab:b"`).
    pub fn to_list(&self, key: &str) -> Result<Vec<String>, ConfigError> {
        match self {
            Value::List(items) => Ok(items.clone()),
            Value::Str(s) => Ok(s
                .split(|c: char| c == ',' || c.is_whitespace())
                .filter(|part| !part.is_empty())
                .map(String::from)
                .collect()),
            Value::Bool(_) | Value::Map => Err(self.mismatch(key, "list")),
        }
    }

    fn mismatch(&self, key: &str, expected: &'static str) -> ConfigError {
        ConfigError::InvalidType {
            key: key.to_string(),
            expected,
            found: format!("{} `{self}`", self.kind()),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Str(s) => write!(f, "{s}"),
            Value::Bool(b) => write!(f, "{b}"),
            Value::List(items) => write!(f, "[{}]", items.join(", ")),
            Value::Map => write!(f, "{{...}}"),
        }
    }
}

impl Serialize for Value {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Value::Str(s) => serializer.serialize_str(s),
            Value::Bool(b) => serializer.serialize_bool(*b),
            Value::List(items) => items.serialize(serializer),
            Value::Map => serializer.serialize_map(Some(0))?.end(),
        }
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Str(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Str(s)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<Vec<String>> for Value {
    fn from(items: Vec<String>) -> Self {
        Value::List(items)
    }
}

/// Convert a parsed YAML node into a store value.
///
/// Returns `None` for `null` (the key is treated as absent) and for mappings,
/// which the caller flattens into dotted keys instead.
pub(crate) fn from_yaml(node: &serde_yaml_ng::Value) -> Option<Value> {
    use serde_yaml_ng::Value as Yaml;

    match node {
        Yaml::Null | Yaml::Mapping(_) => None,
        Yaml::Bool(b) => Some(Value::Bool(*b)),
        Yaml::Tagged(tagged) => from_yaml(&tagged.value),
        Yaml::Sequence(items) => Some(Value::List(items.iter().map(yaml_item_text).collect())),
        scalar => Some(Value::Str(yaml_item_text(scalar))),
    }
}

fn yaml_item_text(node: &serde_yaml_ng::Value) -> String {
    use serde_yaml_ng::Value as Yaml;

    match node {
        Yaml::String(s) => s.clone(),
        Yaml::Bool(b) => b.to_string(),
        Yaml::Number(n) => n.to_string(),
        Yaml::Null => String::new(),
        other => serde_yaml_ng::to_string(other)
            .map(|s| s.trim_end().to_string())
            .unwrap_or_default(),
    }
}
