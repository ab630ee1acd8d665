//! Plugin option model
//!
//! Options are declared in `plugin.spec` and resolved from several layers
//! (see [`resolver`]). Every layer provides raw strings; [`OptionType`] turns
//! them into typed JSON values so defaults, answers-file entries and CLI flags
//! are typed identically.

pub mod resolver;
pub mod vars;

use serde::{Deserialize, Serialize};
use serde_json::Value;

pub use resolver::{OptionResolver, ResolvedOption, ResolvedOptions, ValueSource};
pub use vars::VarsDict;

/// Declared type of a plugin option
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum OptionType {
    /// Free-form string
    #[default]
    Value,
    /// Signed integer
    Int,
    /// Boolean that takes a value (`--opt yes`)
    Bool,
    /// Switch without a value (`--opt`)
    Flag,
    /// Comma-separated list (`a,b,c`)
    ListValue,
    /// Comma-separated `key:value` pairs
    KeyValueList,
}

impl OptionType {
    /// Whether the CLI flag consumes a value
    pub fn takes_value(&self) -> bool {
        !matches!(self, OptionType::Flag)
    }

    /// Convert a raw string into a typed value
    pub fn convert(&self, raw: &str) -> Result<Value, String> {
        match self {
            OptionType::Value => Ok(Value::String(raw.to_string())),
            OptionType::Int => raw
                .trim()
                .parse::<i64>()
                .map(Value::from)
                .map_err(|e| format!("expected an integer ({})", e)),
            OptionType::Bool | OptionType::Flag => parse_bool(raw).map(Value::Bool),
            OptionType::ListValue => Ok(Value::Array(
                split_list(raw).map(|s| Value::String(s.to_string())).collect(),
            )),
            OptionType::KeyValueList => {
                let mut map = serde_json::Map::new();
                for item in split_list(raw) {
                    let (key, value) = item
                        .split_once(':')
                        .ok_or_else(|| format!("expected 'key:value', got '{}'", item))?;
                    let key = key.trim();
                    if key.is_empty() {
                        return Err(format!("empty key in '{}'", item));
                    }
                    map.insert(key.to_string(), Value::String(value.trim().to_string()));
                }
                Ok(Value::Object(map))
            }
        }
    }
}

fn split_list(raw: &str) -> impl Iterator<Item = &str> {
    raw.split(',').map(str::trim).filter(|s| !s.is_empty())
}

fn parse_bool(raw: &str) -> Result<bool, String> {
    match raw.trim().to_lowercase().as_str() {
        "true" | "yes" | "1" | "on" => Ok(true),
        "false" | "no" | "0" | "off" => Ok(false),
        other => Err(format!("expected a boolean, got '{}'", other)),
    }
}

/// One option as declared in `plugin.spec`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OptionSpec {
    #[serde(rename = "type", default)]
    pub option_type: OptionType,

    #[serde(default)]
    pub help: String,

    #[serde(default)]
    pub default: Option<serde_yaml::Value>,

    #[serde(default)]
    pub required: bool,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub choices: Vec<String>,
}

impl OptionSpec {
    /// Default rendered as the raw string a user would type
    ///
    /// Flags without a declared default are off.
    pub fn default_raw(&self) -> Option<String> {
        match &self.default {
            Some(value) => yaml_to_raw(value),
            None if self.option_type == OptionType::Flag => Some("false".to_string()),
            None => None,
        }
    }
}

fn yaml_to_raw(value: &serde_yaml::Value) -> Option<String> {
    use serde_yaml::Value as Y;

    match value {
        Y::Null => None,
        Y::Bool(b) => Some(b.to_string()),
        Y::Number(n) => Some(n.to_string()),
        Y::String(s) => Some(s.clone()),
        Y::Sequence(items) => Some(
            items
                .iter()
                .filter_map(yaml_to_raw)
                .collect::<Vec<_>>()
                .join(","),
        ),
        Y::Mapping(map) => Some(
            map.iter()
                .filter_map(|(k, v)| Some(format!("{}:{}", yaml_to_raw(k)?, yaml_to_raw(v)?)))
                .collect::<Vec<_>>()
                .join(","),
        ),
        Y::Tagged(tagged) => yaml_to_raw(&tagged.value),
    }
}
