//! Nested vars dict handed to the playbook runner
//!
//! Option `foo-bar` of a `provision` plugin ends up at `provision.foo.bar`.

use std::path::Path;

use serde_json::{Map, Value};

use super::ResolvedOptions;
use crate::error::{IrError, IrResult};

/// Separator between nesting levels in option names
pub const OPTION_DELIMITER: char = '-';

#[derive(Debug, Clone, Default, PartialEq)]
pub struct VarsDict(Map<String, Value>);

impl VarsDict {
    /// Nest every resolved option under `plugin_type`
    pub fn build(plugin_type: &str, resolved: &ResolvedOptions) -> IrResult<Self> {
        let mut section = Map::new();
        for opt in resolved.iter() {
            let path: Vec<&str> = opt.name.split(OPTION_DELIMITER).collect();
            insert_strict(&mut section, &path, opt.value.clone(), &opt.name)?;
        }

        let mut root = Map::new();
        root.insert(plugin_type.to_string(), Value::Object(section));
        Ok(Self(root))
    }

    /// Apply `-e/--extra-vars` entries; they win over everything else
    ///
    /// `a.b=value` sets a dotted path, `@path` deep-merges a YAML or JSON file.
    pub fn merge_extra_vars<S: AsRef<str>>(&mut self, entries: &[S]) -> IrResult<()> {
        for entry in entries {
            let entry = entry.as_ref();
            let overlay = if let Some(path) = entry.strip_prefix('@') {
                load_vars_file(entry, Path::new(path))?
            } else {
                let (key, value) = entry.split_once('=').ok_or_else(|| IrError::InvalidExtraVars {
                    entry: entry.to_string(),
                    reason: "expected 'key=value' or '@file'".to_string(),
                })?;
                let path: Vec<&str> = key.trim().split('.').collect();
                if path.iter().any(|p| p.is_empty()) {
                    return Err(IrError::InvalidExtraVars {
                        entry: entry.to_string(),
                        reason: "empty key segment".to_string(),
                    });
                }
                nest(&path, Value::String(value.to_string()))
            };
            deep_merge(&mut self.0, overlay);
        }
        Ok(())
    }

    /// Look up a dotted path, e.g. `provision.foo.bar`
    pub fn get_path(&self, dotted: &str) -> Option<&Value> {
        let mut parts = dotted.split('.');
        let mut current = self.0.get(parts.next()?)?;
        for part in parts {
            current = current.as_object()?.get(part)?;
        }
        Some(current)
    }

    pub fn as_map(&self) -> &Map<String, Value> {
        &self.0
    }

    pub fn into_value(self) -> Value {
        Value::Object(self.0)
    }
}

fn insert_strict(
    map: &mut Map<String, Value>,
    path: &[&str],
    value: Value,
    name: &str,
) -> IrResult<()> {
    let conflict = || IrError::VarsConflict {
        key: name.to_string(),
    };

    match path {
        [] => Err(conflict()),
        [leaf] => {
            if map.contains_key(*leaf) {
                return Err(conflict());
            }
            map.insert(leaf.to_string(), value);
            Ok(())
        }
        [head, rest @ ..] => {
            let child = map
                .entry(head.to_string())
                .or_insert_with(|| Value::Object(Map::new()));
            match child {
                Value::Object(inner) => insert_strict(inner, rest, value, name),
                _ => Err(conflict()),
            }
        }
    }
}

fn nest(path: &[&str], value: Value) -> Map<String, Value> {
    let mut current = value;
    for part in path.iter().skip(1).rev() {
        let mut map = Map::new();
        map.insert(part.to_string(), current);
        current = Value::Object(map);
    }

    let mut root = Map::new();
    root.insert(path[0].to_string(), current);
    root
}

fn load_vars_file(entry: &str, path: &Path) -> IrResult<Map<String, Value>> {
    let invalid = |reason: String| IrError::InvalidExtraVars {
        entry: entry.to_string(),
        reason,
    };

    let content = std::fs::read_to_string(path).map_err(|e| invalid(e.to_string()))?;
    let value: Value = serde_yaml::from_str(&content).map_err(|e| invalid(e.to_string()))?;
    match value {
        Value::Object(map) => Ok(map),
        Value::Null => Ok(Map::new()),
        _ => Err(invalid("vars file must contain a mapping".to_string())),
    }
}

fn deep_merge(dst: &mut Map<String, Value>, src: Map<String, Value>) {
    for (key, value) in src {
        let Value::Object(incoming) = value else {
            dst.insert(key, value);
            continue;
        };

        if let Some(Value::Object(existing)) = dst.get_mut(&key) {
            deep_merge(existing, incoming);
        } else {
            dst.insert(key, Value::Object(incoming));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::options::{OptionResolver, OptionSpec, OptionType};
    use serde_json::json;
    use tempfile::TempDir;

    fn value_spec(default: &str) -> OptionSpec {
        OptionSpec {
            option_type: OptionType::Value,
            default: Some(serde_yaml::Value::String(default.to_string())),
            ..Default::default()
        }
    }

    #[test]
    fn test_build_nests_by_delimiter() {
        let foo_bar = value_spec("default string");
        let name = value_spec("vm");
        let resolved = OptionResolver::new("example", [("foo-bar", &foo_bar), ("name", &name)])
            .resolve()
            .unwrap();

        let vars = VarsDict::build("provision", &resolved).unwrap();
        assert_eq!(
            vars.into_value(),
            json!({"provision": {"foo": {"bar": "default string"}, "name": "vm"}})
        );
    }

    #[test]
    fn test_leaf_and_branch_conflict() {
        let foo = value_spec("x");
        let foo_bar = value_spec("y");
        let resolved = OptionResolver::new("example", [("foo", &foo), ("foo-bar", &foo_bar)])
            .resolve()
            .unwrap();

        let err = VarsDict::build("provision", &resolved).unwrap_err();
        assert!(matches!(err, IrError::VarsConflict { .. }));
    }

    #[test]
    fn test_extra_vars_override_and_extend() {
        let foo_bar = value_spec("default string");
        let resolved = OptionResolver::new("example", [("foo-bar", &foo_bar)])
            .resolve()
            .unwrap();
        let mut vars = VarsDict::build("provision", &resolved).unwrap();

        vars.merge_extra_vars(&["provision.foo.bar=overridden", "site.region=eu"])
            .unwrap();

        assert_eq!(vars.get_path("provision.foo.bar"), Some(&json!("overridden")));
        assert_eq!(vars.get_path("site.region"), Some(&json!("eu")));
    }

    #[test]
    fn test_extra_vars_from_file() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("extra.yml");
        std::fs::write(&path, "provision:\n  foo:\n    baz: 3\n").unwrap();

        let foo_bar = value_spec("default string");
        let resolved = OptionResolver::new("example", [("foo-bar", &foo_bar)])
            .resolve()
            .unwrap();
        let mut vars = VarsDict::build("provision", &resolved).unwrap();
        vars.merge_extra_vars(&[format!("@{}", path.display())])
            .unwrap();

        assert_eq!(vars.get_path("provision.foo.bar"), Some(&json!("default string")));
        assert_eq!(vars.get_path("provision.foo.baz"), Some(&json!(3)));
    }

    #[test]
    fn test_malformed_extra_vars() {
        let mut vars = VarsDict::default();
        assert!(matches!(
            vars.merge_extra_vars(&["novalue"]),
            Err(IrError::InvalidExtraVars { .. })
        ));
        assert!(matches!(
            vars.merge_extra_vars(&["a..b=1"]),
            Err(IrError::InvalidExtraVars { .. })
        ));
        assert!(matches!(
            vars.merge_extra_vars(&["@/nonexistent/extra.yml"]),
            Err(IrError::InvalidExtraVars { .. })
        ));
    }
}
