//! Plugins
//!
//! A plugin is a directory holding a `plugin.spec` (YAML) and the playbook
//! named by its entry point:
//!
//! ```yaml
//! config:
//!   plugin_type: provision
//!   entry_point: main.yml
//! subparsers:
//!   example:
//!     description: Example provisioner plugin
//!     include_groups: ["Ansible options", "Common options", "Answers file"]
//!     groups:
//!       - title: Example options
//!         options:
//!           foo-bar:
//!             type: Value
//!             help: "foo.bar option"
//!             default: "default string"
//! ```

pub mod registry;

use std::collections::{BTreeMap, HashSet};
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{IrError, IrResult};
use crate::options::OptionSpec;

pub use registry::PluginRegistry;

/// Declarative description file every plugin directory carries
pub const PLUGIN_SPEC_FILE: &str = "plugin.spec";

/// Option names owned by the shared control groups
pub const RESERVED_OPTIONS: &[&str] = &[
    "ansible-args",
    "verbose",
    "dry-run",
    "output",
    "extra-vars",
    "debug",
    "from-file",
    "generate-answers-file",
    "help",
];

fn default_entry_point() -> String {
    "main.yml".to_string()
}

#[derive(Debug, Deserialize)]
struct PluginSpecFile {
    config: PluginConfig,
    subparsers: BTreeMap<String, SubparserSpec>,
}

#[derive(Debug, Deserialize)]
struct PluginConfig {
    plugin_type: String,
    #[serde(default = "default_entry_point")]
    entry_point: String,
}

#[derive(Debug, Deserialize)]
struct SubparserSpec {
    #[serde(default)]
    description: String,
    #[serde(default)]
    include_groups: Option<Vec<String>>,
    #[serde(default)]
    groups: Vec<OptionGroup>,
}

/// Titled group of options, rendered as a help heading
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OptionGroup {
    pub title: String,
    #[serde(default)]
    pub options: BTreeMap<String, OptionSpec>,
}

/// A loaded plugin
#[derive(Debug, Clone, PartialEq)]
pub struct Plugin {
    pub name: String,
    /// Top-level vars key the options are nested under
    pub plugin_type: String,
    pub description: String,
    pub dir: PathBuf,
    /// Playbook path relative to `dir`
    pub entry_point: String,
    /// Shared control groups to expose; `None` means all of them
    pub include_groups: Option<Vec<String>>,
    pub groups: Vec<OptionGroup>,
}

impl Plugin {
    /// Load `<dir>/plugin.spec`
    pub fn load(dir: impl AsRef<Path>) -> IrResult<Self> {
        let dir = dir.as_ref();
        let spec_path = dir.join(PLUGIN_SPEC_FILE);
        if !spec_path.is_file() {
            return Err(IrError::PluginSpecMissing {
                path: dir.to_path_buf(),
            });
        }

        let content = std::fs::read_to_string(&spec_path)?;
        let plugin = Self::from_spec_str(dir, &content)?;
        debug!(
            "Loaded plugin '{}' ({}) from {:?}",
            plugin.name, plugin.plugin_type, dir
        );
        Ok(plugin)
    }

    /// Parse spec content for a plugin living in `dir`
    pub fn from_spec_str(dir: &Path, content: &str) -> IrResult<Self> {
        let invalid = |message: String| IrError::PluginSpec {
            path: dir.join(PLUGIN_SPEC_FILE),
            message,
        };

        let file: PluginSpecFile =
            serde_yaml::from_str(content).map_err(|e| invalid(e.to_string()))?;

        if file.subparsers.len() != 1 {
            return Err(invalid(format!(
                "expected exactly one subparser, found {}",
                file.subparsers.len()
            )));
        }
        let Some((name, sub)) = file.subparsers.into_iter().next() else {
            return Err(invalid("no subparser defined".to_string()));
        };

        let mut seen = HashSet::new();
        for group in &sub.groups {
            for option in group.options.keys() {
                if option.is_empty()
                    || option.starts_with('-')
                    || option.contains(|c: char| c == '=' || c.is_whitespace())
                {
                    return Err(invalid(format!("invalid option name '{}'", option)));
                }
                if RESERVED_OPTIONS.contains(&option.as_str()) {
                    return Err(invalid(format!(
                        "option '{}' is reserved for control arguments",
                        option
                    )));
                }
                if !seen.insert(option.clone()) {
                    return Err(invalid(format!("option '{}' declared twice", option)));
                }
            }
        }

        Ok(Self {
            name,
            plugin_type: file.config.plugin_type,
            description: sub.description,
            dir: dir.to_path_buf(),
            entry_point: file.config.entry_point,
            include_groups: sub.include_groups,
            groups: sub.groups,
        })
    }

    /// Absolute path of the entry-point playbook
    pub fn playbook(&self) -> PathBuf {
        self.dir.join(&self.entry_point)
    }

    /// Every declared option across groups
    pub fn options(&self) -> impl Iterator<Item = (&str, &OptionSpec)> {
        self.groups
            .iter()
            .flat_map(|g| g.options.iter().map(|(name, spec)| (name.as_str(), spec)))
    }

    pub fn option(&self, name: &str) -> Option<&OptionSpec> {
        self.groups.iter().find_map(|g| g.options.get(name))
    }

    /// Whether a shared control group should be exposed
    pub fn includes_group(&self, title: &str) -> bool {
        match &self.include_groups {
            Some(groups) => groups.iter().any(|g| g == title),
            None => true,
        }
    }
}
