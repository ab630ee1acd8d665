//! Plugin discovery
//!
//! Every direct subdirectory of the plugins root that carries a `plugin.spec`
//! is loaded. Broken plugins are skipped with a warning so one bad spec does
//! not take the whole CLI down.

use std::collections::BTreeMap;
use std::path::Path;

use tracing::{debug, info, warn};

use super::{Plugin, PLUGIN_SPEC_FILE};
use crate::error::IrResult;

#[derive(Debug, Clone, Default)]
pub struct PluginRegistry {
    plugins: BTreeMap<String, Plugin>,
}

impl PluginRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Discover plugins under `root`
    pub fn load_from_dir(root: &Path) -> IrResult<Self> {
        let mut registry = Self::new();

        if !root.exists() {
            warn!("Plugins directory does not exist: {:?}", root);
            return Ok(registry);
        }

        let mut dirs: Vec<_> = std::fs::read_dir(root)?
            .filter_map(|entry| entry.ok().map(|e| e.path()))
            .filter(|path| path.join(PLUGIN_SPEC_FILE).is_file())
            .collect();
        dirs.sort();

        for dir in dirs {
            match Plugin::load(&dir) {
                Ok(plugin) => {
                    if registry.plugins.contains_key(&plugin.name) {
                        warn!(
                            "Plugin '{}' from {:?} shadows an earlier one, skipping",
                            plugin.name, dir
                        );
                        continue;
                    }
                    registry.register(plugin);
                }
                Err(e) => warn!("Failed to load plugin from {:?}: {}", dir, e),
            }
        }

        info!("Loaded {} plugins from {:?}", registry.len(), root);
        Ok(registry)
    }

    pub fn register(&mut self, plugin: Plugin) {
        debug!("Registered plugin '{}'", plugin.name);
        self.plugins.insert(plugin.name.clone(), plugin);
    }

    pub fn get(&self, name: &str) -> Option<&Plugin> {
        self.plugins.get(name)
    }

    pub fn names(&self) -> Vec<&str> {
        self.plugins.keys().map(|s| s.as_str()).collect()
    }

    pub fn plugins(&self) -> impl Iterator<Item = &Plugin> {
        self.plugins.values()
    }

    pub fn len(&self) -> usize {
        self.plugins.len()
    }

    pub fn is_empty(&self) -> bool {
        self.plugins.is_empty()
    }
}
