//! `plugin` command: inspect installed plugins

use clap::{ArgMatches, Command};
use colored::Colorize;

use super::{Spec, SpecContext};
use crate::error::IrResult;
use crate::plugin::PluginRegistry;

pub const PLUGIN_COMMAND: &str = "plugin";

#[derive(Debug, Clone, PartialEq)]
struct PluginSummary {
    name: String,
    plugin_type: String,
    description: String,
}

/// Snapshot of the registry taken at start-up
#[derive(Debug, Clone, Default)]
pub struct PluginListSpec {
    plugins: Vec<PluginSummary>,
}

impl PluginListSpec {
    pub fn new(registry: &PluginRegistry) -> Self {
        Self {
            plugins: registry
                .plugins()
                .map(|p| PluginSummary {
                    name: p.name.clone(),
                    plugin_type: p.plugin_type.clone(),
                    description: p.description.clone(),
                })
                .collect(),
        }
    }
}

impl Spec for PluginListSpec {
    fn name(&self) -> &str {
        PLUGIN_COMMAND
    }

    fn command(&self) -> Command {
        Command::new(PLUGIN_COMMAND)
            .about("Inspect installed plugins")
            .subcommand_required(true)
            .subcommand(Command::new("list").about("List installed plugins"))
    }

    fn handle(&self, _ctx: &SpecContext<'_>, _matches: &ArgMatches) -> IrResult<Option<i32>> {
        if self.plugins.is_empty() {
            println!("No plugins installed");
            return Ok(None);
        }

        for plugin in &self.plugins {
            println!(
                "{:<20} {:<12} {}",
                plugin.name.bold(),
                plugin.plugin_type.cyan(),
                plugin.description
            );
        }
        Ok(None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::plugin::Plugin;
    use std::path::Path;

    #[test]
    fn test_snapshot_of_registry() {
        let mut registry = PluginRegistry::new();
        registry.register(
            Plugin::from_spec_str(
                Path::new("/plugins/virsh"),
                "config:\n  plugin_type: provision\nsubparsers:\n  virsh:\n    description: Libvirt VMs\n",
            )
            .unwrap(),
        );

        let spec = PluginListSpec::new(&registry);
        assert_eq!(
            spec.plugins,
            vec![PluginSummary {
                name: "virsh".into(),
                plugin_type: "provision".into(),
                description: "Libvirt VMs".into(),
            }]
        );
        spec.command().debug_assert();
    }
}
