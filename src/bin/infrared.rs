//! infrared command line
//!
//! # Usage
//!
//! ```bash
//! # Create and activate a profile
//! infrared profile checkout lab --create
//!
//! # Run a plugin with explicit option values
//! infrared example --foo-bar explicit
//!
//! # Resolve without running
//! infrared example --from-file answers.ini --dry-run -o vars.yml
//!
//! # Write the current defaults to an answers file
//! infrared example --generate-answers-file answers.ini
//! ```

use std::process::ExitCode;

use anyhow::{Context, Result};
use colored::Colorize;

use infrared::{
    telemetry, AnsiblePlaybookRunner, IrError, Plugin, PluginListSpec, PluginRegistry,
    PluginSpec, ProfileManager, ProfileSpec, Settings, SpecManager,
};

fn build_manager(settings: &Settings) -> Result<SpecManager> {
    let profiles = ProfileManager::new(&settings.profiles_dir)
        .with_context(|| format!("Failed to open profiles dir {:?}", settings.profiles_dir))?;
    let registry = PluginRegistry::load_from_dir(&settings.plugins_dir)
        .with_context(|| format!("Failed to load plugins from {:?}", settings.plugins_dir))?;

    let runner = AnsiblePlaybookRunner::new(settings.ansible_playbook.clone());
    let mut manager = SpecManager::new(profiles, Box::new(runner));

    manager.register_spec(Box::new(ProfileSpec))?;
    manager.register_spec(Box::new(PluginListSpec::new(&registry)))?;
    for plugin in registry.plugins().cloned().collect::<Vec<Plugin>>() {
        let name = plugin.name.clone();
        if let Err(e) = manager.register_spec(Box::new(PluginSpec::new(plugin))) {
            tracing::warn!("Skipping plugin '{}': {}", name, e);
        }
    }

    Ok(manager)
}

fn main() -> ExitCode {
    dotenvy::dotenv().ok();

    let args: Vec<String> = std::env::args().skip(1).collect();
    telemetry::init(telemetry::debug_requested(&args));

    let settings = Settings::from_env();
    let manager = match build_manager(&settings) {
        Ok(manager) => manager,
        Err(e) => {
            eprintln!("{}: {:#}", "error".red().bold(), e);
            return ExitCode::FAILURE;
        }
    };

    match manager.run_specs(args) {
        Ok(None) => ExitCode::SUCCESS,
        Ok(Some(code)) => ExitCode::from(u8::try_from(code).unwrap_or(1)),
        // help, version and usage errors print themselves and pick the exit code
        Err(IrError::Cli(e)) => e.exit(),
        Err(e) => {
            eprintln!("{}: {}", "error".red().bold(), e);
            ExitCode::FAILURE
        }
    }
}
