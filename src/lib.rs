//! infrared - plugin-driven playbook orchestrator
//!
//! Wraps an external playbook engine behind a CLI assembled from plugin
//! descriptions. Each invocation resolves plugin options from defaults, an
//! answers file, CLI flags and extra vars, then either runs the plugin's
//! playbook inside the active profile or writes the resolved vars out.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use infrared::plugin::Plugin;
//! use infrared::profile::ProfileManager;
//! use infrared::runner::AnsiblePlaybookRunner;
//! use infrared::spec::PluginSpec;
//! use infrared::spec_manager::SpecManager;
//!
//! # fn main() -> Result<(), infrared::IrError> {
//! let profiles = ProfileManager::new("/tmp/ir/profiles")?;
//! profiles.checkout("lab", true)?;
//!
//! let mut sm = SpecManager::new(profiles, Box::new(AnsiblePlaybookRunner::new("ansible-playbook")));
//! sm.register_spec(Box::new(PluginSpec::new(Plugin::load("plugins/example")?)))?;
//! sm.run_specs(["example", "--foo-bar", "explicit"])?;
//! # Ok(())
//! # }
//! ```

// Core error handling
pub mod error;

// Settings and logging
pub mod config;
pub mod telemetry;

// Option model, answers files, plugins
pub mod answers;
pub mod options;
pub mod plugin;

// Execution context and runner seam
pub mod profile;
pub mod runner;

// Command surface
pub mod spec;
pub mod spec_manager;

pub use config::Settings;
pub use error::{IrError, IrResult};
pub use plugin::{Plugin, PluginRegistry};
pub use profile::{Profile, ProfileManager};
pub use runner::{AnsiblePlaybookRunner, PlaybookInvocation, PlaybookRunner};
pub use spec::{PluginListSpec, PluginSpec, ProfileSpec, Spec};
pub use spec_manager::SpecManager;
