//! Spec dispatch
//!
//! Builds a single clap command tree from the registered specs and routes a
//! flat argument vector (without the program name) to the spec it names.

use std::ffi::OsString;

use clap::Command;
use tracing::{debug, info};

use crate::error::{IrError, IrResult};
use crate::profile::ProfileManager;
use crate::runner::PlaybookRunner;
use crate::spec::{Spec, SpecContext};

/// Program name used for usage and help output
pub const BIN_NAME: &str = "infrared";

pub struct SpecManager {
    specs: Vec<Box<dyn Spec>>,
    profiles: ProfileManager,
    runner: Box<dyn PlaybookRunner>,
}

impl SpecManager {
    pub fn new(profiles: ProfileManager, runner: Box<dyn PlaybookRunner>) -> Self {
        Self {
            specs: Vec::new(),
            profiles,
            runner,
        }
    }

    /// Add a spec; names must be unique
    pub fn register_spec(&mut self, spec: Box<dyn Spec>) -> IrResult<()> {
        if self.specs.iter().any(|s| s.name() == spec.name()) {
            return Err(IrError::DuplicateSpec {
                name: spec.name().to_string(),
            });
        }

        debug!("Registered spec '{}'", spec.name());
        self.specs.push(spec);
        Ok(())
    }

    pub fn spec_names(&self) -> Vec<&str> {
        self.specs.iter().map(|s| s.name()).collect()
    }

    pub fn profiles(&self) -> &ProfileManager {
        &self.profiles
    }

    /// Root command covering every registered spec
    pub fn command(&self) -> Command {
        Command::new(BIN_NAME)
            .version(env!("CARGO_PKG_VERSION"))
            .about("Plugin-driven playbook orchestrator")
            .subcommand_required(true)
            .arg_required_else_help(true)
            .subcommands(self.specs.iter().map(|s| s.command()))
    }

    /// Parse `args` and run the spec it selects
    ///
    /// Returns the runner's exit code when a playbook ran, `None` for
    /// dry-runs, answers-file generation and management commands.
    pub fn run_specs<I, T>(&self, args: I) -> IrResult<Option<i32>>
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString> + Clone,
    {
        let argv =
            std::iter::once(OsString::from(BIN_NAME)).chain(args.into_iter().map(Into::into));
        let matches = self.command().try_get_matches_from(argv)?;

        let Some((name, sub_matches)) = matches.subcommand() else {
            return Ok(None);
        };

        // clap only accepts subcommands built from registered specs
        let Some(spec) = self.specs.iter().find(|s| s.name() == name) else {
            return Ok(None);
        };

        info!("Running '{}'", name);
        let ctx = SpecContext {
            profiles: &self.profiles,
            runner: self.runner.as_ref(),
        };
        spec.handle(&ctx, sub_matches)
    }
}
