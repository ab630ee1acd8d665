//! Pluggable top-level commands
//!
//! Every command the CLI exposes is a [`Spec`]: plugins, plus the built-in
//! `profile` and `plugin` management commands. The [`SpecManager`] builds one
//! clap command tree from all registered specs and hands each handler the
//! matches of its own subcommand.
//!
//! [`SpecManager`]: crate::spec_manager::SpecManager

pub mod plugin_list;
pub mod plugin_spec;
pub mod profile_spec;

use clap::{ArgMatches, Command};

use crate::error::IrResult;
use crate::profile::ProfileManager;
use crate::runner::PlaybookRunner;

pub use plugin_list::PluginListSpec;
pub use plugin_spec::{ControlArgs, PluginSpec};
pub use profile_spec::ProfileSpec;

/// Shared state handed to spec handlers
pub struct SpecContext<'a> {
    pub profiles: &'a ProfileManager,
    pub runner: &'a dyn PlaybookRunner,
}

/// One pluggable top-level command
pub trait Spec {
    /// Subcommand name; must match `command().get_name()`
    fn name(&self) -> &str;

    /// CLI surface of this spec
    fn command(&self) -> Command;

    /// Execute with the matches of this spec's subcommand
    ///
    /// Returns `Some(exit_code)` when a playbook ran, `None` otherwise.
    fn handle(&self, ctx: &SpecContext<'_>, matches: &ArgMatches) -> IrResult<Option<i32>>;
}

/// `get_one` that tolerates ids the command never defined
pub(crate) fn opt_value<T>(matches: &ArgMatches, id: &str) -> Option<T>
where
    T: Clone + Send + Sync + 'static,
{
    matches.try_get_one::<T>(id).ok().flatten().cloned()
}

/// Whether a switch was given on the command line
pub(crate) fn flag_set(matches: &ArgMatches, id: &str) -> bool {
    opt_value::<bool>(matches, id).unwrap_or(false)
}
