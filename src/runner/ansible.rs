//! `ansible-playbook` subprocess runner

use std::io::Write;
use std::process::Command;

use tempfile::NamedTempFile;
use tracing::{debug, info};

use super::{PlaybookInvocation, PlaybookRunner};
use crate::error::{IrError, IrResult};

/// Environment variable exported to the playbook with the profile directory
pub const PROFILE_DIR_ENV: &str = "IR_PROFILE_DIR";

#[derive(Debug, Clone)]
pub struct AnsiblePlaybookRunner {
    binary: String,
}

impl AnsiblePlaybookRunner {
    pub fn new(binary: impl Into<String>) -> Self {
        Self {
            binary: binary.into(),
        }
    }

    /// Build the command line, with vars read from `vars_file`
    pub fn command(&self, invocation: &PlaybookInvocation, vars_file: &std::path::Path) -> Command {
        let mut cmd = Command::new(&self.binary);
        cmd.arg("-i")
            .arg(invocation.profile.inventory())
            .arg("-e")
            .arg(format!("@{}", vars_file.display()));

        if invocation.verbosity > 0 {
            cmd.arg(format!("-{}", "v".repeat(invocation.verbosity as usize)));
        }

        cmd.args(&invocation.ansible_args)
            .arg(&invocation.playbook)
            .env(PROFILE_DIR_ENV, &invocation.profile.path);

        if let Some(plugin_dir) = invocation.playbook.parent() {
            cmd.current_dir(plugin_dir);
        }

        cmd
    }
}

impl PlaybookRunner for AnsiblePlaybookRunner {
    fn run(&self, invocation: &PlaybookInvocation) -> IrResult<i32> {
        let mut vars_file = NamedTempFile::new()?;
        vars_file.write_all(serde_json::to_string(&invocation.vars)?.as_bytes())?;
        vars_file.flush()?;

        let mut cmd = self.command(invocation, vars_file.path());
        debug!("Running {:?}", cmd);
        info!(
            "Running playbook {:?} for '{}' in profile '{}'",
            invocation.playbook, invocation.plugin_name, invocation.profile.name
        );

        let status = cmd.status().map_err(|source| IrError::RunnerUnavailable {
            binary: self.binary.clone(),
            source,
        })?;

        let code = status.code().ok_or_else(|| IrError::RunnerFailed {
            message: format!("{} terminated by signal", self.binary),
        })?;

        info!("Playbook finished with exit code {}", code);
        Ok(code)
    }
}
