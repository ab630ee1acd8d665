//! Playbook runner seam
//!
//! The orchestrator never interprets playbooks. It hands a resolved
//! [`PlaybookInvocation`] to a [`PlaybookRunner`] and reports the exit code.

pub mod ansible;

use std::path::PathBuf;

use serde_json::Value;

use crate::error::{IrError, IrResult};
use crate::profile::Profile;

pub use ansible::AnsiblePlaybookRunner;

/// Everything a runner needs for one playbook execution
#[derive(Debug, Clone)]
pub struct PlaybookInvocation {
    pub plugin_name: String,
    /// Absolute path of the entry-point playbook
    pub playbook: PathBuf,
    pub profile: Profile,
    /// Resolved vars dict, rooted at the plugin type
    pub vars: Value,
    /// Extra arguments forwarded verbatim (already split into tokens)
    pub ansible_args: Vec<String>,
    pub verbosity: u8,
}

/// External engine that executes a playbook
pub trait PlaybookRunner {
    /// Run to completion and return the process exit code
    fn run(&self, invocation: &PlaybookInvocation) -> IrResult<i32>;
}

/// Split `--ansible-args` into runner tokens
///
/// Entries are `;`-separated. `key=value` becomes `--key value`, a bare
/// `flag` becomes `--flag`. One level of surrounding quotes is stripped from
/// values: `start-at-task="Test output";tags=only_this` yields
/// `["--start-at-task", "Test output", "--tags", "only_this"]`.
pub fn parse_ansible_args(raw: &str) -> IrResult<Vec<String>> {
    let mut tokens = Vec::new();

    for entry in raw.split(';').map(str::trim).filter(|e| !e.is_empty()) {
        let (key, value) = match entry.split_once('=') {
            Some((key, value)) => (key.trim(), Some(strip_quotes(value.trim()))),
            None => (entry, None),
        };

        let key = key.trim_start_matches('-');
        if key.is_empty() || key.contains(char::is_whitespace) {
            return Err(IrError::InvalidAnsibleArgs {
                entry: entry.to_string(),
            });
        }

        tokens.push(format!("--{}", key));
        if let Some(value) = value {
            tokens.push(value.to_string());
        }
    }

    Ok(tokens)
}

fn strip_quotes(value: &str) -> &str {
    for quote in ['"', '\''] {
        if value.len() >= 2 && value.starts_with(quote) && value.ends_with(quote) {
            return &value[1..value.len() - 1];
        }
    }
    value
}
