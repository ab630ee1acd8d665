//! Error types for the orchestrator
//!
//! Every fallible library operation returns [`IrError`]. The binary wraps
//! start-up failures in `anyhow` and prints everything else as-is.

use std::path::PathBuf;

use thiserror::Error;

/// Main error type for spec dispatch, profiles, plugins and the runner
#[derive(Error, Debug)]
pub enum IrError {
    // -------------------------------------------------------------------------
    // Profiles
    // -------------------------------------------------------------------------
    #[error("No active profile found. Create one with 'profile create <name>' and activate it")]
    NoActiveProfileFound,

    #[error("Profile '{name}' already exists")]
    ProfileExists { name: String },

    #[error("Profile '{name}' does not exist")]
    ProfileMissing { name: String },

    #[error("Profile '{name}' is active; deactivate it first")]
    ProfileIsActive { name: String },

    #[error("Invalid profile name '{name}': {reason}")]
    InvalidProfileName { name: String, reason: String },

    // -------------------------------------------------------------------------
    // Plugins and specs
    // -------------------------------------------------------------------------
    #[error("No plugin.spec found in {path:?}")]
    PluginSpecMissing { path: PathBuf },

    #[error("Invalid plugin spec {path:?}: {message}")]
    PluginSpec { path: PathBuf, message: String },

    #[error("Spec '{name}' is already registered")]
    DuplicateSpec { name: String },

    // -------------------------------------------------------------------------
    // Option resolution
    // -------------------------------------------------------------------------
    #[error("Unknown option '{option}' for '{plugin}'{}", suggestion_suffix(.suggestion))]
    UnknownOption {
        plugin: String,
        option: String,
        suggestion: Option<String>,
    },

    #[error("Missing required options for '{plugin}': {}", .options.join(", "))]
    MissingRequiredOptions { plugin: String, options: Vec<String> },

    #[error("Invalid value '{value}' for option '{option}': {reason}")]
    InvalidOptionValue {
        option: String,
        value: String,
        reason: String,
    },

    #[error("Invalid choice '{value}' for option '{option}' (choose from: {})", .choices.join(", "))]
    InvalidChoice {
        option: String,
        value: String,
        choices: Vec<String>,
    },

    #[error("Vars key '{key}' is defined both as a value and as a nested section")]
    VarsConflict { key: String },

    #[error("Invalid extra-vars entry '{entry}': {reason}")]
    InvalidExtraVars { entry: String, reason: String },

    // -------------------------------------------------------------------------
    // Answers files
    // -------------------------------------------------------------------------
    #[error("Failed to read answers file {path:?}: {message}")]
    AnswersFile { path: PathBuf, message: String },

    #[error("Answers file {path:?} has no [{section}] section")]
    AnswersFileSectionMissing { path: PathBuf, section: String },

    // -------------------------------------------------------------------------
    // Runner
    // -------------------------------------------------------------------------
    #[error("Invalid ansible-args entry '{entry}'")]
    InvalidAnsibleArgs { entry: String },

    #[error("Playbook runner '{binary}' could not be started: {source}")]
    RunnerUnavailable {
        binary: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Playbook runner failed: {message}")]
    RunnerFailed { message: String },

    // -------------------------------------------------------------------------
    // Wrapped
    // -------------------------------------------------------------------------
    #[error(transparent)]
    Cli(#[from] clap::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

fn suggestion_suffix(suggestion: &Option<String>) -> String {
    match suggestion {
        Some(s) => format!(" (did you mean '{}'?)", s),
        None => String::new(),
    }
}

/// Result alias used throughout the crate
pub type IrResult<T> = Result<T, IrError>;
