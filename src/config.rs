//! Runtime settings
//!
//! Read from the environment after an optional `.env` has been loaded by the
//! binary. Every path derives from `IR_HOME` unless overridden individually.

use std::path::{Path, PathBuf};

/// Default name of the external playbook binary
pub const DEFAULT_ANSIBLE_PLAYBOOK: &str = "ansible-playbook";

/// Filesystem layout and runner binary
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    /// Base directory (`IR_HOME`)
    pub home: PathBuf,
    /// Where profiles live (`IR_PROFILES_DIR`)
    pub profiles_dir: PathBuf,
    /// Where plugins are discovered (`IR_PLUGINS_DIR`)
    pub plugins_dir: PathBuf,
    /// Playbook executable (`IR_ANSIBLE_PLAYBOOK`)
    pub ansible_playbook: String,
}

impl Settings {
    /// Build the default layout under `home`
    pub fn with_home(home: impl AsRef<Path>) -> Self {
        let home = home.as_ref().to_path_buf();
        Self {
            profiles_dir: home.join("profiles"),
            plugins_dir: home.join("plugins"),
            ansible_playbook: DEFAULT_ANSIBLE_PLAYBOOK.to_string(),
            home,
        }
    }

    /// Create from environment variables
    ///
    /// `IR_HOME` defaults to `$HOME/.infrared`, falling back to `./.infrared`
    /// when `HOME` is unset.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let home = lookup("IR_HOME")
            .map(PathBuf::from)
            .or_else(|| lookup("HOME").map(|h| PathBuf::from(h).join(".infrared")))
            .unwrap_or_else(|| PathBuf::from(".infrared"));

        let mut settings = Self::with_home(home);

        if let Some(dir) = lookup("IR_PROFILES_DIR") {
            settings.profiles_dir = PathBuf::from(dir);
        }
        if let Some(dir) = lookup("IR_PLUGINS_DIR") {
            settings.plugins_dir = PathBuf::from(dir);
        }
        if let Some(bin) = lookup("IR_ANSIBLE_PLAYBOOK") {
            settings.ansible_playbook = bin;
        }

        settings
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults_under_home() {
        let settings = Settings::from_lookup(lookup_from(&[("HOME", "/home/ops")]));
        assert_eq!(settings.home, PathBuf::from("/home/ops/.infrared"));
        assert_eq!(
            settings.profiles_dir,
            PathBuf::from("/home/ops/.infrared/profiles")
        );
        assert_eq!(
            settings.plugins_dir,
            PathBuf::from("/home/ops/.infrared/plugins")
        );
        assert_eq!(settings.ansible_playbook, "ansible-playbook");
    }

    #[test]
    fn test_ir_home_wins_over_home() {
        let settings =
            Settings::from_lookup(lookup_from(&[("HOME", "/home/ops"), ("IR_HOME", "/srv/ir")]));
        assert_eq!(settings.home, PathBuf::from("/srv/ir"));
        assert_eq!(settings.profiles_dir, PathBuf::from("/srv/ir/profiles"));
    }

    #[test]
    fn test_individual_overrides() {
        let settings = Settings::from_lookup(lookup_from(&[
            ("IR_HOME", "/srv/ir"),
            ("IR_PROFILES_DIR", "/var/profiles"),
            ("IR_PLUGINS_DIR", "/opt/plugins"),
            ("IR_ANSIBLE_PLAYBOOK", "/usr/local/bin/ansible-playbook"),
        ]));
        assert_eq!(settings.profiles_dir, PathBuf::from("/var/profiles"));
        assert_eq!(settings.plugins_dir, PathBuf::from("/opt/plugins"));
        assert_eq!(settings.ansible_playbook, "/usr/local/bin/ansible-playbook");
    }

    #[test]
    fn test_no_home_falls_back_to_cwd() {
        let settings = Settings::from_lookup(lookup_from(&[]));
        assert_eq!(settings.home, PathBuf::from(".infrared"));
    }
}
