//! Profile management
//!
//! A profile is a named directory under the profiles root that holds the
//! inventory and every artifact a playbook run produces. Exactly one profile
//! is active at a time; the active name is persisted in `<root>/.active`.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::error::{IrError, IrResult};

/// Marker file naming the active profile
pub const ACTIVE_MARKER: &str = ".active";

/// Inventory file created in every profile
pub const INVENTORY_FILE: &str = "hosts";

/// Per-profile metadata file
pub const METADATA_FILE: &str = ".profile.yml";

const LOCAL_INVENTORY: &str = "localhost ansible_connection=local\n";

/// A named, directory-backed execution context
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Profile {
    pub name: String,
    pub path: PathBuf,
    pub created_at: Option<DateTime<Utc>>,
}

impl Profile {
    /// Inventory passed to the playbook runner
    pub fn inventory(&self) -> PathBuf {
        self.path.join(INVENTORY_FILE)
    }
}

#[derive(Debug, Serialize, Deserialize)]
struct ProfileMetadata {
    name: String,
    created_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct ProfileManager {
    base_dir: PathBuf,
}

impl ProfileManager {
    /// Open (and create if needed) the profiles root
    pub fn new(base_dir: impl Into<PathBuf>) -> IrResult<Self> {
        let base_dir = base_dir.into();
        fs::create_dir_all(&base_dir)?;
        debug!("Profiles root: {:?}", base_dir);
        Ok(Self { base_dir })
    }

    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    /// Create a new profile directory with its inventory
    pub fn create(&self, name: &str) -> IrResult<Profile> {
        validate_name(name)?;

        let path = self.base_dir.join(name);
        if path.exists() {
            return Err(IrError::ProfileExists {
                name: name.to_string(),
            });
        }

        fs::create_dir_all(&path)?;
        fs::write(path.join(INVENTORY_FILE), LOCAL_INVENTORY)?;

        let metadata = ProfileMetadata {
            name: name.to_string(),
            created_at: Utc::now(),
        };
        fs::write(path.join(METADATA_FILE), serde_yaml::to_string(&metadata)?)?;

        info!("Profile '{}' created at {:?}", name, path);
        Ok(Profile {
            name: name.to_string(),
            path,
            created_at: Some(metadata.created_at),
        })
    }

    pub fn get(&self, name: &str) -> IrResult<Profile> {
        validate_name(name)?;

        let path = self.base_dir.join(name);
        if !path.is_dir() {
            return Err(IrError::ProfileMissing {
                name: name.to_string(),
            });
        }

        let created_at = fs::read_to_string(path.join(METADATA_FILE))
            .ok()
            .and_then(|raw| serde_yaml::from_str::<ProfileMetadata>(&raw).ok())
            .map(|m| m.created_at);

        Ok(Profile {
            name: name.to_string(),
            path,
            created_at,
        })
    }

    /// All profiles, sorted by name
    pub fn list(&self) -> IrResult<Vec<Profile>> {
        let mut profiles = Vec::new();

        for entry in fs::read_dir(&self.base_dir)? {
            let entry = entry?;
            if !entry.file_type()?.is_dir() {
                continue;
            }
            let name = entry.file_name().to_string_lossy().to_string();
            if name.starts_with('.') {
                continue;
            }
            profiles.push(self.get(&name)?);
        }

        profiles.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(profiles)
    }

    /// Make `name` the active profile, replacing any other
    pub fn activate(&self, name: &str) -> IrResult<Profile> {
        let profile = self.get(name)?;

        let inventory = profile.inventory();
        if !inventory.exists() {
            warn!("Inventory missing in profile '{}', restoring", name);
            fs::write(&inventory, LOCAL_INVENTORY)?;
        }

        fs::write(self.marker(), name)?;
        info!("Profile '{}' is now active", name);
        Ok(profile)
    }

    /// Activate `name`, creating it first when `create` is set
    pub fn checkout(&self, name: &str, create: bool) -> IrResult<Profile> {
        if create && !self.base_dir.join(name).exists() {
            self.create(name)?;
        }
        self.activate(name)
    }

    pub fn deactivate(&self) -> IrResult<()> {
        let marker = self.marker();
        if marker.exists() {
            fs::remove_file(marker)?;
            info!("Active profile cleared");
        }
        Ok(())
    }

    /// The active profile, if any
    pub fn get_active(&self) -> IrResult<Option<Profile>> {
        let marker = self.marker();
        if !marker.exists() {
            return Ok(None);
        }

        let name = fs::read_to_string(&marker)?.trim().to_string();
        if name.is_empty() {
            return Ok(None);
        }

        match self.get(&name) {
            Ok(profile) => Ok(Some(profile)),
            Err(IrError::ProfileMissing { .. }) | Err(IrError::InvalidProfileName { .. }) => {
                warn!("Active profile '{}' no longer exists", name);
                Ok(None)
            }
            Err(e) => Err(e),
        }
    }

    pub fn is_active(&self, name: &str) -> IrResult<bool> {
        Ok(self
            .get_active()?
            .map(|p| p.name == name)
            .unwrap_or(false))
    }

    /// Remove a profile and everything in it
    pub fn delete(&self, name: &str) -> IrResult<()> {
        let profile = self.get(name)?;
        if self.is_active(name)? {
            return Err(IrError::ProfileIsActive {
                name: name.to_string(),
            });
        }

        fs::remove_dir_all(&profile.path)?;
        info!("Profile '{}' deleted", name);
        Ok(())
    }

    /// Remove run artifacts, keeping inventory and metadata
    pub fn cleanup(&self, name: &str) -> IrResult<usize> {
        let profile = self.get(name)?;
        let mut removed = 0;

        for entry in fs::read_dir(&profile.path)? {
            let entry = entry?;
            let file_name = entry.file_name();
            if file_name == INVENTORY_FILE || file_name == METADATA_FILE {
                continue;
            }

            let path = entry.path();
            if entry.file_type()?.is_dir() {
                fs::remove_dir_all(&path)?;
            } else {
                fs::remove_file(&path)?;
            }
            removed += 1;
        }

        info!("Profile '{}' cleaned ({} entries removed)", name, removed);
        Ok(removed)
    }

    fn marker(&self) -> PathBuf {
        self.base_dir.join(ACTIVE_MARKER)
    }
}

fn validate_name(name: &str) -> IrResult<()> {
    let reason = if name.is_empty() {
        Some("name is empty")
    } else if name.starts_with('.') {
        Some("name must not start with '.'")
    } else if name.contains(['/', '\\']) {
        Some("name must not contain path separators")
    } else {
        None
    };

    match reason {
        Some(reason) => Err(IrError::InvalidProfileName {
            name: name.to_string(),
            reason: reason.to_string(),
        }),
        None => Ok(()),
    }
}
