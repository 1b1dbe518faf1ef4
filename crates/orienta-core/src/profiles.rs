//! Profile descriptors: display metadata per tag, loaded from YAML.

use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::tags::ProfileTag;
use crate::ConfigError;

/// Display metadata for one profile: a title, a short trait summary, and a
/// narrative description.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProfileDescriptor {
    pub title: String,
    pub traits: String,
    pub description: String,
}

#[derive(Debug, Deserialize)]
pub struct ProfilesFile {
    pub profiles: BTreeMap<ProfileTag, ProfileDescriptor>,
}

impl ProfilesFile {
    #[must_use]
    pub fn descriptor_for(&self, tag: ProfileTag) -> Option<&ProfileDescriptor> {
        self.profiles.get(&tag)
    }
}

/// Load and validate the profile descriptors from a YAML file.
///
/// # Errors
///
/// Returns `ConfigError` if the file cannot be read, parsed, or fails
/// validation.
pub fn load_profiles(path: &Path) -> Result<ProfilesFile, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::DataFileIo {
        path: path.display().to_string(),
        source: e,
    })?;

    let file: ProfilesFile = serde_yaml::from_str(&content)?;
    validate_profiles(&file)?;
    Ok(file)
}

fn validate_profiles(file: &ProfilesFile) -> Result<(), ConfigError> {
    for (tag, descriptor) in &file.profiles {
        for (field, value) in [
            ("title", &descriptor.title),
            ("traits", &descriptor.traits),
            ("description", &descriptor.description),
        ] {
            if value.trim().is_empty() {
                return Err(ConfigError::Validation(format!(
                    "descriptor for '{tag}' has empty {field}"
                )));
            }
        }
    }
    Ok(())
}
