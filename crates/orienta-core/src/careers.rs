//! The career directory: per-profile career lists loaded from YAML.

use std::collections::{BTreeMap, HashSet};
use std::path::Path;

use serde::Deserialize;

use crate::tags::ProfileTag;
use crate::ConfigError;

#[derive(Debug, Deserialize)]
pub struct CareersFile {
    pub careers: BTreeMap<ProfileTag, Vec<String>>,
}

impl CareersFile {
    /// Full ordered career list for the given predominant profile. Empty when
    /// the profile is undefined or absent from the directory.
    #[must_use]
    pub fn careers_for(&self, tag: Option<ProfileTag>) -> &[String] {
        tag.and_then(|t| self.careers.get(&t))
            .map_or(&[], Vec::as_slice)
    }
}

/// Load and validate the career directory from a YAML file.
///
/// # Errors
///
/// Returns `ConfigError` if the file cannot be read, parsed, or fails
/// validation.
pub fn load_careers(path: &Path) -> Result<CareersFile, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::DataFileIo {
        path: path.display().to_string(),
        source: e,
    })?;

    let file: CareersFile = serde_yaml::from_str(&content)?;
    validate_careers(&file)?;
    Ok(file)
}

fn validate_careers(file: &CareersFile) -> Result<(), ConfigError> {
    for (tag, careers) in &file.careers {
        if careers.is_empty() {
            return Err(ConfigError::Validation(format!(
                "career list for '{tag}' is empty"
            )));
        }
        let mut seen = HashSet::new();
        for career in careers {
            if career.trim().is_empty() {
                return Err(ConfigError::Validation(format!(
                    "career list for '{tag}' contains a blank entry"
                )));
            }
            if !seen.insert(career.to_lowercase()) {
                return Err(ConfigError::Validation(format!(
                    "duplicate career '{career}' under '{tag}'"
                )));
            }
        }
    }
    Ok(())
}
