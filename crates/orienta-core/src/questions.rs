//! The question bank: ordered instrument questions loaded from YAML.

use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::tags::ProfileTag;
use crate::ConfigError;

/// One instrument question. Choice labels are the literal strings the
/// respondent can select; each maps to the tags it scores. The mapping need
/// not be symmetric — in the shipped bank "Yes" scores one tag and "No"
/// scores none.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Question {
    pub text: String,
    pub options: BTreeMap<String, Vec<ProfileTag>>,
}

impl Question {
    /// Tags scored by the given choice label. An unmapped label yields the
    /// empty list, not an error.
    #[must_use]
    pub fn tags_for(&self, label: &str) -> &[ProfileTag] {
        self.options.get(label).map_or(&[], Vec::as_slice)
    }
}

#[derive(Debug, Deserialize)]
pub struct QuestionsFile {
    pub questions: Vec<Question>,
}

/// Load and validate the question bank from a YAML file.
///
/// # Errors
///
/// Returns `ConfigError` if the file cannot be read, parsed, or fails
/// validation.
pub fn load_questions(path: &Path) -> Result<QuestionsFile, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::DataFileIo {
        path: path.display().to_string(),
        source: e,
    })?;

    let file: QuestionsFile = serde_yaml::from_str(&content)?;
    validate_questions(&file)?;
    Ok(file)
}

fn validate_questions(file: &QuestionsFile) -> Result<(), ConfigError> {
    if file.questions.is_empty() {
        return Err(ConfigError::Validation(
            "question bank must contain at least one question".to_string(),
        ));
    }

    for (i, question) in file.questions.iter().enumerate() {
        if question.text.trim().is_empty() {
            return Err(ConfigError::Validation(format!(
                "question {i} has empty text"
            )));
        }
        if question.options.is_empty() {
            return Err(ConfigError::Validation(format!(
                "question {i} has no choices"
            )));
        }
        for label in question.options.keys() {
            if label.trim().is_empty() {
                return Err(ConfigError::Validation(format!(
                    "question {i} has a blank choice label"
                )));
            }
        }
    }

    Ok(())
}
