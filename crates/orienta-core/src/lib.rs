//! Domain types and pure logic for the orienta vocational-interest service:
//! the profile tag set, static instrument data (questions, careers,
//! descriptors), the scoring engine, the session state machine, and
//! application configuration.

pub mod app_config;
pub mod careers;
pub mod config;
pub mod profiles;
pub mod questions;
pub mod scoring;
pub mod session;
pub mod tags;

pub use app_config::{AppConfig, Environment, MailSettings};
pub use careers::{load_careers, CareersFile};
pub use config::{load_app_config, load_app_config_from_env};
pub use profiles::{load_profiles, ProfileDescriptor, ProfilesFile};
pub use questions::{load_questions, Question, QuestionsFile};
pub use scoring::{score, ScoreOutcome, ScoringError};
pub use session::{DeliveryStatus, SessionState};
pub use tags::{ProfileTag, ScoreTally};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variable: {0}")]
    MissingEnvVar(String),
    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },
    #[error("failed to read data file {path}: {source}")]
    DataFileIo {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse data file: {0}")]
    DataFileParse(#[from] serde_yaml::Error),
    #[error("data validation failed: {0}")]
    Validation(String),
}
