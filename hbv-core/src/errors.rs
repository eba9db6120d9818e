use std::path::PathBuf;
use thiserror::Error;

/// Error type for forcing ingestion, configuration building and engine wiring.
#[derive(Error, Debug)]
pub enum HbvError {
    /// A required setting (forcing directory, forcing file, identifier) is missing.
    #[error("Configuration error: {0}")]
    Configuration(String),
    #[error("Invalid {argument}: {reason}")]
    Validation { argument: String, reason: String },
    /// An optional execution dependency is not available.
    #[error("{package} not found, install using: `{instruction}`")]
    DependencyMissing {
        package: String,
        instruction: String,
    },
    /// Failure reported by the external simulation engine.
    #[error("Engine failure: {0}")]
    Engine(String),
    #[error("Malformed forcing file {path}, line {line}: {details}")]
    ForcingFormat {
        path: PathBuf,
        line: usize,
        details: String,
    },
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Json(#[from] serde_json::Error),
    #[error(transparent)]
    Toml(#[from] toml::de::Error),
}

impl HbvError {
    pub(crate) fn validation(argument: impl Into<String>, reason: impl Into<String>) -> Self {
        HbvError::Validation {
            argument: argument.into(),
            reason: reason.into(),
        }
    }
}

/// Convenience type for `Result<T, HbvError>`.
pub type HbvResult<T> = Result<T, HbvError>;
