use thiserror::Error;

use crate::domain::{BranchId, ContactId, SocialLinkId};

/// Error type that captures form, taxonomy, and submission failures.
#[derive(Debug, Error)]
pub enum FormError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("Category service responded with status {0}")]
    Status(u16),
    #[error("Unknown branch: {0}")]
    UnknownBranch(BranchId),
    #[error("Unknown contact {contact} in branch {branch}")]
    UnknownContact { branch: BranchId, contact: ContactId },
    #[error("Unknown social link {link} in branch {branch}")]
    UnknownSocialLink { branch: BranchId, link: SocialLinkId },
    #[error("Invalid {field}: `{value}` (expected one of: {expected})")]
    InvalidChoice {
        field: &'static str,
        value: String,
        expected: String,
    },
    #[error("Form is incomplete; missing: {}", .0.join(", "))]
    Incomplete(Vec<String>),
    #[error("Submission failed: {0}")]
    Submission(String),
}

/// Failures raised while starting or running the terminal front end.
#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Core(#[from] FormError),
    #[error("Invalid input: {0}")]
    Input(String),
    #[error("Command failed: {0}")]
    Command(String),
}

impl From<std::io::Error> for CliError {
    fn from(err: std::io::Error) -> Self {
        CliError::Command(err.to_string())
    }
}

impl From<rustyline::error::ReadlineError> for CliError {
    fn from(err: rustyline::error::ReadlineError) -> Self {
        CliError::Command(err.to_string())
    }
}
