use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    /// Message reported by the backend in an `{ "error": ... }` body.
    #[error("{0}")]
    Api(String),

    #[error("Request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Unexpected response from server: {0}")]
    Decode(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Config parsing error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Git error: {0}")]
    Git(#[from] git2::Error),

    #[error("Not in a git repository")]
    NotInGitRepo,

    #[error("No issue key given and none found in the current branch or commits")]
    NoIssueKey,

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("User cancelled operation")]
    Cancelled,

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Prompt error: {0}")]
    Prompt(String),

    /// The failure was already shown to the user; only the exit status remains.
    #[error("Operation failed")]
    Reported,
}

impl From<inquire::error::InquireError> for Error {
    fn from(err: inquire::error::InquireError) -> Self {
        match err {
            inquire::error::InquireError::OperationCanceled => Error::Cancelled,
            inquire::error::InquireError::OperationInterrupted => Error::Cancelled,
            other => Error::Prompt(other.to_string()),
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
