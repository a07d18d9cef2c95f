use thiserror::Error;

/// Raised by the position calculator. The only failure mode is bad input.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SizingError {
    #[error("invalid input: {0}")]
    InvalidInput(String),
}

#[derive(Error, Debug)]
pub enum JournalError {
    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("import failed: {0}")]
    ImportFormat(String),

    #[error("cloud transport error: {0}")]
    Transport(String),

    #[error("trade not found: {0}")]
    NotFound(String),

    #[error("storage error: {0}")]
    Storage(String),

    #[error("serialization error: {0}")]
    Serialization(String),
}

impl From<SizingError> for JournalError {
    fn from(err: SizingError) -> Self {
        match err {
            SizingError::InvalidInput(msg) => JournalError::InvalidInput(msg),
        }
    }
}

impl From<std::io::Error> for JournalError {
    fn from(err: std::io::Error) -> Self {
        JournalError::Storage(err.to_string())
    }
}

impl From<serde_json::Error> for JournalError {
    fn from(err: serde_json::Error) -> Self {
        JournalError::Serialization(err.to_string())
    }
}

impl From<reqwest::Error> for JournalError {
    fn from(err: reqwest::Error) -> Self {
        JournalError::Transport(err.to_string())
    }
}

pub type JournalResult<T> = Result<T, JournalError>;
