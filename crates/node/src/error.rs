//! A bunch of wrap errors.

/// A wrap `Result` contains custom errors.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors enum mapping global custom errors.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum Error {
    #[error("Key must not be empty.")]
    EmptyKey,
    #[error("Endpoint must not be empty.")]
    EmptyEndpoint,
    #[error("Key not found: {0}")]
    KeyNotFound(String),
    #[error("Build outbound http client failed: {0}")]
    HttpClientError(String),
    #[error("Invalid logging level: {0}")]
    InvalidLoggingLevel(String),
    #[error("Create file error: {0}")]
    CreateFileError(String),
    #[error("Open file error: {0}")]
    OpenFileError(String),
    #[error("Cannot find home directory")]
    HomeDirError,
    #[error("Cannot find parent directory")]
    ParentDirError,
    #[error("Serde json error: {0}")]
    SerdeJsonError(#[from] serde_json::Error),
    #[error("Serde yaml error: {0}")]
    SerdeYamlError(#[from] serde_yaml::Error),
}
