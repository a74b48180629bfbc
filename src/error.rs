//! Crate-level error taxonomy.

use crate::sources::RegistryError;

/// Errors returned by citation resolution
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The query was rejected before contacting the registry
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// The version constraint could not be parsed
    #[error("Invalid version constraint '{constraint}': {source}")]
    InvalidConstraint {
        constraint: String,
        #[source]
        source: semver::Error,
    },

    /// No release matched the name and constraint
    #[error("{0}")]
    NotFound(String),

    /// The registry could not be reached or answered with an error
    #[error("Registry unavailable: {0}")]
    RegistryUnavailable(String),
}

impl From<RegistryError> for Error {
    fn from(err: RegistryError) -> Self {
        match err {
            RegistryError::NotFound(msg) => Error::NotFound(msg),
            RegistryError::InvalidRequest(msg) => Error::InvalidInput(msg),
            other => Error::RegistryUnavailable(other.to_string()),
        }
    }
}

/// Result alias used throughout the crate
pub type Result<T> = std::result::Result<T, Error>;
