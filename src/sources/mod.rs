//! Package registries that supply release metadata.
//!
//! This module defines the [`Registry`] trait that every metadata source
//! implements. Two implementations ship with the crate:
//!
//! - [`CratesIoRegistry`]: the public crates.io API
//! - [`MockRegistry`]: an in-memory registry for tests and offline use
//!
//! # Implementing a New Registry
//!
//! 1. Create a struct that implements `Registry`
//! 2. Map the registry's response into [`PackageRelease`] values
//! 3. Report a missing package as [`RegistryError::NotFound`] so callers can
//!    tell it apart from transport failures

mod crates_io;
pub mod mock;

pub use crates_io::{CratesIoRegistry, CRATES_IO_API_BASE};
pub use mock::MockRegistry;

use crate::models::PackageRelease;
use async_trait::async_trait;

/// The Registry trait defines the interface for package metadata sources.
#[async_trait]
pub trait Registry: Send + Sync + std::fmt::Debug {
    /// Unique identifier for this registry (e.g., "crates_io")
    fn id(&self) -> &str;

    /// Human-readable name of this registry
    fn name(&self) -> &str;

    /// Fetch every known release of `name`, identifying the caller as `user_agent`
    async fn fetch_releases(
        &self,
        name: &str,
        user_agent: &str,
    ) -> Result<Vec<PackageRelease>, RegistryError>;
}

/// Errors that can occur when talking to a registry
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RegistryError {
    /// Network or HTTP error
    #[error("Network error: {0}")]
    Network(String),

    /// Response body could not be decoded
    #[error("Parse error: {0}")]
    Parse(String),

    /// Invalid request parameters
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// Rate limit exceeded
    #[error("Rate limit exceeded")]
    RateLimit,

    /// Package not found
    #[error("{0}")]
    NotFound(String),

    /// API error from the registry
    #[error("API error: {0}")]
    Api(String),
}

impl From<reqwest::Error> for RegistryError {
    fn from(err: reqwest::Error) -> Self {
        RegistryError::Network(err.to_string())
    }
}

impl From<serde_json::Error> for RegistryError {
    fn from(err: serde_json::Error) -> Self {
        RegistryError::Parse(format!("JSON: {}", err))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_json_error_conversion() {
        let err = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let err = RegistryError::from(err);
        assert!(matches!(err, RegistryError::Parse(ref m) if m.starts_with("JSON: ")));
    }
}
