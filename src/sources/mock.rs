//! Mock registry for testing purposes.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use crate::models::{PackageRelease, ReleaseBuilder};
use crate::sources::{Registry, RegistryError};

/// A registry that serves predefined releases from memory.
#[derive(Debug, Default)]
pub struct MockRegistry {
    releases: Mutex<HashMap<String, Vec<PackageRelease>>>,
    failure: Mutex<Option<RegistryError>>,
    calls: AtomicUsize,
}

impl MockRegistry {
    /// Create an empty mock registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a release; releases of the same crate are kept in insertion order.
    pub fn add_release(&self, release: PackageRelease) {
        let mut guard = self.releases.lock().unwrap_or_else(|e| e.into_inner());
        guard.entry(release.name.clone()).or_default().push(release);
    }

    /// Make every subsequent fetch fail with `error`.
    pub fn fail_with(&self, error: RegistryError) {
        let mut guard = self.failure.lock().unwrap_or_else(|e| e.into_inner());
        *guard = Some(error);
    }

    /// Clear a configured failure.
    pub fn clear_failure(&self) {
        let mut guard = self.failure.lock().unwrap_or_else(|e| e.into_inner());
        *guard = None;
    }

    /// Number of fetches issued so far.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Registry for MockRegistry {
    fn id(&self) -> &str {
        "mock"
    }

    fn name(&self) -> &str {
        "Mock Registry"
    }

    async fn fetch_releases(
        &self,
        name: &str,
        _user_agent: &str,
    ) -> Result<Vec<PackageRelease>, RegistryError> {
        self.calls.fetch_add(1, Ordering::SeqCst);

        if let Some(error) = self
            .failure
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
        {
            return Err(error);
        }

        let guard = self.releases.lock().unwrap_or_else(|e| e.into_inner());
        guard
            .get(name)
            .cloned()
            .ok_or_else(|| RegistryError::NotFound(format!("Could not find crate {}", name)))
    }
}

/// Helper function to create a minimal release for testing.
pub fn make_release(name: &str, version: &str) -> PackageRelease {
    let version = semver::Version::parse(version).unwrap_or_else(|_| semver::Version::new(0, 0, 0));
    ReleaseBuilder::new(name, version).build()
}
