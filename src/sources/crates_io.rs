//! crates.io registry implementation.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::header::USER_AGENT;
use reqwest::StatusCode;
use serde::Deserialize;
use std::sync::Arc;
use url::Url;

use crate::models::{PackageRelease, ReleaseBuilder};
use crate::sources::{Registry, RegistryError};
use crate::utils::HttpClient;

/// Public crates.io endpoint
pub const CRATES_IO_API_BASE: &str = "https://crates.io";

/// crates.io registry
///
/// Uses the crates.io REST API (`/api/v1/crates/{name}`), which returns the
/// crate record together with every published version.
#[derive(Debug, Clone)]
pub struct CratesIoRegistry {
    client: Arc<HttpClient>,
    base_url: Url,
}

impl CratesIoRegistry {
    pub fn new() -> Result<Self, RegistryError> {
        Ok(Self::with_client(HttpClient::new()?))
    }

    /// Use an existing client against the public endpoint
    pub fn with_client(client: HttpClient) -> Self {
        Self {
            client: Arc::new(client),
            base_url: Url::parse(CRATES_IO_API_BASE).expect("static URL is valid"),
        }
    }

    /// Point the registry at another crates.io-compatible server
    pub fn with_base_url(mut self, base_url: &str) -> Result<Self, RegistryError> {
        let url = Url::parse(base_url).map_err(|e| {
            RegistryError::InvalidRequest(format!("Invalid registry URL '{}': {}", base_url, e))
        })?;
        if url.cannot_be_a_base() {
            return Err(RegistryError::InvalidRequest(format!(
                "Invalid registry URL '{}': not a base URL",
                base_url
            )));
        }
        self.base_url = url;
        Ok(self)
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn crate_url(&self, name: &str) -> Result<Url, RegistryError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| {
                RegistryError::InvalidRequest(format!("Invalid registry URL '{}'", self.base_url))
            })?
            .pop_if_empty()
            .extend(&["api", "v1", "crates", name]);
        Ok(url)
    }
}

#[async_trait]
impl Registry for CratesIoRegistry {
    fn id(&self) -> &str {
        "crates_io"
    }

    fn name(&self) -> &str {
        "crates.io"
    }

    async fn fetch_releases(
        &self,
        name: &str,
        user_agent: &str,
    ) -> Result<Vec<PackageRelease>, RegistryError> {
        let url = self.crate_url(name)?;
        tracing::debug!("GET {}", url);

        let response = self
            .client
            .client()
            .get(url)
            .header(USER_AGENT, user_agent)
            .send()
            .await
            .map_err(|e| RegistryError::Network(format!("Failed to query crates.io: {}", e)))?;

        match response.status() {
            StatusCode::NOT_FOUND => {
                return Err(RegistryError::NotFound(format!(
                    "Could not find crate {}",
                    name
                )))
            }
            StatusCode::TOO_MANY_REQUESTS => return Err(RegistryError::RateLimit),
            status if !status.is_success() => {
                return Err(RegistryError::Api(format!(
                    "crates.io API returned status: {}",
                    status
                )))
            }
            _ => {}
        }

        let body = response.text().await?;
        let data: CrateResponse = serde_json::from_str(&body)?;

        let releases = data.into_releases();
        tracing::debug!("crates.io returned {} releases of {}", releases.len(), name);
        Ok(releases)
    }
}

// ===== crates.io API Types =====

#[derive(Debug, Deserialize)]
struct CrateResponse {
    #[serde(rename = "crate")]
    krate: CrateData,
    #[serde(default)]
    versions: Vec<VersionData>,
}

#[derive(Debug, Deserialize)]
struct CrateData {
    name: String,
    description: Option<String>,
    repository: Option<String>,
    homepage: Option<String>,
}

#[derive(Debug, Deserialize)]
struct VersionData {
    num: String,
    created_at: Option<DateTime<Utc>>,
    license: Option<String>,
    #[serde(default)]
    yanked: bool,
    published_by: Option<UserData>,
}

#[derive(Debug, Deserialize)]
struct UserData {
    login: String,
    name: Option<String>,
}

impl CrateResponse {
    fn into_releases(self) -> Vec<PackageRelease> {
        let krate = self.krate;
        self.versions
            .into_iter()
            .filter_map(|v| {
                let version = match semver::Version::parse(&v.num) {
                    Ok(version) => version,
                    Err(e) => {
                        tracing::warn!("Skipping {} {}: {}", krate.name, v.num, e);
                        return None;
                    }
                };

                let mut builder = ReleaseBuilder::new(&krate.name, version).yanked(v.yanked);
                if let Some(user) = v.published_by {
                    builder = builder.author(user.name.unwrap_or(user.login));
                }
                if let Some(description) = &krate.description {
                    builder = builder.description(description);
                }
                if let Some(repository) = &krate.repository {
                    builder = builder.repository(repository);
                }
                if let Some(homepage) = &krate.homepage {
                    builder = builder.homepage(homepage);
                }
                if let Some(date) = v.created_at {
                    builder = builder.release_date(date);
                }
                if let Some(license) = v.license {
                    builder = builder.license(license);
                }
                Some(builder.build())
            })
            .collect()
    }
}
