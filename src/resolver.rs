//! Resolution of a query into rendered citations.

use std::sync::Arc;

use crate::error::{Error, Result};
use crate::models::{CitationResult, Origin, PackageRelease, Query};
use crate::sources::{CratesIoRegistry, Registry};
use crate::utils::{render, VersionConstraint};

/// Options controlling candidate selection and rendering
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolveOptions {
    /// Templates rendered for every candidate, in output order
    pub origins: Vec<Origin>,

    /// Keep releases that were yanked from the registry
    pub include_yanked: bool,

    /// Maximum number of releases to render, newest first
    pub limit: Option<usize>,
}

impl Default for ResolveOptions {
    fn default() -> Self {
        Self {
            origins: vec![Origin::InlineVersion],
            include_yanked: false,
            limit: None,
        }
    }
}

impl ResolveOptions {
    pub fn origins(mut self, origins: impl Into<Vec<Origin>>) -> Self {
        self.origins = origins.into();
        self
    }

    pub fn include_yanked(mut self, include: bool) -> Self {
        self.include_yanked = include;
        self
    }

    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }
}

/// Resolves queries against a registry and renders the matching releases
#[derive(Debug, Clone)]
pub struct Resolver {
    registry: Arc<dyn Registry>,
    options: ResolveOptions,
}

impl Resolver {
    pub fn new(registry: Arc<dyn Registry>) -> Self {
        Self {
            registry,
            options: ResolveOptions::default(),
        }
    }

    /// Resolver over the public crates.io API
    pub fn crates_io() -> Result<Self> {
        Ok(Self::new(Arc::new(CratesIoRegistry::new()?)))
    }

    pub fn with_options(mut self, options: ResolveOptions) -> Self {
        self.options = options;
        self
    }

    pub fn options(&self) -> &ResolveOptions {
        &self.options
    }

    pub fn registry(&self) -> &Arc<dyn Registry> {
        &self.registry
    }

    /// Fetch, filter and render all candidates for `query`
    ///
    /// Input and constraint errors are reported before the registry is
    /// contacted. Results are ordered newest release first; each release
    /// contributes one entry per selected template.
    #[tracing::instrument(skip(self), fields(registry = self.registry.id()))]
    pub async fn resolve(&self, query: &Query) -> Result<Vec<CitationResult>> {
        query.validate()?;
        if self.options.origins.is_empty() {
            return Err(Error::InvalidInput(
                "at least one citation template must be selected".to_string(),
            ));
        }
        let constraint = query
            .version
            .as_deref()
            .map(|raw| {
                VersionConstraint::parse(raw).map_err(|source| Error::InvalidConstraint {
                    constraint: raw.to_string(),
                    source,
                })
            })
            .transpose()?;

        let name = query.name.trim();
        let releases = self
            .registry
            .fetch_releases(name, &query.user_agent)
            .await?;
        let total = releases.len();

        let candidates = self.select_candidates(releases, constraint.as_ref());
        tracing::debug!(
            "{} of {} releases of {} selected",
            candidates.len(),
            total,
            name
        );

        if candidates.is_empty() {
            return Err(Error::NotFound(match &constraint {
                Some(c) => format!("Could not find version {} for crate {}", c, name),
                None => format!("Could not find crate {}", name),
            }));
        }

        let results: Vec<CitationResult> = candidates
            .iter()
            .flat_map(|release| {
                self.options
                    .origins
                    .iter()
                    .map(move |&origin| CitationResult::new(render(release, origin), origin))
            })
            .collect();

        tracing::info!("Generated {} citations for {}", results.len(), name);
        Ok(results)
    }

    /// Keep the releases matching `constraint`, newest first
    pub fn select_candidates(
        &self,
        releases: Vec<PackageRelease>,
        constraint: Option<&VersionConstraint>,
    ) -> Vec<PackageRelease> {
        let mut candidates: Vec<PackageRelease> = releases
            .into_iter()
            .filter(|r| self.options.include_yanked || !r.yanked)
            .filter(|r| constraint.map_or(true, |c| c.matches(&r.version)))
            .collect();

        candidates.sort_by(|a, b| b.version.cmp(&a.version));
        if let Some(limit) = self.options.limit {
            candidates.truncate(limit);
        }
        candidates
    }
}

/// Look up `crate_name` on crates.io and render BibLaTeX entries
///
/// `version` may be exact (`1.0.217`), a prefix (`1.0`) or a requirement
/// (`>=1.2, <2`); `None` or an empty string selects every release.
/// `user_agent` identifies the caller to crates.io and must not be empty.
///
/// ```rust,no_run
/// # #[tokio::main]
/// # async fn main() -> crate2bib::Result<()> {
/// let results = crate2bib::get_biblatex("serde", Some("1.0.217"), "my-tool").await?;
/// println!("{}", results[0]);
/// # Ok(())
/// # }
/// ```
pub async fn get_biblatex(
    crate_name: &str,
    version: Option<&str>,
    user_agent: &str,
) -> Result<Vec<CitationResult>> {
    let query = Query::new(crate_name, user_agent).version(version);
    query.validate()?;
    Resolver::crates_io()?.resolve(&query).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ReleaseBuilder;
    use crate::sources::mock::make_release;
    use crate::sources::{MockRegistry, RegistryError};
    use chrono::{TimeZone, Utc};

    fn serde_registry() -> Arc<MockRegistry> {
        let registry = MockRegistry::new();
        for (version, day) in [("1.0.216", 11), ("1.0.217", 27)] {
            registry.add_release(
                ReleaseBuilder::new("serde", semver::Version::parse(version).unwrap())
                    .author("David Tolnay")
                    .description("A generic serialization/deserialization framework")
                    .repository("https://github.com/serde-rs/serde")
                    .release_date(Utc.with_ymd_and_hms(2024, 12, day, 12, 0, 0).unwrap())
                    .license("MIT OR Apache-2.0")
                    .build(),
            );
        }
        registry.add_release(make_release("serde", "0.9.15"));
        registry.add_release(
            ReleaseBuilder::new("serde", semver::Version::new(1, 0, 218))
                .yanked(true)
                .build(),
        );
        Arc::new(registry)
    }

    #[tokio::test]
    async fn test_prefix_constraint_returns_newest_first() {
        let registry = serde_registry();
        let resolver = Resolver::new(registry.clone());

        let results = resolver
            .resolve(&Query::new("serde", "ua").version(Some("1.0")))
            .await
            .unwrap();

        assert_eq!(results.len(), 2);
        assert_eq!(results[0].origin, Origin::InlineVersion);
        assert!(results[0].biblatex.contains("({1.0.217})"));
        assert!(results[1].biblatex.contains("({1.0.216})"));
        assert_eq!(registry.calls(), 1);
    }

    #[tokio::test]
    async fn test_each_release_gets_every_template() {
        let resolver = Resolver::new(serde_registry())
            .with_options(ResolveOptions::default().origins(Origin::ALL.to_vec()).limit(1));

        let results = resolver
            .resolve(&Query::new("serde", "ua").version(Some("1.0")))
            .await
            .unwrap();

        let origins: Vec<u8> = results.iter().map(|r| r.origin.code()).collect();
        assert_eq!(origins, vec![0, 1]);
        assert!(results[1].biblatex.contains("    version = {1.0.217},\n"));
        assert!(results[1].biblatex.contains("    license = {MIT OR Apache-2.0},\n"));
    }

    #[tokio::test]
    async fn test_yanked_releases() {
        let registry = serde_registry();

        let results = Resolver::new(registry.clone())
            .resolve(&Query::new("serde", "ua"))
            .await
            .unwrap();
        assert_eq!(results.len(), 3);
        assert!(!results[0].biblatex.contains("1.0.218"));

        let results = Resolver::new(registry)
            .with_options(ResolveOptions::default().include_yanked(true))
            .resolve(&Query::new("serde", "ua").version(Some("1.0.218")))
            .await
            .unwrap();
        assert_eq!(results.len(), 1);
    }

    #[tokio::test]
    async fn test_validation_happens_before_fetch() {
        let registry = serde_registry();
        let resolver = Resolver::new(registry.clone());

        let err = resolver.resolve(&Query::new("  ", "ua")).await.unwrap_err();
        assert!(matches!(err, Error::InvalidInput(_)));

        let err = resolver
            .resolve(&Query::new("serde", "ua").version(Some("not-a-version")))
            .await
            .unwrap_err();
        assert!(
            matches!(err, Error::InvalidConstraint { ref constraint, .. } if constraint == "not-a-version")
        );

        let err = resolver
            .clone()
            .with_options(ResolveOptions::default().origins(Vec::<Origin>::new()))
            .resolve(&Query::new("serde", "ua"))
            .await
            .unwrap_err();
        assert!(matches!(err, Error::InvalidInput(_)));

        assert_eq!(registry.calls(), 0);
    }

    #[tokio::test]
    async fn test_malformed_name_and_user_agent_never_reach_registry() {
        let registry = serde_registry();
        let resolver = Resolver::new(registry.clone());

        let err = resolver
            .resolve(&Query::new("serde", "bad\nagent"))
            .await
            .unwrap_err();
        assert!(matches!(err, Error::InvalidInput(_)));

        for name in ["..", "a/b"] {
            let err = resolver.resolve(&Query::new(name, "ua")).await.unwrap_err();
            assert!(matches!(err, Error::InvalidInput(_)));
        }

        assert_eq!(registry.calls(), 0);
    }

    #[tokio::test]
    async fn test_not_found() {
        let resolver = Resolver::new(serde_registry());

        let err = resolver
            .resolve(&Query::new("serde", "ua").version(Some("2")))
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "Could not find version 2 for crate serde");

        let err = resolver
            .resolve(&Query::new("no-such-crate", "ua"))
            .await
            .unwrap_err();
        assert!(matches!(err, Error::NotFound(_)));
    }

    #[tokio::test]
    async fn test_registry_failure_propagates() {
        let registry = serde_registry();
        registry.fail_with(RegistryError::Network("connection reset".to_string()));

        let err = Resolver::new(registry.clone())
            .resolve(&Query::new("serde", "ua"))
            .await
            .unwrap_err();
        assert!(matches!(err, Error::RegistryUnavailable(_)));

        registry.clear_failure();
        assert!(Resolver::new(registry)
            .resolve(&Query::new("serde", "ua"))
            .await
            .is_ok());
    }

    #[tokio::test]
    async fn test_get_biblatex_rejects_empty_name() {
        let err = get_biblatex("", Some("1.0"), "crate2bib-testing")
            .await
            .unwrap_err();
        assert!(matches!(err, Error::InvalidInput(_)));

        let err = get_biblatex("serde", None, "").await.unwrap_err();
        assert!(matches!(err, Error::InvalidInput(_)));
    }
}
