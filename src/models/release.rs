//! Package release model representing one published version of a crate.

use chrono::{DateTime, Utc};
use semver::Version;
use serde::{Deserialize, Serialize};

/// A single release of a package as reported by a registry
///
/// Releases are produced by a [`Registry`](crate::sources::Registry) and are
/// never modified afterwards; the formatting templates only read them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PackageRelease {
    /// Package name
    pub name: String,

    /// Resolved version of this release
    pub version: Version,

    /// Authors in citation order
    pub authors: Vec<String>,

    /// One-line description of the package
    pub description: Option<String>,

    /// Source repository URL
    pub repository: Option<String>,

    /// Project homepage
    pub homepage: Option<String>,

    /// Date this release was published
    pub release_date: Option<DateTime<Utc>>,

    /// SPDX license expression
    pub license: Option<String>,

    /// Whether the release was yanked from the registry
    pub yanked: bool,
}

impl PackageRelease {
    /// Create a release with only the required fields set
    pub fn new(name: impl Into<String>, version: Version) -> Self {
        Self {
            name: name.into(),
            version,
            authors: Vec::new(),
            description: None,
            repository: None,
            homepage: None,
            release_date: None,
            license: None,
            yanked: false,
        }
    }

    /// URL used in citations: the repository, else the homepage
    pub fn url(&self) -> Option<&str> {
        self.repository.as_deref().or(self.homepage.as_deref())
    }

    /// First listed author, if any
    pub fn primary_author(&self) -> Option<&str> {
        self.authors.first().map(|s| s.as_str())
    }
}

/// Builder for creating PackageRelease instances
#[derive(Debug, Clone)]
pub struct ReleaseBuilder {
    release: PackageRelease,
}

impl ReleaseBuilder {
    pub fn new(name: impl Into<String>, version: Version) -> Self {
        Self {
            release: PackageRelease::new(name, version),
        }
    }

    pub fn author(mut self, author: impl Into<String>) -> Self {
        self.release.authors.push(author.into());
        self
    }

    pub fn authors<I, S>(mut self, authors: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.release.authors = authors.into_iter().map(Into::into).collect();
        self
    }

    /// Whitespace runs, including newlines, collapse to single spaces.
    pub fn description(mut self, description: impl AsRef<str>) -> Self {
        let line = description
            .as_ref()
            .split_whitespace()
            .collect::<Vec<_>>()
            .join(" ");
        self.release.description = if line.is_empty() { None } else { Some(line) };
        self
    }

    pub fn repository(mut self, url: impl Into<String>) -> Self {
        self.release.repository = Some(url.into());
        self
    }

    pub fn homepage(mut self, url: impl Into<String>) -> Self {
        self.release.homepage = Some(url.into());
        self
    }

    pub fn release_date(mut self, date: DateTime<Utc>) -> Self {
        self.release.release_date = Some(date);
        self
    }

    pub fn license(mut self, license: impl Into<String>) -> Self {
        self.release.license = Some(license.into());
        self
    }

    pub fn yanked(mut self, yanked: bool) -> Self {
        self.release.yanked = yanked;
        self
    }

    pub fn build(self) -> PackageRelease {
        self.release
    }
}
