//! BibLaTeX formatting of package releases.
//!
//! Each [`Origin`] is a separate template. Both produce a `@software` entry
//! with four-space indented fields, a trailing comma after every field and
//! no newline after the closing brace:
//!
//! ```text
//! @software {Tolnay2024,
//!     author = {David Tolnay},
//!     title = {{serde} ({1.0.217}): A generic serialization/deserialization framework},
//!     url = {https://github.com/serde-rs/serde},
//!     date = {2024-12-27},
//! }
//! ```

use chrono::{DateTime, Datelike, Utc};
use semver::Version;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::models::{Origin, PackageRelease};

/// A fully specified BibLaTeX entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BibLaTeX {
    /// Citation key usable in `\cite{key}`
    pub key: String,
    /// BibLaTeX entry type, `software` for every release
    pub work_type: String,
    /// Authors joined with ` and `
    pub author: String,
    pub title: String,
    pub url: Option<String>,
    pub date: Option<DateTime<Utc>>,
    pub version: Option<Version>,
    pub license: Option<String>,
}

impl fmt::Display for BibLaTeX {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "@{} {{{},", self.work_type, self.key)?;
        writeln!(f, "    author = {{{}}},", self.author)?;
        writeln!(f, "    title = {{{}}},", self.title)?;
        if let Some(url) = &self.url {
            writeln!(f, "    url = {{{}}},", url)?;
        }
        if let Some(date) = self.date {
            writeln!(
                f,
                "    date = {{{:04}-{:02}-{:02}}},",
                date.year(),
                date.month(),
                date.day()
            )?;
        }
        if let Some(version) = &self.version {
            writeln!(f, "    version = {{{}}},", version)?;
        }
        if let Some(license) = &self.license {
            writeln!(f, "    license = {{{}}},", license)?;
        }
        write!(f, "}}")
    }
}

/// Build the entry for a release using the given template
pub fn format_entry(release: &PackageRelease, origin: Origin) -> BibLaTeX {
    match origin {
        Origin::InlineVersion => format_inline_version(release),
        Origin::VersionFields => format_version_fields(release),
    }
}

/// Render a release as BibLaTeX text
pub fn render(release: &PackageRelease, origin: Origin) -> String {
    format_entry(release, origin).to_string()
}

/// Citation key: first author's surname followed by the release year
///
/// The surname is the last word of the author's display name. Without
/// authors the package name stands in; without a release date the year is
/// left out. Characters BibLaTeX does not accept in keys are dropped.
pub fn citation_key(release: &PackageRelease) -> String {
    let stem = release
        .primary_author()
        .and_then(|author| author.split_whitespace().last())
        .unwrap_or(release.name.as_str());
    let stem: String = stem
        .chars()
        .filter(|c| c.is_alphanumeric() || *c == '-' || *c == '_')
        .collect();
    let stem = if stem.is_empty() {
        release.name.clone()
    } else {
        stem
    };

    match release.release_date {
        Some(date) => format!("{}{:04}", stem, date.year()),
        None => stem,
    }
}

fn format_authors(release: &PackageRelease) -> String {
    release.authors.join(" and ")
}

/// `{name} ({version}): description`
fn format_inline_version(release: &PackageRelease) -> BibLaTeX {
    let head = format!("{{{}}} ({{{}}})", release.name, release.version);
    BibLaTeX {
        key: citation_key(release),
        work_type: "software".to_string(),
        author: format_authors(release),
        title: with_description(head, release.description.as_deref()),
        url: release.url().map(str::to_string),
        date: release.release_date,
        version: None,
        license: None,
    }
}

/// `{name}: description` plus version and license fields
fn format_version_fields(release: &PackageRelease) -> BibLaTeX {
    let head = format!("{{{}}}", release.name);
    BibLaTeX {
        key: citation_key(release),
        work_type: "software".to_string(),
        author: format_authors(release),
        title: with_description(head, release.description.as_deref()),
        url: release.url().map(str::to_string),
        date: release.release_date,
        version: Some(release.version.clone()),
        license: release.license.clone(),
    }
}

fn with_description(head: String, description: Option<&str>) -> String {
    match description {
        Some(d) => format!("{}: {}", head, d),
        None => head,
    }
}
