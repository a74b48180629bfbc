//! Utility modules supporting citation generation.
//!
//! - [`HttpClient`]: shared HTTP client carrying the user agent and timeouts
//! - [`VersionConstraint`]: exact, prefix and requirement-style version matching
//! - [`format_entry`] / [`render`]: the BibLaTeX templates
//!
//! # Formatting a Release
//!
//! ```rust
//! use crate2bib::models::{Origin, ReleaseBuilder};
//! use crate2bib::utils::render;
//!
//! let release = ReleaseBuilder::new("demo", semver::Version::new(0, 1, 0))
//!     .author("Jane Doe")
//!     .build();
//! let text = render(&release, Origin::VersionFields);
//! assert!(text.starts_with("@software {Doe,"));
//! ```

mod cite;
mod http;
mod version;

pub use cite::{citation_key, format_entry, render, BibLaTeX};
pub use http::{HttpClient, DEFAULT_CONNECT_TIMEOUT, DEFAULT_TIMEOUT};
pub use version::VersionConstraint;
