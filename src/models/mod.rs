//! Core data models for releases and citations.

mod citation;
mod release;

pub use citation::{CitationResult, Origin, Query};
pub use release::{PackageRelease, ReleaseBuilder};
