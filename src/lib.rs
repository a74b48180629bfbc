//! # crate2bib
//!
//! Create BibLaTeX entries for crates hosted on [crates.io](https://crates.io).
//!
//! ## Architecture
//!
//! The library is organized into several modules:
//!
//! - [`models`]: Core data structures (Query, PackageRelease, CitationResult, Origin)
//! - [`sources`]: Registry plugins behind the [`Registry`] trait
//! - [`resolver`]: Candidate selection and rendering
//! - [`utils`]: HTTP client, version constraints and the BibLaTeX templates
//! - [`config`]: Configuration management
//!
//! ## Example
//!
//! ```rust,no_run
//! # #[tokio::main]
//! # async fn main() -> crate2bib::Result<()> {
//! for result in crate2bib::get_biblatex("serde", Some("1.0"), "my-tool").await? {
//!     println!("origin {}:\n{}", result.origin.code(), result.biblatex);
//! }
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod error;
pub mod models;
pub mod resolver;
pub mod sources;
pub mod ui;
pub mod utils;

// Re-export commonly used types
pub use error::{Error, Result};
pub use models::{CitationResult, Origin, PackageRelease, Query};
pub use resolver::{get_biblatex, ResolveOptions, Resolver};
pub use sources::{CratesIoRegistry, Registry, RegistryError};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
