//! Basic usage example for the crate2bib library.
//!
//! This example looks up a crate on crates.io and prints every citation
//! template for its newest matching release.

use crate2bib::models::{Origin, Query};
use crate2bib::{ResolveOptions, Resolver};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let crate_name = std::env::args().nth(1).unwrap_or_else(|| "serde".to_string());
    let version = std::env::args().nth(2);

    // Render both templates, newest release only
    let options = ResolveOptions::default()
        .origins(Origin::ALL.to_vec())
        .limit(1);
    let resolver = Resolver::crates_io()?.with_options(options);

    // CRATE2BIB_REGISTRY__USER_AGENT overrides the default identification
    let config = crate2bib::config::load_config(None)?;
    let query =
        Query::new(&crate_name, &config.registry.user_agent).version(version.as_deref());
    println!("Resolving {} on {}...\n", crate_name, resolver.registry().name());

    for result in resolver.resolve(&query).await? {
        println!("Template: {} (origin {})", result.origin, result.origin.code());
        println!("{}\n", result.biblatex);
    }

    Ok(())
}
