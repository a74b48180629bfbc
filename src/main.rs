use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use crate2bib::config::{find_config_file, load_config, save_config, Config};
use crate2bib::models::{Origin, Query};
use crate2bib::sources::CratesIoRegistry;
use crate2bib::utils::HttpClient;
use crate2bib::{ui, Resolver};
use std::io::IsTerminal;
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// crate2bib - Create BibLaTeX entries for crates hosted on crates.io
#[derive(Parser, Debug)]
#[command(name = "crate2bib")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(
    about = "Creates a BibLaTeX entry given a crate name and version number",
    long_about = "Creates a BibLaTeX entry given a crate name and version number.\n\
        A partial version such as 1.0 selects every matching release, newest first."
)]
struct Cli {
    /// Name of the crate on crates.io
    crate_name: String,

    /// Version constraint (e.g. "1.0.217", "1.0", ">=0.1, <0.3")
    semver: Option<String>,

    /// User agent identifying you to crates.io
    #[arg(short, long)]
    user_agent: Option<String>,

    /// Citation template to render
    #[arg(short, long, value_enum)]
    template: Option<Template>,

    /// Include releases that were yanked
    #[arg(long)]
    include_yanked: bool,

    /// Render at most this many releases
    #[arg(short = 'n', long, conflicts_with = "latest")]
    limit: Option<usize>,

    /// Render only the newest matching release
    #[arg(long)]
    latest: bool,

    /// Output format
    #[arg(long, short, value_enum, default_value_t = OutputFormat::Plain)]
    output: OutputFormat,

    /// Configuration file path
    #[arg(long)]
    config: Option<PathBuf>,

    /// Write the effective configuration to this path and exit
    #[arg(long)]
    write_config: Option<PathBuf>,

    /// Enable verbose logging (can be used multiple times for more verbosity: -v, -vv)
    #[arg(long, short, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(long, short)]
    quiet: bool,
}

/// Output format for results
#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
enum OutputFormat {
    /// BibLaTeX text with a header per entry
    Plain,
    /// JSON array of {biblatex, origin}
    Json,
}

/// Citation template selection
#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
enum Template {
    /// Version inside the title (origin 0)
    Inline,
    /// Separate version and license fields (origin 1)
    Fields,
    /// Every template
    All,
}

impl Template {
    fn origins(self) -> Vec<Origin> {
        match self {
            Template::Inline => vec![Origin::InlineVersion],
            Template::Fields => vec![Origin::VersionFields],
            Template::All => Origin::ALL.to_vec(),
        }
    }
}

/// Merge file/env configuration with command-line flags
fn effective_config(cli: &Cli) -> Result<Config> {
    let path = cli.config.clone().or_else(find_config_file);
    if let Some(path) = &path {
        tracing::info!("Using config file: {}", path.display());
    }
    let mut config = load_config(path.as_deref()).context("Failed to load configuration")?;

    if let Some(user_agent) = &cli.user_agent {
        config.registry.user_agent = user_agent.clone();
    }
    if let Some(template) = cli.template {
        config.output.templates = template
            .origins()
            .into_iter()
            .map(|o| o.id().to_string())
            .collect();
    }
    if cli.include_yanked {
        config.output.include_yanked = true;
    }
    if cli.latest {
        config.output.limit = Some(1);
    } else if cli.limit.is_some() {
        config.output.limit = cli.limit;
    }
    Ok(config)
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize tracing based on verbosity
    let log_level = match cli.verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };

    let env_filter = if cli.quiet { "error" } else { log_level };

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| format!("crate2bib={}", env_filter)),
        ))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let config = effective_config(&cli)?;

    if let Some(path) = &cli.write_config {
        save_config(&config, path)?;
        if !cli.quiet {
            eprintln!("Wrote configuration to {}", path.display());
        }
        return Ok(());
    }

    let options = config.resolve_options()?;
    let client = HttpClient::with_timeouts(
        &config.registry.user_agent,
        config.registry.timeout(),
        config.registry.connect_timeout(),
    )?;
    let registry = CratesIoRegistry::with_client(client).with_base_url(&config.registry.base_url)?;
    let resolver = Resolver::new(Arc::new(registry)).with_options(options);

    let query = Query::new(&cli.crate_name, &config.registry.user_agent)
        .version(cli.semver.as_deref());

    let results = match resolver.resolve(&query).await {
        Ok(results) => results,
        Err(e) => {
            eprintln!(
                "{}",
                ui::error_message(&e.to_string(), std::io::stderr().is_terminal())
            );
            std::process::exit(1);
        }
    };

    match cli.output {
        OutputFormat::Plain => {
            println!(
                "{}",
                ui::format_plain(&results, !cli.quiet, ui::is_terminal())
            );
        }
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&results)?);
        }
    }

    Ok(())
}
