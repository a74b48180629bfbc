//! Terminal output helpers for the command-line interface.

use owo_colors::OwoColorize;
use std::io::IsTerminal;

use crate::models::{CitationResult, Origin};

/// Check if stdout is a terminal.
pub fn is_terminal() -> bool {
    std::io::stdout().is_terminal()
}

/// Header printed above an entry, naming the template that produced it.
pub fn origin_header(origin: Origin, colored: bool) -> String {
    let text = format!(
        "Obtained from crates.io information ({}, origin {})",
        origin,
        origin.code()
    );
    if colored {
        format!("{}", text.green().bold())
    } else {
        text
    }
}

/// Plain-text rendering of a result list: optional headers, entries
/// separated by blank lines.
pub fn format_plain(results: &[CitationResult], headers: bool, colored: bool) -> String {
    results
        .iter()
        .map(|result| {
            if headers {
                format!("{}\n{}", origin_header(result.origin, colored), result.biblatex)
            } else {
                result.biblatex.clone()
            }
        })
        .collect::<Vec<_>>()
        .join("\n\n")
}

/// Error line for stderr.
pub fn error_message(message: &str, colored: bool) -> String {
    if colored {
        format!("{} {}", "error:".red().bold(), message)
    } else {
        format!("error: {}", message)
    }
}
