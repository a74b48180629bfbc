//! Citation request and result models.

use reqwest::header::HeaderValue;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::Error;

/// Longest crate name crates.io accepts
const MAX_NAME_LENGTH: usize = 64;

/// Field-selection template that produced a citation
///
/// The integer [`code`](Origin::code) is the stable tag exposed to callers
/// and used in JSON output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "u8", try_from = "u8")]
pub enum Origin {
    /// Version inlined into the title, no version or license fields
    InlineVersion,
    /// Plain title followed by separate version and license fields
    VersionFields,
}

impl Origin {
    /// Every template, in tag order
    pub const ALL: [Origin; 2] = [Origin::InlineVersion, Origin::VersionFields];

    /// Integer tag of this template
    pub fn code(self) -> u8 {
        match self {
            Origin::InlineVersion => 0,
            Origin::VersionFields => 1,
        }
    }

    pub fn from_code(code: u8) -> Option<Self> {
        match code {
            0 => Some(Origin::InlineVersion),
            1 => Some(Origin::VersionFields),
            _ => None,
        }
    }

    /// Short identifier used in configuration and on the command line
    pub fn id(self) -> &'static str {
        match self {
            Origin::InlineVersion => "inline",
            Origin::VersionFields => "fields",
        }
    }
}

impl fmt::Display for Origin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Origin::InlineVersion => write!(f, "inline version"),
            Origin::VersionFields => write!(f, "version and license fields"),
        }
    }
}

impl From<Origin> for u8 {
    fn from(origin: Origin) -> Self {
        origin.code()
    }
}

impl TryFrom<u8> for Origin {
    type Error = String;

    fn try_from(code: u8) -> Result<Self, Self::Error> {
        Origin::from_code(code).ok_or_else(|| format!("unknown origin tag {}", code))
    }
}

impl FromStr for Origin {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "inline" | "0" => Ok(Origin::InlineVersion),
            "fields" | "1" => Ok(Origin::VersionFields),
            other => Err(format!(
                "unknown citation template '{}' (expected 'inline' or 'fields')",
                other
            )),
        }
    }
}

/// A request for citations of one package
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Query {
    /// Package name on the registry
    pub name: String,

    /// Version constraint; `None` selects every release
    pub version: Option<String>,

    /// Identification sent to the registry with each request
    pub user_agent: String,
}

impl Query {
    pub fn new(name: impl Into<String>, user_agent: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            version: None,
            user_agent: user_agent.into(),
        }
    }

    /// Set the version constraint. Blank constraints are treated as absent.
    pub fn version(mut self, version: Option<&str>) -> Self {
        self.version = version
            .map(str::trim)
            .filter(|v| !v.is_empty())
            .map(str::to_string);
        self
    }

    /// Check the fields that must hold before any request is made
    pub fn validate(&self) -> Result<(), Error> {
        let name = self.name.trim();
        if name.is_empty() {
            return Err(Error::InvalidInput("crate name must not be empty".to_string()));
        }
        if name.len() > MAX_NAME_LENGTH
            || !name
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
        {
            return Err(Error::InvalidInput(format!(
                "'{}' is not a valid crate name (ASCII letters, digits, '-' and '_', at most {} characters)",
                name, MAX_NAME_LENGTH
            )));
        }
        if self.user_agent.trim().is_empty() {
            return Err(Error::InvalidInput("user agent must not be empty".to_string()));
        }
        if HeaderValue::from_str(&self.user_agent).is_err() {
            return Err(Error::InvalidInput(
                "user agent must be a valid HTTP header value".to_string(),
            ));
        }
        Ok(())
    }
}

/// One rendered BibLaTeX entry together with the template that produced it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CitationResult {
    /// BibLaTeX source text
    pub biblatex: String,

    /// Template tag
    pub origin: Origin,
}

impl CitationResult {
    pub fn new(biblatex: impl Into<String>, origin: Origin) -> Self {
        Self {
            biblatex: biblatex.into(),
            origin,
        }
    }

    /// Split into the `(text, origin tag)` pair
    pub fn into_parts(self) -> (String, u8) {
        (self.biblatex, self.origin.code())
    }
}

impl fmt::Display for CitationResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.biblatex)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_origin_codes() {
        assert_eq!(Origin::InlineVersion.code(), 0);
        assert_eq!(Origin::VersionFields.code(), 1);
        assert_eq!(Origin::from_code(1), Some(Origin::VersionFields));
        assert_eq!(Origin::from_code(7), None);
    }

    #[test]
    fn test_origin_from_str() {
        assert_eq!("inline".parse::<Origin>(), Ok(Origin::InlineVersion));
        assert_eq!(" Fields ".parse::<Origin>(), Ok(Origin::VersionFields));
        assert_eq!("1".parse::<Origin>(), Ok(Origin::VersionFields));
        assert!("apa".parse::<Origin>().is_err());
    }

    #[test]
    fn test_result_serializes_origin_as_integer() {
        let result = CitationResult::new("@software {x,\n}", Origin::VersionFields);
        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["origin"], 1);

        let back: CitationResult = serde_json::from_value(json).unwrap();
        assert_eq!(back, result);
    }

    #[test]
    fn test_blank_version_is_absent() {
        let query = Query::new("cellular-raza", "ua").version(Some("  "));
        assert_eq!(query.version, None);

        let query = Query::new("serde", "ua").version(Some(" 1.0 "));
        assert_eq!(query.version.as_deref(), Some("1.0"));
    }

    #[test]
    fn test_validate() {
        assert!(Query::new("serde", "ua").validate().is_ok());
        assert!(matches!(
            Query::new("", "ua").validate(),
            Err(Error::InvalidInput(_))
        ));
        assert!(matches!(
            Query::new("serde", " ").validate(),
            Err(Error::InvalidInput(_))
        ));
    }

    #[test]
    fn test_validate_crate_name_characters() {
        assert!(Query::new("cellular_raza-core", "ua").validate().is_ok());
        assert!(Query::new(" serde ", "ua").validate().is_ok());
        assert!(Query::new("a".repeat(64), "ua").validate().is_ok());

        for name in ["..", ".", "a/b", "serde?x=1", "crème", "a b"] {
            assert!(
                matches!(Query::new(name, "ua").validate(), Err(Error::InvalidInput(_))),
                "{:?} should be rejected",
                name
            );
        }
        assert!(matches!(
            Query::new("a".repeat(65), "ua").validate(),
            Err(Error::InvalidInput(_))
        ));
    }

    #[test]
    fn test_validate_user_agent_is_header_value() {
        assert!(Query::new("serde", "my-tool/1.0 (me@example.org)")
            .validate()
            .is_ok());
        assert!(matches!(
            Query::new("serde", "bad\nagent").validate(),
            Err(Error::InvalidInput(_))
        ));
        assert!(matches!(
            Query::new("serde", "bad\u{7f}agent").validate(),
            Err(Error::InvalidInput(_))
        ));
    }
}
