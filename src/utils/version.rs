//! Version constraint parsing and matching.
//!
//! A bare version is matched literally: `1.0.217` selects exactly that
//! release, while a partial version such as `1.0` selects every release whose
//! version starts with it. Constraints with an explicit operator (`^1.0`,
//! `>=1.2, <2`) follow Cargo's requirement semantics.

use semver::{Comparator, Op, Version, VersionReq};
use std::fmt;
use std::str::FromStr;

/// A parsed version constraint
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VersionConstraint {
    raw: String,
    req: VersionReq,
}

impl VersionConstraint {
    /// Parse a constraint, rejecting malformed input instead of matching everything.
    pub fn parse(input: &str) -> Result<Self, semver::Error> {
        let raw = input.trim();
        let is_bare = raw.starts_with(|c: char| c.is_ascii_digit()) && !raw.contains(',');

        let req = if is_bare {
            let mut comparator = Comparator::parse(raw)?;
            // No operator parses as caret; reinterpret as exact or prefix.
            if comparator.op == Op::Caret {
                comparator.op = if comparator.patch.is_some() {
                    Op::Exact
                } else {
                    Op::Tilde
                };
            }
            VersionReq {
                comparators: vec![comparator],
            }
        } else {
            VersionReq::parse(raw)?
        };

        Ok(Self {
            raw: raw.to_string(),
            req,
        })
    }

    pub fn matches(&self, version: &Version) -> bool {
        self.req.matches(version)
    }

    /// The constraint as the caller wrote it
    pub fn as_str(&self) -> &str {
        &self.raw
    }
}

impl FromStr for VersionConstraint {
    type Err = semver::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for VersionConstraint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}
