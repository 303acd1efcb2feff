// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Semantic versions used to tag handler variants and to express a consumer's
// current protocol version.
//
// A version is either a strict `major.minor.patch` triple or the `"default"`
// sentinel.  The sentinel orders strictly below every release, so sorting a
// set of versions always puts the fallback first.

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Wire spelling of the fallback sentinel.
pub const DEFAULT_VERSION: &str = "default";

/// A handler or consumer version.
///
/// The derived ordering is the comparator: `Default` is declared first so it
/// is less than any `Release`, and releases compare by `(major, minor, patch)`
/// most-significant first.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(try_from = "String", into = "String")]
pub enum SemverVersion {
    /// Fallback used when no concrete version qualifies.
    #[default]
    Default,
    /// A concrete `major.minor.patch` release.
    Release { major: u64, minor: u64, patch: u64 },
}

impl SemverVersion {
    pub const fn new(major: u64, minor: u64, patch: u64) -> Self {
        Self::Release { major, minor, patch }
    }

    /// Whether this is the `"default"` sentinel.
    pub fn is_default(&self) -> bool {
        matches!(self, Self::Default)
    }
}

/// Compare two versions. `"default"` is below every release.
pub fn compare_versions(a: &SemverVersion, b: &SemverVersion) -> Ordering {
    a.cmp(b)
}

/// Rejected version string.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum VersionParseError {
    #[error("invalid version `{input}`: expected major.minor.patch or \"default\"")]
    Malformed { input: String },

    #[error("invalid version `{input}`: component `{component}` is not a non-negative integer")]
    InvalidComponent { input: String, component: String },
}

impl FromStr for SemverVersion {
    type Err = VersionParseError;

    fn from_str(input: &str) -> Result<Self, Self::Err> {
        if input == DEFAULT_VERSION {
            return Ok(Self::Default);
        }

        let parts: Vec<&str> = input.split('.').collect();
        if parts.len() != 3 {
            return Err(VersionParseError::Malformed {
                input: input.to_owned(),
            });
        }

        let component = |part: &str| -> Result<u64, VersionParseError> {
            // `u64::from_str` tolerates a leading `+`; versions must not.
            if part.is_empty() || !part.bytes().all(|b| b.is_ascii_digit()) {
                return Err(VersionParseError::InvalidComponent {
                    input: input.to_owned(),
                    component: part.to_owned(),
                });
            }
            part.parse().map_err(|_| VersionParseError::InvalidComponent {
                input: input.to_owned(),
                component: part.to_owned(),
            })
        };

        Ok(Self::Release {
            major: component(parts[0])?,
            minor: component(parts[1])?,
            patch: component(parts[2])?,
        })
    }
}

impl TryFrom<String> for SemverVersion {
    type Error = VersionParseError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl TryFrom<&str> for SemverVersion {
    type Error = VersionParseError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<SemverVersion> for String {
    fn from(version: SemverVersion) -> Self {
        version.to_string()
    }
}

impl fmt::Display for SemverVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Default => f.write_str(DEFAULT_VERSION),
            Self::Release {
                major,
                minor,
                patch,
            } => write!(f, "{major}.{minor}.{patch}"),
        }
    }
}
