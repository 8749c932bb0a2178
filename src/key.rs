//! Key Codec Module
//!
//! Maps a logical key to its physical store key: `"{prefix}:{version}:{key}"`.
//!
//! The logical key is passed through verbatim. A logical key that contains
//! the `:` separator can therefore produce the same physical key as a
//! different (version, key) pair; callers that need strict isolation should
//! keep separators out of prefixes and versions.

use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::glob;

/// Separator between the prefix, version and logical key segments.
pub const SEPARATOR: char = ':';

// == Version ==
/// Cache version segment, either numeric or a free-form tag like `v2.3.4`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Version {
    Number(i64),
    Tag(String),
}

impl Default for Version {
    fn default() -> Self {
        Version::Number(1)
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Version::Number(n) => write!(f, "{}", n),
            Version::Tag(tag) => f.write_str(tag),
        }
    }
}

impl FromStr for Version {
    type Err = Infallible;

    /// Canonical integer text becomes `Number`, anything else a `Tag`.
    ///
    /// `"01"` or `"+7"` stay tags so they keep their own physical keys.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s.parse::<i64>() {
            Ok(n) if n.to_string() == s => Version::Number(n),
            _ => Version::Tag(s.to_string()),
        })
    }
}

impl From<i64> for Version {
    fn from(n: i64) -> Self {
        Version::Number(n)
    }
}

impl From<i32> for Version {
    fn from(n: i32) -> Self {
        Version::Number(i64::from(n))
    }
}

impl From<u32> for Version {
    fn from(n: u32) -> Self {
        Version::Number(i64::from(n))
    }
}

impl From<&str> for Version {
    fn from(tag: &str) -> Self {
        Version::Tag(tag.to_string())
    }
}

impl From<String> for Version {
    fn from(tag: String) -> Self {
        Version::Tag(tag)
    }
}

// == Build Key ==
/// Builds the physical key for a logical key.
pub fn build_key(prefix: &str, version: &Version, key: &str) -> String {
    format!("{prefix}{SEPARATOR}{version}{SEPARATOR}{key}")
}

// == Build Pattern ==
/// Builds the physical glob for a logical pattern.
///
/// Prefix and version are escaped so glob characters in them match
/// literally; `pattern` keeps its glob meaning.
pub fn build_pattern(prefix: &str, version: &Version, pattern: &str) -> String {
    format!(
        "{}{SEPARATOR}{}{SEPARATOR}{pattern}",
        glob::escape(prefix),
        glob::escape(&version.to_string())
    )
}
