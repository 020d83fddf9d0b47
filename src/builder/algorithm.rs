//! Artifact version-conflict policy.
//!
//! When two features contribute different versions of the same artifact
//! (see [`ArtifactId::is_same`]) the merge keeps exactly one of them. Which
//! one is decided by the [`ArtifactMergeAlgorithm`] configured on the context.
//!
//! Versions are compared OSGi-style. The leading dot-separated numeric
//! segments are compared as integers, missing segments counting as `0`, so
//! `1.10.0` beats `1.9.0` and `10.0` beats `9.0.0.1`. Whatever follows the
//! numbers is the qualifier, which breaks ties:
//!
//! - `-qualifier` (Maven pre-release, e.g. `1.0-SNAPSHOT`) sorts below the
//!   bare release, ordered by [`semver::Prerelease`] rules
//! - no qualifier, or only `+build` metadata
//! - `.qualifier` (OSGi, e.g. `1.0.0.RELEASE`) sorts above the bare release,
//!   ordered as plain strings
//!
//! A leading `v` is ignored.

use semver::Prerelease;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use crate::core::BuilderError;
use crate::models::ArtifactId;

/// How conflicting versions of one artifact are reconciled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum ArtifactMergeAlgorithm {
    /// The version from the most recently processed feature wins
    Latest,
    /// The greatest version seen wins
    #[default]
    Highest,
}

impl ArtifactMergeAlgorithm {
    /// Pick between the version already in the result and a newly seen one.
    ///
    /// `existing` comes from features processed earlier, `candidate` from the
    /// feature being merged now. With [`Highest`](Self::Highest) a tie keeps
    /// `existing`.
    #[must_use]
    pub fn select<'a>(
        &self,
        existing: &'a ArtifactId,
        candidate: &'a ArtifactId,
    ) -> &'a ArtifactId {
        match self {
            Self::Latest => candidate,
            Self::Highest => {
                if compare_versions(candidate.version(), existing.version()) == Ordering::Greater {
                    candidate
                } else {
                    existing
                }
            }
        }
    }

    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Latest => "latest",
            Self::Highest => "highest",
        }
    }
}

impl FromStr for ArtifactMergeAlgorithm {
    type Err = BuilderError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "latest" => Ok(Self::Latest),
            "highest" => Ok(Self::Highest),
            _ => Err(BuilderError::InvalidMergeAlgorithm {
                value: s.to_string(),
            }),
        }
    }
}

impl TryFrom<String> for ArtifactMergeAlgorithm {
    type Error = BuilderError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<ArtifactMergeAlgorithm> for String {
    fn from(algorithm: ArtifactMergeAlgorithm) -> Self {
        algorithm.as_str().to_string()
    }
}

impl fmt::Display for ArtifactMergeAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Compare two version strings.
///
/// This is a total order: numeric segments first, then the qualifier class,
/// then the qualifier itself.
#[must_use]
pub fn compare_versions(a: &str, b: &str) -> Ordering {
    let a = VersionKey::parse(a);
    let b = VersionKey::parse(b);

    let len = a.numbers.len().max(b.numbers.len());
    (0..len)
        .map(|i| {
            let x = a.numbers.get(i).copied().unwrap_or(0);
            let y = b.numbers.get(i).copied().unwrap_or(0);
            x.cmp(&y)
        })
        .find(|o| o.is_ne())
        .unwrap_or(Ordering::Equal)
        .then_with(|| a.qualifier.cmp(&b.qualifier))
}

struct VersionKey {
    numbers: Vec<u64>,
    qualifier: Qualifier,
}

// Variant order is sort order.
#[derive(Debug, PartialEq, Eq, PartialOrd, Ord)]
enum Qualifier {
    PreRelease(PreRelease),
    Release,
    Qualified(String),
}

#[derive(Debug, PartialEq, Eq, PartialOrd, Ord)]
enum PreRelease {
    Semantic(Prerelease),
    Other(String),
}

impl VersionKey {
    fn parse(raw: &str) -> Self {
        let raw = raw.strip_prefix('v').unwrap_or(raw);

        let mut numbers = Vec::new();
        let mut rest = raw;
        loop {
            let digits = rest.bytes().take_while(u8::is_ascii_digit).count();
            let Some(number) = rest[..digits].parse::<u64>().ok() else {
                break;
            };
            numbers.push(number);
            rest = &rest[digits..];
            match rest.strip_prefix('.') {
                Some(next) if next.starts_with(|c: char| c.is_ascii_digit()) => rest = next,
                _ => break,
            }
        }

        let qualifier = if rest.is_empty() || rest.starts_with('+') {
            Qualifier::Release
        } else if let Some(pre) = rest.strip_prefix('-') {
            let pre = pre.split_once('+').map_or(pre, |(pre, _)| pre);
            Qualifier::PreRelease(match Prerelease::new(pre) {
                Ok(semantic) => PreRelease::Semantic(semantic),
                Err(_) => PreRelease::Other(pre.to_string()),
            })
        } else {
            let qualified = rest.strip_prefix('.').unwrap_or(rest);
            Qualifier::Qualified(qualified.to_string())
        };

        Self { numbers, qualifier }
    }
}
