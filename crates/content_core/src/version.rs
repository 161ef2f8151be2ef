//! Pack and runtime versions, and the ranges packs use to target runtimes.
//!
//! Versions are `MAJOR.MINOR.PATCH` with an optional `-pre` tag. A
//! pre-release sorts below the release with the same numbers; two
//! pre-release tags compare lexically.
//!
//! Ranges accept `*`, exact versions, the comparators `=`, `>`, `>=`,
//! `<`, `<=`, caret (`^1.2.3`) and tilde (`~1.2.3`) shorthands. Comparators
//! separated by whitespace must all hold; alternatives are separated by
//! `||`. Inside ranges, missing minor/patch components default to zero.

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use thiserror::Error;

/// Error raised for malformed versions or ranges.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum VersionError {
    /// Not a `MAJOR.MINOR.PATCH[-pre]` version.
    #[error("invalid version '{0}': expected MAJOR.MINOR.PATCH")]
    InvalidVersion(String),

    /// Range comparator could not be parsed.
    #[error("invalid version range '{range}': bad comparator '{comparator}'")]
    InvalidRange {
        /// Full range text.
        range: String,
        /// Offending comparator.
        comparator: String,
    },
}

/// A semantic version.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Version {
    /// Major component.
    pub major: u64,
    /// Minor component.
    pub minor: u64,
    /// Patch component.
    pub patch: u64,
    /// Pre-release tag, without the leading `-`.
    pub pre: Option<String>,
}

impl Version {
    /// Build a release version.
    #[must_use]
    pub const fn new(major: u64, minor: u64, patch: u64) -> Self {
        Self {
            major,
            minor,
            patch,
            pre: None,
        }
    }

    fn parse_loose(text: &str) -> Option<Self> {
        let (numbers, pre) = match text.split_once('-') {
            Some((numbers, pre)) if !pre.is_empty() => (numbers, Some(pre.to_string())),
            Some(_) => return None,
            None => (text, None),
        };
        let mut parts = numbers.split('.');
        let major = parse_component(parts.next()?)?;
        let minor = parts.next().map_or(Some(0), parse_component)?;
        let patch = parts.next().map_or(Some(0), parse_component)?;
        if parts.next().is_some() {
            return None;
        }
        Some(Self {
            major,
            minor,
            patch,
            pre,
        })
    }
}

fn parse_component(text: &str) -> Option<u64> {
    if text.is_empty() || !text.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    text.parse().ok()
}

impl FromStr for Version {
    type Err = VersionError;

    fn from_str(text: &str) -> Result<Self, Self::Err> {
        let trimmed = text.trim();
        let numbers = trimmed.split('-').next().unwrap_or_default();
        if numbers.split('.').count() != 3 {
            return Err(VersionError::InvalidVersion(text.to_string()));
        }
        Self::parse_loose(trimmed).ok_or_else(|| VersionError::InvalidVersion(text.to_string()))
    }
}

impl Ord for Version {
    fn cmp(&self, other: &Self) -> Ordering {
        (self.major, self.minor, self.patch)
            .cmp(&(other.major, other.minor, other.patch))
            .then_with(|| match (&self.pre, &other.pre) {
                (None, None) => Ordering::Equal,
                (None, Some(_)) => Ordering::Greater,
                (Some(_), None) => Ordering::Less,
                (Some(a), Some(b)) => a.cmp(b),
            })
    }
}

impl PartialOrd for Version {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.patch)?;
        if let Some(pre) = &self.pre {
            write!(f, "-{pre}")?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Op {
    Eq,
    Gt,
    Gte,
    Lt,
    Lte,
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct Bound {
    op: Op,
    version: Version,
}

impl Bound {
    fn admits(&self, version: &Version) -> bool {
        let ordering = version.cmp(&self.version);
        match self.op {
            Op::Eq => ordering == Ordering::Equal,
            Op::Gt => ordering == Ordering::Greater,
            Op::Gte => ordering != Ordering::Less,
            Op::Lt => ordering == Ordering::Less,
            Op::Lte => ordering != Ordering::Greater,
        }
    }
}

/// A set of acceptable versions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VersionRange {
    source: String,
    alternatives: Vec<Vec<Bound>>,
}

impl VersionRange {
    /// The range that admits every version.
    #[must_use]
    pub fn any() -> Self {
        Self {
            source: "*".to_string(),
            alternatives: vec![Vec::new()],
        }
    }

    /// Whether `version` satisfies the range.
    #[must_use]
    pub fn matches(&self, version: &Version) -> bool {
        self.alternatives
            .iter()
            .any(|bounds| bounds.iter().all(|bound| bound.admits(version)))
    }

    /// The text the range was parsed from.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.source
    }
}

impl FromStr for VersionRange {
    type Err = VersionError;

    fn from_str(text: &str) -> Result<Self, Self::Err> {
        let mut alternatives = Vec::new();
        for alternative in text.split("||") {
            let mut bounds = Vec::new();
            for comparator in alternative.split_whitespace() {
                parse_comparator(comparator, &mut bounds).ok_or_else(|| {
                    VersionError::InvalidRange {
                        range: text.to_string(),
                        comparator: comparator.to_string(),
                    }
                })?;
            }
            alternatives.push(bounds);
        }
        Ok(Self {
            source: text.trim().to_string(),
            alternatives,
        })
    }
}

impl fmt::Display for VersionRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.source)
    }
}

fn parse_comparator(comparator: &str, bounds: &mut Vec<Bound>) -> Option<()> {
    if comparator == "*" || comparator.eq_ignore_ascii_case("x") {
        return Some(());
    }
    if let Some(rest) = comparator.strip_prefix('^') {
        let lower = Version::parse_loose(rest)?;
        let upper = if lower.major > 0 {
            Version::new(lower.major.checked_add(1)?, 0, 0)
        } else if lower.minor > 0 {
            Version::new(0, lower.minor.checked_add(1)?, 0)
        } else {
            Version::new(0, 0, lower.patch.checked_add(1)?)
        };
        bounds.push(Bound {
            op: Op::Gte,
            version: lower,
        });
        bounds.push(Bound {
            op: Op::Lt,
            version: upper,
        });
        return Some(());
    }
    if let Some(rest) = comparator.strip_prefix('~') {
        let lower = Version::parse_loose(rest)?;
        let upper = Version::new(lower.major, lower.minor.checked_add(1)?, 0);
        bounds.push(Bound {
            op: Op::Gte,
            version: lower,
        });
        bounds.push(Bound {
            op: Op::Lt,
            version: upper,
        });
        return Some(());
    }

    let (op, rest) = if let Some(rest) = comparator.strip_prefix(">=") {
        (Op::Gte, rest)
    } else if let Some(rest) = comparator.strip_prefix("<=") {
        (Op::Lte, rest)
    } else if let Some(rest) = comparator.strip_prefix('>') {
        (Op::Gt, rest)
    } else if let Some(rest) = comparator.strip_prefix('<') {
        (Op::Lt, rest)
    } else if let Some(rest) = comparator.strip_prefix('=') {
        (Op::Eq, rest)
    } else {
        (Op::Eq, comparator)
    };
    bounds.push(Bound {
        op,
        version: Version::parse_loose(rest)?,
    });
    Some(())
}
