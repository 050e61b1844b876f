//! Version constraint expressions
//!
//! A constraint is a comma-separated list of comparators that must all hold:
//! - `1.2.3`, `=1.2.3` - exactly 1.2.3
//! - `!=1.2.3` - anything but 1.2.3
//! - `>=1.2.3`, `>1.2.3`, `<=1.2.3`, `<1.2.3` - comparison operators
//! - `~>1.2` - pessimistic: >=1.2.0 <2.0.0, `~>1.2.3`: >=1.2.3 <1.3.0
//! - `^1.2.3` - caret: >=1.2.3 <2.0.0 (or special cases for 0.x)
//! - `~1.2.3` - tilde: >=1.2.3 <1.3.0
//! - `1.2.*`, `1.*`, `*` - wildcards
//!
//! A pre-release version only satisfies a constraint when one of its
//! comparators names a pre-release of the same major.minor.patch.

use std::str::FromStr;

use semver::Version;

use crate::version::semver::parse_version;

#[derive(Debug, Clone, PartialEq, Eq)]
enum Comparator {
    Exact(Version),
    NotEqual(Version),
    Gte(Version),
    Gt(Version),
    Lte(Version),
    Lt(Version),
    /// `~>`: the last given segment may increase, the ones before it are fixed
    Pessimistic { base: Version, segments: usize },
    Caret(Version),
    Tilde(Version),
    Any,
    WildcardMajor(u64),
    WildcardMinor(u64, u64),
}

impl Comparator {
    fn parse(spec: &str) -> Result<Self, String> {
        let spec = spec.trim();
        if spec.is_empty() {
            return Err("empty comparator".to_string());
        }

        let operand = |rest: &str| {
            let rest = rest.trim();
            parse_version(rest).ok_or_else(|| format!("invalid version {rest:?}"))
        };

        if let Some(rest) = spec.strip_prefix("~>") {
            let base = operand(rest)?;
            Ok(Comparator::Pessimistic {
                base,
                segments: count_segments(rest),
            })
        } else if let Some(rest) = spec.strip_prefix(">=") {
            operand(rest).map(Comparator::Gte)
        } else if let Some(rest) = spec.strip_prefix('>') {
            operand(rest).map(Comparator::Gt)
        } else if let Some(rest) = spec.strip_prefix("<=") {
            operand(rest).map(Comparator::Lte)
        } else if let Some(rest) = spec.strip_prefix('<') {
            operand(rest).map(Comparator::Lt)
        } else if let Some(rest) = spec.strip_prefix("!=") {
            operand(rest).map(Comparator::NotEqual)
        } else if let Some(rest) = spec.strip_prefix('=') {
            operand(rest).map(Comparator::Exact)
        } else if let Some(rest) = spec.strip_prefix('^') {
            operand(rest).map(Comparator::Caret)
        } else if let Some(rest) = spec.strip_prefix('~') {
            operand(rest).map(Comparator::Tilde)
        } else if spec == "*" {
            Ok(Comparator::Any)
        } else if let Some(comparator) = Self::parse_wildcard(spec) {
            Ok(comparator)
        } else {
            operand(spec).map(Comparator::Exact)
        }
    }

    /// Parse wildcard patterns like "1.*" or "1.2.*"
    fn parse_wildcard(spec: &str) -> Option<Self> {
        let parts: Vec<&str> = spec.split('.').collect();

        match parts.as_slice() {
            [major, "*"] => major.parse::<u64>().ok().map(Comparator::WildcardMajor),
            [major, minor, "*"] => {
                let major = major.parse::<u64>().ok()?;
                let minor = minor.parse::<u64>().ok()?;
                Some(Comparator::WildcardMinor(major, minor))
            }
            _ => None,
        }
    }

    fn satisfies(&self, version: &Version) -> bool {
        match self {
            Comparator::Exact(v) => version == v,
            Comparator::NotEqual(v) => version != v,
            Comparator::Gte(v) => version >= v,
            Comparator::Gt(v) => version > v,
            Comparator::Lte(v) => version <= v,
            Comparator::Lt(v) => version < v,
            Comparator::Pessimistic { base, segments } => {
                if version < base {
                    return false;
                }
                // ~>1 and ~>1.2 pin the major, ~>1.2.3 pins major and minor
                if *segments >= 3 {
                    version.major == base.major && version.minor == base.minor
                } else {
                    version.major == base.major
                }
            }
            Comparator::Caret(v) => {
                if version < v {
                    return false;
                }
                // ^1.2.3 -> >=1.2.3 <2.0.0
                // ^0.2.3 -> >=0.2.3 <0.3.0
                // ^0.0.3 -> >=0.0.3 <0.0.4
                if v.major == 0 {
                    if v.minor == 0 {
                        version.major == 0 && version.minor == 0 && version.patch == v.patch
                    } else {
                        version.major == 0 && version.minor == v.minor
                    }
                } else {
                    version.major == v.major
                }
            }
            Comparator::Tilde(v) => {
                version >= v && version.major == v.major && version.minor == v.minor
            }
            Comparator::Any => true,
            Comparator::WildcardMajor(major) => version.major == *major,
            Comparator::WildcardMinor(major, minor) => {
                version.major == *major && version.minor == *minor
            }
        }
    }

    fn operand(&self) -> Option<&Version> {
        match self {
            Comparator::Exact(v)
            | Comparator::NotEqual(v)
            | Comparator::Gte(v)
            | Comparator::Gt(v)
            | Comparator::Lte(v)
            | Comparator::Lt(v)
            | Comparator::Caret(v)
            | Comparator::Tilde(v)
            | Comparator::Pessimistic { base: v, .. } => Some(v),
            Comparator::Any | Comparator::WildcardMajor(_) | Comparator::WildcardMinor(_, _) => {
                None
            }
        }
    }
}

fn count_segments(version: &str) -> usize {
    let version = version.trim();
    let version = version.strip_prefix('v').unwrap_or(version);
    let core = version.split(['-', '+']).next().unwrap_or(version);
    core.split('.').count()
}

/// A parsed constraint expression (all comparators must hold)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Constraint {
    comparators: Vec<Comparator>,
}

impl Constraint {
    /// Check if a version satisfies every comparator
    pub fn matches(&self, version: &Version) -> bool {
        if !version.pre.is_empty() && !self.allows_prerelease_of(version) {
            return false;
        }
        self.comparators.iter().all(|c| c.satisfies(version))
    }

    /// Convenience over [`Constraint::matches`] for raw strings; unparseable input never matches.
    pub fn matches_str(&self, version: &str) -> bool {
        parse_version(version).is_some_and(|v| self.matches(&v))
    }

    fn allows_prerelease_of(&self, version: &Version) -> bool {
        self.comparators.iter().filter_map(Comparator::operand).any(|v| {
            !v.pre.is_empty()
                && v.major == version.major
                && v.minor == version.minor
                && v.patch == version.patch
        })
    }
}

impl FromStr for Constraint {
    type Err = String;

    fn from_str(spec: &str) -> Result<Self, Self::Err> {
        let spec = spec.trim();
        if spec.is_empty() {
            return Err("empty constraint".to_string());
        }

        let comparators = spec
            .split(',')
            .map(Comparator::parse)
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Constraint { comparators })
    }
}
