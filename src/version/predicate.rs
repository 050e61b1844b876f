//! Turns a requested version expression into a search predicate
//!
//! - `latest` - any version, newest first
//! - `latest:<constraint>` - newest version satisfying the constraint
//! - `latest:<regex>` - newest version whose string matches the pattern
//! - `<constraint>` - oldest version satisfying the constraint

use regex::Regex;
use tracing::debug;

use crate::config::{LATEST_KEY, LATEST_PREFIX};
use crate::version::constraint::Constraint;
use crate::version::error::ManagerError;

#[derive(Debug, Clone)]
enum Matcher {
    Any,
    Constraint(Constraint),
    Pattern(Regex),
}

/// Boolean test over candidate versions plus the direction to search in
#[derive(Debug, Clone)]
pub struct Predicate {
    matcher: Matcher,
    reverse_order: bool,
}

impl Predicate {
    /// Whether `version` is an acceptable candidate
    pub fn matches(&self, version: &str) -> bool {
        match &self.matcher {
            Matcher::Any => true,
            Matcher::Constraint(constraint) => constraint.matches_str(version),
            Matcher::Pattern(pattern) => pattern.is_match(version),
        }
    }

    /// True when candidates must be visited newest-first
    pub fn reverse_order(&self) -> bool {
        self.reverse_order
    }
}

/// Parse a requested version expression.
///
/// Fails with [`ManagerError::Parse`] when the input is not a recognizable expression.
pub fn parse_predicate(requested: &str) -> Result<Predicate, ManagerError> {
    let requested = requested.trim();

    if requested == LATEST_KEY {
        return Ok(Predicate {
            matcher: Matcher::Any,
            reverse_order: true,
        });
    }

    if let Some(suffix) = requested.strip_prefix(LATEST_PREFIX) {
        let suffix = suffix.trim();
        let matcher = if suffix.is_empty() {
            Matcher::Any
        } else if let Ok(constraint) = suffix.parse::<Constraint>() {
            Matcher::Constraint(constraint)
        } else {
            debug!("Interpret {:?} as a regular expression", suffix);
            Regex::new(suffix)
                .map(Matcher::Pattern)
                .map_err(|e| ManagerError::parse(requested, e))?
        };
        return Ok(Predicate {
            matcher,
            reverse_order: true,
        });
    }

    let constraint = requested
        .parse::<Constraint>()
        .map_err(|reason| ManagerError::parse(requested, reason))?;
    Ok(Predicate {
        matcher: Matcher::Constraint(constraint),
        reverse_order: false,
    })
}
