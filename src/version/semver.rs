use std::cmp::Ordering;

use semver::Version;

/// Parse a version string into a semver::Version, normalizing partial versions.
///
/// Strips a leading `v` and pads missing minor/patch segments with zeros.
///
/// Examples:
/// - "1" -> Version(1, 0, 0)
/// - "v1.2" -> Version(1, 2, 0)
/// - "1.7.0-rc1" -> Version(1, 7, 0, pre: rc1)
pub fn parse_version(version: &str) -> Option<Version> {
    let version = version.trim();
    let version = version.strip_prefix('v').unwrap_or(version);

    // Only the numeric core is padded; pre-release and build suffixes are kept as-is
    let split_at = version.find(['-', '+']).unwrap_or(version.len());
    let (core, suffix) = version.split_at(split_at);

    let normalized = match core.split('.').count() {
        1 => format!("{core}.0.0{suffix}"),
        2 => format!("{core}.0{suffix}"),
        _ => version.to_string(),
    };
    Version::parse(&normalized).ok()
}

/// Returns the canonical rendering of an exact version, or None when it does not parse.
///
/// Installed directories are always named with this form.
pub fn normalize_version(version: &str) -> Option<String> {
    parse_version(version).map(|v| v.to_string())
}

/// Total order over version strings.
///
/// Parseable versions follow semver precedence (a pre-release sorts before its
/// release). Unparseable strings sort before every parseable one, lexically
/// among themselves.
pub fn compare_versions(a: &str, b: &str) -> Ordering {
    match (parse_version(a), parse_version(b)) {
        (Some(a), Some(b)) => a.cmp(&b),
        (Some(_), None) => Ordering::Greater,
        (None, Some(_)) => Ordering::Less,
        (None, None) => a.cmp(b),
    }
}

/// Sorts versions ascending.
pub fn sort_versions(versions: &mut [String]) {
    versions.sort_by(|a, b| compare_versions(a, b));
}

/// Walks an ascending version list lazily, newest-first when `reverse` is set.
///
/// Consumers stop at the first interesting element; nothing past it is visited.
pub fn iterate(versions: &[String], reverse: bool) -> Box<dyn Iterator<Item = &String> + '_> {
    if reverse {
        Box::new(versions.iter().rev())
    } else {
        Box::new(versions.iter())
    }
}
