//! Version parsing and ordering helpers.
//!
//! All comparisons in the crate go through [`semver::Version`]'s `Ord`, so
//! standard semver precedence applies (pre-release sorts before the
//! corresponding release). Parsing failure is never fatal: callers treat
//! `None` as "unknown" and degrade the affected report fields.

use semver::Version;

/// Parse a version string into a semver::Version, normalizing the shapes
/// that show up in release tags and toolchain manifests.
///
/// Strips a leading `v` and pads partial versions with zeros.
///
/// Examples:
/// - "1" -> Version(1, 0, 0)
/// - "1.21" -> Version(1, 21, 0)
/// - "v2.3.0" -> Version(2, 3, 0)
pub fn parse_version(version: &str) -> Option<Version> {
    let version = version.trim().trim_start_matches('v');
    let parts: Vec<&str> = version.split('.').collect();
    let normalized = match parts.len() {
        1 => format!("{}.0.0", parts[0]),
        2 => format!("{}.{}.0", parts[0], parts[1]),
        _ => version.to_string(),
    };
    Version::parse(&normalized).ok()
}

/// Parse a Go toolchain version, accepting the `go` prefix used by upstream
/// tags ("go1.21.5") as well as the bare form ("1.21.5").
pub fn parse_go_version(version: &str) -> Option<Version> {
    parse_version(version.trim().trim_start_matches("go"))
}
