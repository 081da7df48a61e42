//! Version parsing for gem index listings

use anyhow::Result;
use regex::Regex;
use semver::Version;

/// Parse a gem version leniently.
///
/// Accepts a leading `v` and pads `1` or `1.2` out to three components.
/// Rubygems prerelease forms such as `4.0.0.beta1` are not semver and fail.
pub fn parse_version(version_str: &str) -> Result<Version> {
    let cleaned = version_str.strip_prefix('v').unwrap_or(version_str);
    let padded = match cleaned.split('.').count() {
        1 => format!("{}.0.0", cleaned),
        2 => format!("{}.0", cleaned),
        _ => cleaned.to_string(),
    };
    Version::parse(&padded)
        .map_err(|e| anyhow::anyhow!("Invalid version '{}': {}", version_str, e))
}

/// Pick the highest version that parses; fall back to the first listed one
pub fn highest_version<'a>(candidates: &[&'a str]) -> Option<&'a str> {
    candidates
        .iter()
        .filter_map(|raw| parse_version(raw).ok().map(|v| (v, *raw)))
        .max_by(|(a, _), (b, _)| a.cmp(b))
        .map(|(_, raw)| raw)
        .or_else(|| candidates.first().copied())
}

/// Versions listed for `name` in `gem list --remote` output.
///
/// Only the first `name (v1, v2, ...)` line counts. Platform suffixes
/// (`1.16.0 x86_64-linux`) are dropped.
pub fn listed_versions<'a>(listing: &'a str, name: &str) -> Vec<&'a str> {
    let pattern = format!(r"(?m)^{} \(([^)]*)\)", regex::escape(name));
    let Ok(re) = Regex::new(&pattern) else {
        return Vec::new();
    };
    let Some(group) = re.captures(listing).and_then(|caps| caps.get(1)) else {
        return Vec::new();
    };
    group
        .as_str()
        .split(',')
        .filter_map(|entry| entry.split_whitespace().next())
        .filter(|token| token.starts_with(|c: char| c.is_ascii_digit()))
        .collect()
}

/// Resolve the version to pin for `name` from index output
pub fn resolve_version(listing: &str, name: &str) -> Option<String> {
    highest_version(&listed_versions(listing, name)).map(str::to_string)
}
