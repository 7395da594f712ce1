use std::cmp::Ordering;

use semver::Version;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum VersionParseError {
    #[error("Empty version string")]
    Empty,
    #[error("Invalid component #{position} ({value:?}) in version: {input}")]
    InvalidComponent {
        input: String,
        position: usize,
        value: String,
    },
    #[error("Not a semantic version: {input}")]
    NotSemver { input: String },
}

/// Orders a store version against the running version.
///
/// `Greater` means the store version is newer. Closures with the matching
/// signature implement this trait, so a one-off comparator can be passed
/// straight into [`crate::CheckOptions`].
pub trait VersionComparator: Send + Sync {
    /// # Errors
    /// Returns an error when either version cannot be understood by this
    /// comparator.
    fn compare(&self, remote: &str, current: &str) -> Result<Ordering, VersionParseError>;
}

impl<F> VersionComparator for F
where
    F: Fn(&str, &str) -> Result<Ordering, VersionParseError> + Send + Sync,
{
    fn compare(&self, remote: &str, current: &str) -> Result<Ordering, VersionParseError> {
        self(remote, current)
    }
}

/// Dotted numeric comparison: "1.2" equals "1.2.0", "1.10" is newer than "1.9".
#[derive(Debug, Clone, Copy, Default)]
pub struct NumericComparator;

impl VersionComparator for NumericComparator {
    fn compare(&self, remote: &str, current: &str) -> Result<Ordering, VersionParseError> {
        compare_versions(remote, current)
    }
}

/// Semver precedence, pre-release aware. Short versions are zero-padded.
#[derive(Debug, Clone, Copy, Default)]
pub struct SemverComparator;

impl VersionComparator for SemverComparator {
    fn compare(&self, remote: &str, current: &str) -> Result<Ordering, VersionParseError> {
        let remote = parse_semver(remote)?;
        let current = parse_semver(current)?;
        Ok(remote.cmp_precedence(&current))
    }
}

/// Compare two dotted numeric versions component by component.
///
/// # Errors
/// Returns an error when either side is empty or has a component that is not a
/// plain non-negative integer.
pub fn compare_versions(a: &str, b: &str) -> Result<Ordering, VersionParseError> {
    let left = parse_components(a)?;
    let right = parse_components(b)?;
    let len = left.len().max(right.len());

    for index in 0..len {
        let l = left.get(index).copied().unwrap_or(0);
        let r = right.get(index).copied().unwrap_or(0);
        match l.cmp(&r) {
            Ordering::Equal => {}
            decided => return Ok(decided),
        }
    }

    Ok(Ordering::Equal)
}

fn strip_prefix(version: &str) -> &str {
    let trimmed = version.trim();
    trimmed.strip_prefix('v').unwrap_or(trimmed)
}

fn parse_components(version: &str) -> Result<Vec<u64>, VersionParseError> {
    let core = strip_prefix(version);
    if core.is_empty() {
        return Err(VersionParseError::Empty);
    }

    core.split('.')
        .enumerate()
        .map(|(position, part)| {
            let invalid = || VersionParseError::InvalidComponent {
                input: version.to_string(),
                position,
                value: part.to_string(),
            };
            if part.is_empty() || !part.bytes().all(|b| b.is_ascii_digit()) {
                return Err(invalid());
            }
            part.parse::<u64>().map_err(|_| invalid())
        })
        .collect()
}

fn parse_semver(version: &str) -> Result<Version, VersionParseError> {
    let trimmed = strip_prefix(version);
    if trimmed.is_empty() {
        return Err(VersionParseError::Empty);
    }
    if let Ok(parsed) = Version::parse(trimmed) {
        return Ok(parsed);
    }

    let not_semver = || VersionParseError::NotSemver {
        input: version.to_string(),
    };
    let (core, suffix) = split_semver_core_and_suffix(trimmed);
    let mut parts = core.split('.');
    let major = parts
        .next()
        .and_then(|part| part.parse::<u64>().ok())
        .ok_or_else(not_semver)?;
    let minor = parts.next().map(str::parse::<u64>).transpose().map_err(|_| not_semver())?;
    if parts.next().is_some() {
        return Err(not_semver());
    }

    let normalized = format!("{major}.{}.0{suffix}", minor.unwrap_or(0));
    Version::parse(&normalized).map_err(|_| not_semver())
}

fn split_semver_core_and_suffix(version: &str) -> (&str, &str) {
    let suffix_idx = version.find(['-', '+']).unwrap_or(version.len());
    (&version[..suffix_idx], &version[suffix_idx..])
}
