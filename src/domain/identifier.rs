use crate::error::{Result, SweetReleaseError};
use regex::Regex;

/// Turn an arbitrary name (usually a branch) into a semver identifier.
///
/// Runs of characters outside `[0-9A-Za-z-]` collapse to a single `-`, and
/// hyphens left at either end are dropped. A name that is already a valid
/// identifier comes back unchanged.
pub fn sanitize_identifier(name: &str) -> Result<String> {
    let invalid = Regex::new(r"[^0-9A-Za-z-]+")
        .map_err(|e| SweetReleaseError::version(format!("Invalid identifier pattern: {}", e)))?;

    let replaced = invalid.replace_all(name, "-");
    let cleaned = replaced.trim_matches('-');

    if cleaned.is_empty() {
        return Err(SweetReleaseError::version(format!(
            "'{}' cannot be used as a pre-release identifier",
            name
        )));
    }

    Ok(cleaned.to_string())
}
