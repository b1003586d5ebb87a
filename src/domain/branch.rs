use super::identifier::sanitize_identifier;
use crate::error::Result;

/// Represents the checked-out branch with its stability classification
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BranchContext {
    pub name: String,
    pub is_stable: bool,
}

impl BranchContext {
    /// Classify a branch against the configured stable branch names (case-insensitive)
    pub fn classify(name: impl Into<String>, stable_branches: &[String]) -> Self {
        let name = name.into();
        let is_stable = stable_branches
            .iter()
            .any(|stable| stable.eq_ignore_ascii_case(&name));

        BranchContext { name, is_stable }
    }

    /// Pre-release channel for non-stable branches, `None` for stable ones
    pub fn prerelease_channel(&self) -> Result<Option<String>> {
        if self.is_stable {
            return Ok(None);
        }
        sanitize_identifier(&self.name).map(Some)
    }
}
