use super::version::parse_tolerant;
use git2::Oid;
use semver::Version;

/// A tag name bound to the commit it points at (annotated tags are peeled)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tag {
    pub name: String,
    pub target: Oid,
}

impl Tag {
    pub fn new(name: impl Into<String>, target: Oid) -> Self {
        Tag {
            name: name.into(),
            target,
        }
    }

    /// The tag name as a semantic version, if it parses as one
    pub fn version(&self) -> Option<Version> {
        parse_tolerant(&self.name).ok()
    }
}
