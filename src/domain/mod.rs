//! Domain logic - pure version rules independent of git operations

pub mod branch;
pub mod commit;
pub mod identifier;
pub mod resolved;
pub mod tag;
pub mod version;

pub use branch::BranchContext;
pub use commit::{CommitInfo, RootCommit, TreeState};
pub use identifier::sanitize_identifier;
pub use resolved::ResolvedVersion;
pub use tag::Tag;
pub use version::{append_prerelease, build_metadata, cmp_precedence, parse_tolerant};
