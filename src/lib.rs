pub mod config;
pub mod domain;
pub mod error;
pub mod git;
pub mod logging;
pub mod render;
pub mod resolver;
pub mod ui;

pub use domain::ResolvedVersion;
pub use error::{Result, SweetReleaseError};
pub use resolver::resolve;
