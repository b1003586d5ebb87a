//! Rendering of a resolved version into one of the output formats.

use crate::config::OutputFormat;
use crate::domain::ResolvedVersion;
use crate::error::{Result, SweetReleaseError};
use std::fs;
use std::io::{self, Write};
use std::path::Path;

/// Render the resolved version in the requested format
pub fn render(version: &ResolvedVersion, format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Semver => Ok(format!("{}\n", version.semver)),
        OutputFormat::Summary => Ok(format!(
            "Branch: {}\nCommit: {}\nShortCommit: {}\nVersion: {}\nBuildID: {}\n",
            version.branch, version.commit, version.short_commit, version.semver, version.build_id
        )),
        OutputFormat::Json => serde_json::to_string_pretty(version)
            .map(|json| json + "\n")
            .map_err(|e| SweetReleaseError::Render(e.to_string())),
        OutputFormat::Rust => Ok(rust_module(version)),
    }
}

fn rust_module(version: &ResolvedVersion) -> String {
    // {:?} on &str yields a valid Rust string literal
    format!(
        "// Generated by sweet-release. Do not edit.\n\
         \n\
         pub const VERSION: &str = {:?};\n\
         pub const COMMIT: &str = {:?};\n\
         pub const SHORT_COMMIT: &str = {:?};\n\
         pub const BRANCH: &str = {:?};\n\
         pub const BUILD_ID: u64 = {};\n",
        version.semver.to_string(),
        version.commit,
        version.short_commit,
        version.branch,
        version.build_id
    )
}

/// Write rendered output to a file, or to stdout when no path is given
pub fn write_output(rendered: &str, path: Option<&Path>) -> Result<()> {
    match path {
        Some(path) => {
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                fs::create_dir_all(parent)?;
            }
            fs::write(path, rendered)?;
            tracing::debug!(path = %path.display(), "wrote version output");
        }
        None => {
            let mut stdout = io::stdout().lock();
            stdout.write_all(rendered.as_bytes())?;
            stdout.flush()?;
        }
    }
    Ok(())
}
