//! Diagnostic logging setup.
//!
//! Logs go to stderr only; stdout carries the rendered version.

use tracing_subscriber::filter::EnvFilter;

/// Build an `EnvFilter` based on CLI flags and environment.
///
/// Priority: quiet flag > verbose flag > RUST_LOG env > default_level
pub fn env_filter(quiet: bool, verbose: u8, default_level: &str) -> EnvFilter {
    if quiet {
        return EnvFilter::new("error");
    }

    if verbose > 0 {
        let level = match verbose {
            1 => "debug",
            _ => "trace",
        };
        return EnvFilter::new(level);
    }

    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level))
}

/// Install the global subscriber. Calling it twice keeps the first one.
pub fn init_logging(quiet: bool, verbose: u8) {
    let installed = tracing_subscriber::fmt()
        .with_env_filter(env_filter(quiet, verbose, "warn"))
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();

    if installed.is_ok() {
        tracing::debug!("logging initialized");
    }
}
