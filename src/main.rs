use anyhow::{Context, Result};
use clap::{ArgAction, Parser};
use std::path::PathBuf;

use sweet_release::config::{self, Config, OutputFormat};
use sweet_release::git::repository::is_remote_url;
use sweet_release::git::Git2Repository;
use sweet_release::{logging, render, resolver, ui};

#[derive(clap::Parser)]
#[command(
    name = "sweet-release",
    version,
    about = "Derive a semantic version and build number from git history"
)]
struct Args {
    #[arg(short, long, help = "Custom configuration file path")]
    config: Option<PathBuf>,

    #[arg(short, long, help = "Path to the root of the project repository")]
    repo_path: Option<String>,

    #[arg(long, help = "Clone the repository first when the repo path is a URL")]
    clone: bool,

    #[arg(long, help = "Revision to describe [default: HEAD]")]
    revision: Option<String>,

    #[arg(long, help = "Build units added per year since the root commit")]
    time_multiplier: Option<u64>,

    #[arg(long, help = "Produce a snapshot version on a dirty working tree")]
    allow_snapshot: bool,

    #[arg(
        long,
        conflicts_with = "allow_snapshot",
        help = "Fail on a dirty working tree"
    )]
    no_snapshot: bool,

    #[arg(long, help = "Version file relative to the repository root")]
    version_file: Option<PathBuf>,

    #[arg(long, help = "Read the version file from the resolved commit")]
    version_file_from_commit: bool,

    #[arg(long, help = "Require the base version to come from the version file")]
    from_file: bool,

    #[arg(long, help = "Require the base version to come from a tag")]
    from_tag: bool,

    #[arg(
        long = "stable-branch",
        value_name = "BRANCH",
        help = "Branch producing release versions (repeatable, replaces configured list)"
    )]
    stable_branches: Vec<String>,

    #[arg(short, long, value_enum, help = "Output format")]
    format: Option<OutputFormat>,

    #[arg(short, long, help = "Write the output to a file instead of stdout")]
    output: Option<PathBuf>,

    #[arg(long, help = "Print the effective configuration and exit")]
    print_config: bool,

    #[arg(short, long, action = ArgAction::Count, help = "More log output (-v debug, -vv trace)")]
    verbose: u8,

    #[arg(short, long, help = "Only log errors")]
    quiet: bool,
}

impl Args {
    /// Layer command-line flags over the loaded configuration
    fn apply_to(&self, config: &mut Config) {
        if let Some(repo_path) = &self.repo_path {
            config.repo_path = repo_path.clone();
        }
        if self.clone {
            config.clone = true;
        }
        if let Some(revision) = &self.revision {
            config.revision = revision.clone();
        }
        if let Some(multiplier) = self.time_multiplier {
            config.time_multiplier = multiplier;
        }
        if self.allow_snapshot {
            config.allow_snapshot = true;
        }
        if self.no_snapshot {
            config.allow_snapshot = false;
        }
        if let Some(version_file) = &self.version_file {
            config.version_file = version_file.clone();
        }
        if self.version_file_from_commit {
            config.version_file_from_commit = true;
        }
        if self.from_file {
            config.from_file = true;
        }
        if self.from_tag {
            config.from_tag = true;
        }
        if !self.stable_branches.is_empty() {
            config.stable_branches = self.stable_branches.clone();
        }
        if let Some(format) = self.format {
            config.output.format = format;
        }
        if let Some(output) = &self.output {
            config.output.path = Some(output.clone());
        }
    }
}

fn main() {
    let args = Args::parse();
    logging::init_logging(args.quiet, args.verbose);

    if let Err(e) = run(&args) {
        ui::display_error(&format!("{:#}", e));
        std::process::exit(1);
    }
}

fn run(args: &Args) -> Result<()> {
    let mut config = config::load_config(args.config.as_deref())?;
    args.apply_to(&mut config);
    config.validate()?;

    if args.print_config {
        print!("{}", config.to_toml()?);
        return Ok(());
    }

    if config.clone && is_remote_url(&config.repo_path) {
        ui::display_status(&format!("Cloning {}", config.repo_path));
    }
    let repo = Git2Repository::open(&config.repo_path, config.clone)
        .with_context(|| format!("Cannot open repository '{}'", config.repo_path))?;

    let resolved = resolver::resolve(&repo, &config).context("Version resolution failed")?;

    let rendered = render::render(&resolved, config.output.format)?;
    render::write_output(&rendered, config.output.path.as_deref())
        .context("Cannot write version output")?;

    if let Some(path) = &config.output.path {
        ui::display_success(&format!(
            "Wrote version {} to {}",
            resolved.semver,
            path.display()
        ));
    }

    Ok(())
}
