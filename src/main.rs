use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};

use gitver::config::{BranchSettings, EnvOverrides, Settings, CONVENTIONAL_DEFAULT_BRANCH};
use gitver::git::Git2Repository;
use gitver::{observability, resolver, ui};

#[derive(Parser)]
#[command(
    name = "gitver",
    version,
    about = "Semantic version generator that uses git history"
)]
struct Cli {
    #[arg(long, global = true, default_value = ".", help = "Path to the git repository")]
    path: PathBuf,

    #[arg(long, global = true, help = "Settings file [default: ./.gitver.toml if present]")]
    settings: Option<PathBuf>,

    #[arg(
        long,
        global = true,
        help = "Trim branch prefixes feature/ and hotfix/ from prerelease label"
    )]
    trim_branch_prefix: bool,

    #[arg(
        long,
        global = true,
        default_value = CONVENTIONAL_DEFAULT_BRANCH,
        help = "Branch to treat as the default branch"
    )]
    default_branch: String,

    #[arg(long, global = true, help = "Ignore CI environment variables")]
    ignore_env_vars: bool,

    #[arg(
        short,
        long,
        global = true,
        action = clap::ArgAction::Count,
        help = "Show information about how the version was calculated"
    )]
    verbose: u8,

    #[arg(
        long,
        visible_alias = "forbid-behind-master",
        help = "Error if the current branch's version is behind the default branch's version"
    )]
    forbid_behind_default: bool,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Gets the prerelease label, if any
    Label,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    observability::init_logging(cli.verbose);

    match run(cli) {
        Ok(output) => {
            println!("{}", output);
            ExitCode::SUCCESS
        }
        Err(e) => {
            ui::display_error(&e);
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<String> {
    let overrides = EnvOverrides::from_env(cli.ignore_env_vars);
    let branch_settings = BranchSettings {
        forbid_behind_default_branch: cli.forbid_behind_default,
        trim_branch_prefix: cli.trim_branch_prefix,
        ..BranchSettings::new(&cli.default_branch)
    };

    let repo = Git2Repository::open(&cli.path)
        .with_context(|| format!("cannot open repository at '{}'", cli.path.display()))?;

    match cli.command {
        Some(Command::Label) => {
            let label = resolver::prerelease_label(&repo, &branch_settings, &overrides)?;
            Ok(label)
        }
        None => {
            let settings =
                Settings::load(cli.settings.as_deref()).context("cannot load settings")?;
            let version =
                resolver::current_version(&repo, &settings, &branch_settings, &overrides)?;
            Ok(version.to_string())
        }
    }
}
