pub mod check;
pub mod explain;
pub mod show;

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "revision",
    author,
    version,
    about = "Revision - report the running build's revision",
    long_about = "Works without configuration - just run it.\nThe revision comes from the git \
                  working directory (tag:branch:commit), or, with --ignore-working-dir, from \
                  package metadata, pyproject.toml / Cargo.toml, a VERSION file or --override"
)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalArgs,

    #[command(subcommand)]
    pub command: Commands,
}

/// Settings overrides accepted by every command.
///
/// Flags only ever switch a source off; leaving one out defers to the
/// environment and the settings file.
#[derive(Args, Debug, Default)]
pub struct GlobalArgs {
    #[arg(long, global = true, value_name = "PATH", help = "Settings file (TOML or YAML)")]
    pub config: Option<PathBuf>,

    #[arg(long, global = true, value_name = "DIR", help = "Application root directory")]
    pub base_dir: Option<PathBuf>,

    #[arg(long, global = true, value_name = "DIR", help = "Git working directory")]
    pub git_dir: Option<PathBuf>,

    #[arg(long, global = true, value_name = "DIR", help = "Directory holding the project file")]
    pub toml_dir: Option<PathBuf>,

    #[arg(long, global = true, help = "Package name looked up in package metadata")]
    pub app_name: Option<String>,

    #[arg(
        long = "override",
        global = true,
        value_name = "REVISION",
        help = "Explicit revision, used when no other source yields one"
    )]
    pub revision: Option<String>,

    #[arg(long, global = true, help = "Truncate the git revision to this many characters")]
    pub max_length: Option<usize>,

    #[arg(long, global = true, help = "Do not read the git working directory")]
    pub ignore_working_dir: bool,

    #[arg(long, global = true, help = "Do not consult package metadata")]
    pub ignore_metadata: bool,

    #[arg(long, global = true, help = "Do not read pyproject.toml / Cargo.toml")]
    pub ignore_toml_file: bool,

    #[arg(long, global = true, help = "Do not read the VERSION file")]
    pub ignore_version_file: bool,

    #[arg(short, long, global = true, help = "Report which source produced the revision")]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    #[command(about = "Show the resolved revision")]
    Show(show::ShowArgs),

    #[command(about = "Explain where each revision field came from")]
    Explain(explain::ExplainArgs),

    #[command(about = "Check that the revision can be determined")]
    Check(check::CheckArgs),
}
