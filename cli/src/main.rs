use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

mod commands;
mod host;
mod output;
pub mod ux_error;

use commands::{Cli, Commands};

fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_level = if cli.global.verbose { "warn" } else { "error" };
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)))
        .init();

    let settings = host::load_settings(&cli.global)?;

    match cli.command {
        Commands::Show(args) => commands::show::run(args, &host::resolver(&settings)),
        Commands::Explain(args) => commands::explain::run(args, &host::resolver(&settings)),
        Commands::Check(args) => commands::check::run(args, &settings),
    }
}
