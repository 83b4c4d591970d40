//! Check command - startup validation
//!
//! Resolves the revision with a fresh, verbose resolver and reports
//! `revision.E001` when it cannot be determined.

use anyhow::Result;
use clap::Args;
use colored::Colorize;
use config::RevisionSettings;
use revision::{CheckLevel, RevisionResolver, check_resolver};

use crate::{host, output};

#[derive(Args)]
pub struct CheckArgs {
    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

pub fn run(args: CheckArgs, settings: &RevisionSettings) -> Result<()> {
    let resolver = host::with_host_metadata(RevisionResolver::new(settings.clone()).verbose());
    let messages = check_resolver(&resolver);
    let passed = messages.is_empty();

    if args.json {
        let output = serde_json::json!({
            "passed": passed,
            "revision": resolver.revision().ok(),
            "messages": messages,
        });
        println!("{}", serde_json::to_string_pretty(&output)?);
        if !passed {
            std::process::exit(1);
        }
        return Ok(());
    }

    output::header("Revision Check");

    if passed {
        output::success(&format!(
            "Revision {}",
            resolver.revision().unwrap_or_default().cyan()
        ));
        return Ok(());
    }

    for message in &messages {
        let level = match message.level {
            CheckLevel::Error => message.level.as_str().red().bold(),
            CheckLevel::Warning => message.level.as_str().yellow().bold(),
        };
        println!("  {} [{}] {}", level, message.id.dimmed(), message.msg);
        if let Some(hint) = &message.hint {
            output::hint(hint);
        }
    }
    std::process::exit(1);
}
