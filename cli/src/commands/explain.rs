use anyhow::Result;
use clap::Args;
use revision::RevisionResolver;

use crate::{output, ux_error};

#[derive(Args)]
pub struct ExplainArgs {
    #[arg(long, help = "Output as JSON")]
    pub json: bool,
}

pub fn run(args: ExplainArgs, resolver: &RevisionResolver) -> Result<()> {
    let rows = match resolver.explain() {
        Ok(rows) => rows,
        Err(e) => {
            if args.json {
                let output = serde_json::json!({
                    "error": e.to_string(),
                    "kind": e.kind(),
                    "attempts": e.attempts(),
                });
                println!("{}", serde_json::to_string_pretty(&output)?);
            } else {
                ux_error::revision_error(&e).display();
                output::attempts(e.attempts());
            }
            std::process::exit(1);
        }
    };

    if args.json {
        let output: Vec<_> = rows
            .into_iter()
            .map(|(name, value, source)| {
                serde_json::json!({
                    "name": name,
                    "value": value,
                    "source": source,
                })
            })
            .collect();
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(());
    }

    output::header("Resolved Revision");
    for (name, value, source) in &rows {
        output::field(name, Some(value.as_str()), Some(source.as_str()));
    }

    if resolver.settings().ignore_working_dir {
        println!();
        output::hint("working directory discovery is disabled; tag, branch and commit are informational");
    }

    Ok(())
}
