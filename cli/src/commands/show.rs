use anyhow::Result;
use clap::{Args, ValueEnum};
use revision::RevisionResolver;

use crate::{output, ux_error};

#[derive(Args)]
pub struct ShowArgs {
    #[arg(long, help = "Output as JSON")]
    pub json: bool,

    #[arg(long, value_enum, help = "Print a single field")]
    pub field: Option<Field>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Field {
    Revision,
    Tag,
    Branch,
    Commit,
}

pub fn run(args: ShowArgs, resolver: &RevisionResolver) -> Result<()> {
    let summary = match resolver.summary() {
        Ok(summary) => summary,
        Err(e) => {
            ux_error::revision_error(&e).display();
            std::process::exit(1);
        }
    };

    if let Some(field) = args.field {
        let value = match field {
            Field::Revision => summary.revision.as_str(),
            Field::Tag => summary.display_tag(),
            Field::Branch => resolver.branch()?,
            Field::Commit => resolver.commit()?,
        };
        println!("{value}");
        return Ok(());
    }

    if args.json {
        let output = serde_json::json!({
            "revision": summary.revision,
            "source": summary.source.to_string(),
            "tag": summary.tag,
            "branch": summary.branch,
            "commit": summary.commit,
            "display_tag": summary.display_tag(),
            "context_value": summary.context_value(),
        });
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(());
    }

    output::header("Revision");
    let source = summary.source.to_string();
    output::field("revision", Some(summary.revision.as_str()), Some(source.as_str()));
    output::field("tag", summary.tag.as_deref(), None);
    output::field("branch", summary.branch.as_deref(), None);
    output::field("commit", summary.commit.as_deref(), None);

    Ok(())
}
