use colored::Colorize;
use errors::SourceAttempt;

pub fn header(title: &str) {
    println!("{}", title.bold().underline());
    println!();
}

pub fn hint(msg: &str) {
    println!("{} {}", "hint:".cyan().bold(), msg.dimmed());
}

pub fn success(msg: &str) {
    println!("{} {}", "✓".green().bold(), msg);
}

/// One `name: value (source)` line; a missing value prints as `unavailable`.
pub fn field(name: &str, value: Option<&str>, source: Option<&str>) {
    let label = format!("{name}:");
    let value = value.map_or_else(|| "unavailable".dimmed(), |value| value.cyan());
    match source {
        Some(source) => println!("  {label:<10} {value} {}", format!("({source})").dimmed()),
        None => println!("  {label:<10} {value}"),
    }
}

/// Numbered trail of the sources consulted before giving up.
pub fn attempts(attempts: &[SourceAttempt]) {
    if attempts.is_empty() {
        return;
    }
    eprintln!("{}", "Sources consulted:".bold());
    for (i, attempt) in attempts.iter().enumerate() {
        eprintln!(
            "  {}. {:<18} {}",
            i + 1,
            format!("{}:", attempt.source),
            attempt.outcome.to_string().dimmed()
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use errors::{AttemptOutcome, SourceKind};

    #[test]
    fn test_header_does_not_panic() {
        header("Test Header");
    }

    #[test]
    fn test_field_does_not_panic() {
        field("tag", Some("0.0.2"), Some("git"));
        field("commit", None, None);
    }

    #[test]
    fn test_attempts_does_not_panic() {
        attempts(&[]);
        attempts(&[SourceAttempt::new(
            SourceKind::VersionFile,
            AttemptOutcome::NotFound {
                detail: "no VERSION file in /srv".to_string(),
            },
        )]);
    }

    #[test]
    fn test_hint_and_success_do_not_panic() {
        hint("This is a hint");
        success("This is success");
    }
}
