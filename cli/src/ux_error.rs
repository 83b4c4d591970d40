use colored::Colorize;
use errors::{RevisionError, RevisionErrorKind};
use std::io::{self, Write};

#[derive(Debug)]
pub struct UxError {
    pub what: String,
    pub why: Option<String>,
    pub how_to_fix: Vec<String>,
    pub suggested_command: Option<String>,
}

impl UxError {
    pub fn new(what: impl Into<String>) -> Self {
        Self {
            what: what.into(),
            why: None,
            how_to_fix: Vec::new(),
            suggested_command: None,
        }
    }

    pub fn why(mut self, reason: impl Into<String>) -> Self {
        self.why = Some(reason.into());
        self
    }

    pub fn fix(mut self, suggestion: impl Into<String>) -> Self {
        self.how_to_fix.push(suggestion.into());
        self
    }

    pub fn suggest(mut self, cmd: impl Into<String>) -> Self {
        self.suggested_command = Some(cmd.into());
        self
    }

    /// Print to stderr.
    pub fn display(&self) {
        let stderr = std::io::stderr();
        let _ = self.write_to(&mut stderr.lock());
    }

    pub fn write_to<W: Write>(&self, out: &mut W) -> io::Result<()> {
        writeln!(out)?;
        writeln!(out, "{} {}", "error:".red().bold(), self.what.white().bold())?;
        if let Some(why) = &self.why {
            writeln!(out, "       {}", why.dimmed())?;
        }

        if !self.how_to_fix.is_empty() {
            writeln!(out, "\n{}", "How to fix:".yellow().bold())?;
            for (i, fix) in self.how_to_fix.iter().enumerate() {
                writeln!(out, "  {}. {fix}", i + 1)?;
            }
        }

        if let Some(cmd) = &self.suggested_command {
            writeln!(out, "\n{}\n  $ {}", "Try this:".green().bold(), cmd.cyan())?;
        }
        writeln!(out)
    }
}

impl std::fmt::Display for UxError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.what)
    }
}

impl std::error::Error for UxError {}

/// Map a discovery failure to actionable advice.
pub fn revision_error(err: &RevisionError) -> UxError {
    let base = UxError::new("Unable to determine the application revision").why(err.to_string());
    match err.kind() {
        RevisionErrorKind::GitDir => base
            .fix("Check --base-dir / --git-dir point at an existing directory")
            .fix("Or read the revision from static sources instead")
            .suggest("revision show --ignore-working-dir"),
        RevisionErrorKind::Git => base
            .fix("Run from inside a git working directory with at least one commit")
            .fix("Or read the revision from static sources instead")
            .suggest("revision show --ignore-working-dir"),
        RevisionErrorKind::PackageNotFound => base
            .fix("Check --app-name matches an installed package")
            .suggest("revision explain --ignore-working-dir --ignore-metadata"),
        RevisionErrorKind::Toml => base
            .fix("Fix the version field in pyproject.toml or Cargo.toml")
            .suggest("revision explain --ignore-working-dir --ignore-toml-file"),
        RevisionErrorKind::Revision => base
            .fix("Add a VERSION file to the application root")
            .fix("Or set an explicit revision")
            .suggest("revision show --ignore-working-dir --override 1.0.0"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_ux_error_builder_chain() {
        let err = UxError::new("test error")
            .why("because reasons")
            .fix("try this")
            .fix("or this")
            .suggest("run command");

        assert_eq!(err.what, "test error");
        assert_eq!(err.why, Some("because reasons".to_string()));
        assert_eq!(err.how_to_fix.len(), 2);
        assert_eq!(err.suggested_command, Some("run command".to_string()));
        assert_eq!(err.to_string(), "test error");
    }

    #[test]
    fn test_revision_error_for_git_dir() {
        let err = revision_error(&RevisionError::GitDirNotFound {
            path: PathBuf::from("/nope"),
        });
        assert!(err.why.unwrap().contains("/nope"));
        assert_eq!(
            err.suggested_command.as_deref(),
            Some("revision show --ignore-working-dir")
        );
    }

    #[test]
    fn test_revision_error_for_exhausted() {
        let err = revision_error(&RevisionError::Exhausted { attempts: vec![] });
        assert!(err.how_to_fix.iter().any(|fix| fix.contains("VERSION")));
    }

    #[test]
    fn test_write_to_renders_every_section() {
        colored::control::set_override(false);
        let mut out = Vec::new();
        revision_error(&RevisionError::internal("boom"))
            .write_to(&mut out)
            .unwrap();
        let text = String::from_utf8(out).unwrap();

        assert!(text.contains("error: Unable to determine the application revision"));
        assert!(text.contains("Revision error: boom"));
        assert!(text.contains("1. Add a VERSION file"));
        assert!(text.contains("$ revision show --ignore-working-dir --override 1.0.0"));
    }
}
