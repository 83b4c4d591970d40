//! # Revision Errors
//!
//! Error taxonomy for build revision discovery.
//!
//! Every discovery failure maps to exactly one named kind so that callers
//! (a startup check, a record writer, a CLI) can decide whether the failure
//! is fatal or cosmetic:
//! - `GitDirNotFound`: the configured working directory does not exist
//! - `Git`: the directory exists but is not a repository, or git failed
//! - `PackageNotFound`: the package metadata source has no such package
//! - `Toml`: a project file is malformed or lacks a version field
//! - `Exhausted` / `Internal`: generic revision failures

use serde::Serialize;
use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

/// Revision discovery errors
#[derive(Debug, Error)]
pub enum RevisionError {
    #[error(
        "Unable to determine the revision number. Invalid git directory or base directory. Got \
         {path}."
    )]
    GitDirNotFound { path: PathBuf },

    #[error(
        "Unable to determine the revision number. {path} is not a usable git repository: \
         {reason}. Check the folder or set ignore_working_dir=true."
    )]
    Git { path: PathBuf, reason: String },

    #[error("Package not found in metadata: {package}")]
    PackageNotFound { package: String },

    #[error("Invalid project file {path}: {reason}")]
    Toml { path: PathBuf, reason: String },

    #[error("Unable to determine the revision number. {}", render_attempts(.attempts))]
    Exhausted { attempts: Vec<SourceAttempt> },

    #[error("Revision error: {reason}")]
    Internal { reason: String },
}

/// Coarse classification of a [`RevisionError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RevisionErrorKind {
    GitDir,
    Git,
    PackageNotFound,
    Toml,
    Revision,
}

impl RevisionErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            RevisionErrorKind::GitDir => "git_dir",
            RevisionErrorKind::Git => "git",
            RevisionErrorKind::PackageNotFound => "package_not_found",
            RevisionErrorKind::Toml => "toml",
            RevisionErrorKind::Revision => "revision",
        }
    }
}

impl RevisionError {
    pub fn kind(&self) -> RevisionErrorKind {
        match self {
            RevisionError::GitDirNotFound { .. } => RevisionErrorKind::GitDir,
            RevisionError::Git { .. } => RevisionErrorKind::Git,
            RevisionError::PackageNotFound { .. } => RevisionErrorKind::PackageNotFound,
            RevisionError::Toml { .. } => RevisionErrorKind::Toml,
            RevisionError::Exhausted { .. } | RevisionError::Internal { .. } => {
                RevisionErrorKind::Revision
            }
        }
    }

    pub fn internal(reason: impl Into<String>) -> Self {
        RevisionError::Internal {
            reason: reason.into(),
        }
    }

    /// Attempts recorded before giving up, empty for every other kind.
    pub fn attempts(&self) -> &[SourceAttempt] {
        match self {
            RevisionError::Exhausted { attempts } => attempts,
            _ => &[],
        }
    }
}

/// A discovery source consulted while resolving a revision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceKind {
    WorkingDir,
    PackageMetadata,
    ProjectFile,
    VersionFile,
    Settings,
}

impl fmt::Display for SourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SourceKind::WorkingDir => write!(f, "working directory"),
            SourceKind::PackageMetadata => write!(f, "package metadata"),
            SourceKind::ProjectFile => write!(f, "project file"),
            SourceKind::VersionFile => write!(f, "VERSION file"),
            SourceKind::Settings => write!(f, "settings override"),
        }
    }
}

/// Why a discovery source did not produce a revision.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum AttemptOutcome {
    /// Turned off by its ignore flag.
    Disabled,

    /// Missing an input it needs (e.g. no application name).
    NotConfigured { detail: String },

    /// Nothing to read at the expected location.
    NotFound { detail: String },

    /// Present but empty.
    Empty { detail: String },

    /// Present but unusable.
    Failed { reason: String },
}

impl fmt::Display for AttemptOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AttemptOutcome::Disabled => write!(f, "disabled by settings"),
            AttemptOutcome::NotConfigured { detail } => write!(f, "not configured ({detail})"),
            AttemptOutcome::NotFound { detail } => write!(f, "not found ({detail})"),
            AttemptOutcome::Empty { detail } => write!(f, "empty ({detail})"),
            AttemptOutcome::Failed { reason } => write!(f, "failed ({reason})"),
        }
    }
}

/// One entry of the diagnostic trail carried by [`RevisionError::Exhausted`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SourceAttempt {
    pub source: SourceKind,
    #[serde(flatten)]
    pub outcome: AttemptOutcome,
}

impl SourceAttempt {
    pub fn new(source: SourceKind, outcome: AttemptOutcome) -> Self {
        Self { source, outcome }
    }
}

impl fmt::Display for SourceAttempt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.source, self.outcome)
    }
}

fn render_attempts(attempts: &[SourceAttempt]) -> String {
    if attempts.is_empty() {
        return "No discovery source was consulted.".to_string();
    }
    attempts
        .iter()
        .enumerate()
        .map(|(i, attempt)| format!("{}. {attempt}.", i + 1))
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_mapping() {
        let err = RevisionError::GitDirNotFound {
            path: PathBuf::from("/nope"),
        };
        assert_eq!(err.kind(), RevisionErrorKind::GitDir);

        let err = RevisionError::Git {
            path: PathBuf::from("/tmp"),
            reason: "not a repository".to_string(),
        };
        assert_eq!(err.kind(), RevisionErrorKind::Git);

        let err = RevisionError::PackageNotFound {
            package: "app".to_string(),
        };
        assert_eq!(err.kind(), RevisionErrorKind::PackageNotFound);

        assert_eq!(
            RevisionError::Exhausted { attempts: vec![] }.kind(),
            RevisionErrorKind::Revision
        );
        assert_eq!(
            RevisionError::internal("boom").kind(),
            RevisionErrorKind::Revision
        );
    }

    #[test]
    fn test_exhausted_message_enumerates_attempts() {
        let err = RevisionError::Exhausted {
            attempts: vec![
                SourceAttempt::new(SourceKind::WorkingDir, AttemptOutcome::Disabled),
                SourceAttempt::new(
                    SourceKind::PackageMetadata,
                    AttemptOutcome::NotFound {
                        detail: "package `shop`".to_string(),
                    },
                ),
                SourceAttempt::new(
                    SourceKind::ProjectFile,
                    AttemptOutcome::NotFound {
                        detail: "no pyproject.toml or Cargo.toml in /srv".to_string(),
                    },
                ),
                SourceAttempt::new(
                    SourceKind::Settings,
                    AttemptOutcome::NotConfigured {
                        detail: "revision is not set".to_string(),
                    },
                ),
            ],
        };

        let message = err.to_string();
        assert!(message.starts_with("Unable to determine the revision number."));
        assert!(message.contains("1. working directory: disabled by settings."));
        assert!(message.contains("2. package metadata: not found (package `shop`)."));
        assert!(message.contains("3. project file: not found"));
        assert!(message.contains("4. settings override: not configured"));
        assert_eq!(err.attempts().len(), 4);
    }

    #[test]
    fn test_exhausted_without_attempts() {
        let err = RevisionError::Exhausted { attempts: vec![] };
        assert!(err.to_string().contains("No discovery source was consulted"));
    }

    #[test]
    fn test_attempt_serializes_flat() {
        let attempt = SourceAttempt::new(
            SourceKind::VersionFile,
            AttemptOutcome::Empty {
                detail: "/srv/VERSION".to_string(),
            },
        );
        let json = serde_json::to_value(&attempt).unwrap();
        assert_eq!(json["source"], "version_file");
        assert_eq!(json["outcome"], "empty");
        assert_eq!(json["detail"], "/srv/VERSION");
    }
}
