use errors::SourceKind;
use serde::Serialize;
use std::path::PathBuf;

/// Placeholder used for the branch (and tag fallback) when HEAD is detached.
pub const DETACHED: &str = "detached";

/// Where a resolved revision came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RevisionSource {
    Git,
    PackageMetadata(String),
    ProjectFile(PathBuf),
    VersionFile(PathBuf),
    Settings,
}

impl std::fmt::Display for RevisionSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RevisionSource::Git => write!(f, "git"),
            RevisionSource::PackageMetadata(name) => write!(f, "metadata:{name}"),
            RevisionSource::ProjectFile(path) => write!(f, "project-file:{}", path.display()),
            RevisionSource::VersionFile(path) => write!(f, "version-file:{}", path.display()),
            RevisionSource::Settings => write!(f, "settings"),
        }
    }
}

impl RevisionSource {
    pub fn kind(&self) -> SourceKind {
        match self {
            RevisionSource::Git => SourceKind::WorkingDir,
            RevisionSource::PackageMetadata(_) => SourceKind::PackageMetadata,
            RevisionSource::ProjectFile(_) => SourceKind::ProjectFile,
            RevisionSource::VersionFile(_) => SourceKind::VersionFile,
            RevisionSource::Settings => SourceKind::Settings,
        }
    }
}

impl Serialize for RevisionSource {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// The revision string together with the source that produced it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResolvedRevision {
    pub value: String,
    pub source: RevisionSource,
}

impl ResolvedRevision {
    pub fn new(value: impl Into<String>, source: RevisionSource) -> Self {
        Self {
            value: value.into(),
            source,
        }
    }

    pub fn explain(&self) -> Vec<(String, String, String)> {
        vec![(
            "revision".to_string(),
            self.value.clone(),
            self.source.to_string(),
        )]
    }
}

/// Everything a host needs to display or record the running build.
///
/// `tag`, `branch` and `commit` are `None` when the working directory cannot
/// be read as a repository.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RevisionSummary {
    pub revision: String,
    pub source: RevisionSource,
    pub tag: Option<String>,
    pub branch: Option<String>,
    pub commit: Option<String>,
}

impl RevisionSummary {
    /// The tag, or the revision when no tag is available.
    pub fn display_tag(&self) -> &str {
        self.tag
            .as_deref()
            .filter(|tag| !tag.is_empty())
            .unwrap_or(&self.revision)
    }

    /// Value exposed to page renderers: tag, else commit, else revision.
    pub fn context_value(&self) -> &str {
        self.tag
            .as_deref()
            .filter(|tag| !tag.is_empty())
            .or_else(|| self.commit.as_deref().filter(|commit| !commit.is_empty()))
            .unwrap_or(&self.revision)
    }

    /// Fetch a single field by name: `revision`, `tag`, `branch` or `commit`.
    pub fn field(&self, name: &str) -> Option<&str> {
        match name {
            "revision" => Some(&self.revision),
            "tag" => self.tag.as_deref(),
            "branch" => self.branch.as_deref(),
            "commit" => self.commit.as_deref(),
            _ => None,
        }
    }
}
