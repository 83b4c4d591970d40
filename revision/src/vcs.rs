//! Version control capability.
//!
//! The resolver talks to a repository only through [`VcsBackend`] and
//! [`VcsRepository`]; [`Git2Backend`] is the production implementation.

use std::fmt;
use std::path::{Path, PathBuf};

use errors::RevisionError;
use git2::{DescribeFormatOptions, DescribeOptions, ErrorClass, ErrorCode, Repository};
use thiserror::Error;
use tracing::trace;

/// Version control failures, as seen by the resolver.
#[derive(Debug, Error)]
pub enum VcsError {
    #[error("{path} is not a git repository: {reason}")]
    NotARepository { path: PathBuf, reason: String },

    #[error("No tags can describe the current commit")]
    NoTags,

    #[error("HEAD is a detached symbolic reference")]
    Detached,

    #[error("Git error: {0}")]
    Backend(#[from] git2::Error),
}

/// Opens repositories.
pub trait VcsBackend: Send + Sync {
    /// Open the repository whose working directory is exactly `path`.
    fn open(&self, path: &Path) -> Result<Box<dyn VcsRepository>, VcsError>;
}

/// Read-only queries against an open repository.
pub trait VcsRepository: Send {
    /// Nearest tag description, like `git describe --tags`.
    fn describe_tag(&self) -> Result<String, VcsError>;

    /// Name of the checked-out branch; [`VcsError::Detached`] otherwise.
    fn active_branch(&self) -> Result<String, VcsError>;

    /// Commit at the tip of the checked-out branch; [`VcsError::Detached`]
    /// otherwise.
    fn branch_commit(&self) -> Result<String, VcsError>;

    /// Commit HEAD points at, attached or not.
    fn head_commit(&self) -> Result<String, VcsError>;
}

/// [`VcsBackend`] backed by libgit2.
#[derive(Debug, Clone, Copy, Default)]
pub struct Git2Backend;

impl VcsBackend for Git2Backend {
    fn open(&self, path: &Path) -> Result<Box<dyn VcsRepository>, VcsError> {
        match Repository::open(path) {
            Ok(repo) => {
                trace!("Opened git repository at {:?}", path);
                Ok(Box::new(Git2Repository { repo }))
            }
            Err(e) if e.code() == ErrorCode::NotFound => Err(VcsError::NotARepository {
                path: path.to_path_buf(),
                reason: e.message().to_string(),
            }),
            Err(e) => Err(VcsError::Backend(e)),
        }
    }
}

/// An open libgit2 repository.
pub struct Git2Repository {
    repo: Repository,
}

impl Git2Repository {
    pub fn new(repo: Repository) -> Self {
        Self { repo }
    }
}

impl fmt::Debug for Git2Repository {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Git2Repository")
            .field("path", &self.repo.path())
            .finish()
    }
}

impl VcsRepository for Git2Repository {
    fn describe_tag(&self) -> Result<String, VcsError> {
        let mut options = DescribeOptions::new();
        options.describe_tags();

        let describe = self.repo.describe(&options).map_err(|e| {
            if e.code() == ErrorCode::NotFound || e.class() == ErrorClass::Describe {
                VcsError::NoTags
            } else {
                VcsError::Backend(e)
            }
        })?;

        Ok(describe.format(Some(&DescribeFormatOptions::new()))?)
    }

    fn active_branch(&self) -> Result<String, VcsError> {
        if self.repo.head_detached()? {
            return Err(VcsError::Detached);
        }
        let head = self.repo.head()?;
        head.shorthand()
            .map(str::to_string)
            .ok_or_else(|| git2::Error::from_str("branch name is not valid UTF-8").into())
    }

    fn branch_commit(&self) -> Result<String, VcsError> {
        if self.repo.head_detached()? {
            return Err(VcsError::Detached);
        }
        Ok(self.repo.head()?.peel_to_commit()?.id().to_string())
    }

    fn head_commit(&self) -> Result<String, VcsError> {
        Ok(self.repo.head()?.peel_to_commit()?.id().to_string())
    }
}

/// Why no repository handle could be obtained.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UnavailableReason {
    /// The configured directory does not exist.
    MissingDirectory(PathBuf),

    /// The directory exists but could not be opened as a repository.
    NotARepository { path: PathBuf, reason: String },
}

impl UnavailableReason {
    pub fn to_error(&self) -> RevisionError {
        match self {
            UnavailableReason::MissingDirectory(path) => {
                RevisionError::GitDirNotFound { path: path.clone() }
            }
            UnavailableReason::NotARepository { path, reason } => RevisionError::Git {
                path: path.clone(),
                reason: reason.clone(),
            },
        }
    }
}

/// Outcome of opening the configured working directory. A resolver keeps the
/// `Git` handle and reopens after `Unavailable`.
pub enum RepositoryState {
    Git(Box<dyn VcsRepository>),
    Unavailable(UnavailableReason),
}

impl RepositoryState {
    /// Open `path` through `backend`, never failing: problems are captured as
    /// [`RepositoryState::Unavailable`].
    pub fn open(backend: &dyn VcsBackend, path: &Path) -> Self {
        if !path.exists() {
            return RepositoryState::Unavailable(UnavailableReason::MissingDirectory(
                path.to_path_buf(),
            ));
        }
        match backend.open(path) {
            Ok(repo) => RepositoryState::Git(repo),
            Err(VcsError::NotARepository { path, reason }) => {
                RepositoryState::Unavailable(UnavailableReason::NotARepository { path, reason })
            }
            Err(e) => RepositoryState::Unavailable(UnavailableReason::NotARepository {
                path: path.to_path_buf(),
                reason: e.to_string(),
            }),
        }
    }

    pub fn is_available(&self) -> bool {
        matches!(self, RepositoryState::Git(_))
    }
}

impl fmt::Debug for RepositoryState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RepositoryState::Git(_) => write!(f, "Git(..)"),
            RepositoryState::Unavailable(reason) => {
                f.debug_tuple("Unavailable").field(reason).finish()
            }
        }
    }
}
