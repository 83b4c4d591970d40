//! Build revision discovery.
//!
//! When the working directory is consulted it is the only source: the
//! revision is `tag:branch:commit` (empty parts omitted) truncated to
//! `max_length` characters. Otherwise the first non-empty value wins among:
//! 1. Package metadata for `app_name`
//! 2. Project file (`pyproject.toml` / `Cargo.toml`) in `toml_dir`
//! 3. `VERSION` file in `base_dir`
//! 4. The `revision` settings override

use std::path::PathBuf;
use std::sync::{Arc, OnceLock};

use config::RevisionSettings;
use errors::{AttemptOutcome, RevisionError, SourceAttempt, SourceKind};
use parking_lot::Mutex;
use tracing::{debug, trace, warn};

use crate::metadata::{CargoLockMetadata, ChainedMetadata, MetadataError, PackageMetadata};
use crate::sources::{read_project_version, read_version_file};
use crate::types::{DETACHED, ResolvedRevision, RevisionSource, RevisionSummary};
use crate::vcs::{Git2Backend, RepositoryState, VcsBackend, VcsError, VcsRepository};

/// Resolves and memoizes the running build's revision.
///
/// Every accessor computes its value at most once per resolver; later calls
/// return the cached value even if the repository or files change. Failures
/// are not cached.
///
/// # Example
///
/// ```rust,no_run
/// use revision::RevisionResolver;
///
/// fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let resolver = RevisionResolver::from_dir("/srv/app");
///     println!("{} (from {})", resolver.revision()?, resolver.resolved()?.source);
///     Ok(())
/// }
/// ```
pub struct RevisionResolver {
    settings: RevisionSettings,
    vcs: Arc<dyn VcsBackend>,
    metadata: Arc<dyn PackageMetadata>,
    repository: Mutex<Option<Box<dyn VcsRepository>>>,
    resolved: OnceLock<ResolvedRevision>,
    tag: OnceLock<String>,
    branch: OnceLock<String>,
    commit: OnceLock<String>,
}

impl std::fmt::Debug for RevisionResolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RevisionResolver")
            .field("settings", &self.settings)
            .field("resolved", &self.resolved.get())
            .finish_non_exhaustive()
    }
}

fn memoize(
    cell: &OnceLock<String>,
    compute: impl FnOnce() -> Result<String, RevisionError>,
) -> Result<&str, RevisionError> {
    if let Some(value) = cell.get() {
        return Ok(value);
    }
    let value = compute()?;
    Ok(cell.get_or_init(|| value))
}

fn truncate_chars(value: &str, max_length: usize) -> String {
    value.chars().take(max_length).collect()
}

impl RevisionResolver {
    /// Resolver over `settings`, backed by libgit2 and the `Cargo.lock` in
    /// the project file directory.
    #[must_use]
    pub fn new(settings: RevisionSettings) -> Self {
        let metadata = ChainedMetadata::new()
            .with_source(Arc::new(CargoLockMetadata::in_dir(settings.toml_dir())));
        Self {
            settings,
            vcs: Arc::new(Git2Backend),
            metadata: Arc::new(metadata),
            repository: Mutex::new(None),
            resolved: OnceLock::new(),
            tag: OnceLock::new(),
            branch: OnceLock::new(),
            commit: OnceLock::new(),
        }
    }

    /// Resolver with default settings rooted at `dir`.
    #[must_use]
    pub fn from_dir(dir: impl Into<PathBuf>) -> Self {
        Self::new(RevisionSettings::for_dir(dir))
    }

    /// Explicit revision, consulted after every other source.
    #[must_use]
    pub fn with_override(mut self, revision: &str) -> Self {
        self.settings.revision = Some(revision.to_string());
        self
    }

    #[must_use]
    pub fn with_app_name(mut self, app_name: &str) -> Self {
        self.settings.app_name = Some(app_name.to_string());
        self
    }

    #[must_use]
    pub fn with_max_length(mut self, max_length: usize) -> Self {
        self.settings.max_length = max_length;
        self
    }

    #[must_use]
    pub fn skip_working_dir(mut self) -> Self {
        self.settings.ignore_working_dir = true;
        self
    }

    #[must_use]
    pub fn skip_metadata(mut self) -> Self {
        self.settings.ignore_metadata = true;
        self
    }

    #[must_use]
    pub fn skip_toml_file(mut self) -> Self {
        self.settings.ignore_toml_file = true;
        self
    }

    #[must_use]
    pub fn skip_version_file(mut self) -> Self {
        self.settings.ignore_version_file = true;
        self
    }

    /// Log the selected source at warn level instead of debug.
    #[must_use]
    pub fn verbose(mut self) -> Self {
        self.settings.verbose = true;
        self
    }

    #[must_use]
    pub fn with_vcs_backend(mut self, backend: Arc<dyn VcsBackend>) -> Self {
        self.vcs = backend;
        self
    }

    #[must_use]
    pub fn with_package_metadata(mut self, metadata: Arc<dyn PackageMetadata>) -> Self {
        self.metadata = metadata;
        self
    }

    pub fn settings(&self) -> &RevisionSettings {
        &self.settings
    }

    /// The revision string.
    ///
    /// # Errors
    ///
    /// See [`RevisionResolver::resolved`].
    pub fn revision(&self) -> Result<&str, RevisionError> {
        self.resolved().map(|resolved| resolved.value.as_str())
    }

    /// The revision and the source that produced it.
    ///
    /// # Errors
    ///
    /// With working-directory discovery enabled, fails with
    /// [`RevisionError::GitDirNotFound`] or [`RevisionError::Git`] when the
    /// directory is missing or not a repository. Otherwise fails with
    /// [`RevisionError::Exhausted`] when no source yields a value.
    pub fn resolved(&self) -> Result<&ResolvedRevision, RevisionError> {
        if let Some(resolved) = self.resolved.get() {
            return Ok(resolved);
        }
        let resolved = self.resolve_uncached()?;
        Ok(self.resolved.get_or_init(|| resolved))
    }

    /// Nearest tag description, falling back to the branch tip commit, or
    /// `detached` when HEAD is detached and no tag describes it.
    pub fn tag(&self) -> Result<&str, RevisionError> {
        memoize(&self.tag, || {
            self.with_repository(|repo| match repo.describe_tag() {
                Ok(tag) => Ok(tag),
                Err(VcsError::NoTags) => {
                    trace!("No tags found, falling back to the branch commit");
                    match repo.branch_commit() {
                        Ok(commit) => Ok(commit),
                        Err(VcsError::Detached) => Ok(DETACHED.to_string()),
                        Err(e) => Err(RevisionError::internal(e.to_string())),
                    }
                }
                Err(e) => Err(self.git_error(&e)),
            })
        })
    }

    /// Active branch name, or `detached`.
    pub fn branch(&self) -> Result<&str, RevisionError> {
        memoize(&self.branch, || {
            self.with_repository(|repo| match repo.active_branch() {
                Ok(branch) => Ok(branch),
                Err(VcsError::Detached) => Ok(DETACHED.to_string()),
                Err(e) => Err(self.git_error(&e)),
            })
        })
    }

    /// Full commit id of the branch tip, or of HEAD when detached.
    pub fn commit(&self) -> Result<&str, RevisionError> {
        memoize(&self.commit, || {
            self.with_repository(|repo| match repo.branch_commit() {
                Ok(commit) => Ok(commit),
                Err(VcsError::Detached) => repo.head_commit().map_err(|e| self.git_error(&e)),
                Err(e) => Err(self.git_error(&e)),
            })
        })
    }

    /// Revision plus whichever repository fields are available.
    pub fn summary(&self) -> Result<RevisionSummary, RevisionError> {
        let resolved = self.resolved()?;
        Ok(RevisionSummary {
            revision: resolved.value.clone(),
            source: resolved.source.clone(),
            tag: self.tag().ok().map(str::to_string),
            branch: self.branch().ok().map(str::to_string),
            commit: self.commit().ok().map(str::to_string),
        })
    }

    /// `(field, value, source)` rows for the revision and every repository
    /// field that could be read.
    pub fn explain(&self) -> Result<Vec<(String, String, String)>, RevisionError> {
        let mut rows = self.resolved()?.explain();
        let fields: [(&str, fn(&Self) -> Result<&str, RevisionError>); 3] = [
            ("tag", Self::tag),
            ("branch", Self::branch),
            ("commit", Self::commit),
        ];
        for (name, accessor) in fields {
            match accessor(self) {
                Ok(value) => rows.push((name.to_string(), value.to_string(), "git".to_string())),
                Err(e) => trace!("{} unavailable: {}", name, e),
            }
        }
        Ok(rows)
    }

    fn resolve_uncached(&self) -> Result<ResolvedRevision, RevisionError> {
        debug!(
            "Resolving revision for {:?} (working dir {:?})",
            self.settings.base_dir,
            self.settings.git_dir()
        );

        if !self.settings.ignore_working_dir {
            let value = self.revision_from_working_dir()?;
            let resolved = ResolvedRevision::new(value, RevisionSource::Git);
            self.announce(&resolved);
            return Ok(resolved);
        }

        let mut attempts = vec![SourceAttempt::new(
            SourceKind::WorkingDir,
            AttemptOutcome::Disabled,
        )];

        let probes: [(SourceKind, fn(&Self) -> Result<ResolvedRevision, AttemptOutcome>); 4] = [
            (SourceKind::PackageMetadata, Self::from_metadata),
            (SourceKind::ProjectFile, Self::from_project_file),
            (SourceKind::VersionFile, Self::from_version_file),
            (SourceKind::Settings, Self::from_settings),
        ];

        for (kind, probe) in probes {
            match probe(self) {
                Ok(resolved) => {
                    self.announce(&resolved);
                    return Ok(resolved);
                }
                Err(outcome) => {
                    trace!("Skipping {}: {}", kind, outcome);
                    attempts.push(SourceAttempt::new(kind, outcome));
                }
            }
        }

        Err(RevisionError::Exhausted { attempts })
    }

    fn revision_from_working_dir(&self) -> Result<String, RevisionError> {
        if self.settings.max_length == 0 {
            return Err(RevisionError::internal("max_length must be at least 1"));
        }
        let parts = [self.tag()?, self.branch()?, self.commit()?];
        let joined = parts
            .iter()
            .filter(|part| !part.is_empty())
            .copied()
            .collect::<Vec<_>>()
            .join(":");
        let revision = truncate_chars(&joined, self.settings.max_length);
        if revision.is_empty() {
            return Err(RevisionError::internal(format!(
                "the repository at {} yielded an empty revision",
                self.settings.git_dir().display()
            )));
        }
        Ok(revision)
    }

    fn from_metadata(&self) -> Result<ResolvedRevision, AttemptOutcome> {
        if self.settings.ignore_metadata {
            return Err(AttemptOutcome::Disabled);
        }
        let Some(app_name) = self.settings.app_name.as_deref() else {
            return Err(AttemptOutcome::NotConfigured {
                detail: "app_name is not set".to_string(),
            });
        };

        match self.metadata.lookup_version(app_name) {
            Ok(version) if version.is_empty() => Err(AttemptOutcome::Empty {
                detail: format!("package `{app_name}`"),
            }),
            Ok(version) => Ok(ResolvedRevision::new(
                version,
                RevisionSource::PackageMetadata(app_name.to_string()),
            )),
            Err(e @ MetadataError::NotFound { .. }) => {
                let err = RevisionError::from(e);
                warn!("{}, trying the next source", err);
                Err(AttemptOutcome::NotFound {
                    detail: err.to_string(),
                })
            }
            Err(e) => Err(AttemptOutcome::Failed {
                reason: RevisionError::from(e).to_string(),
            }),
        }
    }

    fn from_project_file(&self) -> Result<ResolvedRevision, AttemptOutcome> {
        if self.settings.ignore_toml_file {
            return Err(AttemptOutcome::Disabled);
        }
        let dir = self.settings.toml_dir();

        match read_project_version(dir) {
            Ok(Some(found)) if found.value.is_empty() => Err(AttemptOutcome::Empty {
                detail: found.path.display().to_string(),
            }),
            Ok(Some(found)) => Ok(ResolvedRevision::new(
                found.value,
                RevisionSource::ProjectFile(found.path),
            )),
            Ok(None) => Err(AttemptOutcome::NotFound {
                detail: format!("no pyproject.toml or Cargo.toml in {}", dir.display()),
            }),
            Err(e) => {
                warn!("Ignoring project file: {}", e);
                Err(AttemptOutcome::Failed {
                    reason: e.to_string(),
                })
            }
        }
    }

    fn from_version_file(&self) -> Result<ResolvedRevision, AttemptOutcome> {
        if self.settings.ignore_version_file {
            return Err(AttemptOutcome::Disabled);
        }
        let dir = self.settings.version_file_dir();

        match read_version_file(dir) {
            Ok(Some(found)) if found.value.is_empty() => Err(AttemptOutcome::Empty {
                detail: found.path.display().to_string(),
            }),
            Ok(Some(found)) => Ok(ResolvedRevision::new(
                found.value,
                RevisionSource::VersionFile(found.path),
            )),
            Ok(None) => Err(AttemptOutcome::NotFound {
                detail: format!("no VERSION file in {}", dir.display()),
            }),
            Err(e) => Err(AttemptOutcome::Failed {
                reason: e.to_string(),
            }),
        }
    }

    fn from_settings(&self) -> Result<ResolvedRevision, AttemptOutcome> {
        match self.settings.revision.as_deref() {
            Some(revision) if !revision.is_empty() => {
                Ok(ResolvedRevision::new(revision, RevisionSource::Settings))
            }
            Some(_) => Err(AttemptOutcome::Empty {
                detail: "revision".to_string(),
            }),
            None => Err(AttemptOutcome::NotConfigured {
                detail: "revision is not set".to_string(),
            }),
        }
    }

    fn announce(&self, resolved: &ResolvedRevision) {
        match resolved.source {
            RevisionSource::Settings => warn!(
                "Getting revision number from the settings override ({}). This is not recommended.",
                resolved.value
            ),
            _ if self.settings.verbose => warn!(
                "Getting revision number from {} ({})",
                resolved.source, resolved.value
            ),
            _ => debug!(
                "Getting revision number from {} ({})",
                resolved.source, resolved.value
            ),
        }
    }

    fn with_repository<T>(
        &self,
        query: impl FnOnce(&dyn VcsRepository) -> Result<T, RevisionError>,
    ) -> Result<T, RevisionError> {
        let mut guard = self.repository.lock();
        let repo = match guard.take() {
            Some(repo) => repo,
            // Only an opened repository is kept; an unavailable one is retried.
            None => match RepositoryState::open(self.vcs.as_ref(), self.settings.git_dir()) {
                RepositoryState::Git(repo) => repo,
                RepositoryState::Unavailable(reason) => return Err(reason.to_error()),
            }
        };
        query(guard.insert(repo).as_ref())
    }

    fn git_error(&self, err: &VcsError) -> RevisionError {
        RevisionError::Git {
            path: self.settings.git_dir().to_path_buf(),
            reason: err.to_string(),
        }
    }
}
