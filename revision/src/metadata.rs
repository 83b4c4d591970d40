//! Installed package metadata.
//!
//! A host registers the versions it knows about at compile time
//! ([`StaticMetadata`]) and/or points at a lockfile ([`CargoLockMetadata`]).
//! Package names match after normalization: case is ignored and `_` equals `-`.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use errors::RevisionError;
use serde::Deserialize;
use thiserror::Error;
use tracing::trace;

#[derive(Debug, Error)]
pub enum MetadataError {
    #[error("Package not found: {package}")]
    NotFound { package: String },

    #[error("Failed to read package metadata from {path}: {reason}")]
    Unreadable { path: PathBuf, reason: String },
}

impl From<MetadataError> for RevisionError {
    fn from(err: MetadataError) -> Self {
        match err {
            MetadataError::NotFound { package } => RevisionError::PackageNotFound { package },
            MetadataError::Unreadable { .. } => RevisionError::internal(err.to_string()),
        }
    }
}

/// Looks up the installed version of a package.
pub trait PackageMetadata: Send + Sync {
    fn lookup_version(&self, package: &str) -> Result<String, MetadataError>;
}

pub fn normalize_package_name(name: &str) -> String {
    name.trim().to_ascii_lowercase().replace('_', "-")
}

/// Versions registered in memory.
#[derive(Debug, Clone, Default)]
pub struct StaticMetadata {
    versions: HashMap<String, String>,
}

impl StaticMetadata {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_package(mut self, name: &str, version: &str) -> Self {
        self.versions
            .insert(normalize_package_name(name), version.to_string());
        self
    }
}

impl PackageMetadata for StaticMetadata {
    fn lookup_version(&self, package: &str) -> Result<String, MetadataError> {
        self.versions
            .get(&normalize_package_name(package))
            .cloned()
            .ok_or_else(|| MetadataError::NotFound {
                package: package.to_string(),
            })
    }
}

#[derive(Debug, Deserialize)]
struct Lockfile {
    #[serde(default)]
    package: Vec<LockedPackage>,
}

#[derive(Debug, Deserialize)]
struct LockedPackage {
    name: String,
    version: String,
    source: Option<String>,
}

/// Versions recorded in a `Cargo.lock`.
///
/// When a name is locked at several versions, the local (source-less) entry
/// wins, then the first one listed. A missing lockfile knows no packages.
#[derive(Debug, Clone)]
pub struct CargoLockMetadata {
    path: PathBuf,
}

impl CargoLockMetadata {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// `Cargo.lock` inside `dir`.
    pub fn in_dir(dir: &Path) -> Self {
        Self::new(dir.join("Cargo.lock"))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn load(&self) -> Result<Option<Lockfile>, MetadataError> {
        if !self.path.is_file() {
            trace!("No lockfile at {:?}", self.path);
            return Ok(None);
        }
        let unreadable = |reason: String| MetadataError::Unreadable {
            path: self.path.clone(),
            reason,
        };
        let contents = std::fs::read_to_string(&self.path).map_err(|e| unreadable(e.to_string()))?;
        toml::from_str(&contents)
            .map(Some)
            .map_err(|e| unreadable(e.to_string()))
    }
}

impl PackageMetadata for CargoLockMetadata {
    fn lookup_version(&self, package: &str) -> Result<String, MetadataError> {
        let not_found = || MetadataError::NotFound {
            package: package.to_string(),
        };
        let lockfile = self.load()?.ok_or_else(not_found)?;
        let wanted = normalize_package_name(package);

        let mut matches = lockfile
            .package
            .into_iter()
            .filter(|locked| normalize_package_name(&locked.name) == wanted)
            .collect::<Vec<_>>();
        let local = matches.iter().position(|locked| locked.source.is_none());
        match local {
            Some(index) => Ok(matches.swap_remove(index).version),
            None => matches
                .into_iter()
                .next()
                .map(|locked| locked.version)
                .ok_or_else(not_found),
        }
    }
}

/// Consults several metadata sources in order.
///
/// The first version found wins. If none is found, the first non-`NotFound`
/// error is reported, else `NotFound`.
#[derive(Clone, Default)]
pub struct ChainedMetadata {
    sources: Vec<Arc<dyn PackageMetadata>>,
}

impl ChainedMetadata {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_source(mut self, source: Arc<dyn PackageMetadata>) -> Self {
        self.sources.push(source);
        self
    }

    pub fn len(&self) -> usize {
        self.sources.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sources.is_empty()
    }
}

impl std::fmt::Debug for ChainedMetadata {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChainedMetadata")
            .field("sources", &self.sources.len())
            .finish()
    }
}

impl PackageMetadata for ChainedMetadata {
    fn lookup_version(&self, package: &str) -> Result<String, MetadataError> {
        let mut failure = None;
        for source in &self.sources {
            match source.lookup_version(package) {
                Ok(version) => return Ok(version),
                Err(MetadataError::NotFound { .. }) => {}
                Err(e) => {
                    failure.get_or_insert(e);
                }
            }
        }
        Err(failure.unwrap_or_else(|| MetadataError::NotFound {
            package: package.to_string(),
        }))
    }
}
