//! # Revision Settings
//!
//! Configuration inputs for revision discovery.
//!
//! All structures:
//! - Use `serde` for serialization/deserialization
//! - Use `validator` for input validation

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use validator::Validate;

/// Default truncation bound for a composed `tag:branch:commit` revision.
pub const DEFAULT_MAX_LENGTH: usize = 75;

/// Settings that drive revision discovery.
///
/// # M-CANONICAL-DOCS
///
/// ## Purpose
/// Supplies the working directory, the explicit override, the application
/// name, the per-source disable flags and the output bound consumed by the
/// revision resolver.
///
/// ## Usage
/// ```rust,no_run
/// use config::RevisionSettings;
///
/// let settings = RevisionSettings {
///     ignore_working_dir: true,
///     app_name: Some("shop".to_string()),
///     ..RevisionSettings::default()
/// };
/// assert_eq!(settings.git_dir(), settings.base_dir.as_path());
/// ```
///
/// ## Fields
/// - `base_dir`: Application root; VERSION file location (default: ".")
/// - `git_dir`: Repository working directory (default: `base_dir`)
/// - `toml_dir`: Directory holding the project file (default: `base_dir`)
/// - `app_name`: Package name queried in package metadata
/// - `revision`: Explicit override, consulted last
/// - `max_length`: Truncation bound (default: 75)
/// - `ignore_*`: Per-source disable flags (default: false)
/// - `verbose`: Log which source produced the revision (default: false)
/// - `autodiscover`: Construct the site resolver at startup (default: true)
#[derive(Debug, Clone, Serialize, Deserialize, Validate, PartialEq)]
pub struct RevisionSettings {
    /// Application root directory
    #[serde(default = "default_base_dir")]
    pub base_dir: PathBuf,

    /// Git working directory, falls back to `base_dir`
    #[serde(default)]
    pub git_dir: Option<PathBuf>,

    /// Directory searched for `pyproject.toml` / `Cargo.toml`
    #[serde(default)]
    pub toml_dir: Option<PathBuf>,

    /// Package name looked up in package metadata
    #[serde(default)]
    #[validate(length(min = 1, max = 255))]
    pub app_name: Option<String>,

    /// Explicit revision override
    #[serde(default)]
    #[validate(length(min = 1, max = 255))]
    pub revision: Option<String>,

    /// Truncation bound for the composed git revision
    #[serde(default = "default_max_length")]
    #[validate(range(min = 1, max = 255))]
    pub max_length: usize,

    #[serde(default)]
    pub ignore_working_dir: bool,

    #[serde(default)]
    pub ignore_metadata: bool,

    #[serde(default)]
    pub ignore_toml_file: bool,

    #[serde(default)]
    pub ignore_version_file: bool,

    /// Log the selected source at warn level
    #[serde(default)]
    pub verbose: bool,

    /// Construct the site resolver eagerly at startup
    #[serde(default = "default_autodiscover")]
    pub autodiscover: bool,
}

fn default_base_dir() -> PathBuf {
    PathBuf::from(".")
}

fn default_max_length() -> usize {
    DEFAULT_MAX_LENGTH
}

fn default_autodiscover() -> bool {
    true
}

impl Default for RevisionSettings {
    fn default() -> Self {
        Self {
            base_dir: default_base_dir(),
            git_dir: None,
            toml_dir: None,
            app_name: None,
            revision: None,
            max_length: default_max_length(),
            ignore_working_dir: false,
            ignore_metadata: false,
            ignore_toml_file: false,
            ignore_version_file: false,
            verbose: false,
            autodiscover: default_autodiscover(),
        }
    }
}

impl RevisionSettings {
    /// Settings rooted at `base_dir`.
    pub fn for_dir(base_dir: impl Into<PathBuf>) -> Self {
        Self {
            base_dir: base_dir.into(),
            ..Self::default()
        }
    }

    /// Directory opened as the git repository.
    pub fn git_dir(&self) -> &Path {
        self.git_dir.as_deref().unwrap_or(&self.base_dir)
    }

    /// Directory searched for the project file.
    pub fn toml_dir(&self) -> &Path {
        self.toml_dir.as_deref().unwrap_or(&self.base_dir)
    }

    /// Directory searched for the VERSION file.
    pub fn version_file_dir(&self) -> &Path {
        &self.base_dir
    }
}

/// Partial settings produced by a single configuration source.
///
/// Every field is optional; `None` means "this source has no opinion" and
/// leaves the lower-precedence value untouched during
/// [`merge_settings`](crate::merge_settings).
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct SettingsLayer {
    pub base_dir: Option<PathBuf>,
    pub git_dir: Option<PathBuf>,
    pub toml_dir: Option<PathBuf>,
    pub app_name: Option<String>,
    pub revision: Option<String>,
    pub max_length: Option<usize>,
    pub ignore_working_dir: Option<bool>,
    pub ignore_metadata: Option<bool>,
    pub ignore_toml_file: Option<bool>,
    pub ignore_version_file: Option<bool>,
    pub verbose: Option<bool>,
    pub autodiscover: Option<bool>,
}

impl SettingsLayer {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}
