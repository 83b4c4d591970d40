//! # Environment Variable Loader
//!
//! Loads revision settings from environment variables following 12-factor app
//! principles.
//!
//! # Naming Convention
//! All variables share the `REVISION_` prefix. Unset variables leave the
//! corresponding field untouched.

use crate::settings::SettingsLayer;
use std::env;
use std::path::PathBuf;

/// Environment variable prefix for revision settings.
pub const ENV_PREFIX: &str = "REVISION_";

pub const ENV_BASE_DIR: &str = "REVISION_BASE_DIR";
pub const ENV_GIT_DIR: &str = "REVISION_GIT_DIR";
pub const ENV_TOML_DIR: &str = "REVISION_TOML_DIR";
pub const ENV_APP_NAME: &str = "REVISION_APP_NAME";
pub const ENV_OVERRIDE: &str = "REVISION_OVERRIDE";
pub const ENV_MAX_LENGTH: &str = "REVISION_MAX_LENGTH";
pub const ENV_IGNORE_WORKING_DIR: &str = "REVISION_IGNORE_WORKING_DIR";
pub const ENV_IGNORE_METADATA: &str = "REVISION_IGNORE_METADATA";
pub const ENV_IGNORE_TOML_FILE: &str = "REVISION_IGNORE_TOML_FILE";
pub const ENV_IGNORE_VERSION_FILE: &str = "REVISION_IGNORE_VERSION_FILE";
pub const ENV_VERBOSE: &str = "REVISION_VERBOSE";
pub const ENV_AUTODISCOVER: &str = "REVISION_AUTODISCOVER";

/// Environment variable parsing error.
#[derive(Debug, thiserror::Error)]
pub enum EnvError {
    #[error("Invalid value for {key}: {value:?} ({reason})")]
    InvalidValue {
        key: String,
        value: String,
        reason: String,
    },
}

/// Load settings from the process environment.
///
/// # M-CANONICAL-DOCS
///
/// ## Purpose
/// Reads the `REVISION_*` variables into a [`SettingsLayer`]. Environment
/// variables override file settings but are overridden by CLI arguments.
///
/// ## Usage
/// ```rust,no_run
/// use config::load_from_env;
///
/// fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let layer = load_from_env()?;
///     println!("ignore working dir: {:?}", layer.ignore_working_dir);
///     Ok(())
/// }
/// ```
///
/// ## Environment Variables
/// - `REVISION_BASE_DIR`: Application root directory
/// - `REVISION_GIT_DIR`: Git working directory
/// - `REVISION_TOML_DIR`: Directory holding the project file
/// - `REVISION_APP_NAME`: Package name for metadata lookup
/// - `REVISION_OVERRIDE`: Explicit revision string
/// - `REVISION_MAX_LENGTH`: Truncation bound (1-255)
/// - `REVISION_IGNORE_WORKING_DIR`, `REVISION_IGNORE_METADATA`,
///   `REVISION_IGNORE_TOML_FILE`, `REVISION_IGNORE_VERSION_FILE`: Disable flags
/// - `REVISION_VERBOSE`: Log the selected source
/// - `REVISION_AUTODISCOVER`: Construct the site resolver at startup
///
/// Booleans accept `true/false`, `1/0`, `yes/no` and `on/off`.
pub fn load_from_env() -> Result<SettingsLayer, EnvError> {
    load_from_lookup(|key| env::var(key).ok())
}

/// Load settings through an arbitrary key lookup.
pub fn load_from_lookup<F>(lookup: F) -> Result<SettingsLayer, EnvError>
where
    F: Fn(&str) -> Option<String>
{
    let text = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

    Ok(SettingsLayer {
        base_dir: text(ENV_BASE_DIR).map(PathBuf::from),
        git_dir: text(ENV_GIT_DIR).map(PathBuf::from),
        toml_dir: text(ENV_TOML_DIR).map(PathBuf::from),
        app_name: text(ENV_APP_NAME),
        revision: text(ENV_OVERRIDE),
        max_length: text(ENV_MAX_LENGTH)
            .map(|value| parse_env(ENV_MAX_LENGTH, &value))
            .transpose()?,
        ignore_working_dir: parse_flag_var(ENV_IGNORE_WORKING_DIR, text(ENV_IGNORE_WORKING_DIR))?,
        ignore_metadata: parse_flag_var(ENV_IGNORE_METADATA, text(ENV_IGNORE_METADATA))?,
        ignore_toml_file: parse_flag_var(ENV_IGNORE_TOML_FILE, text(ENV_IGNORE_TOML_FILE))?,
        ignore_version_file: parse_flag_var(
            ENV_IGNORE_VERSION_FILE,
            text(ENV_IGNORE_VERSION_FILE),
        )?,
        verbose: parse_flag_var(ENV_VERBOSE, text(ENV_VERBOSE))?,
        autodiscover: parse_flag_var(ENV_AUTODISCOVER, text(ENV_AUTODISCOVER))?,
    })
}

fn parse_flag_var(key: &str, value: Option<String>) -> Result<Option<bool>, EnvError> {
    value.map(|value| parse_flag(key, &value)).transpose()
}

/// Parse a boolean flag.
pub fn parse_flag(key: &str, value: &str) -> Result<bool, EnvError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(EnvError::InvalidValue {
            key: key.to_string(),
            value: value.to_string(),
            reason: "expected a boolean".to_string(),
        }),
    }
}

fn parse_env<T>(key: &str, value: &str) -> Result<T, EnvError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display
{
    value
        .trim()
        .parse::<T>()
        .map_err(|e| EnvError::InvalidValue {
            key: key.to_string(),
            value: value.to_string(),
            reason: e.to_string(),
        })
}
