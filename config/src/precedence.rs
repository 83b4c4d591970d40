//! # Configuration Precedence
//!
//! Merges revision settings from multiple sources with precedence rules.
//!
//! # Precedence Order
//! 1. CLI arguments (highest priority)
//! 2. Environment variables
//! 3. Settings file
//! 4. Default values (lowest priority)

use crate::settings::{RevisionSettings, SettingsLayer};
use std::fmt::Debug;

/// Merge multiple settings sources with precedence.
///
/// # M-CANONICAL-DOCS
///
/// ## Purpose
/// Applies partial layers over `defaults` following precedence rules:
/// CLI arguments > environment variables > settings file > defaults.
///
/// ## Usage
/// ```rust,no_run
/// use config::{RevisionSettings, load_from_env, load_from_file, merge_settings};
/// use std::path::Path;
///
/// fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let from_file = load_from_file(Path::new("revision.toml"))?;
///     let from_env = load_from_env()?;
///
///     let _settings = merge_settings(
///         RevisionSettings::default(),
///         from_file,
///         "file",
///         from_env,
///         "env",
///         None,
///         "cli",
///     );
///     Ok(())
/// }
/// ```
///
/// ## Semantics
/// A `None` field in a layer never overrides. `Some(value)` always wins over
/// lower layers, including `Some(false)` for flags.
pub fn merge_settings(
    defaults: RevisionSettings,
    file_layer: SettingsLayer,
    file_source_name: &str,
    env_layer: SettingsLayer,
    env_source_name: &str,
    cli_layer: Option<SettingsLayer>,
    cli_source_name: &str,
) -> RevisionSettings {
    let mut settings = defaults;

    settings = merge_with_logging(settings, file_layer, file_source_name);
    settings = merge_with_logging(settings, env_layer, env_source_name);

    if let Some(cli) = cli_layer {
        settings = merge_with_logging(settings, cli, cli_source_name);
    }

    settings
}

/// Apply a single layer over `base`, logging every field it changes.
pub fn merge_with_logging(
    mut base: RevisionSettings,
    layer: SettingsLayer,
    source_name: &str,
) -> RevisionSettings {
    let mut changes = Vec::new();

    set_field(&mut base.base_dir, layer.base_dir, "base_dir", &mut changes);
    set_optional(&mut base.git_dir, layer.git_dir, "git_dir", &mut changes);
    set_optional(&mut base.toml_dir, layer.toml_dir, "toml_dir", &mut changes);
    set_optional(&mut base.app_name, layer.app_name, "app_name", &mut changes);
    if let Some(revision) = layer.revision {
        if base.revision.as_deref() != Some(revision.as_str()) {
            changes.push("revision = ***".to_string());
            base.revision = Some(revision);
        }
    }
    set_field(
        &mut base.max_length,
        layer.max_length,
        "max_length",
        &mut changes,
    );
    set_field(
        &mut base.ignore_working_dir,
        layer.ignore_working_dir,
        "ignore_working_dir",
        &mut changes,
    );
    set_field(
        &mut base.ignore_metadata,
        layer.ignore_metadata,
        "ignore_metadata",
        &mut changes,
    );
    set_field(
        &mut base.ignore_toml_file,
        layer.ignore_toml_file,
        "ignore_toml_file",
        &mut changes,
    );
    set_field(
        &mut base.ignore_version_file,
        layer.ignore_version_file,
        "ignore_version_file",
        &mut changes,
    );
    set_field(&mut base.verbose, layer.verbose, "verbose", &mut changes);
    set_field(
        &mut base.autodiscover,
        layer.autodiscover,
        "autodiscover",
        &mut changes,
    );

    if !changes.is_empty() {
        tracing::info!("Configuration from {}: {:?}", source_name, changes);
    }

    base
}

fn set_field<T: PartialEq + Debug>(
    base: &mut T,
    value: Option<T>,
    name: &str,
    changes: &mut Vec<String>,
) {
    if let Some(value) = value {
        if *base != value {
            changes.push(format!("{name} = {value:?}"));
            *base = value;
        }
    }
}

fn set_optional<T: PartialEq + Debug>(
    base: &mut Option<T>,
    value: Option<T>,
    name: &str,
    changes: &mut Vec<String>,
) {
    if let Some(value) = value {
        if base.as_ref() != Some(&value) {
            changes.push(format!("{name} = {value:?}"));
            *base = Some(value);
        }
    }
}
