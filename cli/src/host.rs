//! Composition root: settings layering and resolver construction.

use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};
use config::{
    RevisionSettings, SettingsLayer, find_settings_file, load_from_env, load_from_file,
    merge_settings, validate,
};
use revision::{
    CargoLockMetadata, ChainedMetadata, RevisionResolver, StaticMetadata, site_revision_with,
};
use tracing::debug;

use crate::commands::GlobalArgs;

/// Merge defaults, the settings file, `REVISION_*` variables and command-line
/// flags, then validate the result.
pub fn load_settings(args: &GlobalArgs) -> Result<RevisionSettings> {
    let env_layer = load_from_env().context("Invalid REVISION_* environment variable")?;

    let settings_path = match &args.config {
        Some(path) => Some(path.clone()),
        None => {
            let search_dir = args
                .base_dir
                .as_deref()
                .or(env_layer.base_dir.as_deref())
                .unwrap_or(Path::new("."));
            find_settings_file(search_dir)
        }
    };
    let file_layer = match &settings_path {
        Some(path) => {
            debug!("Loading settings from {:?}", path);
            load_from_file(path)
                .with_context(|| format!("Failed to load settings from {}", path.display()))?
        }
        None => SettingsLayer::default(),
    };

    let settings = merge_settings(
        RevisionSettings::default(),
        file_layer,
        "file",
        env_layer,
        "env",
        Some(cli_layer(args)),
        "cli",
    );
    validate(&settings).context("Invalid revision settings")?;
    Ok(settings)
}

fn cli_layer(args: &GlobalArgs) -> SettingsLayer {
    let flag = |set: bool| set.then_some(true);
    SettingsLayer {
        base_dir: args.base_dir.clone(),
        git_dir: args.git_dir.clone(),
        toml_dir: args.toml_dir.clone(),
        app_name: args.app_name.clone(),
        revision: args.revision.clone(),
        max_length: args.max_length,
        ignore_working_dir: flag(args.ignore_working_dir),
        ignore_metadata: flag(args.ignore_metadata),
        ignore_toml_file: flag(args.ignore_toml_file),
        ignore_version_file: flag(args.ignore_version_file),
        verbose: flag(args.verbose),
        autodiscover: None,
    }
}

/// Attach the package metadata this binary knows about: its own version,
/// then the `Cargo.lock` next to the project file.
pub fn with_host_metadata(resolver: RevisionResolver) -> RevisionResolver {
    let lockfile = CargoLockMetadata::in_dir(resolver.settings().toml_dir());
    let metadata = ChainedMetadata::new()
        .with_source(Arc::new(
            StaticMetadata::new().with_package(env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION")),
        ))
        .with_source(Arc::new(lockfile));
    resolver.with_package_metadata(Arc::new(metadata))
}

/// The site resolver, or a fresh one when autodiscovery is off.
pub fn resolver(settings: &RevisionSettings) -> Arc<RevisionResolver> {
    site_revision_with(settings.clone(), with_host_metadata).unwrap_or_else(|| {
        debug!("Building revision resolver on demand");
        Arc::new(with_host_metadata(RevisionResolver::new(settings.clone())))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_cli_layer_flags() {
        let args = GlobalArgs {
            ignore_working_dir: true,
            max_length: Some(12),
            ..GlobalArgs::default()
        };
        let layer = cli_layer(&args);

        assert_eq!(layer.ignore_working_dir, Some(true));
        assert_eq!(layer.ignore_metadata, None);
        assert_eq!(layer.max_length, Some(12));
        assert!(layer.autodiscover.is_none());
    }

    #[test]
    fn test_host_metadata_knows_this_binary() {
        let dir = tempfile::TempDir::new().unwrap();
        let resolver = with_host_metadata(
            RevisionResolver::from_dir(dir.path())
                .skip_working_dir()
                .with_app_name("revision-cli"),
        );

        assert_eq!(resolver.revision().unwrap(), env!("CARGO_PKG_VERSION"));
    }

    #[test]
    fn test_resolver_without_autodiscover() {
        let settings = RevisionSettings {
            autodiscover: false,
            revision: Some("1.0.0".to_string()),
            ignore_working_dir: true,
            ..RevisionSettings::for_dir(PathBuf::from("/nonexistent"))
        };

        assert_eq!(resolver(&settings).revision().unwrap(), "1.0.0");
    }
}
