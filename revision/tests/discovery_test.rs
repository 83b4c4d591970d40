use std::sync::Arc;

use config::{RevisionSettings, SettingsLayer, merge_settings};
use revision::{
    RevisionErrorKind, RevisionResolver, RevisionSource, StaticMetadata, check_revision,
    site_revision,
};
use testing::{TempProject, TempRepo};

#[test]
fn test_repository_revision_end_to_end() {
    let repo = TempRepo::tagged();
    let commit = repo.head_commit();
    let resolver = RevisionResolver::new(RevisionSettings::for_dir(repo.path()));

    let summary = resolver.summary().unwrap();
    assert_eq!(summary.source, RevisionSource::Git);
    assert_eq!(summary.tag.as_deref(), Some("0.0.2"));
    assert_eq!(summary.branch.as_deref(), Some("master"));
    assert_eq!(summary.commit.as_deref(), Some(commit.as_str()));
    assert_eq!(
        summary.revision,
        format!("0.0.2:master:{commit}").chars().take(75).collect::<String>()
    );
}

#[test]
fn test_separate_git_dir() {
    let repo = TempRepo::tagged();
    let project = TempProject::new();
    let settings = RevisionSettings {
        git_dir: Some(repo.path().to_path_buf()),
        ..RevisionSettings::for_dir(project.path())
    };

    let resolver = RevisionResolver::new(settings);
    assert!(resolver.revision().unwrap().starts_with("0.0.2:master:"));
}

#[test]
fn test_layers_drive_source_selection() {
    let project = TempProject::new()
        .with_cargo_manifest("shop", "0.3.1")
        .with_version_file("8.8.8");

    let file = SettingsLayer {
        base_dir: Some(project.path().to_path_buf()),
        ignore_working_dir: Some(true),
        ..SettingsLayer::default()
    };
    let cli = SettingsLayer {
        ignore_toml_file: Some(true),
        ..SettingsLayer::default()
    };
    let settings = merge_settings(
        RevisionSettings::default(),
        file,
        "file",
        SettingsLayer::default(),
        "env",
        Some(cli),
        "cli",
    );

    let resolver = RevisionResolver::new(settings);
    assert_eq!(resolver.revision().unwrap(), "8.8.8");
}

#[test]
fn test_full_static_chain_order() {
    let project = TempProject::new()
        .with_pyproject("9.9.9")
        .with_version_file("8.8.8");
    let metadata = Arc::new(StaticMetadata::new().with_package("shop", "2.3.1"));

    let all = RevisionResolver::from_dir(project.path())
        .skip_working_dir()
        .with_app_name("shop")
        .with_override("1.0.0")
        .with_package_metadata(metadata.clone());
    assert_eq!(all.revision().unwrap(), "2.3.1");

    let no_metadata = RevisionResolver::from_dir(project.path())
        .skip_working_dir()
        .skip_metadata()
        .with_app_name("shop")
        .with_override("1.0.0")
        .with_package_metadata(metadata);
    assert_eq!(no_metadata.revision().unwrap(), "9.9.9");

    let only_override = RevisionResolver::from_dir(project.path())
        .skip_working_dir()
        .skip_metadata()
        .skip_toml_file()
        .skip_version_file()
        .with_override("1.0.0");
    assert_eq!(only_override.revision().unwrap(), "1.0.0");
}

#[test]
fn test_startup_check_and_site_revision() {
    let project = TempProject::new();
    let settings = RevisionSettings::for_dir(project.path());

    let messages = check_revision(&settings);
    assert_eq!(messages.len(), 1);
    assert_eq!(messages[0].kind, Some(RevisionErrorKind::Git));

    let site = site_revision(settings).unwrap();
    assert_eq!(site.revision().unwrap_err().kind(), RevisionErrorKind::Git);
}
