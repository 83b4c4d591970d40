//! File-based revision sources: project manifests and the VERSION file.
//!
//! A missing file is `Ok(None)`. A file that exists but cannot be used is an
//! error, so the caller can report why it was skipped.

use std::fs;
use std::path::{Path, PathBuf};

use errors::RevisionError;
use toml::{Table, Value};
use tracing::trace;

pub const PYPROJECT_FILE: &str = "pyproject.toml";
pub const CARGO_MANIFEST_FILE: &str = "Cargo.toml";
pub const VERSION_FILE: &str = "VERSION";

/// A value read from a file, with the file it came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileValue {
    pub value: String,
    pub path: PathBuf,
}

#[derive(Debug, Clone, Copy)]
enum Manifest {
    PyProject,
    Cargo,
}

impl Manifest {
    fn file_name(self) -> &'static str {
        match self {
            Manifest::PyProject => PYPROJECT_FILE,
            Manifest::Cargo => CARGO_MANIFEST_FILE,
        }
    }

    fn version(self, table: &Table) -> Result<String, String> {
        match self {
            Manifest::PyProject => {
                let project = table
                    .get("project")
                    .and_then(Value::as_table)
                    .ok_or("missing [project] table")?;
                match project.get("version") {
                    Some(Value::String(version)) => Ok(version.clone()),
                    Some(_) => Err("[project].version is not a string".to_string()),
                    None if is_dynamic_version(project) => {
                        Err("[project].version is declared dynamic".to_string())
                    }
                    None => Err("missing [project].version".to_string()),
                }
            }
            Manifest::Cargo => {
                let workspace_version = || {
                    table
                        .get("workspace")
                        .and_then(|w| w.get("package"))
                        .and_then(|p| p.get("version"))
                        .and_then(Value::as_str)
                        .map(str::to_string)
                };
                match table.get("package").and_then(|p| p.get("version")) {
                    Some(Value::String(version)) => Ok(version.clone()),
                    Some(Value::Table(_)) => workspace_version()
                        .ok_or_else(|| "version is inherited from another workspace".to_string()),
                    Some(_) => Err("[package].version is not a string".to_string()),
                    None => workspace_version().ok_or_else(|| {
                        "missing [package].version and [workspace.package].version".to_string()
                    }),
                }
            }
        }
    }
}

fn is_dynamic_version(project: &Table) -> bool {
    project
        .get("dynamic")
        .and_then(Value::as_array)
        .is_some_and(|dynamic| dynamic.iter().any(|v| v.as_str() == Some("version")))
}

/// Read the project version from `pyproject.toml`, then `Cargo.toml`, in `dir`.
///
/// `pyproject.toml` supplies `[project].version`. `Cargo.toml` supplies
/// `[package].version`, or `[workspace.package].version` for a virtual or
/// inheriting manifest. The first manifest that yields a version wins; if
/// manifests exist but none yields one, the first problem is returned as
/// [`RevisionError::Toml`].
pub fn read_project_version(dir: &Path) -> Result<Option<FileValue>, RevisionError> {
    let mut first_error = None;

    for manifest in [Manifest::PyProject, Manifest::Cargo] {
        let path = dir.join(manifest.file_name());
        if !path.is_file() {
            continue;
        }
        trace!("Reading project version from {:?}", path);

        let result = fs::read_to_string(&path)
            .map_err(|e| e.to_string())
            .and_then(|contents| toml::from_str::<Table>(&contents).map_err(|e| e.to_string()))
            .and_then(|table| manifest.version(&table));

        match result {
            Ok(value) => return Ok(Some(FileValue { value, path })),
            Err(reason) => {
                first_error.get_or_insert(RevisionError::Toml { path, reason });
            }
        }
    }

    first_error.map_or(Ok(None), Err)
}

/// Read the trimmed contents of the `VERSION` file in `dir`.
///
/// The value may be empty; the caller decides what an empty file means.
pub fn read_version_file(dir: &Path) -> Result<Option<FileValue>, RevisionError> {
    let path = dir.join(VERSION_FILE);
    if !path.is_file() {
        return Ok(None);
    }
    let contents = fs::read_to_string(&path).map_err(|e| {
        RevisionError::internal(format!("failed to read {}: {e}", path.display()))
    })?;
    Ok(Some(FileValue {
        value: contents.trim().to_string(),
        path,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use errors::RevisionErrorKind;
    use tempfile::TempDir;

    #[test]
    fn test_pyproject_version() {
        let dir = TempDir::new().unwrap();
        fs::write(
            dir.path().join(PYPROJECT_FILE),
            "[project]\nname = \"shop\"\nversion = \"9.9.9\"\n",
        )
        .unwrap();

        let found = read_project_version(dir.path()).unwrap().unwrap();
        assert_eq!(found.value, "9.9.9");
        assert_eq!(found.path, dir.path().join(PYPROJECT_FILE));
    }

    #[test]
    fn test_cargo_manifest_version() {
        let dir = TempDir::new().unwrap();
        fs::write(
            dir.path().join(CARGO_MANIFEST_FILE),
            "[package]\nname = \"shop\"\nversion = \"0.3.1\"\n",
        )
        .unwrap();

        let found = read_project_version(dir.path()).unwrap().unwrap();
        assert_eq!(found.value, "0.3.1");
    }

    #[test]
    fn test_cargo_workspace_version() {
        let dir = TempDir::new().unwrap();
        fs::write(
            dir.path().join(CARGO_MANIFEST_FILE),
            "[workspace.package]\nversion = \"1.2.0\"\n\n[package]\nname = \"shop\"\nversion.workspace = true\n",
        )
        .unwrap();

        assert_eq!(
            read_project_version(dir.path()).unwrap().unwrap().value,
            "1.2.0"
        );
    }

    #[test]
    fn test_missing_manifests() {
        let dir = TempDir::new().unwrap();
        assert!(read_project_version(dir.path()).unwrap().is_none());
    }

    #[test]
    fn test_malformed_pyproject() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join(PYPROJECT_FILE), "[project\n").unwrap();

        let err = read_project_version(dir.path()).unwrap_err();
        assert_eq!(err.kind(), RevisionErrorKind::Toml);
    }

    #[test]
    fn test_dynamic_pyproject_version() {
        let dir = TempDir::new().unwrap();
        fs::write(
            dir.path().join(PYPROJECT_FILE),
            "[project]\nname = \"shop\"\ndynamic = [\"version\"]\n",
        )
        .unwrap();

        let err = read_project_version(dir.path()).unwrap_err();
        assert!(err.to_string().contains("dynamic"));
    }

    #[test]
    fn test_pyproject_without_version_falls_through_to_cargo() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join(PYPROJECT_FILE), "[tool.black]\n").unwrap();
        fs::write(
            dir.path().join(CARGO_MANIFEST_FILE),
            "[package]\nname = \"shop\"\nversion = \"0.3.1\"\n",
        )
        .unwrap();

        assert_eq!(
            read_project_version(dir.path()).unwrap().unwrap().value,
            "0.3.1"
        );
    }

    #[test]
    fn test_version_file_is_trimmed() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join(VERSION_FILE), "  8.8.8\n").unwrap();

        let found = read_version_file(dir.path()).unwrap().unwrap();
        assert_eq!(found.value, "8.8.8");
    }

    #[test]
    fn test_version_file_missing_or_blank() {
        let dir = TempDir::new().unwrap();
        assert!(read_version_file(dir.path()).unwrap().is_none());

        fs::write(dir.path().join(VERSION_FILE), "\n\n").unwrap();
        assert_eq!(read_version_file(dir.path()).unwrap().unwrap().value, "");
    }
}
