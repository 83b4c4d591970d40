//! # Settings File Loading
//!
//! Loads revision settings from TOML or YAML files.
//!
//! Supports automatic format detection based on file extension.

use crate::settings::SettingsLayer;
use std::path::{Path, PathBuf};

/// File names probed by [`find_settings_file`], in order.
pub const SETTINGS_FILE_NAMES: [&str; 3] = ["revision.toml", "revision.yaml", "revision.yml"];

/// Settings file loading error.
#[derive(Debug, thiserror::Error)]
pub enum ConfigFileError {
    #[error("File not found: {0}")]
    FileNotFound(String),

    #[error("Failed to parse TOML: {0}")]
    TomlParse(String),

    #[error("Failed to parse YAML: {0}")]
    YamlParse(String),

    #[error("Config file has no extension")]
    NoExtension,

    #[error("Unsupported config file format: {0}")]
    UnsupportedFormat(String),
}

/// Load settings from a TOML file.
///
/// # M-CANONICAL-DOCS
///
/// ## Usage
/// ```rust,no_run
/// use config::load_from_toml;
/// use std::path::Path;
///
/// fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let layer = load_from_toml(Path::new("revision.toml"))?;
///     println!("app name: {:?}", layer.app_name);
///     Ok(())
/// }
/// ```
///
/// ## Error Handling
/// Returns `ConfigFileError` for:
/// - File not found
/// - Invalid TOML syntax or field types
pub fn load_from_toml(path: &Path) -> Result<SettingsLayer, ConfigFileError> {
    let contents = std::fs::read_to_string(path)
        .map_err(|_e| ConfigFileError::FileNotFound(path.display().to_string()))?;

    toml::from_str(&contents).map_err(|e| ConfigFileError::TomlParse(e.to_string()))
}

/// Load settings from a YAML file.
///
/// An empty document yields an empty layer.
pub fn load_from_yaml(path: &Path) -> Result<SettingsLayer, ConfigFileError> {
    let contents = std::fs::read_to_string(path)
        .map_err(|_e| ConfigFileError::FileNotFound(path.display().to_string()))?;

    if contents.trim().is_empty() {
        return Ok(SettingsLayer::default());
    }

    serde_yaml::from_str(&contents).map_err(|e| ConfigFileError::YamlParse(e.to_string()))
}

/// Load settings from file with auto-detection.
///
/// ## Supported Formats
/// - `.toml`: TOML format
/// - `.yaml`: YAML format
/// - `.yml`: YAML format
pub fn load_from_file(path: &Path) -> Result<SettingsLayer, ConfigFileError> {
    let extension = path
        .extension()
        .and_then(|s| s.to_str())
        .ok_or(ConfigFileError::NoExtension)?;

    match extension.to_lowercase().as_str() {
        "toml" => load_from_toml(path),
        "yaml" | "yml" => load_from_yaml(path),
        other => Err(ConfigFileError::UnsupportedFormat(other.to_string())),
    }
}

/// Find the first settings file present in `dir`.
pub fn find_settings_file(dir: &Path) -> Option<PathBuf> {
    SETTINGS_FILE_NAMES
        .iter()
        .map(|name| dir.join(name))
        .find(|candidate| candidate.is_file())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_load_from_toml() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("revision.toml");

        let toml_content = r#"
base_dir = "/srv/app"
app_name = "shop"
max_length = 40
ignore_working_dir = true
ignore_metadata = true
"#;
        fs::write(&path, toml_content).unwrap();

        let layer = load_from_toml(&path).unwrap();
        assert_eq!(layer.base_dir, Some(PathBuf::from("/srv/app")));
        assert_eq!(layer.app_name.as_deref(), Some("shop"));
        assert_eq!(layer.max_length, Some(40));
        assert_eq!(layer.ignore_working_dir, Some(true));
        assert_eq!(layer.ignore_metadata, Some(true));
        assert_eq!(layer.ignore_toml_file, None);
    }

    #[test]
    fn test_load_from_yaml() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("revision.yaml");

        let yaml_content = r#"
git_dir: /srv/src
revision: 1.0.0
verbose: true
"#;
        fs::write(&path, yaml_content).unwrap();

        let layer = load_from_yaml(&path).unwrap();
        assert_eq!(layer.git_dir, Some(PathBuf::from("/srv/src")));
        assert_eq!(layer.revision.as_deref(), Some("1.0.0"));
        assert_eq!(layer.verbose, Some(true));
    }

    #[test]
    fn test_load_from_empty_yaml() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("revision.yml");
        fs::write(&path, "\n").unwrap();

        assert!(load_from_file(&path).unwrap().is_empty());
    }

    #[test]
    fn test_load_from_file_unsupported() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("revision.json");
        fs::write(&path, "{}").unwrap();

        let result = load_from_file(&path);
        assert!(matches!(result, Err(ConfigFileError::UnsupportedFormat(_))));
    }

    #[test]
    fn test_load_from_file_no_extension() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("revision");
        fs::write(&path, "").unwrap();

        let result = load_from_file(&path);
        assert!(matches!(result, Err(ConfigFileError::NoExtension)));
    }

    #[test]
    fn test_load_from_toml_invalid() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("revision.toml");
        fs::write(&path, "[invalid\n").unwrap();

        let result = load_from_toml(&path);
        assert!(matches!(result, Err(ConfigFileError::TomlParse(_))));
    }

    #[test]
    fn test_load_from_toml_wrong_type() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("revision.toml");
        fs::write(&path, "max_length = \"long\"\n").unwrap();

        let result = load_from_toml(&path);
        assert!(matches!(result, Err(ConfigFileError::TomlParse(_))));
    }

    #[test]
    fn test_load_from_toml_not_found() {
        let path = Path::new("/nonexistent/path/revision.toml");
        let result = load_from_toml(path);
        assert!(matches!(result, Err(ConfigFileError::FileNotFound(_))));
    }

    #[test]
    fn test_find_settings_file() {
        let dir = TempDir::new().unwrap();
        assert!(find_settings_file(dir.path()).is_none());

        fs::write(dir.path().join("revision.yml"), "verbose: true\n").unwrap();
        assert_eq!(
            find_settings_file(dir.path()),
            Some(dir.path().join("revision.yml"))
        );

        fs::write(dir.path().join("revision.toml"), "verbose = true\n").unwrap();
        assert_eq!(
            find_settings_file(dir.path()),
            Some(dir.path().join("revision.toml"))
        );
    }
}
