//! # Configuration System
//!
//! Settings management for build revision discovery.
//!
//! This crate provides:
//! - The `RevisionSettings` structure consumed by the resolver
//! - Environment variable loading (12-factor app principles)
//! - Settings file loading (TOML/YAML)
//! - Settings precedence (CLI > env > file > defaults)
//! - Settings validation

pub mod file_loader;
pub mod loader;
pub mod precedence;
pub mod settings;
pub mod validation;

pub use file_loader::{
    ConfigFileError, find_settings_file, load_from_file, load_from_toml, load_from_yaml,
};
pub use loader::{EnvError, load_from_env, load_from_lookup};
pub use precedence::merge_settings;
pub use settings::{DEFAULT_MAX_LENGTH, RevisionSettings, SettingsLayer};
pub use validation::validate;
