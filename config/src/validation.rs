//! # Settings Validation
//!
//! Provides validation for revision settings using the `validator` crate.

use crate::settings::RevisionSettings;
use validator::Validate;

/// Validate revision settings.
///
/// # M-CANONICAL-DOCS
///
/// ## Usage
/// ```rust,no_run
/// use config::{RevisionSettings, validate};
///
/// let settings = RevisionSettings::default();
/// match validate(&settings) {
///     Ok(()) => println!("Settings are valid"),
///     Err(errors) => println!("Validation errors: {:?}", errors),
/// }
/// ```
///
/// ## Validation Rules
/// - `max_length`: 1-255
/// - `app_name`: 1-255 characters when set
/// - `revision`: 1-255 characters when set
pub fn validate(settings: &RevisionSettings) -> Result<(), validator::ValidationErrors> {
    settings.validate()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_default_settings() {
        assert!(validate(&RevisionSettings::default()).is_ok());
    }

    #[test]
    fn test_validate_max_length_zero() {
        let settings = RevisionSettings {
            max_length: 0,
            ..RevisionSettings::default()
        };
        assert!(validate(&settings).is_err());
    }

    #[test]
    fn test_validate_max_length_too_large() {
        let settings = RevisionSettings {
            max_length: 256,
            ..RevisionSettings::default()
        };
        assert!(validate(&settings).is_err());
    }

    #[test]
    fn test_validate_empty_app_name() {
        let settings = RevisionSettings {
            app_name: Some(String::new()),
            ..RevisionSettings::default()
        };
        assert!(validate(&settings).is_err());
    }

    #[test]
    fn test_validate_empty_revision_override() {
        let settings = RevisionSettings {
            revision: Some(String::new()),
            ..RevisionSettings::default()
        };
        assert!(validate(&settings).is_err());
    }

    #[test]
    fn test_validate_populated_settings() {
        let settings = RevisionSettings {
            app_name: Some("shop".to_string()),
            revision: Some("1.2.3".to_string()),
            max_length: 255,
            ..RevisionSettings::default()
        };
        assert!(validate(&settings).is_ok());
    }
}
