//! Startup check that the revision can be determined.

use config::RevisionSettings;
use errors::RevisionErrorKind;
use serde::Serialize;
use tracing::error;

use crate::resolver::RevisionResolver;

pub const REVISION_CHECK_ID: &str = "revision.E001";
pub const REVISION_CHECK_MSG: &str = "Unable to determine the application revision.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CheckLevel {
    Warning,
    Error,
}

impl CheckLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            CheckLevel::Warning => "warning",
            CheckLevel::Error => "error",
        }
    }
}

/// A finding reported by a startup check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CheckMessage {
    pub id: String,
    pub level: CheckLevel,
    pub msg: String,
    pub hint: Option<String>,
    pub kind: Option<RevisionErrorKind>,
}

/// Resolve the revision with a fresh, verbose resolver over `settings`.
///
/// Returns an empty list when the revision resolves, otherwise a single
/// `revision.E001` error whose hint carries the underlying failure.
pub fn check_revision(settings: &RevisionSettings) -> Vec<CheckMessage> {
    check_resolver(&RevisionResolver::new(settings.clone()).verbose())
}

/// Same as [`check_revision`] against an already configured resolver.
pub fn check_resolver(resolver: &RevisionResolver) -> Vec<CheckMessage> {
    match resolver.revision() {
        Ok(_) => Vec::new(),
        Err(e) => {
            error!("{}: {}", REVISION_CHECK_ID, e);
            vec![CheckMessage {
                id: REVISION_CHECK_ID.to_string(),
                level: CheckLevel::Error,
                msg: REVISION_CHECK_MSG.to_string(),
                hint: Some(e.to_string()),
                kind: Some(e.kind()),
            }]
        }
    }
}
