use std::sync::Arc;

use config::RevisionSettings;
use tracing::debug;

use crate::resolver::RevisionResolver;

/// Construct the process-wide resolver at startup.
///
/// Returns `None` when `autodiscover` is off; the host then builds resolvers
/// on demand. Resolution itself stays lazy and memoized, so sharing the
/// returned handle across threads is safe.
pub fn site_revision(settings: RevisionSettings) -> Option<Arc<RevisionResolver>> {
    site_revision_with(settings, |resolver| resolver)
}

/// [`site_revision`] with a hook to attach host-specific capabilities, such
/// as the package metadata the host knows about.
pub fn site_revision_with<F>(settings: RevisionSettings, configure: F) -> Option<Arc<RevisionResolver>>
where
    F: FnOnce(RevisionResolver) -> RevisionResolver
{
    if !settings.autodiscover {
        debug!("Revision autodiscovery disabled");
        return None;
    }
    Some(Arc::new(configure(RevisionResolver::new(settings))))
}

#[cfg(test)]
mod tests {
    use super::*;
    use testing::TempRepo;

    #[test]
    fn test_site_revision_disabled() {
        let settings = RevisionSettings {
            autodiscover: false,
            ..RevisionSettings::default()
        };
        assert!(site_revision(settings).is_none());
    }

    #[test]
    fn test_site_revision_shared() {
        let repo = TempRepo::tagged();
        let site = site_revision(RevisionSettings::for_dir(repo.path())).unwrap();

        let handle = Arc::clone(&site);
        let from_thread = std::thread::spawn(move || handle.revision().unwrap().to_string())
            .join()
            .unwrap();
        assert_eq!(site.revision().unwrap(), from_thread);
    }

    #[test]
    fn test_site_revision_with_hook() {
        let repo = TempRepo::tagged();
        let site = site_revision_with(RevisionSettings::for_dir(repo.path()), |resolver| {
            resolver.skip_working_dir().with_override("1.0.0")
        })
        .unwrap();

        assert_eq!(site.revision().unwrap(), "1.0.0");
    }
}
