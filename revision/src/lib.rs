//! Build revision discovery.
//!
//! Determines a human-readable revision identifier for the running build,
//! either from the git working directory (`tag:branch:commit`) or from the
//! first of several static sources:
//!
//! 1. Package metadata for the application name
//! 2. Project file (`pyproject.toml` or `Cargo.toml`)
//! 3. `VERSION` file
//! 4. Explicit settings override
//!
//! # Example
//!
//! ```rust,ignore
//! use config::RevisionSettings;
//! use revision::RevisionResolver;
//!
//! let resolver = RevisionResolver::new(RevisionSettings::for_dir("/srv/app"));
//! println!("Revision: {}", resolver.revision()?);
//!
//! // Without git
//! let resolver = RevisionResolver::from_dir("/srv/app")
//!     .skip_working_dir()
//!     .with_app_name("shop");
//! println!("Tag: {}", resolver.summary()?.display_tag());
//! ```

pub mod bootstrap;
pub mod check;
pub mod metadata;
mod resolver;
pub mod sources;
mod types;
pub mod vcs;

pub use bootstrap::{site_revision, site_revision_with};
pub use check::{CheckLevel, CheckMessage, check_resolver, check_revision};
pub use errors::{RevisionError, RevisionErrorKind};
pub use metadata::{CargoLockMetadata, ChainedMetadata, MetadataError, PackageMetadata, StaticMetadata};
pub use resolver::RevisionResolver;
pub use types::{DETACHED, ResolvedRevision, RevisionSource, RevisionSummary};
pub use vcs::{Git2Backend, VcsBackend, VcsError, VcsRepository};
