//! Shared test fixtures for the revision workspace.
//!
//! Provides throwaway git repositories ([`TempRepo`]) and application
//! directories ([`TempProject`]). Both live in a temporary directory that is
//! removed when the fixture is dropped.

mod fixtures;

pub use fixtures::*;
