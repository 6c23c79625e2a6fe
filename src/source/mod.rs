//! Release source collaborators
//!
//! A release source answers three questions about a tracked release: which
//! Go toolchain version is on its develop branch, what its latest stable
//! release is, and which release version first shipped the toolchain version
//! carried by that stable release.

pub mod github;

#[cfg(test)]
use mockall::automock;

use crate::config::Release;
use crate::report::error::FetchError;
use crate::report::types::VersionPair;

/// Trait for fetching version information about a tracked release.
#[cfg_attr(test, automock)]
#[async_trait::async_trait]
pub trait ReleaseSource: Send + Sync {
    /// The Go toolchain version currently on the release's develop branch.
    async fn develop_version(&self, release: &Release) -> Result<String, FetchError>;

    /// The latest generally-available release tag.
    async fn released_version(&self, release: &Release) -> Result<String, FetchError>;

    /// The earliest (toolchain version, release version) pair at which this
    /// release began shipping the toolchain version carried by
    /// `released_version`, found by scanning the release history.
    async fn first_release_carrying(
        &self,
        release: &Release,
        released_version: &str,
    ) -> Result<VersionPair, FetchError>;
}
