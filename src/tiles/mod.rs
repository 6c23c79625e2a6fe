//! Tile version collaborators
//!
//! A tile is one of the three downstream deployable bundles (TAS, TASW, IST)
//! that may embed a release's component. This module defines the contract
//! for looking up the component versions a tile currently ships, plus the
//! manifest-backed implementation.

pub mod manifest;

#[cfg(test)]
use mockall::automock;

use crate::report::error::FetchError;
use crate::report::types::Tile;

/// Trait for reading the component versions deployed in each tile.
///
/// `refresh` pulls the latest tile metadata for a git ref; lookups afterwards
/// are served from memory. A failed refresh keeps previously fetched data
/// available, so lookups degrade to stale rather than absent.
#[cfg_attr(test, automock)]
#[async_trait::async_trait]
pub trait TileVersionSource: Send + Sync {
    /// Pull the latest tile metadata for the given ref.
    async fn refresh(&self, git_ref: &str) -> Result<(), FetchError>;

    /// Version of a component as deployed in a tile, or `None` when the tile
    /// does not ship it (or no data is available).
    fn component_version(&self, tile: Tile, component: &str) -> Option<String>;
}
