//! Manifest-backed tile version source
//!
//! The tile metadata repository serves one JSON document per tile at
//! `{base}/{ref}/{tile}.json`, mapping component names to the version the
//! tile currently ships.

use std::collections::HashMap;
use std::sync::Mutex;

use tracing::{debug, warn};

use crate::report::error::FetchError;
use crate::report::types::Tile;
use crate::tiles::TileVersionSource;

/// Tile version source backed by per-tile JSON manifests.
pub struct ManifestTileSource {
    client: reqwest::Client,
    base_url: String,
    manifests: Mutex<HashMap<Tile, HashMap<String, String>>>,
}

impl ManifestTileSource {
    /// Creates a new ManifestTileSource reading from the given base URL
    pub fn new(base_url: &str) -> Self {
        Self {
            client: reqwest::Client::builder()
                .user_agent("bump-progress")
                .build()
                .expect("Failed to create HTTP client"),
            base_url: base_url.trim_end_matches('/').to_string(),
            manifests: Mutex::new(HashMap::new()),
        }
    }

    fn manifest_file(tile: Tile) -> &'static str {
        match tile {
            Tile::Tas => "tas.json",
            Tile::Tasw => "tasw.json",
            Tile::Ist => "ist.json",
        }
    }

    async fn fetch_manifest(
        &self,
        git_ref: &str,
        tile: Tile,
    ) -> Result<HashMap<String, String>, FetchError> {
        let url = format!(
            "{}/{}/{}",
            self.base_url,
            git_ref,
            Self::manifest_file(tile)
        );

        let response = self.client.get(&url).send().await?;
        let status = response.status();

        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(FetchError::NotFound(url));
        }

        if !status.is_success() {
            warn!("tile metadata returned status {}: {}", status, url);
            return Err(FetchError::InvalidResponse(format!(
                "Unexpected status: {}",
                status
            )));
        }

        let manifest: HashMap<String, String> = response.json().await.map_err(|e| {
            warn!("Failed to parse {} manifest: {}", tile, e);
            FetchError::InvalidResponse(e.to_string())
        })?;

        Ok(manifest)
    }
}

#[async_trait::async_trait]
impl TileVersionSource for ManifestTileSource {
    async fn refresh(&self, git_ref: &str) -> Result<(), FetchError> {
        let mut first_error = None;

        for tile in Tile::ALL {
            match self.fetch_manifest(git_ref, tile).await {
                Ok(manifest) => {
                    debug!("loaded {} components for {}", manifest.len(), tile);
                    if let Ok(mut manifests) = self.manifests.lock() {
                        manifests.insert(tile, manifest);
                    }
                }
                Err(e) => {
                    // Keep whatever this tile had from the previous refresh.
                    warn!("failed to refresh {} manifest: {}", tile, e);
                    first_error.get_or_insert(e);
                }
            }
        }

        match first_error {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }

    fn component_version(&self, tile: Tile, component: &str) -> Option<String> {
        self.manifests
            .lock()
            .ok()?
            .get(&tile)?
            .get(component)
            .cloned()
    }
}
