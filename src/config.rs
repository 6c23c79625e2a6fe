use std::path::Path;
use std::time::Duration;

use reqwest::Url;
use serde::Deserialize;
use thiserror::Error;

use crate::report::types::Tile;

// =============================================================================
// Time-related constants
// =============================================================================

/// How long a report snapshot stays fresh before a new fetch pass runs.
pub const DEFAULT_REFRESH_INTERVAL: Duration = Duration::from_secs(60);

/// Git ref the tile metadata is refreshed from.
pub const TILE_METADATA_REF: &str = "main";

/// Default base URL for the tile metadata repository (raw file access).
pub const DEFAULT_TILE_METADATA_URL: &str =
    "https://raw.githubusercontent.com/bump-progress/tile-versions";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse config file: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid repository url for release {release}: {url}")]
    InvalidRepoUrl { release: String, url: String },
}

/// A tracked source-code release.
///
/// `owner` and `repo` are derived from `url` when the config is loaded.
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
pub struct Release {
    pub name: String,
    pub url: String,
    #[serde(skip)]
    pub owner: String,
    #[serde(skip)]
    pub repo: String,
    #[serde(default = "default_platform")]
    pub platform: String,
    #[serde(default)]
    pub tas_release_name: Option<String>,
    #[serde(default)]
    pub tasw_release_name: Option<String>,
    #[serde(default)]
    pub ist_release_name: Option<String>,
    #[serde(default)]
    pub ci_team: String,
    #[serde(default)]
    pub ci_pipeline: String,
    /// Releases with no stable-release concept; always counted as fully bumped.
    #[serde(default)]
    pub only_develop: bool,
}

fn default_platform() -> String {
    "linux".to_string()
}

impl Release {
    /// Component name this release ships in the given tile, if any.
    pub fn component_for(&self, tile: Tile) -> Option<&str> {
        match tile {
            Tile::Tas => self.tas_release_name.as_deref(),
            Tile::Tasw => self.tasw_release_name.as_deref(),
            Tile::Ist => self.ist_release_name.as_deref(),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
pub struct Config {
    #[serde(rename = "ci_url")]
    pub ci_base_url: String,
    #[serde(default = "default_tile_metadata_url")]
    pub tile_metadata_url: String,
    pub releases: Vec<Release>,
}

fn default_tile_metadata_url() -> String {
    DEFAULT_TILE_METADATA_URL.to_string()
}

impl Config {
    /// Load and validate the configuration. Any error here is fatal to startup.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path)?;
        let mut cfg: Config = serde_json::from_str(&raw)?;
        for release in &mut cfg.releases {
            let (owner, repo) = split_repo_url(&release.url).ok_or_else(|| {
                ConfigError::InvalidRepoUrl {
                    release: release.name.clone(),
                    url: release.url.clone(),
                }
            })?;
            release.owner = owner;
            release.repo = repo;
        }
        Ok(cfg)
    }

    pub fn ci_url(&self, release: &Release) -> String {
        format!(
            "{}/teams/{}/pipelines/{}",
            self.ci_base_url, release.ci_team, release.ci_pipeline
        )
    }

    pub fn ci_badge_url(&self, release: &Release) -> String {
        format!(
            "{}/api/v1/teams/{}/pipelines/{}/badge",
            self.ci_base_url, release.ci_team, release.ci_pipeline
        )
    }
}

/// Extract `(owner, repo)` from a repository URL like
/// `https://github.com/cloudfoundry/routing-release`.
fn split_repo_url(url: &str) -> Option<(String, String)> {
    let parsed = Url::parse(url).ok()?;
    let mut segments = parsed.path_segments()?.filter(|s| !s.is_empty());
    let owner = segments.next()?;
    let repo = segments.next()?;
    Some((owner.to_string(), repo.trim_end_matches(".git").to_string()))
}
