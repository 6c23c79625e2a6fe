//! Common types for bump progress reports

use std::fmt;

use serde::Serialize;

/// One of the downstream tiles that can embed a release.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Tile {
    Tas,
    Tasw,
    Ist,
}

impl Tile {
    pub const ALL: [Tile; 3] = [Tile::Tas, Tile::Tasw, Tile::Ist];

    /// Returns the display name of the tile
    pub fn as_str(&self) -> &'static str {
        match self {
            Tile::Tas => "TAS",
            Tile::Tasw => "TASW",
            Tile::Ist => "IST",
        }
    }
}

impl fmt::Display for Tile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The earliest (toolchain version, release version) combination at which a
/// release began shipping a Go toolchain version.
///
/// Empty fields mean "unknown" (fetch failed or no such pairing exists).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VersionPair {
    pub golang_version: String,
    pub release_version: String,
}

/// Bump status of one release in one tile.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", content = "version", rename_all = "snake_case")]
pub enum TileStatus {
    /// The release ships no component in this tile.
    NotApplicable,
    /// The tile has not picked up the required release version. Carries the
    /// tile's observed version when it is known.
    NotYet(Option<String>),
    /// The tile's component version is at or above the required release
    /// version. Carries the observed version.
    Bumped(String),
}

impl TileStatus {
    /// Whether this status counts towards "all tiles bumped".
    pub fn satisfied(&self) -> bool {
        matches!(self, TileStatus::NotApplicable | TileStatus::Bumped(_))
    }
}

impl fmt::Display for TileStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TileStatus::NotApplicable => write!(f, "n/a"),
            TileStatus::NotYet(None) => write!(f, "no"),
            TileStatus::NotYet(Some(version)) => write!(f, "no ({version})"),
            TileStatus::Bumped(version) => write!(f, "yes ({version})"),
        }
    }
}

/// One report row: a release and how far the target toolchain has propagated
/// through it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReleaseReport {
    pub name: String,
    pub url: String,
    pub ci_url: String,
    pub ci_badge_url: String,
    pub version_on_dev: String,
    pub released_version: String,
    pub first_released_golang_version: String,
    pub first_released_release_version: String,
    pub bumped_in_tas: TileStatus,
    pub bumped_in_tasw: TileStatus,
    pub bumped_in_ist: TileStatus,
    pub all_bumped: bool,
}

impl ReleaseReport {
    pub fn tile_status(&self, tile: Tile) -> &TileStatus {
        match tile {
            Tile::Tas => &self.bumped_in_tas,
            Tile::Tasw => &self.bumped_in_tasw,
            Tile::Ist => &self.bumped_in_ist,
        }
    }
}

/// Result of one fetch pass, immutable once assembled.
///
/// Rows keep the configured release order and are never dropped: when every
/// fetch for a release fails its fields degrade to empty/`NotYet` instead.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReportSnapshot {
    pub golang_version: String,
    pub releases: Vec<ReleaseReport>,
}
