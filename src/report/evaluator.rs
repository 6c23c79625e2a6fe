//! Per-release bump evaluation
//!
//! Decides whether the target Go toolchain version has reached a release,
//! and if so, whether each tile has picked up the release version that first
//! carried it. Every failure degrades a single status, never the whole
//! evaluation.

use semver::Version;
use tracing::warn;

use crate::config::Release;
use crate::report::semver::{parse_go_version, parse_version};
use crate::report::types::{Tile, TileStatus, VersionPair};
use crate::tiles::TileVersionSource;

/// Tile statuses for one release plus the derived "all tiles bumped" flag.
#[derive(Debug, Clone, PartialEq)]
pub struct TileEvaluation {
    pub tas: TileStatus,
    pub tasw: TileStatus,
    pub ist: TileStatus,
    pub all_bumped: bool,
}

impl TileEvaluation {
    fn uniform(status: TileStatus, all_bumped: bool) -> Self {
        Self {
            tas: status.clone(),
            tasw: status.clone(),
            ist: status,
            all_bumped,
        }
    }
}

/// Evaluate how far the target toolchain version has propagated into the
/// tiles for one release.
///
/// `first` is the earliest (toolchain, release) pair at which the release
/// began shipping its current toolchain; `None` means the upstream fetch
/// failed and every applicable tile degrades to not-yet.
pub fn evaluate<T: TileVersionSource + ?Sized>(
    tiles: &T,
    release: &Release,
    first: Option<&VersionPair>,
    target_golang_version: &str,
) -> TileEvaluation {
    // Develop-only releases have no stable-release concept; they are always
    // fully bumped and no tile ships them.
    if release.only_develop {
        return TileEvaluation::uniform(TileStatus::NotApplicable, true);
    }

    let Some(first) = first else {
        return degraded(release);
    };

    let Some(first_release_version) = parse_version(&first.release_version) else {
        warn!(
            "failed to parse first release version for {}: {:?}",
            release.name, first.release_version
        );
        return degraded(release);
    };

    let Some(first_golang_version) = parse_go_version(&first.golang_version) else {
        warn!(
            "failed to parse first golang version for {}: {:?}",
            release.name, first.golang_version
        );
        return degraded(release);
    };

    // Released iff the target is not strictly newer than the toolchain the
    // release already ships.
    let is_target_released = match parse_go_version(target_golang_version) {
        Some(target) => target <= first_golang_version,
        None => {
            warn!(
                "failed to parse target golang version: {}",
                target_golang_version
            );
            false
        }
    };

    let [tas, tasw, ist] = Tile::ALL.map(|tile| {
        tile_status(tiles, release, tile, &first_release_version, is_target_released)
    });

    let all_bumped =
        is_target_released && tas.satisfied() && tasw.satisfied() && ist.satisfied();

    TileEvaluation {
        tas,
        tasw,
        ist,
        all_bumped,
    }
}

/// Evaluation when the first-carrying pair is missing or unparseable: every
/// tile that ships the release is not-yet with no known version.
fn degraded(release: &Release) -> TileEvaluation {
    let [tas, tasw, ist] = Tile::ALL.map(|tile| match release.component_for(tile) {
        Some(_) => TileStatus::NotYet(None),
        None => TileStatus::NotApplicable,
    });
    TileEvaluation {
        tas,
        tasw,
        ist,
        all_bumped: false,
    }
}

fn tile_status<T: TileVersionSource + ?Sized>(
    tiles: &T,
    release: &Release,
    tile: Tile,
    required: &Version,
    is_target_released: bool,
) -> TileStatus {
    let Some(component) = release.component_for(tile) else {
        return TileStatus::NotApplicable;
    };

    if !is_target_released {
        return TileStatus::NotYet(None);
    }

    let Some(observed) = tiles.component_version(tile, component) else {
        warn!("failed to find {} release version for {}", tile, component);
        return TileStatus::NotYet(None);
    };

    let Some(observed_version) = parse_version(&observed) else {
        warn!(
            "failed to parse {} release version for {}: {:?}",
            tile, component, observed
        );
        return TileStatus::NotYet(None);
    };

    if observed_version >= *required {
        TileStatus::Bumped(observed_version.to_string())
    } else {
        TileStatus::NotYet(Some(observed_version.to_string()))
    }
}
