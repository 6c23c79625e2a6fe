//! Report provider: one fetch pass across all releases, memoized
//!
//! The provider owns the single piece of mutable state in the crate: the
//! cached report snapshot and its timestamp. A `get` within the refresh
//! interval is served from the snapshot; otherwise one fetch pass runs to
//! completion and replaces it atomically. Concurrent `get` calls serialize
//! on the cache lock, so at most one pass executes at a time.

use std::time::{Duration, Instant};

use futures::future::join_all;
use tokio::sync::Mutex;
use tracing::{info, warn};

use crate::config::{Config, DEFAULT_REFRESH_INTERVAL, Release, TILE_METADATA_REF};
use crate::report::evaluator::evaluate;
use crate::report::types::{ReleaseReport, ReportSnapshot, VersionPair};
use crate::source::ReleaseSource;
use crate::tiles::TileVersionSource;

struct CachedSnapshot {
    fetched_at: Instant,
    snapshot: ReportSnapshot,
}

/// Serves bump progress reports, refreshing at most once per interval.
pub struct ReportProvider<S, T> {
    source: S,
    tiles: T,
    config: Config,
    refresh_interval: Duration,
    cached: Mutex<Option<CachedSnapshot>>,
}

impl<S: ReleaseSource, T: TileVersionSource> ReportProvider<S, T> {
    pub fn new(source: S, tiles: T, config: Config) -> Self {
        Self::with_refresh_interval(source, tiles, config, DEFAULT_REFRESH_INTERVAL)
    }

    pub fn with_refresh_interval(
        source: S,
        tiles: T,
        config: Config,
        refresh_interval: Duration,
    ) -> Self {
        Self {
            source,
            tiles,
            config,
            refresh_interval,
            cached: Mutex::new(None),
        }
    }

    /// Current report for the target Go version.
    ///
    /// The cache is keyed by freshness only: a fresh snapshot built for a
    /// different target is served unchanged (with a warning) until the
    /// interval expires.
    pub async fn get(&self, target_golang_version: &str) -> ReportSnapshot {
        let mut cached = self.cached.lock().await;

        if let Some(entry) = cached.as_ref() {
            if entry.fetched_at.elapsed() < self.refresh_interval {
                if entry.snapshot.golang_version != target_golang_version {
                    warn!(
                        "serving cached snapshot for target {} to a request for target {}",
                        entry.snapshot.golang_version, target_golang_version
                    );
                }
                return entry.snapshot.clone();
            }
        }

        info!("fetching new bump progress data");
        let snapshot = self.fetch(target_golang_version).await;
        *cached = Some(CachedSnapshot {
            fetched_at: Instant::now(),
            snapshot: snapshot.clone(),
        });
        snapshot
    }

    /// One full fetch pass. Failures degrade individual fields; the pass
    /// itself always produces a snapshot with one row per configured release,
    /// in configured order.
    async fn fetch(&self, target_golang_version: &str) -> ReportSnapshot {
        if let Err(e) = self.tiles.refresh(TILE_METADATA_REF).await {
            warn!("failed to refresh tile versions: {}", e);
        }

        let rows = join_all(
            self.config
                .releases
                .iter()
                .map(|release| self.release_report(release, target_golang_version)),
        )
        .await;

        ReportSnapshot {
            golang_version: target_golang_version.to_string(),
            releases: rows,
        }
    }

    async fn release_report(
        &self,
        release: &Release,
        target_golang_version: &str,
    ) -> ReleaseReport {
        let version_on_dev = match self.source.develop_version(release).await {
            Ok(version) => version,
            Err(e) => {
                warn!("failed to get develop version for {}: {}", release.name, e);
                String::new()
            }
        };

        let mut released_version = String::new();
        let mut first: Option<VersionPair> = None;

        if !release.only_develop {
            match self.source.released_version(release).await {
                Ok(version) => {
                    released_version = version;
                    match self
                        .source
                        .first_release_carrying(release, &released_version)
                        .await
                    {
                        Ok(pair) => first = Some(pair),
                        Err(e) => {
                            warn!(
                                "failed to get first released version for {}: {}",
                                release.name, e
                            );
                        }
                    }
                }
                Err(e) => {
                    warn!("failed to get released version for {}: {}", release.name, e);
                }
            }
        }

        let eval = evaluate(&self.tiles, release, first.as_ref(), target_golang_version);
        let first = first.unwrap_or_default();

        ReleaseReport {
            name: release.name.clone(),
            url: release.url.clone(),
            ci_url: self.config.ci_url(release),
            ci_badge_url: self.config.ci_badge_url(release),
            version_on_dev,
            released_version,
            first_released_golang_version: first.golang_version,
            first_released_release_version: first.release_version,
            bumped_in_tas: eval.tas,
            bumped_in_tasw: eval.tasw,
            bumped_in_ist: eval.ist,
            all_bumped: eval.all_bumped,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::error::FetchError;
    use crate::report::types::TileStatus;
    use crate::source::MockReleaseSource;
    use crate::tiles::MockTileVersionSource;

    fn release(name: &str) -> Release {
        Release {
            name: name.to_string(),
            url: format!("https://github.com/cloudfoundry/{name}"),
            owner: "cloudfoundry".to_string(),
            repo: name.to_string(),
            tas_release_name: Some(name.to_string()),
            ..Release::default()
        }
    }

    fn config_with(releases: Vec<Release>) -> Config {
        Config {
            ci_base_url: "https://ci.example.com".to_string(),
            releases,
            ..Config::default()
        }
    }

    fn happy_source(golang: &str, first_release: &str) -> MockReleaseSource {
        let golang = golang.to_string();
        let first_release = first_release.to_string();
        let mut source = MockReleaseSource::new();
        source
            .expect_develop_version()
            .returning(|_| Ok("1.22.1".to_string()));
        source
            .expect_released_version()
            .returning(|_| Ok("2.5.0".to_string()));
        source
            .expect_first_release_carrying()
            .returning(move |_, _| {
                Ok(VersionPair {
                    golang_version: golang.clone(),
                    release_version: first_release.clone(),
                })
            });
        source
    }

    fn tiles_at(version: &str) -> MockTileVersionSource {
        let version = version.to_string();
        let mut tiles = MockTileVersionSource::new();
        tiles.expect_refresh().returning(|_| Ok(()));
        tiles
            .expect_component_version()
            .returning(move |_, _| Some(version.clone()));
        tiles
    }

    #[tokio::test]
    async fn snapshot_keeps_configured_release_count_and_order_when_everything_fails() {
        let mut source = MockReleaseSource::new();
        source
            .expect_develop_version()
            .returning(|_| Err(FetchError::NotFound("dev".to_string())));
        source
            .expect_released_version()
            .returning(|_| Err(FetchError::NotFound("released".to_string())));
        source.expect_first_release_carrying().times(0);

        let mut tiles = MockTileVersionSource::new();
        tiles
            .expect_refresh()
            .returning(|_| Err(FetchError::NotFound("tiles".to_string())));

        let config = config_with(vec![release("routing"), release("diego"), release("uaa")]);
        let provider = ReportProvider::new(source, tiles, config);

        let snapshot = provider.get("1.21").await;

        assert_eq!(snapshot.golang_version, "1.21");
        let names: Vec<_> = snapshot.releases.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["routing", "diego", "uaa"]);
        for row in &snapshot.releases {
            assert_eq!(row.version_on_dev, "");
            assert_eq!(row.released_version, "");
            assert_eq!(row.first_released_golang_version, "");
            assert_eq!(row.bumped_in_tas, TileStatus::NotYet(None));
            assert!(!row.all_bumped);
        }
    }

    #[tokio::test]
    async fn fetched_rows_carry_versions_and_ci_links() {
        let source = happy_source("1.21", "2.3.0");
        let tiles = tiles_at("2.3.0");
        let mut cfg_release = release("routing");
        cfg_release.ci_team = "networking".to_string();
        cfg_release.ci_pipeline = "routing".to_string();
        let provider = ReportProvider::new(source, tiles, config_with(vec![cfg_release]));

        let snapshot = provider.get("1.21").await;

        let row = &snapshot.releases[0];
        assert_eq!(row.version_on_dev, "1.22.1");
        assert_eq!(row.released_version, "2.5.0");
        assert_eq!(row.first_released_golang_version, "1.21");
        assert_eq!(row.first_released_release_version, "2.3.0");
        assert_eq!(row.bumped_in_tas, TileStatus::Bumped("2.3.0".to_string()));
        assert_eq!(row.bumped_in_tasw, TileStatus::NotApplicable);
        assert!(row.all_bumped);
        assert_eq!(
            row.ci_url,
            "https://ci.example.com/teams/networking/pipelines/routing"
        );
        assert_eq!(
            row.ci_badge_url,
            "https://ci.example.com/api/v1/teams/networking/pipelines/routing/badge"
        );
    }

    #[tokio::test]
    async fn only_develop_release_skips_release_fetches() {
        let mut source = MockReleaseSource::new();
        source
            .expect_develop_version()
            .returning(|_| Ok("1.22.1".to_string()));
        source.expect_released_version().times(0);
        source.expect_first_release_carrying().times(0);

        let mut tiles = MockTileVersionSource::new();
        tiles.expect_refresh().returning(|_| Ok(()));
        tiles.expect_component_version().times(0);

        let mut cfg_release = release("bpm");
        cfg_release.only_develop = true;
        let provider = ReportProvider::new(source, tiles, config_with(vec![cfg_release]));

        let snapshot = provider.get("1.21").await;

        let row = &snapshot.releases[0];
        assert_eq!(row.version_on_dev, "1.22.1");
        assert_eq!(row.released_version, "");
        assert_eq!(row.bumped_in_tas, TileStatus::NotApplicable);
        assert!(row.all_bumped);
    }

    #[tokio::test]
    async fn get_within_interval_serves_cached_snapshot_without_refetching() {
        let mut source = MockReleaseSource::new();
        source
            .expect_develop_version()
            .times(1)
            .returning(|_| Ok("1.22.1".to_string()));
        source
            .expect_released_version()
            .times(1)
            .returning(|_| Ok("2.5.0".to_string()));
        source
            .expect_first_release_carrying()
            .times(1)
            .returning(|_, _| {
                Ok(VersionPair {
                    golang_version: "1.21".to_string(),
                    release_version: "2.3.0".to_string(),
                })
            });
        let mut tiles = MockTileVersionSource::new();
        tiles.expect_refresh().times(1).returning(|_| Ok(()));
        tiles
            .expect_component_version()
            .returning(|_, _| Some("2.3.0".to_string()));

        let provider = ReportProvider::new(source, tiles, config_with(vec![release("routing")]));

        let first = provider.get("1.21").await;
        let second = provider.get("1.21").await;

        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn get_with_different_target_within_interval_returns_stale_snapshot() {
        let source = happy_source("1.21", "2.3.0");
        let tiles = tiles_at("2.3.0");
        let provider = ReportProvider::new(source, tiles, config_with(vec![release("routing")]));

        let first = provider.get("1.21").await;
        let second = provider.get("1.22").await;

        // Still the snapshot built for 1.21.
        assert_eq!(second.golang_version, "1.21");
        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn get_after_interval_expiry_runs_exactly_one_new_pass() {
        let mut source = MockReleaseSource::new();
        source
            .expect_develop_version()
            .times(2)
            .returning(|_| Ok("1.22.1".to_string()));
        source
            .expect_released_version()
            .times(2)
            .returning(|_| Ok("2.5.0".to_string()));
        source
            .expect_first_release_carrying()
            .times(2)
            .returning(|_, _| {
                Ok(VersionPair {
                    golang_version: "1.21".to_string(),
                    release_version: "2.3.0".to_string(),
                })
            });
        let mut tiles = MockTileVersionSource::new();
        tiles.expect_refresh().times(2).returning(|_| Ok(()));
        tiles
            .expect_component_version()
            .returning(|_, _| Some("2.3.0".to_string()));

        let provider = ReportProvider::with_refresh_interval(
            source,
            tiles,
            config_with(vec![release("routing")]),
            Duration::ZERO,
        );

        provider.get("1.21").await;
        provider.get("1.21").await;
    }

    #[tokio::test]
    async fn tile_refresh_failure_does_not_abort_the_pass() {
        let source = happy_source("1.21", "2.3.0");
        let mut tiles = MockTileVersionSource::new();
        tiles
            .expect_refresh()
            .returning(|_| Err(FetchError::InvalidResponse("boom".to_string())));
        tiles.expect_component_version().returning(|_, _| None);

        let provider = ReportProvider::new(source, tiles, config_with(vec![release("routing")]));

        let snapshot = provider.get("1.21").await;

        assert_eq!(snapshot.releases.len(), 1);
        assert_eq!(snapshot.releases[0].bumped_in_tas, TileStatus::NotYet(None));
        assert!(!snapshot.releases[0].all_bumped);
    }
}
