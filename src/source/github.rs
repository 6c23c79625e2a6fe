//! GitHub-backed release source
//!
//! Develop-branch toolchain versions come from a raw file fetch
//! (`packages/golang-1-{platform}/version`), release information from the
//! GitHub Releases API. The toolchain version a release ships is extracted
//! from its release notes.

use regex::Regex;
use serde::Deserialize;
use tracing::warn;

use crate::config::Release;
use crate::report::error::FetchError;
use crate::report::types::VersionPair;
use crate::source::ReleaseSource;

/// Default base URL for the GitHub API
const DEFAULT_API_BASE_URL: &str = "https://api.github.com";

/// Default base URL for raw file access
const DEFAULT_RAW_BASE_URL: &str = "https://raw.githubusercontent.com";

/// Response from the GitHub Releases API
#[derive(Debug, Deserialize)]
struct GhRelease {
    tag_name: String,
    #[serde(default)]
    body: Option<String>,
    #[serde(default)]
    draft: bool,
    #[serde(default)]
    prerelease: bool,
}

/// Release source implementation backed by the GitHub API.
pub struct GithubReleaseSource {
    client: reqwest::Client,
    api_base_url: String,
    raw_base_url: String,
    golang_re: Regex,
}

impl GithubReleaseSource {
    /// Creates a new GithubReleaseSource with custom base URLs
    pub fn new(api_base_url: &str, raw_base_url: &str) -> Self {
        Self {
            client: reqwest::Client::builder()
                .user_agent("bump-progress")
                .build()
                .expect("Failed to create HTTP client"),
            api_base_url: api_base_url.to_string(),
            raw_base_url: raw_base_url.to_string(),
            golang_re: Regex::new(r"(?i)golang[^0-9]*(\d+\.\d+(?:\.\d+)?)")
                .expect("valid golang version pattern"),
        }
    }

    /// The Go version named in a release's notes, if any.
    fn golang_version_in(&self, release: &GhRelease) -> Option<String> {
        let body = release.body.as_deref()?;
        self.golang_re
            .captures(body)
            .map(|captures| captures[1].to_string())
    }

    async fn fetch_releases(&self, release: &Release) -> Result<Vec<GhRelease>, FetchError> {
        let url = format!(
            "{}/repos/{}/{}/releases?per_page=100",
            self.api_base_url, release.owner, release.repo
        );

        let response = self
            .client
            .get(&url)
            .header("Accept", "application/vnd.github+json")
            .send()
            .await?;

        let status = response.status();

        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(FetchError::NotFound(format!(
                "{}/{}",
                release.owner, release.repo
            )));
        }

        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            let retry_after = response
                .headers()
                .get("retry-after")
                .and_then(|v| v.to_str().ok())
                .and_then(|v| v.parse().ok());
            return Err(FetchError::RateLimited {
                retry_after_secs: retry_after,
            });
        }

        if !status.is_success() {
            warn!("GitHub API returned status {}: {}", status, url);
            return Err(FetchError::InvalidResponse(format!(
                "Unexpected status: {}",
                status
            )));
        }

        let releases: Vec<GhRelease> = response.json().await.map_err(|e| {
            warn!("Failed to parse GitHub releases response: {}", e);
            FetchError::InvalidResponse(e.to_string())
        })?;

        Ok(releases
            .into_iter()
            .filter(|r| !r.draft && !r.prerelease)
            .collect())
    }
}

impl Default for GithubReleaseSource {
    fn default() -> Self {
        Self::new(DEFAULT_API_BASE_URL, DEFAULT_RAW_BASE_URL)
    }
}

fn tags_match(a: &str, b: &str) -> bool {
    a.trim_start_matches('v') == b.trim_start_matches('v')
}

#[async_trait::async_trait]
impl ReleaseSource for GithubReleaseSource {
    async fn develop_version(&self, release: &Release) -> Result<String, FetchError> {
        let url = format!(
            "{}/{}/{}/develop/packages/golang-1-{}/version",
            self.raw_base_url, release.owner, release.repo, release.platform
        );

        let response = self.client.get(&url).send().await?;
        let status = response.status();

        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(FetchError::NotFound(url));
        }

        if !status.is_success() {
            warn!("raw file fetch returned status {}: {}", status, url);
            return Err(FetchError::InvalidResponse(format!(
                "Unexpected status: {}",
                status
            )));
        }

        let body = response.text().await.map_err(|e| {
            warn!("Failed to read develop version for {}: {}", release.name, e);
            FetchError::InvalidResponse(e.to_string())
        })?;

        Ok(body.trim().to_string())
    }

    async fn released_version(&self, release: &Release) -> Result<String, FetchError> {
        let url = format!(
            "{}/repos/{}/{}/releases/latest",
            self.api_base_url, release.owner, release.repo
        );

        let response = self
            .client
            .get(&url)
            .header("Accept", "application/vnd.github+json")
            .send()
            .await?;

        let status = response.status();

        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(FetchError::NotFound(format!(
                "latest release of {}/{}",
                release.owner, release.repo
            )));
        }

        if !status.is_success() {
            warn!("GitHub API returned status {}: {}", status, url);
            return Err(FetchError::InvalidResponse(format!(
                "Unexpected status: {}",
                status
            )));
        }

        let latest: GhRelease = response.json().await.map_err(|e| {
            warn!("Failed to parse latest release response: {}", e);
            FetchError::InvalidResponse(e.to_string())
        })?;

        Ok(latest.tag_name)
    }

    async fn first_release_carrying(
        &self,
        release: &Release,
        released_version: &str,
    ) -> Result<VersionPair, FetchError> {
        let releases = self.fetch_releases(release).await?;

        // Releases come back newest first.
        let start = releases
            .iter()
            .position(|r| tags_match(&r.tag_name, released_version))
            .ok_or_else(|| {
                FetchError::NotFound(format!(
                    "release {} of {}/{}",
                    released_version, release.owner, release.repo
                ))
            })?;

        let golang_version = self.golang_version_in(&releases[start]).ok_or_else(|| {
            FetchError::InvalidResponse(format!(
                "no golang version in release notes of {} {}",
                release.name, released_version
            ))
        })?;

        // Walk back through older releases while they carry the same
        // toolchain version; the oldest consecutive one is the first carrier.
        let mut first = &releases[start];
        for candidate in &releases[start + 1..] {
            match self.golang_version_in(candidate) {
                Some(v) if v == golang_version => first = candidate,
                _ => break,
            }
        }

        Ok(VersionPair {
            golang_version,
            release_version: first.tag_name.clone(),
        })
    }
}
