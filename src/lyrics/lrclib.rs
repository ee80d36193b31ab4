//! LRCLIB API client
//!
//! LRCLIB is a free lyrics API that provides synchronized (LRC format) lyrics.
//! API Documentation: https://lrclib.net/docs

use std::time::Duration;

use anyhow::Context;
use async_trait::async_trait;
use serde::Deserialize;

use super::source::{Lookup, LyricsSource};

/// LRCLIB API response
#[derive(Debug, Deserialize, Clone)]
pub struct LrclibResponse {
    id: i64,
    #[serde(rename = "trackName")]
    track_name: Option<String>,
    #[serde(rename = "plainLyrics")]
    pub plain_lyrics: Option<String>,
    #[serde(rename = "syncedLyrics")]
    pub synced_lyrics: Option<String>,
}

impl LrclibResponse {
    /// Synced lyrics if present, plain otherwise
    fn best_text(self) -> Option<String> {
        non_empty(self.synced_lyrics).or_else(|| non_empty(self.plain_lyrics))
    }
}

fn non_empty(s: Option<String>) -> Option<String> {
    s.filter(|s| !s.is_empty())
}

/// LRCLIB API client
#[derive(Debug, Clone)]
pub struct LrclibClient {
    client: reqwest::Client,
    base_url: String,
}

impl LrclibClient {
    pub const NAME: &'static str = "lrclib";
    const DEFAULT_BASE_URL: &'static str = "https://lrclib.net/api";
    const USER_AGENT: &'static str = concat!("synclyrics/", env!("CARGO_PKG_VERSION"));
    const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

    /// Create a new LRCLIB client
    pub fn new(timeout: Option<Duration>) -> anyhow::Result<Self> {
        Ok(Self {
            client: reqwest::Client::builder()
                .user_agent(Self::USER_AGENT)
                .timeout(timeout.unwrap_or(Self::DEFAULT_TIMEOUT))
                .build()
                .context("build lrclib http client")?,
            base_url: Self::DEFAULT_BASE_URL.to_string(),
        })
    }

    /// Get lyrics by track info, trying an exact match before search
    pub async fn fetch(&self, track_name: &str, artist_name: &str) -> anyhow::Result<Option<String>> {
        match self.get_exact(track_name, artist_name, None).await {
            Ok(Some(lyrics)) => return Ok(Some(lyrics)),
            Ok(None) => {}
            Err(e) => tracing::debug!(source = Self::NAME, "exact match failed: {e:#}"),
        }

        self.search(track_name, artist_name).await
    }

    /// Exact match narrowed by track duration, without the search fallback
    pub async fn get_by_duration(
        &self,
        track_name: &str,
        artist_name: &str,
        duration_secs: u32,
    ) -> anyhow::Result<Option<String>> {
        self.get_exact(track_name, artist_name, Some(duration_secs)).await
    }

    async fn get_exact(
        &self,
        track_name: &str,
        artist_name: &str,
        duration_secs: Option<u32>,
    ) -> anyhow::Result<Option<String>> {
        let url = exact_url(&self.base_url, track_name, artist_name, duration_secs);
        let response = self.client.get(&url).send().await.context("send lrclib get")?;

        if !response.status().is_success() {
            tracing::debug!(source = Self::NAME, status = %response.status(), "no exact match");
            return Ok(None);
        }

        let lyrics: LrclibResponse = response.json().await.context("parse lrclib get json")?;
        tracing::debug!(source = Self::NAME, id = lyrics.id, track = ?lyrics.track_name, "exact match");
        Ok(lyrics.best_text())
    }

    async fn search(&self, track_name: &str, artist_name: &str) -> anyhow::Result<Option<String>> {
        let url = search_url(&self.base_url, track_name, artist_name);
        let response = self.client.get(&url).send().await.context("send lrclib search")?;

        if !response.status().is_success() {
            tracing::debug!(source = Self::NAME, status = %response.status(), "search failed");
            return Ok(None);
        }

        let results: Vec<LrclibResponse> =
            response.json().await.context("parse lrclib search json")?;
        Ok(pick_search_result(results))
    }
}

fn exact_url(base_url: &str, track_name: &str, artist_name: &str, duration_secs: Option<u32>) -> String {
    let mut url = format!(
        "{}/get?track_name={}&artist_name={}",
        base_url,
        urlencoding::encode(track_name),
        urlencoding::encode(artist_name)
    );

    if let Some(duration) = duration_secs {
        url.push_str(&format!("&duration={}", duration));
    }
    url
}

/// Free-text search, artist first
fn search_url(base_url: &str, track_name: &str, artist_name: &str) -> String {
    let query = format!("{} {}", artist_name, track_name);
    format!("{}/search?q={}", base_url, urlencoding::encode(&query))
}

/// First result with synced lyrics, else the first result's plain lyrics
fn pick_search_result(results: Vec<LrclibResponse>) -> Option<String> {
    if let Some(synced) = results
        .iter()
        .find_map(|r| r.synced_lyrics.clone().filter(|s| !s.is_empty()))
    {
        return Some(synced);
    }
    results.into_iter().next().and_then(|r| non_empty(r.plain_lyrics))
}

#[async_trait]
impl LyricsSource for LrclibClient {
    fn name(&self) -> &str {
        Self::NAME
    }

    async fn get_lyrics(&self, track: &str, artist: &str) -> Lookup {
        Lookup::from_result(self.fetch(track, artist).await)
    }
}
