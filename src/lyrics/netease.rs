//! NetEase Cloud Music client
//!
//! Good coverage for Chinese, Japanese and Korean releases. No auth needed.

use std::time::Duration;

use anyhow::Context;
use async_trait::async_trait;
use reqwest::header::{ACCEPT, CONTENT_TYPE, HeaderMap, HeaderValue, REFERER, USER_AGENT};
use serde::Deserialize;

use super::source::{Lookup, LyricsSource};

#[derive(Debug, Deserialize)]
struct SearchResponse {
    result: Option<SearchResult>,
}

#[derive(Debug, Default, Deserialize)]
struct SearchResult {
    #[serde(default)]
    songs: Vec<Song>,
}

#[derive(Debug, Clone, Deserialize)]
struct Song {
    id: Option<u64>,
    #[serde(default)]
    name: String,
    #[serde(default)]
    artists: Vec<SongArtist>,
}

#[derive(Debug, Clone, Deserialize)]
struct SongArtist {
    #[serde(default)]
    name: String,
}

#[derive(Debug, Default, Deserialize)]
struct LyricResponse {
    lrc: Option<LyricBody>,
    klyric: Option<LyricBody>,
    tlyric: Option<LyricBody>,
}

#[derive(Debug, Default, Deserialize)]
struct LyricBody {
    lyric: Option<String>,
}

impl LyricBody {
    fn text(body: Option<Self>) -> Option<String> {
        body.and_then(|b| b.lyric).filter(|s| !s.is_empty())
    }
}

const SEARCH_URL: &str = "https://music.163.com/api/search/get";
const LYRICS_URL: &str = "https://music.163.com/api/song/lyric";

#[derive(Debug, Clone)]
pub struct NeteaseClient {
    client: reqwest::Client,
}

impl NeteaseClient {
    pub const NAME: &'static str = "netease";
    const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

    pub fn new(timeout: Option<Duration>) -> anyhow::Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(
            USER_AGENT,
            HeaderValue::from_static(
                "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36",
            ),
        );
        headers.insert(REFERER, HeaderValue::from_static("https://music.163.com"));
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(timeout.unwrap_or(Self::DEFAULT_TIMEOUT))
            .build()
            .context("build netease http client")?;

        Ok(Self { client })
    }

    /// Original-language lyrics, LRC when available, karaoke lyrics otherwise
    pub async fn fetch(&self, track: &str, artist: &str) -> anyhow::Result<Option<String>> {
        let Some(song_id) = self.search_song(track, artist).await? else {
            return Ok(None);
        };

        let Some(lyrics) = self.get_lyric_response(&lyric_url(song_id)).await? else {
            return Ok(None);
        };

        Ok(LyricBody::text(lyrics.lrc).or_else(|| LyricBody::text(lyrics.klyric)))
    }

    /// Translated lyrics, usually into Chinese or English
    pub async fn get_translation(&self, track: &str, artist: &str) -> anyhow::Result<Option<String>> {
        let Some(song_id) = self.search_song(track, artist).await? else {
            return Ok(None);
        };

        let lyrics = self.get_lyric_response(&translation_url(song_id)).await?;
        Ok(lyrics.and_then(|l| LyricBody::text(l.tlyric)))
    }

    async fn search_song(&self, track: &str, artist: &str) -> anyhow::Result<Option<u64>> {
        let response = self
            .client
            .post(SEARCH_URL)
            .header(CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(search_body(track, artist))
            .send()
            .await
            .context("send netease search")?;

        if !response.status().is_success() {
            tracing::debug!(source = Self::NAME, status = %response.status(), "search failed");
            return Ok(None);
        }

        let data: SearchResponse = response.json().await.context("parse netease search json")?;
        let songs = data.result.unwrap_or_default().songs;
        Ok(pick_song(&songs, track, artist))
    }

    async fn get_lyric_response(&self, url: &str) -> anyhow::Result<Option<LyricResponse>> {
        let response = self.client.get(url).send().await.context("send netease lyric")?;

        if !response.status().is_success() {
            tracing::debug!(source = Self::NAME, status = %response.status(), "lyric request failed");
            return Ok(None);
        }

        let lyrics = response.json().await.context("parse netease lyric json")?;
        Ok(Some(lyrics))
    }
}

/// Form body for a song search (type 1), top ten hits
fn search_body(track: &str, artist: &str) -> String {
    let query = format!("{} {}", track, artist);
    format!("s={}&type=1&limit=10&offset=0", urlencoding::encode(&query))
}

/// Original lyrics plus karaoke, no translation
fn lyric_url(song_id: u64) -> String {
    format!("{}?id={}&lv=1&kv=1&tv=-1", LYRICS_URL, song_id)
}

fn translation_url(song_id: u64) -> String {
    format!("{}?id={}&tv=1", LYRICS_URL, song_id)
}

/// First song whose title and some artist loosely match, else the first song.
/// Hits without an id are skipped.
fn pick_song(songs: &[Song], track: &str, artist: &str) -> Option<u64> {
    let track = track.to_lowercase();
    let artist = artist.to_lowercase();

    let overlaps = |a: &str, b: &str| a.contains(b) || b.contains(a);
    let candidates: Vec<&Song> = songs.iter().filter(|song| song.id.is_some()).collect();

    candidates
        .iter()
        .find(|song| {
            let name = song.name.to_lowercase();
            overlaps(&track, &name)
                && song
                    .artists
                    .iter()
                    .any(|a| overlaps(&artist, &a.name.to_lowercase()))
        })
        .or_else(|| candidates.first())
        .and_then(|song| song.id)
}

#[async_trait]
impl LyricsSource for NeteaseClient {
    fn name(&self) -> &str {
        Self::NAME
    }

    async fn get_lyrics(&self, track: &str, artist: &str) -> Lookup {
        Lookup::from_result(self.fetch(track, artist).await)
    }
}
