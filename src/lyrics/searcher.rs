//! Fallback search across lyric sources.
//!
//! Sources are asked one at a time in priority order. `search` stops at the
//! first acceptable result; `search_all` asks everyone.

use std::time::Duration;

use super::document::SyncedLyrics;
use super::lrclib::LrclibClient;
use super::megalobiz::MegalobizClient;
use super::netease::NeteaseClient;
use super::parser;
use super::source::{Lookup, LyricsSource};

/// Every provider name this crate can build, in default priority order.
pub const PROVIDERS: [&str; 3] = [
    LrclibClient::NAME,
    NeteaseClient::NAME,
    MegalobizClient::NAME,
];

/// Per-source settings applied when building providers by name.
#[derive(Debug, Clone, Default)]
pub struct SourceOptions {
    /// HTTP timeout override; each provider has its own default
    pub request_timeout: Option<Duration>,
}

/// Build a provider by name. Unknown names yield `Ok(None)`.
pub fn build_source(
    name: &str,
    opts: &SourceOptions,
) -> anyhow::Result<Option<Box<dyn LyricsSource>>> {
    let source: Box<dyn LyricsSource> = match name {
        LrclibClient::NAME => Box::new(LrclibClient::new(opts.request_timeout)?),
        NeteaseClient::NAME => Box::new(NeteaseClient::new(opts.request_timeout)?),
        MegalobizClient::NAME => Box::new(MegalobizClient::new(opts.request_timeout)?),
        _ => return Ok(None),
    };
    Ok(Some(source))
}

pub struct SyncedLyricsSearcher {
    sources: Vec<Box<dyn LyricsSource>>,
    source_timeout: Option<Duration>,
}

impl SyncedLyricsSearcher {
    /// Searcher over the named providers, in the given order.
    ///
    /// `None` means [`PROVIDERS`] in default order. Unknown names are dropped
    /// and duplicates are kept, so a name listed twice is queried twice.
    pub fn new<S: AsRef<str>>(providers: Option<&[S]>) -> anyhow::Result<Self> {
        Self::with_options(providers, &SourceOptions::default())
    }

    pub fn with_options<S: AsRef<str>>(
        providers: Option<&[S]>,
        opts: &SourceOptions,
    ) -> anyhow::Result<Self> {
        let names: Vec<&str> = match providers {
            Some(list) => list.iter().map(|s| s.as_ref()).collect(),
            None => PROVIDERS.to_vec(),
        };

        let mut sources = Vec::with_capacity(names.len());
        for name in names {
            match build_source(name, opts)? {
                Some(source) => sources.push(source),
                None => tracing::warn!(provider = name, "unknown lyrics provider, ignoring"),
            }
        }

        Ok(Self::with_sources(sources))
    }

    /// Searcher over caller-built sources, queried in the given order.
    pub fn with_sources(sources: Vec<Box<dyn LyricsSource>>) -> Self {
        Self {
            sources,
            source_timeout: None,
        }
    }

    /// Give up on a single source after `timeout` and move to the next one.
    pub fn with_source_timeout(mut self, timeout: Duration) -> Self {
        self.source_timeout = Some(timeout);
        self
    }

    /// Names of the sources this searcher will query, in order.
    pub fn active_providers(&self) -> Vec<&str> {
        self.sources.iter().map(|s| s.name()).collect()
    }

    /// Every provider name that can be configured.
    pub fn available_providers() -> &'static [&'static str] {
        &PROVIDERS
    }

    /// First acceptable result in priority order.
    ///
    /// With `synced_only`, plain-text results are skipped rather than
    /// returned; the search moves on to the next source.
    pub async fn search(&self, track: &str, artist: &str, synced_only: bool) -> Option<SyncedLyrics> {
        for source in &self.sources {
            let Some(raw) = self.query(source.as_ref(), track, artist).await else {
                continue;
            };

            if synced_only && !parser::is_synced(&raw) {
                tracing::debug!(source = source.name(), "skipping unsynced lyrics");
                continue;
            }

            tracing::debug!(source = source.name(), "accepted lyrics");
            return Some(SyncedLyrics::from_raw(track, artist, raw, source.name()));
        }

        tracing::debug!(track, artist, "no lyrics found");
        None
    }

    /// Every source's result, in priority order, synced or not.
    pub async fn search_all(&self, track: &str, artist: &str) -> Vec<SyncedLyrics> {
        let mut results = Vec::new();
        for source in &self.sources {
            if let Some(raw) = self.query(source.as_ref(), track, artist).await {
                results.push(SyncedLyrics::from_raw(track, artist, raw, source.name()));
            }
        }
        results
    }

    async fn query(&self, source: &dyn LyricsSource, track: &str, artist: &str) -> Option<String> {
        let lookup = match self.source_timeout {
            Some(timeout) => match tokio::time::timeout(timeout, source.get_lyrics(track, artist)).await {
                Ok(lookup) => lookup,
                Err(_) => {
                    tracing::warn!(source = source.name(), ?timeout, "lyrics source timed out");
                    return None;
                }
            },
            None => source.get_lyrics(track, artist).await,
        };

        match lookup {
            Lookup::Found(text) if !text.is_empty() => Some(text),
            Lookup::Found(_) => None,
            Lookup::Absent { reason } => {
                match reason {
                    Some(reason) => tracing::debug!(source = source.name(), %reason, "lyrics source failed"),
                    None => tracing::debug!(source = source.name(), "no lyrics from source"),
                }
                None
            }
        }
    }
}
