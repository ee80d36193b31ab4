//! Megalobiz scraper
//!
//! Megalobiz hosts user-made LRC files. There is no API, so this searches the
//! site and pulls the LRC body out of the page HTML.

use std::time::Duration;

use anyhow::Context;
use async_trait::async_trait;
use once_cell::sync::Lazy;
use regex::Regex;
use reqwest::header::{ACCEPT, HeaderMap, HeaderValue, USER_AGENT};

use super::query::clean_query;
use super::source::{Lookup, LyricsSource};

static MAKER_LINK: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"href="(/lrc/maker/[^"]+\.megalobiz)""#).expect("maker link regex")
});
static ANY_LRC_LINK: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"href="(/lrc/[^"]+)""#).expect("lrc link regex"));

static CONTENT_BLOCKS: Lazy<Vec<Regex>> = Lazy::new(|| {
    [
        r#"(?i)<div[^>]*id="lrc_\d+_lyrics"[^>]*>([\s\S]*?)</div>"#,
        r#"(?i)<pre[^>]*class="[^"]*lyrics[^"]*"[^>]*>([\s\S]*?)</pre>"#,
        r#"(?i)<div[^>]*class="[^"]*lrc-content[^"]*"[^>]*>([\s\S]*?)</div>"#,
    ]
    .iter()
    .map(|p| Regex::new(p).expect("content block regex"))
    .collect()
});
static TIMED_FRAGMENT: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(\[\d{2}:\d{2}[.:]\d{2,3}\][^\[]+)").expect("timed fragment regex")
});

static BR_TAG: Lazy<Regex> = Lazy::new(|| Regex::new(r"<br\s*/?>").expect("br regex"));
static ANY_TAG: Lazy<Regex> = Lazy::new(|| Regex::new(r"<[^>]+>").expect("tag regex"));

#[derive(Debug, Clone)]
pub struct MegalobizClient {
    client: reqwest::Client,
}

impl MegalobizClient {
    pub const NAME: &'static str = "megalobiz";
    const BASE_URL: &'static str = "https://www.megalobiz.com";
    const DEFAULT_TIMEOUT: Duration = Duration::from_secs(15);

    pub fn new(timeout: Option<Duration>) -> anyhow::Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(
            USER_AGENT,
            HeaderValue::from_static(
                "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36",
            ),
        );
        headers.insert(
            ACCEPT,
            HeaderValue::from_static("text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8"),
        );

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(timeout.unwrap_or(Self::DEFAULT_TIMEOUT))
            .build()
            .context("build megalobiz http client")?;

        Ok(Self { client })
    }

    pub async fn fetch(&self, track: &str, artist: &str) -> anyhow::Result<Option<String>> {
        let Some(lrc_url) = self.search(track, artist).await? else {
            return Ok(None);
        };
        tracing::debug!(source = Self::NAME, url = %lrc_url, "found lrc page");

        let Some(page) = self.get_page(&lrc_url).await? else {
            return Ok(None);
        };
        Ok(extract_lrc(&page))
    }

    async fn search(&self, track: &str, artist: &str) -> anyhow::Result<Option<String>> {
        let query = clean_query(&format!("{} {}", artist, track));
        let url = format!(
            "{}/search/all?qry={}&display=more",
            Self::BASE_URL,
            urlencoding::encode(&query)
        );

        let Some(page) = self.get_page(&url).await? else {
            return Ok(None);
        };
        Ok(first_lrc_link(&page).map(|path| format!("{}{}", Self::BASE_URL, path)))
    }

    async fn get_page(&self, url: &str) -> anyhow::Result<Option<String>> {
        let response = self.client.get(url).send().await.context("send megalobiz request")?;

        if !response.status().is_success() {
            tracing::debug!(source = Self::NAME, status = %response.status(), "page request failed");
            return Ok(None);
        }

        let body = response.text().await.context("read megalobiz page")?;
        Ok(Some(body))
    }
}

/// Path of the first LRC page linked from a search result page
fn first_lrc_link(html: &str) -> Option<&str> {
    MAKER_LINK
        .captures(html)
        .or_else(|| ANY_LRC_LINK.captures(html))
        .and_then(|c| c.get(1))
        .map(|m| m.as_str())
}

/// Pull LRC text out of an LRC page
fn extract_lrc(html: &str) -> Option<String> {
    for re in CONTENT_BLOCKS.iter() {
        if let Some(block) = re.captures(html).and_then(|c| c.get(1)) {
            return Some(clean_html(block.as_str()));
        }
    }

    let fragments: Vec<&str> = TIMED_FRAGMENT
        .find_iter(html)
        .map(|m| m.as_str())
        .collect();
    if fragments.is_empty() {
        None
    } else {
        Some(fragments.join("\n"))
    }
}

fn clean_html(block: &str) -> String {
    let text = BR_TAG.replace_all(block, "\n");
    let text = ANY_TAG.replace_all(&text, "");
    let text = text
        .replace("&nbsp;", " ")
        .replace("&amp;", "&")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&#39;", "'")
        .replace("&quot;", "\"");

    text.split('\n')
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}

#[async_trait]
impl LyricsSource for MegalobizClient {
    fn name(&self) -> &str {
        Self::NAME
    }

    async fn get_lyrics(&self, track: &str, artist: &str) -> Lookup {
        Lookup::from_result(self.fetch(track, artist).await)
    }
}
