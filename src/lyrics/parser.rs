//! LRC format parser
//!
//! Parses synchronized lyrics in LRC format:
//! [mm:ss.xx] Lyrics line here
//!
//! Example:
//! [00:12.34] Hello world
//! [00:15.000] Another line
//!
//! Only the leading tag of each line is read. Lines without one (metadata
//! tags like `[ti:Title]`, plain text) are skipped by the structured parse.

use serde::Serialize;

/// A single line of lyrics with timestamp
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LyricLine {
    /// Display label, always `[mm:ss.xx]`
    pub timestamp: String,
    /// The lyrics text, empty for instrumental gaps
    pub text: String,
    /// Offset from track start in milliseconds
    pub offset_ms: u64,
}

impl LyricLine {
    pub fn new(timestamp: impl Into<String>, text: impl Into<String>, offset_ms: u64) -> Self {
        Self {
            timestamp: timestamp.into(),
            text: text.into(),
            offset_ms,
        }
    }
}

/// Cheap check for timestamped content: any `[dd:dd` anywhere in the text.
///
/// This is deliberately looser than [`parse_lrc`]; a text that passes here
/// may still produce zero parsed lines.
pub fn is_synced(text: &str) -> bool {
    text.as_bytes().windows(6).any(|w| {
        w[0] == b'['
            && w[1].is_ascii_digit()
            && w[2].is_ascii_digit()
            && w[3] == b':'
            && w[4].is_ascii_digit()
            && w[5].is_ascii_digit()
    })
}

/// Parse LRC formatted lyrics into lines sorted by offset.
pub fn parse_lrc(content: &str) -> Vec<LyricLine> {
    let mut lines: Vec<LyricLine> = content
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .filter_map(parse_timed_line)
        .collect();

    // Stable, so lines sharing an offset keep their source order
    lines.sort_by_key(|l| l.offset_ms);
    lines
}

/// Parse a line like `[00:12.34]Lyrics`
fn parse_timed_line(line: &str) -> Option<LyricLine> {
    let rest = line.strip_prefix('[')?;
    let end = rest.find(']')?;
    let tag = Timestamp::parse(&rest[..end])?;
    let text = rest[end + 1..].trim();

    Some(LyricLine::new(tag.label(), text, tag.offset_ms()))
}

/// Components of a `mm:ss.fff` tag, fraction already widened to milliseconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Timestamp<'a> {
    minutes: &'a str,
    seconds: &'a str,
    millis: u64,
}

impl<'a> Timestamp<'a> {
    /// Accepts `mm:ss.xx`, `mm:ss:xx` and 3-digit fractions.
    fn parse(s: &'a str) -> Option<Self> {
        let (minutes, rest) = split_digits(s, 2)?;
        let rest = rest.strip_prefix(':')?;
        let (seconds, rest) = split_digits(rest, 2)?;

        let fraction = rest.trim_start_matches(['.', ':']);
        if fraction.len() == rest.len() {
            return None;
        }
        if !(2..=3).contains(&fraction.len()) || !fraction.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }

        // "34" is centiseconds, "340" is milliseconds
        let millis = fraction.parse::<u64>().ok()? * 10u64.pow(3 - fraction.len() as u32);

        Some(Self {
            minutes,
            seconds,
            millis,
        })
    }

    fn offset_ms(&self) -> u64 {
        // Both fields are validated as two ASCII digits
        let min: u64 = self.minutes.parse().unwrap_or_default();
        let sec: u64 = self.seconds.parse().unwrap_or_default();
        min * 60_000 + sec * 1000 + self.millis
    }

    /// Display label truncated to centiseconds.
    fn label(&self) -> String {
        format!("[{}:{}.{:02}]", self.minutes, self.seconds, self.millis / 10)
    }
}

/// Split off exactly `n` leading ASCII digits.
fn split_digits(s: &str, n: usize) -> Option<(&str, &str)> {
    let head = s.get(..n)?;
    if !head.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    Some((head, &s[n..]))
}
