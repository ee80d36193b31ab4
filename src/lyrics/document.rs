use serde::Serialize;

use super::parser::{self, LyricLine};

/// Lyrics found for one (track, artist) query.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SyncedLyrics {
    /// Track title as queried, not as the source reports it
    pub track: String,
    /// Artist as queried
    pub artist: String,
    /// Unmodified text returned by the source
    pub lrc: String,
    /// Timed lines sorted by offset; empty for plain-text results
    pub lines: Vec<LyricLine>,
    /// Name of the provider that produced this result
    pub source: String,
}

impl SyncedLyrics {
    /// Build a document from raw source text. Timed lines are only parsed
    /// out of text that looks synced.
    pub fn from_raw(
        track: impl Into<String>,
        artist: impl Into<String>,
        lrc: impl Into<String>,
        source: impl Into<String>,
    ) -> Self {
        let lrc = lrc.into();
        let lines = if parser::is_synced(&lrc) {
            parser::parse_lrc(&lrc)
        } else {
            Vec::new()
        };

        Self {
            track: track.into(),
            artist: artist.into(),
            lrc,
            lines,
            source: source.into(),
        }
    }

    pub fn to_lrc(&self) -> &str {
        &self.lrc
    }

    /// Whether the raw text carries timestamps. A synced document can still
    /// have no parsed lines when every tag is malformed.
    pub fn is_synced(&self) -> bool {
        parser::is_synced(&self.lrc)
    }

    /// Text of every non-empty line, newline-joined.
    pub fn plain_text(&self) -> String {
        self.lines
            .iter()
            .filter(|l| !l.text.is_empty())
            .map(|l| l.text.as_str())
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// The last line starting at or before `time_ms`.
    ///
    /// A time past the final line still returns the final line; a time
    /// before the first line returns `None`.
    pub fn line_at(&self, time_ms: u64) -> Option<&LyricLine> {
        let idx = self.lines.partition_point(|l| l.offset_ms <= time_ms);
        idx.checked_sub(1).map(|i| &self.lines[i])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_lyrics(lines: Vec<LyricLine>) -> SyncedLyrics {
        SyncedLyrics {
            track: "Test".to_string(),
            artist: "Artist".to_string(),
            lrc: String::new(),
            lines,
            source: "test".to_string(),
        }
    }

    #[test]
    fn test_lyric_line_creation() {
        let line = LyricLine::new("[01:23.45]", "Hello world", 83450);
        assert_eq!(line.timestamp, "[01:23.45]");
        assert_eq!(line.text, "Hello world");
        assert_eq!(line.offset_ms, 83450);
    }

    #[test]
    fn test_plain_text() {
        let lyrics = make_lyrics(vec![
            LyricLine::new("[00:01.00]", "Line 1", 1000),
            LyricLine::new("[00:01.50]", "", 1500),
            LyricLine::new("[00:02.00]", "Line 2", 2000),
        ]);
        assert_eq!(lyrics.plain_text(), "Line 1\nLine 2");
    }

    #[test]
    fn test_line_at() {
        let lyrics = make_lyrics(vec![
            LyricLine::new("[00:01.00]", "Line 1", 1000),
            LyricLine::new("[00:05.00]", "Line 2", 5000),
        ]);
        assert_eq!(lyrics.line_at(5000).unwrap().text, "Line 2");
        assert_eq!(lyrics.line_at(7000).unwrap().text, "Line 2");
        assert_eq!(lyrics.line_at(4999).unwrap().text, "Line 1");
        assert_eq!(lyrics.line_at(1000).unwrap().text, "Line 1");
        assert!(lyrics.line_at(500).is_none());
    }

    #[test]
    fn test_line_at_empty() {
        let lyrics = make_lyrics(Vec::new());
        assert!(lyrics.line_at(0).is_none());
        assert!(lyrics.line_at(10_000).is_none());
    }

    #[test]
    fn test_line_at_ties_pick_last() {
        let lyrics = make_lyrics(vec![
            LyricLine::new("[00:01.00]", "a", 1000),
            LyricLine::new("[00:01.00]", "b", 1000),
        ]);
        assert_eq!(lyrics.line_at(1000).unwrap().text, "b");
    }

    #[test]
    fn test_is_synced_follows_raw_text() {
        let lyrics = SyncedLyrics::from_raw("Song", "Artist", "[12:34] chapter", "megalobiz");
        assert!(lyrics.is_synced());
        assert!(lyrics.lines.is_empty());
    }

    #[test]
    fn test_from_raw() {
        let lyrics = SyncedLyrics::from_raw(
            "Song",
            "Artist",
            "[00:01.00]Line 1\n[00:02.00]Line 2",
            "lrclib",
        );
        assert!(lyrics.is_synced());
        assert_eq!(lyrics.plain_text(), "Line 1\nLine 2");
        assert_eq!(lyrics.source, "lrclib");

        let plain = SyncedLyrics::from_raw("Song", "Artist", "Line 1\nLine 2", "netease");
        assert!(!plain.is_synced());
        assert!(plain.lines.is_empty());
        assert_eq!(plain.to_lrc(), "Line 1\nLine 2");
    }
}
