//! Find timestamped song lyrics across several lyric sources.

pub mod config;
pub mod lyrics;

pub use lyrics::{LyricLine, Lookup, LyricsSource, SyncedLyrics, SyncedLyricsSearcher};
