//! Lyrics module for finding and reading synchronized lyrics
//!
//! This module provides:
//! - A `LyricsSource` contract and clients for LRCLIB, NetEase and Megalobiz
//! - A searcher that falls back across sources in priority order
//! - LRC format parser and the structured lyrics document

pub mod document;
pub mod lrclib;
pub mod megalobiz;
pub mod netease;
pub mod parser;
pub mod query;
pub mod searcher;
pub mod source;

pub use document::SyncedLyrics;
pub use parser::{LyricLine, is_synced, parse_lrc};
pub use searcher::{PROVIDERS, SourceOptions, SyncedLyricsSearcher};
pub use source::{Lookup, LyricsSource};
