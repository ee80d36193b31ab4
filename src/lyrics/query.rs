//! Title and artist cleanup before hitting lyric sources.
//!
//! Catalog titles carry noise like "(Official Video)" or "- Topic" that
//! makes lyric lookups miss.

use once_cell::sync::Lazy;
use regex::Regex;

static TITLE_NOISE: Lazy<Vec<Regex>> = Lazy::new(|| {
    [
        r"(?i)\s*[\(\[](Official\s*)?(Music\s*)?(Video|Audio|Lyrics?|MV|M/V|HD|HQ|4K)[\)\]]",
        r"(?i)\s*[\(\[](Visualizer|Lyric Video|Audio Only)[\)\]]",
        r"(?i)\s*[\(\[]feat\.?[^\)\]]+[\)\]]",
        r"(?i)\s*[\(\[]ft\.?[^\)\]]+[\)\]]",
        r"(?i)\s*[\(\[]with\s+[^\)\]]+[\)\]]",
        r"(?i)\s*[\(\[]Remaster(ed)?[^\)\]]*[\)\]]",
        r"(?i)\s*[\(\[]\d{4}[^\)\]]*[\)\]]",
        r"(?i)\s*-\s*(Official\s*)?(Music\s*)?(Video|Audio)",
        r"(?i)\s*\|\s*.*$",
    ]
    .iter()
    .map(|p| Regex::new(p).expect("title noise regex"))
    .collect()
});

static WHITESPACE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").expect("whitespace regex"));
static TRAILING_DASH: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\s*[-–—]\s*$").expect("trailing dash regex"));
static TOPIC_SUFFIX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\s*-\s*Topic$").expect("topic regex"));
static VEVO_SUFFIX: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)VEVO$").expect("vevo regex"));
static BRACKETED: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\s*[\(\[].*?[\)\]]").expect("bracketed regex"));
static PUNCTUATION: Lazy<Regex> = Lazy::new(|| Regex::new(r"[^\w\s]").expect("punctuation regex"));

/// Strip video-style decorations from a song title.
pub fn clean_title(title: &str) -> String {
    let mut result = title.to_string();
    for re in TITLE_NOISE.iter() {
        result = re.replace_all(&result, "").into_owned();
    }

    let result = WHITESPACE.replace_all(&result, " ");
    let result = TRAILING_DASH.replace_all(&result, "");
    result.trim().to_string()
}

/// Strip channel suffixes ("- Topic", "VEVO") from an artist name.
pub fn clean_artist(artist: &str) -> String {
    let artist = TOPIC_SUFFIX.replace_all(artist, "");
    let artist = VEVO_SUFFIX.replace_all(&artist, "");
    artist.trim().to_string()
}

/// Reduce free text to words for search boxes that choke on punctuation.
pub fn clean_query(text: &str) -> String {
    let text = BRACKETED.replace_all(text, "");
    let text = PUNCTUATION.replace_all(&text, " ");
    let text = WHITESPACE.replace_all(&text, " ");
    text.trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clean_title() {
        assert_eq!(clean_title("Song (Official Video)"), "Song");
        assert_eq!(clean_title("Song [Official Audio]"), "Song");
        assert_eq!(clean_title("Song (feat. Someone)"), "Song");
        assert_eq!(clean_title("Song (Remastered 2011)"), "Song");
        assert_eq!(clean_title("Song - Official Music Video"), "Song");
        assert_eq!(clean_title("Song | Live at Wembley"), "Song");
        assert_eq!(clean_title("Song  Title -"), "Song Title");
        assert_eq!(clean_title("Plain Song"), "Plain Song");
    }

    #[test]
    fn test_clean_artist() {
        assert_eq!(clean_artist("Artist - Topic"), "Artist");
        assert_eq!(clean_artist("ArtistVEVO"), "Artist");
        assert_eq!(clean_artist(" Artist "), "Artist");
    }

    #[test]
    fn test_clean_query() {
        assert_eq!(clean_query("Queen Don't Stop Me Now (Remastered)"), "Queen Don t Stop Me Now");
        assert_eq!(clean_query("AC/DC  Back in Black"), "AC DC Back in Black");
    }
}
