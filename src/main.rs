use anyhow::Context;
use clap::{Parser, Subcommand};
use std::time::Duration;
use synclyrics::config;
use synclyrics::lyrics::lrclib::LrclibClient;
use synclyrics::lyrics::netease::NeteaseClient;
use synclyrics::lyrics::query::{clean_artist, clean_title};
use synclyrics::lyrics::{SyncedLyrics, SyncedLyricsSearcher};

#[derive(Debug, Parser)]
#[command(name = "synclyrics", version, about = "Find synced lyrics across lyric sources")]
struct Cli {
    /// Override config file path.
    #[arg(long)]
    config: Option<std::path::PathBuf>,

    /// Log each source decision to stderr.
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Look up lyrics for a track.
    Search {
        track: String,
        artist: String,
        /// Ask every source and print each result.
        #[arg(long)]
        all: bool,
        /// Accept plain lyrics when no synced lyrics are found.
        #[arg(long)]
        allow_plain: bool,
        /// Comma-separated provider order, overriding the config.
        #[arg(long, value_delimiter = ',')]
        providers: Option<Vec<String>>,
        /// Print only the line playing at this position (ms or mm:ss).
        #[arg(long, value_parser = parse_position)]
        at: Option<u64>,
        /// Strip "(Official Video)", "- Topic" and similar before searching.
        #[arg(long)]
        clean: bool,
        /// Print results as JSON.
        #[arg(long)]
        json: bool,
        /// Ask LRCLIB for an exact match of this length (seconds) only.
        #[arg(long, conflicts_with_all = ["all", "translation"])]
        duration: Option<u32>,
        /// Fetch NetEase's translated lyrics instead of the original.
        #[arg(long, conflicts_with = "all")]
        translation: bool,
    },

    /// List lyrics providers.
    Providers {
        #[command(subcommand)]
        cmd: Option<ProvidersCommand>,
    },
}

#[derive(Debug, Subcommand)]
enum ProvidersCommand {
    /// Save a provider order to the config.
    Set { names: Vec<String> },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_max_level(if cli.verbose {
            tracing::Level::DEBUG
        } else {
            tracing::Level::WARN
        })
        .with_target(false)
        .with_level(true)
        .init();

    let cfg = config::load(cli.config.as_deref()).context("load config")?;

    match cli.command {
        Command::Search {
            track,
            artist,
            all,
            allow_plain,
            providers,
            at,
            clean,
            json,
            duration,
            translation,
        } => {
            let mut lyrics_cfg = cfg.lyrics.clone();
            if let Some(providers) = providers {
                lyrics_cfg.providers = providers;
            }
            let (track, artist) = if clean {
                (clean_title(&track), clean_artist(&artist))
            } else {
                (track, artist)
            };

            let request_timeout = lyrics_cfg.request_timeout_secs.map(Duration::from_secs);
            let direct = if let Some(secs) = duration {
                let client = LrclibClient::new(request_timeout)?;
                Some((LrclibClient::NAME, client.get_by_duration(&track, &artist, secs).await))
            } else if translation {
                let client = NeteaseClient::new(request_timeout)?;
                Some((NeteaseClient::NAME, client.get_translation(&track, &artist).await))
            } else {
                None
            };

            if let Some((source, result)) = direct {
                let found = result
                    .with_context(|| format!("{source} lookup"))?
                    .map(|raw| SyncedLyrics::from_raw(&track, &artist, raw, source));
                match found {
                    Some(lyrics) if json => println!("{}", serde_json::to_string_pretty(&lyrics)?),
                    Some(lyrics) => print_lyrics(&lyrics, at),
                    None => println!("No lyrics found."),
                }
                return Ok(());
            }

            let searcher = lyrics_cfg.build_searcher().context("build lyrics searcher")?;

            if all {
                let results = searcher.search_all(&track, &artist).await;
                if json {
                    println!("{}", serde_json::to_string_pretty(&results)?);
                } else if results.is_empty() {
                    println!("No lyrics found.");
                } else {
                    for lyrics in &results {
                        print_lyrics(lyrics, at);
                        println!();
                    }
                }
                return Ok(());
            }

            let synced_only = lyrics_cfg.synced_only && !allow_plain;
            match searcher.search(&track, &artist, synced_only).await {
                Some(lyrics) if json => println!("{}", serde_json::to_string_pretty(&lyrics)?),
                Some(lyrics) => print_lyrics(&lyrics, at),
                None => println!("No lyrics found."),
            }
        }
        Command::Providers { cmd: None } => {
            println!("Available: {}", SyncedLyricsSearcher::available_providers().join(", "));
            let active = cfg.lyrics.build_searcher().context("build lyrics searcher")?;
            println!("Active:    {}", active.active_providers().join(", "));
        }
        Command::Providers {
            cmd: Some(ProvidersCommand::Set { names }),
        } => {
            let mut cfg = cfg;
            cfg.lyrics.providers = names;
            let active = cfg.lyrics.build_searcher().context("build lyrics searcher")?;
            config::save(&cfg, cli.config.as_deref()).context("save config")?;
            println!("Active providers: {}", active.active_providers().join(", "));
        }
    }

    Ok(())
}

fn print_lyrics(lyrics: &SyncedLyrics, at: Option<u64>) {
    println!("# {} - {} (source: {})", lyrics.artist, lyrics.track, lyrics.source);

    if let Some(ms) = at {
        match lyrics.line_at(ms) {
            Some(line) => println!("{} {}", line.timestamp, line.text),
            None if lyrics.lines.is_empty() => println!("(lyrics are not synced)"),
            None => println!("(before first line)"),
        }
        return;
    }

    if lyrics.lines.is_empty() {
        println!("{}", lyrics.to_lrc());
    } else {
        for line in &lyrics.lines {
            println!("{} {}", line.timestamp, line.text);
        }
    }
}

/// Accepts plain milliseconds or `mm:ss`.
fn parse_position(s: &str) -> Result<u64, String> {
    if let Some((min, sec)) = s.split_once(':') {
        let min: u64 = min.trim().parse().map_err(|_| format!("bad minutes in {s:?}"))?;
        let sec: f64 = sec.trim().parse().map_err(|_| format!("bad seconds in {s:?}"))?;
        if !(0.0..60.0).contains(&sec) {
            return Err(format!("seconds out of range in {s:?}"));
        }
        return min
            .checked_mul(60_000)
            .and_then(|ms| ms.checked_add((sec * 1000.0).round() as u64))
            .ok_or_else(|| format!("position too large: {s:?}"));
    }
    s.trim().parse().map_err(|_| format!("expected ms or mm:ss, got {s:?}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_position() {
        assert_eq!(parse_position("1500"), Ok(1500));
        assert_eq!(parse_position("01:23"), Ok(83_000));
        assert_eq!(parse_position("1:02.5"), Ok(62_500));
        assert!(parse_position("1:75").is_err());
        assert!(parse_position("abc").is_err());
        assert!(parse_position(&format!("{}:00", u64::MAX)).is_err());
        assert!(parse_position(&format!("{}:00", u64::MAX / 60_000 + 1)).is_err());
    }

    #[test]
    fn test_direct_lookup_flags() {
        let cli = Cli::try_parse_from(["synclyrics", "search", "Lemon", "Kenshi Yonezu", "--duration", "255"])
            .unwrap();
        match cli.command {
            Command::Search { duration, translation, .. } => {
                assert_eq!(duration, Some(255));
                assert!(!translation);
            }
            _ => panic!("expected search"),
        }

        let cli = Cli::try_parse_from(["synclyrics", "search", "Lemon", "Kenshi Yonezu", "--translation"])
            .unwrap();
        assert!(matches!(cli.command, Command::Search { translation: true, .. }));

        assert!(
            Cli::try_parse_from(["synclyrics", "search", "a", "b", "--all", "--translation"]).is_err()
        );
    }
}
