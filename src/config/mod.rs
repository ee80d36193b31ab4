use anyhow::Context;
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::lyrics::searcher::{PROVIDERS, SourceOptions, SyncedLyricsSearcher};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub lyrics: LyricsConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LyricsConfig {
    /// Provider names in priority order. Unknown names are ignored.
    pub providers: Vec<String>,
    /// Skip results without timestamps
    pub synced_only: bool,
    /// Deadline for one source before moving on to the next
    pub source_timeout_secs: Option<u64>,
    /// Overrides each provider's own HTTP timeout
    pub request_timeout_secs: Option<u64>,
}

impl Default for LyricsConfig {
    fn default() -> Self {
        Self {
            providers: PROVIDERS.iter().map(|p| p.to_string()).collect(),
            synced_only: true,
            source_timeout_secs: Some(20),
            request_timeout_secs: None,
        }
    }
}

impl LyricsConfig {
    pub fn build_searcher(&self) -> anyhow::Result<SyncedLyricsSearcher> {
        let opts = SourceOptions {
            request_timeout: self.request_timeout_secs.map(Duration::from_secs),
        };
        let searcher = SyncedLyricsSearcher::with_options(Some(self.providers.as_slice()), &opts)?;
        Ok(match self.source_timeout_secs {
            Some(secs) => searcher.with_source_timeout(Duration::from_secs(secs)),
            None => searcher,
        })
    }
}

pub fn save(cfg: &Config, override_path: Option<&Path>) -> anyhow::Result<()> {
    let path = match override_path {
        Some(p) => p.to_path_buf(),
        None => default_config_path()?,
    };
    write_config(cfg, &path)
}

pub fn default_config_path() -> anyhow::Result<PathBuf> {
    let proj =
        ProjectDirs::from("dev", "synclyrics", "synclyrics").context("ProjectDirs unavailable")?;
    Ok(proj.config_dir().join("config.toml"))
}

/// Load config, writing the defaults out first if the file does not exist.
pub fn load(override_path: Option<&Path>) -> anyhow::Result<Config> {
    let path = match override_path {
        Some(p) => p.to_path_buf(),
        None => default_config_path()?,
    };

    if !path.exists() {
        let cfg = Config::default();
        write_config(&cfg, &path)?;
        return Ok(cfg);
    }

    let raw = fs::read_to_string(&path).with_context(|| format!("read {}", path.display()))?;
    let cfg = toml::from_str::<Config>(&raw).with_context(|| format!("parse {}", path.display()))?;
    Ok(cfg)
}

fn write_config(cfg: &Config, path: &Path) -> anyhow::Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).with_context(|| format!("create dir {}", parent.display()))?;
    }
    let raw = toml::to_string_pretty(cfg).context("serialize config")?;
    fs::write(path, raw).with_context(|| format!("write {}", path.display()))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_config_uses_defaults() {
        let cfg: Config = toml::from_str("[lyrics]\nproviders = [\"netease\"]\n").unwrap();
        assert_eq!(cfg.lyrics.providers, vec!["netease"]);
        assert!(cfg.lyrics.synced_only);
        assert_eq!(cfg.lyrics.source_timeout_secs, Some(20));

        let empty: Config = toml::from_str("").unwrap();
        assert_eq!(empty, Config::default());
    }

    #[test]
    fn test_load_creates_default_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        let cfg = load(Some(&path)).unwrap();
        assert!(path.exists());
        assert_eq!(cfg, Config::default());
    }

    #[test]
    fn test_save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");

        let mut cfg = Config::default();
        cfg.lyrics.providers = vec!["megalobiz".to_string(), "lrclib".to_string()];
        cfg.lyrics.synced_only = false;
        save(&cfg, Some(&path)).unwrap();

        assert_eq!(load(Some(&path)).unwrap(), cfg);
    }

    #[test]
    fn test_build_searcher_drops_unknown() {
        let cfg = LyricsConfig {
            providers: vec!["netease".to_string(), "bogus".to_string(), "lrclib".to_string()],
            ..LyricsConfig::default()
        };
        let searcher = cfg.build_searcher().unwrap();
        assert_eq!(searcher.active_providers(), vec!["netease", "lrclib"]);
    }
}
