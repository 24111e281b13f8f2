use std::path::PathBuf;

use thiserror::Error;

use crate::player::PlayerConfig;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("missing required setting {0}")]
    Missing(&'static str),
}

/// Runtime settings, read once at startup.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub bind_addr: String,
    pub tmdb_api_key: String,
    pub language: String,
    pub cache_dir: PathBuf,
    /// Upstream the image proxy fetches from.
    pub image_base_url: String,
    pub hero_dwell_secs: u64,
    pub hero_count: usize,
    pub player: PlayerConfig,
}

impl ServerConfig {
    /// Defaults for everything except the TMDB key.
    pub fn new(tmdb_api_key: impl Into<String>) -> Self {
        Self {
            bind_addr: "0.0.0.0:3000".to_string(),
            tmdb_api_key: tmdb_api_key.into(),
            language: nexplay_catalog::tmdb::DEFAULT_LANGUAGE.to_string(),
            cache_dir: PathBuf::from("/tmp/nexplay_cache"),
            image_base_url: nexplay_catalog::images::IMAGE_BASE.to_string(),
            hero_dwell_secs: 10,
            hero_count: 10,
            player: PlayerConfig::default(),
        }
    }

    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary variable source. Numbers that fail to parse
    /// keep their defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let api_key = lookup("NEXPLAY_TMDB_API_KEY")
            .filter(|k| !k.trim().is_empty())
            .ok_or(ConfigError::Missing("NEXPLAY_TMDB_API_KEY"))?;
        let mut config = Self::new(api_key);

        if let Some(v) = lookup("NEXPLAY_BIND") {
            config.bind_addr = v;
        }
        if let Some(v) = lookup("NEXPLAY_LANGUAGE") {
            config.language = v;
        }
        if let Some(v) = lookup("NEXPLAY_CACHE_DIR") {
            config.cache_dir = v.into();
        }
        if let Some(v) = lookup("NEXPLAY_HERO_DWELL_SECS").and_then(|v| v.parse().ok()) {
            config.hero_dwell_secs = v;
        }
        if let Some(v) = lookup("NEXPLAY_HERO_COUNT").and_then(|v| v.parse().ok()) {
            config.hero_count = v;
        }
        if let Some(v) = lookup("NEXPLAY_PLAYER_BASE_URL") {
            config.player.base_url = v;
        }
        if let Some(v) = lookup("NEXPLAY_PLAYER_LANG") {
            config.player.lang = v;
        }

        Ok(config)
    }
}
