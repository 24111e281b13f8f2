//! Embedded third-party player: URL construction and the lifecycle
//! messages it posts back to the host page.

use nexplay_core::types::MediaType;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info};

pub const DEFAULT_PLAYER_BASE: &str = "https://vixsrc.to";

#[derive(Error, Debug)]
pub enum PlayerError {
    #[error("invalid playback target: {0}")]
    InvalidTarget(String),
    #[error("invalid player base url: {0}")]
    InvalidBaseUrl(String),
    #[error("message from foreign origin {0}")]
    ForeignOrigin(String),
    #[error("malformed player message: {0}")]
    Malformed(String),
}

/// Look and feel parameters passed to the player.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlayerConfig {
    pub base_url: String,
    pub primary_color: String,
    pub secondary_color: String,
    pub autoplay: bool,
    pub lang: String,
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_PLAYER_BASE.to_string(),
            primary_color: "E50914".to_string(),
            secondary_color: "831010".to_string(),
            autoplay: false,
            lang: "it".to_string(),
        }
    }
}

/// What to play.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaybackTarget {
    Movie { id: u64 },
    Episode { id: u64, season: u32, episode: u32 },
}

impl PlaybackTarget {
    /// Shows are played one episode at a time, so both numbers are required.
    pub fn new(
        media_type: MediaType,
        id: u64,
        season: Option<u32>,
        episode: Option<u32>,
    ) -> Result<Self, PlayerError> {
        match (media_type, season, episode) {
            (MediaType::Movie, _, _) => Ok(Self::Movie { id }),
            (MediaType::Tv, Some(season), Some(episode)) => Ok(Self::Episode {
                id,
                season,
                episode,
            }),
            (MediaType::Tv, _, _) => Err(PlayerError::InvalidTarget(format!(
                "tv/{id} needs both season and episode"
            ))),
        }
    }
}

impl PlayerConfig {
    pub fn embed_url(&self, target: PlaybackTarget) -> Result<String, PlayerError> {
        let segments = match target {
            PlaybackTarget::Movie { id } => vec!["movie".to_string(), id.to_string()],
            PlaybackTarget::Episode {
                id,
                season,
                episode,
            } => vec![
                "tv".to_string(),
                id.to_string(),
                season.to_string(),
                episode.to_string(),
            ],
        };

        let invalid =
            |reason: String| PlayerError::InvalidBaseUrl(format!("{}: {reason}", self.base_url));
        let mut url =
            reqwest::Url::parse(&self.base_url).map_err(|e| invalid(e.to_string()))?;
        // Appended after any path prefix the base already carries.
        url.path_segments_mut()
            .map_err(|_| invalid("cannot be a base".to_string()))?
            .pop_if_empty()
            .extend(&segments);
        url.query_pairs_mut()
            .append_pair("primaryColor", &self.primary_color)
            .append_pair("secondaryColor", &self.secondary_color)
            .append_pair("autoplay", if self.autoplay { "true" } else { "false" })
            .append_pair("lang", &self.lang);

        Ok(url.to_string())
    }

    /// Origin the player's messages must come from.
    pub fn origin(&self) -> String {
        reqwest::Url::parse(&self.base_url)
            .map(|u| u.origin().ascii_serialization())
            .unwrap_or_else(|_| self.base_url.trim_end_matches('/').to_string())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlaybackEventKind {
    Play,
    Pause,
    Seeked,
    Ended,
    Timeupdate,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlaybackEvent {
    pub event: PlaybackEventKind,
    #[serde(rename = "currentTime", default)]
    pub current_time: f64,
    #[serde(default)]
    pub duration: f64,
    #[serde(default)]
    pub video_id: Option<u64>,
}

/// Interpret a message the player posted to the host.
///
/// Returns `Ok(None)` for messages that are not playback events; those are
/// shared with other widgets on the page and are not ours to reject.
pub fn handle_message(
    config: &PlayerConfig,
    origin: &str,
    message: &serde_json::Value,
) -> Result<Option<PlaybackEvent>, PlayerError> {
    if origin.trim_end_matches('/') != config.origin() {
        return Err(PlayerError::ForeignOrigin(origin.to_string()));
    }
    if message.get("type").and_then(|t| t.as_str()) != Some("PLAYER_EVENT") {
        return Ok(None);
    }

    let data = message
        .get("data")
        .cloned()
        .ok_or_else(|| PlayerError::Malformed("missing data".into()))?;
    let event: PlaybackEvent =
        serde_json::from_value(data).map_err(|e| PlayerError::Malformed(e.to_string()))?;

    match event.event {
        PlaybackEventKind::Play => info!(video_id = ?event.video_id, "playback started"),
        PlaybackEventKind::Pause => info!(video_id = ?event.video_id, position = event.current_time, "playback paused"),
        PlaybackEventKind::Ended => info!(video_id = ?event.video_id, "playback ended"),
        PlaybackEventKind::Seeked => info!(video_id = ?event.video_id, position = event.current_time, "playback seeked"),
        PlaybackEventKind::Timeupdate => debug!(
            video_id = ?event.video_id,
            position = event.current_time,
            duration = event.duration,
            "playback time update"
        ),
    }

    Ok(Some(event))
}
