use nexplay_core::types::{MediaType, Title};
use serde::{Deserialize, Serialize};

/// A title saved to the watch-list.
///
/// Serialized with the same field names the browser build kept in local
/// storage, so records written by either survive a reload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WatchListEntry {
    pub id: u64,
    #[serde(rename = "type")]
    pub media_type: MediaType,
    pub title: String,
    /// Show name, kept alongside `title` for tv entries.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default)]
    pub poster_path: Option<String>,
    #[serde(default)]
    pub backdrop_path: Option<String>,
    #[serde(default)]
    pub vote_average: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub release_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub first_air_date: Option<String>,
    #[serde(default)]
    pub overview: String,
}

impl WatchListEntry {
    pub fn key(&self) -> (u64, MediaType) {
        (self.id, self.media_type)
    }

    pub fn matches(&self, id: u64, media_type: MediaType) -> bool {
        self.id == id && self.media_type == media_type
    }

    /// Release date for movies, first air date for shows.
    pub fn date(&self) -> Option<&str> {
        match self.media_type {
            MediaType::Movie => self.release_date.as_deref(),
            MediaType::Tv => self.first_air_date.as_deref(),
        }
    }
}

impl From<&Title> for WatchListEntry {
    fn from(title: &Title) -> Self {
        let (name, release_date, first_air_date) = match title {
            Title::Movie(m) => (None, m.release_date.clone(), None),
            Title::Tv(s) => (Some(s.name.clone()), None, s.first_air_date.clone()),
        };

        Self {
            id: title.id(),
            media_type: title.media_type(),
            title: title.display_name().to_string(),
            name,
            poster_path: title.poster_path().map(str::to_string),
            backdrop_path: title.backdrop_path().map(str::to_string),
            vote_average: title.vote_average(),
            release_date,
            first_air_date,
            overview: title.overview().to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nexplay_core::types::{Movie, Show};

    #[test]
    fn show_entry_carries_first_air_date_only() {
        let title = Title::Tv(Show {
            id: 1396,
            name: "Breaking Bad".into(),
            first_air_date: Some("2008-01-20".into()),
            ..Default::default()
        });

        let entry = WatchListEntry::from(&title);
        assert_eq!(entry.key(), (1396, MediaType::Tv));
        assert_eq!(entry.title, "Breaking Bad");
        assert_eq!(entry.name.as_deref(), Some("Breaking Bad"));
        assert_eq!(entry.release_date, None);
        assert_eq!(entry.date(), Some("2008-01-20"));
    }

    #[test]
    fn serializes_media_type_under_type_key() {
        let entry = WatchListEntry::from(&Title::Movie(Movie {
            id: 42,
            title: "Arrival".into(),
            release_date: Some("2016-11-10".into()),
            ..Default::default()
        }));

        let json = serde_json::to_value(&entry).unwrap();
        assert_eq!(json["type"], "movie");
        assert_eq!(json["release_date"], "2016-11-10");
        assert!(json.get("first_air_date").is_none());
        assert!(json.get("name").is_none());
    }

    #[test]
    fn browser_record_with_show_name_round_trips() {
        let raw = r#"{"id":1396,"type":"tv","title":"Breaking Bad","name":"Breaking Bad","poster_path":"/bb.jpg","backdrop_path":null,"vote_average":8.9,"first_air_date":"2008-01-20","overview":""}"#;
        let entry: WatchListEntry = serde_json::from_str(raw).unwrap();
        assert_eq!(entry.name.as_deref(), Some("Breaking Bad"));

        let json = serde_json::to_value(&entry).unwrap();
        assert_eq!(json["name"], "Breaking Bad");
        assert_eq!(json["type"], "tv");
        assert!(json.get("release_date").is_none());
    }
}
