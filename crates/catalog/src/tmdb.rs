//! TMDB (The Movie Database) catalog client.
//!
//! Uses TMDB API v3: https://developer.themoviedb.org/docs

use serde::Deserialize;
use serde::de::DeserializeOwned;
use tracing::debug;

use nexplay_core::types::{
    Credits, Genre, MediaType, Movie, MovieDetails, Page, SeasonDetails, Show, ShowDetails, Title,
    Video,
};

use crate::CatalogError;
use crate::provider::{CatalogProvider, DiscoverParams, ListKind, RelatedKind};

const BASE_URL: &str = "https://api.themoviedb.org/3";
pub const DEFAULT_LANGUAGE: &str = "it-IT";

pub struct TmdbClient {
    api_key: String,
    language: String,
    base_url: String,
    client: reqwest::Client,
}

impl TmdbClient {
    pub fn new(api_key: String) -> Self {
        Self {
            api_key,
            language: DEFAULT_LANGUAGE.to_string(),
            base_url: BASE_URL.to_string(),
            client: reqwest::Client::new(),
        }
    }

    pub fn with_language(mut self, language: impl Into<String>) -> Self {
        self.language = language.into();
        self
    }

    /// Point the client at another host (a proxy or a local stub).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        params: &[(&str, &str)],
    ) -> Result<T, CatalogError> {
        let mut all_params = vec![
            ("api_key", self.api_key.as_str()),
            ("language", self.language.as_str()),
        ];
        all_params.extend_from_slice(params);

        let url = format!("{}{path}", self.base_url);
        debug!(url = %url, "TMDB request");

        let resp = self
            .client
            .get(&url)
            .query(&all_params)
            .send()
            .await
            .map_err(|e| CatalogError::Network(e.to_string()))?;

        if resp.status() == reqwest::StatusCode::NOT_FOUND {
            return Err(CatalogError::NotFound);
        }

        if !resp.status().is_success() {
            return Err(CatalogError::Provider(format!(
                "TMDB returned {}",
                resp.status()
            )));
        }

        let body = resp
            .bytes()
            .await
            .map_err(|e| CatalogError::Network(e.to_string()))?;
        serde_json::from_slice(&body).map_err(|e| CatalogError::Decode(format!("{path}: {e}")))
    }

    async fn titles(
        &self,
        media_type: MediaType,
        path: &str,
        params: &[(&str, &str)],
    ) -> Result<Page<Title>, CatalogError> {
        match media_type {
            MediaType::Movie => Ok(self
                .get_json::<Page<Movie>>(path, params)
                .await?
                .map(Title::Movie)),
            MediaType::Tv => Ok(self
                .get_json::<Page<Show>>(path, params)
                .await?
                .map(Title::Tv)),
        }
    }
}

/// A `/search/multi` hit. People share the result list with titles.
#[derive(Deserialize)]
#[serde(tag = "media_type", rename_all = "snake_case")]
enum MultiResult {
    Movie(Movie),
    Tv(Show),
    #[serde(other)]
    Other,
}

fn multi_to_titles(page: Page<MultiResult>) -> Page<Title> {
    let results: Vec<Title> = page
        .results
        .into_iter()
        .filter_map(|r| match r {
            MultiResult::Movie(m) => Some(Title::Movie(m)),
            MultiResult::Tv(s) => Some(Title::Tv(s)),
            MultiResult::Other => None,
        })
        .collect();
    Page {
        page: page.page,
        results,
        total_pages: page.total_pages,
        total_results: page.total_results,
    }
}

#[derive(Deserialize)]
struct GenreList {
    #[serde(default)]
    genres: Vec<Genre>,
}

#[derive(Deserialize)]
struct VideoList {
    #[serde(default)]
    results: Vec<Video>,
}

#[async_trait::async_trait]
impl CatalogProvider for TmdbClient {
    fn name(&self) -> &str {
        "tmdb"
    }

    async fn list(
        &self,
        media_type: MediaType,
        kind: ListKind,
        page: u32,
    ) -> Result<Page<Title>, CatalogError> {
        let path = kind.path(media_type).ok_or_else(|| {
            CatalogError::Unsupported(format!("{} listing for {media_type}", kind.as_str()))
        })?;
        let page = page.max(1).to_string();
        self.titles(media_type, &path, &[("page", &page)]).await
    }

    async fn discover(
        &self,
        media_type: MediaType,
        params: &DiscoverParams,
    ) -> Result<Page<Title>, CatalogError> {
        let query = params.query(media_type);
        let pairs: Vec<(&str, &str)> = query.iter().map(|(k, v)| (*k, v.as_str())).collect();
        self.titles(media_type, &format!("/discover/{media_type}"), &pairs)
            .await
    }

    async fn search(
        &self,
        media_type: MediaType,
        query: &str,
    ) -> Result<Page<Title>, CatalogError> {
        self.titles(media_type, &format!("/search/{media_type}"), &[("query", query)])
            .await
    }

    async fn search_multi(&self, query: &str) -> Result<Page<Title>, CatalogError> {
        let page: Page<MultiResult> = self
            .get_json("/search/multi", &[("query", query)])
            .await?;
        Ok(multi_to_titles(page))
    }

    async fn movie_details(&self, id: u64) -> Result<MovieDetails, CatalogError> {
        self.get_json(&format!("/movie/{id}"), &[]).await
    }

    async fn show_details(&self, id: u64) -> Result<ShowDetails, CatalogError> {
        self.get_json(&format!("/tv/{id}"), &[]).await
    }

    async fn season(
        &self,
        show_id: u64,
        season_number: u32,
    ) -> Result<SeasonDetails, CatalogError> {
        self.get_json(&format!("/tv/{show_id}/season/{season_number}"), &[])
            .await
    }

    async fn credits(&self, media_type: MediaType, id: u64) -> Result<Credits, CatalogError> {
        self.get_json(&format!("/{media_type}/{id}/credits"), &[])
            .await
    }

    async fn videos(&self, media_type: MediaType, id: u64) -> Result<Vec<Video>, CatalogError> {
        let list: VideoList = self
            .get_json(&format!("/{media_type}/{id}/videos"), &[])
            .await?;
        Ok(list.results)
    }

    async fn related(
        &self,
        media_type: MediaType,
        id: u64,
        kind: RelatedKind,
    ) -> Result<Page<Title>, CatalogError> {
        self.titles(
            media_type,
            &format!("/{media_type}/{id}/{}", kind.as_str()),
            &[],
        )
        .await
    }

    async fn genres(&self, media_type: MediaType) -> Result<Vec<Genre>, CatalogError> {
        let list: GenreList = self
            .get_json(&format!("/genre/{media_type}/list"), &[])
            .await?;
        Ok(list.genres)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn multi_search_drops_people_and_keeps_order() {
        let json = serde_json::json!({
            "page": 1,
            "total_pages": 1,
            "total_results": 3,
            "results": [
                { "media_type": "movie", "id": 27205, "title": "Inception", "release_date": "2010-07-15" },
                { "media_type": "person", "id": 6193, "name": "Leonardo DiCaprio", "profile_path": "/leo.jpg" },
                { "media_type": "tv", "id": 1396, "name": "Breaking Bad", "first_air_date": "2008-01-20" }
            ]
        });

        let page: Page<MultiResult> = serde_json::from_value(json).unwrap();
        let titles = multi_to_titles(page);

        assert_eq!(titles.results.len(), 2);
        assert_eq!(titles.results[0].media_type(), MediaType::Movie);
        assert_eq!(titles.results[0].display_name(), "Inception");
        assert_eq!(titles.results[1].media_type(), MediaType::Tv);
        assert_eq!(titles.results[1].id(), 1396);
        assert_eq!(titles.total_results, 3);
    }

    #[test]
    fn show_details_parse_seasons() {
        let json = serde_json::json!({
            "id": 1396,
            "name": "Breaking Bad",
            "number_of_seasons": 5,
            "number_of_episodes": 62,
            "seasons": [
                { "id": 3577, "name": "Season 1", "season_number": 1, "episode_count": 7 }
            ],
            "networks": [{ "id": 174, "name": "AMC", "logo_path": null }]
        });

        let details: ShowDetails = serde_json::from_value(json).unwrap();
        assert_eq!(details.show.name, "Breaking Bad");
        assert_eq!(details.number_of_seasons, 5);
        assert_eq!(details.seasons[0].episode_count, 7);
        assert_eq!(details.networks[0].name, "AMC");
    }

    #[test]
    fn base_url_override_trims_trailing_slash() {
        let client = TmdbClient::new("key".into())
            .with_base_url("http://127.0.0.1:9000/3/")
            .with_language("en-US");
        assert_eq!(client.base_url, "http://127.0.0.1:9000/3");
        assert_eq!(client.language, "en-US");
    }
}
