use nexplay_core::types::{
    Credits, Genre, MediaType, MovieDetails, Page, SeasonDetails, ShowDetails, Title, Video,
};

use crate::CatalogError;

/// A catalog source that can list, search and describe titles.
#[async_trait::async_trait]
pub trait CatalogProvider: Send + Sync {
    fn name(&self) -> &str;

    /// One page of a curated listing (trending, popular, ...).
    async fn list(
        &self,
        media_type: MediaType,
        kind: ListKind,
        page: u32,
    ) -> Result<Page<Title>, CatalogError>;

    /// Filtered listing by genre/year with an explicit sort order.
    async fn discover(
        &self,
        media_type: MediaType,
        params: &DiscoverParams,
    ) -> Result<Page<Title>, CatalogError>;

    /// Search a single namespace.
    async fn search(&self, media_type: MediaType, query: &str)
    -> Result<Page<Title>, CatalogError>;

    /// Search movies and shows together. People are not titles and are dropped.
    async fn search_multi(&self, query: &str) -> Result<Page<Title>, CatalogError>;

    async fn movie_details(&self, id: u64) -> Result<MovieDetails, CatalogError>;

    async fn show_details(&self, id: u64) -> Result<ShowDetails, CatalogError>;

    async fn season(&self, show_id: u64, season_number: u32)
    -> Result<SeasonDetails, CatalogError>;

    async fn credits(&self, media_type: MediaType, id: u64) -> Result<Credits, CatalogError>;

    async fn videos(&self, media_type: MediaType, id: u64) -> Result<Vec<Video>, CatalogError>;

    async fn related(
        &self,
        media_type: MediaType,
        id: u64,
        kind: RelatedKind,
    ) -> Result<Page<Title>, CatalogError>;

    async fn genres(&self, media_type: MediaType) -> Result<Vec<Genre>, CatalogError>;
}

/// Curated listings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ListKind {
    Trending,
    Popular,
    TopRated,
    Upcoming,
    NowPlaying,
}

impl ListKind {
    /// TMDB path for this listing, if the namespace has one.
    pub fn path(self, media_type: MediaType) -> Option<String> {
        let mt = media_type.as_str();
        match (self, media_type) {
            (Self::Trending, _) => Some(format!("/trending/{mt}/week")),
            (Self::Popular, _) => Some(format!("/{mt}/popular")),
            (Self::TopRated, _) => Some(format!("/{mt}/top_rated")),
            (Self::Upcoming, MediaType::Movie) => Some("/movie/upcoming".into()),
            (Self::NowPlaying, MediaType::Movie) => Some("/movie/now_playing".into()),
            (Self::Upcoming | Self::NowPlaying, MediaType::Tv) => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Trending => "trending",
            Self::Popular => "popular",
            Self::TopRated => "top_rated",
            Self::Upcoming => "upcoming",
            Self::NowPlaying => "now_playing",
        }
    }
}

impl std::str::FromStr for ListKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "trending" => Ok(Self::Trending),
            "popular" => Ok(Self::Popular),
            "top_rated" => Ok(Self::TopRated),
            "upcoming" => Ok(Self::Upcoming),
            "now_playing" => Ok(Self::NowPlaying),
            other => Err(format!("unknown list '{other}'")),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RelatedKind {
    Recommendations,
    Similar,
}

impl RelatedKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Recommendations => "recommendations",
            Self::Similar => "similar",
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Deserialize)]
pub struct DiscoverParams {
    pub genre: Option<u64>,
    pub year: Option<i32>,
    pub sort_by: Option<String>,
}

impl DiscoverParams {
    /// Query pairs for the discover endpoint of `media_type`.
    pub fn query(&self, media_type: MediaType) -> Vec<(&'static str, String)> {
        let mut params = Vec::new();
        if let Some(genre) = self.genre {
            params.push(("with_genres", genre.to_string()));
        }
        if let Some(year) = self.year {
            let key = match media_type {
                MediaType::Movie => "year",
                MediaType::Tv => "first_air_date_year",
            };
            params.push((key, year.to_string()));
        }
        if let Some(ref sort_by) = self.sort_by {
            params.push(("sort_by", sort_by.clone()));
        }
        params
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn list_paths_follow_tmdb_layout() {
        assert_eq!(
            ListKind::Trending.path(MediaType::Tv).as_deref(),
            Some("/trending/tv/week")
        );
        assert_eq!(
            ListKind::TopRated.path(MediaType::Movie).as_deref(),
            Some("/movie/top_rated")
        );
        assert_eq!(ListKind::Upcoming.path(MediaType::Tv), None);
    }

    #[test]
    fn discover_year_key_depends_on_media_type() {
        let params = DiscoverParams {
            genre: Some(28),
            year: Some(2020),
            sort_by: Some("popularity.desc".into()),
        };
        let movie = params.query(MediaType::Movie);
        assert!(movie.contains(&("year", "2020".to_string())));
        let tv = params.query(MediaType::Tv);
        assert!(tv.contains(&("first_air_date_year", "2020".to_string())));
        assert!(tv.contains(&("with_genres", "28".to_string())));
    }
}
