use serde::{Deserialize, Serialize};

/// Catalog namespace a title id belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MediaType {
    Movie,
    Tv,
}

impl MediaType {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Movie => "movie",
            Self::Tv => "tv",
        }
    }
}

impl std::fmt::Display for MediaType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for MediaType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "movie" => Ok(Self::Movie),
            "tv" => Ok(Self::Tv),
            other => Err(format!("unknown media type '{other}'")),
        }
    }
}

/// A movie as returned by TMDB listing endpoints.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Movie {
    pub id: u64,
    pub title: String,
    pub overview: String,
    pub poster_path: Option<String>,
    pub backdrop_path: Option<String>,
    pub release_date: Option<String>,
    pub vote_average: f64,
    pub vote_count: u64,
    pub genre_ids: Vec<u64>,
    pub adult: bool,
    pub original_language: Option<String>,
    pub popularity: f64,
}

/// A TV show as returned by TMDB listing endpoints.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Show {
    pub id: u64,
    pub name: String,
    pub overview: String,
    pub poster_path: Option<String>,
    pub backdrop_path: Option<String>,
    pub first_air_date: Option<String>,
    pub vote_average: f64,
    pub vote_count: u64,
    pub genre_ids: Vec<u64>,
    pub original_language: Option<String>,
    pub popularity: f64,
    pub origin_country: Vec<String>,
}

/// A catalog title. The variant decides the id namespace and which
/// date/name fields apply.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "media_type", rename_all = "snake_case")]
pub enum Title {
    Movie(Movie),
    Tv(Show),
}

impl Title {
    pub fn id(&self) -> u64 {
        match self {
            Self::Movie(m) => m.id,
            Self::Tv(s) => s.id,
        }
    }

    pub fn media_type(&self) -> MediaType {
        match self {
            Self::Movie(_) => MediaType::Movie,
            Self::Tv(_) => MediaType::Tv,
        }
    }

    pub fn display_name(&self) -> &str {
        match self {
            Self::Movie(m) => &m.title,
            Self::Tv(s) => &s.name,
        }
    }

    pub fn overview(&self) -> &str {
        match self {
            Self::Movie(m) => &m.overview,
            Self::Tv(s) => &s.overview,
        }
    }

    pub fn poster_path(&self) -> Option<&str> {
        match self {
            Self::Movie(m) => m.poster_path.as_deref(),
            Self::Tv(s) => s.poster_path.as_deref(),
        }
    }

    pub fn backdrop_path(&self) -> Option<&str> {
        match self {
            Self::Movie(m) => m.backdrop_path.as_deref(),
            Self::Tv(s) => s.backdrop_path.as_deref(),
        }
    }

    pub fn vote_average(&self) -> f64 {
        match self {
            Self::Movie(m) => m.vote_average,
            Self::Tv(s) => s.vote_average,
        }
    }

    /// Release date for movies, first air date for shows.
    pub fn date(&self) -> Option<&str> {
        match self {
            Self::Movie(m) => m.release_date.as_deref(),
            Self::Tv(s) => s.first_air_date.as_deref(),
        }
    }
}

impl From<Movie> for Title {
    fn from(m: Movie) -> Self {
        Self::Movie(m)
    }
}

impl From<Show> for Title {
    fn from(s: Show) -> Self {
        Self::Tv(s)
    }
}

/// One page of a paginated TMDB listing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Page<T> {
    #[serde(default)]
    pub page: u32,
    #[serde(default = "Vec::new")]
    pub results: Vec<T>,
    #[serde(default)]
    pub total_pages: u32,
    #[serde(default)]
    pub total_results: u32,
}

impl<T> Page<T> {
    /// Stand-in for a listing whose fetch failed.
    pub fn empty() -> Self {
        Self {
            page: 1,
            results: Vec::new(),
            total_pages: 0,
            total_results: 0,
        }
    }

    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            page: self.page,
            results: self.results.into_iter().map(f).collect(),
            total_pages: self.total_pages,
            total_results: self.total_results,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Genre {
    pub id: u64,
    pub name: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Company {
    pub id: u64,
    pub name: String,
    pub logo_path: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MovieDetails {
    #[serde(flatten)]
    pub movie: Movie,
    pub genres: Vec<Genre>,
    pub runtime: Option<u32>,
    pub budget: u64,
    pub revenue: u64,
    pub tagline: Option<String>,
    pub production_companies: Vec<Company>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ShowDetails {
    #[serde(flatten)]
    pub show: Show,
    pub genres: Vec<Genre>,
    pub number_of_seasons: u32,
    pub number_of_episodes: u32,
    pub seasons: Vec<Season>,
    pub networks: Vec<Company>,
    pub production_companies: Vec<Company>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Season {
    pub id: u64,
    pub name: String,
    pub overview: String,
    pub air_date: Option<String>,
    pub episode_count: u32,
    pub poster_path: Option<String>,
    pub season_number: u32,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SeasonDetails {
    pub id: u64,
    pub name: String,
    pub season_number: u32,
    pub episodes: Vec<Episode>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Episode {
    pub id: u64,
    pub name: String,
    pub overview: String,
    pub air_date: Option<String>,
    pub episode_number: u32,
    pub season_number: u32,
    pub still_path: Option<String>,
    pub vote_average: f64,
    pub runtime: Option<u32>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Credits {
    pub cast: Vec<CastMember>,
    pub crew: Vec<CrewMember>,
}

impl Credits {
    pub fn directors(&self) -> impl Iterator<Item = &CrewMember> {
        self.crew.iter().filter(|c| c.job == "Director")
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CastMember {
    pub id: u64,
    pub name: String,
    pub character: String,
    pub profile_path: Option<String>,
    pub order: u32,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CrewMember {
    pub id: u64,
    pub name: String,
    pub job: String,
    pub department: String,
    pub profile_path: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Video {
    pub id: String,
    pub key: String,
    pub name: String,
    pub site: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub official: bool,
}

impl Video {
    pub fn is_youtube_trailer(&self) -> bool {
        self.site == "YouTube" && (self.kind == "Trailer" || self.kind == "Teaser")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn title_is_tagged_by_media_type() {
        let json = serde_json::json!({
            "media_type": "tv",
            "id": 1399,
            "name": "Game of Thrones",
            "first_air_date": "2011-04-17",
            "vote_average": 8.4,
        });
        let title: Title = serde_json::from_value(json).unwrap();
        assert_eq!(title.media_type(), MediaType::Tv);
        assert_eq!(title.display_name(), "Game of Thrones");
        assert_eq!(title.date(), Some("2011-04-17"));
        assert_eq!(title.poster_path(), None);
    }

    #[test]
    fn movie_listing_tolerates_null_and_missing_fields() {
        let json = serde_json::json!({
            "id": 27205,
            "title": "Inception",
            "poster_path": null,
            "release_date": "2010-07-15",
        });
        let movie: Movie = serde_json::from_value(json).unwrap();
        assert_eq!(movie.id, 27205);
        assert!(movie.genre_ids.is_empty());
        assert_eq!(Title::from(movie).date(), Some("2010-07-15"));
    }

    #[test]
    fn media_type_parses_path_segments() {
        assert_eq!("movie".parse::<MediaType>(), Ok(MediaType::Movie));
        assert_eq!("tv".parse::<MediaType>(), Ok(MediaType::Tv));
        assert!("person".parse::<MediaType>().is_err());
    }

    #[test]
    fn movie_details_flattens_listing_fields() {
        let json = serde_json::json!({
            "id": 603,
            "title": "The Matrix",
            "runtime": 136,
            "genres": [{ "id": 28, "name": "Action" }],
        });
        let details: MovieDetails = serde_json::from_value(json).unwrap();
        assert_eq!(details.movie.title, "The Matrix");
        assert_eq!(details.runtime, Some(136));
        assert_eq!(details.genres.len(), 1);
    }
}
