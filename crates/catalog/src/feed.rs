//! Page-level fan-out: several catalog calls joined into one feed.
//!
//! Every secondary branch degrades to an empty result on failure so a
//! single flaky listing never blanks the whole page.

use rand::Rng;
use rand::seq::SliceRandom;
use serde::Serialize;
use tracing::warn;

use nexplay_core::types::{Credits, MediaType, MovieDetails, Page, ShowDetails, Title, Video};

use crate::CatalogError;
use crate::images::{ImageKind, ResponsiveImage, responsive};
use crate::provider::{CatalogProvider, ListKind, RelatedKind};

/// Rows shown on the home page, in display order.
pub const HOME_ROWS: [(&str, &str, MediaType, ListKind); 6] = [
    ("trending_movies", "Trending Now", MediaType::Movie, ListKind::Trending),
    ("trending_tv", "Trending TV Shows", MediaType::Tv, ListKind::Trending),
    ("popular_movies", "Popular Movies", MediaType::Movie, ListKind::Popular),
    ("popular_tv", "Popular TV Shows", MediaType::Tv, ListKind::Popular),
    ("top_rated_movies", "Top Rated Movies", MediaType::Movie, ListKind::TopRated),
    ("top_rated_tv", "Top Rated TV Shows", MediaType::Tv, ListKind::TopRated),
];

/// Titles in the trending-movies row after the hero picks are taken out.
const TRENDING_ROW_LEN: usize = 20;

/// Raw listings fetched for the home page, one per entry of [`HOME_ROWS`].
#[derive(Debug, Clone)]
pub struct HomeSections {
    pub listings: Vec<Vec<Title>>,
}

#[derive(Debug, Clone, Serialize)]
pub struct Row {
    pub id: String,
    pub title: String,
    pub media_type: MediaType,
    pub items: Vec<Title>,
}

#[derive(Debug, Clone, Serialize)]
pub struct HomeFeed {
    pub hero: Vec<Title>,
    pub rows: Vec<Row>,
}

/// Fetch one listing, substituting an empty page on failure.
pub async fn list_or_empty(
    provider: &dyn CatalogProvider,
    media_type: MediaType,
    kind: ListKind,
    page: u32,
) -> Page<Title> {
    provider
        .list(media_type, kind, page)
        .await
        .unwrap_or_else(|e| {
            warn!(
                provider = provider.name(),
                %media_type,
                list = kind.as_str(),
                error = %e,
                "listing failed, using empty result"
            );
            Page::empty()
        })
}

/// Fetch all home listings concurrently.
pub async fn fetch_home(provider: &dyn CatalogProvider) -> HomeSections {
    let [r0, r1, r2, r3, r4, r5] = HOME_ROWS;
    let (a, b, c, d, e, f) = tokio::join!(
        list_or_empty(provider, r0.2, r0.3, 1),
        list_or_empty(provider, r1.2, r1.3, 1),
        list_or_empty(provider, r2.2, r2.3, 1),
        list_or_empty(provider, r3.2, r3.3, 1),
        list_or_empty(provider, r4.2, r4.3, 1),
        list_or_empty(provider, r5.2, r5.3, 1),
    );

    HomeSections {
        listings: vec![
            a.results, b.results, c.results, d.results, e.results, f.results,
        ],
    }
}

/// Shuffle each listing and carve the hero picks off the trending movies.
///
/// Hero titles are the first `hero_count` shuffled trending movies; the
/// trending row continues with the titles after them.
pub fn arrange_home<R: Rng + ?Sized>(
    sections: HomeSections,
    hero_count: usize,
    rng: &mut R,
) -> HomeFeed {
    let mut hero = Vec::new();
    let mut rows = Vec::with_capacity(HOME_ROWS.len());

    for (i, mut items) in sections.listings.into_iter().enumerate() {
        let Some(&(id, label, media_type, _)) = HOME_ROWS.get(i) else {
            break;
        };
        items.shuffle(rng);

        if i == 0 {
            let split = hero_count.min(items.len());
            let rest = items.split_off(split);
            hero = items;
            items = rest.into_iter().take(TRENDING_ROW_LEN).collect();
        }

        rows.push(Row {
            id: id.to_string(),
            title: label.to_string(),
            media_type,
            items,
        });
    }

    HomeFeed { hero, rows }
}

/// Primary record of a detail page.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "media_type", content = "details", rename_all = "snake_case")]
pub enum Details {
    Movie(Box<MovieDetails>),
    Tv(Box<ShowDetails>),
}

impl Details {
    fn poster_path(&self) -> Option<&str> {
        match self {
            Self::Movie(d) => d.movie.poster_path.as_deref(),
            Self::Tv(d) => d.show.poster_path.as_deref(),
        }
    }

    fn backdrop_path(&self) -> Option<&str> {
        match self {
            Self::Movie(d) => d.movie.backdrop_path.as_deref(),
            Self::Tv(d) => d.show.backdrop_path.as_deref(),
        }
    }
}

/// Ready-to-render artwork for a detail page.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TitleImages {
    pub poster: Option<ResponsiveImage>,
    pub backdrop: Option<ResponsiveImage>,
}

impl From<&Details> for TitleImages {
    fn from(details: &Details) -> Self {
        Self {
            poster: responsive(details.poster_path(), ImageKind::Poster),
            backdrop: responsive(details.backdrop_path(), ImageKind::Backdrop),
        }
    }
}

/// Everything a detail page shows.
#[derive(Debug, Clone, Serialize)]
pub struct TitlePage {
    #[serde(flatten)]
    pub details: Details,
    pub images: TitleImages,
    pub credits: Credits,
    pub trailers: Vec<Video>,
    pub recommendations: Vec<Title>,
    pub similar: Vec<Title>,
}

/// Load a detail page. Only the primary details call can fail the page.
pub async fn fetch_title_page(
    provider: &dyn CatalogProvider,
    media_type: MediaType,
    id: u64,
) -> Result<TitlePage, CatalogError> {
    let details = async {
        match media_type {
            MediaType::Movie => provider
                .movie_details(id)
                .await
                .map(|d| Details::Movie(Box::new(d))),
            MediaType::Tv => provider
                .show_details(id)
                .await
                .map(|d| Details::Tv(Box::new(d))),
        }
    };
    let credits = async {
        provider.credits(media_type, id).await.unwrap_or_else(|e| {
            warn!(%media_type, id, error = %e, "credits failed, using empty result");
            Credits::default()
        })
    };
    let videos = async {
        provider.videos(media_type, id).await.unwrap_or_else(|e| {
            warn!(%media_type, id, error = %e, "videos failed, using empty result");
            Vec::new()
        })
    };

    let (details, credits, videos, recommendations, similar) = tokio::join!(
        details,
        credits,
        videos,
        related_or_empty(provider, media_type, id, RelatedKind::Recommendations),
        related_or_empty(provider, media_type, id, RelatedKind::Similar),
    );

    let details = details?;
    Ok(TitlePage {
        images: TitleImages::from(&details),
        details,
        credits,
        trailers: videos
            .into_iter()
            .filter(Video::is_youtube_trailer)
            .collect(),
        recommendations: recommendations.results,
        similar: similar.results,
    })
}

async fn related_or_empty(
    provider: &dyn CatalogProvider,
    media_type: MediaType,
    id: u64,
    kind: RelatedKind,
) -> Page<Title> {
    provider
        .related(media_type, id, kind)
        .await
        .unwrap_or_else(|e| {
            warn!(
                %media_type,
                id,
                related = kind.as_str(),
                error = %e,
                "related titles failed, using empty result"
            );
            Page::empty()
        })
}
