use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};
use nexplay_catalog::feed::{self, Row, TitlePage};
use nexplay_catalog::{DiscoverParams, ListKind};
use nexplay_core::error::ApiError;
use nexplay_core::types::{Genre, MediaType, Page, SeasonDetails, Title};
use nexplay_hero::{RotationConfig, initial_index};
use serde::{Deserialize, Serialize};
use tower::ServiceBuilder;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::warn;

use crate::error::AppError;
use crate::player::{self, PlaybackTarget};
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/api/image", get(crate::images::proxy_image))
        .nest("/api/v1", api_router())
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CorsLayer::permissive()),
        )
        .with_state(state)
}

fn api_router() -> Router<AppState> {
    Router::new()
        .route("/home", get(home))
        .route("/lists/{media_type}/{list}", get(list))
        .route("/discover/{media_type}", get(discover))
        .route("/search", get(search))
        .route("/genres/{media_type}", get(genres))
        // Detail pages
        .route("/movie/{id}", get(movie_page))
        .route("/tv/{id}", get(show_page))
        .route("/tv/{id}/season/{season}", get(season))
        // Playback
        .route("/player/events", post(player_event))
        .route("/player/{media_type}/{id}", get(player_url))
}

fn parse_media_type(raw: &str) -> Result<MediaType, ApiError> {
    raw.parse()
        .map_err(|_| ApiError::BadRequest(format!("unknown media type '{raw}'")))
}

// ---------------------------------------------------------------------------
// Health
// ---------------------------------------------------------------------------

#[derive(Serialize)]
struct HealthResponse {
    status: String,
    provider: String,
}

async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        provider: state.catalog.name().to_string(),
    })
}

// ---------------------------------------------------------------------------
// Home
// ---------------------------------------------------------------------------

#[derive(Serialize)]
struct HeroSection {
    items: Vec<Title>,
    /// Index every viewer in the current dwell window starts on.
    initial_index: usize,
    dwell_secs: u64,
    tick_interval_ms: u64,
}

#[derive(Serialize)]
struct HomeResponse {
    hero: HeroSection,
    rows: Vec<Row>,
}

async fn home(State(state): State<AppState>) -> Json<HomeResponse> {
    let sections = feed::fetch_home(state.catalog.as_ref()).await;
    let home = {
        let mut rng = rand::thread_rng();
        feed::arrange_home(sections, state.config.hero_count, &mut rng)
    };

    let rotation = RotationConfig {
        dwell: std::time::Duration::from_secs(state.config.hero_dwell_secs.max(1)),
        ..Default::default()
    };
    let dwell_secs = rotation.dwell_secs();
    let index = initial_index(
        home.hero.len(),
        rotation.dwell,
        state.clock.now_unix_millis(),
    );

    Json(HomeResponse {
        hero: HeroSection {
            items: home.hero,
            initial_index: index,
            dwell_secs,
            tick_interval_ms: rotation.tick_interval.as_millis() as u64,
        },
        rows: home.rows,
    })
}

// ---------------------------------------------------------------------------
// Listings, discover, search, genres
// ---------------------------------------------------------------------------

#[derive(Deserialize)]
struct PageQuery {
    page: Option<u32>,
}

async fn list(
    State(state): State<AppState>,
    Path((media_type, list)): Path<(String, String)>,
    Query(query): Query<PageQuery>,
) -> Result<Json<Page<Title>>, AppError> {
    let media_type = parse_media_type(&media_type)?;
    let kind: ListKind = list
        .parse()
        .map_err(|_| ApiError::BadRequest(format!("unknown list '{list}'")))?;
    let page = query.page.unwrap_or(1).max(1);

    Ok(Json(
        feed::list_or_empty(state.catalog.as_ref(), media_type, kind, page).await,
    ))
}

async fn discover(
    State(state): State<AppState>,
    Path(media_type): Path<String>,
    Query(params): Query<DiscoverParams>,
) -> Result<Json<Page<Title>>, AppError> {
    let media_type = parse_media_type(&media_type)?;
    let page = state
        .catalog
        .discover(media_type, &params)
        .await
        .unwrap_or_else(|e| {
            warn!(%media_type, error = %e, "discover failed, using empty result");
            Page::empty()
        });
    Ok(Json(page))
}

#[derive(Deserialize)]
struct SearchQuery {
    q: Option<String>,
    media_type: Option<String>,
}

async fn search(
    State(state): State<AppState>,
    Query(query): Query<SearchQuery>,
) -> Result<Json<Page<Title>>, AppError> {
    let media_type = query
        .media_type
        .as_deref()
        .map(parse_media_type)
        .transpose()?;
    let q = query.q.unwrap_or_default();
    let q = q.trim();
    if q.is_empty() {
        return Ok(Json(Page::empty()));
    }

    let result = match media_type {
        Some(media_type) => state.catalog.search(media_type, q).await,
        None => state.catalog.search_multi(q).await,
    };
    Ok(Json(result.unwrap_or_else(|e| {
        warn!(query = q, error = %e, "search failed, using empty result");
        Page::empty()
    })))
}

async fn genres(
    State(state): State<AppState>,
    Path(media_type): Path<String>,
) -> Result<Json<Vec<Genre>>, AppError> {
    let media_type = parse_media_type(&media_type)?;
    let genres = state.catalog.genres(media_type).await.unwrap_or_else(|e| {
        warn!(%media_type, error = %e, "genre list failed, using empty result");
        Vec::new()
    });
    Ok(Json(genres))
}

// ---------------------------------------------------------------------------
// Detail pages
// ---------------------------------------------------------------------------

async fn movie_page(
    State(state): State<AppState>,
    Path(id): Path<u64>,
) -> Result<Json<TitlePage>, AppError> {
    let page = feed::fetch_title_page(state.catalog.as_ref(), MediaType::Movie, id).await?;
    Ok(Json(page))
}

async fn show_page(
    State(state): State<AppState>,
    Path(id): Path<u64>,
) -> Result<Json<TitlePage>, AppError> {
    let page = feed::fetch_title_page(state.catalog.as_ref(), MediaType::Tv, id).await?;
    Ok(Json(page))
}

async fn season(
    State(state): State<AppState>,
    Path((id, season)): Path<(u64, u32)>,
) -> Result<Json<SeasonDetails>, AppError> {
    Ok(Json(state.catalog.season(id, season).await?))
}

// ---------------------------------------------------------------------------
// Player
// ---------------------------------------------------------------------------

#[derive(Deserialize)]
struct PlayerQuery {
    season: Option<u32>,
    episode: Option<u32>,
}

#[derive(Serialize)]
struct PlayerUrlResponse {
    url: String,
}

async fn player_url(
    State(state): State<AppState>,
    Path((media_type, id)): Path<(String, u64)>,
    Query(query): Query<PlayerQuery>,
) -> Result<Json<PlayerUrlResponse>, AppError> {
    let media_type = parse_media_type(&media_type)?;
    let target = PlaybackTarget::new(media_type, id, query.season, query.episode)?;
    let url = state.config.player.embed_url(target)?;
    Ok(Json(PlayerUrlResponse { url }))
}

#[derive(Deserialize)]
struct PlayerEventRequest {
    /// Origin of the frame that posted the message.
    origin: String,
    message: serde_json::Value,
}

async fn player_event(
    State(state): State<AppState>,
    Json(req): Json<PlayerEventRequest>,
) -> Result<StatusCode, AppError> {
    player::handle_message(&state.config.player, &req.origin, &req.message)?;
    Ok(StatusCode::NO_CONTENT)
}
