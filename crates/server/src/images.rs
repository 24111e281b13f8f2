//! TMDB image proxy with an on-disk cache.

use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use axum::extract::{Query, State};
use axum::http::{StatusCode, header};
use axum::response::{IntoResponse, Response};
use nexplay_catalog::images::is_known_size;
use nexplay_core::error::ApiError;
use regex::Regex;
use serde::Deserialize;
use sha2::{Digest, Sha256};
use tracing::{debug, warn};

use crate::error::AppError;
use crate::state::AppState;

const DEFAULT_SIZE: &str = "w500";

static IMAGE_PATH: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^/[A-Za-z0-9_-]+\.(jpg|jpeg|png|webp|svg)$").expect("image path pattern")
});

const PLACEHOLDER_SVG: &str = r##"<svg width="500" height="750" viewBox="0 0 500 750" fill="none" xmlns="http://www.w3.org/2000/svg">
<rect width="500" height="750" fill="#111111"/>
<path d="M200 300L300 375L200 450V300Z" fill="#666666"/>
<text x="250" y="500" text-anchor="middle" fill="#666666" font-size="18" font-family="Arial">Immagine non disponibile</text>
</svg>"##;

#[derive(Debug, Deserialize)]
pub struct ImageProxyQuery {
    pub path: Option<String>,
    pub size: Option<String>,
}

/// Check a requested image path and size before anything touches the network.
pub fn validate(path: &str, size: &str) -> Result<(), ApiError> {
    if !IMAGE_PATH.is_match(path) {
        return Err(ApiError::BadRequest(format!("invalid image path '{path}'")));
    }
    if !is_known_size(size) {
        return Err(ApiError::BadRequest(format!("unknown image size '{size}'")));
    }
    Ok(())
}

/// Cache file for `size` + `path`: sha256 of both, keeping the extension.
pub fn cache_file(cache_dir: &Path, size: &str, path: &str) -> PathBuf {
    let digest = Sha256::digest(format!("{size}{path}").as_bytes());
    let ext = path.rsplit('.').next().unwrap_or("jpg");
    cache_dir
        .join("images")
        .join(format!("{}.{ext}", hex::encode(digest)))
}

fn content_type_for(path: &Path) -> &'static str {
    match path.extension().and_then(|e| e.to_str()) {
        Some("png") => "image/png",
        Some("webp") => "image/webp",
        Some("svg") => "image/svg+xml",
        _ => "image/jpeg",
    }
}

pub async fn proxy_image(
    State(state): State<AppState>,
    Query(query): Query<ImageProxyQuery>,
) -> Result<Response, AppError> {
    let path = query
        .path
        .filter(|p| !p.is_empty())
        .ok_or_else(|| ApiError::BadRequest("path parameter is required".into()))?;
    let size = query.size.unwrap_or_else(|| DEFAULT_SIZE.to_string());
    validate(&path, &size)?;

    let cache_path = cache_file(&state.config.cache_dir, &size, &path);
    let content_type = content_type_for(&cache_path);

    if let Ok(bytes) = tokio::fs::read(&cache_path).await {
        debug!(path = %path, size = %size, "image cache hit");
        return Ok(image_response(content_type, bytes));
    }

    let url = format!("{}/{size}{path}", state.config.image_base_url);
    match fetch(&state.http, &url).await {
        Ok(bytes) => {
            if let Err(e) = store(&cache_path, &bytes).await {
                warn!(path = %cache_path.display(), error = %e, "failed to cache image");
            }
            Ok(image_response(content_type, bytes))
        }
        Err(e) => {
            warn!(url = %url, error = %e, "image fetch failed, serving placeholder");
            Ok(placeholder())
        }
    }
}

async fn fetch(client: &reqwest::Client, url: &str) -> Result<Vec<u8>, reqwest::Error> {
    let resp = client.get(url).send().await?.error_for_status()?;
    Ok(resp.bytes().await?.to_vec())
}

async fn store(cache_path: &Path, bytes: &[u8]) -> std::io::Result<()> {
    if let Some(dir) = cache_path.parent() {
        tokio::fs::create_dir_all(dir).await?;
    }
    tokio::fs::write(cache_path, bytes).await
}

fn image_response(content_type: &'static str, bytes: Vec<u8>) -> Response {
    (
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, content_type),
            (header::CACHE_CONTROL, "public, max-age=31536000, immutable"),
        ],
        bytes,
    )
        .into_response()
}

fn placeholder() -> Response {
    (
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, "image/svg+xml"),
            (header::CACHE_CONTROL, "no-cache"),
        ],
        PLACEHOLDER_SVG,
    )
        .into_response()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_tmdb_style_paths() {
        assert!(validate("/kqjL17yufvn9OVLyXYpvtyrFfak.jpg", "w500").is_ok());
        assert!(validate("/abc-def_1.png", "original").is_ok());
    }

    #[test]
    fn rejects_traversal_and_urls() {
        for bad in ["../etc/passwd", "/../../etc/passwd.jpg", "//evil.com/x.jpg", "/a/b.jpg", "/x.exe"] {
            assert!(validate(bad, "w500").is_err(), "{bad} should be rejected");
        }
    }

    #[test]
    fn rejects_unknown_size() {
        assert!(validate("/a.jpg", "w9999").is_err());
    }

    #[test]
    fn cache_key_depends_on_size_and_path() {
        let dir = Path::new("/cache");
        let a = cache_file(dir, "w500", "/a.jpg");
        let b = cache_file(dir, "w780", "/a.jpg");
        assert_ne!(a, b);
        assert_eq!(a, cache_file(dir, "w500", "/a.jpg"));
        assert_eq!(a.extension().and_then(|e| e.to_str()), Some("jpg"));
        assert!(a.starts_with("/cache/images"));
    }
}
