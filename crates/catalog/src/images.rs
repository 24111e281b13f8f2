//! TMDB image URLs.

use serde::Serialize;

pub const IMAGE_BASE: &str = "https://image.tmdb.org/t/p";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageKind {
    Poster,
    Backdrop,
    Profile,
    Still,
}

impl ImageKind {
    /// Sizes the TMDB CDN serves for this kind.
    pub fn sizes(self) -> &'static [&'static str] {
        match self {
            Self::Poster => &["w92", "w154", "w185", "w342", "w500", "w780", "original"],
            Self::Backdrop => &["w300", "w780", "w1280", "original"],
            Self::Profile => &["w45", "w185", "h632", "original"],
            Self::Still => &["w92", "w185", "w300", "original"],
        }
    }
}

/// True if any image kind is served at `size`.
pub fn is_known_size(size: &str) -> bool {
    [
        ImageKind::Poster,
        ImageKind::Backdrop,
        ImageKind::Profile,
        ImageKind::Still,
    ]
    .iter()
    .any(|k| k.sizes().contains(&size))
}

/// Absolute CDN URL for an image path, or `None` when the title has no image.
pub fn image_url(path: Option<&str>, size: &str) -> Option<String> {
    path.filter(|p| !p.is_empty())
        .map(|p| format!("{IMAGE_BASE}/{size}{p}"))
}

/// `src`/`srcset`/`sizes` triple for responsive `<img>` markup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResponsiveImage {
    pub src: String,
    pub srcset: String,
    pub sizes: String,
}

pub fn responsive(path: Option<&str>, kind: ImageKind) -> Option<ResponsiveImage> {
    let path = path.filter(|p| !p.is_empty())?;
    let (src, widths, sizes): (&str, &[u32], &str) = match kind {
        ImageKind::Backdrop => (
            "w780",
            &[300, 780, 1280],
            "(max-width: 768px) 300px, (max-width: 1200px) 780px, 1280px",
        ),
        _ => (
            "w342",
            &[185, 342, 500],
            "(max-width: 640px) 185px, (max-width: 1024px) 342px, 500px",
        ),
    };

    let srcset = widths
        .iter()
        .map(|w| format!("{IMAGE_BASE}/w{w}{path} {w}w"))
        .collect::<Vec<_>>()
        .join(", ");

    Some(ResponsiveImage {
        src: image_url(Some(path), src)?,
        srcset,
        sizes: sizes.to_string(),
    })
}
