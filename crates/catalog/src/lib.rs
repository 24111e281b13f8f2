pub mod feed;
pub mod images;
pub mod provider;
pub mod tmdb;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("provider error: {0}")]
    Provider(String),
    #[error("network error: {0}")]
    Network(String),
    #[error("decode error: {0}")]
    Decode(String),
    #[error("not found")]
    NotFound,
    #[error("unsupported: {0}")]
    Unsupported(String),
}

pub use provider::{CatalogProvider, DiscoverParams, ListKind, RelatedKind};
