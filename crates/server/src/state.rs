use std::sync::Arc;

use nexplay_catalog::CatalogProvider;
use nexplay_hero::Clock;

use crate::config::ServerConfig;

/// Shared application state passed to all handlers.
#[derive(Clone)]
pub struct AppState {
    pub catalog: Arc<dyn CatalogProvider>,
    pub clock: Arc<dyn Clock>,
    pub config: Arc<ServerConfig>,
    /// Client for the image proxy's upstream fetches.
    pub http: reqwest::Client,
}
