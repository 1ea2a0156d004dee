use std::sync::Arc;

use crate::config::Config;
use crate::screening::pipeline::ScoringModels;
use crate::sessions::SessionRepository;
use crate::storage::FileStore;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    /// Embedder, entity extractor and text generator, loaded once at startup.
    pub models: ScoringModels,
    pub sessions: Arc<dyn SessionRepository>,
    pub files: Arc<dyn FileStore>,
    pub config: Config,
}
