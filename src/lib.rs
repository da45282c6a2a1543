// lib.rs - Library root: modules, shared state and the router
pub mod analysis;
pub mod config;
pub mod db;
pub mod error;
pub mod extract;
pub mod handlers;
pub mod media;
pub mod middleware;
pub mod models;
pub mod numbering;
pub mod oauth;
pub mod transcription;
pub mod youtube_client;

use axum::{extract::DefaultBodyLimit, Extension, Router};
use std::sync::Arc;
use tower_http::cors::CorsLayer;

use config::AppConfig;
use oauth::TokenStore;
use transcription::SpeechRecognizer;
use youtube_client::YouTubeClient;

// Shared by every handler through an `Extension<Arc<AppState>>`.
// Optional collaborators are `None` when their credentials are missing.
pub struct AppState {
    pub config: AppConfig,
    pub db_pool: sqlx::PgPool,
    pub youtube_client: YouTubeClient,
    pub token_store: Option<TokenStore>,
    pub speech: Option<Arc<dyn SpeechRecognizer>>,
}

pub fn build_router(state: Arc<AppState>) -> Router {
    let upload_limit = DefaultBodyLimit::max(state.config.max_upload_bytes);

    let uploads = Router::new()
        .merge(handlers::media::upload_routes())
        .merge(handlers::youtube::youtube_upload_routes())
        .layer(upload_limit);

    Router::new()
        .merge(handlers::ui::ui_routes())
        .merge(handlers::content::content_routes())
        .merge(handlers::media::media_routes())
        .merge(handlers::youtube::oauth_routes())
        .merge(handlers::videos::video_routes())
        .merge(handlers::status::status_routes())
        .merge(uploads)
        .layer(axum::middleware::from_fn(middleware::logging::request_logging_middleware))
        .layer(CorsLayer::permissive())
        .layer(Extension(state))
}
