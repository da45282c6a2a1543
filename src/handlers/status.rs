use axum::{extract::Extension, response::Json, routing::get, Router};
use serde_json::{json, Value};
use std::sync::Arc;

use crate::media;
use crate::AppState;

pub fn status_routes() -> Router {
    Router::new().route("/api/status", get(api_status))
}

pub async fn api_status(Extension(state): Extension<Arc<AppState>>) -> Json<Value> {
    let db_status = match sqlx::query("SELECT 1").fetch_one(&state.db_pool).await {
        Ok(_) => "healthy",
        Err(_) => "unhealthy",
    };

    let ffmpeg_status = match tokio::task::spawn_blocking(media::check_ffmpeg_available).await {
        Ok(Ok(())) => "available",
        _ => "missing",
    };

    let youtube_status = match &state.token_store {
        Some(store) if store.is_authorized().await => "authorized",
        Some(_) => "not_authorized",
        None => "not_configured",
    };
    let speech_status = if state.speech.is_some() { "configured" } else { "not_configured" };

    Json(json!({
        "status": "operational",
        "version": env!("CARGO_PKG_VERSION"),
        "services": {
            "database": db_status,
            "ffmpeg": ffmpeg_status,
            "youtube": youtube_status,
            "speech_to_text": speech_status,
        },
    }))
}
