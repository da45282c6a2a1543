// src/handlers/videos.rs
use axum::{
    extract::{Extension, Path, Query},
    http::StatusCode,
    response::Json,
    routing::get,
    Router,
};
use serde::Deserialize;
use std::sync::Arc;

use crate::db;
use crate::error::{AppError, AppResult};
use crate::extract::JsonOrForm;
use crate::models::video::{NewVideo, Video};
use crate::AppState;

const DEFAULT_PAGE_SIZE: i64 = 50;
const MAX_PAGE_SIZE: i64 = 200;

pub fn video_routes() -> Router {
    Router::new()
        .route("/videos", get(list_videos).post(create_video))
        .route("/videos/:id", get(get_video))
}

#[derive(Debug, Deserialize)]
pub struct ListQuery {
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

pub async fn create_video(
    Extension(state): Extension<Arc<AppState>>,
    JsonOrForm(new_video): JsonOrForm<NewVideo>,
) -> AppResult<(StatusCode, Json<Video>)> {
    new_video.validate().map_err(AppError::bad_request)?;
    let video = db::insert_video(&state.db_pool, &new_video).await?;
    tracing::info!(id = video.id, number = %video.hierarchical_number, "Video recorded");
    Ok((StatusCode::CREATED, Json(video)))
}

pub async fn list_videos(
    Extension(state): Extension<Arc<AppState>>,
    Query(query): Query<ListQuery>,
) -> AppResult<Json<Vec<Video>>> {
    let limit = query.limit.unwrap_or(DEFAULT_PAGE_SIZE).clamp(1, MAX_PAGE_SIZE);
    let offset = query.offset.unwrap_or(0).max(0);
    let videos = db::list_videos(&state.db_pool, limit, offset).await?;
    Ok(Json(videos))
}

pub async fn get_video(
    Path(id): Path<i32>,
    Extension(state): Extension<Arc<AppState>>,
) -> AppResult<Json<Video>> {
    db::get_video(&state.db_pool, id)
        .await?
        .map(Json)
        .ok_or_else(|| AppError::NotFound(format!("Video {} not found", id)))
}
