// src/handlers/youtube.rs
//! OAuth consent flow and video upload to YouTube.

use axum::{
    extract::{Extension, Multipart, Query},
    response::Json,
    routing::{get, post},
    Router,
};
use serde::Deserialize;
use serde_json::{json, Value};
use std::sync::Arc;
use uuid::Uuid;

use crate::db;
use crate::error::{AppError, AppResult};
use crate::extract::MultipartForm;
use crate::media;
use crate::models::video::NewVideo;
use crate::numbering::{generate_hierarchical_number, parse_hierarchical_number, VideoType};
use crate::oauth::TokenStore;
use crate::youtube_client::{watch_url, UploadMetadata};
use crate::AppState;

const DEFAULT_PRIVACY_STATUS: &str = "private";

pub fn oauth_routes() -> Router {
    Router::new()
        .route("/oauth/authorize", get(oauth_authorize))
        .route("/oauth/callback", get(oauth_callback))
}

/// Upload route; the caller applies the body limit.
pub fn youtube_upload_routes() -> Router {
    Router::new().route("/upload_video", post(upload_video))
}

fn token_store(state: &AppState) -> AppResult<&TokenStore> {
    state
        .token_store
        .as_ref()
        .ok_or(AppError::NotConfigured("YouTube OAuth"))
}

pub async fn oauth_authorize(Extension(state): Extension<Arc<AppState>>) -> AppResult<Json<Value>> {
    let store = token_store(&state)?;
    let auth_url = store.begin_authorization().await;
    Ok(Json(json!({
        "auth_url": auth_url,
        "authorized": store.is_authorized().await,
    })))
}

#[derive(Debug, Deserialize)]
pub struct OAuthCallbackQuery {
    pub code: Option<String>,
    pub state: Option<String>,
    pub error: Option<String>,
}

pub async fn oauth_callback(
    Extension(state): Extension<Arc<AppState>>,
    Query(query): Query<OAuthCallbackQuery>,
) -> AppResult<Json<Value>> {
    let store = token_store(&state)?;

    let issued = match query.state.as_deref() {
        Some(oauth_state) => store.consume_state(oauth_state).await,
        None => false,
    };
    if !issued {
        tracing::warn!("OAuth callback with a missing or unknown state");
        return Err(AppError::Unauthorized("Invalid OAuth state".to_string()));
    }

    if let Some(error) = query.error {
        return Err(AppError::Unauthorized(format!("Authorization was denied: {}", error)));
    }
    let code = query
        .code
        .filter(|c| !c.is_empty())
        .ok_or_else(|| AppError::bad_request("Missing authorization code"))?;

    let token = store
        .exchange_code(&state.youtube_client, &code)
        .await
        .map_err(|e| AppError::upstream(format!("Failed to exchange authorization code: {}", e)))?;

    Ok(Json(json!({
        "authorized": true,
        "expires_at": token.expires_at,
        "scope": token.scope,
    })))
}

fn parse_tags(raw: Option<&str>) -> Option<Vec<String>> {
    let tags: Vec<String> = raw?
        .split(',')
        .map(|t| t.trim().to_string())
        .filter(|t| !t.is_empty())
        .collect();
    if tags.is_empty() {
        None
    } else {
        Some(tags)
    }
}

/// Uploads the `video` part, then applies the optional thumbnail and
/// playlist and stores the metadata. The temp file is always removed.
pub async fn upload_video(
    Extension(state): Extension<Arc<AppState>>,
    multipart: Multipart,
) -> AppResult<Json<Value>> {
    let store = token_store(&state)?;
    let mut form = MultipartForm::read(multipart).await?;
    let video = form.take_file("video")?;

    let metadata = UploadMetadata {
        title: form
            .field("title")
            .ok_or_else(|| AppError::bad_request("title is required"))?
            .to_string(),
        description: form.field("description").unwrap_or_default().to_string(),
        privacy_status: form
            .field("privacy_status")
            .unwrap_or(DEFAULT_PRIVACY_STATUS)
            .to_string(),
        category_id: form.field("category_id").map(str::to_string),
        tags: parse_tags(form.field("tags")),
    };
    metadata.validate().map_err(AppError::bad_request)?;

    if let Some(number) = form.field("hierarchical_number") {
        parse_hierarchical_number(number).map_err(|e| AppError::bad_request(e.to_string()))?;
    }

    let thumbnail_file = form.field("thumbnail_file").map(str::to_string);
    if let Some(name) = &thumbnail_file {
        if !media::is_thumbnail_file_name(name) {
            return Err(AppError::bad_request(format!("Invalid thumbnail file: {}", name)));
        }
    }

    let access_token = store
        .valid_access_token(&state.youtube_client)
        .await
        .map_err(|e| AppError::Unauthorized(e.to_string()))?;

    tokio::fs::create_dir_all(&state.config.upload_dir)
        .await
        .map_err(|e| AppError::internal(format!("Failed to create upload directory: {}", e)))?;
    let extension = std::path::Path::new(&video.file_name)
        .extension()
        .and_then(|e| e.to_str())
        .filter(|e| e.chars().all(|c| c.is_ascii_alphanumeric()))
        .unwrap_or("mp4");
    let video_path = state
        .config
        .upload_dir
        .join(format!("{}.{}", Uuid::new_v4(), extension));
    tokio::fs::write(&video_path, &video.bytes)
        .await
        .map_err(|e| AppError::internal(format!("Failed to save video: {}", e)))?;

    let uploaded = state
        .youtube_client
        .upload_video(&access_token, &video_path, &metadata)
        .await;

    if let Err(e) = tokio::fs::remove_file(&video_path).await {
        tracing::warn!("Failed to remove {}: {}", video_path.display(), e);
    }

    let uploaded = uploaded.map_err(|e| AppError::upstream(e.to_string()))?;
    let video_id = uploaded.id;

    if let Some(name) = thumbnail_file {
        let path = state.config.thumbnail_dir().join(&name);
        match tokio::fs::read(&path).await {
            Ok(image) => {
                if let Err(e) = state
                    .youtube_client
                    .upload_thumbnail(&access_token, &video_id, image, "image/jpeg")
                    .await
                {
                    tracing::warn!("Thumbnail not applied to {}: {}", video_id, e);
                }
            }
            Err(e) => tracing::warn!("Thumbnail {} could not be read: {}", name, e),
        }
    }

    if let Some(playlist_id) = form.field("youtube_playlist_id") {
        if let Err(e) = state
            .youtube_client
            .add_video_to_playlist(&access_token, playlist_id, &video_id)
            .await
        {
            tracing::warn!("Video {} not added to playlist {}: {}", video_id, playlist_id, e);
        }
    }

    let hierarchical_number = match form.field("hierarchical_number") {
        Some(number) => number.to_string(),
        None => {
            let mut rng = rand::thread_rng();
            generate_hierarchical_number(VideoType::Main, None, &mut rng)
                .map_err(|e| AppError::internal(e.to_string()))?
        }
    };

    let record = NewVideo {
        title: metadata.title.clone(),
        description: metadata.description.clone(),
        transcription: form.field("transcription").map(str::to_string),
        summary: form.field("summary").map(str::to_string),
        playlist: form.field("playlist").map(str::to_string),
        hierarchical_number,
        youtube_video_id: Some(video_id.clone()),
    };

    // The video is already on YouTube at this point, so a failed insert is not an error.
    let record_id = match record.validate() {
        Ok(()) => match db::insert_video(&state.db_pool, &record).await {
            Ok(video) => Some(video.id),
            Err(e) => {
                tracing::warn!("Uploaded video {} was not recorded: {}", video_id, e);
                None
            }
        },
        Err(e) => {
            tracing::warn!("Uploaded video {} has invalid record metadata: {}", video_id, e);
            None
        }
    };

    Ok(Json(json!({
        "video_id": video_id,
        "url": watch_url(&video_id),
        "record_id": record_id,
        "hierarchical_number": record.hierarchical_number,
    })))
}
