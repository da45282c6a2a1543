// src/handlers/media.rs
use axum::{
    extract::{Extension, Multipart, Path},
    http::header,
    response::{IntoResponse, Json},
    routing::{get, post},
    Router,
};
use serde::Deserialize;
use serde_json::{json, Value};
use std::path::PathBuf;
use std::sync::Arc;
use tokio_util::io::ReaderStream;
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use crate::extract::{JsonOrForm, MultipartForm};
use crate::media::{self, ThumbnailStyle};
use crate::transcription::{self, TRANSCRIPTION_FALLBACK};
use crate::AppState;

/// Routes that take file uploads; the caller applies the body limit.
pub fn upload_routes() -> Router {
    Router::new()
        .route("/transcribe", post(transcribe))
        .route("/generate_thumbnail_from_video", post(generate_thumbnail_from_video))
}

pub fn media_routes() -> Router {
    Router::new()
        .route("/generate_custom_thumbnail", post(generate_custom_thumbnail))
        .route("/thumbnails/:file_name", get(serve_thumbnail))
}

fn transcription_fallback(error: &str) -> Json<Value> {
    Json(json!({
        "transcription": TRANSCRIPTION_FALLBACK,
        "summary": "",
        "error": error,
    }))
}

/// Speech-to-text for an uploaded `audio` file. Recognition problems are
/// reported inside a 200 body with the fallback transcription.
pub async fn transcribe(
    Extension(state): Extension<Arc<AppState>>,
    multipart: Multipart,
) -> AppResult<Json<Value>> {
    let mut form = MultipartForm::read(multipart).await?;
    let audio = form.take_file("audio")?;

    let Some(recognizer) = state.speech.as_ref() else {
        tracing::warn!("Transcription requested but no speech recognizer is configured");
        return Ok(transcription_fallback("Speech recognition is not configured"));
    };

    match transcription::transcribe_audio(
        recognizer.as_ref(),
        &audio.bytes,
        &audio.file_name,
        &state.config.upload_dir,
    )
    .await
    {
        Ok(transcript) => {
            tracing::info!(
                words = transcript.transcription.split_whitespace().count(),
                "Transcribed {}",
                audio.file_name
            );
            Ok(Json(json!(transcript)))
        }
        Err(e) => {
            tracing::error!("Transcription of {} failed: {}", audio.file_name, e);
            Ok(transcription_fallback(&e))
        }
    }
}

fn thumbnail_response(file_name: &str) -> Json<Value> {
    Json(json!({
        "thumbnail_url": format!("/thumbnails/{}", file_name),
        "file_name": file_name,
    }))
}

async fn new_thumbnail_path(state: &AppState) -> AppResult<(String, PathBuf)> {
    let dir = state.config.thumbnail_dir();
    tokio::fs::create_dir_all(&dir)
        .await
        .map_err(|e| AppError::internal(format!("Failed to create thumbnail directory: {}", e)))?;
    let file_name = format!("{}.jpg", Uuid::new_v4());
    let path = dir.join(&file_name);
    Ok((file_name, path))
}

pub async fn generate_thumbnail_from_video(
    Extension(state): Extension<Arc<AppState>>,
    multipart: Multipart,
) -> AppResult<Json<Value>> {
    let mut form = MultipartForm::read(multipart).await?;
    let video = form.take_file("video")?;
    let timestamp = form
        .parsed::<f64>("timestamp")?
        .unwrap_or(media::DEFAULT_FRAME_TIMESTAMP);
    let width = form
        .parsed::<u32>("width")?
        .unwrap_or(media::DEFAULT_THUMBNAIL_WIDTH);
    let height = form
        .parsed::<u32>("height")?
        .unwrap_or(media::DEFAULT_THUMBNAIL_HEIGHT);
    media::validate_dimensions(width, height).map_err(AppError::bad_request)?;

    tokio::fs::create_dir_all(&state.config.upload_dir)
        .await
        .map_err(|e| AppError::internal(format!("Failed to create upload directory: {}", e)))?;
    let video_path = state
        .config
        .upload_dir
        .join(format!("{}_frame_source", Uuid::new_v4()));
    tokio::fs::write(&video_path, &video.bytes)
        .await
        .map_err(|e| AppError::internal(format!("Failed to save video: {}", e)))?;

    let (file_name, output_path) = new_thumbnail_path(&state).await?;

    let (input, output) = (video_path.clone(), output_path.clone());
    let result = tokio::task::spawn_blocking(move || {
        media::create_thumbnail_scaled(&input, &output, timestamp, width, height)
    })
    .await;

    if let Err(e) = tokio::fs::remove_file(&video_path).await {
        tracing::warn!("Failed to remove {}: {}", video_path.display(), e);
    }

    result
        .map_err(|e| AppError::internal(format!("Thumbnail task failed: {}", e)))?
        .map_err(AppError::Media)?;

    tracing::info!("Thumbnail extracted from {} at {}s", video.file_name, timestamp);
    Ok(thumbnail_response(&file_name))
}

#[derive(Debug, Deserialize)]
pub struct CustomThumbnailRequest {
    pub text: String,
    #[serde(default)]
    pub background_color: Option<String>,
    #[serde(default)]
    pub text_color: Option<String>,
    #[serde(default)]
    pub font_size: Option<u32>,
    #[serde(default)]
    pub width: Option<u32>,
    #[serde(default)]
    pub height: Option<u32>,
}

impl CustomThumbnailRequest {
    fn into_style(self, font_file: Option<String>) -> ThumbnailStyle {
        let defaults = ThumbnailStyle::default();
        ThumbnailStyle {
            text: self.text,
            background_color: self.background_color.unwrap_or(defaults.background_color),
            text_color: self.text_color.unwrap_or(defaults.text_color),
            font_size: self.font_size.unwrap_or(defaults.font_size),
            width: self.width.unwrap_or(defaults.width),
            height: self.height.unwrap_or(defaults.height),
            font_file,
        }
    }
}

pub async fn generate_custom_thumbnail(
    Extension(state): Extension<Arc<AppState>>,
    JsonOrForm(req): JsonOrForm<CustomThumbnailRequest>,
) -> AppResult<Json<Value>> {
    let style = req.into_style(state.config.thumbnail_font_file.clone());
    media::validate_dimensions(style.width, style.height).map_err(AppError::bad_request)?;
    media::ffmpeg_color(&style.background_color).map_err(AppError::bad_request)?;
    media::ffmpeg_color(&style.text_color).map_err(AppError::bad_request)?;

    let (file_name, output_path) = new_thumbnail_path(&state).await?;

    tokio::task::spawn_blocking(move || media::render_text_thumbnail(&output_path, &style))
        .await
        .map_err(|e| AppError::internal(format!("Thumbnail task failed: {}", e)))?
        .map_err(AppError::Media)?;

    Ok(thumbnail_response(&file_name))
}

pub async fn serve_thumbnail(
    Path(file_name): Path<String>,
    Extension(state): Extension<Arc<AppState>>,
) -> AppResult<impl IntoResponse> {
    if !media::is_thumbnail_file_name(&file_name) {
        return Err(AppError::NotFound("Thumbnail not found".to_string()));
    }

    let path = state.config.thumbnail_dir().join(&file_name);
    let file = tokio::fs::File::open(&path)
        .await
        .map_err(|_| AppError::NotFound("Thumbnail not found".to_string()))?;

    let body = axum::body::Body::from_stream(ReaderStream::new(file));
    Ok((
        [
            (header::CONTENT_TYPE, "image/jpeg".to_string()),
            (header::CACHE_CONTROL, "public, max-age=3600".to_string()),
        ],
        body,
    ))
}
