// Metadata endpoints: titles, descriptions, playlists, numbering, tags,
// categories, language and whole-content analysis.

use crate::analysis;
use crate::db;
use crate::error::{AppError, AppResult};
use crate::extract::JsonOrForm;
use crate::numbering::{generate_hierarchical_number, VideoType};
use crate::AppState;
use axum::{extract::Extension, response::Json, routing::post, Router};
use serde::Deserialize;
use serde_json::{json, Value};
use std::future::Future;
use std::sync::Arc;

/// Attempts before giving up on finding an unused hierarchical number.
const MAX_NUMBER_ATTEMPTS: usize = 10;

const MAX_TAGS_LIMIT: usize = 50;
const TITLE_SCORE_KEYWORDS: usize = 10;

pub fn content_routes() -> Router {
    Router::new()
        .route("/generate_title", post(generate_title))
        .route("/enhance_description", post(enhance_description))
        .route("/assign_playlist", post(assign_playlist))
        .route("/generate_number", post(generate_number))
        .route("/generate_tags", post(generate_tags))
        .route("/suggest_category", post(suggest_category))
        .route("/analyze_content", post(analyze_content))
        .route("/analyze_tags_content", post(analyze_tags_content))
        .route("/analyze_playlist_content", post(analyze_playlist_content))
        .route("/detect_language", post(detect_language))
}

#[derive(Debug, Deserialize)]
pub struct ContentRequest {
    #[serde(alias = "text", alias = "transcription")]
    pub content: String,
}

#[derive(Debug, Deserialize)]
pub struct TranscriptionRequest {
    #[serde(alias = "content")]
    pub transcription: String,
}

#[derive(Debug, Deserialize)]
pub struct LanguageRequest {
    #[serde(alias = "content")]
    pub text: String,
}

#[derive(Debug, Deserialize)]
pub struct NumberRequest {
    pub video_type: String,
    #[serde(default)]
    pub parent_number: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct TagsRequest {
    #[serde(alias = "text")]
    pub content: String,
    #[serde(default)]
    pub max_tags: Option<usize>,
}

pub async fn generate_title(JsonOrForm(req): JsonOrForm<ContentRequest>) -> Json<Value> {
    let title = analysis::generate_title(&req.content);
    let dist: analysis::text::FreqDist = analysis::text::content_words(&req.content)
        .into_iter()
        .collect();
    let keywords: Vec<String> = dist
        .most_common(TITLE_SCORE_KEYWORDS)
        .into_iter()
        .map(|(word, _)| word)
        .collect();
    let score = analysis::score_title(&title, &keywords);
    Json(json!({ "title": title, "score": score }))
}

pub async fn enhance_description(
    Extension(state): Extension<Arc<AppState>>,
    JsonOrForm(req): JsonOrForm<ContentRequest>,
) -> Json<Value> {
    let description = analysis::enhance_description(&req.content, &state.config.social_links);
    Json(json!({ "description": description }))
}

pub async fn assign_playlist(JsonOrForm(req): JsonOrForm<TranscriptionRequest>) -> Json<Value> {
    let assignment = analysis::assign_playlist(&req.transcription);
    Json(json!({
        "playlist": assignment.playlist,
        "keyword_count": assignment.keyword_count,
        "matched_keywords": assignment.matched_keywords,
    }))
}

/// Generates a number and checks it against stored videos, retrying on a
/// collision. If the database cannot be reached the unchecked number is
/// returned; the unique constraint still guards the eventual insert.
pub async fn generate_number(
    Extension(state): Extension<Arc<AppState>>,
    JsonOrForm(req): JsonOrForm<NumberRequest>,
) -> AppResult<Json<Value>> {
    let video_type: VideoType = req
        .video_type
        .parse()
        .map_err(|e: crate::numbering::NumberingError| AppError::bad_request(e.to_string()))?;

    let pool = &state.db_pool;
    let number = find_free_number(video_type, req.parent_number.as_deref(), |candidate| async move {
        db::number_exists(pool, &candidate).await
    })
    .await?;

    Ok(Json(json!({ "number": number })))
}

/// Draws up to `MAX_NUMBER_ATTEMPTS` numbers until `is_taken` reports one
/// as free. A failing check accepts the current candidate.
pub async fn find_free_number<F, Fut>(
    video_type: VideoType,
    parent_number: Option<&str>,
    mut is_taken: F,
) -> AppResult<String>
where
    F: FnMut(String) -> Fut,
    Fut: Future<Output = Result<bool, sqlx::Error>>,
{
    for attempt in 1..=MAX_NUMBER_ATTEMPTS {
        // ThreadRng is not Send, keep it out of the await below
        let number = {
            let mut rng = rand::thread_rng();
            generate_hierarchical_number(video_type, parent_number, &mut rng)
                .map_err(|e| AppError::bad_request(e.to_string()))?
        };

        match is_taken(number.clone()).await {
            Ok(false) => return Ok(number),
            Ok(true) => {
                tracing::debug!(number = %number, attempt, "hierarchical number already taken");
            }
            Err(e) => {
                tracing::warn!("Could not check hierarchical number uniqueness: {}", e);
                return Ok(number);
            }
        }
    }

    Err(AppError::Conflict(format!(
        "No free {} number found after {} attempts",
        video_type, MAX_NUMBER_ATTEMPTS
    )))
}

pub async fn generate_tags(JsonOrForm(req): JsonOrForm<TagsRequest>) -> Json<Value> {
    let max_tags = req
        .max_tags
        .unwrap_or(analysis::DEFAULT_MAX_TAGS)
        .clamp(1, MAX_TAGS_LIMIT);
    let tags = analysis::generate_tags(&req.content, max_tags);
    Json(json!({ "tags": tags }))
}

pub async fn suggest_category(JsonOrForm(req): JsonOrForm<ContentRequest>) -> Json<Value> {
    Json(json!(analysis::suggest_category(&req.content)))
}

pub async fn analyze_content(JsonOrForm(req): JsonOrForm<ContentRequest>) -> Json<Value> {
    Json(json!(analysis::analyze_content(&req.content)))
}

pub async fn analyze_tags_content(JsonOrForm(req): JsonOrForm<ContentRequest>) -> Json<Value> {
    Json(json!(analysis::analyze_tags(&req.content)))
}

pub async fn analyze_playlist_content(JsonOrForm(req): JsonOrForm<ContentRequest>) -> Json<Value> {
    let assignment = analysis::assign_playlist(&req.content);
    let scores = analysis::score_playlists(&req.content);
    Json(json!({
        "playlist": assignment.playlist,
        "keyword_count": assignment.keyword_count,
        "scores": scores,
    }))
}

pub async fn detect_language(JsonOrForm(req): JsonOrForm<LanguageRequest>) -> Json<Value> {
    Json(json!(analysis::detect_language(&req.text)))
}
