// YouTube Data API v3 client for video uploads
// Docs: https://developers.google.com/youtube/v3

use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::path::Path;

pub const DEFAULT_CATEGORY_ID: &str = "22"; // People & Blogs
pub const PRIVACY_STATUSES: &[&str] = &["public", "private", "unlisted"];

const UPLOAD_URL: &str = "https://www.googleapis.com/upload/youtube/v3/videos";
const THUMBNAIL_URL: &str = "https://www.googleapis.com/upload/youtube/v3/thumbnails/set";
const PLAYLIST_ITEMS_URL: &str = "https://www.googleapis.com/youtube/v3/playlistItems";

pub type YouTubeResult<T> = Result<T, Box<dyn std::error::Error + Send + Sync>>;

#[derive(Debug, Clone)]
pub struct YouTubeClient {
    client: Client,
}

// ============================================================================
// Video Upload Structures
// ============================================================================

#[derive(Debug, Serialize)]
pub struct VideoSnippet {
    pub title: String,
    pub description: String,
    #[serde(rename = "categoryId")]
    pub category_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,
}

#[derive(Debug, Serialize)]
pub struct VideoStatus {
    #[serde(rename = "privacyStatus")]
    pub privacy_status: String,
}

#[derive(Debug, Serialize)]
pub struct VideoResource {
    pub snippet: VideoSnippet,
    pub status: VideoStatus,
}

#[derive(Debug, Deserialize)]
pub struct VideoUploadResponse {
    pub id: String,
    pub snippet: VideoResponseSnippet,
}

#[derive(Debug, Deserialize)]
pub struct VideoResponseSnippet {
    pub title: String,
    #[serde(rename = "publishedAt")]
    pub published_at: String,
}

#[derive(Debug, Deserialize)]
pub struct PlaylistItemResponse {
    pub id: String,
}

/// Metadata for one upload, validated before any bytes are sent.
#[derive(Debug, Clone)]
pub struct UploadMetadata {
    pub title: String,
    pub description: String,
    pub privacy_status: String,
    pub category_id: Option<String>,
    pub tags: Option<Vec<String>>,
}

impl UploadMetadata {
    pub fn validate(&self) -> Result<(), String> {
        if self.title.trim().is_empty() {
            return Err("Title is required".to_string());
        }
        if self.title.chars().count() > 100 {
            return Err("Title must be at most 100 characters".to_string());
        }
        if !PRIVACY_STATUSES.contains(&self.privacy_status.as_str()) {
            return Err("Invalid privacy status. Must be 'public', 'private', or 'unlisted'".to_string());
        }
        Ok(())
    }

    pub fn to_resource(&self) -> VideoResource {
        VideoResource {
            snippet: VideoSnippet {
                title: self.title.clone(),
                description: self.description.clone(),
                category_id: self
                    .category_id
                    .clone()
                    .unwrap_or_else(|| DEFAULT_CATEGORY_ID.to_string()),
                tags: self.tags.clone().filter(|t| !t.is_empty()),
            },
            status: VideoStatus {
                privacy_status: self.privacy_status.clone(),
            },
        }
    }
}

// ============================================================================
// YouTube Client Implementation
// ============================================================================

impl Default for YouTubeClient {
    fn default() -> Self {
        Self::new()
    }
}

impl YouTubeClient {
    pub fn new() -> Self {
        Self {
            client: Client::new(),
        }
    }

    pub fn http(&self) -> &Client {
        &self.client
    }

    /// Upload video to YouTube (multipart: JSON metadata + media bytes)
    pub async fn upload_video(
        &self,
        access_token: &str,
        video_path: &Path,
        metadata: &UploadMetadata,
    ) -> YouTubeResult<VideoUploadResponse> {
        metadata.validate()?;

        let video_data = tokio::fs::read(video_path).await?;
        let file_name = video_path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("video.mp4")
            .to_string();

        let metadata_json = serde_json::to_string(&metadata.to_resource())?;

        let form = reqwest::multipart::Form::new()
            .part(
                "snippet",
                reqwest::multipart::Part::text(metadata_json).mime_str("application/json")?,
            )
            .part(
                "media",
                reqwest::multipart::Part::bytes(video_data)
                    .file_name(file_name)
                    .mime_str("video/*")?,
            );

        let response = self
            .client
            .post(UPLOAD_URL)
            .query(&[("part", "snippet,status"), ("uploadType", "multipart")])
            .header("Authorization", format!("Bearer {}", access_token))
            .multipart(form)
            .send()
            .await?;

        if !response.status().is_success() {
            let error_text = response.text().await?;
            tracing::error!("YouTube upload failed: {}", error_text);
            return Err(format!("Failed to upload video: {}", error_text).into());
        }

        let upload_response: VideoUploadResponse = response.json().await?;

        tracing::info!(
            "Video uploaded to YouTube: {} (ID: {})",
            upload_response.snippet.title,
            upload_response.id
        );

        Ok(upload_response)
    }

    /// Upload a custom thumbnail for a video
    ///
    /// Required scope: https://www.googleapis.com/auth/youtube
    pub async fn upload_thumbnail(
        &self,
        access_token: &str,
        video_id: &str,
        image_data: Vec<u8>,
        content_type: &str,
    ) -> YouTubeResult<()> {
        tracing::info!("Uploading custom thumbnail for video: {}", video_id);

        let response = self
            .client
            .post(THUMBNAIL_URL)
            .query(&[("videoId", video_id)])
            .header("Authorization", format!("Bearer {}", access_token))
            .header("Content-Type", content_type)
            .body(image_data)
            .send()
            .await?;

        if !response.status().is_success() {
            let error_text = response.text().await?;
            tracing::error!("Failed to upload thumbnail for {}: {}", video_id, error_text);
            return Err(format!("Failed to upload thumbnail: {}", error_text).into());
        }

        Ok(())
    }

    /// Add a video to an existing YouTube playlist
    pub async fn add_video_to_playlist(
        &self,
        access_token: &str,
        playlist_id: &str,
        video_id: &str,
    ) -> YouTubeResult<PlaylistItemResponse> {
        let body = json!({
            "snippet": {
                "playlistId": playlist_id,
                "resourceId": {
                    "kind": "youtube#video",
                    "videoId": video_id,
                },
            }
        });

        let response = self
            .client
            .post(PLAYLIST_ITEMS_URL)
            .query(&[("part", "snippet")])
            .header("Authorization", format!("Bearer {}", access_token))
            .json(&body)
            .send()
            .await?;

        if !response.status().is_success() {
            let error_text = response.text().await?;
            return Err(format!("Failed to add video to playlist: {}", error_text).into());
        }

        let item_response: PlaylistItemResponse = response.json().await?;
        Ok(item_response)
    }
}

pub fn watch_url(video_id: &str) -> String {
    format!("https://www.youtube.com/watch?v={}", video_id)
}
