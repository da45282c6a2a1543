use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::numbering::parse_hierarchical_number;

#[derive(Debug, Serialize, Deserialize, FromRow, Clone)]
pub struct Video {
    pub id: i32,
    pub title: String,
    pub description: String,
    pub transcription: Option<String>,
    pub summary: Option<String>,
    pub playlist: Option<String>,
    pub hierarchical_number: String,
    pub youtube_video_id: Option<String>,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

/// A finalized set of metadata, ready to be stored.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct NewVideo {
    pub title: String,
    pub description: String,
    #[serde(default)]
    pub transcription: Option<String>,
    #[serde(default)]
    pub summary: Option<String>,
    #[serde(default)]
    pub playlist: Option<String>,
    pub hierarchical_number: String,
    #[serde(default)]
    pub youtube_video_id: Option<String>,
}

impl NewVideo {
    /// Column limits from the `videos` table, plus the number's shape.
    pub fn validate(&self) -> Result<(), String> {
        if self.title.trim().is_empty() {
            return Err("title is required".to_string());
        }
        if self.title.chars().count() > 100 {
            return Err("title must be at most 100 characters".to_string());
        }
        if self.hierarchical_number.trim().is_empty() {
            return Err("hierarchical_number is required".to_string());
        }
        if self.hierarchical_number.chars().count() > 20 {
            return Err("hierarchical_number must be at most 20 characters".to_string());
        }
        parse_hierarchical_number(&self.hierarchical_number).map_err(|e| e.to_string())?;
        if self.playlist.as_ref().map(|p| p.chars().count() > 100).unwrap_or(false) {
            return Err("playlist must be at most 100 characters".to_string());
        }
        Ok(())
    }
}
