// src/config.rs
use std::env;
use std::path::PathBuf;

use crate::analysis::SocialLinks;

/// Runtime configuration, read once at startup from the environment
/// (after `.env` has been loaded by `dotenvy`).
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub database_url: String,
    pub upload_dir: PathBuf,
    pub output_dir: PathBuf,
    pub client_secret_path: PathBuf,
    pub token_path: PathBuf,
    pub oauth_redirect_uri: String,
    pub speech_api_key: Option<String>,
    pub speech_language: String,
    pub max_upload_bytes: usize,
    pub thumbnail_font_file: Option<String>,
    pub social_links: SocialLinks,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 5000,
            database_url: String::new(),
            upload_dir: PathBuf::from("uploads"),
            output_dir: PathBuf::from("outputs"),
            client_secret_path: PathBuf::from("client_secret.json"),
            token_path: PathBuf::from("token.json"),
            oauth_redirect_uri: "http://localhost:5000/oauth/callback".to_string(),
            speech_api_key: None,
            speech_language: "en-US".to_string(),
            max_upload_bytes: 500 * 1024 * 1024,
            thumbnail_font_file: None,
            social_links: SocialLinks::default(),
        }
    }
}

impl AppConfig {
    pub fn from_env() -> Result<Self, String> {
        let defaults = Self::default();

        let database_url =
            env::var("DATABASE_URL").map_err(|_| "DATABASE_URL must be set".to_string())?;

        let port = match env::var("PORT") {
            Ok(raw) => raw
                .parse::<u16>()
                .map_err(|_| format!("PORT is not a valid port number: {}", raw))?,
            Err(_) => defaults.port,
        };

        let max_upload_mb = env::var("MAX_UPLOAD_MB")
            .ok()
            .and_then(|s| s.parse::<usize>().ok())
            .unwrap_or(500);

        let social_links = SocialLinks {
            twitter: env::var("SOCIAL_TWITTER").unwrap_or(defaults.social_links.twitter),
            instagram: env::var("SOCIAL_INSTAGRAM").unwrap_or(defaults.social_links.instagram),
            facebook: env::var("SOCIAL_FACEBOOK").unwrap_or(defaults.social_links.facebook),
        };

        Ok(Self {
            host: env::var("HOST").unwrap_or(defaults.host),
            port,
            database_url,
            upload_dir: env::var("UPLOAD_DIR").map(PathBuf::from).unwrap_or(defaults.upload_dir),
            output_dir: env::var("OUTPUT_DIR").map(PathBuf::from).unwrap_or(defaults.output_dir),
            client_secret_path: env::var("CLIENT_SECRET_PATH")
                .map(PathBuf::from)
                .unwrap_or(defaults.client_secret_path),
            token_path: env::var("TOKEN_PATH").map(PathBuf::from).unwrap_or(defaults.token_path),
            oauth_redirect_uri: env::var("OAUTH_REDIRECT_URI")
                .unwrap_or_else(|_| format!("http://localhost:{}/oauth/callback", port)),
            speech_api_key: env::var("SPEECH_API_KEY").ok().filter(|k| !k.is_empty()),
            speech_language: env::var("SPEECH_LANGUAGE").unwrap_or(defaults.speech_language),
            max_upload_bytes: max_upload_mb * 1024 * 1024,
            thumbnail_font_file: env::var("THUMBNAIL_FONT_FILE").ok().filter(|f| !f.is_empty()),
            social_links,
        })
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub fn thumbnail_dir(&self) -> PathBuf {
        self.output_dir.join("thumbnails")
    }
}
