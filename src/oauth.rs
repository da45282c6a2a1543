// Google OAuth 2.0 installed-app flow for the YouTube upload scope.
//
// Client credentials come from the `client_secret.json` downloaded from the
// Google Cloud console. The obtained token (with its refresh token) is kept
// in a JSON file so the channel only has to be authorized once.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::path::{Path, PathBuf};
use tokio::sync::Mutex;
use uuid::Uuid;

use crate::youtube_client::YouTubeClient;

pub const SCOPES: &[&str] = &[
    "https://www.googleapis.com/auth/youtube.upload",
    "https://www.googleapis.com/auth/youtube",
];

const DEFAULT_AUTH_URI: &str = "https://accounts.google.com/o/oauth2/auth";
const DEFAULT_TOKEN_URI: &str = "https://oauth2.googleapis.com/token";

/// Refresh when fewer than this many minutes remain.
const REFRESH_MARGIN_MINUTES: i64 = 5;

/// Outstanding consent requests; the oldest state is forgotten first.
const MAX_PENDING_STATES: usize = 16;

pub type OAuthResult<T> = Result<T, Box<dyn std::error::Error + Send + Sync>>;

#[derive(Debug, Clone, Deserialize)]
pub struct ClientSecret {
    pub client_id: String,
    pub client_secret: String,
    #[serde(default = "default_auth_uri")]
    pub auth_uri: String,
    #[serde(default = "default_token_uri")]
    pub token_uri: String,
    #[serde(default)]
    pub redirect_uris: Vec<String>,
}

fn default_auth_uri() -> String {
    DEFAULT_AUTH_URI.to_string()
}

fn default_token_uri() -> String {
    DEFAULT_TOKEN_URI.to_string()
}

#[derive(Debug, Deserialize)]
struct ClientSecretFile {
    installed: Option<ClientSecret>,
    web: Option<ClientSecret>,
}

impl ClientSecret {
    pub fn parse(raw: &str) -> OAuthResult<Self> {
        let file: ClientSecretFile = serde_json::from_str(raw)?;
        file.installed
            .or(file.web)
            .ok_or_else(|| "client secret file has neither an 'installed' nor a 'web' section".into())
    }

    pub async fn load(path: &Path) -> OAuthResult<Self> {
        let raw = tokio::fs::read_to_string(path).await?;
        Self::parse(&raw)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StoredToken {
    pub access_token: String,
    pub refresh_token: Option<String>,
    pub expires_at: DateTime<Utc>,
    pub scope: Option<String>,
}

impl StoredToken {
    pub fn needs_refresh(&self, now: DateTime<Utc>) -> bool {
        self.expires_at < now + Duration::minutes(REFRESH_MARGIN_MINUTES)
    }
}

#[derive(Debug, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    pub expires_in: i64,
    pub refresh_token: Option<String>,
    pub scope: Option<String>,
}

/// Token file plus the credentials needed to refresh it. The mutex keeps
/// concurrent uploads from refreshing and rewriting the file at once.
///
/// Every consent URL carries a random `state`; the callback is only
/// honoured for a state this store issued, and each state works once.
pub struct TokenStore {
    secret: ClientSecret,
    redirect_uri: String,
    token_path: PathBuf,
    lock: Mutex<()>,
    pending_states: Mutex<VecDeque<String>>,
}

impl TokenStore {
    pub fn new(secret: ClientSecret, redirect_uri: String, token_path: PathBuf) -> Self {
        Self {
            secret,
            redirect_uri,
            token_path,
            lock: Mutex::new(()),
            pending_states: Mutex::new(VecDeque::new()),
        }
    }

    /// Consent URL with a freshly issued state.
    pub async fn begin_authorization(&self) -> String {
        let state = Uuid::new_v4().to_string();
        let mut pending = self.pending_states.lock().await;
        if pending.len() >= MAX_PENDING_STATES {
            pending.pop_front();
        }
        pending.push_back(state.clone());
        self.authorization_url(&state)
    }

    /// True if `state` was issued by `begin_authorization` and not used yet.
    pub async fn consume_state(&self, state: &str) -> bool {
        let mut pending = self.pending_states.lock().await;
        match pending.iter().position(|issued| issued == state) {
            Some(index) => {
                pending.remove(index);
                true
            }
            None => false,
        }
    }

    pub fn authorization_url(&self, state: &str) -> String {
        let scope = SCOPES.join(" ");
        format!(
            "{}?client_id={}&redirect_uri={}&response_type=code&scope={}&access_type=offline&prompt=consent&state={}",
            self.secret.auth_uri,
            urlencoding::encode(&self.secret.client_id),
            urlencoding::encode(&self.redirect_uri),
            urlencoding::encode(&scope),
            urlencoding::encode(state),
        )
    }

    async fn read_token(&self) -> OAuthResult<Option<StoredToken>> {
        match tokio::fs::read_to_string(&self.token_path).await {
            Ok(raw) => Ok(Some(serde_json::from_str(&raw)?)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    async fn write_token(&self, token: &StoredToken) -> OAuthResult<()> {
        let raw = serde_json::to_string_pretty(token)?;
        tokio::fs::write(&self.token_path, raw).await?;
        Ok(())
    }

    pub async fn is_authorized(&self) -> bool {
        matches!(self.read_token().await, Ok(Some(_)))
    }

    async fn request_token(
        &self,
        youtube: &YouTubeClient,
        params: &[(&str, &str)],
    ) -> OAuthResult<TokenResponse> {
        let response = youtube
            .http()
            .post(&self.secret.token_uri)
            .form(params)
            .send()
            .await?;

        if !response.status().is_success() {
            let error_text = response.text().await?;
            return Err(format!("Token request failed: {}", error_text).into());
        }

        Ok(response.json().await?)
    }

    /// Exchange the authorization code from the consent redirect and
    /// persist the resulting token.
    pub async fn exchange_code(&self, youtube: &YouTubeClient, code: &str) -> OAuthResult<StoredToken> {
        let _guard = self.lock.lock().await;

        let response = self
            .request_token(
                youtube,
                &[
                    ("code", code),
                    ("client_id", self.secret.client_id.as_str()),
                    ("client_secret", self.secret.client_secret.as_str()),
                    ("redirect_uri", self.redirect_uri.as_str()),
                    ("grant_type", "authorization_code"),
                ],
            )
            .await?;

        let token = StoredToken {
            access_token: response.access_token,
            refresh_token: response.refresh_token,
            expires_at: Utc::now() + Duration::seconds(response.expires_in),
            scope: response.scope,
        };
        self.write_token(&token).await?;
        tracing::info!("YouTube authorization stored at {}", self.token_path.display());
        Ok(token)
    }

    /// Current access token, refreshed first when it is about to expire.
    pub async fn valid_access_token(&self, youtube: &YouTubeClient) -> OAuthResult<String> {
        let _guard = self.lock.lock().await;

        let mut token = self
            .read_token()
            .await?
            .ok_or("YouTube is not authorized yet. Visit /oauth/authorize first")?;

        if !token.needs_refresh(Utc::now()) {
            return Ok(token.access_token);
        }

        let refresh_token = token
            .refresh_token
            .clone()
            .ok_or("Stored token has expired and has no refresh token. Re-authorize via /oauth/authorize")?;

        tracing::info!("Refreshing YouTube access token");
        let response = self
            .request_token(
                youtube,
                &[
                    ("client_id", self.secret.client_id.as_str()),
                    ("client_secret", self.secret.client_secret.as_str()),
                    ("refresh_token", refresh_token.as_str()),
                    ("grant_type", "refresh_token"),
                ],
            )
            .await?;

        token.access_token = response.access_token;
        token.expires_at = Utc::now() + Duration::seconds(response.expires_in);
        if response.refresh_token.is_some() {
            token.refresh_token = response.refresh_token;
        }
        self.write_token(&token).await?;

        Ok(token.access_token)
    }
}
