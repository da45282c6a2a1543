use std::sync::Arc;

use tube_automation::{
    build_router,
    config::AppConfig,
    db,
    media,
    oauth::{ClientSecret, TokenStore},
    transcription::{GoogleSpeechClient, SpeechRecognizer},
    youtube_client::YouTubeClient,
    AppState,
};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    init_logging()?;

    let config = AppConfig::from_env()?;

    for dir in [config.upload_dir.clone(), config.output_dir.clone(), config.thumbnail_dir()] {
        if let Err(e) = std::fs::create_dir_all(&dir) {
            tracing::warn!("Failed to create {} directory: {}", dir.display(), e);
        } else {
            tracing::info!("{} directory ready", dir.display());
        }
    }

    if let Err(e) = media::check_ffmpeg_available() {
        tracing::warn!("{} Transcription and thumbnails will fail.", e);
    }

    let db_pool = db::create_pool(&config.database_url).await?;

    // YouTube uploads need the OAuth client secret downloaded from Google Cloud
    let token_store = match ClientSecret::load(&config.client_secret_path).await {
        Ok(secret) => {
            tracing::info!("YouTube OAuth client loaded from {}", config.client_secret_path.display());
            Some(TokenStore::new(
                secret,
                config.oauth_redirect_uri.clone(),
                config.token_path.clone(),
            ))
        }
        Err(e) => {
            tracing::warn!(
                "YouTube uploads disabled, could not load {}: {}",
                config.client_secret_path.display(),
                e
            );
            None
        }
    };

    let speech: Option<Arc<dyn SpeechRecognizer>> = match &config.speech_api_key {
        Some(api_key) => {
            tracing::info!("Speech-to-Text enabled ({})", config.speech_language);
            Some(Arc::new(GoogleSpeechClient::new(
                api_key.clone(),
                config.speech_language.clone(),
            )))
        }
        None => {
            tracing::warn!("SPEECH_API_KEY not found. Transcription will return the fallback text.");
            None
        }
    };

    let bind_addr = config.bind_addr();
    let shared_state = Arc::new(AppState {
        config,
        db_pool,
        youtube_client: YouTubeClient::new(),
        token_store,
        speech,
    });

    let app = build_router(shared_state);

    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    tracing::info!("listening on {}", listener.local_addr()?);
    axum::serve(listener, app.into_make_service_with_connect_info::<std::net::SocketAddr>()).await?;

    Ok(())
}

fn init_logging() -> Result<(), Box<dyn std::error::Error>> {
    use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

    let log_level = std::env::var("RUST_LOG").unwrap_or_else(|_| {
        if cfg!(debug_assertions) {
            "debug,tube_automation=trace,sqlx=info,reqwest=info,hyper=info,tower=info".to_string()
        } else {
            "info,tube_automation=info,sqlx=warn,reqwest=warn,hyper=warn,tower=warn".to_string()
        }
    });

    let env_filter = EnvFilter::try_from_default_env().or_else(|_| EnvFilter::try_new(&log_level))?;

    let fmt_layer = if std::env::var("LOG_FORMAT").as_deref() == Ok("json") {
        fmt::layer()
            .json()
            .with_current_span(true)
            .with_span_list(false)
            .with_target(true)
            .with_thread_ids(true)
            .boxed()
    } else {
        fmt::layer()
            .with_target(true)
            .with_file(true)
            .with_line_number(true)
            .boxed()
    };

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .init();

    tracing::info!("Tube automation starting up");
    tracing::info!("Version: {}", env!("CARGO_PKG_VERSION"));
    tracing::info!("Build mode: {}", if cfg!(debug_assertions) { "development" } else { "production" });
    tracing::info!("Log level: {}", log_level);

    Ok(())
}
