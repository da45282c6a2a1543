// src/db.rs
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use std::time::Duration;

use crate::models::video::{NewVideo, Video};

pub async fn create_pool(database_url: &str) -> Result<PgPool, sqlx::Error> {
    let pool = PgPoolOptions::new()
        .max_connections(5)
        .acquire_timeout(Duration::from_secs(30))
        .idle_timeout(Duration::from_secs(300))
        .test_before_acquire(true)
        .connect(database_url)
        .await?;

    // Run migrations on startup
    run_migrations(&pool).await?;

    Ok(pool)
}

pub async fn run_migrations(pool: &PgPool) -> Result<(), sqlx::Error> {
    tracing::info!("Running database migrations...");
    sqlx::migrate!("./migrations").run(pool).await?;
    tracing::info!("Database migrations completed successfully");
    Ok(())
}

pub async fn insert_video(pool: &PgPool, video: &NewVideo) -> Result<Video, sqlx::Error> {
    sqlx::query_as::<_, Video>(
        "INSERT INTO videos (
            title, description, transcription, summary, playlist,
            hierarchical_number, youtube_video_id
        ) VALUES ($1, $2, $3, $4, $5, $6, $7)
        RETURNING *",
    )
    .bind(&video.title)
    .bind(&video.description)
    .bind(&video.transcription)
    .bind(&video.summary)
    .bind(&video.playlist)
    .bind(&video.hierarchical_number)
    .bind(&video.youtube_video_id)
    .fetch_one(pool)
    .await
}

pub async fn get_video(pool: &PgPool, id: i32) -> Result<Option<Video>, sqlx::Error> {
    sqlx::query_as::<_, Video>("SELECT * FROM videos WHERE id = $1")
        .bind(id)
        .fetch_optional(pool)
        .await
}

pub async fn list_videos(pool: &PgPool, limit: i64, offset: i64) -> Result<Vec<Video>, sqlx::Error> {
    sqlx::query_as::<_, Video>(
        "SELECT * FROM videos ORDER BY created_at DESC, id DESC LIMIT $1 OFFSET $2",
    )
    .bind(limit)
    .bind(offset)
    .fetch_all(pool)
    .await
}

pub async fn number_exists(pool: &PgPool, number: &str) -> Result<bool, sqlx::Error> {
    let exists: bool =
        sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM videos WHERE hierarchical_number = $1)")
            .bind(number)
            .fetch_one(pool)
            .await?;
    Ok(exists)
}
