#![allow(dead_code)]

use chrono::{Duration, Utc};
use creator_studio::database::entities::{creator_profiles, users};
use creator_studio::database::{establish_connection, get_database_url, setup_database};
use creator_studio::services::{ContentPayload, EpisodeInput, SubmissionPayload};
use creator_studio::CreatorStudio;
use sea_orm::{ActiveModelTrait, DatabaseConnection, EntityTrait, Set};
use tempfile::NamedTempFile;

pub const ADMIN_ID: i32 = 1000;

/// Fresh in-memory SQLite database with the full schema.
pub async fn setup_test_db() -> DatabaseConnection {
    let db = establish_connection("sqlite::memory:").await.unwrap();
    setup_database(&db).await.unwrap();
    db
}

/// File-backed database on the regular connection pool, for tests that need
/// several connections writing at once. Keep the file handle alive.
pub async fn setup_file_studio() -> (NamedTempFile, DatabaseConnection, CreatorStudio) {
    let file = NamedTempFile::new().unwrap();
    let path = file.path().display().to_string();
    let db = establish_connection(&get_database_url(Some(&path)))
        .await
        .unwrap();
    setup_database(&db).await.unwrap();
    let studio = CreatorStudio::new(db.clone());
    (file, db, studio)
}

pub async fn setup_studio() -> (DatabaseConnection, CreatorStudio) {
    let db = setup_test_db().await;
    let studio = CreatorStudio::new(db.clone());
    (db, studio)
}

/// Insert an identity snapshot whose account is `days_old` days old.
pub async fn create_user(db: &DatabaseConnection, username: &str, days_old: i64) -> users::Model {
    users::ActiveModel {
        username: Set(username.to_string()),
        created_at: Set(Utc::now() - Duration::days(days_old) - Duration::minutes(1)),
        ..Default::default()
    }
    .insert(db)
    .await
    .unwrap()
}

/// A user with an active creator profile, granted by an admin.
pub async fn create_creator(
    db: &DatabaseConnection,
    studio: &CreatorStudio,
    username: &str,
) -> (users::Model, creator_profiles::Model) {
    let user = create_user(db, username, 5).await;
    let profile = studio
        .grant_creator_access(user.id, ADMIN_ID)
        .await
        .into_data()
        .unwrap();
    (user, profile)
}

pub async fn set_limits(
    db: &DatabaseConnection,
    profile_id: i32,
    uploads: i32,
    storage_gb: f64,
    auto_approve: bool,
) -> creator_profiles::Model {
    let profile = creator_profiles::Entity::find_by_id(profile_id)
        .one(db)
        .await
        .unwrap()
        .unwrap();
    let mut active: creator_profiles::ActiveModel = profile.into();
    active.daily_upload_limit = Set(uploads);
    active.daily_storage_limit_gb = Set(storage_gb);
    active.is_auto_approve_enabled = Set(auto_approve);
    active.update(db).await.unwrap()
}

pub async fn reload_profile(db: &DatabaseConnection, profile_id: i32) -> creator_profiles::Model {
    creator_profiles::Entity::find_by_id(profile_id)
        .one(db)
        .await
        .unwrap()
        .unwrap()
}

pub fn movie(title: &str, size_gb: f64) -> SubmissionPayload {
    SubmissionPayload {
        title: title.to_string(),
        description: "A long enough description for review.".to_string(),
        genre: Some("drama".to_string()),
        year: Some(2024),
        thumbnail_url: Some("https://cdn.example/thumb.jpg".to_string()),
        banner_url: None,
        duration_minutes: Some(95),
        file_size_gb: size_gb,
        content: ContentPayload::Movie {
            video_url: Some("https://cdn.example/movie.mp4".to_string()),
        },
    }
}

pub fn episode(season: i32, number: i32, size_gb: f64) -> EpisodeInput {
    EpisodeInput {
        season_number: season,
        episode_number: number,
        title: None,
        description: None,
        video_url: Some(format!("https://cdn.example/s{}e{}.mp4", season, number)),
        thumbnail_url: None,
        duration_minutes: Some(42),
        file_size_gb: size_gb,
    }
}

pub fn series(title: &str, episodes: Vec<EpisodeInput>) -> SubmissionPayload {
    SubmissionPayload {
        title: title.to_string(),
        description: "A long enough description for review.".to_string(),
        genre: Some("comedy".to_string()),
        year: Some(1999),
        thumbnail_url: Some("https://cdn.example/series.jpg".to_string()),
        banner_url: Some("https://cdn.example/banner.jpg".to_string()),
        duration_minutes: None,
        file_size_gb: 0.0,
        content: ContentPayload::Series {
            episodes,
            series_status: Some("completed".to_string()),
        },
    }
}
