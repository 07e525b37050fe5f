//! Database functionality tests
//!
//! Schema creation and the storage-level uniqueness rules the pipeline relies on

use anyhow::Result;
use chrono::Utc;
use creator_studio::database::entities::*;
use creator_studio::database::migrations::Migrator;
use creator_studio::database::{establish_connection, get_database_url, setup_database};
use sea_orm::{ActiveModelTrait, DatabaseConnection, EntityTrait, Set};
use sea_orm_migration::MigratorTrait;
use tempfile::NamedTempFile;

/// Create a test database connection with migrations
async fn setup_test_db() -> Result<(DatabaseConnection, NamedTempFile)> {
    let temp_file = NamedTempFile::new()?;
    let path = temp_file.path().display().to_string();

    let db = establish_connection(&get_database_url(Some(&path))).await?;
    setup_database(&db).await?;

    Ok((db, temp_file))
}

fn movie_row(title: &str, slug: &str) -> movies::ActiveModel {
    movies::ActiveModel {
        title: Set(title.to_string()),
        slug: Set(slug.to_string()),
        description: Set("Catalog entry".to_string()),
        genre: Set("drama".to_string()),
        year: Set(Some(2020)),
        thumbnail_url: Set("https://cdn.example/t.jpg".to_string()),
        banner_url: Set(None),
        video_url: Set("https://cdn.example/v.mp4".to_string()),
        duration_minutes: Set(Some(90)),
        creator_id: Set(1),
        created_at: Set(Utc::now()),
        ..Default::default()
    }
}

#[tokio::test]
async fn test_database_migrations() -> Result<()> {
    let (db, _temp_file) = setup_test_db().await?;

    // Verify all tables exist by attempting to query them
    assert!(users::Entity::find().all(&db).await?.is_empty());
    assert!(creator_profiles::Entity::find().all(&db).await?.is_empty());
    assert!(creator_requests::Entity::find().all(&db).await?.is_empty());
    assert!(creator_strikes::Entity::find().all(&db).await?.is_empty());
    assert!(creator_settings::Entity::find().all(&db).await?.is_empty());
    assert!(daily_upload_tracking::Entity::find().all(&db).await?.is_empty());
    assert!(content_submissions::Entity::find().all(&db).await?.is_empty());
    assert!(submission_episodes::Entity::find().all(&db).await?.is_empty());
    assert!(movies::Entity::find().all(&db).await?.is_empty());
    assert!(series::Entity::find().all(&db).await?.is_empty());
    assert!(seasons::Entity::find().all(&db).await?.is_empty());
    assert!(episodes::Entity::find().all(&db).await?.is_empty());
    assert!(notifications::Entity::find().all(&db).await?.is_empty());

    Ok(())
}

#[tokio::test]
async fn test_catalog_title_and_slug_are_unique() -> Result<()> {
    let (db, _temp_file) = setup_test_db().await?;

    movie_row("Echo", "echo").insert(&db).await?;

    let same_slug = movie_row("Echo Returns", "echo").insert(&db).await;
    assert!(same_slug.is_err());

    let same_title = movie_row("Echo", "echo-returns").insert(&db).await;
    assert!(same_title.is_err());

    movie_row("Echo (1)", "echo-1").insert(&db).await?;
    assert_eq!(movies::Entity::find().all(&db).await?.len(), 2);

    Ok(())
}

#[tokio::test]
async fn test_one_profile_per_user() -> Result<()> {
    let (db, _temp_file) = setup_test_db().await?;

    let user = users::ActiveModel {
        username: Set("solo".to_string()),
        created_at: Set(Utc::now()),
        ..Default::default()
    }
    .insert(&db)
    .await?;

    creator_profiles::ActiveModel::new(user.id, 5, 10.0, false)
        .insert(&db)
        .await?;
    let duplicate = creator_profiles::ActiveModel::new(user.id, 5, 10.0, false)
        .insert(&db)
        .await;
    assert!(duplicate.is_err());

    Ok(())
}

#[tokio::test]
async fn test_migrate_down_and_fresh() -> Result<()> {
    let (db, _temp_file) = setup_test_db().await?;

    Migrator::down(&db, None).await?;
    assert!(movies::Entity::find().all(&db).await.is_err());

    Migrator::up(&db, None).await?;
    assert!(movies::Entity::find().all(&db).await?.is_empty());

    Ok(())
}
