use std::collections::BTreeMap;

use chrono::Utc;
use once_cell::sync::Lazy;
use regex::Regex;
use sea_orm::{
    ActiveModelBehavior, ActiveModelTrait, ColumnTrait, ConnectionTrait, DbErr, EntityTrait,
    IntoActiveModel, PaginatorTrait, QueryFilter, QueryOrder, Set, SqlErr, TransactionTrait,
};
use serde::Serialize;
use tracing::{debug, info, warn};

use super::submission_types::SeriesData;
use crate::database::entities::{
    content_submissions, episodes, movies, seasons, series, submission_episodes, ContentType,
};
use crate::errors::{StudioError, StudioResult};

/// Suffixed candidates tried for a slug or a title, after the bare base, before giving up.
pub const MAX_NAME_ATTEMPTS: usize = 100;

static NON_ALNUM: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[^a-z0-9]+").expect("Invalid slug pattern"));

/// Lowercase, collapse every non-alphanumeric run to one hyphen, trim hyphens.
pub fn slugify(title: &str) -> String {
    let lowered = title.to_lowercase();
    let slug = NON_ALNUM.replace_all(&lowered, "-");
    let slug = slug.trim_matches('-');
    if slug.is_empty() {
        "untitled".to_string()
    } else {
        slug.to_string()
    }
}

/// `attempt` 0 is the base itself; later attempts append `-n`.
pub fn slug_candidate(base: &str, attempt: usize) -> String {
    if attempt == 0 {
        base.to_string()
    } else {
        format!("{}-{}", base, attempt)
    }
}

/// `attempt` 0 is the base itself; later attempts append ` (n)`.
pub fn title_candidate(base: &str, attempt: usize) -> String {
    if attempt == 0 {
        base.to_string()
    } else {
        format!("{} ({})", base, attempt)
    }
}

/// Catalog rows produced by one publish.
#[derive(Clone, Debug, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum CatalogEntry {
    Movie {
        movie: movies::Model,
    },
    Series {
        series: series::Model,
        seasons: Vec<seasons::Model>,
        episodes: Vec<episodes::Model>,
    },
}

impl CatalogEntry {
    pub fn title(&self) -> &str {
        match self {
            CatalogEntry::Movie { movie } => &movie.title,
            CatalogEntry::Series { series, .. } => &series.title,
        }
    }

    pub fn slug(&self) -> &str {
        match self {
            CatalogEntry::Movie { movie } => &movie.slug,
            CatalogEntry::Series { series, .. } => &series.slug,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
struct UniqueName {
    title: String,
    slug: String,
}

fn is_unique_violation(err: &DbErr) -> bool {
    matches!(err.sql_err(), Some(SqlErr::UniqueConstraintViolation(_)))
}

/// Turns an approved submission into canonical catalog entities.
///
/// Every method runs on the connection it is handed, which is expected to be
/// the caller's open transaction: either the whole catalog entry and the
/// submission back-link land, or none of it does.
pub struct Publisher;

impl Publisher {
    pub async fn publish<C>(
        conn: &C,
        submission: &content_submissions::Model,
    ) -> StudioResult<CatalogEntry>
    where
        C: ConnectionTrait + TransactionTrait,
    {
        if submission.is_published() {
            return Err(StudioError::publish(format!(
                "Submission {} has already been published",
                submission.id
            )));
        }

        let entry = match submission.content_type {
            ContentType::Movie => Self::publish_movie(conn, submission).await?,
            ContentType::Series => Self::publish_series(conn, submission).await?,
        };

        info!(
            "Published submission {} as {} '{}' ({})",
            submission.id,
            submission.content_type,
            entry.title(),
            entry.slug()
        );
        Ok(entry)
    }

    async fn slug_taken<C: ConnectionTrait>(
        conn: &C,
        content_type: ContentType,
        slug: &str,
    ) -> Result<bool, DbErr> {
        let count = match content_type {
            ContentType::Movie => {
                movies::Entity::find()
                    .filter(movies::Column::Slug.eq(slug))
                    .count(conn)
                    .await?
            }
            ContentType::Series => {
                series::Entity::find()
                    .filter(series::Column::Slug.eq(slug))
                    .count(conn)
                    .await?
            }
        };
        Ok(count > 0)
    }

    async fn title_taken<C: ConnectionTrait>(
        conn: &C,
        content_type: ContentType,
        title: &str,
    ) -> Result<bool, DbErr> {
        let count = match content_type {
            ContentType::Movie => {
                movies::Entity::find()
                    .filter(movies::Column::Title.eq(title))
                    .count(conn)
                    .await?
            }
            ContentType::Series => {
                series::Entity::find()
                    .filter(series::Column::Title.eq(title))
                    .count(conn)
                    .await?
            }
        };
        Ok(count > 0)
    }

    /// Probe for the first free slug and the first free title.
    async fn unique_name<C: ConnectionTrait>(
        conn: &C,
        content_type: ContentType,
        title: &str,
    ) -> StudioResult<UniqueName> {
        let title = title.trim();
        let base_slug = slugify(title);

        let mut slug = None;
        for attempt in 0..=MAX_NAME_ATTEMPTS {
            let candidate = slug_candidate(&base_slug, attempt);
            if !Self::slug_taken(conn, content_type, &candidate).await? {
                slug = Some(candidate);
                break;
            }
        }
        let slug = slug.ok_or_else(|| {
            StudioError::publish(format!(
                "Could not find a free slug for '{}' after {} suffixed attempts",
                base_slug, MAX_NAME_ATTEMPTS
            ))
        })?;

        let mut unique_title = None;
        for attempt in 0..=MAX_NAME_ATTEMPTS {
            let candidate = title_candidate(title, attempt);
            if !Self::title_taken(conn, content_type, &candidate).await? {
                unique_title = Some(candidate);
                break;
            }
        }
        let title = unique_title.ok_or_else(|| {
            StudioError::publish(format!(
                "Could not find a free title for '{}' after {} suffixed attempts",
                title, MAX_NAME_ATTEMPTS
            ))
        })?;

        Ok(UniqueName { title, slug })
    }

    /// Insert one catalog row under a savepoint. A unique-index violation
    /// (a concurrent publish took the name) is retried once with fresh names.
    async fn insert_named<C, A, F>(
        conn: &C,
        content_type: ContentType,
        title: &str,
        build: F,
    ) -> StudioResult<<A::Entity as EntityTrait>::Model>
    where
        C: ConnectionTrait + TransactionTrait,
        A: ActiveModelTrait + ActiveModelBehavior + Send,
        <A::Entity as EntityTrait>::Model: IntoActiveModel<A>,
        F: Fn(UniqueName) -> A,
    {
        let mut retried = false;
        loop {
            let name = Self::unique_name(conn, content_type, title).await?;
            let savepoint = conn.begin().await?;
            match build(name.clone()).insert(&savepoint).await {
                Ok(model) => {
                    savepoint.commit().await?;
                    return Ok(model);
                }
                Err(e) => {
                    savepoint.rollback().await?;
                    if is_unique_violation(&e) && !retried {
                        warn!(
                            "Name '{}' / '{}' was taken concurrently, probing again",
                            name.title, name.slug
                        );
                        retried = true;
                        continue;
                    }
                    return Err(StudioError::publish(format!(
                        "Failed to insert catalog entry for '{}': {}",
                        title, e
                    )));
                }
            }
        }
    }

    async fn publish_movie<C>(
        conn: &C,
        submission: &content_submissions::Model,
    ) -> StudioResult<CatalogEntry>
    where
        C: ConnectionTrait + TransactionTrait,
    {
        let video_url = submission.video_url.clone().ok_or_else(|| {
            StudioError::publish(format!("Movie submission {} has no video URL", submission.id))
        })?;

        let movie = Self::insert_named(conn, ContentType::Movie, &submission.title, |name| {
            movies::ActiveModel {
                title: Set(name.title),
                slug: Set(name.slug),
                description: Set(submission.description.clone()),
                genre: Set(submission.genre.clone()),
                year: Set(submission.year),
                thumbnail_url: Set(submission.thumbnail_url.clone()),
                banner_url: Set(submission.banner_url.clone()),
                video_url: Set(video_url.clone()),
                duration_minutes: Set(submission.duration_minutes),
                creator_id: Set(submission.creator_id),
                created_at: Set(Utc::now()),
                ..Default::default()
            }
        })
        .await?;

        Self::link(conn, submission.id, Some(movie.id), None).await?;
        Ok(CatalogEntry::Movie { movie })
    }

    async fn publish_series<C>(
        conn: &C,
        submission: &content_submissions::Model,
    ) -> StudioResult<CatalogEntry>
    where
        C: ConnectionTrait + TransactionTrait,
    {
        let series_data = SeriesData::parse_or_default(submission.series_data.as_deref());

        let source_episodes = submission_episodes::Entity::find()
            .filter(submission_episodes::Column::SubmissionId.eq(submission.id))
            .order_by_asc(submission_episodes::Column::SeasonNumber)
            .order_by_asc(submission_episodes::Column::EpisodeNumber)
            .all(conn)
            .await?;

        let mut by_season: BTreeMap<i32, Vec<submission_episodes::Model>> = BTreeMap::new();
        for episode in source_episodes {
            by_season.entry(episode.season_number).or_default().push(episode);
        }

        let total_seasons = series_data.total_seasons.max(by_season.len() as i32);
        let series_row =
            Self::insert_named(conn, ContentType::Series, &submission.title, |name| {
                series::ActiveModel {
                    title: Set(name.title),
                    slug: Set(name.slug),
                    description: Set(submission.description.clone()),
                    genre: Set(submission.genre.clone()),
                    year: Set(submission.year),
                    thumbnail_url: Set(submission.thumbnail_url.clone()),
                    banner_url: Set(submission.banner_url.clone()),
                    status: Set(series_data.status.clone()),
                    total_seasons: Set(total_seasons),
                    total_episodes: Set(0),
                    creator_id: Set(submission.creator_id),
                    created_at: Set(Utc::now()),
                    ..Default::default()
                }
            })
            .await?;

        let mut created_seasons = Vec::with_capacity(by_season.len());
        let mut created_episodes = Vec::new();
        for (season_number, mut group) in by_season {
            group.sort_by_key(|e| e.episode_number);

            let season = seasons::ActiveModel {
                series_id: Set(series_row.id),
                season_number: Set(season_number),
                title: Set(format!("Season {}", season_number)),
                total_episodes: Set(group.len() as i32),
                created_at: Set(Utc::now()),
                ..Default::default()
            }
            .insert(conn)
            .await?;

            for source in group {
                let title = source
                    .title
                    .filter(|t| !t.trim().is_empty())
                    .unwrap_or_else(|| format!("Episode {}", source.episode_number));
                let episode = episodes::ActiveModel {
                    season_id: Set(season.id),
                    series_id: Set(series_row.id),
                    episode_number: Set(source.episode_number),
                    title: Set(title),
                    description: Set(source.description),
                    video_url: Set(source.video_url),
                    thumbnail_url: Set(source.thumbnail_url),
                    duration_minutes: Set(source.duration_minutes),
                    created_at: Set(Utc::now()),
                    ..Default::default()
                }
                .insert(conn)
                .await?;
                created_episodes.push(episode);
            }

            debug!(
                "Series {}: created season {} with {} episodes",
                series_row.id, season_number, season.total_episodes
            );
            created_seasons.push(season);
        }

        let mut active: series::ActiveModel = series_row.into();
        active.total_episodes = Set(created_episodes.len() as i32);
        let series_row = active.update(conn).await?;

        Self::link(conn, submission.id, None, Some(series_row.id)).await?;
        Ok(CatalogEntry::Series {
            series: series_row,
            seasons: created_seasons,
            episodes: created_episodes,
        })
    }

    /// Write the back-link exactly once; a submission already linked is refused.
    async fn link<C: ConnectionTrait>(
        conn: &C,
        submission_id: i32,
        movie_id: Option<i32>,
        series_id: Option<i32>,
    ) -> StudioResult<()> {
        let mut update = content_submissions::ActiveModel {
            updated_at: Set(Utc::now()),
            ..Default::default()
        };
        if movie_id.is_some() {
            update.published_movie_id = Set(movie_id);
        }
        if series_id.is_some() {
            update.published_series_id = Set(series_id);
        }

        let result = content_submissions::Entity::update_many()
            .set(update)
            .filter(content_submissions::Column::Id.eq(submission_id))
            .filter(content_submissions::Column::PublishedMovieId.is_null())
            .filter(content_submissions::Column::PublishedSeriesId.is_null())
            .exec(conn)
            .await?;

        if result.rows_affected == 0 {
            return Err(StudioError::publish(format!(
                "Submission {} has already been published",
                submission_id
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::{establish_connection, setup_database};
    use sea_orm::DatabaseConnection;
    use std::sync::atomic::{AtomicUsize, Ordering};

    async fn catalog_db() -> DatabaseConnection {
        let db = establish_connection("sqlite::memory:").await.unwrap();
        setup_database(&db).await.unwrap();
        db
    }

    fn movie_row(title: &str, slug: &str) -> movies::ActiveModel {
        movies::ActiveModel {
            title: Set(title.to_string()),
            slug: Set(slug.to_string()),
            description: Set("Catalog fixture".to_string()),
            genre: Set("drama".to_string()),
            year: Set(None),
            thumbnail_url: Set(String::new()),
            banner_url: Set(None),
            video_url: Set("https://cdn.example/movie.mp4".to_string()),
            duration_minutes: Set(None),
            creator_id: Set(1),
            created_at: Set(Utc::now()),
            ..Default::default()
        }
    }

    #[test]
    fn test_slugify_collapses_runs() {
        assert_eq!(slugify("Echo"), "echo");
        assert_eq!(slugify("  Galaxy   Quest: Part II! "), "galaxy-quest-part-ii");
        assert_eq!(slugify("--Hello__World--"), "hello-world");
    }

    #[test]
    fn test_slugify_empty_falls_back() {
        assert_eq!(slugify("!!!"), "untitled");
        assert_eq!(slugify(""), "untitled");
    }

    #[test]
    fn test_slugify_drops_non_ascii_letters() {
        assert_eq!(slugify("Café Noir"), "caf-noir");
    }

    #[test]
    fn test_candidates() {
        assert_eq!(slug_candidate("echo", 0), "echo");
        assert_eq!(slug_candidate("echo", 1), "echo-1");
        assert_eq!(title_candidate("Echo", 0), "Echo");
        assert_eq!(title_candidate("Echo", 2), "Echo (2)");
    }

    #[tokio::test]
    async fn test_name_search_tries_one_hundred_suffixes() {
        let db = catalog_db().await;
        for attempt in 0..MAX_NAME_ATTEMPTS {
            movie_row(
                &format!("Fixture {}", attempt),
                &slug_candidate("echo", attempt),
            )
            .insert(&db)
            .await
            .unwrap();
        }

        let name = Publisher::unique_name(&db, ContentType::Movie, "Echo")
            .await
            .unwrap();
        assert_eq!(name.slug, "echo-100");
        assert_eq!(name.title, "Echo");

        movie_row("Fixture last", "echo-100").insert(&db).await.unwrap();
        let err = Publisher::unique_name(&db, ContentType::Movie, "Echo")
            .await
            .unwrap_err();
        assert!(err.is_publish_error());
    }

    #[tokio::test]
    async fn test_insert_retries_once_after_unique_violation() {
        let db = catalog_db().await;
        movie_row("Taken", "taken").insert(&db).await.unwrap();

        let builds = AtomicUsize::new(0);
        let movie = Publisher::insert_named(&db, ContentType::Movie, "Echo", |name| {
            // First build collides as if another publish had just won the name
            if builds.fetch_add(1, Ordering::SeqCst) == 0 {
                movie_row(&name.title, "taken")
            } else {
                movie_row(&name.title, &name.slug)
            }
        })
        .await
        .unwrap();

        assert_eq!(builds.load(Ordering::SeqCst), 2);
        assert_eq!(movie.slug, "echo");
        assert_eq!(movie.title, "Echo");
        assert_eq!(movies::Entity::find().count(&db).await.unwrap(), 2);
    }

    #[tokio::test]
    async fn test_insert_gives_up_after_second_violation() {
        let db = catalog_db().await;
        movie_row("Taken", "taken").insert(&db).await.unwrap();

        let builds = AtomicUsize::new(0);
        let err = Publisher::insert_named(&db, ContentType::Movie, "Echo", |name| {
            builds.fetch_add(1, Ordering::SeqCst);
            movie_row(&name.title, "taken")
        })
        .await
        .unwrap_err();

        assert!(err.is_publish_error());
        assert_eq!(builds.load(Ordering::SeqCst), 2);
        assert_eq!(movies::Entity::find().count(&db).await.unwrap(), 1);
    }
}
