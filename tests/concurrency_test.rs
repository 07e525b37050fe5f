//! Concurrent writers against a file-backed database with a real pool

mod common;

use std::collections::HashSet;

use common::{
    create_creator, create_user, movie, reload_profile, set_limits, setup_file_studio, ADMIN_ID,
};
use creator_studio::database::entities::{
    content_submissions, creator_strikes, movies, CreatorStatus,
};
use sea_orm::{EntityTrait, PaginatorTrait};
use tokio::task::JoinSet;

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_submissions_respect_upload_limit() {
    let (_file, db, studio) = setup_file_studio().await;
    let (user, profile) = create_creator(&db, &studio, "racer").await;
    set_limits(&db, profile.id, 3, 100.0, false).await;

    let mut tasks = JoinSet::new();
    for n in 0..12 {
        let studio = studio.clone();
        let user_id = user.id;
        tasks.spawn(async move {
            studio
                .submit_content(user_id, movie(&format!("Race Entry {}", n), 0.5))
                .await
        });
    }

    let mut accepted = 0;
    while let Some(joined) = tasks.join_next().await {
        let result = joined.unwrap();
        if result.success {
            accepted += 1;
        } else {
            assert_eq!(result.error_code(), Some("QUOTA_EXCEEDED"));
        }
    }
    assert_eq!(accepted, 3);

    let quota = studio.quota_status(user.id).await.into_data().unwrap();
    assert_eq!(quota.uploads_today, 3);
    assert_eq!(content_submissions::Entity::find().count(&db).await.unwrap(), 3);
    assert_eq!(reload_profile(&db, profile.id).await.total_uploads, 3);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_approvals_of_one_title_get_distinct_names() {
    let (_file, db, studio) = setup_file_studio().await;
    let (user, profile) = create_creator(&db, &studio, "echoes").await;
    set_limits(&db, profile.id, 20, 100.0, false).await;

    let mut ids = Vec::new();
    for _ in 0..8 {
        let outcome = studio
            .submit_content(user.id, movie("Echo", 0.5))
            .await
            .into_data()
            .unwrap();
        ids.push(outcome.submission.id);
    }

    let mut tasks = JoinSet::new();
    for id in ids {
        let studio = studio.clone();
        tasks.spawn(async move { studio.approve_submission(id, ADMIN_ID).await });
    }

    let mut slugs = HashSet::new();
    let mut titles = HashSet::new();
    while let Some(joined) = tasks.join_next().await {
        let outcome = joined.unwrap().into_data().expect("every approval publishes");
        assert!(outcome.submission.is_published());
        slugs.insert(outcome.catalog.slug().to_string());
        titles.insert(outcome.catalog.title().to_string());
    }

    let expected_slugs: HashSet<String> = std::iter::once("echo".to_string())
        .chain((1..8).map(|n| format!("echo-{}", n)))
        .collect();
    let expected_titles: HashSet<String> = std::iter::once("Echo".to_string())
        .chain((1..8).map(|n| format!("Echo ({})", n)))
        .collect();
    assert_eq!(slugs, expected_slugs);
    assert_eq!(titles, expected_titles);
    assert_eq!(movies::Entity::find().count(&db).await.unwrap(), 8);

    let pending = studio.list_pending_submissions().await.into_data().unwrap();
    assert!(pending.is_empty());
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_strikes_on_different_creators() {
    let (_file, db, studio) = setup_file_studio().await;

    let mut creator_ids = Vec::new();
    for n in 0..8 {
        let (_, profile) = create_creator(&db, &studio, &format!("striker{}", n)).await;
        creator_ids.push(profile.id);
    }

    let mut tasks = JoinSet::new();
    for creator_id in creator_ids {
        let studio = studio.clone();
        tasks.spawn(async move {
            studio
                .add_strike(creator_id, "Reused footage", ADMIN_ID)
                .await
        });
    }

    while let Some(joined) = tasks.join_next().await {
        let outcome = joined.unwrap().into_data().expect("every strike is recorded");
        assert_eq!(outcome.total_strikes, 1);
        assert!(!outcome.suspended);
    }
    assert_eq!(creator_strikes::Entity::find().count(&db).await.unwrap(), 8);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_strikes_suspend_exactly_once() {
    let (_file, db, studio) = setup_file_studio().await;
    let (_, profile) = create_creator(&db, &studio, "repeat").await;
    let threshold = studio
        .settings()
        .await
        .into_data()
        .unwrap()
        .max_strikes_before_suspension as u64;

    let mut tasks = JoinSet::new();
    for n in 0..threshold {
        let studio = studio.clone();
        let creator_id = profile.id;
        tasks.spawn(async move {
            studio
                .add_strike(creator_id, &format!("Violation {}", n), ADMIN_ID)
                .await
        });
    }

    let mut counts = Vec::new();
    let mut suspensions = 0;
    while let Some(joined) = tasks.join_next().await {
        let outcome = joined.unwrap().into_data().unwrap();
        counts.push(outcome.total_strikes);
        if outcome.suspended {
            suspensions += 1;
        }
    }
    counts.sort_unstable();
    assert_eq!(counts, (1..=threshold).collect::<Vec<_>>());
    assert_eq!(suspensions, 1);
    assert_eq!(
        reload_profile(&db, profile.id).await.status,
        CreatorStatus::Suspended
    );
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_access_requests_file_one() {
    let (_file, db, studio) = setup_file_studio().await;
    let user = create_user(&db, "eager", 3).await;

    let mut tasks = JoinSet::new();
    for _ in 0..6 {
        let studio = studio.clone();
        let user_id = user.id;
        tasks.spawn(async move { studio.request_access(user_id).await });
    }

    let mut filed = 0;
    while let Some(joined) = tasks.join_next().await {
        let result = joined.unwrap();
        if result.success {
            filed += 1;
        } else {
            assert_eq!(result.error_code(), Some("STATE_CONFLICT"));
        }
    }
    assert_eq!(filed, 1);

    let pending = studio.list_pending_requests().await.into_data().unwrap();
    assert_eq!(pending.len(), 1);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_request_reviews_have_one_winner() {
    let (_file, db, studio) = setup_file_studio().await;
    let user = create_user(&db, "contested", 3).await;
    let request = studio.request_access(user.id).await.into_data().unwrap();

    let mut tasks = JoinSet::new();
    for admin in 0..4 {
        let studio = studio.clone();
        let request_id = request.id;
        tasks.spawn(async move { studio.approve_request(request_id, ADMIN_ID + admin).await });
    }

    let mut approved = 0;
    while let Some(joined) = tasks.join_next().await {
        let result = joined.unwrap();
        if result.success {
            approved += 1;
        } else {
            assert_eq!(result.error_code(), Some("STATE_CONFLICT"));
        }
    }
    assert_eq!(approved, 1);
    assert!(studio.creator_profile(user.id).await.success);
}
