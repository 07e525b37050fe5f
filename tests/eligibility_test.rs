mod common;

use common::{create_user, setup_studio, ADMIN_ID};
use creator_studio::database::entities::{creator_requests, CreatorStatus, RequestStatus};
use creator_studio::services::SettingsUpdate;
use sea_orm::EntityTrait;

#[tokio::test]
async fn test_request_inside_window_is_pending() {
    let (db, studio) = setup_studio().await;
    let user = create_user(&db, "newcomer", 3).await;

    let result = studio.request_access(user.id).await;
    assert!(result.success);
    let request = result.into_data().unwrap();
    assert_eq!(request.status, RequestStatus::Pending);
    assert_eq!(request.account_age_days, 3);

    let second = studio.request_access(user.id).await;
    assert!(!second.success);
    assert_eq!(second.error_code(), Some("STATE_CONFLICT"));
}

#[tokio::test]
async fn test_request_after_window_reports_bound_and_age() {
    let (db, studio) = setup_studio().await;
    let user = create_user(&db, "veteran", 31).await;

    let result = studio.request_access(user.id).await;
    assert_eq!(result.error_code(), Some("VALIDATION_ERROR"));
    let message = result.error.unwrap().message;
    assert!(message.contains("within 30 days"));
    assert!(message.contains("current age: 31 days"));
}

#[tokio::test]
async fn test_request_below_minimum_age() {
    let (db, studio) = setup_studio().await;
    studio
        .update_settings(SettingsUpdate {
            min_account_age_days: Some(7),
            ..Default::default()
        })
        .await
        .into_data()
        .unwrap();
    let user = create_user(&db, "too-fresh", 2).await;

    let result = studio.request_access(user.id).await;
    assert_eq!(result.error_code(), Some("VALIDATION_ERROR"));
    assert!(result.error.unwrap().message.contains("at least 7 days"));
}

#[tokio::test]
async fn test_unknown_user_is_not_found() {
    let (_db, studio) = setup_studio().await;
    let result = studio.request_access(4242).await;
    assert_eq!(result.error_code(), Some("NOT_FOUND"));
    assert_eq!(result.status_code(), 404);
}

#[tokio::test]
async fn test_disabled_program_refuses_requests() {
    let (db, studio) = setup_studio().await;
    studio
        .update_settings(SettingsUpdate {
            is_creator_system_enabled: Some(false),
            ..Default::default()
        })
        .await;
    let user = create_user(&db, "hopeful", 1).await;

    let result = studio.request_access(user.id).await;
    assert_eq!(result.error_code(), Some("STATE_CONFLICT"));
}

#[tokio::test]
async fn test_approve_creates_profile_from_settings() {
    let (db, studio) = setup_studio().await;
    let user = create_user(&db, "maker", 4).await;
    let request = studio.request_access(user.id).await.into_data().unwrap();

    let profile = studio
        .approve_request(request.id, ADMIN_ID)
        .await
        .into_data()
        .unwrap();
    assert_eq!(profile.user_id, user.id);
    assert_eq!(profile.status, CreatorStatus::Active);
    assert_eq!(profile.daily_upload_limit, 5);
    assert_eq!(profile.daily_storage_limit_gb, 10.0);
    assert!(!profile.is_auto_approve_enabled);

    let stored = creator_requests::Entity::find_by_id(request.id)
        .one(&db)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(stored.status, RequestStatus::Approved);
    assert_eq!(stored.reviewed_by, Some(ADMIN_ID));

    let notifications = studio.notifications(user.id).await.into_data().unwrap();
    assert_eq!(notifications.len(), 1);
    assert_eq!(notifications[0].notification_type, "creator_request_approved");

    // Terminal after review
    let again = studio.approve_request(request.id, ADMIN_ID).await;
    assert_eq!(again.error_code(), Some("STATE_CONFLICT"));

    // One profile per user
    let more = studio.request_access(user.id).await;
    assert_eq!(more.error_code(), Some("STATE_CONFLICT"));
    assert!(more.error.unwrap().message.contains("already a creator"));
}

#[tokio::test]
async fn test_auto_approve_setting_seeds_new_profiles() {
    let (db, studio) = setup_studio().await;
    studio
        .update_settings(SettingsUpdate {
            auto_approve_new_creators: Some(true),
            default_daily_upload_limit: Some(8),
            ..Default::default()
        })
        .await
        .into_data()
        .unwrap();
    let user = create_user(&db, "trusted", 1).await;
    let request = studio.request_access(user.id).await.into_data().unwrap();

    let profile = studio
        .approve_request(request.id, ADMIN_ID)
        .await
        .into_data()
        .unwrap();
    assert!(profile.is_auto_approve_enabled);
    assert_eq!(profile.daily_upload_limit, 8);
}

#[tokio::test]
async fn test_reject_requires_reason_and_allows_new_request() {
    let (db, studio) = setup_studio().await;
    let user = create_user(&db, "rejected", 2).await;
    let request = studio.request_access(user.id).await.into_data().unwrap();

    let blank = studio.reject_request(request.id, ADMIN_ID, "   ").await;
    assert_eq!(blank.error_code(), Some("VALIDATION_ERROR"));

    let rejected = studio
        .reject_request(request.id, ADMIN_ID, "Portfolio missing")
        .await
        .into_data()
        .unwrap();
    assert_eq!(rejected.status, RequestStatus::Rejected);
    assert_eq!(rejected.rejection_reason.as_deref(), Some("Portfolio missing"));

    let approve_after = studio.approve_request(request.id, ADMIN_ID).await;
    assert_eq!(approve_after.error_code(), Some("STATE_CONFLICT"));

    assert!(studio.request_access(user.id).await.success);
}

#[tokio::test]
async fn test_grant_ignores_age_and_closes_pending_request() {
    let (db, studio) = setup_studio().await;

    let old = create_user(&db, "old-timer", 400).await;
    let profile = studio
        .grant_creator_access(old.id, ADMIN_ID)
        .await
        .into_data()
        .unwrap();
    assert_eq!(profile.user_id, old.id);

    let twice = studio.grant_creator_access(old.id, ADMIN_ID).await;
    assert_eq!(twice.error_code(), Some("STATE_CONFLICT"));

    let young = create_user(&db, "queued", 3).await;
    let request = studio.request_access(young.id).await.into_data().unwrap();
    studio
        .grant_creator_access(young.id, ADMIN_ID)
        .await
        .into_data()
        .unwrap();

    let stored = creator_requests::Entity::find_by_id(request.id)
        .one(&db)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(stored.status, RequestStatus::Approved);
    assert!(studio.list_pending_requests().await.into_data().unwrap().is_empty());
}
