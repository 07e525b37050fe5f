mod common;

use common::{create_creator, movie, reload_profile, setup_studio, ADMIN_ID};
use creator_studio::database::entities::CreatorStatus;
use creator_studio::services::SettingsUpdate;

#[tokio::test]
async fn test_third_strike_suspends_and_blocks_submissions() {
    let (db, studio) = setup_studio().await;
    let (user, profile) = create_creator(&db, &studio, "offender").await;

    for n in 1..=2 {
        let outcome = studio
            .add_strike(profile.id, "Misleading thumbnail", ADMIN_ID)
            .await
            .into_data()
            .unwrap();
        assert_eq!(outcome.total_strikes, n);
        assert!(!outcome.suspended);
    }
    assert_eq!(reload_profile(&db, profile.id).await.status, CreatorStatus::Active);

    let third = studio
        .add_strike(profile.id, "Copyright violation", ADMIN_ID)
        .await
        .into_data()
        .unwrap();
    assert_eq!(third.total_strikes, 3);
    assert!(third.suspended);

    let suspended = reload_profile(&db, profile.id).await;
    assert_eq!(suspended.status, CreatorStatus::Suspended);
    assert_eq!(
        suspended.suspension_reason.as_deref(),
        Some("Automatically suspended after 3 strikes")
    );

    let blocked = studio.submit_content(user.id, movie("Comeback", 1.0)).await;
    assert_eq!(blocked.error_code(), Some("SUSPENSION_ERROR"));
    assert!(blocked.error.unwrap().message.contains("3 strikes"));

    let notifications = studio.notifications(user.id).await.into_data().unwrap();
    let kinds: Vec<&str> = notifications
        .iter()
        .map(|n| n.notification_type.as_str())
        .collect();
    assert_eq!(kinds.iter().filter(|k| **k == "strike_issued").count(), 3);
    assert!(kinds.contains(&"account_suspended"));
}

#[tokio::test]
async fn test_strike_notification_carries_running_total() {
    let (db, studio) = setup_studio().await;
    let (user, profile) = create_creator(&db, &studio, "counted").await;

    studio.add_strike(profile.id, "Spam", ADMIN_ID).await;
    studio.add_strike(profile.id, "Spam again", ADMIN_ID).await;

    let notifications = studio.notifications(user.id).await.into_data().unwrap();
    assert_eq!(notifications[0].notification_type, "strike_issued");
    assert!(notifications[0].message.contains("2 of 3"));
}

#[tokio::test]
async fn test_strikes_past_threshold_do_not_resuspend_suspended_creator() {
    let (db, studio) = setup_studio().await;
    let (_, profile) = create_creator(&db, &studio, "repeat").await;

    for _ in 0..3 {
        studio.add_strike(profile.id, "Violation", ADMIN_ID).await;
    }
    let fourth = studio
        .add_strike(profile.id, "Violation", ADMIN_ID)
        .await
        .into_data()
        .unwrap();
    assert_eq!(fourth.total_strikes, 4);
    assert!(!fourth.suspended);
    assert_eq!(studio.list_strikes(profile.id).await.into_data().unwrap().len(), 4);
}

#[tokio::test]
async fn test_threshold_comes_from_settings() {
    let (db, studio) = setup_studio().await;
    studio
        .update_settings(SettingsUpdate {
            max_strikes_before_suspension: Some(1),
            ..Default::default()
        })
        .await
        .into_data()
        .unwrap();
    let (_, profile) = create_creator(&db, &studio, "strict").await;

    let first = studio
        .add_strike(profile.id, "Hate speech", ADMIN_ID)
        .await
        .into_data()
        .unwrap();
    assert!(first.suspended);
    assert_eq!(
        reload_profile(&db, profile.id).await.suspension_reason.as_deref(),
        Some("Automatically suspended after 1 strikes")
    );
}

#[tokio::test]
async fn test_unsuspend_keeps_strikes_and_next_strike_suspends_again() {
    let (db, studio) = setup_studio().await;
    let (user, profile) = create_creator(&db, &studio, "reformed").await;
    for _ in 0..3 {
        studio.add_strike(profile.id, "Violation", ADMIN_ID).await;
    }

    let reinstated = studio
        .unsuspend_creator(profile.id, ADMIN_ID)
        .await
        .into_data()
        .unwrap();
    assert_eq!(reinstated.status, CreatorStatus::Active);
    assert_eq!(reinstated.suspension_reason, None);
    assert!(studio.submit_content(user.id, movie("Second Chance", 1.0)).await.success);

    let fourth = studio
        .add_strike(profile.id, "Relapse", ADMIN_ID)
        .await
        .into_data()
        .unwrap();
    assert!(fourth.suspended);
    assert_eq!(
        reload_profile(&db, profile.id).await.suspension_reason.as_deref(),
        Some("Automatically suspended after 4 strikes")
    );
}

#[tokio::test]
async fn test_manual_standing_transitions() {
    let (db, studio) = setup_studio().await;
    let (user, profile) = create_creator(&db, &studio, "managed").await;

    let not_suspended = studio.unsuspend_creator(profile.id, ADMIN_ID).await;
    assert_eq!(not_suspended.error_code(), Some("STATE_CONFLICT"));

    let blank = studio.suspend_creator(profile.id, ADMIN_ID, " ").await;
    assert_eq!(blank.error_code(), Some("VALIDATION_ERROR"));

    let suspended = studio
        .suspend_creator(profile.id, ADMIN_ID, "Under investigation")
        .await
        .into_data()
        .unwrap();
    assert_eq!(suspended.status, CreatorStatus::Suspended);

    let twice = studio
        .suspend_creator(profile.id, ADMIN_ID, "Still investigating")
        .await;
    assert_eq!(twice.error_code(), Some("STATE_CONFLICT"));

    let banned = studio
        .ban_creator(profile.id, ADMIN_ID, "Repeated fraud")
        .await
        .into_data()
        .unwrap();
    assert_eq!(banned.status, CreatorStatus::Banned);

    let lift = studio.unsuspend_creator(profile.id, ADMIN_ID).await;
    assert_eq!(lift.error_code(), Some("STATE_CONFLICT"));
    let ban_again = studio.ban_creator(profile.id, ADMIN_ID, "Again").await;
    assert_eq!(ban_again.error_code(), Some("STATE_CONFLICT"));

    let blocked = studio.submit_content(user.id, movie("From Exile", 1.0)).await;
    assert_eq!(blocked.error_code(), Some("SUSPENSION_ERROR"));
}

#[tokio::test]
async fn test_strike_input_errors() {
    let (db, studio) = setup_studio().await;
    let (_, profile) = create_creator(&db, &studio, "target").await;

    let unknown = studio.add_strike(9999, "Spam", ADMIN_ID).await;
    assert_eq!(unknown.error_code(), Some("NOT_FOUND"));

    let blank = studio.add_strike(profile.id, "", ADMIN_ID).await;
    assert_eq!(blank.error_code(), Some("VALIDATION_ERROR"));
    assert!(studio.list_strikes(profile.id).await.into_data().unwrap().is_empty());

    let missing = studio.list_strikes(9999).await;
    assert_eq!(missing.error_code(), Some("NOT_FOUND"));
}
