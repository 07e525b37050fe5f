use anyhow::{anyhow, Result};
use axum::{
    routing::{get, post},
    Router,
};
use sea_orm::DatabaseConnection;
use tower::ServiceBuilder;
use tower_http::cors::{Any, CorsLayer};

use super::handlers::{creators, health, moderation, notifications, settings, strikes, submissions};
use crate::app_context::CreatorStudio;

#[derive(Clone)]
pub struct AppState {
    pub studio: CreatorStudio,
}

pub async fn create_app(db: DatabaseConnection, cors_origin: Option<&str>) -> Result<Router> {
    create_app_with(CreatorStudio::new(db), cors_origin)
}

/// Build the router around an already wired pipeline.
pub fn create_app_with(studio: CreatorStudio, cors_origin: Option<&str>) -> Result<Router> {
    let state = AppState { studio };

    let cors = match cors_origin {
        Some(origin) => CorsLayer::new()
            .allow_origin(
                origin
                    .parse::<axum::http::HeaderValue>()
                    .map_err(|e| anyhow!("Invalid CORS origin '{}': {}", origin, e))?,
            )
            .allow_methods(Any)
            .allow_headers(Any),
        None => CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any),
    };

    let app = Router::new()
        .route("/health", get(health::health_check))
        .nest("/api/v1", api_v1_routes())
        .layer(ServiceBuilder::new().layer(cors))
        .with_state(state);

    Ok(app)
}

fn api_v1_routes() -> Router<AppState> {
    Router::new()
        // Eligibility
        .route(
            "/creator-requests",
            get(creators::list_pending_requests).post(creators::request_access),
        )
        .route("/creator-requests/:id/approve", post(creators::approve_request))
        .route("/creator-requests/:id/reject", post(creators::reject_request))
        .route("/creators/me", get(creators::my_profile))
        .route("/creators/me/quota", get(creators::my_quota))
        .route("/creators/:id/grant", post(creators::grant_access))
        // Submissions
        .route(
            "/submissions",
            get(submissions::list_my_submissions).post(submissions::submit_content),
        )
        .route("/submissions/:id", get(submissions::get_submission))
        .route("/submissions/:id/episodes", post(submissions::add_episodes))
        // Moderation
        .route("/moderation/submissions", get(moderation::list_pending))
        .route("/moderation/submissions/:id", get(moderation::get_submission))
        .route("/moderation/submissions/:id/approve", post(moderation::approve))
        .route("/moderation/submissions/:id/reject", post(moderation::reject))
        // Strikes and standing
        .route(
            "/creators/:id/strikes",
            get(strikes::list_strikes).post(strikes::add_strike),
        )
        .route("/creators/:id/suspend", post(strikes::suspend))
        .route("/creators/:id/unsuspend", post(strikes::unsuspend))
        .route("/creators/:id/ban", post(strikes::ban))
        // Notifications
        .route("/notifications", get(notifications::list_notifications))
        .route("/notifications/:id/read", post(notifications::mark_read))
        // Settings
        .route("/settings", get(settings::get_settings).put(settings::update_settings))
}
