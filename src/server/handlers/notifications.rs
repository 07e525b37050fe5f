use axum::{
    extract::{Path, State},
    response::{IntoResponse, Response},
};

use super::Caller;
use crate::server::app::AppState;

pub async fn list_notifications(State(state): State<AppState>, Caller(user_id): Caller) -> Response {
    state.studio.notifications(user_id).await.into_response()
}

pub async fn mark_read(
    State(state): State<AppState>,
    Caller(user_id): Caller,
    Path(notification_id): Path<i32>,
) -> Response {
    state
        .studio
        .mark_notification_read(user_id, notification_id)
        .await
        .into_response()
}
