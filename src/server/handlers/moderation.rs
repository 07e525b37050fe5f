use axum::{
    extract::{rejection::JsonRejection, Path, State},
    response::{IntoResponse, Json, Response},
};

use super::{json_body, Caller, ReasonRequest};
use crate::server::app::AppState;

pub async fn list_pending(State(state): State<AppState>, _caller: Caller) -> Response {
    state.studio.list_pending_submissions().await.into_response()
}

pub async fn get_submission(
    State(state): State<AppState>,
    _caller: Caller,
    Path(submission_id): Path<i32>,
) -> Response {
    state.studio.get_submission(submission_id).await.into_response()
}

pub async fn approve(
    State(state): State<AppState>,
    Caller(admin_id): Caller,
    Path(submission_id): Path<i32>,
) -> Response {
    state
        .studio
        .approve_submission(submission_id, admin_id)
        .await
        .into_response()
}

pub async fn reject(
    State(state): State<AppState>,
    Caller(admin_id): Caller,
    Path(submission_id): Path<i32>,
    payload: Result<Json<ReasonRequest>, JsonRejection>,
) -> Response {
    let body = match json_body(payload) {
        Ok(body) => body,
        Err(response) => return response,
    };
    state
        .studio
        .reject_submission(submission_id, admin_id, &body.reason)
        .await
        .into_response()
}
