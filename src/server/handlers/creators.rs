use axum::{
    extract::{rejection::JsonRejection, Path, State},
    response::{IntoResponse, Json, Response},
};

use super::{json_body, Caller, ReasonRequest};
use crate::server::app::AppState;

pub async fn request_access(State(state): State<AppState>, Caller(user_id): Caller) -> Response {
    state.studio.request_access(user_id).await.into_response()
}

pub async fn list_pending_requests(State(state): State<AppState>, _caller: Caller) -> Response {
    state.studio.list_pending_requests().await.into_response()
}

pub async fn approve_request(
    State(state): State<AppState>,
    Caller(admin_id): Caller,
    Path(request_id): Path<i32>,
) -> Response {
    state
        .studio
        .approve_request(request_id, admin_id)
        .await
        .into_response()
}

pub async fn reject_request(
    State(state): State<AppState>,
    Caller(admin_id): Caller,
    Path(request_id): Path<i32>,
    payload: Result<Json<ReasonRequest>, JsonRejection>,
) -> Response {
    let body = match json_body(payload) {
        Ok(body) => body,
        Err(response) => return response,
    };
    state
        .studio
        .reject_request(request_id, admin_id, &body.reason)
        .await
        .into_response()
}

pub async fn grant_access(
    State(state): State<AppState>,
    Caller(admin_id): Caller,
    Path(user_id): Path<i32>,
) -> Response {
    state
        .studio
        .grant_creator_access(user_id, admin_id)
        .await
        .into_response()
}

pub async fn my_profile(State(state): State<AppState>, Caller(user_id): Caller) -> Response {
    state.studio.creator_profile(user_id).await.into_response()
}

pub async fn my_quota(State(state): State<AppState>, Caller(user_id): Caller) -> Response {
    state.studio.quota_status(user_id).await.into_response()
}
