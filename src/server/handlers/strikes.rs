use axum::{
    extract::{rejection::JsonRejection, Path, State},
    response::{IntoResponse, Json, Response},
};

use super::{json_body, Caller, ReasonRequest};
use crate::server::app::AppState;

pub async fn add_strike(
    State(state): State<AppState>,
    Caller(admin_id): Caller,
    Path(creator_id): Path<i32>,
    payload: Result<Json<ReasonRequest>, JsonRejection>,
) -> Response {
    let body = match json_body(payload) {
        Ok(body) => body,
        Err(response) => return response,
    };
    state
        .studio
        .add_strike(creator_id, &body.reason, admin_id)
        .await
        .into_response()
}

pub async fn list_strikes(
    State(state): State<AppState>,
    _caller: Caller,
    Path(creator_id): Path<i32>,
) -> Response {
    state.studio.list_strikes(creator_id).await.into_response()
}

pub async fn suspend(
    State(state): State<AppState>,
    Caller(admin_id): Caller,
    Path(creator_id): Path<i32>,
    payload: Result<Json<ReasonRequest>, JsonRejection>,
) -> Response {
    let body = match json_body(payload) {
        Ok(body) => body,
        Err(response) => return response,
    };
    state
        .studio
        .suspend_creator(creator_id, admin_id, &body.reason)
        .await
        .into_response()
}

pub async fn unsuspend(
    State(state): State<AppState>,
    Caller(admin_id): Caller,
    Path(creator_id): Path<i32>,
) -> Response {
    state
        .studio
        .unsuspend_creator(creator_id, admin_id)
        .await
        .into_response()
}

pub async fn ban(
    State(state): State<AppState>,
    Caller(admin_id): Caller,
    Path(creator_id): Path<i32>,
    payload: Result<Json<ReasonRequest>, JsonRejection>,
) -> Response {
    let body = match json_body(payload) {
        Ok(body) => body,
        Err(response) => return response,
    };
    state
        .studio
        .ban_creator(creator_id, admin_id, &body.reason)
        .await
        .into_response()
}
