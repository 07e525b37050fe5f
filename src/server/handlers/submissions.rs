use axum::{
    extract::{rejection::JsonRejection, Path, State},
    response::{IntoResponse, Json, Response},
};
use serde::Deserialize;

use super::{json_body, Caller};
use crate::server::app::AppState;
use crate::services::{EpisodeInput, SubmissionPayload};

#[derive(Debug, Deserialize)]
pub struct AddEpisodesRequest {
    pub episodes: Vec<EpisodeInput>,
}

pub async fn submit_content(
    State(state): State<AppState>,
    Caller(user_id): Caller,
    payload: Result<Json<SubmissionPayload>, JsonRejection>,
) -> Response {
    let payload = match json_body(payload) {
        Ok(payload) => payload,
        Err(response) => return response,
    };
    state
        .studio
        .submit_content(user_id, payload)
        .await
        .into_response()
}

pub async fn list_my_submissions(State(state): State<AppState>, Caller(user_id): Caller) -> Response {
    state.studio.list_my_submissions(user_id).await.into_response()
}

pub async fn get_submission(
    State(state): State<AppState>,
    Caller(user_id): Caller,
    Path(submission_id): Path<i32>,
) -> Response {
    state
        .studio
        .get_my_submission(user_id, submission_id)
        .await
        .into_response()
}

pub async fn add_episodes(
    State(state): State<AppState>,
    Caller(user_id): Caller,
    Path(submission_id): Path<i32>,
    payload: Result<Json<AddEpisodesRequest>, JsonRejection>,
) -> Response {
    let body = match json_body(payload) {
        Ok(body) => body,
        Err(response) => return response,
    };
    state
        .studio
        .add_episodes_to_submission(user_id, submission_id, body.episodes)
        .await
        .into_response()
}
