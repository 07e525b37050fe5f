use axum::{
    extract::{rejection::JsonRejection, State},
    response::{IntoResponse, Json, Response},
};

use super::{json_body, Caller};
use crate::server::app::AppState;
use crate::services::SettingsUpdate;

pub async fn get_settings(State(state): State<AppState>) -> Response {
    state.studio.settings().await.into_response()
}

pub async fn update_settings(
    State(state): State<AppState>,
    _caller: Caller,
    payload: Result<Json<SettingsUpdate>, JsonRejection>,
) -> Response {
    let patch = match json_body(payload) {
        Ok(patch) => patch,
        Err(response) => return response,
    };
    state.studio.update_settings(patch).await.into_response()
}
