pub mod creators;
pub mod health;
pub mod moderation;
pub mod notifications;
pub mod settings;
pub mod strikes;
pub mod submissions;

use axum::{
    async_trait,
    extract::{rejection::JsonRejection, FromRequestParts},
    http::{request::Parts, StatusCode},
    response::{IntoResponse, Json, Response},
};
use serde::{Deserialize, Serialize};

use crate::app_context::CreatorStudio;
use crate::errors::{OperationResult, StudioError};

/// Header carrying the authenticated caller's user id, set by the identity layer in front.
pub const USER_ID_HEADER: &str = "x-user-id";

impl<T: Serialize> IntoResponse for OperationResult<T> {
    fn into_response(self) -> Response {
        let status =
            StatusCode::from_u16(self.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        (status, Json(self)).into_response()
    }
}

/// The user id of whoever is calling.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Caller(pub i32);

#[async_trait]
impl<S> FromRequestParts<S> for Caller
where
    S: Send + Sync,
{
    type Rejection = Response;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .headers
            .get(USER_ID_HEADER)
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.trim().parse::<i32>().ok())
            .map(Caller)
            .ok_or_else(|| CreatorStudio::unauthenticated::<()>().into_response())
    }
}

/// Unwrap a JSON body, answering malformed input with a validation envelope.
pub fn json_body<T>(payload: Result<Json<T>, JsonRejection>) -> Result<T, Response> {
    payload.map(|Json(value)| value).map_err(|rejection| {
        OperationResult::<()>::failure(&StudioError::validation(rejection.body_text()))
            .into_response()
    })
}

#[derive(Debug, Default, Deserialize)]
pub struct ReasonRequest {
    #[serde(default)]
    pub reason: String,
}
