//! Structured operation results
//!
//! Operations exposed to callers never propagate errors; they report
//! `{ "success": true, "data": … }` or `{ "success": false, "error": { … } }`.

use serde::Serialize;

use super::StudioError;

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ErrorBody {
    pub code: String,
    pub message: String,
}

impl From<&StudioError> for ErrorBody {
    fn from(err: &StudioError) -> Self {
        Self {
            code: err.error_code().to_string(),
            message: err.to_string(),
        }
    }
}

#[derive(Clone, Debug, Serialize)]
pub struct OperationResult<T> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<ErrorBody>,
    #[serde(skip)]
    status: u16,
}

impl<T> OperationResult<T> {
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
            status: 200,
        }
    }

    pub fn failure(err: &StudioError) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(ErrorBody::from(err)),
            status: err.http_status_code(),
        }
    }

    /// HTTP status matching the outcome
    pub fn status_code(&self) -> u16 {
        self.status
    }

    pub fn error_code(&self) -> Option<&str> {
        self.error.as_ref().map(|e| e.code.as_str())
    }

    pub fn into_data(self) -> Option<T> {
        self.data
    }
}

impl<T> From<Result<T, StudioError>> for OperationResult<T> {
    fn from(result: Result<T, StudioError>) -> Self {
        match result {
            Ok(data) => OperationResult::ok(data),
            Err(err) => OperationResult::failure(&err),
        }
    }
}
