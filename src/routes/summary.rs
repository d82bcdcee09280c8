//! Summary route — `POST /api/summary`.
//!
//! Client-caused failures (bad body, blank transcript, unknown provider,
//! unrecoverable model output) are 400 with the error message as `detail`.
//! Everything else is 500 with a fixed localized body; the real cause is only
//! logged.

use axum::extract::State;
use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use tracing::{error, warn};

use crate::error::ErrorCode;
use crate::models::{ErrorBody, SummaryRequest, SummaryResponse};
use crate::services::summary::SummaryError;
use crate::state::AppState;

pub const INVALID_REQUEST: &str = "Invalid request";
pub const PROVIDER_ERROR: &str = "AI provider error";
pub const PROVIDER_ERROR_DETAIL: &str = "AI 서비스 연결 중 오류가 발생했습니다.";
pub const INTERNAL_ERROR: &str = "Internal server error";
pub const INTERNAL_ERROR_DETAIL: &str = "요약 생성 중 오류가 발생했습니다.";

/// An error response: status plus `{error, detail}` body.
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub body: ErrorBody,
}

impl ApiError {
    fn new(status: StatusCode, error: &str, detail: impl Into<String>) -> Self {
        Self { status, body: ErrorBody { error: error.to_string(), detail: detail.into() } }
    }

    #[must_use]
    pub fn bad_request(detail: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, INVALID_REQUEST, detail)
    }

    #[must_use]
    pub fn provider() -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, PROVIDER_ERROR, PROVIDER_ERROR_DETAIL)
    }

    #[must_use]
    pub fn internal() -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, INTERNAL_ERROR, INTERNAL_ERROR_DETAIL)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(self.body)).into_response()
    }
}

/// `POST /api/summary` — summarize a meeting transcript.
pub async fn create_summary(
    State(state): State<AppState>,
    payload: Result<Json<SummaryRequest>, JsonRejection>,
) -> Result<Json<SummaryResponse>, ApiError> {
    let Json(request) = payload.map_err(|rejection| {
        let detail = rejection.body_text();
        warn!(code = "E_INVALID_REQUEST", error = %detail, "summary: request body rejected");
        ApiError::bad_request(detail)
    })?;

    state
        .summaries
        .generate(&request)
        .await
        .map(Json)
        .map_err(summary_error_to_api)
}

pub(crate) fn summary_error_to_api(err: SummaryError) -> ApiError {
    let code = err.error_code();
    match err {
        SummaryError::InvalidRequest(_) | SummaryError::UnsupportedProvider(_) | SummaryError::Parse(_) => {
            warn!(code, error = %err, "summary: invalid request");
            ApiError::bad_request(err.to_string())
        }
        SummaryError::Provider(ref e) => {
            error!(code, error = %e, retryable = e.retryable(), "summary: AI provider error");
            ApiError::provider()
        }
        SummaryError::Prompt(ref e) => {
            error!(code, error = %e, "summary: failed to generate summary");
            ApiError::internal()
        }
    }
}

#[cfg(test)]
#[path = "summary_test.rs"]
mod tests;
