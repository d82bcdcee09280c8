//! Router assembly.
//!
//! SYSTEM CONTEXT
//! ==============
//! Binds the summary API and the two probes under one Axum router. Every
//! request passes through CORS, HTTP tracing and a panic catcher that renders
//! a generic 500 body.

pub mod summary;

use std::any::Any;

use axum::Router;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use axum::routing::{get, post};
use serde_json::{Value, json};
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::cors::{Any as AnyOrigin, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::error;

use crate::models::ErrorBody;
use crate::state::AppState;

pub const SERVICE_NAME: &str = "AI Summary Service";

/// Detail for failures outside any handler's own error mapping.
pub const UNEXPECTED_ERROR_DETAIL: &str = "An unexpected error occurred";

pub fn app(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(AnyOrigin)
        .allow_methods(AnyOrigin)
        .allow_headers(AnyOrigin);

    Router::new()
        .route("/", get(root))
        .route("/health", get(health))
        .route("/api/summary", post(summary::create_summary))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .layer(CatchPanicLayer::custom(panic_response))
        .with_state(state)
}

/// `GET /` — service identity.
async fn root() -> Json<Value> {
    Json(json!({
        "service": SERVICE_NAME,
        "version": env!("CARGO_PKG_VERSION"),
        "status": "running",
    }))
}

/// `GET /health` — liveness probe.
async fn health(State(state): State<AppState>) -> Json<Value> {
    Json(json!({
        "status": "healthy",
        "environment": state.settings.environment,
    }))
}

fn panic_response(panic: Box<dyn Any + Send + 'static>) -> Response {
    let message = panic
        .downcast_ref::<String>()
        .map(String::as_str)
        .or_else(|| panic.downcast_ref::<&str>().copied())
        .unwrap_or("unknown panic");
    error!(code = "E_PANIC", panic = message, "http: handler panicked");
    let body = ErrorBody { error: summary::INTERNAL_ERROR.to_string(), detail: UNEXPECTED_ERROR_DETAIL.to_string() };
    (StatusCode::INTERNAL_SERVER_ERROR, Json(body)).into_response()
}

#[cfg(test)]
#[path = "mod_test.rs"]
mod tests;
