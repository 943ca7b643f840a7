//! HTTP handlers, one module per resource

pub mod auth;
pub mod goals;
pub mod habits;
pub mod notes;

use axum::extract::State;
use axum::Json;
use daybook_core::Error as CoreError;
use serde_json::{json, Value};

use crate::error::Error;
use crate::state::AppState;

/// Health check
pub async fn ping(State(state): State<AppState>) -> Json<Value> {
    Json(json!({ "message": state.ping_message() }))
}

/// Any path without a route
pub async fn not_found() -> Error {
    CoreError::NotFound("Route").into()
}

pub(crate) fn message(text: &str) -> Json<Value> {
    Json(json!({ "message": text }))
}
