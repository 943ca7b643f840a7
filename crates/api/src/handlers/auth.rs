//! Register, login, logout and current-user handlers

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use daybook_core::{AuthGrant, Credentials, Login, Registration};
use serde_json::{json, Value};

use super::message;
use crate::error::Result;
use crate::extract::{ApiJson, BearerToken};
use crate::state::AppState;

pub async fn register(
    State(state): State<AppState>,
    ApiJson(registration): ApiJson<Registration>,
) -> Result<(StatusCode, Json<AuthGrant>)> {
    let account = state
        .run_auth(move |auth| auth.prepare_account(registration))
        .await?;
    let grant = state
        .run(move |db, auth| auth.create_account(db, account))
        .await?;
    Ok((StatusCode::CREATED, Json(grant)))
}

pub async fn login(
    State(state): State<AppState>,
    ApiJson(login): ApiJson<Login>,
) -> Result<Json<AuthGrant>> {
    let credentials = Credentials::from_login(login)?;

    // Only the lookup and the session insert hold the database lock
    let lookup = credentials.clone();
    let account = state
        .run(move |db, auth| auth.find_account(db, &lookup))
        .await?;
    let user = state
        .run_auth(move |auth| auth.verify_credentials(account, &credentials))
        .await?;
    let grant = state
        .run(move |db, auth| auth.open_session(db, &user))
        .await?;
    Ok(Json(grant))
}

pub async fn logout(
    State(state): State<AppState>,
    BearerToken(token): BearerToken,
) -> Result<Json<Value>> {
    if let Some(token) = token {
        state.run(move |db, auth| auth.logout(db, &token)).await?;
    }
    Ok(message("Logged out successfully"))
}

pub async fn me(
    State(state): State<AppState>,
    BearerToken(token): BearerToken,
) -> Result<Json<Value>> {
    let token = token.unwrap_or_default();
    let user = state
        .run(move |db, auth| auth.current_user(db, &token))
        .await?;
    Ok(Json(json!({ "user": user })))
}
