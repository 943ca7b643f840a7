//! Note handlers

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use daybook_core::services::notes;
use daybook_core::{NewNote, Note, NotePatch};
use serde_json::Value;

use super::message;
use crate::error::Result;
use crate::extract::{parse_id, ApiJson, Authenticated};
use crate::state::AppState;

const ENTITY: &str = "Note";

pub async fn list(State(state): State<AppState>, caller: Authenticated) -> Result<Json<Vec<Note>>> {
    let notes = state
        .run(move |db, _| notes::list_active(db, caller.user_id))
        .await?;
    Ok(Json(notes))
}

pub async fn list_archived(
    State(state): State<AppState>,
    caller: Authenticated,
) -> Result<Json<Vec<Note>>> {
    let notes = state
        .run(move |db, _| notes::list_archived(db, caller.user_id))
        .await?;
    Ok(Json(notes))
}

pub async fn get(
    State(state): State<AppState>,
    caller: Authenticated,
    Path(id): Path<String>,
) -> Result<Json<Note>> {
    let id = parse_id(&id, ENTITY)?;
    let note = state
        .run(move |db, _| notes::get(db, id, caller.user_id))
        .await?;
    Ok(Json(note))
}

pub async fn create(
    State(state): State<AppState>,
    caller: Authenticated,
    ApiJson(new): ApiJson<NewNote>,
) -> Result<(StatusCode, Json<Note>)> {
    let note = state
        .run(move |db, _| notes::create(db, caller.user_id, new))
        .await?;
    Ok((StatusCode::CREATED, Json(note)))
}

pub async fn update(
    State(state): State<AppState>,
    caller: Authenticated,
    Path(id): Path<String>,
    ApiJson(patch): ApiJson<NotePatch>,
) -> Result<Json<Note>> {
    let id = parse_id(&id, ENTITY)?;
    let note = state
        .run(move |db, _| notes::update(db, id, caller.user_id, patch))
        .await?;
    Ok(Json(note))
}

pub async fn archive(
    State(state): State<AppState>,
    caller: Authenticated,
    Path(id): Path<String>,
) -> Result<Json<Value>> {
    let id = parse_id(&id, ENTITY)?;
    state
        .run(move |db, _| notes::archive(db, id, caller.user_id))
        .await?;
    Ok(message("Note archived successfully"))
}
