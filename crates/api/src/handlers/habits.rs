//! Habit handlers

use axum::body::Bytes;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use daybook_core::services::habits;
use daybook_core::{Habit, HabitCompletion, HabitPatch, NewHabit, ToggleRequest};
use serde_json::Value;

use super::message;
use crate::error::{Error, Result};
use crate::extract::{parse_id, ApiJson, Authenticated};
use crate::state::AppState;

const ENTITY: &str = "Habit";

pub async fn list(State(state): State<AppState>, caller: Authenticated) -> Result<Json<Vec<Habit>>> {
    let habits = state
        .run(move |db, _| habits::list_active(db, caller.user_id))
        .await?;
    Ok(Json(habits))
}

pub async fn list_archived(
    State(state): State<AppState>,
    caller: Authenticated,
) -> Result<Json<Vec<Habit>>> {
    let habits = state
        .run(move |db, _| habits::list_archived(db, caller.user_id))
        .await?;
    Ok(Json(habits))
}

pub async fn get(
    State(state): State<AppState>,
    caller: Authenticated,
    Path(id): Path<String>,
) -> Result<Json<Habit>> {
    let id = parse_id(&id, ENTITY)?;
    let habit = state
        .run(move |db, _| habits::get(db, id, caller.user_id))
        .await?;
    Ok(Json(habit))
}

pub async fn create(
    State(state): State<AppState>,
    caller: Authenticated,
    ApiJson(new): ApiJson<NewHabit>,
) -> Result<(StatusCode, Json<Habit>)> {
    let habit = state
        .run(move |db, _| habits::create(db, caller.user_id, new))
        .await?;
    Ok((StatusCode::CREATED, Json(habit)))
}

pub async fn update(
    State(state): State<AppState>,
    caller: Authenticated,
    Path(id): Path<String>,
    ApiJson(patch): ApiJson<HabitPatch>,
) -> Result<Json<Habit>> {
    let id = parse_id(&id, ENTITY)?;
    let habit = state
        .run(move |db, _| habits::update(db, id, caller.user_id, patch))
        .await?;
    Ok(Json(habit))
}

pub async fn archive(
    State(state): State<AppState>,
    caller: Authenticated,
    Path(id): Path<String>,
) -> Result<Json<Value>> {
    let id = parse_id(&id, ENTITY)?;
    state
        .run(move |db, _| habits::archive(db, id, caller.user_id))
        .await?;
    Ok(message("Habit archived successfully"))
}

/// `POST /habits/:id/toggle`, body optional (`{"date": "YYYY-MM-DD"}`)
pub async fn toggle(
    State(state): State<AppState>,
    caller: Authenticated,
    Path(id): Path<String>,
    body: Bytes,
) -> Result<Json<Habit>> {
    let id = parse_id(&id, ENTITY)?;
    let request: ToggleRequest = if body.iter().all(u8::is_ascii_whitespace) {
        ToggleRequest::default()
    } else {
        serde_json::from_slice(&body).map_err(|e| Error::BadRequest(e.to_string()))?
    };

    let habit = state
        .run(move |db, _| habits::toggle_completion(db, id, caller.user_id, request.date))
        .await?;
    Ok(Json(habit))
}

pub async fn completions(
    State(state): State<AppState>,
    caller: Authenticated,
    Path(id): Path<String>,
) -> Result<Json<Vec<HabitCompletion>>> {
    let id = parse_id(&id, ENTITY)?;
    let history = state
        .run(move |db, _| habits::completions(db, id, caller.user_id))
        .await?;
    Ok(Json(history))
}
