//! Goal handlers

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use daybook_core::services::goals;
use daybook_core::{Goal, GoalPatch, NewGoal};
use serde_json::Value;

use super::message;
use crate::error::Result;
use crate::extract::{parse_id, ApiJson, Authenticated};
use crate::state::AppState;

const ENTITY: &str = "Goal";

pub async fn list(State(state): State<AppState>, caller: Authenticated) -> Result<Json<Vec<Goal>>> {
    let goals = state
        .run(move |db, _| goals::list_active(db, caller.user_id))
        .await?;
    Ok(Json(goals))
}

pub async fn list_archived(
    State(state): State<AppState>,
    caller: Authenticated,
) -> Result<Json<Vec<Goal>>> {
    let goals = state
        .run(move |db, _| goals::list_archived(db, caller.user_id))
        .await?;
    Ok(Json(goals))
}

pub async fn get(
    State(state): State<AppState>,
    caller: Authenticated,
    Path(id): Path<String>,
) -> Result<Json<Goal>> {
    let id = parse_id(&id, ENTITY)?;
    let goal = state
        .run(move |db, _| goals::get(db, id, caller.user_id))
        .await?;
    Ok(Json(goal))
}

pub async fn create(
    State(state): State<AppState>,
    caller: Authenticated,
    ApiJson(new): ApiJson<NewGoal>,
) -> Result<(StatusCode, Json<Goal>)> {
    let goal = state
        .run(move |db, _| goals::create(db, caller.user_id, new))
        .await?;
    Ok((StatusCode::CREATED, Json(goal)))
}

pub async fn update(
    State(state): State<AppState>,
    caller: Authenticated,
    Path(id): Path<String>,
    ApiJson(patch): ApiJson<GoalPatch>,
) -> Result<Json<Goal>> {
    let id = parse_id(&id, ENTITY)?;
    let goal = state
        .run(move |db, _| goals::update(db, id, caller.user_id, patch))
        .await?;
    Ok(Json(goal))
}

pub async fn archive(
    State(state): State<AppState>,
    caller: Authenticated,
    Path(id): Path<String>,
) -> Result<Json<Value>> {
    let id = parse_id(&id, ENTITY)?;
    state
        .run(move |db, _| goals::archive(db, id, caller.user_id))
        .await?;
    Ok(message("Goal archived successfully"))
}
