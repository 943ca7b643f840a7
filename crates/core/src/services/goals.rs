//! Goal operations

use chrono::Utc;
use tracing::{info, instrument};
use uuid::Uuid;

use crate::error::{Error, Result};
use crate::models::{required_text, ArchiveState, Goal, GoalPatch, NewGoal};
use crate::storage::GoalRepository;

const ENTITY: &str = "Goal";

pub fn list_active<R: GoalRepository>(repo: &R, user_id: Uuid) -> Result<Vec<Goal>> {
    repo.list_goals(user_id, ArchiveState::Active)
}

pub fn list_archived<R: GoalRepository>(repo: &R, user_id: Uuid) -> Result<Vec<Goal>> {
    repo.list_goals(user_id, ArchiveState::Archived)
}

pub fn get<R: GoalRepository>(repo: &R, id: Uuid, user_id: Uuid) -> Result<Goal> {
    repo.find_goal(id, user_id)?.ok_or(Error::NotFound(ENTITY))
}

#[instrument(skip(repo, new))]
pub fn create<R: GoalRepository>(repo: &R, user_id: Uuid, new: NewGoal) -> Result<Goal> {
    let text = required_text("Text", new.text.as_deref())?;
    let goal = Goal::new(user_id, text);
    repo.create_goal(&goal)?;
    info!(goal_id = %goal.id, "Goal created");
    Ok(goal)
}

#[instrument(skip(repo, patch))]
pub fn update<R: GoalRepository>(
    repo: &R,
    id: Uuid,
    user_id: Uuid,
    patch: GoalPatch,
) -> Result<Goal> {
    if patch.is_empty() {
        return Err(Error::validation("No updates provided"));
    }

    let mut goal = get(repo, id, user_id)?;
    if let Some(text) = patch.text.as_deref() {
        goal.text = required_text("Text", Some(text))?;
    }
    if let Some(completed) = patch.completed {
        goal.completed = completed;
    }
    goal.updated_at = Utc::now();

    if !repo.update_goal(&goal)? {
        return Err(Error::NotFound(ENTITY));
    }
    Ok(goal)
}

/// Soft delete. Archiving an archived goal succeeds.
#[instrument(skip(repo))]
pub fn archive<R: GoalRepository>(repo: &R, id: Uuid, user_id: Uuid) -> Result<()> {
    if !repo.set_goal_state(id, user_id, ArchiveState::Archived)? {
        return Err(Error::NotFound(ENTITY));
    }
    info!(goal_id = %id, "Goal archived");
    Ok(())
}
