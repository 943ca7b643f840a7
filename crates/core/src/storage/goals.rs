//! Goal storage operations
//!
//! Every statement is filtered by `user_id`; a row owned by someone else is
//! invisible here.

use chrono::Utc;
use rusqlite::{params, Connection, Row};
use tracing::instrument;
use uuid::Uuid;

use super::parse::{archive_flag, archive_state, parse_datetime, parse_uuid, OptionalExt};
use crate::error::Result;
use crate::models::{ArchiveState, Goal};

const GOAL_COLUMNS: &str = "id, user_id, text, completed, archived, created_at, updated_at";

pub struct GoalStore<'a> {
    conn: &'a Connection,
}

impl<'a> GoalStore<'a> {
    pub fn new(conn: &'a Connection) -> Self {
        Self { conn }
    }

    /// Create a new goal
    #[instrument(skip(self, goal), fields(user_id = %goal.user_id))]
    pub fn create(&self, goal: &Goal) -> Result<()> {
        self.conn.execute(
            "INSERT INTO goals (id, user_id, text, completed, archived, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            params![
                goal.id.to_string(),
                goal.user_id.to_string(),
                goal.text,
                goal.completed as i32,
                archive_flag(goal.state),
                goal.created_at.to_rfc3339(),
                goal.updated_at.to_rfc3339(),
            ],
        )?;
        Ok(())
    }

    /// Find a goal owned by `user_id`
    #[instrument(skip(self))]
    pub fn find(&self, id: Uuid, user_id: Uuid) -> Result<Option<Goal>> {
        let goal = self
            .conn
            .query_row(
                &format!("SELECT {GOAL_COLUMNS} FROM goals WHERE id = ?1 AND user_id = ?2"),
                params![id.to_string(), user_id.to_string()],
                map_goal,
            )
            .optional()?;

        Ok(goal)
    }

    /// List a user's goals in the given state, newest first
    #[instrument(skip(self))]
    pub fn list(&self, user_id: Uuid, state: ArchiveState) -> Result<Vec<Goal>> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {GOAL_COLUMNS} FROM goals
             WHERE user_id = ?1 AND archived = ?2 ORDER BY created_at DESC"
        ))?;

        let goals = stmt
            .query_map(params![user_id.to_string(), archive_flag(state)], map_goal)?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(goals)
    }

    /// Persist edited fields. Returns false when no owned row matched.
    pub fn update(&self, goal: &Goal) -> Result<bool> {
        let changed = self.conn.execute(
            "UPDATE goals SET text = ?1, completed = ?2, updated_at = ?3
             WHERE id = ?4 AND user_id = ?5",
            params![
                goal.text,
                goal.completed as i32,
                goal.updated_at.to_rfc3339(),
                goal.id.to_string(),
                goal.user_id.to_string(),
            ],
        )?;
        Ok(changed > 0)
    }

    /// Move a goal between active and archived. Returns false when no owned row matched.
    pub fn set_state(&self, id: Uuid, user_id: Uuid, state: ArchiveState) -> Result<bool> {
        let changed = self.conn.execute(
            "UPDATE goals SET archived = ?1, updated_at = ?2 WHERE id = ?3 AND user_id = ?4",
            params![
                archive_flag(state),
                Utc::now().to_rfc3339(),
                id.to_string(),
                user_id.to_string(),
            ],
        )?;
        Ok(changed > 0)
    }
}

fn map_goal(row: &Row<'_>) -> rusqlite::Result<Goal> {
    Ok(Goal {
        id: parse_uuid(&row.get::<_, String>(0)?)?,
        user_id: parse_uuid(&row.get::<_, String>(1)?)?,
        text: row.get(2)?,
        completed: row.get::<_, i32>(3)? != 0,
        state: archive_state(row.get(4)?),
        created_at: parse_datetime(&row.get::<_, String>(5)?)?,
        updated_at: parse_datetime(&row.get::<_, String>(6)?)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::User;
    use crate::storage::Database;

    fn create_test_user(db: &Database) -> Uuid {
        let user = User::new(format!("{}@x.com", Uuid::new_v4()), "hash".into(), None);
        db.users().create(&user).unwrap();
        user.id
    }

    #[test]
    fn test_queries_are_owner_scoped() {
        let db = Database::open_in_memory().unwrap();
        let alice = create_test_user(&db);
        let bob = create_test_user(&db);

        let goal = Goal::new(alice, "Ship it".into());
        db.goals().create(&goal).unwrap();

        assert!(db.goals().find(goal.id, alice).unwrap().is_some());
        assert!(db.goals().find(goal.id, bob).unwrap().is_none());
        assert!(db.goals().list(bob, ArchiveState::Active).unwrap().is_empty());
        assert!(!db.goals().set_state(goal.id, bob, ArchiveState::Archived).unwrap());

        let mut hijacked = goal.clone();
        hijacked.user_id = bob;
        hijacked.text = "mine now".into();
        assert!(!db.goals().update(&hijacked).unwrap());
        assert_eq!(db.goals().find(goal.id, alice).unwrap().unwrap().text, "Ship it");
    }

    #[test]
    fn test_archive_moves_between_listings() {
        let db = Database::open_in_memory().unwrap();
        let user_id = create_test_user(&db);

        let goal = Goal::new(user_id, "Walk".into());
        db.goals().create(&goal).unwrap();
        assert!(db.goals().set_state(goal.id, user_id, ArchiveState::Archived).unwrap());

        assert!(db.goals().list(user_id, ArchiveState::Active).unwrap().is_empty());
        let archived = db.goals().list(user_id, ArchiveState::Archived).unwrap();
        assert_eq!(archived.len(), 1);
        assert_eq!(archived[0].state, ArchiveState::Archived);
    }

    #[test]
    fn test_foreign_key_requires_user() {
        let db = Database::open_in_memory().unwrap();
        let orphan = Goal::new(Uuid::new_v4(), "Nobody's".into());
        assert!(db.goals().create(&orphan).is_err());
    }
}
