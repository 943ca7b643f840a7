//! Habit and completion storage operations

use chrono::{NaiveDate, Utc};
use rusqlite::{params, Connection, Row};
use tracing::{debug, instrument};
use uuid::Uuid;

use super::parse::{
    archive_flag, archive_state, format_date, parse_date, parse_datetime, parse_uuid, OptionalExt,
};
use crate::error::Result;
use crate::models::{ArchiveState, Habit, HabitCompletion};

const HABIT_COLUMNS: &str = "id, user_id, name, description, completed, streak, longest_streak, \
     total_completions, archived, created_at, updated_at";

pub struct HabitStore<'a> {
    conn: &'a Connection,
}

impl<'a> HabitStore<'a> {
    pub fn new(conn: &'a Connection) -> Self {
        Self { conn }
    }

    #[instrument(skip(self, habit), fields(user_id = %habit.user_id))]
    pub fn create(&self, habit: &Habit) -> Result<()> {
        self.conn.execute(
            "INSERT INTO habits (id, user_id, name, description, completed, streak, longest_streak,
                                 total_completions, archived, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)",
            params![
                habit.id.to_string(),
                habit.user_id.to_string(),
                habit.name,
                habit.description,
                habit.completed as i32,
                habit.streak,
                habit.longest_streak,
                habit.total_completions,
                archive_flag(habit.state),
                habit.created_at.to_rfc3339(),
                habit.updated_at.to_rfc3339(),
            ],
        )?;
        Ok(())
    }

    #[instrument(skip(self))]
    pub fn find(&self, id: Uuid, user_id: Uuid) -> Result<Option<Habit>> {
        find_habit(self.conn, id, user_id)
    }

    #[instrument(skip(self))]
    pub fn list(&self, user_id: Uuid, state: ArchiveState) -> Result<Vec<Habit>> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {HABIT_COLUMNS} FROM habits
             WHERE user_id = ?1 AND archived = ?2 ORDER BY created_at DESC"
        ))?;

        let habits = stmt
            .query_map(params![user_id.to_string(), archive_flag(state)], map_habit)?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(habits)
    }

    /// Persist name and description. Returns false when no owned row matched.
    pub fn update(&self, habit: &Habit) -> Result<bool> {
        let changed = self.conn.execute(
            "UPDATE habits SET name = ?1, description = ?2, updated_at = ?3
             WHERE id = ?4 AND user_id = ?5",
            params![
                habit.name,
                habit.description,
                habit.updated_at.to_rfc3339(),
                habit.id.to_string(),
                habit.user_id.to_string(),
            ],
        )?;
        Ok(changed > 0)
    }

    pub fn set_state(&self, id: Uuid, user_id: Uuid, state: ArchiveState) -> Result<bool> {
        let changed = self.conn.execute(
            "UPDATE habits SET archived = ?1, updated_at = ?2 WHERE id = ?3 AND user_id = ?4",
            params![
                archive_flag(state),
                Utc::now().to_rfc3339(),
                id.to_string(),
                user_id.to_string(),
            ],
        )?;
        Ok(changed > 0)
    }

    /// Flip the completion for `date`, creating it as completed when absent.
    ///
    /// The completion row and the habit's cached counters are written in one
    /// transaction. `habit.completed` mirrors the row for `today`. Returns
    /// `None` when the habit is not owned by `user_id`.
    #[instrument(skip(self))]
    pub fn toggle_completion(
        &self,
        habit_id: Uuid,
        user_id: Uuid,
        date: NaiveDate,
        today: NaiveDate,
    ) -> Result<Option<Habit>> {
        let tx = self.conn.unchecked_transaction()?;

        let Some(mut habit) = find_habit(&tx, habit_id, user_id)? else {
            return Ok(None);
        };

        let now_completed = match find_completion(&tx, habit_id, user_id, date)? {
            Some(existing) => {
                tx.execute(
                    "UPDATE habit_completions SET completed = ?1 WHERE id = ?2",
                    params![!existing.completed as i32, existing.id.to_string()],
                )?;
                !existing.completed
            }
            None => {
                tx.execute(
                    "INSERT INTO habit_completions (id, habit_id, user_id, date, completed)
                     VALUES (?1, ?2, ?3, ?4, 1)",
                    params![
                        Uuid::new_v4().to_string(),
                        habit_id.to_string(),
                        user_id.to_string(),
                        format_date(date),
                    ],
                )?;
                true
            }
        };

        habit.record_toggle(now_completed);
        habit.completed = if date == today {
            now_completed
        } else {
            find_completion(&tx, habit_id, user_id, today)?.is_some_and(|c| c.completed)
        };
        habit.updated_at = Utc::now();

        tx.execute(
            "UPDATE habits SET completed = ?1, streak = ?2, longest_streak = ?3,
                               total_completions = ?4, updated_at = ?5
             WHERE id = ?6 AND user_id = ?7",
            params![
                habit.completed as i32,
                habit.streak,
                habit.longest_streak,
                habit.total_completions,
                habit.updated_at.to_rfc3339(),
                habit.id.to_string(),
                habit.user_id.to_string(),
            ],
        )?;
        tx.commit()?;

        debug!(%habit_id, %date, completed = now_completed, streak = habit.streak, "Habit toggled");
        Ok(Some(habit))
    }

    /// Completion history for one owned habit, newest day first
    #[instrument(skip(self))]
    pub fn list_completions(&self, habit_id: Uuid, user_id: Uuid) -> Result<Vec<HabitCompletion>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, habit_id, user_id, date, completed FROM habit_completions
             WHERE habit_id = ?1 AND user_id = ?2 ORDER BY date DESC",
        )?;

        let completions = stmt
            .query_map(
                params![habit_id.to_string(), user_id.to_string()],
                map_completion,
            )?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(completions)
    }
}

fn find_habit(conn: &Connection, id: Uuid, user_id: Uuid) -> Result<Option<Habit>> {
    let habit = conn
        .query_row(
            &format!("SELECT {HABIT_COLUMNS} FROM habits WHERE id = ?1 AND user_id = ?2"),
            params![id.to_string(), user_id.to_string()],
            map_habit,
        )
        .optional()?;

    Ok(habit)
}

fn find_completion(
    conn: &Connection,
    habit_id: Uuid,
    user_id: Uuid,
    date: NaiveDate,
) -> Result<Option<HabitCompletion>> {
    let completion = conn
        .query_row(
            "SELECT id, habit_id, user_id, date, completed FROM habit_completions
             WHERE habit_id = ?1 AND user_id = ?2 AND date = ?3",
            params![habit_id.to_string(), user_id.to_string(), format_date(date)],
            map_completion,
        )
        .optional()?;

    Ok(completion)
}

fn map_habit(row: &Row<'_>) -> rusqlite::Result<Habit> {
    Ok(Habit {
        id: parse_uuid(&row.get::<_, String>(0)?)?,
        user_id: parse_uuid(&row.get::<_, String>(1)?)?,
        name: row.get(2)?,
        description: row.get(3)?,
        completed: row.get::<_, i32>(4)? != 0,
        streak: row.get(5)?,
        longest_streak: row.get(6)?,
        total_completions: row.get(7)?,
        state: archive_state(row.get(8)?),
        created_at: parse_datetime(&row.get::<_, String>(9)?)?,
        updated_at: parse_datetime(&row.get::<_, String>(10)?)?,
    })
}

fn map_completion(row: &Row<'_>) -> rusqlite::Result<HabitCompletion> {
    Ok(HabitCompletion {
        id: parse_uuid(&row.get::<_, String>(0)?)?,
        habit_id: parse_uuid(&row.get::<_, String>(1)?)?,
        user_id: parse_uuid(&row.get::<_, String>(2)?)?,
        date: parse_date(&row.get::<_, String>(3)?)?,
        completed: row.get::<_, i32>(4)? != 0,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::User;
    use crate::storage::Database;
    use chrono::Duration;

    fn setup() -> (Database, Uuid, Habit) {
        let db = Database::open_in_memory().unwrap();
        let user = User::new("h@x.com".into(), "hash".into(), None);
        db.users().create(&user).unwrap();
        let habit = Habit::new(user.id, "Meditate".into(), None);
        db.habits().create(&habit).unwrap();
        (db, user.id, habit)
    }

    #[test]
    fn test_toggle_creates_then_flips() {
        let (db, user_id, habit) = setup();
        let today = Utc::now().date_naive();

        let on = db.habits().toggle_completion(habit.id, user_id, today, today).unwrap().unwrap();
        assert!(on.completed);
        assert_eq!(on.streak, 1);

        let off = db.habits().toggle_completion(habit.id, user_id, today, today).unwrap().unwrap();
        assert!(!off.completed);
        assert_eq!(off.streak, 0);
        assert_eq!(off.longest_streak, 1);

        // Still one row for the day
        let history = db.habits().list_completions(habit.id, user_id).unwrap();
        assert_eq!(history.len(), 1);
        assert!(!history[0].completed);
    }

    #[test]
    fn test_toggle_other_day_keeps_today_status() {
        let (db, user_id, habit) = setup();
        let today = Utc::now().date_naive();
        let yesterday = today - Duration::days(1);

        let habit = db
            .habits()
            .toggle_completion(habit.id, user_id, yesterday, today)
            .unwrap()
            .unwrap();
        assert!(!habit.completed);
        assert_eq!(habit.total_completions, 1);

        let stored = db.habits().find(habit.id, user_id).unwrap().unwrap();
        assert_eq!(stored, habit);
    }

    #[test]
    fn test_toggle_requires_owner() {
        let (db, _, habit) = setup();
        let stranger = User::new("s@x.com".into(), "hash".into(), None);
        db.users().create(&stranger).unwrap();
        let today = Utc::now().date_naive();

        let result = db.habits().toggle_completion(habit.id, stranger.id, today, today).unwrap();
        assert!(result.is_none());
        assert!(db.habits().list_completions(habit.id, stranger.id).unwrap().is_empty());
    }
}
