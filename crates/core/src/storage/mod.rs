//! SQLite storage layer for Daybook

mod goals;
mod habits;
mod migrations;
mod notes;
mod parse;
mod sessions;
mod traits;
mod users;

use chrono::NaiveDate;
use rusqlite::Connection;
use std::path::Path;
use tracing::instrument;
use uuid::Uuid;

use crate::error::Result;
use crate::models::{ArchiveState, Goal, Habit, HabitCompletion, Note, Session, User};

pub use goals::GoalStore;
pub use habits::HabitStore;
pub use notes::NoteStore;
pub use sessions::SessionStore;
pub use traits::{
    GoalRepository, HabitRepository, NoteRepository, SessionRepository, Storage, UserRepository,
};
pub use users::UserStore;

/// Main database handle
pub struct Database {
    conn: Connection,
}

impl Database {
    /// Open or create database at the given path
    #[instrument(skip(path), fields(path = %path.as_ref().display()))]
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let conn = Connection::open(path)?;
        conn.execute_batch("PRAGMA foreign_keys = ON")?;
        let db = Self { conn };
        db.init()?;
        Ok(db)
    }

    /// Open in-memory database (for testing)
    #[instrument]
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        conn.execute_batch("PRAGMA foreign_keys = ON")?;
        let db = Self { conn };
        db.init()?;
        Ok(db)
    }

    /// Initialize database schema via migrations
    fn init(&self) -> Result<()> {
        migrations::run_migrations(&self.conn)?;
        Ok(())
    }

    /// Get current schema version
    pub fn schema_version(&self) -> Result<u32> {
        migrations::get_current_version(&self.conn)
    }

    pub fn users(&self) -> UserStore<'_> {
        UserStore::new(&self.conn)
    }

    pub fn sessions(&self) -> SessionStore<'_> {
        SessionStore::new(&self.conn)
    }

    pub fn goals(&self) -> GoalStore<'_> {
        GoalStore::new(&self.conn)
    }

    pub fn habits(&self) -> HabitStore<'_> {
        HabitStore::new(&self.conn)
    }

    pub fn notes(&self) -> NoteStore<'_> {
        NoteStore::new(&self.conn)
    }
}

// Implement repository traits for Database
// This enables using Database through the trait interface

impl UserRepository for Database {
    fn create_user(&self, user: &User) -> Result<()> {
        self.users().create(user)
    }

    fn find_user_by_id(&self, id: Uuid) -> Result<Option<User>> {
        self.users().find_by_id(id)
    }

    fn find_user_by_email(&self, email: &str) -> Result<Option<User>> {
        self.users().find_by_email(email)
    }
}

impl SessionRepository for Database {
    fn create_session(&self, session: &Session) -> Result<()> {
        self.sessions().create(session)
    }

    fn find_session_by_token(&self, token: &str) -> Result<Option<Session>> {
        self.sessions().find_by_token(token)
    }

    fn delete_session(&self, session_id: Uuid) -> Result<()> {
        self.sessions().delete(session_id)
    }

    fn delete_session_by_token(&self, token: &str) -> Result<()> {
        self.sessions().delete_by_token(token)
    }
}

impl GoalRepository for Database {
    fn create_goal(&self, goal: &Goal) -> Result<()> {
        self.goals().create(goal)
    }

    fn find_goal(&self, id: Uuid, user_id: Uuid) -> Result<Option<Goal>> {
        self.goals().find(id, user_id)
    }

    fn list_goals(&self, user_id: Uuid, state: ArchiveState) -> Result<Vec<Goal>> {
        self.goals().list(user_id, state)
    }

    fn update_goal(&self, goal: &Goal) -> Result<bool> {
        self.goals().update(goal)
    }

    fn set_goal_state(&self, id: Uuid, user_id: Uuid, state: ArchiveState) -> Result<bool> {
        self.goals().set_state(id, user_id, state)
    }
}

impl HabitRepository for Database {
    fn create_habit(&self, habit: &Habit) -> Result<()> {
        self.habits().create(habit)
    }

    fn find_habit(&self, id: Uuid, user_id: Uuid) -> Result<Option<Habit>> {
        self.habits().find(id, user_id)
    }

    fn list_habits(&self, user_id: Uuid, state: ArchiveState) -> Result<Vec<Habit>> {
        self.habits().list(user_id, state)
    }

    fn update_habit(&self, habit: &Habit) -> Result<bool> {
        self.habits().update(habit)
    }

    fn set_habit_state(&self, id: Uuid, user_id: Uuid, state: ArchiveState) -> Result<bool> {
        self.habits().set_state(id, user_id, state)
    }

    fn toggle_habit_completion(
        &self,
        habit_id: Uuid,
        user_id: Uuid,
        date: NaiveDate,
        today: NaiveDate,
    ) -> Result<Option<Habit>> {
        self.habits()
            .toggle_completion(habit_id, user_id, date, today)
    }

    fn list_habit_completions(&self, habit_id: Uuid, user_id: Uuid) -> Result<Vec<HabitCompletion>> {
        self.habits().list_completions(habit_id, user_id)
    }
}

impl NoteRepository for Database {
    fn create_note(&self, note: &Note) -> Result<()> {
        self.notes().create(note)
    }

    fn find_note(&self, id: Uuid, user_id: Uuid) -> Result<Option<Note>> {
        self.notes().find(id, user_id)
    }

    fn list_notes(&self, user_id: Uuid, state: ArchiveState) -> Result<Vec<Note>> {
        self.notes().list(user_id, state)
    }

    fn update_note(&self, note: &Note) -> Result<bool> {
        self.notes().update(note)
    }

    fn set_note_state(&self, id: Uuid, user_id: Uuid, state: ArchiveState) -> Result<bool> {
        self.notes().set_state(id, user_id, state)
    }
}
