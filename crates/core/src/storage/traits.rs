//! Storage repository traits
//!
//! These traits define the storage interface the services are written
//! against. Every resource method takes the owning `user_id`.

use chrono::NaiveDate;
use uuid::Uuid;

use crate::error::Result;
use crate::models::{ArchiveState, Goal, Habit, HabitCompletion, Note, Session, User};

/// Credential repository operations
pub trait UserRepository {
    /// Create a new user, failing with `UserExists` on a taken email
    fn create_user(&self, user: &User) -> Result<()>;

    fn find_user_by_id(&self, id: Uuid) -> Result<Option<User>>;

    fn find_user_by_email(&self, email: &str) -> Result<Option<User>>;
}

/// Session repository operations
pub trait SessionRepository {
    fn create_session(&self, session: &Session) -> Result<()>;

    /// Find a session by token, expired or not
    fn find_session_by_token(&self, token: &str) -> Result<Option<Session>>;

    fn delete_session(&self, session_id: Uuid) -> Result<()>;

    fn delete_session_by_token(&self, token: &str) -> Result<()>;
}

/// Goal repository operations
pub trait GoalRepository {
    fn create_goal(&self, goal: &Goal) -> Result<()>;

    fn find_goal(&self, id: Uuid, user_id: Uuid) -> Result<Option<Goal>>;

    fn list_goals(&self, user_id: Uuid, state: ArchiveState) -> Result<Vec<Goal>>;

    /// Returns false when no owned row matched
    fn update_goal(&self, goal: &Goal) -> Result<bool>;

    /// Returns false when no owned row matched
    fn set_goal_state(&self, id: Uuid, user_id: Uuid, state: ArchiveState) -> Result<bool>;
}

/// Habit repository operations
pub trait HabitRepository {
    fn create_habit(&self, habit: &Habit) -> Result<()>;

    fn find_habit(&self, id: Uuid, user_id: Uuid) -> Result<Option<Habit>>;

    fn list_habits(&self, user_id: Uuid, state: ArchiveState) -> Result<Vec<Habit>>;

    fn update_habit(&self, habit: &Habit) -> Result<bool>;

    fn set_habit_state(&self, id: Uuid, user_id: Uuid, state: ArchiveState) -> Result<bool>;

    /// Flip one day's completion and update the cached counters
    fn toggle_habit_completion(
        &self,
        habit_id: Uuid,
        user_id: Uuid,
        date: NaiveDate,
        today: NaiveDate,
    ) -> Result<Option<Habit>>;

    fn list_habit_completions(&self, habit_id: Uuid, user_id: Uuid) -> Result<Vec<HabitCompletion>>;
}

/// Note repository operations
pub trait NoteRepository {
    fn create_note(&self, note: &Note) -> Result<()>;

    fn find_note(&self, id: Uuid, user_id: Uuid) -> Result<Option<Note>>;

    fn list_notes(&self, user_id: Uuid, state: ArchiveState) -> Result<Vec<Note>>;

    fn update_note(&self, note: &Note) -> Result<bool>;

    fn set_note_state(&self, id: Uuid, user_id: Uuid, state: ArchiveState) -> Result<bool>;
}

/// Combined storage interface
///
/// Provides access to all repository operations.
pub trait Storage:
    UserRepository + SessionRepository + GoalRepository + HabitRepository + NoteRepository
{
}

// Blanket implementation: any type implementing all traits implements Storage
impl<T> Storage for T where
    T: UserRepository + SessionRepository + GoalRepository + HabitRepository + NoteRepository
{
}
