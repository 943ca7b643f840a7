//! Habit and daily completion models

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::ArchiveState;

/// A tracked habit.
///
/// `completed`, `streak`, `longest_streak` and `total_completions` are cached
/// from the completion history and only change through a toggle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Habit {
    pub id: Uuid,
    pub user_id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub completed: bool,
    pub streak: u32,
    pub longest_streak: u32,
    pub total_completions: u32,
    #[serde(rename = "archived")]
    pub state: ArchiveState,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Habit {
    pub fn new(user_id: Uuid, name: String, description: Option<String>) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            user_id,
            name,
            description,
            completed: false,
            streak: 0,
            longest_streak: 0,
            total_completions: 0,
            state: ArchiveState::Active,
            created_at: now,
            updated_at: now,
        }
    }

    /// Apply one toggle to the cached counters.
    pub fn record_toggle(&mut self, now_completed: bool) {
        if now_completed {
            self.streak += 1;
            self.total_completions += 1;
            self.longest_streak = self.longest_streak.max(self.streak);
        } else {
            self.streak = self.streak.saturating_sub(1);
            self.total_completions = self.total_completions.saturating_sub(1);
        }
    }
}

/// One row per habit per calendar day
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HabitCompletion {
    pub id: Uuid,
    pub habit_id: Uuid,
    pub user_id: Uuid,
    pub date: NaiveDate,
    pub completed: bool,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct NewHabit {
    pub name: Option<String>,
    pub description: Option<String>,
}

/// Partial habit update. An empty `description` clears it.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct HabitPatch {
    pub name: Option<String>,
    pub description: Option<String>,
}

impl HabitPatch {
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.description.is_none()
    }
}

/// Optional body of a toggle request
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ToggleRequest {
    pub date: Option<NaiveDate>,
}
