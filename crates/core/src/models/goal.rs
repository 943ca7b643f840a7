//! Goal model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::ArchiveState;

/// A daily goal
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Goal {
    pub id: Uuid,
    pub user_id: Uuid,
    pub text: String,
    pub completed: bool,
    #[serde(rename = "archived")]
    pub state: ArchiveState,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Goal {
    pub fn new(user_id: Uuid, text: String) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            user_id,
            text,
            completed: false,
            state: ArchiveState::Active,
            created_at: now,
            updated_at: now,
        }
    }
}

/// Fields accepted when creating a goal
#[derive(Debug, Clone, Default, Deserialize)]
pub struct NewGoal {
    pub text: Option<String>,
}

/// Partial goal update
#[derive(Debug, Clone, Default, Deserialize)]
pub struct GoalPatch {
    pub text: Option<String>,
    pub completed: Option<bool>,
}

impl GoalPatch {
    pub fn is_empty(&self) -> bool {
        self.text.is_none() && self.completed.is_none()
    }
}
