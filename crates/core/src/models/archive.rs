//! Soft-delete state shared by goals, habits and notes

use serde::{Deserialize, Serialize};

/// Whether a record shows up in default listings.
///
/// Archiving never removes the row. On the wire this is the `archived` boolean
/// clients already understand.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "bool", into = "bool")]
pub enum ArchiveState {
    #[default]
    Active,
    Archived,
}

impl ArchiveState {
    pub fn is_archived(self) -> bool {
        self == ArchiveState::Archived
    }
}

impl From<bool> for ArchiveState {
    fn from(archived: bool) -> Self {
        if archived {
            ArchiveState::Archived
        } else {
            ArchiveState::Active
        }
    }
}

impl From<ArchiveState> for bool {
    fn from(state: ArchiveState) -> Self {
        state.is_archived()
    }
}
