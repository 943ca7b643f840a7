//! Note storage operations

use chrono::Utc;
use rusqlite::{params, Connection, Row};
use tracing::instrument;
use uuid::Uuid;

use super::parse::{archive_flag, archive_state, parse_datetime, parse_uuid, OptionalExt};
use crate::error::Result;
use crate::models::{ArchiveState, Note};

const NOTE_COLUMNS: &str = "id, user_id, title, content, archived, created_at, updated_at";

pub struct NoteStore<'a> {
    conn: &'a Connection,
}

impl<'a> NoteStore<'a> {
    pub fn new(conn: &'a Connection) -> Self {
        Self { conn }
    }

    #[instrument(skip(self, note), fields(user_id = %note.user_id))]
    pub fn create(&self, note: &Note) -> Result<()> {
        self.conn.execute(
            "INSERT INTO notes (id, user_id, title, content, archived, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            params![
                note.id.to_string(),
                note.user_id.to_string(),
                note.title,
                note.content,
                archive_flag(note.state),
                note.created_at.to_rfc3339(),
                note.updated_at.to_rfc3339(),
            ],
        )?;
        Ok(())
    }

    #[instrument(skip(self))]
    pub fn find(&self, id: Uuid, user_id: Uuid) -> Result<Option<Note>> {
        let note = self
            .conn
            .query_row(
                &format!("SELECT {NOTE_COLUMNS} FROM notes WHERE id = ?1 AND user_id = ?2"),
                params![id.to_string(), user_id.to_string()],
                map_note,
            )
            .optional()?;

        Ok(note)
    }

    #[instrument(skip(self))]
    pub fn list(&self, user_id: Uuid, state: ArchiveState) -> Result<Vec<Note>> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {NOTE_COLUMNS} FROM notes
             WHERE user_id = ?1 AND archived = ?2 ORDER BY created_at DESC"
        ))?;

        let notes = stmt
            .query_map(params![user_id.to_string(), archive_flag(state)], map_note)?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(notes)
    }

    pub fn update(&self, note: &Note) -> Result<bool> {
        let changed = self.conn.execute(
            "UPDATE notes SET title = ?1, content = ?2, updated_at = ?3
             WHERE id = ?4 AND user_id = ?5",
            params![
                note.title,
                note.content,
                note.updated_at.to_rfc3339(),
                note.id.to_string(),
                note.user_id.to_string(),
            ],
        )?;
        Ok(changed > 0)
    }

    pub fn set_state(&self, id: Uuid, user_id: Uuid, state: ArchiveState) -> Result<bool> {
        let changed = self.conn.execute(
            "UPDATE notes SET archived = ?1, updated_at = ?2 WHERE id = ?3 AND user_id = ?4",
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

fn map_note(row: &Row<'_>) -> rusqlite::Result<Note> {
    Ok(Note {
        id: parse_uuid(&row.get::<_, String>(0)?)?,
        user_id: parse_uuid(&row.get::<_, String>(1)?)?,
        title: row.get(2)?,
        content: row.get(3)?,
        state: archive_state(row.get(4)?),
        created_at: parse_datetime(&row.get::<_, String>(5)?)?,
        updated_at: parse_datetime(&row.get::<_, String>(6)?)?,
    })
}
