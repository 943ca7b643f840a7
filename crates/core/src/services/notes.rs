//! Note operations

use chrono::Utc;
use tracing::{info, instrument};
use uuid::Uuid;

use super::optional_text;
use crate::error::{Error, Result};
use crate::models::{required_text, ArchiveState, NewNote, Note, NotePatch};
use crate::storage::NoteRepository;

const ENTITY: &str = "Note";

pub fn list_active<R: NoteRepository>(repo: &R, user_id: Uuid) -> Result<Vec<Note>> {
    repo.list_notes(user_id, ArchiveState::Active)
}

pub fn list_archived<R: NoteRepository>(repo: &R, user_id: Uuid) -> Result<Vec<Note>> {
    repo.list_notes(user_id, ArchiveState::Archived)
}

pub fn get<R: NoteRepository>(repo: &R, id: Uuid, user_id: Uuid) -> Result<Note> {
    repo.find_note(id, user_id)?.ok_or(Error::NotFound(ENTITY))
}

#[instrument(skip(repo, new))]
pub fn create<R: NoteRepository>(repo: &R, user_id: Uuid, new: NewNote) -> Result<Note> {
    let content = required_text("Content", new.content.as_deref())?;
    let note = Note::new(user_id, optional_text(new.title), content);
    repo.create_note(&note)?;
    info!(note_id = %note.id, "Note created");
    Ok(note)
}

#[instrument(skip(repo, patch))]
pub fn update<R: NoteRepository>(
    repo: &R,
    id: Uuid,
    user_id: Uuid,
    patch: NotePatch,
) -> Result<Note> {
    if patch.is_empty() {
        return Err(Error::validation("No updates provided"));
    }

    let mut note = get(repo, id, user_id)?;
    if patch.title.is_some() {
        note.title = optional_text(patch.title);
    }
    if let Some(content) = patch.content.as_deref() {
        note.content = required_text("Content", Some(content))?;
    }
    note.updated_at = Utc::now();

    if !repo.update_note(&note)? {
        return Err(Error::NotFound(ENTITY));
    }
    Ok(note)
}

#[instrument(skip(repo))]
pub fn archive<R: NoteRepository>(repo: &R, id: Uuid, user_id: Uuid) -> Result<()> {
    if !repo.set_note_state(id, user_id, ArchiveState::Archived)? {
        return Err(Error::NotFound(ENTITY));
    }
    info!(note_id = %id, "Note archived");
    Ok(())
}
