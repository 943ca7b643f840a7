//! Session storage operations
//!
//! Rows are looked up by token. Expiry is judged by the caller, so an expired
//! row is still returned here until someone deletes it.

use rusqlite::{params, Connection, Row};
use tracing::instrument;
use uuid::Uuid;

use super::parse::{parse_datetime, parse_uuid, OptionalExt};
use crate::error::Result;
use crate::models::Session;

pub struct SessionStore<'a> {
    conn: &'a Connection,
}

impl<'a> SessionStore<'a> {
    pub fn new(conn: &'a Connection) -> Self {
        Self { conn }
    }

    /// Create a session
    #[instrument(skip(self, session), fields(user_id = %session.user_id))]
    pub fn create(&self, session: &Session) -> Result<()> {
        self.conn.execute(
            "INSERT INTO sessions (id, user_id, token, expires_at, created_at) VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                session.id.to_string(),
                session.user_id.to_string(),
                session.token,
                session.expires_at.to_rfc3339(),
                session.created_at.to_rfc3339(),
            ],
        )?;
        Ok(())
    }

    /// Find a session by its bearer token
    #[instrument(skip_all)]
    pub fn find_by_token(&self, token: &str) -> Result<Option<Session>> {
        let session = self
            .conn
            .query_row(
                "SELECT id, user_id, token, expires_at, created_at FROM sessions WHERE token = ?1",
                params![token],
                map_session,
            )
            .optional()?;

        Ok(session)
    }

    /// Delete session
    pub fn delete(&self, session_id: Uuid) -> Result<()> {
        self.conn.execute(
            "DELETE FROM sessions WHERE id = ?1",
            params![session_id.to_string()],
        )?;
        Ok(())
    }

    /// Delete the session holding this token, if any
    #[instrument(skip_all)]
    pub fn delete_by_token(&self, token: &str) -> Result<()> {
        self.conn
            .execute("DELETE FROM sessions WHERE token = ?1", params![token])?;
        Ok(())
    }
}

fn map_session(row: &Row<'_>) -> rusqlite::Result<Session> {
    Ok(Session {
        id: parse_uuid(&row.get::<_, String>(0)?)?,
        user_id: parse_uuid(&row.get::<_, String>(1)?)?,
        token: row.get(2)?,
        expires_at: parse_datetime(&row.get::<_, String>(3)?)?,
        created_at: parse_datetime(&row.get::<_, String>(4)?)?,
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
    fn test_find_by_token() {
        let db = Database::open_in_memory().unwrap();
        let user_id = create_test_user(&db);

        let session = Session::new(user_id, "tok-1".into());
        db.sessions().create(&session).unwrap();

        let found = db.sessions().find_by_token("tok-1").unwrap().unwrap();
        assert_eq!(found.id, session.id);
        assert_eq!(found.user_id, user_id);
        assert!(db.sessions().find_by_token("tok-2").unwrap().is_none());
    }

    #[test]
    fn test_multiple_sessions_per_user() {
        let db = Database::open_in_memory().unwrap();
        let user_id = create_test_user(&db);

        db.sessions().create(&Session::new(user_id, "a".into())).unwrap();
        db.sessions().create(&Session::new(user_id, "b".into())).unwrap();

        db.sessions().delete_by_token("a").unwrap();
        assert!(db.sessions().find_by_token("a").unwrap().is_none());
        assert!(db.sessions().find_by_token("b").unwrap().is_some());
    }

    #[test]
    fn test_delete_by_id_and_missing_token() {
        let db = Database::open_in_memory().unwrap();
        let user_id = create_test_user(&db);

        let session = Session::new(user_id, "c".into());
        db.sessions().create(&session).unwrap();
        db.sessions().delete(session.id).unwrap();
        assert!(db.sessions().find_by_token("c").unwrap().is_none());

        // Deleting an unknown token is not an error
        db.sessions().delete_by_token("never-issued").unwrap();
    }
}
