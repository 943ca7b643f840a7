//! Credential storage operations

use rusqlite::{params, Connection, ErrorCode, Row};
use tracing::instrument;
use uuid::Uuid;

use super::parse::{parse_datetime, parse_uuid, OptionalExt};
use crate::error::{Error, Result};
use crate::models::User;

const USER_COLUMNS: &str = "id, email, password_hash, name, created_at, updated_at";

pub struct UserStore<'a> {
    conn: &'a Connection,
}

impl<'a> UserStore<'a> {
    pub fn new(conn: &'a Connection) -> Self {
        Self { conn }
    }

    /// Create a new user. A taken email is [`Error::UserExists`].
    #[instrument(skip(self, user), fields(user_id = %user.id))]
    pub fn create(&self, user: &User) -> Result<()> {
        if self.find_by_email(&user.email)?.is_some() {
            return Err(Error::UserExists);
        }

        let inserted = self.conn.execute(
            "INSERT INTO users (id, email, password_hash, name, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![
                user.id.to_string(),
                user.email,
                user.password_hash,
                user.name,
                user.created_at.to_rfc3339(),
                user.updated_at.to_rfc3339(),
            ],
        );

        match inserted {
            Ok(_) => Ok(()),
            // Lost a race with a concurrent registration for the same email
            Err(rusqlite::Error::SqliteFailure(e, _)) if e.code == ErrorCode::ConstraintViolation => {
                Err(Error::UserExists)
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Find user by ID
    #[instrument(skip(self))]
    pub fn find_by_id(&self, id: Uuid) -> Result<Option<User>> {
        let user = self
            .conn
            .query_row(
                &format!("SELECT {USER_COLUMNS} FROM users WHERE id = ?1"),
                params![id.to_string()],
                map_user,
            )
            .optional()?;

        Ok(user)
    }

    /// Find user by email
    #[instrument(skip(self, email))]
    pub fn find_by_email(&self, email: &str) -> Result<Option<User>> {
        let user = self
            .conn
            .query_row(
                &format!("SELECT {USER_COLUMNS} FROM users WHERE email = ?1"),
                params![email],
                map_user,
            )
            .optional()?;

        Ok(user)
    }
}

fn map_user(row: &Row<'_>) -> rusqlite::Result<User> {
    Ok(User {
        id: parse_uuid(&row.get::<_, String>(0)?)?,
        email: row.get(1)?,
        password_hash: row.get(2)?,
        name: row.get(3)?,
        created_at: parse_datetime(&row.get::<_, String>(4)?)?,
        updated_at: parse_datetime(&row.get::<_, String>(5)?)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::Database;

    #[test]
    fn test_create_and_find() {
        let db = Database::open_in_memory().unwrap();
        let user = User::new("a@x.com".into(), "hash".into(), Some("Ada".into()));
        db.users().create(&user).unwrap();

        let by_email = db.users().find_by_email("a@x.com").unwrap().unwrap();
        assert_eq!(by_email.id, user.id);
        assert_eq!(by_email.name.as_deref(), Some("Ada"));

        let by_id = db.users().find_by_id(user.id).unwrap().unwrap();
        assert_eq!(by_id.email, "a@x.com");
    }

    #[test]
    fn test_missing_user_is_none() {
        let db = Database::open_in_memory().unwrap();
        assert!(db.users().find_by_email("nobody@x.com").unwrap().is_none());
        assert!(db.users().find_by_id(Uuid::new_v4()).unwrap().is_none());
    }

    #[test]
    fn test_duplicate_email_rejected() {
        let db = Database::open_in_memory().unwrap();
        db.users()
            .create(&User::new("a@x.com".into(), "h1".into(), None))
            .unwrap();

        let err = db
            .users()
            .create(&User::new("a@x.com".into(), "h2".into(), Some("Other".into())))
            .unwrap_err();
        assert!(matches!(err, Error::UserExists));
    }
}
