//! Ownership-scoped resource services
//!
//! Each function takes the repository and the authenticated caller's id.
//! A row owned by another user is reported exactly like a missing one.

pub mod goals;
pub mod habits;
pub mod notes;

/// Blank optional text becomes `None`.
pub(crate) fn optional_text(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

#[cfg(test)]
pub(crate) mod test_support {
    use uuid::Uuid;

    use crate::models::User;
    use crate::storage::{Database, UserRepository};

    pub fn create_test_user(db: &Database) -> Uuid {
        let user = User::new(format!("{}@x.com", Uuid::new_v4()), "hash".into(), None);
        db.create_user(&user).unwrap();
        user.id
    }
}
