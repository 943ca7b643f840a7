//! Shared handler state

use std::sync::{Arc, Mutex};

use daybook_core::{AuthService, Database};
use tokio::task::JoinHandle;
use tracing::error;

use crate::error::{Error, Result};

/// Handle passed to every request handler.
///
/// There is no cross-request cache: each call reads from the database.
#[derive(Clone)]
pub struct AppState {
    db: Arc<Mutex<Database>>,
    auth: Arc<AuthService>,
    ping_message: Arc<str>,
}

impl AppState {
    pub fn new(db: Database, auth: AuthService) -> Self {
        Self {
            db: Arc::new(Mutex::new(db)),
            auth: Arc::new(auth),
            ping_message: Arc::from("ping"),
        }
    }

    pub fn with_ping_message(mut self, message: impl Into<String>) -> Self {
        self.ping_message = Arc::from(message.into());
        self
    }

    pub fn ping_message(&self) -> &str {
        &self.ping_message
    }

    /// Run blocking store work off the async runtime, holding the database lock.
    pub async fn run<T, F>(&self, work: F) -> Result<T>
    where
        F: FnOnce(&Database, &AuthService) -> daybook_core::Result<T> + Send + 'static,
        T: Send + 'static,
    {
        let db = self.db.clone();
        let auth = self.auth.clone();

        join(tokio::task::spawn_blocking(move || {
            let db = db
                .lock()
                .map_err(|_| Error::Internal("database lock poisoned".to_string()))?;
            work(&*db, &*auth).map_err(Error::from)
        }))
        .await
    }

    /// Run password hashing or verification off the async runtime.
    ///
    /// The database lock is not taken, so other requests keep going while a
    /// hash is computed.
    pub async fn run_auth<T, F>(&self, work: F) -> Result<T>
    where
        F: FnOnce(&AuthService) -> daybook_core::Result<T> + Send + 'static,
        T: Send + 'static,
    {
        let auth = self.auth.clone();
        join(tokio::task::spawn_blocking(move || work(&*auth).map_err(Error::from))).await
    }
}

async fn join<T>(task: JoinHandle<Result<T>>) -> Result<T> {
    task.await.map_err(|e| {
        error!(error = %e, "Store task failed");
        Error::Internal(e.to_string())
    })?
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    use daybook_core::{PasswordPolicy, Registration};

    fn state() -> AppState {
        AppState::new(
            Database::open_in_memory().unwrap(),
            AuthService::new(PasswordPolicy::default()).unwrap(),
        )
    }

    #[tokio::test]
    async fn test_hashing_runs_while_database_is_locked() {
        let state = state();
        let _guard = state.db.lock().unwrap();

        let registration = Registration {
            email: Some("a@x.com".into()),
            password: Some("secret1".into()),
            name: None,
        };
        let hashed = tokio::time::timeout(
            Duration::from_secs(30),
            state.run_auth(move |auth| auth.prepare_account(registration)),
        )
        .await;
        assert!(matches!(hashed, Ok(Ok(_))));
    }

    #[tokio::test]
    async fn test_default_ping_message() {
        assert_eq!(state().ping_message(), "ping");
        assert_eq!(state().with_ping_message("up").ping_message(), "up");
    }
}
