//! Registration, login and bearer-session validation
//!
//! The service holds no connection of its own. Every call receives the
//! repository it should work against, so the caller decides locking and
//! transaction scope.
//!
//! Register and login are also exposed as separate phases. Password hashing
//! and verification ([`AuthService::prepare_account`],
//! [`AuthService::verify_credentials`]) never touch a repository, so a caller
//! can run them without holding its store lock.

mod password;
mod token;

use chrono::Utc;
use tracing::{debug, info, instrument};
use uuid::Uuid;

use crate::error::{Error, Result};
use crate::models::{AuthGrant, Login, PublicUser, Registration, Session, User};
use crate::storage::{SessionRepository, UserRepository};

pub use password::PasswordPolicy;
pub use token::generate_token;

/// Registration that passed validation, with its password already hashed
#[derive(Debug, Clone)]
pub struct NewAccount {
    email: String,
    password_hash: String,
    name: Option<String>,
}

/// Normalized login input
#[derive(Debug, Clone)]
pub struct Credentials {
    email: String,
    password: String,
}

impl Credentials {
    pub fn from_login(login: Login) -> Result<Self> {
        match (
            normalize_email(login.email.as_deref()),
            login.password.filter(|p| !p.is_empty()),
        ) {
            (Some(email), Some(password)) => Ok(Self { email, password }),
            _ => Err(Error::validation("Email and password are required")),
        }
    }
}

pub struct AuthService {
    policy: PasswordPolicy,
    /// Hash checked when the email is unknown, so both login failures cost the same
    dummy_hash: String,
}

impl AuthService {
    pub fn new(policy: PasswordPolicy) -> Result<Self> {
        policy.validate()?;
        let dummy_hash = policy.hash(&generate_token())?;
        Ok(Self { policy, dummy_hash })
    }

    /// Create an account and log it in.
    pub fn register<R>(&self, repo: &R, registration: Registration) -> Result<AuthGrant>
    where
        R: UserRepository + SessionRepository,
    {
        let account = self.prepare_account(registration)?;
        self.create_account(repo, account)
    }

    /// Validate a registration and hash its password.
    #[instrument(skip_all)]
    pub fn prepare_account(&self, registration: Registration) -> Result<NewAccount> {
        let email = normalize_email(registration.email.as_deref())
            .ok_or_else(|| Error::validation("Email and password are required"))?;
        let password = registration
            .password
            .filter(|p| !p.is_empty())
            .ok_or_else(|| Error::validation("Email and password are required"))?;
        let name = registration
            .name
            .map(|n| n.trim().to_string())
            .filter(|n| !n.is_empty());

        Ok(NewAccount {
            email,
            password_hash: self.policy.hash(&password)?,
            name,
        })
    }

    /// Store a prepared account and open its first session.
    #[instrument(skip_all)]
    pub fn create_account<R>(&self, repo: &R, account: NewAccount) -> Result<AuthGrant>
    where
        R: UserRepository + SessionRepository,
    {
        if repo.find_user_by_email(&account.email)?.is_some() {
            return Err(Error::UserExists);
        }

        let user = User::new(account.email, account.password_hash, account.name);
        repo.create_user(&user)?;
        info!(user_id = %user.id, "User registered");

        self.open_session(repo, &user)
    }

    /// Exchange credentials for a new session.
    ///
    /// Unknown email and wrong password are the same [`Error::InvalidCredentials`].
    pub fn login<R>(&self, repo: &R, login: Login) -> Result<AuthGrant>
    where
        R: UserRepository + SessionRepository,
    {
        let credentials = Credentials::from_login(login)?;
        let account = self.find_account(repo, &credentials)?;
        let user = self.verify_credentials(account, &credentials)?;
        self.open_session(repo, &user)
    }

    /// The account a login names, if any
    pub fn find_account<R: UserRepository>(
        &self,
        repo: &R,
        credentials: &Credentials,
    ) -> Result<Option<User>> {
        repo.find_user_by_email(&credentials.email)
    }

    /// Check a password against the account found for it.
    #[instrument(skip_all)]
    pub fn verify_credentials(&self, account: Option<User>, credentials: &Credentials) -> Result<User> {
        let Some(user) = account else {
            password::verify(&credentials.password, &self.dummy_hash)?;
            debug!("Login for unknown email");
            return Err(Error::InvalidCredentials);
        };

        if !password::verify(&credentials.password, &user.password_hash)? {
            debug!(user_id = %user.id, "Login with wrong password");
            return Err(Error::InvalidCredentials);
        }

        info!(user_id = %user.id, "User logged in");
        Ok(user)
    }

    /// Issue a fresh session for an authenticated user
    pub fn open_session<R: SessionRepository>(&self, repo: &R, user: &User) -> Result<AuthGrant> {
        let session = Session::new(user.id, generate_token());
        repo.create_session(&session)?;

        Ok(AuthGrant {
            user: user.public(),
            token: session.token,
            expires_at: session.expires_at,
        })
    }

    /// Drop the session for `token`. Unknown or empty tokens are fine.
    #[instrument(skip_all)]
    pub fn logout<R: SessionRepository>(&self, repo: &R, token: &str) -> Result<()> {
        if !token.is_empty() {
            repo.delete_session_by_token(token)?;
        }
        Ok(())
    }

    /// Resolve a bearer token to its user id.
    ///
    /// An expired session is deleted when it is detected here.
    #[instrument(skip_all)]
    pub fn validate_token<R: SessionRepository>(&self, repo: &R, token: &str) -> Result<Uuid> {
        if token.is_empty() {
            return Err(Error::Unauthenticated);
        }

        let session = repo
            .find_session_by_token(token)?
            .ok_or(Error::Unauthenticated)?;

        if session.is_expired_at(Utc::now()) {
            repo.delete_session(session.id)?;
            info!(session_id = %session.id, user_id = %session.user_id, "Expired session removed");
            return Err(Error::Unauthenticated);
        }

        Ok(session.user_id)
    }

    /// The user behind a bearer token
    pub fn current_user<R>(&self, repo: &R, token: &str) -> Result<PublicUser>
    where
        R: UserRepository + SessionRepository,
    {
        let user_id = self.validate_token(repo, token)?;
        repo.find_user_by_id(user_id)?
            .map(|user| user.public())
            .ok_or(Error::Unauthenticated)
    }
}

fn normalize_email(email: Option<&str>) -> Option<String> {
    email
        .map(|e| e.trim().to_lowercase())
        .filter(|e| !e.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::Database;
    use chrono::Duration;

    fn service() -> AuthService {
        AuthService::new(PasswordPolicy::default()).unwrap()
    }

    fn registration(email: &str, password: &str) -> Registration {
        Registration {
            email: Some(email.to_string()),
            password: Some(password.to_string()),
            name: None,
        }
    }

    fn login(email: &str, password: &str) -> Login {
        Login {
            email: Some(email.to_string()),
            password: Some(password.to_string()),
        }
    }

    #[test]
    fn test_register_issues_thirty_day_session() {
        let db = Database::open_in_memory().unwrap();
        let auth = service();

        let before = Utc::now();
        let grant = auth.register(&db, registration("a@x.com", "secret1")).unwrap();
        let after = Utc::now();

        assert_eq!(grant.user.email, "a@x.com");
        assert!(grant.expires_at >= before + Duration::days(30));
        assert!(grant.expires_at <= after + Duration::days(30));
        assert_eq!(auth.validate_token(&db, &grant.token).unwrap(), grant.user.id);
    }

    #[test]
    fn test_register_requires_email_and_password() {
        let db = Database::open_in_memory().unwrap();
        let auth = service();

        let missing_password = Registration {
            email: Some("a@x.com".into()),
            ..Default::default()
        };
        assert!(matches!(
            auth.register(&db, missing_password),
            Err(Error::Validation(_))
        ));
        assert!(matches!(
            auth.register(&db, registration("   ", "pw")),
            Err(Error::Validation(_))
        ));
    }

    #[test]
    fn test_register_existing_email_fails() {
        let db = Database::open_in_memory().unwrap();
        let auth = service();
        auth.register(&db, registration("a@x.com", "secret1")).unwrap();

        let mut again = registration("A@X.com ", "other-password");
        again.name = Some("Someone".into());
        assert!(matches!(auth.register(&db, again), Err(Error::UserExists)));
    }

    #[test]
    fn test_login_failures_are_indistinguishable() {
        let db = Database::open_in_memory().unwrap();
        let auth = service();
        auth.register(&db, registration("a@x.com", "secret1")).unwrap();

        let wrong_password = auth.login(&db, login("a@x.com", "nope")).unwrap_err();
        let unknown_email = auth.login(&db, login("b@x.com", "secret1")).unwrap_err();

        assert!(matches!(wrong_password, Error::InvalidCredentials));
        assert!(matches!(unknown_email, Error::InvalidCredentials));
        assert_eq!(wrong_password.to_string(), unknown_email.to_string());
    }

    #[test]
    fn test_login_creates_additional_session() {
        let db = Database::open_in_memory().unwrap();
        let auth = service();
        let first = auth.register(&db, registration("a@x.com", "secret1")).unwrap();
        let second = auth.login(&db, login("a@x.com", "secret1")).unwrap();

        assert_ne!(first.token, second.token);
        assert!(auth.validate_token(&db, &first.token).is_ok());
        assert!(auth.validate_token(&db, &second.token).is_ok());
    }

    #[test]
    fn test_expired_session_is_removed() {
        let db = Database::open_in_memory().unwrap();
        let auth = service();
        let grant = auth.register(&db, registration("a@x.com", "secret1")).unwrap();

        let mut stale = Session::new(grant.user.id, "stale-token".into());
        stale.expires_at = Utc::now() - Duration::seconds(1);
        db.create_session(&stale).unwrap();

        assert!(matches!(
            auth.validate_token(&db, "stale-token"),
            Err(Error::Unauthenticated)
        ));
        assert!(db.find_session_by_token("stale-token").unwrap().is_none());
        assert!(matches!(
            auth.validate_token(&db, "stale-token"),
            Err(Error::Unauthenticated)
        ));
    }

    #[test]
    fn test_logout_is_idempotent() {
        let db = Database::open_in_memory().unwrap();
        let auth = service();
        let grant = auth.register(&db, registration("a@x.com", "secret1")).unwrap();

        auth.logout(&db, &grant.token).unwrap();
        auth.logout(&db, &grant.token).unwrap();
        auth.logout(&db, "").unwrap();

        assert!(matches!(
            auth.current_user(&db, &grant.token),
            Err(Error::Unauthenticated)
        ));
    }

    #[test]
    fn test_current_user() {
        let db = Database::open_in_memory().unwrap();
        let auth = service();
        let mut reg = registration("a@x.com", "secret1");
        reg.name = Some("Ada".into());
        let grant = auth.register(&db, reg).unwrap();

        let user = auth.current_user(&db, &grant.token).unwrap();
        assert_eq!(user, grant.user);
        assert_eq!(user.name.as_deref(), Some("Ada"));
        assert!(matches!(auth.current_user(&db, ""), Err(Error::Unauthenticated)));
    }

    #[test]
    fn test_dummy_hash_built_with_service() {
        let auth = service();
        assert!(auth.dummy_hash.starts_with("$argon2id$"));
    }

    #[test]
    fn test_phased_login_verifies_outside_repository() {
        let db = Database::open_in_memory().unwrap();
        let auth = service();

        let account = auth.prepare_account(registration("A@x.com", "secret1")).unwrap();
        assert_eq!(db.find_user_by_email("a@x.com").unwrap().map(|u| u.id), None);
        let grant = auth.create_account(&db, account).unwrap();

        let credentials = Credentials::from_login(login("a@x.com", "secret1")).unwrap();
        let found = auth.find_account(&db, &credentials).unwrap();
        let user = auth.verify_credentials(found, &credentials).unwrap();
        assert_eq!(user.id, grant.user.id);

        assert!(matches!(
            auth.verify_credentials(None, &credentials),
            Err(Error::InvalidCredentials)
        ));
        assert!(matches!(
            Credentials::from_login(login("a@x.com", "")),
            Err(Error::Validation(_))
        ));
    }
}
