//! Argon2id password hashing
//!
//! Hashes are stored as PHC strings (`$argon2id$v=19$m=...`), so the cost a
//! hash was created with travels with it and verification keeps working after
//! the policy is raised.

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Algorithm, Argon2, Params, Version,
};
use serde::Deserialize;

use crate::error::{Error, Result};

/// Weakest memory cost accepted, in KiB
const MIN_MEMORY_KIB: u32 = 8 * 1024;

/// Tunable Argon2id cost
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct PasswordPolicy {
    pub memory_kib: u32,
    pub iterations: u32,
    pub parallelism: u32,
}

impl Default for PasswordPolicy {
    fn default() -> Self {
        Self {
            memory_kib: Params::DEFAULT_M_COST,
            iterations: Params::DEFAULT_T_COST,
            parallelism: Params::DEFAULT_P_COST,
        }
    }
}

impl PasswordPolicy {
    fn hasher(&self) -> Result<Argon2<'static>> {
        if self.memory_kib < MIN_MEMORY_KIB || self.iterations < 1 {
            return Err(Error::validation(format!(
                "argon2 cost below minimum (memory {} KiB, iterations {})",
                self.memory_kib, self.iterations
            )));
        }

        let params = Params::new(self.memory_kib, self.iterations, self.parallelism, None)
            .map_err(|e| Error::validation(format!("invalid argon2 parameters: {e}")))?;
        Ok(Argon2::new(Algorithm::Argon2id, Version::V0x13, params))
    }

    /// Reject parameters that are malformed or weaker than the floor.
    pub fn validate(&self) -> Result<()> {
        self.hasher().map(|_| ())
    }

    /// Hash a password with a fresh random salt.
    pub fn hash(&self, password: &str) -> Result<String> {
        let salt = SaltString::generate(&mut OsRng);
        let hash = self
            .hasher()?
            .hash_password(password.as_bytes(), &salt)
            .map_err(|e| Error::PasswordHash(e.to_string()))?;
        Ok(hash.to_string())
    }
}

/// Check a password against a stored PHC hash.
///
/// The digest comparison inside `argon2` is constant-time. A malformed stored
/// hash is an internal error, not a mismatch.
pub fn verify(password: &str, hash: &str) -> Result<bool> {
    let parsed = PasswordHash::new(hash).map_err(|e| Error::PasswordHash(e.to_string()))?;
    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .is_ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_and_verify() {
        let policy = PasswordPolicy::default();
        let hash = policy.hash("secret1").unwrap();

        assert!(hash.starts_with("$argon2id$"));
        assert!(!hash.contains("secret1"));
        assert!(verify("secret1", &hash).unwrap());
        assert!(!verify("secret2", &hash).unwrap());
    }

    #[test]
    fn test_salts_differ() {
        let policy = PasswordPolicy::default();
        assert_ne!(policy.hash("same").unwrap(), policy.hash("same").unwrap());
    }

    #[test]
    fn test_weak_policy_rejected() {
        let weak = PasswordPolicy {
            memory_kib: 1024,
            ..PasswordPolicy::default()
        };
        assert!(matches!(weak.validate(), Err(Error::Validation(_))));
        assert!(PasswordPolicy::default().validate().is_ok());
    }

    #[test]
    fn test_malformed_hash_is_error() {
        assert!(matches!(verify("pw", "not-a-hash"), Err(Error::PasswordHash(_))));
    }
}
