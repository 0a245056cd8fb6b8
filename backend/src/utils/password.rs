//! Argon2 hashing for account credentials.
//!
//! Raw passwords are policy-checked in `validation::rules` before they get
//! here; this module only turns an accepted password into a stored hash and
//! checks login attempts against it.

use argon2::password_hash::{rand_core::OsRng, SaltString};
use argon2::{Argon2, PasswordHash, PasswordHasher, PasswordVerifier};

/// Hashes a raw password with a fresh per-record salt. The result is a PHC
/// string and goes into `users.hashed_password` as-is.
pub fn hash_password(password: &str) -> anyhow::Result<String> {
    let salt = SaltString::generate(&mut OsRng);
    let hasher = Argon2::default();

    let hashed = hasher
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| anyhow::anyhow!("Failed to hash password: {}", e))?;

    Ok(hashed.to_string())
}

/// Checks a login attempt against a stored hash. A mismatch is `Ok(false)`;
/// an error means the stored hash itself could not be processed.
pub fn verify_password(password: &str, hash: &str) -> anyhow::Result<bool> {
    let parsed_hash =
        PasswordHash::new(hash).map_err(|e| anyhow::anyhow!("Invalid password hash: {}", e))?;

    match Argon2::default().verify_password(password.as_bytes(), &parsed_hash) {
        Ok(()) => Ok(true),
        Err(argon2::password_hash::Error::Password) => Ok(false),
        Err(e) => Err(anyhow::anyhow!("Password verification error: {}", e)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_and_verify_roundtrip() {
        let pw = "S3cr3t!pass";
        let hash = hash_password(pw).expect("hash should succeed");
        assert!(verify_password(pw, &hash).unwrap());
        assert!(!verify_password("wrong", &hash).unwrap());
    }

    #[test]
    fn hashes_are_salted_per_record() {
        let pw = "S3cr3t!pass";
        let first = hash_password(pw).unwrap();
        let second = hash_password(pw).unwrap();
        assert_ne!(first, second);
    }

    #[test]
    fn stored_hash_is_phc_formatted() {
        let hash = hash_password("S3cr3t!pass").unwrap();
        assert!(hash.starts_with("$argon2"));
    }

    #[test]
    fn garbage_stored_hash_is_an_error_not_a_mismatch() {
        assert!(verify_password("S3cr3t!pass", "not-a-phc-string").is_err());
    }
}
