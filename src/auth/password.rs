//! Argon2id password hashes stored as PHC strings
//! (`$argon2id$v=19$m=19456,t=2,p=1$<salt>$<hash>`).

use argon2::{
    Argon2, PasswordHash, PasswordHasher, PasswordVerifier as _,
    password_hash::{self, SaltString},
};
use rand::Rng;

const SALT_LEN: usize = 16;

/// Checks a plaintext password against a stored hash.
pub trait PasswordVerifier: Send + Sync {
    /// `true` when `plaintext` matches `hash`; malformed hashes never match.
    fn verify(&self, hash: &str, plaintext: &str) -> bool;
}

/// Verifier for PHC-formatted Argon2 hashes such as those produced by [`hash_password`].
///
/// Cost parameters are read from the hash itself.
#[derive(Debug, Clone, Copy, Default)]
pub struct Argon2Verifier;

impl PasswordVerifier for Argon2Verifier {
    fn verify(&self, hash: &str, plaintext: &str) -> bool {
        let Ok(parsed) = PasswordHash::new(hash) else {
            return false;
        };
        Argon2::default()
            .verify_password(plaintext.as_bytes(), &parsed)
            .is_ok()
    }
}

/// Hash `plaintext` with Argon2id default parameters and a fresh random salt.
pub fn hash_password(plaintext: &str) -> Result<String, password_hash::Error> {
    let mut salt = [0u8; SALT_LEN];
    rand::rng().fill(&mut salt);
    let salt = SaltString::encode_b64(&salt)?;

    let hash = Argon2::default().hash_password(plaintext.as_bytes(), &salt)?;
    Ok(hash.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_verify_accepts_matching_password() {
        let hash = hash_password("hunter22").unwrap();
        assert!(hash.starts_with("$argon2id$v=19$"));
        assert!(Argon2Verifier.verify(&hash, "hunter22"));
    }

    #[test]
    fn test_verify_rejects_wrong_password() {
        let hash = hash_password("hunter22").unwrap();
        assert!(!Argon2Verifier.verify(&hash, "hunter23"));
        assert!(!Argon2Verifier.verify(&hash, ""));
    }

    #[test]
    fn test_fresh_salts_differ() {
        assert_ne!(hash_password("same").unwrap(), hash_password("same").unwrap());
    }

    #[test]
    fn test_verify_rejects_malformed_hashes() {
        assert!(!Argon2Verifier.verify("", "pw"));
        assert!(!Argon2Verifier.verify("not-a-phc-string", "pw"));
        assert!(!Argon2Verifier.verify("$argon2id$v=19$m=19456,t=2,p=1$c2FsdA", "pw"));
        // Salted SHA-256 digests from older configs are not accepted.
        assert!(!Argon2Verifier.verify("6c6561:3b2dd745", "changeme"));
    }
}
