//! Password hashing utilities
//!
//! bcrypt embeds a random salt and its cost factor in the digest, so two
//! hashes of the same password differ while both verify. Verification of a
//! malformed digest is an `Err`; callers on the login path collapse it to
//! `false` rather than surfacing a distinguishable failure.

use bcrypt::{hash, verify, BcryptError, DEFAULT_COST};

/// Hash a password using bcrypt with the default cost
pub fn hash_password(password: &str) -> Result<String, BcryptError> {
    hash(password, DEFAULT_COST)
}

/// Hash a password with an explicit cost factor
pub fn hash_password_with_cost(password: &str, cost: u32) -> Result<String, BcryptError> {
    hash(password, cost)
}

/// Verify a password against a hash
pub fn verify_password(password: &str, hash: &str) -> Result<bool, BcryptError> {
    verify(password, hash)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_and_verify() {
        let password = "secure_password_123";
        let hashed = hash_password(password).unwrap();

        assert!(verify_password(password, &hashed).unwrap());
        assert!(!verify_password("wrong_password", &hashed).unwrap());
    }

    #[test]
    fn same_password_hashes_differently() {
        // random salt per call
        let a = hash_password("hunter2").unwrap();
        let b = hash_password("hunter2").unwrap();
        assert_ne!(a, b);
        assert!(verify_password("hunter2", &a).unwrap());
        assert!(verify_password("hunter2", &b).unwrap());
    }

    #[test]
    fn single_character_mutation_fails() {
        let hashed = hash_password("hunter2").unwrap();
        assert!(!verify_password("hunter3", &hashed).unwrap());
        assert!(!verify_password("Hunter2", &hashed).unwrap());
    }

    #[test]
    fn malformed_digest_is_err_not_panic() {
        let result = verify_password("anything", "not-a-bcrypt-digest");
        assert!(!result.unwrap_or(false));
    }

    #[test]
    fn explicit_cost_verifies() {
        // minimum cost bcrypt accepts, keeps the test fast
        let hashed = hash_password_with_cost("pw", 4).unwrap();
        assert!(verify_password("pw", &hashed).unwrap());
    }
}
