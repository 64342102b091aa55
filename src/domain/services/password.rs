use argon2::{
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use rand::rngs::OsRng;

use crate::error::AppError;

/// Salted one-way hash. A fresh salt is drawn per call, so hashing the same
/// password twice never produces the same string.
pub fn hash_password(raw: &str) -> Result<String, AppError> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default()
        .hash_password(raw.as_bytes(), &salt)
        .map_err(|e| {
            tracing::error!("Password hashing failed: {}", e);
            AppError::Internal
        })?
        .to_string();
    Ok(hash)
}

/// Mismatch is a normal boolean outcome, never an error. An unparseable hash
/// also verifies false rather than failing the request.
pub fn verify_password(raw: &str, hash: &str) -> bool {
    match PasswordHash::new(hash) {
        Ok(parsed) => Argon2::default()
            .verify_password(raw.as_bytes(), &parsed)
            .is_ok(),
        Err(_) => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{distributions::Alphanumeric, Rng};

    #[test]
    fn round_trip_random_passwords() {
        for _ in 0..100 {
            let raw: String = rand::thread_rng()
                .sample_iter(&Alphanumeric)
                .take(12)
                .map(char::from)
                .collect();

            let hash = hash_password(&raw).unwrap();
            assert!(verify_password(&raw, &hash));
            assert!(!verify_password(&format!("{}x", raw), &hash));
        }
    }

    #[test]
    fn same_input_different_hashes() {
        let a = hash_password("Secr3t!").unwrap();
        let b = hash_password("Secr3t!").unwrap();
        assert_ne!(a, b);
        assert!(verify_password("Secr3t!", &a));
        assert!(verify_password("Secr3t!", &b));
    }

    #[test]
    fn garbage_hash_verifies_false() {
        assert!(!verify_password("anything", "not-a-phc-string"));
    }
}
