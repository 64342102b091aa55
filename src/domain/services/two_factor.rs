use rand::{distributions::Alphanumeric, Rng};
use sha2::{Digest, Sha256};
use totp_rs::{Algorithm, Secret, TOTP};

use crate::error::AppError;

const BACKUP_CODE_COUNT: usize = 8;
const BACKUP_CODE_LEN: usize = 10;

pub fn generate_secret() -> String {
    Secret::generate_secret().to_encoded().to_string()
}

/// Builds the TOTP verifier for a stored base32 secret. The otpauth URL it
/// yields is what the client renders as a QR code.
pub fn build_totp(secret: &str, account: &str) -> Result<TOTP, AppError> {
    let bytes = Secret::Encoded(secret.to_string())
        .to_bytes()
        .map_err(|_| AppError::Internal)?;

    TOTP::new(
        Algorithm::SHA1,
        6,
        1,
        30,
        bytes,
        Some("PowerLink".to_string()),
        account.to_string(),
    )
    .map_err(|_| AppError::Internal)
}

pub fn check_code(secret: &str, account: &str, code: &str) -> Result<bool, AppError> {
    let totp = build_totp(secret, account)?;
    totp.check_current(code).map_err(|_| AppError::Internal)
}

/// Returns (plaintext codes for the one-time response, sha256 digests for
/// storage). The plaintext is never persisted.
pub fn generate_backup_codes() -> (Vec<String>, Vec<String>) {
    let codes: Vec<String> = (0..BACKUP_CODE_COUNT)
        .map(|_| {
            rand::thread_rng()
                .sample_iter(&Alphanumeric)
                .take(BACKUP_CODE_LEN)
                .map(char::from)
                .collect()
        })
        .collect();

    let hashes = codes.iter().map(|c| hash_backup_code(c)).collect();
    (codes, hashes)
}

pub fn hash_backup_code(code: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(code.as_bytes());
    hex::encode(hasher.finalize())
}
