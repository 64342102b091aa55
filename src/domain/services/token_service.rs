use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};

use crate::config::Config;
use crate::domain::models::auth::{AccessClaims, RefreshClaims};
use crate::domain::models::user::User;
use crate::error::AppError;

const ACCESS_TTL_MINUTES: i64 = 15;
const REFRESH_TTL_DAYS: i64 = 7;

/// Issues and verifies the two token kinds. Access and refresh tokens are
/// signed with distinct secrets so one can never be replayed as the other.
/// Verification here is signature + expiry only; the refresh flow is the
/// layer that compares token_version against the stored value.
pub struct TokenService {
    access_encoding: EncodingKey,
    access_decoding: DecodingKey,
    refresh_encoding: EncodingKey,
    refresh_decoding: DecodingKey,
    validation: Validation,
}

impl TokenService {
    pub fn new(config: &Config) -> Self {
        Self {
            access_encoding: EncodingKey::from_secret(config.access_token_secret.as_bytes()),
            access_decoding: DecodingKey::from_secret(config.access_token_secret.as_bytes()),
            refresh_encoding: EncodingKey::from_secret(config.refresh_token_secret.as_bytes()),
            refresh_decoding: DecodingKey::from_secret(config.refresh_token_secret.as_bytes()),
            validation: Validation::new(Algorithm::HS256),
        }
    }

    pub fn issue_access(&self, user: &User) -> Result<String, AppError> {
        self.issue_access_with_ttl(user, Duration::minutes(ACCESS_TTL_MINUTES))
    }

    fn issue_access_with_ttl(&self, user: &User, ttl: Duration) -> Result<String, AppError> {
        let now = Utc::now();
        let claims = AccessClaims {
            sub: user.id.clone(),
            role: user.role,
            permissions: user.permissions,
            token_version: user.token_version,
            iat: now.timestamp() as usize,
            exp: (now + ttl).timestamp() as usize,
        };

        encode(&Header::new(Algorithm::HS256), &claims, &self.access_encoding).map_err(|e| {
            tracing::error!("JWT encoding failed: {}", e);
            AppError::Internal
        })
    }

    pub fn issue_refresh(&self, user: &User) -> Result<String, AppError> {
        let now = Utc::now();
        let claims = RefreshClaims {
            sub: user.id.clone(),
            token_version: user.token_version,
            iat: now.timestamp() as usize,
            exp: (now + Duration::days(REFRESH_TTL_DAYS)).timestamp() as usize,
        };

        encode(&Header::new(Algorithm::HS256), &claims, &self.refresh_encoding).map_err(|e| {
            tracing::error!("JWT encoding failed: {}", e);
            AppError::Internal
        })
    }

    pub fn verify_access(&self, token: &str) -> Result<AccessClaims, AppError> {
        decode::<AccessClaims>(token, &self.access_decoding, &self.validation)
            .map(|data| data.claims)
            .map_err(|_| AppError::Unauthorized)
    }

    pub fn verify_refresh(&self, token: &str) -> Result<RefreshClaims, AppError> {
        decode::<RefreshClaims>(token, &self.refresh_decoding, &self.validation)
            .map(|data| data.claims)
            .map_err(|_| AppError::Unauthorized)
    }
}
