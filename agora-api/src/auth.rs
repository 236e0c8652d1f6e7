//! Authentication Module
//!
//! Bearer-token decoding for `GET /auth/me`. Tokens are HS256 JWTs whose
//! `sub` claim names the user. Nothing else in the API is guarded.

use crate::error::{ApiError, ApiResult};
use agora_core::{AgoraError, ConfigError};
use axum::{
    async_trait,
    extract::{FromRef, FromRequestParts},
    http::{header, request::Parts},
};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::str::FromStr;
use std::sync::Arc;

// ============================================================================
// CLOCK ABSTRACTION
// ============================================================================

/// Source of the current time for token expiry checks.
///
/// Expiry is checked here rather than inside `jsonwebtoken`, so tests can pin
/// the clock.
pub trait JwtClock: Send + Sync {
    /// Current time as Unix epoch seconds.
    fn now_epoch_secs(&self) -> i64;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl JwtClock for SystemClock {
    fn now_epoch_secs(&self) -> i64 {
        chrono::Utc::now().timestamp()
    }
}

/// Always returns the same timestamp.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub i64);

impl JwtClock for FixedClock {
    fn now_epoch_secs(&self) -> i64 {
        self.0
    }
}

// ============================================================================
// JWT SECRET
// ============================================================================

/// Signing secret, redacted from `Debug` output.
#[derive(Clone)]
pub struct JwtSecret(SecretString);

impl JwtSecret {
    /// # Errors
    /// Returns error if the secret is empty.
    pub fn new(secret: String) -> Result<Self, AgoraError> {
        if secret.is_empty() {
            return Err(ConfigError::MissingRequired {
                field: "AGORA_SECRET_KEY".to_string(),
            }
            .into());
        }
        Ok(Self(SecretString::new(secret.into())))
    }

    /// Expose the secret value (use sparingly, only for cryptographic operations).
    pub fn expose(&self) -> &str {
        self.0.expose_secret()
    }
}

impl std::fmt::Debug for JwtSecret {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "JwtSecret([REDACTED, {} chars])", self.0.expose_secret().len())
    }
}

// ============================================================================
// CONFIGURATION
// ============================================================================

/// Token settings.
#[derive(Clone)]
pub struct AuthConfig {
    /// `None` means no token can be valid.
    pub jwt_secret: Option<JwtSecret>,
    pub jwt_algorithm: Algorithm,
    /// Lifetime of issued tokens
    pub access_token_expire_minutes: i64,
    pub clock: Arc<dyn JwtClock>,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            jwt_secret: None,
            jwt_algorithm: Algorithm::HS256,
            access_token_expire_minutes: 30,
            clock: Arc::new(SystemClock),
        }
    }
}

impl std::fmt::Debug for AuthConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthConfig")
            .field("jwt_secret", &self.jwt_secret)
            .field("jwt_algorithm", &self.jwt_algorithm)
            .field("access_token_expire_minutes", &self.access_token_expire_minutes)
            .finish_non_exhaustive()
    }
}

impl AuthConfig {
    /// Environment variables:
    /// - `AGORA_SECRET_KEY`: signing secret (unset: every token is rejected)
    /// - `AGORA_JWT_ALGORITHM`: default `HS256`
    /// - `AGORA_ACCESS_TOKEN_EXPIRE_MINUTES`: default 30
    pub fn from_env() -> Result<Self, AgoraError> {
        let defaults = Self::default();

        let jwt_secret = match std::env::var("AGORA_SECRET_KEY") {
            Ok(secret) if !secret.is_empty() => Some(JwtSecret::new(secret)?),
            _ => None,
        };

        let jwt_algorithm = match std::env::var("AGORA_JWT_ALGORITHM") {
            Ok(value) => Algorithm::from_str(value.trim()).map_err(|_| ConfigError::InvalidValue {
                field: "AGORA_JWT_ALGORITHM".to_string(),
                value,
                reason: "unknown JWT algorithm".to_string(),
            })?,
            Err(_) => defaults.jwt_algorithm,
        };

        let access_token_expire_minutes = std::env::var("AGORA_ACCESS_TOKEN_EXPIRE_MINUTES")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(defaults.access_token_expire_minutes);

        Ok(Self {
            jwt_secret,
            jwt_algorithm,
            access_token_expire_minutes,
            clock: defaults.clock,
        })
    }

    pub fn with_secret(mut self, secret: JwtSecret) -> Self {
        self.jwt_secret = Some(secret);
        self
    }

    pub fn with_clock(mut self, clock: Arc<dyn JwtClock>) -> Self {
        self.clock = clock;
        self
    }
}

// ============================================================================
// JWT CLAIMS
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (username)
    pub sub: String,

    /// Issued at (Unix timestamp)
    pub iat: i64,

    /// Expiration time (Unix timestamp)
    pub exp: i64,
}

impl Claims {
    pub fn new(username: String, expiration_secs: i64, clock: &dyn JwtClock) -> Self {
        let now = clock.now_epoch_secs();
        Self {
            sub: username,
            iat: now,
            exp: now + expiration_secs,
        }
    }

    pub fn is_expired(&self, clock: &dyn JwtClock) -> bool {
        self.exp < clock.now_epoch_secs()
    }
}

/// Validate a token and return its claims.
///
/// Every failure, including a missing secret, is the same 401 so callers
/// cannot tell the cases apart.
pub fn validate_jwt_token(config: &AuthConfig, token: &str) -> ApiResult<Claims> {
    let secret = config.jwt_secret.as_ref().ok_or_else(ApiError::unauthorized)?;
    let decoding_key = DecodingKey::from_secret(secret.expose().as_bytes());

    let mut validation = Validation::new(config.jwt_algorithm);
    validation.validate_exp = false;
    validation.required_spec_claims = HashSet::from(["exp".to_string(), "sub".to_string()]);

    let claims = decode::<Claims>(token, &decoding_key, &validation)
        .map_err(|e| {
            tracing::debug!(error = %e, "token rejected");
            ApiError::unauthorized()
        })?
        .claims;

    if claims.is_expired(&*config.clock) {
        tracing::debug!(sub = %claims.sub, "token expired");
        return Err(ApiError::unauthorized());
    }
    Ok(claims)
}

/// Issue a token for `username` that expires after the configured lifetime.
pub fn generate_jwt_token(config: &AuthConfig, username: impl Into<String>) -> ApiResult<String> {
    let secret = config.jwt_secret.as_ref().ok_or_else(|| {
        tracing::error!("token requested but AGORA_SECRET_KEY is not set");
        ApiError::internal_error()
    })?;
    let claims = Claims::new(
        username.into(),
        config.access_token_expire_minutes * 60,
        &*config.clock,
    );

    let encoding_key = EncodingKey::from_secret(secret.expose().as_bytes());
    encode(&Header::new(config.jwt_algorithm), &claims, &encoding_key).map_err(|e| {
        tracing::error!(error = %e, "failed to encode token");
        ApiError::internal_error()
    })
}

// ============================================================================
// EXTRACTOR
// ============================================================================

/// The user named by a valid `Authorization: Bearer` token.
#[derive(Debug, Clone, PartialEq)]
pub struct CurrentUser {
    pub username: String,
}

#[async_trait]
impl<S> FromRequestParts<S> for CurrentUser
where
    S: Send + Sync,
    AuthConfig: FromRef<S>,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let config = AuthConfig::from_ref(state);
        let token = parts
            .headers
            .get(header::AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.strip_prefix("Bearer "))
            .map(str::trim)
            .filter(|token| !token.is_empty())
            .ok_or_else(ApiError::unauthorized)?;

        let claims = validate_jwt_token(&config, token)?;
        Ok(CurrentUser {
            username: claims.sub,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;

    /// 2024-01-01 00:00:00 UTC
    const NOW: i64 = 1_704_067_200;

    fn config() -> AuthConfig {
        AuthConfig::default()
            .with_secret(JwtSecret::new("test-secret-with-some-length".to_string()).unwrap())
            .with_clock(Arc::new(FixedClock(NOW)))
    }

    #[test]
    fn test_issued_token_round_trips() {
        let config = config();
        let token = generate_jwt_token(&config, "alice").unwrap();
        let claims = validate_jwt_token(&config, &token).unwrap();
        assert_eq!(claims.sub, "alice");
        assert_eq!(claims.exp, NOW + 30 * 60);
    }

    #[test]
    fn test_expired_token_rejected() {
        let issuing = config();
        let token = generate_jwt_token(&issuing, "alice").unwrap();
        let later = config().with_clock(Arc::new(FixedClock(NOW + 31 * 60)));
        let err = validate_jwt_token(&later, &token).unwrap_err();
        assert_eq!(err.code, ErrorCode::Unauthorized);
    }

    #[test]
    fn test_wrong_secret_rejected() {
        let token = generate_jwt_token(&config(), "alice").unwrap();
        let other = AuthConfig::default()
            .with_secret(JwtSecret::new("a-different-secret".to_string()).unwrap())
            .with_clock(Arc::new(FixedClock(NOW)));
        assert!(validate_jwt_token(&other, &token).is_err());
    }

    #[test]
    fn test_missing_secret_rejects_everything() {
        let token = generate_jwt_token(&config(), "alice").unwrap();
        let err = validate_jwt_token(&AuthConfig::default(), &token).unwrap_err();
        assert_eq!(err.message(), Some("Could not validate credentials"));
    }

    #[test]
    fn test_secret_redacted_in_debug() {
        let debug = format!("{:?}", config());
        assert!(!debug.contains("test-secret"));
        assert!(debug.contains("REDACTED"));
    }

    #[test]
    fn test_empty_secret_rejected() {
        assert!(JwtSecret::new(String::new()).is_err());
    }
}
