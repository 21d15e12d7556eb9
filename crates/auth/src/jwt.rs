//! HS256 bearer-token decoding behind the [`JwtValidator`] trait.
//!
//! The trait keeps the HTTP layer ignorant of key material; tests swap in
//! whatever validator they need.

use chrono::{DateTime, TimeZone, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use canteen_core::CustomerId;

use crate::claims::{JwtClaims, TokenValidationError, validate_claims};
use crate::roles::Role;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AuthError {
    #[error("token could not be decoded")]
    Malformed,

    #[error(transparent)]
    InvalidClaims(#[from] TokenValidationError),
}

/// Numeric-date wire form of [`JwtClaims`].
#[derive(Debug, Serialize, Deserialize)]
struct WireClaims {
    sub: CustomerId,
    #[serde(default)]
    roles: Vec<Role>,
    iat: i64,
    exp: i64,
}

pub trait JwtValidator: Send + Sync {
    /// Decode and verify a bearer token, then validate its claim window
    /// against `now`.
    fn validate(&self, token: &str, now: DateTime<Utc>) -> Result<JwtClaims, AuthError>;
}

pub struct Hs256JwtValidator {
    decoding_key: DecodingKey,
}

impl Hs256JwtValidator {
    pub fn new(secret: Vec<u8>) -> Self {
        Self {
            decoding_key: DecodingKey::from_secret(&secret),
        }
    }
}

impl JwtValidator for Hs256JwtValidator {
    fn validate(&self, token: &str, now: DateTime<Utc>) -> Result<JwtClaims, AuthError> {
        // Time-window checks are done by `validate_claims` against the
        // caller-supplied clock, not by the decoder.
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = false;
        validation.required_spec_claims.clear();

        let decoded = jsonwebtoken::decode::<WireClaims>(token, &self.decoding_key, &validation)
            .map_err(|_| AuthError::Malformed)?;

        let claims = JwtClaims {
            sub: decoded.claims.sub,
            roles: decoded.claims.roles,
            issued_at: timestamp(decoded.claims.iat)?,
            expires_at: timestamp(decoded.claims.exp)?,
        };
        validate_claims(&claims, now)?;
        Ok(claims)
    }
}

fn timestamp(secs: i64) -> Result<DateTime<Utc>, AuthError> {
    Utc.timestamp_opt(secs, 0).single().ok_or(AuthError::Malformed)
}

/// Mint an HS256 token for the given claims. Test and tooling helper; the
/// engine itself never issues tokens.
pub fn encode_token(claims: &JwtClaims, secret: &[u8]) -> Result<String, AuthError> {
    let wire = WireClaims {
        sub: claims.sub,
        roles: claims.roles.clone(),
        iat: claims.issued_at.timestamp(),
        exp: claims.expires_at.timestamp(),
    };
    jsonwebtoken::encode(
        &Header::new(Algorithm::HS256),
        &wire,
        &EncodingKey::from_secret(secret),
    )
    .map_err(|_| AuthError::Malformed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    const SECRET: &[u8] = b"test-secret";

    fn claims_for(now: DateTime<Utc>) -> JwtClaims {
        JwtClaims {
            sub: CustomerId::new(),
            roles: vec![Role::CUSTOMER],
            issued_at: now - Duration::minutes(1),
            expires_at: now + Duration::hours(1),
        }
    }

    #[test]
    fn round_trips_a_valid_token() {
        let now = Utc::now();
        let claims = claims_for(now);
        let token = encode_token(&claims, SECRET).unwrap();

        let validator = Hs256JwtValidator::new(SECRET.to_vec());
        let decoded = validator.validate(&token, now).unwrap();
        assert_eq!(decoded.sub, claims.sub);
        assert_eq!(decoded.roles, claims.roles);
    }

    #[test]
    fn rejects_wrong_secret() {
        let now = Utc::now();
        let token = encode_token(&claims_for(now), SECRET).unwrap();

        let validator = Hs256JwtValidator::new(b"other-secret".to_vec());
        assert_eq!(validator.validate(&token, now), Err(AuthError::Malformed));
    }

    #[test]
    fn rejects_garbage_token() {
        let validator = Hs256JwtValidator::new(SECRET.to_vec());
        assert_eq!(
            validator.validate("not.a.jwt", Utc::now()),
            Err(AuthError::Malformed)
        );
    }

    #[test]
    fn rejects_expired_token_by_caller_clock() {
        let now = Utc::now();
        let token = encode_token(&claims_for(now), SECRET).unwrap();

        let validator = Hs256JwtValidator::new(SECRET.to_vec());
        let later = now + Duration::hours(2);
        assert_eq!(
            validator.validate(&token, later),
            Err(AuthError::InvalidClaims(TokenValidationError::Expired))
        );
    }
}
