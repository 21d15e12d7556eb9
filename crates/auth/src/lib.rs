//! `canteen-auth` — authentication boundary for the ordering engine.
//!
//! Claim validation is deterministic and transport-agnostic; HS256 decoding
//! lives behind the [`JwtValidator`] trait so handlers never touch raw JWTs.

pub mod claims;
pub mod jwt;
pub mod roles;

pub use claims::{JwtClaims, TokenValidationError, validate_claims};
pub use jwt::{AuthError, Hs256JwtValidator, JwtValidator};
pub use roles::Role;
