// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Signed session tokens
//!
//! The client only ever holds an HS256 JWT naming its session id. The
//! session contents stay on the server.

use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use rand::rngs::OsRng;
use rand::RngCore;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use super::SessionError;

/// Length of a generated signing secret in bytes
const GENERATED_SECRET_LEN: usize = 32;

/// JWT claims carried by the session cookie
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionClaims {
    pub sid: String,
    pub iat: u64,
    pub exp: u64,
}

#[derive(Clone)]
pub struct SessionTokens {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    // Signature checked, expiry not
    expired_ok_validation: Validation,
    ttl: Duration,
}

impl SessionTokens {
    pub fn new(secret: &[u8], ttl: Duration) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;
        validation.set_required_spec_claims(&["exp", "iat"]);

        let mut expired_ok_validation = validation.clone();
        expired_ok_validation.validate_exp = false;

        Self {
            encoding_key: EncodingKey::from_secret(secret),
            decoding_key: DecodingKey::from_secret(secret),
            validation,
            expired_ok_validation,
            ttl,
        }
    }

    /// Sign with a fresh random secret; tokens do not survive a restart
    pub fn with_random_secret(ttl: Duration) -> Self {
        let mut secret = [0u8; GENERATED_SECRET_LEN];
        OsRng.fill_bytes(&mut secret);
        Self::new(&secret, ttl)
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Issue a token for `session_id`, valid for the configured TTL
    pub fn issue(&self, session_id: &str) -> Result<String, SessionError> {
        let iat = chrono::Utc::now().timestamp().max(0) as u64;
        let claims = SessionClaims {
            sid: session_id.to_string(),
            iat,
            exp: iat + self.ttl.as_secs(),
        };

        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|e| SessionError::TokenIssue(e.to_string()))
    }

    /// Verify signature and expiry, returning the session id
    pub fn verify(&self, token: &str) -> Result<String, SessionError> {
        decode::<SessionClaims>(token, &self.decoding_key, &self.validation)
            .map(|data| data.claims.sid)
            .map_err(|e| match e.kind() {
                jsonwebtoken::errors::ErrorKind::ExpiredSignature => SessionError::TokenExpired,
                _ => SessionError::InvalidToken,
            })
    }

    /// Verify the signature only, returning the session id even when the
    /// token has expired. Used to tear down a session the client still
    /// names.
    pub fn verify_allow_expired(&self, token: &str) -> Result<String, SessionError> {
        decode::<SessionClaims>(token, &self.decoding_key, &self.expired_ok_validation)
            .map(|data| data.claims.sid)
            .map_err(|_| SessionError::InvalidToken)
    }
}
