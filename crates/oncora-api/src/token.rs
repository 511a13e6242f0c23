// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Stateless token issuance and validation.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use oncora_core::authority::is_role_authority;
use oncora_core::Principal;

use crate::claims::Claims;
use crate::error::{ApiError, ApiResult};

/// Minimum signing-secret length in bytes (HMAC-SHA256 key size).
const MIN_SECRET_LEN: usize = 32;

// =============================================================================
// TokenConfig
// =============================================================================

/// Token service configuration.
///
/// Immutable once the service is constructed; there is no way to swap the
/// secret at runtime. Tests that need deterministic clocks use
/// [`TokenService::issue_at`] / [`TokenService::validate_at`] instead of a
/// mutable configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TokenConfig {
    /// Secret key for signing tokens. Must be at least 32 bytes.
    #[serde(skip_serializing)]
    pub secret: String,
    /// Token lifetime in minutes. Zero or negative yields already-expired
    /// tokens.
    pub ttl_minutes: i64,
    /// Token issuer.
    pub issuer: String,
    /// Signing algorithm.
    #[serde(with = "algorithm_serde")]
    pub algorithm: Algorithm,
}

impl Default for TokenConfig {
    fn default() -> Self {
        Self {
            secret: String::new(), // Must be set by the operator
            ttl_minutes: 30,
            issuer: "oncora".to_string(),
            algorithm: Algorithm::HS256,
        }
    }
}

impl TokenConfig {
    /// Creates a configuration with the given secret.
    pub fn new(secret: impl Into<String>) -> Self {
        Self {
            secret: secret.into(),
            ..Default::default()
        }
    }

    /// Sets the token lifetime in minutes.
    pub fn with_ttl_minutes(mut self, ttl_minutes: i64) -> Self {
        self.ttl_minutes = ttl_minutes;
        self
    }

    /// Sets the issuer.
    pub fn with_issuer(mut self, issuer: impl Into<String>) -> Self {
        self.issuer = issuer.into();
        self
    }

    /// Validates the configuration.
    ///
    /// A missing or short secret is fatal: the service refuses to construct,
    /// and the binary refuses to start.
    pub fn validate(&self) -> ApiResult<()> {
        if self.secret.is_empty() {
            return Err(ApiError::internal("token secret is not configured"));
        }
        if self.secret.len() < MIN_SECRET_LEN {
            return Err(ApiError::internal(format!(
                "token secret must be at least {MIN_SECRET_LEN} bytes, got {}",
                self.secret.len()
            )));
        }
        Ok(())
    }
}

// =============================================================================
// TokenService
// =============================================================================

/// Issues and validates signed bearer tokens.
///
/// Pure computation: no storage access, no shared mutable state. Safe to call
/// from any request context.
#[derive(Clone)]
pub struct TokenService {
    config: Arc<TokenConfig>,
    encoding_key: Arc<EncodingKey>,
    decoding_key: Arc<DecodingKey>,
    validation: Arc<Validation>,
}

impl TokenService {
    /// Creates a token service from the given configuration.
    ///
    /// Fails if the configuration is invalid (see [`TokenConfig::validate`]).
    pub fn new(config: TokenConfig) -> ApiResult<Self> {
        config.validate()?;

        let encoding_key = EncodingKey::from_secret(config.secret.as_bytes());
        let decoding_key = DecodingKey::from_secret(config.secret.as_bytes());

        // Signature and structure only; expiry and subject are checked
        // explicitly so the comparison is strict and leeway-free.
        let mut validation = Validation::new(config.algorithm);
        validation.validate_exp = false;
        validation.validate_aud = false;
        validation.required_spec_claims = Default::default();
        validation.leeway = 0;

        Ok(Self {
            config: Arc::new(config),
            encoding_key: Arc::new(encoding_key),
            decoding_key: Arc::new(decoding_key),
            validation: Arc::new(validation),
        })
    }

    /// Issues a token for a principal.
    ///
    /// The roles claim carries the `ROLE_*` entries of the principal's
    /// authority snapshot; bare permission names stay out of the token.
    pub fn issue(&self, principal: &Principal) -> ApiResult<String> {
        self.issue_at(principal, Utc::now())
    }

    /// Issues a token as of an explicit instant.
    pub fn issue_at(&self, principal: &Principal, now: DateTime<Utc>) -> ApiResult<String> {
        let roles = principal
            .authorities
            .iter()
            .filter(|a| is_role_authority(a))
            .map(str::to_string)
            .collect();

        let claims = Claims::issued_at(
            &principal.identification,
            roles,
            now,
            self.config.ttl_minutes * 60,
        )
        .with_issuer(&self.config.issuer);

        let header = Header::new(self.config.algorithm);
        encode(&header, &claims, &self.encoding_key)
            .map_err(|e| ApiError::internal(format!("failed to sign token: {e}")))
    }

    /// Validates a token against an expected subject. Fails closed.
    ///
    /// Returns `false` on a malformed token, signature mismatch, claim parse
    /// failure, expiry (strict: now at or after `exp`), or subject mismatch.
    /// Never returns an error to the caller.
    pub fn validate(&self, token: &str, expected_subject: &str) -> bool {
        self.validate_at(token, expected_subject, Utc::now())
    }

    /// Validates a token as of an explicit instant.
    pub fn validate_at(&self, token: &str, expected_subject: &str, now: DateTime<Utc>) -> bool {
        match self.decode_claims(token) {
            Ok(claims) => !claims.is_expired_at(now) && claims.sub == expected_subject,
            Err(_) => false,
        }
    }

    /// Extracts the subject from a token without knowing the principal.
    ///
    /// The signature is verified; expiry is not, since expiry belongs to
    /// [`TokenService::validate`]. Returns `None` on any parse or signature
    /// failure.
    pub fn extract_subject(&self, token: &str) -> Option<String> {
        self.decode_claims(token).ok().map(|claims| claims.sub)
    }

    /// Returns the configured token lifetime in seconds.
    pub fn expiration_secs(&self) -> i64 {
        self.config.ttl_minutes * 60
    }

    fn decode_claims(&self, token: &str) -> Result<Claims, jsonwebtoken::errors::Error> {
        decode::<Claims>(token, &self.decoding_key, &self.validation).map(|data| data.claims)
    }
}

impl std::fmt::Debug for TokenService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenService")
            .field("issuer", &self.config.issuer)
            .field("algorithm", &self.config.algorithm)
            .field("ttl_minutes", &self.config.ttl_minutes)
            .finish()
    }
}

// =============================================================================
// Algorithm Serialization
// =============================================================================

mod algorithm_serde {
    use jsonwebtoken::Algorithm;
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    pub fn serialize<S>(algorithm: &Algorithm, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let s = match algorithm {
            Algorithm::HS256 => "HS256",
            Algorithm::HS384 => "HS384",
            Algorithm::HS512 => "HS512",
            other => return Err(serde::ser::Error::custom(format!(
                "unsupported algorithm: {other:?}"
            ))),
        };
        s.serialize(serializer)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Algorithm, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        match s.as_str() {
            "HS256" => Ok(Algorithm::HS256),
            "HS384" => Ok(Algorithm::HS384),
            "HS512" => Ok(Algorithm::HS512),
            _ => Err(serde::de::Error::custom(format!("unknown algorithm: {s}"))),
        }
    }
}

// =============================================================================
// Tests
// =============================================================================
