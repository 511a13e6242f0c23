// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! JWT claims structure.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Claims carried by an access token.
///
/// The wire format is the standard compact JWS: three dot-separated
/// base64url segments signed with HMAC-SHA256. The roles claim is a snapshot
/// of the subject's `ROLE_*` authorities at issue time; access decisions
/// re-resolve authorities from storage, so the claim is informational.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject: the user's identification.
    pub sub: String,

    /// Expiration time (Unix timestamp, seconds).
    pub exp: i64,

    /// Issued-at time (Unix timestamp, seconds).
    pub iat: i64,

    /// Role authorities held at issue time.
    #[serde(default)]
    pub roles: Vec<String>,

    /// Issuer.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub iss: Option<String>,
}

impl Claims {
    /// Creates claims issued at `issued_at` and expiring `ttl_secs` later.
    ///
    /// A zero or negative TTL produces claims that are already expired.
    pub fn issued_at(
        sub: impl Into<String>,
        roles: Vec<String>,
        issued_at: DateTime<Utc>,
        ttl_secs: i64,
    ) -> Self {
        let iat = issued_at.timestamp();
        Self {
            sub: sub.into(),
            exp: iat + ttl_secs,
            iat,
            roles,
            iss: None,
        }
    }

    /// Sets the issuer.
    pub fn with_issuer(mut self, issuer: impl Into<String>) -> Self {
        self.iss = Some(issuer.into());
        self
    }

    /// Returns `true` if the claims are expired at `now`.
    ///
    /// Expiry is strict: `now` at or after `exp` means expired.
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        now.timestamp() >= self.exp
    }

    /// Returns the expiration instant, if representable.
    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp(self.exp, 0)
    }
}

// =============================================================================
// Tests
// =============================================================================
