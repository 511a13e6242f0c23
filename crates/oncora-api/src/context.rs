// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Request-scoped authentication context.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use oncora_core::{AuthoritySet, Principal, UserId};

/// Identity attached to a request after the authentication middleware ran.
///
/// Anonymous requests carry a context too, with no user id and an empty
/// authority set; downstream guards treat the two identically. The principal's
/// password hash never enters this type.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthContext {
    /// Backing user record id; `None` for anonymous requests.
    pub user_id: Option<UserId>,
    /// The authenticated identification, or `"anonymous"`.
    pub identification: String,
    /// Live-resolved authority set.
    #[serde(skip)]
    pub authorities: Arc<AuthoritySet>,
    /// Request id for tracing.
    pub request_id: Uuid,
}

impl AuthContext {
    /// Builds a context from a resolved principal.
    pub fn from_principal(principal: &Principal) -> Self {
        Self {
            user_id: Some(principal.user_id),
            identification: principal.identification.clone(),
            authorities: Arc::new(principal.authorities.clone()),
            request_id: Uuid::now_v7(),
        }
    }

    /// Builds the context for an unauthenticated request.
    pub fn anonymous() -> Self {
        Self {
            user_id: None,
            identification: "anonymous".to_string(),
            authorities: Arc::new(AuthoritySet::new()),
            request_id: Uuid::now_v7(),
        }
    }

    /// Returns `true` if no principal was resolved for this request.
    pub fn is_anonymous(&self) -> bool {
        self.user_id.is_none()
    }

    /// Returns `true` if the context carries the authority.
    pub fn has_authority(&self, authority: &str) -> bool {
        self.authorities.contains(authority)
    }
}

impl Default for AuthContext {
    fn default() -> Self {
        Self::anonymous()
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use oncora_core::UserStatus;

    #[test]
    fn test_from_principal() {
        let principal = Principal {
            user_id: 7,
            identification: "42".to_string(),
            password_hash: "$argon2id$hash".to_string(),
            status: UserStatus::Active,
            authorities: ["ROLE_Admin", "VIEW_USERS"].into_iter().collect(),
        };

        let ctx = AuthContext::from_principal(&principal);
        assert!(!ctx.is_anonymous());
        assert_eq!(ctx.identification, "42");
        assert!(ctx.has_authority("ROLE_Admin"));
        assert!(ctx.has_authority("VIEW_USERS"));
        assert!(!ctx.has_authority("VIEW_ROLES"));
    }

    #[test]
    fn test_anonymous_has_no_authorities() {
        let ctx = AuthContext::anonymous();
        assert!(ctx.is_anonymous());
        assert!(ctx.authorities.is_empty());
        assert!(!ctx.has_authority("ROLE_Admin"));
    }
}
