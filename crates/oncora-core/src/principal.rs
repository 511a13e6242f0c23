// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Principal construction.

use std::sync::Arc;

use crate::authority::AuthoritySet;
use crate::crypto;
use crate::entity::{UserId, UserStatus};
use crate::error::{CoreError, CoreResult};
use crate::rbac::RbacResolver;
use crate::store::UserStore;

// =============================================================================
// Principal
// =============================================================================

/// The resolved identity for one login or one request.
///
/// The authority set is a snapshot taken at build time; a later grant or
/// revocation is only visible on the next build. The password hash is carried
/// for credential checks at login and must not leave this type.
#[derive(Debug, Clone)]
pub struct Principal {
    /// Surrogate id of the backing user record.
    pub user_id: UserId,
    /// The user's unique identification.
    pub identification: String,
    /// PHC password hash, for login-time verification only.
    pub password_hash: String,
    /// Account lifecycle status at build time.
    pub status: UserStatus,
    /// Snapshot of the effective authorities.
    pub authorities: AuthoritySet,
}

impl Principal {
    /// Returns `true` if the snapshot contains the authority.
    pub fn has_authority(&self, authority: &str) -> bool {
        self.authorities.contains(authority)
    }

    /// Returns `true` if the account was active at build time.
    pub fn is_active(&self) -> bool {
        self.status == UserStatus::Active
    }

    /// Verifies a raw password against the stored hash.
    pub fn verify_password(&self, password: &str) -> bool {
        crypto::verify_password(&self.password_hash, password)
    }
}

// =============================================================================
// PrincipalBuilder
// =============================================================================

/// Builds a [`Principal`] from an identification.
///
/// Looks the user up in the credential store and resolves authorities through
/// the [`RbacResolver`] at build time.
#[derive(Clone)]
pub struct PrincipalBuilder {
    users: Arc<dyn UserStore>,
    resolver: RbacResolver,
}

impl PrincipalBuilder {
    /// Creates a builder over the given store and resolver.
    pub fn new(users: Arc<dyn UserStore>, resolver: RbacResolver) -> Self {
        Self { users, resolver }
    }

    /// Builds the principal for an identification.
    ///
    /// Fails with [`CoreError::PrincipalNotFound`] if no user record carries
    /// the identification.
    pub async fn build(&self, identification: &str) -> CoreResult<Principal> {
        let user = self
            .users
            .find_by_identification(identification)
            .await?
            .ok_or_else(|| CoreError::PrincipalNotFound {
                identification: identification.to_string(),
            })?;

        let authorities = self.resolver.resolve_authorities(user.user_id).await?;

        Ok(Principal {
            user_id: user.user_id,
            identification: user.identification,
            password_hash: user.password_hash,
            status: user.status,
            authorities,
        })
    }
}

impl std::fmt::Debug for PrincipalBuilder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PrincipalBuilder").finish_non_exhaustive()
    }
}

// =============================================================================
// Tests
// =============================================================================
