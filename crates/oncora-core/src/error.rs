// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Core error types.
//!
//! Every failed precondition in the assignment and catalog services has its
//! own variant, so a rejected operation always names exactly what failed.

use thiserror::Error;

use crate::entity::{PermissionId, RoleId, UserId};
use crate::store::StoreError;

/// Result type alias for core operations.
pub type CoreResult<T> = Result<T, CoreError>;

/// Errors raised by the identity and RBAC services.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Referenced user does not exist.
    #[error("user {id} does not exist")]
    UserNotFound {
        /// The missing user id.
        id: UserId,
    },

    /// Referenced role does not exist.
    #[error("role {id} does not exist")]
    RoleNotFound {
        /// The missing role id.
        id: RoleId,
    },

    /// Referenced permission does not exist.
    #[error("permission {id} does not exist")]
    PermissionNotFound {
        /// The missing permission id.
        id: PermissionId,
    },

    /// No user record carries the given identification.
    #[error("no user with identification {identification}")]
    PrincipalNotFound {
        /// The unknown identification.
        identification: String,
    },

    /// The role is already assigned to the user.
    #[error("role {role_id} is already assigned to user {user_id}")]
    DuplicateAssignment {
        /// Role side of the pair.
        role_id: RoleId,
        /// User side of the pair.
        user_id: UserId,
    },

    /// No assignment links the role to the user.
    #[error("role {role_id} is not assigned to user {user_id}")]
    AssignmentNotFound {
        /// Role side of the pair.
        role_id: RoleId,
        /// User side of the pair.
        user_id: UserId,
    },

    /// The role already holds the permission.
    #[error("role {role_id} already holds permission {permission_id}")]
    DuplicateGrant {
        /// Permission side of the pair.
        permission_id: PermissionId,
        /// Role side of the pair.
        role_id: RoleId,
    },

    /// No grant links the permission to the role.
    #[error("role {role_id} does not hold permission {permission_id}")]
    GrantNotFound {
        /// Permission side of the pair.
        permission_id: PermissionId,
        /// Role side of the pair.
        role_id: RoleId,
    },

    /// A user with the same identification already exists.
    #[error("a user with identification {identification} already exists")]
    DuplicateUser {
        /// The colliding identification.
        identification: String,
    },

    /// A role with the same name already exists.
    #[error("a role named {name} already exists")]
    DuplicateRole {
        /// The colliding role name.
        name: String,
    },

    /// A permission with the same name already exists.
    #[error("a permission named {name} already exists")]
    DuplicatePermission {
        /// The colliding permission name.
        name: String,
    },

    /// Password hashing failed.
    #[error("password hashing failed: {message}")]
    PasswordHash {
        /// Underlying failure description.
        message: String,
    },

    /// Storage backend failure.
    #[error(transparent)]
    Store(#[from] StoreError),
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages_name_the_precondition() {
        let err = CoreError::PermissionNotFound { id: 99 };
        assert_eq!(err.to_string(), "permission 99 does not exist");

        let err = CoreError::DuplicateAssignment {
            role_id: 1,
            user_id: 42,
        };
        assert_eq!(err.to_string(), "role 1 is already assigned to user 42");

        let err = CoreError::AssignmentNotFound {
            role_id: 1,
            user_id: 42,
        };
        assert_eq!(err.to_string(), "role 1 is not assigned to user 42");
    }
}
