// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Domain records for the identity and RBAC graph.

use serde::{Deserialize, Serialize};

/// Identifier for a [`User`] record.
pub type UserId = i64;
/// Identifier for a [`Role`] record.
pub type RoleId = i64;
/// Identifier for a [`Permission`] record.
pub type PermissionId = i64;
/// Identifier for a join record ([`AssignedRole`], [`RolePermission`]).
pub type LinkId = i64;

// =============================================================================
// User
// =============================================================================

/// Lifecycle status of a user account.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserStatus {
    /// Account can authenticate.
    Active,
    /// Account is retained but cannot authenticate.
    Inactive,
}

impl Default for UserStatus {
    fn default() -> Self {
        UserStatus::Active
    }
}

/// A clinic staff account.
///
/// `identification` is the external natural key (national ID) and is unique
/// across the store. The password hash is a PHC string and never serialized.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    /// Surrogate identifier assigned by the store.
    pub user_id: UserId,
    /// Display name.
    pub full_name: String,
    /// Unique external identifier (national ID).
    pub identification: String,
    /// PHC-format password hash. Excluded from serialized output.
    #[serde(skip_serializing, default)]
    pub password_hash: String,
    /// Account lifecycle status.
    #[serde(default)]
    pub status: UserStatus,
    /// Contact email.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    /// Contact phone number.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
}

impl User {
    /// Returns `true` if the account can authenticate.
    pub fn is_active(&self) -> bool {
        self.status == UserStatus::Active
    }
}

// =============================================================================
// Role / Permission
// =============================================================================

/// A named role. Role names are unique.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Role {
    /// Surrogate identifier assigned by the store.
    pub role_id: RoleId,
    /// Unique role label, e.g. `Admin`.
    pub role_name: String,
}

/// A named capability. Permission names are unique.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Permission {
    /// Surrogate identifier assigned by the store.
    pub permission_id: PermissionId,
    /// Unique capability label, e.g. `VIEW_USERS`.
    pub permission_name: String,
}

// =============================================================================
// Join records
// =============================================================================

/// Link between a user and a role.
///
/// At most one record exists per `(user, role)` pair; deleting either side
/// removes the link (enforced by [`crate::catalog::CatalogService`]).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssignedRole {
    /// Surrogate identifier assigned by the store.
    pub id: LinkId,
    /// Owning user.
    pub user_id: UserId,
    /// Assigned role.
    pub role_id: RoleId,
}

/// Link between a role and a permission.
///
/// At most one record exists per `(role, permission)` pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RolePermission {
    /// Surrogate identifier assigned by the store.
    pub id: LinkId,
    /// Owning role.
    pub role_id: RoleId,
    /// Granted permission.
    pub permission_id: PermissionId,
}

// =============================================================================
// Tests
// =============================================================================
