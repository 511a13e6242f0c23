// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Store contracts the identity core depends on.
//!
//! Persistence is an external collaborator; these traits are the whole
//! contract. Each trait covers one aggregate. Implementations must make every
//! call atomic with respect to concurrent callers; in particular the join
//! stores' `insert` is a check-and-insert that fails with
//! [`StoreError::Duplicate`] if the pair already exists. That is the backstop
//! for the uniqueness invariant when two racing service calls both pass their
//! existence checks.

use async_trait::async_trait;
use thiserror::Error;

use crate::entity::{
    AssignedRole, LinkId, Permission, PermissionId, Role, RoleId, RolePermission, User, UserId,
};

/// Errors surfaced by store implementations.
#[derive(Debug, Error)]
pub enum StoreError {
    /// A uniqueness constraint rejected the write.
    #[error("duplicate record: {0}")]
    Duplicate(String),

    /// The targeted record does not exist.
    #[error("record not found: {0}")]
    NotFound(String),

    /// The backend failed.
    #[error("storage failure: {0}")]
    Backend(String),
}

// =============================================================================
// UserStore
// =============================================================================

/// Store for [`User`] records. The credential store of the system.
#[async_trait]
pub trait UserStore: Send + Sync {
    /// Looks up a user by surrogate id.
    async fn find_by_id(&self, id: UserId) -> Result<Option<User>, StoreError>;

    /// Looks up a user by its unique identification.
    async fn find_by_identification(
        &self,
        identification: &str,
    ) -> Result<Option<User>, StoreError>;

    /// Returns `true` if a user with the given id exists.
    async fn exists(&self, id: UserId) -> Result<bool, StoreError>;

    /// Inserts a user record.
    ///
    /// The `user_id` field is ignored; the store assigns it and returns the
    /// stored record. Fails with [`StoreError::Duplicate`] on an
    /// identification collision.
    async fn insert(&self, user: User) -> Result<User, StoreError>;

    /// Deletes a user by id. Fails with [`StoreError::NotFound`] if absent.
    async fn delete(&self, id: UserId) -> Result<(), StoreError>;

    /// Lists all users.
    async fn list(&self) -> Result<Vec<User>, StoreError>;
}

// =============================================================================
// RoleStore / PermissionStore
// =============================================================================

/// Store for [`Role`] records.
#[async_trait]
pub trait RoleStore: Send + Sync {
    /// Looks up a role by id.
    async fn find_by_id(&self, id: RoleId) -> Result<Option<Role>, StoreError>;

    /// Looks up a role by its unique name.
    async fn find_by_name(&self, name: &str) -> Result<Option<Role>, StoreError>;

    /// Returns `true` if a role with the given id exists.
    async fn exists(&self, id: RoleId) -> Result<bool, StoreError>;

    /// Inserts a role; the store assigns the id. Duplicate on name collision.
    async fn insert(&self, role: Role) -> Result<Role, StoreError>;

    /// Deletes a role by id.
    async fn delete(&self, id: RoleId) -> Result<(), StoreError>;

    /// Lists all roles.
    async fn list(&self) -> Result<Vec<Role>, StoreError>;
}

/// Store for [`Permission`] records.
#[async_trait]
pub trait PermissionStore: Send + Sync {
    /// Looks up a permission by id.
    async fn find_by_id(&self, id: PermissionId) -> Result<Option<Permission>, StoreError>;

    /// Looks up a permission by its unique name.
    async fn find_by_name(&self, name: &str) -> Result<Option<Permission>, StoreError>;

    /// Returns `true` if a permission with the given id exists.
    async fn exists(&self, id: PermissionId) -> Result<bool, StoreError>;

    /// Inserts a permission; the store assigns the id. Duplicate on name
    /// collision.
    async fn insert(&self, permission: Permission) -> Result<Permission, StoreError>;

    /// Deletes a permission by id.
    async fn delete(&self, id: PermissionId) -> Result<(), StoreError>;

    /// Lists all permissions.
    async fn list(&self) -> Result<Vec<Permission>, StoreError>;
}

// =============================================================================
// AssignedRoleStore
// =============================================================================

/// Store for the user-role join table.
#[async_trait]
pub trait AssignedRoleStore: Send + Sync {
    /// Finds the link for a `(role, user)` pair.
    async fn find(&self, role_id: RoleId, user_id: UserId)
        -> Result<Option<AssignedRole>, StoreError>;

    /// Returns `true` if the `(role, user)` pair is linked.
    async fn exists(&self, role_id: RoleId, user_id: UserId) -> Result<bool, StoreError>;

    /// Atomically inserts a link for the pair.
    ///
    /// Fails with [`StoreError::Duplicate`] if the pair is already linked;
    /// the check and the insert happen under one lock.
    async fn insert(&self, role_id: RoleId, user_id: UserId) -> Result<AssignedRole, StoreError>;

    /// Rewrites an existing link in place (same id, new sides).
    ///
    /// Fails with [`StoreError::NotFound`] if the id is unknown and with
    /// [`StoreError::Duplicate`] if another link already covers the new pair.
    async fn update(&self, link: AssignedRole) -> Result<(), StoreError>;

    /// Deletes a link by id.
    async fn delete(&self, id: LinkId) -> Result<(), StoreError>;

    /// Returns the role ids assigned to a user.
    async fn roles_for_user(&self, user_id: UserId) -> Result<Vec<RoleId>, StoreError>;

    /// Lists all links.
    async fn list(&self) -> Result<Vec<AssignedRole>, StoreError>;

    /// Removes every link owned by the user; returns the number removed.
    async fn remove_all_for_user(&self, user_id: UserId) -> Result<usize, StoreError>;

    /// Removes every link referencing the role; returns the number removed.
    async fn remove_all_for_role(&self, role_id: RoleId) -> Result<usize, StoreError>;
}

// =============================================================================
// RolePermissionStore
// =============================================================================

/// Store for the role-permission join table.
#[async_trait]
pub trait RolePermissionStore: Send + Sync {
    /// Finds the link for a `(role, permission)` pair.
    async fn find(
        &self,
        role_id: RoleId,
        permission_id: PermissionId,
    ) -> Result<Option<RolePermission>, StoreError>;

    /// Returns `true` if the `(role, permission)` pair is linked.
    async fn exists(&self, role_id: RoleId, permission_id: PermissionId)
        -> Result<bool, StoreError>;

    /// Atomically inserts a link for the pair; Duplicate if already linked.
    async fn insert(
        &self,
        role_id: RoleId,
        permission_id: PermissionId,
    ) -> Result<RolePermission, StoreError>;

    /// Rewrites an existing link in place (same id, new sides).
    async fn update(&self, link: RolePermission) -> Result<(), StoreError>;

    /// Deletes a link by id.
    async fn delete(&self, id: LinkId) -> Result<(), StoreError>;

    /// Returns the permission ids granted to a role.
    async fn permissions_for_role(&self, role_id: RoleId) -> Result<Vec<PermissionId>, StoreError>;

    /// Lists all links.
    async fn list(&self) -> Result<Vec<RolePermission>, StoreError>;

    /// Removes every link referencing the role; returns the number removed.
    async fn remove_all_for_role(&self, role_id: RoleId) -> Result<usize, StoreError>;

    /// Removes every link referencing the permission; returns the number
    /// removed.
    async fn remove_all_for_permission(
        &self,
        permission_id: PermissionId,
    ) -> Result<usize, StoreError>;
}
