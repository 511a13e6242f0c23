// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Catalog CRUD for the long-lived aggregates.
//!
//! Deleting a user, role, or permission also deletes the join records that
//! reference it. The cascade is performed here, find-and-delete-dependents,
//! so the ownership rule holds in any storage backend.

use std::sync::Arc;

use crate::crypto;
use crate::entity::{Permission, PermissionId, Role, RoleId, User, UserId, UserStatus};
use crate::error::{CoreError, CoreResult};
use crate::store::{
    AssignedRoleStore, PermissionStore, RolePermissionStore, RoleStore, StoreError, UserStore,
};

// =============================================================================
// NewUser
// =============================================================================

/// Request shape for creating a user.
#[derive(Debug, Clone)]
pub struct NewUser {
    /// Display name.
    pub full_name: String,
    /// Unique external identifier.
    pub identification: String,
    /// Raw password; hashed before storage.
    pub password: String,
    /// Contact email.
    pub email: Option<String>,
    /// Contact phone number.
    pub phone: Option<String>,
}

// =============================================================================
// CatalogService
// =============================================================================

/// CRUD over users, roles, and permissions, with explicit cascades.
#[derive(Clone)]
pub struct CatalogService {
    users: Arc<dyn UserStore>,
    roles: Arc<dyn RoleStore>,
    permissions: Arc<dyn PermissionStore>,
    assignments: Arc<dyn AssignedRoleStore>,
    grants: Arc<dyn RolePermissionStore>,
}

impl CatalogService {
    /// Creates the service over the given stores.
    pub fn new(
        users: Arc<dyn UserStore>,
        roles: Arc<dyn RoleStore>,
        permissions: Arc<dyn PermissionStore>,
        assignments: Arc<dyn AssignedRoleStore>,
        grants: Arc<dyn RolePermissionStore>,
    ) -> Self {
        Self {
            users,
            roles,
            permissions,
            assignments,
            grants,
        }
    }

    // =========================================================================
    // Users
    // =========================================================================

    /// Creates a user, hashing the password before storage.
    pub async fn create_user(&self, new_user: NewUser) -> CoreResult<User> {
        let password_hash = crypto::hash_password(&new_user.password)?;
        let identification = new_user.identification.clone();

        let user = self
            .users
            .insert(User {
                user_id: 0,
                full_name: new_user.full_name,
                identification: new_user.identification,
                password_hash,
                status: UserStatus::Active,
                email: new_user.email,
                phone: new_user.phone,
            })
            .await
            .map_err(|e| match e {
                StoreError::Duplicate(_) => CoreError::DuplicateUser { identification },
                other => CoreError::Store(other),
            })?;

        tracing::info!(user_id = user.user_id, "user created");
        Ok(user)
    }

    /// Fetches a user by id.
    pub async fn get_user(&self, id: UserId) -> CoreResult<User> {
        self.users
            .find_by_id(id)
            .await?
            .ok_or(CoreError::UserNotFound { id })
    }

    /// Lists all users.
    pub async fn list_users(&self) -> CoreResult<Vec<User>> {
        Ok(self.users.list().await?)
    }

    /// Deletes a user and every role assignment that references it.
    pub async fn delete_user(&self, id: UserId) -> CoreResult<()> {
        if !self.users.exists(id).await? {
            return Err(CoreError::UserNotFound { id });
        }

        let removed = self.assignments.remove_all_for_user(id).await?;
        self.users.delete(id).await?;
        tracing::info!(user_id = id, cascaded_assignments = removed, "user deleted");
        Ok(())
    }

    // =========================================================================
    // Roles
    // =========================================================================

    /// Creates a role with a unique name.
    pub async fn create_role(&self, name: &str) -> CoreResult<Role> {
        let role = self
            .roles
            .insert(Role {
                role_id: 0,
                role_name: name.to_string(),
            })
            .await
            .map_err(|e| match e {
                StoreError::Duplicate(_) => CoreError::DuplicateRole {
                    name: name.to_string(),
                },
                other => CoreError::Store(other),
            })?;

        tracing::info!(role_id = role.role_id, role_name = %role.role_name, "role created");
        Ok(role)
    }

    /// Fetches a role by id.
    pub async fn get_role(&self, id: RoleId) -> CoreResult<Role> {
        self.roles
            .find_by_id(id)
            .await?
            .ok_or(CoreError::RoleNotFound { id })
    }

    /// Lists all roles.
    pub async fn list_roles(&self) -> CoreResult<Vec<Role>> {
        Ok(self.roles.list().await?)
    }

    /// Deletes a role, its permission grants, and its user assignments.
    pub async fn delete_role(&self, id: RoleId) -> CoreResult<()> {
        if !self.roles.exists(id).await? {
            return Err(CoreError::RoleNotFound { id });
        }

        let grants = self.grants.remove_all_for_role(id).await?;
        let assignments = self.assignments.remove_all_for_role(id).await?;
        self.roles.delete(id).await?;
        tracing::info!(
            role_id = id,
            cascaded_grants = grants,
            cascaded_assignments = assignments,
            "role deleted"
        );
        Ok(())
    }

    // =========================================================================
    // Permissions
    // =========================================================================

    /// Creates a permission with a unique name.
    pub async fn create_permission(&self, name: &str) -> CoreResult<Permission> {
        let permission = self
            .permissions
            .insert(Permission {
                permission_id: 0,
                permission_name: name.to_string(),
            })
            .await
            .map_err(|e| match e {
                StoreError::Duplicate(_) => CoreError::DuplicatePermission {
                    name: name.to_string(),
                },
                other => CoreError::Store(other),
            })?;

        tracing::info!(
            permission_id = permission.permission_id,
            permission_name = %permission.permission_name,
            "permission created"
        );
        Ok(permission)
    }

    /// Fetches a permission by id.
    pub async fn get_permission(&self, id: PermissionId) -> CoreResult<Permission> {
        self.permissions
            .find_by_id(id)
            .await?
            .ok_or(CoreError::PermissionNotFound { id })
    }

    /// Lists all permissions.
    pub async fn list_permissions(&self) -> CoreResult<Vec<Permission>> {
        Ok(self.permissions.list().await?)
    }

    /// Deletes a permission and every grant that references it.
    pub async fn delete_permission(&self, id: PermissionId) -> CoreResult<()> {
        if !self.permissions.exists(id).await? {
            return Err(CoreError::PermissionNotFound { id });
        }

        let removed = self.grants.remove_all_for_permission(id).await?;
        self.permissions.delete(id).await?;
        tracing::info!(permission_id = id, cascaded_grants = removed, "permission deleted");
        Ok(())
    }
}

impl std::fmt::Debug for CatalogService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CatalogService").finish_non_exhaustive()
    }
}

// =============================================================================
// Tests
// =============================================================================
