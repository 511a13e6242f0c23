// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Mutation services for the RBAC graph.
//!
//! Both services share one invariant shape: every mutation checks, in a fixed
//! order, that the referenced records exist and that the join link is in the
//! expected state, then performs a single-record write. The checks
//! short-circuit so a rejection always names the first precondition that
//! failed. The store's atomic check-and-insert catches the race where two
//! concurrent calls both pass the link check.

use std::sync::Arc;

use crate::entity::{AssignedRole, Permission, PermissionId, Role, RoleId, RolePermission, UserId};
use crate::error::{CoreError, CoreResult};
use crate::store::{
    AssignedRoleStore, PermissionStore, RolePermissionStore, RoleStore, StoreError, UserStore,
};

// =============================================================================
// RoleAssignmentService
// =============================================================================

/// Mutates the user-role side of the graph.
#[derive(Clone)]
pub struct RoleAssignmentService {
    users: Arc<dyn UserStore>,
    roles: Arc<dyn RoleStore>,
    assignments: Arc<dyn AssignedRoleStore>,
}

impl RoleAssignmentService {
    /// Creates the service over the given stores.
    pub fn new(
        users: Arc<dyn UserStore>,
        roles: Arc<dyn RoleStore>,
        assignments: Arc<dyn AssignedRoleStore>,
    ) -> Self {
        Self {
            users,
            roles,
            assignments,
        }
    }

    /// Assigns a role to a user.
    ///
    /// Checks in order: user exists, role exists, pair not already assigned.
    pub async fn assign_role_to_user(
        &self,
        role_id: RoleId,
        user_id: UserId,
    ) -> CoreResult<AssignedRole> {
        if !self.users.exists(user_id).await? {
            return Err(CoreError::UserNotFound { id: user_id });
        }
        if !self.roles.exists(role_id).await? {
            return Err(CoreError::RoleNotFound { id: role_id });
        }
        if self.assignments.exists(role_id, user_id).await? {
            return Err(CoreError::DuplicateAssignment { role_id, user_id });
        }

        let link = self
            .assignments
            .insert(role_id, user_id)
            .await
            .map_err(|e| match e {
                // A racing assign won between our check and the insert.
                StoreError::Duplicate(_) => CoreError::DuplicateAssignment { role_id, user_id },
                other => CoreError::Store(other),
            })?;

        tracing::info!(role_id, user_id, "role assigned to user");
        Ok(link)
    }

    /// Removes a role assignment from a user.
    ///
    /// Checks in order: user exists, role exists, assignment exists.
    pub async fn remove_role_from_user(&self, role_id: RoleId, user_id: UserId) -> CoreResult<()> {
        if !self.users.exists(user_id).await? {
            return Err(CoreError::UserNotFound { id: user_id });
        }
        if !self.roles.exists(role_id).await? {
            return Err(CoreError::RoleNotFound { id: role_id });
        }
        let link = self
            .assignments
            .find(role_id, user_id)
            .await?
            .ok_or(CoreError::AssignmentNotFound { role_id, user_id })?;

        self.assignments.delete(link.id).await?;
        tracing::info!(role_id, user_id, "role removed from user");
        Ok(())
    }

    /// Re-points an existing assignment from one role to another.
    ///
    /// The link record is rewritten in place, not deleted and recreated.
    /// Preconditions: user exists, both roles exist, the `(old, user)` link
    /// exists, and the `(new, user)` pair is not already assigned.
    pub async fn update_role_for_user(
        &self,
        old_role_id: RoleId,
        new_role_id: RoleId,
        user_id: UserId,
    ) -> CoreResult<AssignedRole> {
        if !self.users.exists(user_id).await? {
            return Err(CoreError::UserNotFound { id: user_id });
        }
        if !self.roles.exists(old_role_id).await? {
            return Err(CoreError::RoleNotFound { id: old_role_id });
        }
        if !self.roles.exists(new_role_id).await? {
            return Err(CoreError::RoleNotFound { id: new_role_id });
        }
        let link = self
            .assignments
            .find(old_role_id, user_id)
            .await?
            .ok_or(CoreError::AssignmentNotFound {
                role_id: old_role_id,
                user_id,
            })?;
        if new_role_id != old_role_id && self.assignments.exists(new_role_id, user_id).await? {
            return Err(CoreError::DuplicateAssignment {
                role_id: new_role_id,
                user_id,
            });
        }

        let updated = AssignedRole {
            role_id: new_role_id,
            ..link
        };
        self.assignments
            .update(updated.clone())
            .await
            .map_err(|e| match e {
                StoreError::Duplicate(_) => CoreError::DuplicateAssignment {
                    role_id: new_role_id,
                    user_id,
                },
                other => CoreError::Store(other),
            })?;

        tracing::info!(old_role_id, new_role_id, user_id, "role assignment re-pointed");
        Ok(updated)
    }

    /// Returns the roles assigned to a user.
    pub async fn roles_for_user(&self, user_id: UserId) -> CoreResult<Vec<Role>> {
        if !self.users.exists(user_id).await? {
            return Err(CoreError::UserNotFound { id: user_id });
        }

        let mut roles = Vec::new();
        for role_id in self.assignments.roles_for_user(user_id).await? {
            let role = self
                .roles
                .find_by_id(role_id)
                .await?
                .ok_or(CoreError::RoleNotFound { id: role_id })?;
            roles.push(role);
        }
        Ok(roles)
    }
}

impl std::fmt::Debug for RoleAssignmentService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RoleAssignmentService").finish_non_exhaustive()
    }
}

// =============================================================================
// PermissionGrantService
// =============================================================================

/// Mutates the role-permission side of the graph.
#[derive(Clone)]
pub struct PermissionGrantService {
    roles: Arc<dyn RoleStore>,
    permissions: Arc<dyn PermissionStore>,
    grants: Arc<dyn RolePermissionStore>,
}

impl PermissionGrantService {
    /// Creates the service over the given stores.
    pub fn new(
        roles: Arc<dyn RoleStore>,
        permissions: Arc<dyn PermissionStore>,
        grants: Arc<dyn RolePermissionStore>,
    ) -> Self {
        Self {
            roles,
            permissions,
            grants,
        }
    }

    /// Grants a permission to a role.
    ///
    /// Checks in order: permission exists, role exists, pair not already
    /// granted.
    pub async fn assign_permission_to_role(
        &self,
        permission_id: PermissionId,
        role_id: RoleId,
    ) -> CoreResult<RolePermission> {
        if !self.permissions.exists(permission_id).await? {
            return Err(CoreError::PermissionNotFound { id: permission_id });
        }
        if !self.roles.exists(role_id).await? {
            return Err(CoreError::RoleNotFound { id: role_id });
        }
        if self.grants.exists(role_id, permission_id).await? {
            return Err(CoreError::DuplicateGrant {
                permission_id,
                role_id,
            });
        }

        let link = self
            .grants
            .insert(role_id, permission_id)
            .await
            .map_err(|e| match e {
                StoreError::Duplicate(_) => CoreError::DuplicateGrant {
                    permission_id,
                    role_id,
                },
                other => CoreError::Store(other),
            })?;

        tracing::info!(permission_id, role_id, "permission granted to role");
        Ok(link)
    }

    /// Revokes a permission from a role.
    ///
    /// Checks in order: permission exists, role exists, grant exists.
    pub async fn remove_permission_from_role(
        &self,
        permission_id: PermissionId,
        role_id: RoleId,
    ) -> CoreResult<()> {
        if !self.permissions.exists(permission_id).await? {
            return Err(CoreError::PermissionNotFound { id: permission_id });
        }
        if !self.roles.exists(role_id).await? {
            return Err(CoreError::RoleNotFound { id: role_id });
        }
        let link = self
            .grants
            .find(role_id, permission_id)
            .await?
            .ok_or(CoreError::GrantNotFound {
                permission_id,
                role_id,
            })?;

        self.grants.delete(link.id).await?;
        tracing::info!(permission_id, role_id, "permission revoked from role");
        Ok(())
    }

    /// Re-points an existing grant from one permission to another.
    ///
    /// Preconditions: role exists, both permissions exist, the `(role, old)`
    /// grant exists, and `(role, new)` is not already granted.
    pub async fn update_permission_for_role(
        &self,
        old_permission_id: PermissionId,
        new_permission_id: PermissionId,
        role_id: RoleId,
    ) -> CoreResult<RolePermission> {
        if !self.roles.exists(role_id).await? {
            return Err(CoreError::RoleNotFound { id: role_id });
        }
        if !self.permissions.exists(old_permission_id).await? {
            return Err(CoreError::PermissionNotFound {
                id: old_permission_id,
            });
        }
        if !self.permissions.exists(new_permission_id).await? {
            return Err(CoreError::PermissionNotFound {
                id: new_permission_id,
            });
        }
        let link = self
            .grants
            .find(role_id, old_permission_id)
            .await?
            .ok_or(CoreError::GrantNotFound {
                permission_id: old_permission_id,
                role_id,
            })?;
        if new_permission_id != old_permission_id
            && self.grants.exists(role_id, new_permission_id).await?
        {
            return Err(CoreError::DuplicateGrant {
                permission_id: new_permission_id,
                role_id,
            });
        }

        let updated = RolePermission {
            permission_id: new_permission_id,
            ..link
        };
        self.grants.update(updated.clone()).await.map_err(|e| match e {
            StoreError::Duplicate(_) => CoreError::DuplicateGrant {
                permission_id: new_permission_id,
                role_id,
            },
            other => CoreError::Store(other),
        })?;

        tracing::info!(
            old_permission_id,
            new_permission_id,
            role_id,
            "permission grant re-pointed"
        );
        Ok(updated)
    }

    /// Returns the permissions granted to a role.
    pub async fn permissions_for_role(&self, role_id: RoleId) -> CoreResult<Vec<Permission>> {
        if !self.roles.exists(role_id).await? {
            return Err(CoreError::RoleNotFound { id: role_id });
        }

        let mut permissions = Vec::new();
        for permission_id in self.grants.permissions_for_role(role_id).await? {
            let permission = self
                .permissions
                .find_by_id(permission_id)
                .await?
                .ok_or(CoreError::PermissionNotFound { id: permission_id })?;
            permissions.push(permission);
        }
        Ok(permissions)
    }

    /// Returns `true` if the role holds the permission. Both must exist.
    pub async fn role_has_permission(
        &self,
        role_id: RoleId,
        permission_id: PermissionId,
    ) -> CoreResult<bool> {
        if !self.roles.exists(role_id).await? {
            return Err(CoreError::RoleNotFound { id: role_id });
        }
        if !self.permissions.exists(permission_id).await? {
            return Err(CoreError::PermissionNotFound { id: permission_id });
        }
        Ok(self.grants.exists(role_id, permission_id).await?)
    }
}

impl std::fmt::Debug for PermissionGrantService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PermissionGrantService").finish_non_exhaustive()
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::{User, UserStatus};
    use crate::memory::MemoryStore;

    struct Harness {
        store: Arc<MemoryStore>,
        roles: RoleAssignmentService,
        grants: PermissionGrantService,
        user_id: UserId,
        admin_id: RoleId,
        view_users_id: PermissionId,
    }

    async fn harness() -> Harness {
        let store = Arc::new(MemoryStore::new());

        let user = UserStore::insert(
            store.as_ref(),
            User {
                user_id: 0,
                full_name: "Ana Gomez".to_string(),
                identification: "42".to_string(),
                password_hash: String::new(),
                status: UserStatus::Active,
                email: None,
                phone: None,
            },
        )
        .await
        .unwrap();
        let admin = RoleStore::insert(
            store.as_ref(),
            Role {
                role_id: 0,
                role_name: "Admin".to_string(),
            },
        )
        .await
        .unwrap();
        let view_users = PermissionStore::insert(
            store.as_ref(),
            Permission {
                permission_id: 0,
                permission_name: "VIEW_USERS".to_string(),
            },
        )
        .await
        .unwrap();

        Harness {
            roles: RoleAssignmentService::new(store.clone(), store.clone(), store.clone()),
            grants: PermissionGrantService::new(store.clone(), store.clone(), store.clone()),
            store,
            user_id: user.user_id,
            admin_id: admin.role_id,
            view_users_id: view_users.permission_id,
        }
    }

    #[tokio::test]
    async fn test_assign_role_twice_fails_and_keeps_one_link() {
        let h = harness().await;

        h.roles
            .assign_role_to_user(h.admin_id, h.user_id)
            .await
            .unwrap();
        let second = h.roles.assign_role_to_user(h.admin_id, h.user_id).await;
        assert!(matches!(
            second,
            Err(CoreError::DuplicateAssignment { .. })
        ));

        let links = AssignedRoleStore::list(h.store.as_ref()).await.unwrap();
        assert_eq!(links.len(), 1);
    }

    #[tokio::test]
    async fn test_assign_role_checks_order() {
        let h = harness().await;

        let missing_user = h.roles.assign_role_to_user(h.admin_id, 999).await;
        assert!(matches!(missing_user, Err(CoreError::UserNotFound { id: 999 })));

        let missing_role = h.roles.assign_role_to_user(999, h.user_id).await;
        assert!(matches!(missing_role, Err(CoreError::RoleNotFound { id: 999 })));
    }

    #[tokio::test]
    async fn test_remove_missing_assignment_does_not_mutate() {
        let h = harness().await;

        let result = h.roles.remove_role_from_user(h.admin_id, h.user_id).await;
        assert!(matches!(result, Err(CoreError::AssignmentNotFound { .. })));
        assert!(AssignedRoleStore::list(h.store.as_ref())
            .await
            .unwrap()
            .is_empty());
    }

    #[tokio::test]
    async fn test_update_role_repoints_in_place() {
        let h = harness().await;
        let doctor = RoleStore::insert(
            h.store.as_ref(),
            Role {
                role_id: 0,
                role_name: "Doctor".to_string(),
            },
        )
        .await
        .unwrap();

        let original = h
            .roles
            .assign_role_to_user(h.admin_id, h.user_id)
            .await
            .unwrap();
        let updated = h
            .roles
            .update_role_for_user(h.admin_id, doctor.role_id, h.user_id)
            .await
            .unwrap();

        // Same link record, new target.
        assert_eq!(updated.id, original.id);
        assert_eq!(updated.role_id, doctor.role_id);

        let links = AssignedRoleStore::list(h.store.as_ref()).await.unwrap();
        assert_eq!(links.len(), 1);
    }

    #[tokio::test]
    async fn test_update_role_requires_new_target() {
        let h = harness().await;
        h.roles
            .assign_role_to_user(h.admin_id, h.user_id)
            .await
            .unwrap();

        let result = h
            .roles
            .update_role_for_user(h.admin_id, 999, h.user_id)
            .await;
        assert!(matches!(result, Err(CoreError::RoleNotFound { id: 999 })));
    }

    #[tokio::test]
    async fn test_grant_unknown_permission_creates_nothing() {
        let h = harness().await;

        let result = h.grants.assign_permission_to_role(99, h.admin_id).await;
        assert!(matches!(
            result,
            Err(CoreError::PermissionNotFound { id: 99 })
        ));
        assert!(RolePermissionStore::list(h.store.as_ref())
            .await
            .unwrap()
            .is_empty());
    }

    #[tokio::test]
    async fn test_grant_and_revoke_round_trip() {
        let h = harness().await;

        h.grants
            .assign_permission_to_role(h.view_users_id, h.admin_id)
            .await
            .unwrap();
        assert!(h
            .grants
            .role_has_permission(h.admin_id, h.view_users_id)
            .await
            .unwrap());

        let duplicate = h
            .grants
            .assign_permission_to_role(h.view_users_id, h.admin_id)
            .await;
        assert!(matches!(duplicate, Err(CoreError::DuplicateGrant { .. })));

        h.grants
            .remove_permission_from_role(h.view_users_id, h.admin_id)
            .await
            .unwrap();
        assert!(!h
            .grants
            .role_has_permission(h.admin_id, h.view_users_id)
            .await
            .unwrap());
    }

    #[tokio::test]
    async fn test_permissions_for_role_requires_role() {
        let h = harness().await;

        let result = h.grants.permissions_for_role(999).await;
        assert!(matches!(result, Err(CoreError::RoleNotFound { id: 999 })));
    }
}
