// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Authority resolution over the RBAC graph.

use std::sync::Arc;

use crate::authority::{role_authority, AuthoritySet};
use crate::entity::UserId;
use crate::error::{CoreError, CoreResult};
use crate::store::{AssignedRoleStore, PermissionStore, RolePermissionStore, RoleStore};

/// Resolves a user's effective authority set from the stored graph.
///
/// The projection is: one `ROLE_<name>` entry per assigned role, plus the
/// bare name of every permission reachable through any assigned role. The
/// result is a pure function of the current graph; it is computed fresh on
/// every call and never cached.
#[derive(Clone)]
pub struct RbacResolver {
    roles: Arc<dyn RoleStore>,
    permissions: Arc<dyn PermissionStore>,
    assignments: Arc<dyn AssignedRoleStore>,
    grants: Arc<dyn RolePermissionStore>,
}

impl RbacResolver {
    /// Creates a resolver over the given stores.
    pub fn new(
        roles: Arc<dyn RoleStore>,
        permissions: Arc<dyn PermissionStore>,
        assignments: Arc<dyn AssignedRoleStore>,
        grants: Arc<dyn RolePermissionStore>,
    ) -> Self {
        Self {
            roles,
            permissions,
            assignments,
            grants,
        }
    }

    /// Computes the authority set for a user.
    ///
    /// A user with no assigned roles yields the empty set; a role with no
    /// permissions contributes only its `ROLE_*` entry. Duplicates across
    /// roles collapse.
    pub async fn resolve_authorities(&self, user_id: UserId) -> CoreResult<AuthoritySet> {
        let mut authorities = AuthoritySet::new();

        for role_id in self.assignments.roles_for_user(user_id).await? {
            let role = self
                .roles
                .find_by_id(role_id)
                .await?
                .ok_or(CoreError::RoleNotFound { id: role_id })?;
            authorities.insert(role_authority(&role.role_name));

            for permission_id in self.grants.permissions_for_role(role_id).await? {
                let permission = self
                    .permissions
                    .find_by_id(permission_id)
                    .await?
                    .ok_or(CoreError::PermissionNotFound { id: permission_id })?;
                authorities.insert(permission.permission_name);
            }
        }

        Ok(authorities)
    }
}

impl std::fmt::Debug for RbacResolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RbacResolver").finish_non_exhaustive()
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::{Permission, Role, User, UserStatus};
    use crate::memory::MemoryStore;
    use crate::store::UserStore;

    async fn seeded() -> (Arc<MemoryStore>, UserId) {
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

        (store, user.user_id)
    }

    fn resolver(store: &Arc<MemoryStore>) -> RbacResolver {
        RbacResolver::new(
            store.clone(),
            store.clone(),
            store.clone(),
            store.clone(),
        )
    }

    #[tokio::test]
    async fn test_role_and_permission_projection() {
        let (store, user_id) = seeded().await;

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
        RolePermissionStore::insert(store.as_ref(), admin.role_id, view_users.permission_id)
            .await
            .unwrap();
        AssignedRoleStore::insert(store.as_ref(), admin.role_id, user_id)
            .await
            .unwrap();

        let authorities = resolver(&store).resolve_authorities(user_id).await.unwrap();

        assert_eq!(authorities.len(), 2);
        assert!(authorities.contains("ROLE_Admin"));
        assert!(authorities.contains("VIEW_USERS"));
    }

    #[tokio::test]
    async fn test_no_roles_yields_empty_set() {
        let (store, user_id) = seeded().await;

        let authorities = resolver(&store).resolve_authorities(user_id).await.unwrap();
        assert!(authorities.is_empty());
    }

    #[tokio::test]
    async fn test_role_without_permissions() {
        let (store, user_id) = seeded().await;

        let doctor = RoleStore::insert(
            store.as_ref(),
            Role {
                role_id: 0,
                role_name: "Doctor".to_string(),
            },
        )
        .await
        .unwrap();
        AssignedRoleStore::insert(store.as_ref(), doctor.role_id, user_id)
            .await
            .unwrap();

        let authorities = resolver(&store).resolve_authorities(user_id).await.unwrap();
        assert_eq!(authorities.len(), 1);
        assert!(authorities.contains("ROLE_Doctor"));
    }

    #[tokio::test]
    async fn test_shared_permission_not_duplicated() {
        let (store, user_id) = seeded().await;

        let view_users = PermissionStore::insert(
            store.as_ref(),
            Permission {
                permission_id: 0,
                permission_name: "VIEW_USERS".to_string(),
            },
        )
        .await
        .unwrap();

        for name in ["Admin", "Doctor"] {
            let role = RoleStore::insert(
                store.as_ref(),
                Role {
                    role_id: 0,
                    role_name: name.to_string(),
                },
            )
            .await
            .unwrap();
            RolePermissionStore::insert(store.as_ref(), role.role_id, view_users.permission_id)
                .await
                .unwrap();
            AssignedRoleStore::insert(store.as_ref(), role.role_id, user_id)
                .await
                .unwrap();
        }

        let authorities = resolver(&store).resolve_authorities(user_id).await.unwrap();
        // Two roles plus one shared permission.
        assert_eq!(authorities.len(), 3);
    }
}
