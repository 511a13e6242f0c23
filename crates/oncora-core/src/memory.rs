// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! In-memory store implementation.
//!
//! Backs the binary and the test suite. All five store traits are implemented
//! over one [`tokio::sync::RwLock`], so every store call is atomic and the
//! join stores' check-and-insert cannot interleave with a racing writer.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::entity::{
    AssignedRole, LinkId, Permission, PermissionId, Role, RoleId, RolePermission, User, UserId,
};
use crate::store::{
    AssignedRoleStore, PermissionStore, RolePermissionStore, RoleStore, StoreError, UserStore,
};

// =============================================================================
// MemoryStore
// =============================================================================

/// An in-memory store implementing every store contract.
#[derive(Debug, Default)]
pub struct MemoryStore {
    inner: RwLock<Inner>,
}

#[derive(Debug, Default)]
struct Inner {
    users: HashMap<UserId, User>,
    roles: HashMap<RoleId, Role>,
    permissions: HashMap<PermissionId, Permission>,
    assigned_roles: HashMap<LinkId, AssignedRole>,
    role_permissions: HashMap<LinkId, RolePermission>,
    next_id: i64,
}

impl Inner {
    fn next_id(&mut self) -> i64 {
        self.next_id += 1;
        self.next_id
    }
}

impl MemoryStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }
}

// =============================================================================
// UserStore
// =============================================================================

#[async_trait]
impl UserStore for MemoryStore {
    async fn find_by_id(&self, id: UserId) -> Result<Option<User>, StoreError> {
        Ok(self.inner.read().await.users.get(&id).cloned())
    }

    async fn find_by_identification(
        &self,
        identification: &str,
    ) -> Result<Option<User>, StoreError> {
        Ok(self
            .inner
            .read()
            .await
            .users
            .values()
            .find(|u| u.identification == identification)
            .cloned())
    }

    async fn exists(&self, id: UserId) -> Result<bool, StoreError> {
        Ok(self.inner.read().await.users.contains_key(&id))
    }

    async fn insert(&self, mut user: User) -> Result<User, StoreError> {
        let mut inner = self.inner.write().await;
        if inner
            .users
            .values()
            .any(|u| u.identification == user.identification)
        {
            return Err(StoreError::Duplicate(format!(
                "user identification {}",
                user.identification
            )));
        }
        user.user_id = inner.next_id();
        inner.users.insert(user.user_id, user.clone());
        Ok(user)
    }

    async fn delete(&self, id: UserId) -> Result<(), StoreError> {
        self.inner
            .write()
            .await
            .users
            .remove(&id)
            .map(|_| ())
            .ok_or_else(|| StoreError::NotFound(format!("user {id}")))
    }

    async fn list(&self) -> Result<Vec<User>, StoreError> {
        let mut users: Vec<User> = self.inner.read().await.users.values().cloned().collect();
        users.sort_by_key(|u| u.user_id);
        Ok(users)
    }
}

// =============================================================================
// RoleStore
// =============================================================================

#[async_trait]
impl RoleStore for MemoryStore {
    async fn find_by_id(&self, id: RoleId) -> Result<Option<Role>, StoreError> {
        Ok(self.inner.read().await.roles.get(&id).cloned())
    }

    async fn find_by_name(&self, name: &str) -> Result<Option<Role>, StoreError> {
        Ok(self
            .inner
            .read()
            .await
            .roles
            .values()
            .find(|r| r.role_name == name)
            .cloned())
    }

    async fn exists(&self, id: RoleId) -> Result<bool, StoreError> {
        Ok(self.inner.read().await.roles.contains_key(&id))
    }

    async fn insert(&self, mut role: Role) -> Result<Role, StoreError> {
        let mut inner = self.inner.write().await;
        if inner.roles.values().any(|r| r.role_name == role.role_name) {
            return Err(StoreError::Duplicate(format!("role name {}", role.role_name)));
        }
        role.role_id = inner.next_id();
        inner.roles.insert(role.role_id, role.clone());
        Ok(role)
    }

    async fn delete(&self, id: RoleId) -> Result<(), StoreError> {
        self.inner
            .write()
            .await
            .roles
            .remove(&id)
            .map(|_| ())
            .ok_or_else(|| StoreError::NotFound(format!("role {id}")))
    }

    async fn list(&self) -> Result<Vec<Role>, StoreError> {
        let mut roles: Vec<Role> = self.inner.read().await.roles.values().cloned().collect();
        roles.sort_by_key(|r| r.role_id);
        Ok(roles)
    }
}

// =============================================================================
// PermissionStore
// =============================================================================

#[async_trait]
impl PermissionStore for MemoryStore {
    async fn find_by_id(&self, id: PermissionId) -> Result<Option<Permission>, StoreError> {
        Ok(self.inner.read().await.permissions.get(&id).cloned())
    }

    async fn find_by_name(&self, name: &str) -> Result<Option<Permission>, StoreError> {
        Ok(self
            .inner
            .read()
            .await
            .permissions
            .values()
            .find(|p| p.permission_name == name)
            .cloned())
    }

    async fn exists(&self, id: PermissionId) -> Result<bool, StoreError> {
        Ok(self.inner.read().await.permissions.contains_key(&id))
    }

    async fn insert(&self, mut permission: Permission) -> Result<Permission, StoreError> {
        let mut inner = self.inner.write().await;
        if inner
            .permissions
            .values()
            .any(|p| p.permission_name == permission.permission_name)
        {
            return Err(StoreError::Duplicate(format!(
                "permission name {}",
                permission.permission_name
            )));
        }
        permission.permission_id = inner.next_id();
        inner
            .permissions
            .insert(permission.permission_id, permission.clone());
        Ok(permission)
    }

    async fn delete(&self, id: PermissionId) -> Result<(), StoreError> {
        self.inner
            .write()
            .await
            .permissions
            .remove(&id)
            .map(|_| ())
            .ok_or_else(|| StoreError::NotFound(format!("permission {id}")))
    }

    async fn list(&self) -> Result<Vec<Permission>, StoreError> {
        let mut permissions: Vec<Permission> = self
            .inner
            .read()
            .await
            .permissions
            .values()
            .cloned()
            .collect();
        permissions.sort_by_key(|p| p.permission_id);
        Ok(permissions)
    }
}

// =============================================================================
// AssignedRoleStore
// =============================================================================

#[async_trait]
impl AssignedRoleStore for MemoryStore {
    async fn find(
        &self,
        role_id: RoleId,
        user_id: UserId,
    ) -> Result<Option<AssignedRole>, StoreError> {
        Ok(self
            .inner
            .read()
            .await
            .assigned_roles
            .values()
            .find(|l| l.role_id == role_id && l.user_id == user_id)
            .cloned())
    }

    async fn exists(&self, role_id: RoleId, user_id: UserId) -> Result<bool, StoreError> {
        Ok(self
            .inner
            .read()
            .await
            .assigned_roles
            .values()
            .any(|l| l.role_id == role_id && l.user_id == user_id))
    }

    async fn insert(&self, role_id: RoleId, user_id: UserId) -> Result<AssignedRole, StoreError> {
        let mut inner = self.inner.write().await;
        if inner
            .assigned_roles
            .values()
            .any(|l| l.role_id == role_id && l.user_id == user_id)
        {
            return Err(StoreError::Duplicate(format!(
                "assignment ({role_id}, {user_id})"
            )));
        }
        let link = AssignedRole {
            id: inner.next_id(),
            user_id,
            role_id,
        };
        inner.assigned_roles.insert(link.id, link.clone());
        Ok(link)
    }

    async fn update(&self, link: AssignedRole) -> Result<(), StoreError> {
        let mut inner = self.inner.write().await;
        if !inner.assigned_roles.contains_key(&link.id) {
            return Err(StoreError::NotFound(format!("assignment {}", link.id)));
        }
        if inner
            .assigned_roles
            .values()
            .any(|l| l.id != link.id && l.role_id == link.role_id && l.user_id == link.user_id)
        {
            return Err(StoreError::Duplicate(format!(
                "assignment ({}, {})",
                link.role_id, link.user_id
            )));
        }
        inner.assigned_roles.insert(link.id, link);
        Ok(())
    }

    async fn delete(&self, id: LinkId) -> Result<(), StoreError> {
        self.inner
            .write()
            .await
            .assigned_roles
            .remove(&id)
            .map(|_| ())
            .ok_or_else(|| StoreError::NotFound(format!("assignment {id}")))
    }

    async fn roles_for_user(&self, user_id: UserId) -> Result<Vec<RoleId>, StoreError> {
        let mut role_ids: Vec<RoleId> = self
            .inner
            .read()
            .await
            .assigned_roles
            .values()
            .filter(|l| l.user_id == user_id)
            .map(|l| l.role_id)
            .collect();
        role_ids.sort_unstable();
        Ok(role_ids)
    }

    async fn list(&self) -> Result<Vec<AssignedRole>, StoreError> {
        let mut links: Vec<AssignedRole> = self
            .inner
            .read()
            .await
            .assigned_roles
            .values()
            .cloned()
            .collect();
        links.sort_by_key(|l| l.id);
        Ok(links)
    }

    async fn remove_all_for_user(&self, user_id: UserId) -> Result<usize, StoreError> {
        let mut inner = self.inner.write().await;
        let before = inner.assigned_roles.len();
        inner.assigned_roles.retain(|_, l| l.user_id != user_id);
        Ok(before - inner.assigned_roles.len())
    }

    async fn remove_all_for_role(&self, role_id: RoleId) -> Result<usize, StoreError> {
        let mut inner = self.inner.write().await;
        let before = inner.assigned_roles.len();
        inner.assigned_roles.retain(|_, l| l.role_id != role_id);
        Ok(before - inner.assigned_roles.len())
    }
}

// =============================================================================
// RolePermissionStore
// =============================================================================

#[async_trait]
impl RolePermissionStore for MemoryStore {
    async fn find(
        &self,
        role_id: RoleId,
        permission_id: PermissionId,
    ) -> Result<Option<RolePermission>, StoreError> {
        Ok(self
            .inner
            .read()
            .await
            .role_permissions
            .values()
            .find(|l| l.role_id == role_id && l.permission_id == permission_id)
            .cloned())
    }

    async fn exists(
        &self,
        role_id: RoleId,
        permission_id: PermissionId,
    ) -> Result<bool, StoreError> {
        Ok(self
            .inner
            .read()
            .await
            .role_permissions
            .values()
            .any(|l| l.role_id == role_id && l.permission_id == permission_id))
    }

    async fn insert(
        &self,
        role_id: RoleId,
        permission_id: PermissionId,
    ) -> Result<RolePermission, StoreError> {
        let mut inner = self.inner.write().await;
        if inner
            .role_permissions
            .values()
            .any(|l| l.role_id == role_id && l.permission_id == permission_id)
        {
            return Err(StoreError::Duplicate(format!(
                "grant ({role_id}, {permission_id})"
            )));
        }
        let link = RolePermission {
            id: inner.next_id(),
            role_id,
            permission_id,
        };
        inner.role_permissions.insert(link.id, link.clone());
        Ok(link)
    }

    async fn update(&self, link: RolePermission) -> Result<(), StoreError> {
        let mut inner = self.inner.write().await;
        if !inner.role_permissions.contains_key(&link.id) {
            return Err(StoreError::NotFound(format!("grant {}", link.id)));
        }
        if inner.role_permissions.values().any(|l| {
            l.id != link.id && l.role_id == link.role_id && l.permission_id == link.permission_id
        }) {
            return Err(StoreError::Duplicate(format!(
                "grant ({}, {})",
                link.role_id, link.permission_id
            )));
        }
        inner.role_permissions.insert(link.id, link);
        Ok(())
    }

    async fn delete(&self, id: LinkId) -> Result<(), StoreError> {
        self.inner
            .write()
            .await
            .role_permissions
            .remove(&id)
            .map(|_| ())
            .ok_or_else(|| StoreError::NotFound(format!("grant {id}")))
    }

    async fn permissions_for_role(
        &self,
        role_id: RoleId,
    ) -> Result<Vec<PermissionId>, StoreError> {
        let mut permission_ids: Vec<PermissionId> = self
            .inner
            .read()
            .await
            .role_permissions
            .values()
            .filter(|l| l.role_id == role_id)
            .map(|l| l.permission_id)
            .collect();
        permission_ids.sort_unstable();
        Ok(permission_ids)
    }

    async fn list(&self) -> Result<Vec<RolePermission>, StoreError> {
        let mut links: Vec<RolePermission> = self
            .inner
            .read()
            .await
            .role_permissions
            .values()
            .cloned()
            .collect();
        links.sort_by_key(|l| l.id);
        Ok(links)
    }

    async fn remove_all_for_role(&self, role_id: RoleId) -> Result<usize, StoreError> {
        let mut inner = self.inner.write().await;
        let before = inner.role_permissions.len();
        inner.role_permissions.retain(|_, l| l.role_id != role_id);
        Ok(before - inner.role_permissions.len())
    }

    async fn remove_all_for_permission(
        &self,
        permission_id: PermissionId,
    ) -> Result<usize, StoreError> {
        let mut inner = self.inner.write().await;
        let before = inner.role_permissions.len();
        inner
            .role_permissions
            .retain(|_, l| l.permission_id != permission_id);
        Ok(before - inner.role_permissions.len())
    }
}

// =============================================================================
// Tests
// =============================================================================
