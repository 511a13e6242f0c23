// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Pre-built test data for consistent and reproducible testing.
//!
//! The seeded graph mirrors a small clinic: an `Admin` role carrying the
//! management permissions, a `Doctor` role with no permissions, one user
//! holding `Admin`, and one user with no roles at all.

use std::sync::Arc;

use oncora_api::{ApiConfig, AppState, TokenConfig};
use oncora_core::{
    CatalogService, MemoryStore, NewUser, Permission, PermissionGrantService, Principal,
    PrincipalBuilder, RbacResolver, Role, RoleAssignmentService, User,
};

/// Signing secret used across the suite; long enough for HMAC-SHA256.
pub const TEST_SECRET: &str = "integration-test-secret-key-0123456789abcdef";

/// Password of every seeded user.
pub const TEST_PASSWORD: &str = "changeme123";

/// Token configuration with the test secret and default TTL.
pub fn token_config() -> TokenConfig {
    TokenConfig::new(TEST_SECRET)
}

/// API configuration wired to the test secret.
pub fn api_config() -> ApiConfig {
    ApiConfig::default().with_token(token_config())
}

// =============================================================================
// ClinicGraph
// =============================================================================

/// A seeded store plus handles to everything the tests reach for.
pub struct ClinicGraph {
    /// The shared in-memory store.
    pub store: Arc<MemoryStore>,
    /// `Admin` role, granted all three management permissions.
    pub admin: Role,
    /// `Doctor` role, no permissions.
    pub doctor: Role,
    /// `VIEW_USERS` permission.
    pub view_users: Permission,
    /// `VIEW_ROLES` permission.
    pub view_roles: Permission,
    /// `VIEW_PERMISSIONS` permission.
    pub view_permissions: Permission,
    /// User `42`, holds `Admin`.
    pub ana: User,
    /// User `7`, holds nothing.
    pub bruno: User,
}

impl ClinicGraph {
    /// Seeds a fresh store.
    pub async fn seeded() -> Self {
        let store = Arc::new(MemoryStore::new());
        let catalog = catalog_for(&store);
        let roles = role_service_for(&store);
        let grants = grant_service_for(&store);

        let admin = catalog.create_role("Admin").await.expect("seed role");
        let doctor = catalog.create_role("Doctor").await.expect("seed role");

        let view_users = catalog
            .create_permission("VIEW_USERS")
            .await
            .expect("seed permission");
        let view_roles = catalog
            .create_permission("VIEW_ROLES")
            .await
            .expect("seed permission");
        let view_permissions = catalog
            .create_permission("VIEW_PERMISSIONS")
            .await
            .expect("seed permission");

        for permission in [&view_users, &view_roles, &view_permissions] {
            grants
                .assign_permission_to_role(permission.permission_id, admin.role_id)
                .await
                .expect("seed grant");
        }

        let ana = catalog
            .create_user(NewUser {
                full_name: "Ana Gomez".to_string(),
                identification: "42".to_string(),
                password: TEST_PASSWORD.to_string(),
                email: Some("ana@clinic.example".to_string()),
                phone: None,
            })
            .await
            .expect("seed user");
        let bruno = catalog
            .create_user(NewUser {
                full_name: "Bruno Diaz".to_string(),
                identification: "7".to_string(),
                password: TEST_PASSWORD.to_string(),
                email: None,
                phone: None,
            })
            .await
            .expect("seed user");

        roles
            .assign_role_to_user(admin.role_id, ana.user_id)
            .await
            .expect("seed assignment");

        Self {
            store,
            admin,
            doctor,
            view_users,
            view_roles,
            view_permissions,
            ana,
            bruno,
        }
    }

    /// Resolver over the seeded store.
    pub fn resolver(&self) -> RbacResolver {
        resolver_for(&self.store)
    }

    /// Principal builder over the seeded store.
    pub fn principal_builder(&self) -> PrincipalBuilder {
        PrincipalBuilder::new(self.store.clone(), self.resolver())
    }

    /// Role assignment service over the seeded store.
    pub fn role_service(&self) -> RoleAssignmentService {
        role_service_for(&self.store)
    }

    /// Permission grant service over the seeded store.
    pub fn grant_service(&self) -> PermissionGrantService {
        grant_service_for(&self.store)
    }

    /// Catalog service over the seeded store.
    pub fn catalog(&self) -> CatalogService {
        catalog_for(&self.store)
    }

    /// Builds Ana's principal (Admin authorities).
    pub async fn ana_principal(&self) -> Principal {
        self.principal_builder()
            .build("42")
            .await
            .expect("ana exists")
    }

    /// Application state sharing this graph's store.
    pub fn app_state(&self) -> AppState {
        AppState::builder()
            .config(api_config())
            .memory_store(self.store.clone())
            .build()
            .expect("valid test config")
    }
}

// =============================================================================
// Service constructors
// =============================================================================

fn resolver_for(store: &Arc<MemoryStore>) -> RbacResolver {
    RbacResolver::new(store.clone(), store.clone(), store.clone(), store.clone())
}

fn role_service_for(store: &Arc<MemoryStore>) -> RoleAssignmentService {
    RoleAssignmentService::new(store.clone(), store.clone(), store.clone())
}

fn grant_service_for(store: &Arc<MemoryStore>) -> PermissionGrantService {
    PermissionGrantService::new(store.clone(), store.clone(), store.clone())
}

fn catalog_for(store: &Arc<MemoryStore>) -> CatalogService {
    CatalogService::new(
        store.clone(),
        store.clone(),
        store.clone(),
        store.clone(),
        store.clone(),
    )
}
