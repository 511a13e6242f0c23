// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Application state shared across handlers.

use std::sync::Arc;

use oncora_core::{
    AssignedRoleStore, CatalogService, MemoryStore, PermissionGrantService, PermissionStore,
    PrincipalBuilder, RbacResolver, RoleAssignmentService, RolePermissionStore, RoleStore,
    UserStore,
};

use crate::config::ApiConfig;
use crate::error::ApiResult;
use crate::token::TokenService;

// =============================================================================
// AppState
// =============================================================================

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    /// API configuration.
    pub config: Arc<ApiConfig>,
    /// Token service.
    pub tokens: Arc<TokenService>,
    /// Principal builder (credential store + RBAC resolver).
    pub principals: Arc<PrincipalBuilder>,
    /// User-role assignment service.
    pub role_assignments: Arc<RoleAssignmentService>,
    /// Role-permission grant service.
    pub permission_grants: Arc<PermissionGrantService>,
    /// Catalog CRUD service.
    pub catalog: Arc<CatalogService>,
}

impl AppState {
    /// Creates a state builder.
    pub fn builder() -> AppStateBuilder {
        AppStateBuilder::new()
    }

    /// Returns the token service.
    pub fn tokens(&self) -> &TokenService {
        &self.tokens
    }

    /// Returns the principal builder.
    pub fn principals(&self) -> &PrincipalBuilder {
        &self.principals
    }
}

// =============================================================================
// Stores
// =============================================================================

/// The five store handles the services are wired from.
#[derive(Clone)]
pub struct Stores {
    /// User records.
    pub users: Arc<dyn UserStore>,
    /// Role records.
    pub roles: Arc<dyn RoleStore>,
    /// Permission records.
    pub permissions: Arc<dyn PermissionStore>,
    /// User-role links.
    pub assignments: Arc<dyn AssignedRoleStore>,
    /// Role-permission links.
    pub grants: Arc<dyn RolePermissionStore>,
}

impl Stores {
    /// Wires every handle to one shared in-memory store.
    pub fn in_memory(store: Arc<MemoryStore>) -> Self {
        Self {
            users: store.clone(),
            roles: store.clone(),
            permissions: store.clone(),
            assignments: store.clone(),
            grants: store,
        }
    }
}

// =============================================================================
// AppStateBuilder
// =============================================================================

/// Builder for constructing [`AppState`].
pub struct AppStateBuilder {
    config: Option<ApiConfig>,
    stores: Option<Stores>,
    tokens: Option<Arc<TokenService>>,
}

impl AppStateBuilder {
    /// Creates a new builder.
    pub fn new() -> Self {
        Self {
            config: None,
            stores: None,
            tokens: None,
        }
    }

    /// Sets the configuration.
    pub fn config(mut self, config: ApiConfig) -> Self {
        self.config = Some(config);
        self
    }

    /// Sets the store handles.
    pub fn stores(mut self, stores: Stores) -> Self {
        self.stores = Some(stores);
        self
    }

    /// Wires all stores to one shared in-memory store.
    pub fn memory_store(self, store: Arc<MemoryStore>) -> Self {
        self.stores(Stores::in_memory(store))
    }

    /// Sets a pre-built token service.
    pub fn token_service(mut self, tokens: Arc<TokenService>) -> Self {
        self.tokens = Some(tokens);
        self
    }

    /// Builds the state.
    ///
    /// Fails if the token configuration is invalid; that failure is fatal at
    /// startup.
    pub fn build(self) -> ApiResult<AppState> {
        let config = self.config.unwrap_or_default();
        let stores = self
            .stores
            .unwrap_or_else(|| Stores::in_memory(Arc::new(MemoryStore::new())));

        let tokens = match self.tokens {
            Some(tokens) => tokens,
            None => Arc::new(TokenService::new(config.token.clone())?),
        };

        let resolver = RbacResolver::new(
            stores.roles.clone(),
            stores.permissions.clone(),
            stores.assignments.clone(),
            stores.grants.clone(),
        );
        let principals = Arc::new(PrincipalBuilder::new(stores.users.clone(), resolver));
        let role_assignments = Arc::new(RoleAssignmentService::new(
            stores.users.clone(),
            stores.roles.clone(),
            stores.assignments.clone(),
        ));
        let permission_grants = Arc::new(PermissionGrantService::new(
            stores.roles.clone(),
            stores.permissions.clone(),
            stores.grants.clone(),
        ));
        let catalog = Arc::new(CatalogService::new(
            stores.users,
            stores.roles,
            stores.permissions,
            stores.assignments,
            stores.grants,
        ));

        Ok(AppState {
            config: Arc::new(config),
            tokens,
            principals,
            role_assignments,
            permission_grants,
            catalog,
        })
    }
}

impl Default for AppStateBuilder {
    fn default() -> Self {
        Self::new()
    }
}

// =============================================================================
// Tests
// =============================================================================
