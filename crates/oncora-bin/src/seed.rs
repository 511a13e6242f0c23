// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Startup seeding of the in-memory store.

use anyhow::{anyhow, Result};

use oncora_api::AppState;
use oncora_core::NewUser;

use crate::config::SeedConfig;

/// Applies the seed section to the state's store.
///
/// Names are resolved within the seed itself: a grant or a user role naming
/// an unknown role/permission is a configuration error.
pub async fn apply_seed(state: &AppState, seed: &SeedConfig) -> Result<()> {
    let mut role_ids = std::collections::HashMap::new();
    for name in &seed.roles {
        let role = state.catalog.create_role(name).await?;
        role_ids.insert(name.clone(), role.role_id);
    }

    let mut permission_ids = std::collections::HashMap::new();
    for name in &seed.permissions {
        let permission = state.catalog.create_permission(name).await?;
        permission_ids.insert(name.clone(), permission.permission_id);
    }

    for grant in &seed.grants {
        let role_id = *role_ids
            .get(&grant.role)
            .ok_or_else(|| anyhow!("seed grant references unknown role {}", grant.role))?;
        let permission_id = *permission_ids.get(&grant.permission).ok_or_else(|| {
            anyhow!(
                "seed grant references unknown permission {}",
                grant.permission
            )
        })?;
        state
            .permission_grants
            .assign_permission_to_role(permission_id, role_id)
            .await?;
    }

    for user_seed in &seed.users {
        let user = state
            .catalog
            .create_user(NewUser {
                full_name: user_seed.full_name.clone(),
                identification: user_seed.identification.clone(),
                password: user_seed.password.clone(),
                email: None,
                phone: None,
            })
            .await?;

        for role_name in &user_seed.roles {
            let role_id = *role_ids.get(role_name).ok_or_else(|| {
                anyhow!(
                    "seed user {} references unknown role {role_name}",
                    user_seed.identification
                )
            })?;
            state
                .role_assignments
                .assign_role_to_user(role_id, user.user_id)
                .await?;
        }
    }

    tracing::info!(
        roles = seed.roles.len(),
        permissions = seed.permissions.len(),
        grants = seed.grants.len(),
        users = seed.users.len(),
        "seed applied"
    );
    Ok(())
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{GrantSeed, UserSeed};
    use oncora_api::{ApiConfig, TokenConfig};

    fn test_state() -> AppState {
        let config =
            ApiConfig::default().with_token(TokenConfig::new("0123456789abcdef0123456789abcdef"));
        AppState::builder().config(config).build().unwrap()
    }

    fn test_seed() -> SeedConfig {
        SeedConfig {
            roles: vec!["Admin".to_string()],
            permissions: vec!["VIEW_USERS".to_string()],
            grants: vec![GrantSeed {
                role: "Admin".to_string(),
                permission: "VIEW_USERS".to_string(),
            }],
            users: vec![UserSeed {
                full_name: "Ana Gomez".to_string(),
                identification: "42".to_string(),
                password: "changeme123".to_string(),
                roles: vec!["Admin".to_string()],
            }],
        }
    }

    #[tokio::test]
    async fn test_seed_builds_working_graph() {
        let state = test_state();
        apply_seed(&state, &test_seed()).await.unwrap();

        let principal = state.principals.build("42").await.unwrap();
        assert!(principal.has_authority("ROLE_Admin"));
        assert!(principal.has_authority("VIEW_USERS"));
        assert!(principal.verify_password("changeme123"));
    }

    #[tokio::test]
    async fn test_seed_rejects_unknown_role() {
        let state = test_state();
        let mut seed = test_seed();
        seed.grants[0].role = "Ghost".to_string();

        assert!(apply_seed(&state, &seed).await.is_err());
    }
}
