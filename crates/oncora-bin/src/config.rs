// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Configuration file loading and startup seed data.

use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use oncora_api::ApiConfig;

// =============================================================================
// AppConfig
// =============================================================================

/// Top-level configuration file structure (TOML).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// API server section.
    pub api: ApiConfig,
    /// Records seeded into the store at startup.
    pub seed: SeedConfig,
}

impl AppConfig {
    /// Loads the configuration from a TOML file.
    pub fn load(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config file {}", path.display()))?;
        let config: AppConfig = toml::from_str(&raw)
            .with_context(|| format!("failed to parse config file {}", path.display()))?;
        Ok(config)
    }

    /// Loads the configuration, falling back to defaults if the file does not
    /// exist.
    pub fn load_or_default(path: &Path) -> Result<Self> {
        if path.exists() {
            Self::load(path)
        } else {
            tracing::warn!(path = %path.display(), "config file not found, using defaults");
            Ok(Self::default())
        }
    }
}

// =============================================================================
// SeedConfig
// =============================================================================

/// Seed data applied to an empty store at startup.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SeedConfig {
    /// Role names to create.
    pub roles: Vec<String>,
    /// Permission names to create.
    pub permissions: Vec<String>,
    /// Role-permission grants, by name.
    pub grants: Vec<GrantSeed>,
    /// User accounts to create.
    pub users: Vec<UserSeed>,
}

/// A seeded role-permission grant.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GrantSeed {
    /// Role name; must appear in `roles`.
    pub role: String,
    /// Permission name; must appear in `permissions`.
    pub permission: String,
}

/// A seeded user account.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserSeed {
    /// Display name.
    pub full_name: String,
    /// Unique identification.
    pub identification: String,
    /// Raw password; hashed on seed.
    pub password: String,
    /// Role names to assign; must appear in `roles`.
    #[serde(default)]
    pub roles: Vec<String>,
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_full_config() {
        let raw = r#"
            [api]
            port = 9000

            [api.token]
            secret = "0123456789abcdef0123456789abcdef"
            ttl_minutes = 15

            [seed]
            roles = ["Admin"]
            permissions = ["VIEW_USERS"]

            [[seed.grants]]
            role = "Admin"
            permission = "VIEW_USERS"

            [[seed.users]]
            full_name = "Ana Gomez"
            identification = "42"
            password = "changeme123"
            roles = ["Admin"]
        "#;

        let config: AppConfig = toml::from_str(raw).unwrap();
        assert_eq!(config.api.port, 9000);
        assert_eq!(config.api.token.ttl_minutes, 15);
        assert_eq!(config.seed.roles, vec!["Admin"]);
        assert_eq!(config.seed.users[0].roles, vec!["Admin"]);
    }

    #[test]
    fn test_empty_config_uses_defaults() {
        let config: AppConfig = toml::from_str("").unwrap();
        assert_eq!(config.api.port, 8080);
        assert!(config.seed.roles.is_empty());
    }
}
