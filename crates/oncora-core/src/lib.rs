// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! # oncora-core
//!
//! Identity and access-control core for the Oncora clinic back end.
//!
//! This crate holds everything that does not touch HTTP:
//!
//! - Domain records for users, roles, permissions, and the two join tables
//! - Store contracts ([`store`]) plus an in-memory implementation ([`memory`])
//! - The authority projection ([`rbac`]) and principal construction
//!   ([`principal`])
//! - The mutation services guarding the RBAC graph's invariants
//!   ([`assignment`], [`catalog`])

#![warn(missing_docs)]
#![deny(unsafe_code)]

pub mod assignment;
pub mod authority;
pub mod catalog;
pub mod crypto;
pub mod entity;
pub mod error;
pub mod memory;
pub mod principal;
pub mod rbac;
pub mod store;

pub use assignment::{PermissionGrantService, RoleAssignmentService};
pub use authority::{role_authority, AuthoritySet};
pub use catalog::{CatalogService, NewUser};
pub use entity::{
    AssignedRole, LinkId, Permission, PermissionId, Role, RoleId, RolePermission, User, UserId,
    UserStatus,
};
pub use error::{CoreError, CoreResult};
pub use memory::MemoryStore;
pub use principal::{Principal, PrincipalBuilder};
pub use rbac::RbacResolver;
pub use store::{
    AssignedRoleStore, PermissionStore, RolePermissionStore, RoleStore, StoreError, UserStore,
};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
