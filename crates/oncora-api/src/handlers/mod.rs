// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! API handlers.
//!
//! - [`auth`]: login and current-user endpoints
//! - [`users`]: user catalog and role assignments
//! - [`roles`]: role catalog and permission grants
//! - [`permissions`]: permission catalog
//! - [`health`]: liveness endpoint

mod auth;
mod health;
mod permissions;
mod roles;
mod users;

pub use auth::*;
pub use health::*;
pub use permissions::*;
pub use roles::*;
pub use users::*;
