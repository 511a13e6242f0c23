// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! # oncora-api
//!
//! HTTP API server for the Oncora clinic back end.
//!
//! This crate provides stateless JWT authentication, per-request principal
//! resolution, declarative authority guards, and the management endpoints
//! for the RBAC graph.

#![warn(missing_docs)]
#![deny(unsafe_code)]

pub mod claims;
pub mod config;
pub mod context;
pub mod error;
pub mod extractors;
pub mod handlers;
pub mod middleware;
pub mod response;
pub mod server;
pub mod state;
pub mod token;

pub use claims::Claims;
pub use config::{ApiConfig, CorsConfig};
pub use context::AuthContext;
pub use error::{ApiError, ApiResult};
pub use middleware::{AuthLayer, RequireAuthorityLayer};
pub use response::{ApiResponse, AuthResponse};
pub use server::ApiServer;
pub use state::{AppState, AppStateBuilder, Stores};
pub use token::{TokenConfig, TokenService};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
