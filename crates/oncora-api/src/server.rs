// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! API server and router assembly.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use axum::{
    http::Method,
    routing::{get, post},
    Router,
};
use tower::ServiceBuilder;
use tower_http::{
    cors::{AllowOrigin, Any, CorsLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};
use tracing::info;

use crate::config::ApiConfig;
use crate::error::{ApiError, ApiResult};
use crate::handlers;
use crate::middleware::{AuthLayer, RequireAuthorityLayer};
use crate::state::AppState;

// =============================================================================
// ApiServer
// =============================================================================

/// The API server.
pub struct ApiServer {
    state: AppState,
    config: Arc<ApiConfig>,
}

impl ApiServer {
    /// Creates a server from pre-built state.
    pub fn new(state: AppState) -> Self {
        let config = state.config.clone();
        Self { state, config }
    }

    /// Builds the router with all routes and middleware.
    ///
    /// Authentication runs on every route and only decorates the request;
    /// each management group carries its own authority guard, mirroring the
    /// declarative route-to-authority table.
    pub fn router(&self) -> Router {
        let auth = AuthLayer::new(self.state.tokens.clone(), self.state.principals.clone());
        let cors = create_cors_layer(&self.config);

        let middleware_stack = ServiceBuilder::new()
            .layer(TraceLayer::new_for_http())
            .layer(TimeoutLayer::new(self.config.request_timeout))
            .layer(cors)
            .layer(auth);

        Router::new()
            .route("/health", get(handlers::health))
            .route("/api/v1/auth/login", post(handlers::login))
            .route("/api/v1/auth/me", get(handlers::current_user))
            .nest("/api/v1/users", user_routes())
            .nest("/api/v1/roles", role_routes())
            .nest("/api/v1/permissions", permission_routes())
            .layer(middleware_stack)
            .with_state(self.state.clone())
    }

    /// Runs the server until the socket closes.
    pub async fn run(self) -> ApiResult<()> {
        self.serve(std::future::pending::<()>()).await
    }

    /// Runs the server until the shutdown future resolves.
    pub async fn run_with_shutdown(
        self,
        shutdown_signal: impl std::future::Future<Output = ()> + Send + 'static,
    ) -> ApiResult<()> {
        self.serve(shutdown_signal).await
    }

    async fn serve(
        self,
        shutdown_signal: impl std::future::Future<Output = ()> + Send + 'static,
    ) -> ApiResult<()> {
        let addr = self.config.socket_addr();
        let router = self.router();

        info!("starting API server on {addr}");

        let listener = tokio::net::TcpListener::bind(addr)
            .await
            .map_err(|e| ApiError::internal(format!("failed to bind {addr}: {e}")))?;

        axum::serve(listener, router)
            .with_graceful_shutdown(shutdown_signal)
            .await
            .map_err(|e| ApiError::internal(format!("server error: {e}")))?;

        info!("API server shutdown complete");
        Ok(())
    }

    /// Returns the configured bind address.
    pub fn addr(&self) -> SocketAddr {
        self.config.socket_addr()
    }
}

// =============================================================================
// Route groups
// =============================================================================

fn user_routes() -> Router<AppState> {
    Router::new()
        .route("/", post(handlers::create_user).get(handlers::list_users))
        .route(
            "/{user_id}",
            get(handlers::get_user).delete(handlers::delete_user),
        )
        .route(
            "/{user_id}/roles",
            get(handlers::user_roles).put(handlers::update_role),
        )
        .route(
            "/{user_id}/roles/{role_id}",
            post(handlers::assign_role).delete(handlers::remove_role),
        )
        .layer(RequireAuthorityLayer::new("VIEW_USERS"))
}

fn role_routes() -> Router<AppState> {
    Router::new()
        .route("/", post(handlers::create_role).get(handlers::list_roles))
        .route(
            "/{role_id}",
            get(handlers::get_role).delete(handlers::delete_role),
        )
        .route(
            "/{role_id}/permissions",
            get(handlers::role_permissions).put(handlers::update_grant),
        )
        .route(
            "/{role_id}/permissions/{permission_id}",
            post(handlers::grant_permission).delete(handlers::revoke_permission),
        )
        .layer(RequireAuthorityLayer::new("VIEW_ROLES"))
}

fn permission_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            post(handlers::create_permission).get(handlers::list_permissions),
        )
        .route(
            "/{permission_id}",
            get(handlers::get_permission).delete(handlers::delete_permission),
        )
        .layer(RequireAuthorityLayer::new("VIEW_PERMISSIONS"))
}

// =============================================================================
// Helpers
// =============================================================================

/// Creates the CORS layer from configuration.
fn create_cors_layer(config: &ApiConfig) -> CorsLayer {
    let cors = &config.cors;

    let mut layer = CorsLayer::new().max_age(Duration::from_secs(cors.max_age));

    if cors.allowed_origins.iter().any(|o| o == "*") {
        layer = layer.allow_origin(Any);
    } else {
        let origins: Vec<_> = cors
            .allowed_origins
            .iter()
            .filter_map(|o| o.parse().ok())
            .collect();
        layer = layer.allow_origin(AllowOrigin::list(origins));
    }

    let methods: Vec<Method> = cors
        .allowed_methods
        .iter()
        .filter_map(|m| m.parse().ok())
        .collect();
    layer = layer.allow_methods(methods);

    layer.allow_headers(Any)
}

// =============================================================================
// Tests
// =============================================================================
