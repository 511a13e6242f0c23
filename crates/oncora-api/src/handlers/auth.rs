// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Authentication handlers.

use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};

use crate::error::{ApiError, ApiResult};
use crate::extractors::Auth;
use crate::response::AuthResponse;
use crate::state::AppState;

// =============================================================================
// Login
// =============================================================================

/// Login request body.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    /// The user's identification.
    pub identification: String,
    /// Raw password.
    pub password: String,
}

/// POST /api/v1/auth/login
///
/// Verifies credentials and issues a bearer token. Unknown identifications,
/// wrong passwords, and inactive accounts all produce the same generic
/// failure.
pub async fn login(
    State(state): State<AppState>,
    Json(request): Json<LoginRequest>,
) -> ApiResult<Json<AuthResponse>> {
    if request.identification.is_empty() || request.password.is_empty() {
        return Err(ApiError::bad_request(
            "identification and password are required",
        ));
    }

    let principal = match state.principals.build(&request.identification).await {
        Ok(principal) => principal,
        Err(e) => {
            tracing::debug!(error = %e, "login rejected");
            return Err(ApiError::invalid_credentials());
        }
    };

    if !principal.is_active() || !principal.verify_password(&request.password) {
        tracing::debug!(identification = %principal.identification, "login rejected");
        return Err(ApiError::invalid_credentials());
    }

    let token = state.tokens.issue(&principal)?;
    tracing::info!(identification = %principal.identification, "user logged in");

    Ok(Json(AuthResponse::new(
        token,
        state.tokens.expiration_secs(),
        principal.identification,
    )))
}

// =============================================================================
// Current User
// =============================================================================

/// Current user response.
#[derive(Debug, Serialize)]
pub struct CurrentUserResponse {
    /// The authenticated identification.
    pub identification: String,
    /// Effective authorities, live-resolved for this request.
    pub authorities: Vec<String>,
}

/// GET /api/v1/auth/me
///
/// Returns the caller's identification and authority set.
pub async fn current_user(Auth(ctx): Auth) -> ApiResult<Json<CurrentUserResponse>> {
    let authorities = ctx.authorities.iter().map(str::to_string).collect();

    Ok(Json(CurrentUserResponse {
        identification: ctx.identification,
        authorities,
    }))
}
