// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! User catalog and role-assignment handlers.

use axum::{
    extract::{Path, State},
    Json,
};
use serde::Deserialize;

use oncora_core::{AssignedRole, NewUser, Role, RoleId, User, UserId};

use crate::error::{ApiError, ApiResult};
use crate::response::ApiResponse;
use crate::state::AppState;

// =============================================================================
// User catalog
// =============================================================================

/// Create-user request body.
#[derive(Debug, Deserialize)]
pub struct CreateUserRequest {
    /// Display name.
    pub full_name: String,
    /// Unique external identifier.
    pub identification: String,
    /// Raw password.
    pub password: String,
    /// Contact email.
    #[serde(default)]
    pub email: Option<String>,
    /// Contact phone number.
    #[serde(default)]
    pub phone: Option<String>,
}

/// POST /api/v1/users
pub async fn create_user(
    State(state): State<AppState>,
    Json(request): Json<CreateUserRequest>,
) -> ApiResult<ApiResponse<User>> {
    if request.identification.is_empty() {
        return Err(ApiError::validation("identification is required"));
    }
    if request.password.len() < 8 {
        return Err(ApiError::validation(
            "password must be at least 8 characters",
        ));
    }

    let user = state
        .catalog
        .create_user(NewUser {
            full_name: request.full_name,
            identification: request.identification,
            password: request.password,
            email: request.email,
            phone: request.phone,
        })
        .await?;

    Ok(ApiResponse::success(user))
}

/// GET /api/v1/users
pub async fn list_users(State(state): State<AppState>) -> ApiResult<ApiResponse<Vec<User>>> {
    Ok(ApiResponse::success(state.catalog.list_users().await?))
}

/// GET /api/v1/users/{user_id}
pub async fn get_user(
    State(state): State<AppState>,
    Path(user_id): Path<UserId>,
) -> ApiResult<ApiResponse<User>> {
    Ok(ApiResponse::success(state.catalog.get_user(user_id).await?))
}

/// DELETE /api/v1/users/{user_id}
pub async fn delete_user(
    State(state): State<AppState>,
    Path(user_id): Path<UserId>,
) -> ApiResult<ApiResponse<()>> {
    state.catalog.delete_user(user_id).await?;
    Ok(ApiResponse::success(()))
}

// =============================================================================
// Role assignments
// =============================================================================

/// GET /api/v1/users/{user_id}/roles
pub async fn user_roles(
    State(state): State<AppState>,
    Path(user_id): Path<UserId>,
) -> ApiResult<ApiResponse<Vec<Role>>> {
    Ok(ApiResponse::success(
        state.role_assignments.roles_for_user(user_id).await?,
    ))
}

/// POST /api/v1/users/{user_id}/roles/{role_id}
pub async fn assign_role(
    State(state): State<AppState>,
    Path((user_id, role_id)): Path<(UserId, RoleId)>,
) -> ApiResult<ApiResponse<AssignedRole>> {
    let link = state
        .role_assignments
        .assign_role_to_user(role_id, user_id)
        .await?;
    Ok(ApiResponse::success(link))
}

/// DELETE /api/v1/users/{user_id}/roles/{role_id}
pub async fn remove_role(
    State(state): State<AppState>,
    Path((user_id, role_id)): Path<(UserId, RoleId)>,
) -> ApiResult<ApiResponse<()>> {
    state
        .role_assignments
        .remove_role_from_user(role_id, user_id)
        .await?;
    Ok(ApiResponse::success(()))
}

/// Update-assignment request body.
#[derive(Debug, Deserialize)]
pub struct UpdateAssignmentRequest {
    /// Role currently assigned.
    pub from_role_id: RoleId,
    /// Role to re-point the assignment to.
    pub to_role_id: RoleId,
}

/// PUT /api/v1/users/{user_id}/roles
pub async fn update_role(
    State(state): State<AppState>,
    Path(user_id): Path<UserId>,
    Json(request): Json<UpdateAssignmentRequest>,
) -> ApiResult<ApiResponse<AssignedRole>> {
    let link = state
        .role_assignments
        .update_role_for_user(request.from_role_id, request.to_role_id, user_id)
        .await?;
    Ok(ApiResponse::success(link))
}
