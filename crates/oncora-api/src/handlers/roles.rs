// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Role catalog and permission-grant handlers.

use axum::{
    extract::{Path, State},
    Json,
};
use serde::Deserialize;

use oncora_core::{Permission, PermissionId, Role, RoleId, RolePermission};

use crate::error::{ApiError, ApiResult};
use crate::response::ApiResponse;
use crate::state::AppState;

// =============================================================================
// Role catalog
// =============================================================================

/// Create-role request body.
#[derive(Debug, Deserialize)]
pub struct CreateRoleRequest {
    /// Unique role name.
    pub role_name: String,
}

/// POST /api/v1/roles
pub async fn create_role(
    State(state): State<AppState>,
    Json(request): Json<CreateRoleRequest>,
) -> ApiResult<ApiResponse<Role>> {
    if request.role_name.is_empty() {
        return Err(ApiError::validation("role name is required"));
    }
    Ok(ApiResponse::success(
        state.catalog.create_role(&request.role_name).await?,
    ))
}

/// GET /api/v1/roles
pub async fn list_roles(State(state): State<AppState>) -> ApiResult<ApiResponse<Vec<Role>>> {
    Ok(ApiResponse::success(state.catalog.list_roles().await?))
}

/// GET /api/v1/roles/{role_id}
pub async fn get_role(
    State(state): State<AppState>,
    Path(role_id): Path<RoleId>,
) -> ApiResult<ApiResponse<Role>> {
    Ok(ApiResponse::success(state.catalog.get_role(role_id).await?))
}

/// DELETE /api/v1/roles/{role_id}
///
/// Also removes the role's permission grants and user assignments.
pub async fn delete_role(
    State(state): State<AppState>,
    Path(role_id): Path<RoleId>,
) -> ApiResult<ApiResponse<()>> {
    state.catalog.delete_role(role_id).await?;
    Ok(ApiResponse::success(()))
}

// =============================================================================
// Permission grants
// =============================================================================

/// GET /api/v1/roles/{role_id}/permissions
pub async fn role_permissions(
    State(state): State<AppState>,
    Path(role_id): Path<RoleId>,
) -> ApiResult<ApiResponse<Vec<Permission>>> {
    Ok(ApiResponse::success(
        state.permission_grants.permissions_for_role(role_id).await?,
    ))
}

/// POST /api/v1/roles/{role_id}/permissions/{permission_id}
pub async fn grant_permission(
    State(state): State<AppState>,
    Path((role_id, permission_id)): Path<(RoleId, PermissionId)>,
) -> ApiResult<ApiResponse<RolePermission>> {
    let link = state
        .permission_grants
        .assign_permission_to_role(permission_id, role_id)
        .await?;
    Ok(ApiResponse::success(link))
}

/// DELETE /api/v1/roles/{role_id}/permissions/{permission_id}
pub async fn revoke_permission(
    State(state): State<AppState>,
    Path((role_id, permission_id)): Path<(RoleId, PermissionId)>,
) -> ApiResult<ApiResponse<()>> {
    state
        .permission_grants
        .remove_permission_from_role(permission_id, role_id)
        .await?;
    Ok(ApiResponse::success(()))
}

/// Update-grant request body.
#[derive(Debug, Deserialize)]
pub struct UpdateGrantRequest {
    /// Permission currently granted.
    pub from_permission_id: PermissionId,
    /// Permission to re-point the grant to.
    pub to_permission_id: PermissionId,
}

/// PUT /api/v1/roles/{role_id}/permissions
pub async fn update_grant(
    State(state): State<AppState>,
    Path(role_id): Path<RoleId>,
    Json(request): Json<UpdateGrantRequest>,
) -> ApiResult<ApiResponse<RolePermission>> {
    let link = state
        .permission_grants
        .update_permission_for_role(
            request.from_permission_id,
            request.to_permission_id,
            role_id,
        )
        .await?;
    Ok(ApiResponse::success(link))
}
