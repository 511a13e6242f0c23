// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Permission catalog handlers.

use axum::{
    extract::{Path, State},
    Json,
};
use serde::Deserialize;

use oncora_core::{Permission, PermissionId};

use crate::error::{ApiError, ApiResult};
use crate::response::ApiResponse;
use crate::state::AppState;

/// Create-permission request body.
#[derive(Debug, Deserialize)]
pub struct CreatePermissionRequest {
    /// Unique permission name.
    pub permission_name: String,
}

/// POST /api/v1/permissions
pub async fn create_permission(
    State(state): State<AppState>,
    Json(request): Json<CreatePermissionRequest>,
) -> ApiResult<ApiResponse<Permission>> {
    if request.permission_name.is_empty() {
        return Err(ApiError::validation("permission name is required"));
    }
    Ok(ApiResponse::success(
        state
            .catalog
            .create_permission(&request.permission_name)
            .await?,
    ))
}

/// GET /api/v1/permissions
pub async fn list_permissions(
    State(state): State<AppState>,
) -> ApiResult<ApiResponse<Vec<Permission>>> {
    Ok(ApiResponse::success(state.catalog.list_permissions().await?))
}

/// GET /api/v1/permissions/{permission_id}
pub async fn get_permission(
    State(state): State<AppState>,
    Path(permission_id): Path<PermissionId>,
) -> ApiResult<ApiResponse<Permission>> {
    Ok(ApiResponse::success(
        state.catalog.get_permission(permission_id).await?,
    ))
}

/// DELETE /api/v1/permissions/{permission_id}
///
/// Also removes every grant referencing the permission.
pub async fn delete_permission(
    State(state): State<AppState>,
    Path(permission_id): Path<PermissionId>,
) -> ApiResult<ApiResponse<()>> {
    state.catalog.delete_permission(permission_id).await?;
    Ok(ApiResponse::success(()))
}
