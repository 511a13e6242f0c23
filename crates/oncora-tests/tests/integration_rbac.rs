// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! # RBAC Integration Tests
//!
//! Authority resolution over the graph, assignment/grant invariants, and
//! the explicit delete cascades.
//!
//! ## Test Categories
//!
//! - `test_resolve_*`: authority projection
//! - `test_assignment_*`: user-role mutations
//! - `test_grant_*`: role-permission mutations
//! - `test_cascade_*`: ownership cascades on delete

use oncora_core::{AssignedRoleStore, CoreError, RolePermissionStore};
use oncora_tests::prelude::*;

// =============================================================================
// Resolution
// =============================================================================

#[tokio::test]
async fn test_resolve_admin_scenario() {
    let graph = ClinicGraph::seeded().await;

    let authorities = graph
        .resolver()
        .resolve_authorities(graph.ana.user_id)
        .await
        .unwrap();

    let expected: Vec<&str> = vec![
        "ROLE_Admin",
        "VIEW_PERMISSIONS",
        "VIEW_ROLES",
        "VIEW_USERS",
    ];
    assert_eq!(authorities.iter().collect::<Vec<_>>(), expected);
}

#[tokio::test]
async fn test_resolve_user_without_roles_is_empty() {
    let graph = ClinicGraph::seeded().await;

    let authorities = graph
        .resolver()
        .resolve_authorities(graph.bruno.user_id)
        .await
        .unwrap();
    assert!(authorities.is_empty());
}

#[tokio::test]
async fn test_resolve_tracks_grant_and_revoke() {
    let graph = ClinicGraph::seeded().await;
    let resolver = graph.resolver();
    let grants = graph.grant_service();

    let audit = graph.catalog().create_permission("VIEW_AUDIT").await.unwrap();

    grants
        .assign_permission_to_role(audit.permission_id, graph.admin.role_id)
        .await
        .unwrap();
    let with_grant = resolver.resolve_authorities(graph.ana.user_id).await.unwrap();
    assert!(with_grant.contains("VIEW_AUDIT"));

    grants
        .remove_permission_from_role(audit.permission_id, graph.admin.role_id)
        .await
        .unwrap();
    let without_grant = resolver.resolve_authorities(graph.ana.user_id).await.unwrap();
    assert!(!without_grant.contains("VIEW_AUDIT"));
}

#[tokio::test]
async fn test_resolve_collapses_shared_permissions() {
    let graph = ClinicGraph::seeded().await;

    // Give Doctor one of Admin's permissions and assign both roles to Ana.
    graph
        .grant_service()
        .assign_permission_to_role(graph.view_users.permission_id, graph.doctor.role_id)
        .await
        .unwrap();
    graph
        .role_service()
        .assign_role_to_user(graph.doctor.role_id, graph.ana.user_id)
        .await
        .unwrap();

    let authorities = graph
        .resolver()
        .resolve_authorities(graph.ana.user_id)
        .await
        .unwrap();

    // Two roles, three permissions, VIEW_USERS only once.
    assert_eq!(
        authorities.iter().filter(|a| *a == "VIEW_USERS").count(),
        1
    );
    assert_eq!(authorities.roles(), vec!["ROLE_Admin", "ROLE_Doctor"]);
}

// =============================================================================
// Assignments
// =============================================================================

#[tokio::test]
async fn test_assignment_double_assign_keeps_single_link() {
    let graph = ClinicGraph::seeded().await;
    let roles = graph.role_service();

    roles
        .assign_role_to_user(graph.doctor.role_id, graph.bruno.user_id)
        .await
        .unwrap();
    let second = roles
        .assign_role_to_user(graph.doctor.role_id, graph.bruno.user_id)
        .await;
    assert!(matches!(second, Err(CoreError::DuplicateAssignment { .. })));

    let links = AssignedRoleStore::list(graph.store.as_ref()).await.unwrap();
    let pair_count = links
        .iter()
        .filter(|l| l.role_id == graph.doctor.role_id && l.user_id == graph.bruno.user_id)
        .count();
    assert_eq!(pair_count, 1);
}

#[tokio::test]
async fn test_assignment_remove_missing_fails_without_mutation() {
    let graph = ClinicGraph::seeded().await;

    let before = AssignedRoleStore::list(graph.store.as_ref()).await.unwrap();
    let result = graph
        .role_service()
        .remove_role_from_user(graph.doctor.role_id, graph.bruno.user_id)
        .await;
    assert!(matches!(result, Err(CoreError::AssignmentNotFound { .. })));

    let after = AssignedRoleStore::list(graph.store.as_ref()).await.unwrap();
    assert_eq!(before, after);
}

#[tokio::test]
async fn test_assignment_update_repoints_without_recreating() {
    let graph = ClinicGraph::seeded().await;
    let roles = graph.role_service();

    let original = roles
        .assign_role_to_user(graph.doctor.role_id, graph.bruno.user_id)
        .await
        .unwrap();
    let updated = roles
        .update_role_for_user(graph.doctor.role_id, graph.admin.role_id, graph.bruno.user_id)
        .await
        .unwrap();

    assert_eq!(updated.id, original.id);
    assert_eq!(updated.role_id, graph.admin.role_id);

    let resolved = graph
        .resolver()
        .resolve_authorities(graph.bruno.user_id)
        .await
        .unwrap();
    assert!(resolved.contains("ROLE_Admin"));
    assert!(!resolved.contains("ROLE_Doctor"));
}

#[tokio::test]
async fn test_assignment_update_rejects_unknown_new_target() {
    let graph = ClinicGraph::seeded().await;
    let roles = graph.role_service();

    roles
        .assign_role_to_user(graph.doctor.role_id, graph.bruno.user_id)
        .await
        .unwrap();
    let result = roles
        .update_role_for_user(graph.doctor.role_id, 9999, graph.bruno.user_id)
        .await;
    assert!(matches!(result, Err(CoreError::RoleNotFound { id: 9999 })));
}

#[tokio::test]
async fn test_assignment_update_rejects_collision_with_existing_pair() {
    let graph = ClinicGraph::seeded().await;
    let roles = graph.role_service();

    // Ana already holds Admin; re-pointing her Doctor link onto Admin would
    // duplicate the pair.
    roles
        .assign_role_to_user(graph.doctor.role_id, graph.ana.user_id)
        .await
        .unwrap();
    let result = roles
        .update_role_for_user(graph.doctor.role_id, graph.admin.role_id, graph.ana.user_id)
        .await;
    assert!(matches!(result, Err(CoreError::DuplicateAssignment { .. })));
}

// =============================================================================
// Grants
// =============================================================================

#[tokio::test]
async fn test_grant_unknown_permission_creates_no_row() {
    let graph = ClinicGraph::seeded().await;

    let before = RolePermissionStore::list(graph.store.as_ref()).await.unwrap();
    let result = graph
        .grant_service()
        .assign_permission_to_role(99_999, graph.admin.role_id)
        .await;

    assert!(matches!(
        result,
        Err(CoreError::PermissionNotFound { id: 99_999 })
    ));
    let after = RolePermissionStore::list(graph.store.as_ref()).await.unwrap();
    assert_eq!(before.len(), after.len());
}

#[tokio::test]
async fn test_grant_check_order_names_first_failure() {
    let graph = ClinicGraph::seeded().await;
    let grants = graph.grant_service();

    // Both sides missing: the permission check fires first.
    let both_missing = grants.assign_permission_to_role(99_999, 88_888).await;
    assert!(matches!(
        both_missing,
        Err(CoreError::PermissionNotFound { id: 99_999 })
    ));

    // Permission present, role missing.
    let role_missing = grants
        .assign_permission_to_role(graph.view_users.permission_id, 88_888)
        .await;
    assert!(matches!(
        role_missing,
        Err(CoreError::RoleNotFound { id: 88_888 })
    ));
}

#[tokio::test]
async fn test_grant_update_repoints_in_place() {
    let graph = ClinicGraph::seeded().await;
    let grants = graph.grant_service();

    let extra = graph
        .catalog()
        .create_permission("EDIT_SCHEDULES")
        .await
        .unwrap();

    let updated = grants
        .update_permission_for_role(
            graph.view_users.permission_id,
            extra.permission_id,
            graph.admin.role_id,
        )
        .await
        .unwrap();
    assert_eq!(updated.permission_id, extra.permission_id);

    assert!(!grants
        .role_has_permission(graph.admin.role_id, graph.view_users.permission_id)
        .await
        .unwrap());
    assert!(grants
        .role_has_permission(graph.admin.role_id, extra.permission_id)
        .await
        .unwrap());
}

// =============================================================================
// Cascades
// =============================================================================

#[tokio::test]
async fn test_cascade_role_delete_removes_links_and_authorities() {
    let graph = ClinicGraph::seeded().await;

    graph.catalog().delete_role(graph.admin.role_id).await.unwrap();

    assert!(AssignedRoleStore::list(graph.store.as_ref())
        .await
        .unwrap()
        .is_empty());
    assert!(RolePermissionStore::list(graph.store.as_ref())
        .await
        .unwrap()
        .is_empty());

    let authorities = graph
        .resolver()
        .resolve_authorities(graph.ana.user_id)
        .await
        .unwrap();
    assert!(authorities.is_empty());

    // The permissions themselves survive the cascade.
    assert!(graph
        .catalog()
        .get_permission(graph.view_users.permission_id)
        .await
        .is_ok());
}

#[tokio::test]
async fn test_cascade_permission_delete_removes_grants_only() {
    let graph = ClinicGraph::seeded().await;

    graph
        .catalog()
        .delete_permission(graph.view_users.permission_id)
        .await
        .unwrap();

    let authorities = graph
        .resolver()
        .resolve_authorities(graph.ana.user_id)
        .await
        .unwrap();
    assert!(!authorities.contains("VIEW_USERS"));
    assert!(authorities.contains("ROLE_Admin"));
    assert!(authorities.contains("VIEW_ROLES"));
}

#[tokio::test]
async fn test_cascade_user_delete_removes_assignments() {
    let graph = ClinicGraph::seeded().await;

    graph.catalog().delete_user(graph.ana.user_id).await.unwrap();

    assert!(AssignedRoleStore::list(graph.store.as_ref())
        .await
        .unwrap()
        .is_empty());
    // The role survives.
    assert!(graph.catalog().get_role(graph.admin.role_id).await.is_ok());
}

// =============================================================================
// Builders
// =============================================================================

#[tokio::test]
async fn test_user_builder_creates_usable_account() {
    let graph = ClinicGraph::seeded().await;

    let user = graph
        .catalog()
        .create_user(UserBuilder::new("1001").full_name("Carla Ruiz").build())
        .await
        .unwrap();

    let principal = graph.principal_builder().build("1001").await.unwrap();
    assert_eq!(principal.user_id, user.user_id);
    assert!(principal.verify_password(TEST_PASSWORD));
}
