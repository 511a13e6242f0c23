// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! # Authentication Integration Tests
//!
//! Token service properties, the authentication middleware's pass-through
//! behavior, and the authority guard.
//!
//! ## Test Categories
//!
//! - `test_token_*`: issuance and validation properties
//! - `test_middleware_*`: per-request identity resolution
//! - `test_guard_*`: declarative authority enforcement

use std::convert::Infallible;
use std::sync::Arc;

use axum::{
    body::Body,
    http::{header, Request, StatusCode},
    response::Response,
};
use base64::engine::{general_purpose, Engine as _};
use chrono::{Duration, Utc};
use http_body_util::BodyExt;
use tower::{Layer, Service, ServiceExt};

use oncora_api::{AuthContext, AuthLayer, RequireAuthorityLayer, TokenService};
use oncora_tests::prelude::*;

// =============================================================================
// Helpers
// =============================================================================

fn token_service() -> TokenService {
    TokenService::new(token_config()).expect("valid test config")
}

/// Wraps the auth layer around a probe service that reports the installed
/// context in its response body.
fn probe_stack(
    graph: &ClinicGraph,
    tokens: &TokenService,
) -> impl Service<Request<Body>, Response = Response, Error = Infallible> + Clone {
    let layer = AuthLayer::new(
        Arc::new(tokens.clone()),
        Arc::new(graph.principal_builder()),
    );
    layer.layer(tower::service_fn(|req: Request<Body>| async move {
        let ctx = req
            .extensions()
            .get::<AuthContext>()
            .cloned()
            .expect("auth layer always installs a context");
        let body = serde_json::json!({
            "anonymous": ctx.is_anonymous(),
            "identification": ctx.identification,
            "authorities": ctx.authorities.iter().collect::<Vec<_>>(),
        })
        .to_string();
        Ok::<_, Infallible>(Response::new(Body::from(body)))
    }))
}

async fn probe(
    stack: impl Service<Request<Body>, Response = Response, Error = Infallible>,
    token: Option<&str>,
) -> serde_json::Value {
    let mut builder = Request::builder().uri("/probe");
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    let req = builder.body(Body::empty()).unwrap();

    let response = stack.oneshot(req).await.unwrap();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

// =============================================================================
// Token properties
// =============================================================================

#[tokio::test]
async fn test_token_round_trip_validates_for_issuing_subject() {
    let graph = ClinicGraph::seeded().await;
    let tokens = token_service();
    let principal = graph.ana_principal().await;

    let token = tokens.issue(&principal).unwrap();
    assert!(tokens.validate(&token, "42"));
    assert!(!tokens.validate(&token, "7"));
}

#[tokio::test]
async fn test_token_expiry_is_strict() {
    let graph = ClinicGraph::seeded().await;
    let tokens = token_service();
    let principal = graph.ana_principal().await;

    let t0 = Utc::now();
    let token = tokens.issue_at(&principal, t0).unwrap();

    assert!(tokens.validate_at(&token, "42", t0 + Duration::minutes(29)));
    assert!(!tokens.validate_at(&token, "42", t0 + Duration::minutes(31)));
    // Expiry wins even for the right subject at the exact boundary.
    assert!(!tokens.validate_at(&token, "42", t0 + Duration::minutes(30)));
}

#[tokio::test]
async fn test_token_for_roleless_user_has_empty_roles_claim() {
    let graph = ClinicGraph::seeded().await;
    let tokens = token_service();

    let bruno = graph.principal_builder().build("7").await.unwrap();
    assert!(bruno.authorities.is_empty());

    let token = tokens.issue(&bruno).unwrap();
    assert!(tokens.validate(&token, "7"));

    // The middle segment is the claims.
    let payload = token.split('.').nth(1).unwrap();
    let decoded = general_purpose::URL_SAFE_NO_PAD.decode(payload).unwrap();
    let claims: serde_json::Value = serde_json::from_slice(&decoded).unwrap();
    assert_eq!(claims["roles"], serde_json::json!([]));
}

// =============================================================================
// Middleware pass-through
// =============================================================================

#[tokio::test]
async fn test_middleware_no_header_is_anonymous() {
    let graph = ClinicGraph::seeded().await;
    let tokens = token_service();
    let stack = probe_stack(&graph, &tokens);

    let report = probe(stack, None).await;
    assert_eq!(report["anonymous"], serde_json::json!(true));
}

#[tokio::test]
async fn test_middleware_garbage_token_is_anonymous() {
    let graph = ClinicGraph::seeded().await;
    let tokens = token_service();
    let stack = probe_stack(&graph, &tokens);

    let report = probe(stack, Some("not.a.token")).await;
    assert_eq!(report["anonymous"], serde_json::json!(true));
}

#[tokio::test]
async fn test_middleware_wrong_scheme_is_anonymous() {
    let graph = ClinicGraph::seeded().await;
    let tokens = token_service();
    let stack = probe_stack(&graph, &tokens);

    let token = tokens.issue(&graph.ana_principal().await).unwrap();
    let req = Request::builder()
        .uri("/probe")
        .header(header::AUTHORIZATION, format!("Basic {token}"))
        .body(Body::empty())
        .unwrap();

    let response = stack.oneshot(req).await.unwrap();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let report: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(report["anonymous"], serde_json::json!(true));
}

#[tokio::test]
async fn test_middleware_expired_token_is_anonymous() {
    let graph = ClinicGraph::seeded().await;
    let expired = TokenService::new(token_config().with_ttl_minutes(0)).unwrap();
    let stack = probe_stack(&graph, &expired);

    let token = expired.issue(&graph.ana_principal().await).unwrap();
    let report = probe(stack, Some(&token)).await;
    assert_eq!(report["anonymous"], serde_json::json!(true));
}

#[tokio::test]
async fn test_middleware_deleted_user_is_anonymous() {
    let graph = ClinicGraph::seeded().await;
    let tokens = token_service();
    let token = tokens.issue(&graph.ana_principal().await).unwrap();

    // The token is valid, but the subject no longer resolves.
    graph.catalog().delete_user(graph.ana.user_id).await.unwrap();

    let stack = probe_stack(&graph, &tokens);
    let report = probe(stack, Some(&token)).await;
    assert_eq!(report["anonymous"], serde_json::json!(true));
}

#[tokio::test]
async fn test_middleware_valid_token_installs_principal() {
    let graph = ClinicGraph::seeded().await;
    let tokens = token_service();
    let stack = probe_stack(&graph, &tokens);

    let token = tokens.issue(&graph.ana_principal().await).unwrap();
    let report = probe(stack, Some(&token)).await;

    assert_eq!(report["anonymous"], serde_json::json!(false));
    assert_eq!(report["identification"], serde_json::json!("42"));
    let authorities = report["authorities"].as_array().unwrap();
    assert!(authorities.contains(&serde_json::json!("ROLE_Admin")));
    assert!(authorities.contains(&serde_json::json!("VIEW_USERS")));
}

#[tokio::test]
async fn test_middleware_authorities_are_live_resolved() {
    let graph = ClinicGraph::seeded().await;
    let tokens = token_service();
    let token = tokens.issue(&graph.ana_principal().await).unwrap();

    // Grant a new permission after the token was issued.
    let audit = graph.catalog().create_permission("VIEW_AUDIT").await.unwrap();
    graph
        .grant_service()
        .assign_permission_to_role(audit.permission_id, graph.admin.role_id)
        .await
        .unwrap();

    let stack = probe_stack(&graph, &tokens);
    let report = probe(stack, Some(&token)).await;

    // The unchanged token picks up the new authority on the next request.
    let authorities = report["authorities"].as_array().unwrap();
    assert!(authorities.contains(&serde_json::json!("VIEW_AUDIT")));
}

#[tokio::test]
async fn test_middleware_does_not_overwrite_installed_context() {
    let graph = ClinicGraph::seeded().await;
    let tokens = token_service();
    let stack = probe_stack(&graph, &tokens);

    // Pre-install an authenticated context, then run the stack without a
    // token; the installed identity must survive.
    let pre_installed = AuthContext::from_principal(&graph.ana_principal().await);
    let mut req = Request::builder().uri("/probe").body(Body::empty()).unwrap();
    req.extensions_mut().insert(pre_installed);

    let response = stack.oneshot(req).await.unwrap();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let report: serde_json::Value = serde_json::from_slice(&bytes).unwrap();

    assert_eq!(report["anonymous"], serde_json::json!(false));
    assert_eq!(report["identification"], serde_json::json!("42"));
}

// =============================================================================
// Authority guard
// =============================================================================

#[tokio::test]
async fn test_guard_denies_anonymous_and_missing_alike() {
    let guard = RequireAuthorityLayer::new("VIEW_USERS");
    let service = guard.layer(tower::service_fn(|_req: Request<Body>| async {
        Ok::<_, Infallible>(Response::new(Body::empty()))
    }));

    let bare = Request::builder().uri("/x").body(Body::empty()).unwrap();
    let denied = service.clone().oneshot(bare).await.unwrap();
    assert_eq!(denied.status(), StatusCode::FORBIDDEN);

    let mut anonymous = Request::builder().uri("/x").body(Body::empty()).unwrap();
    anonymous.extensions_mut().insert(AuthContext::anonymous());
    let denied = service.oneshot(anonymous).await.unwrap();
    assert_eq!(denied.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_guard_passes_matching_authority() {
    let graph = ClinicGraph::seeded().await;

    let guard = RequireAuthorityLayer::new("VIEW_USERS");
    let service = guard.layer(tower::service_fn(|_req: Request<Body>| async {
        Ok::<_, Infallible>(Response::new(Body::empty()))
    }));

    let mut req = Request::builder().uri("/x").body(Body::empty()).unwrap();
    req.extensions_mut()
        .insert(AuthContext::from_principal(&graph.ana_principal().await));

    let response = service.oneshot(req).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}
