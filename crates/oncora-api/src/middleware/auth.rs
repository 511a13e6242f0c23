// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Bearer-token authentication middleware.

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};

use axum::{
    body::Body,
    http::{header, Request},
    response::Response,
};
use tower::{Layer, Service};

use oncora_core::PrincipalBuilder;

use crate::context::AuthContext;
use crate::token::TokenService;

// =============================================================================
// AuthLayer
// =============================================================================

/// Layer installing per-request authentication.
///
/// The middleware only decorates the request: every failure path (missing
/// header, malformed token, unknown subject, invalid signature, expired
/// token) results in an anonymous context, never in a rejected request.
/// Rejection is the guard middleware's job.
#[derive(Clone)]
pub struct AuthLayer {
    tokens: Arc<TokenService>,
    principals: Arc<PrincipalBuilder>,
}

impl AuthLayer {
    /// Creates the layer over the token service and principal builder.
    pub fn new(tokens: Arc<TokenService>, principals: Arc<PrincipalBuilder>) -> Self {
        Self { tokens, principals }
    }
}

impl<S> Layer<S> for AuthLayer {
    type Service = AuthService<S>;

    fn layer(&self, inner: S) -> Self::Service {
        AuthService {
            inner,
            tokens: self.tokens.clone(),
            principals: self.principals.clone(),
        }
    }
}

// =============================================================================
// AuthService
// =============================================================================

/// The authentication middleware service.
#[derive(Clone)]
pub struct AuthService<S> {
    inner: S,
    tokens: Arc<TokenService>,
    principals: Arc<PrincipalBuilder>,
}

impl<S> Service<Request<Body>> for AuthService<S>
where
    S: Service<Request<Body>, Response = Response> + Clone + Send + 'static,
    S::Future: Send + 'static,
{
    type Response = S::Response;
    type Error = S::Error;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>> + Send>>;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, mut req: Request<Body>) -> Self::Future {
        let tokens = self.tokens.clone();
        let principals = self.principals.clone();
        let mut inner = self.inner.clone();

        Box::pin(async move {
            // An authenticated context installed by an earlier pass stays.
            let already_authenticated = req
                .extensions()
                .get::<AuthContext>()
                .is_some_and(|ctx| !ctx.is_anonymous());
            if already_authenticated {
                return inner.call(req).await;
            }

            let ctx = match extract_bearer_token(&req) {
                Some(token) => authenticate(&tokens, &principals, token).await,
                None => AuthContext::anonymous(),
            };
            req.extensions_mut().insert(ctx);

            inner.call(req).await
        })
    }
}

/// Resolves the request's identity; any failure yields an anonymous context.
async fn authenticate(
    tokens: &TokenService,
    principals: &PrincipalBuilder,
    token: String,
) -> AuthContext {
    let Some(subject) = tokens.extract_subject(&token) else {
        tracing::debug!("bearer token did not parse, continuing anonymous");
        return AuthContext::anonymous();
    };

    // Unknown subjects fall through silently so the response does not reveal
    // whether the identification exists.
    let principal = match principals.build(&subject).await {
        Ok(principal) => principal,
        Err(e) => {
            tracing::debug!(error = %e, "principal lookup failed, continuing anonymous");
            return AuthContext::anonymous();
        }
    };

    if !tokens.validate(&token, &subject) {
        tracing::debug!(subject = %subject, "token failed validation, continuing anonymous");
        return AuthContext::anonymous();
    }

    tracing::trace!(subject = %subject, "request authenticated");
    AuthContext::from_principal(&principal)
}

/// Extracts the bearer token from the Authorization header.
fn extract_bearer_token<B>(req: &Request<B>) -> Option<String> {
    req.headers()
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer ").map(str::to_string))
}

// =============================================================================
// Tests
// =============================================================================
