// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Declarative authority enforcement.

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};

use axum::{
    body::Body,
    http::Request,
    response::{IntoResponse, Response},
};
use tower::{Layer, Service};

use crate::context::AuthContext;
use crate::error::ApiError;

// =============================================================================
// RequireAuthorityLayer
// =============================================================================

/// Layer denying requests whose context lacks a required authority.
///
/// A request without an installed context is treated exactly like one with an
/// empty authority set: denied. The denial does not distinguish the two
/// cases.
#[derive(Clone)]
pub struct RequireAuthorityLayer {
    authority: Arc<str>,
}

impl RequireAuthorityLayer {
    /// Creates a layer requiring the given authority string.
    pub fn new(authority: impl Into<Arc<str>>) -> Self {
        Self {
            authority: authority.into(),
        }
    }
}

impl<S> Layer<S> for RequireAuthorityLayer {
    type Service = RequireAuthorityService<S>;

    fn layer(&self, inner: S) -> Self::Service {
        RequireAuthorityService {
            inner,
            authority: self.authority.clone(),
        }
    }
}

// =============================================================================
// RequireAuthorityService
// =============================================================================

/// The authority guard service.
#[derive(Clone)]
pub struct RequireAuthorityService<S> {
    inner: S,
    authority: Arc<str>,
}

impl<S> Service<Request<Body>> for RequireAuthorityService<S>
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

    fn call(&mut self, req: Request<Body>) -> Self::Future {
        let authority = self.authority.clone();
        let mut inner = self.inner.clone();

        Box::pin(async move {
            let granted = req
                .extensions()
                .get::<AuthContext>()
                .is_some_and(|ctx| ctx.has_authority(&authority));

            if granted {
                inner.call(req).await
            } else {
                if let Some(ctx) = req.extensions().get::<AuthContext>() {
                    tracing::warn!(
                        identification = %ctx.identification,
                        required = %authority,
                        "access denied"
                    );
                } else {
                    tracing::warn!(required = %authority, "access denied, no context installed");
                }
                Ok(ApiError::forbidden("access denied").into_response())
            }
        })
    }
}

// =============================================================================
// Tests
// =============================================================================
