// SPDX-FileCopyrightText: 2026 Mise Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Bearer-token middleware for the saved-record routes.
//!
//! Verified identities are attached to the request as an
//! [`AuthIdentity`] extension. Anything else is rejected with 401.

use axum::extract::{Request, State};
use axum::http::header::AUTHORIZATION;
use axum::middleware::Next;
use axum::response::Response;

use mise_core::MiseError;
use mise_core::types::AuthToken;

use crate::handlers::ApiError;
use crate::server::GatewayState;

fn bearer_token(request: &Request) -> Option<&str> {
    request
        .headers()
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|t| !t.is_empty())
}

pub async fn auth_middleware(
    State(state): State<GatewayState>,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let token = bearer_token(&request)
        .ok_or_else(|| MiseError::Unauthorized("missing bearer token".into()))?
        .to_string();

    let identity = state
        .auth
        .authenticate(AuthToken { token })
        .await
        .inspect_err(|e| tracing::debug!(error = %e, "bearer token rejected"))?;

    request.extensions_mut().insert(identity);
    Ok(next.run(request).await)
}
