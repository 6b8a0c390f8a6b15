// SPDX-FileCopyrightText: 2026 Mise Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Gateway HTTP server built on axum.
//!
//! Sets up routes, middleware, and shared state for the gateway.

use std::sync::Arc;
use std::time::Instant;

use axum::routing::get;
use axum::{Router, middleware as axum_middleware};
use mise_config::model::ServerConfig;
use mise_core::MiseError;
use mise_core::traits::{AuthAdapter, PluginAdapter, StorageAdapter};
use mise_generation::Orchestrator;
use tokio_util::sync::CancellationToken;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::auth::auth_middleware;
use crate::handlers;

/// Shared state for axum request handlers.
#[derive(Clone)]
pub struct GatewayState {
    pub orchestrator: Orchestrator,
    pub store: Arc<dyn StorageAdapter>,
    pub auth: Arc<dyn AuthAdapter>,
    /// Adapters reported by `/health`.
    pub adapters: Vec<Arc<dyn PluginAdapter>>,
    /// Frames buffered per stream before the emitter waits on the client.
    pub stream_buffer: usize,
    pub start_time: Instant,
}

/// Build the full route table.
///
/// - `GET /recipeStream`, `GET /mealStream` (public, SSE)
/// - `GET /health` (public)
/// - saved-record routes (bearer token)
pub fn build_router(state: GatewayState) -> Router {
    let public_routes = Router::new()
        .route("/recipeStream", get(handlers::recipe_stream))
        .route("/mealStream", get(handlers::meal_stream))
        .route("/health", get(handlers::health))
        .with_state(state.clone());

    let record_routes = Router::new()
        .route("/recipes/saved-recipes", get(handlers::saved_recipes))
        .route(
            "/recipes/{id}",
            get(handlers::get_recipe).delete(handlers::delete_recipe),
        )
        .route("/meals/saved-meals", get(handlers::saved_meals))
        .route(
            "/meal/{id}",
            get(handlers::get_meal).delete(handlers::delete_meal),
        )
        .route_layer(axum_middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ))
        .with_state(state);

    Router::new()
        .merge(public_routes)
        .merge(record_routes)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}

/// Bind `host:port` and serve until `shutdown` is cancelled.
pub async fn start_server(
    config: &ServerConfig,
    state: GatewayState,
    shutdown: CancellationToken,
) -> Result<(), MiseError> {
    let app = build_router(state);

    let addr = format!("{}:{}", config.host, config.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| MiseError::Internal(format!("failed to bind gateway to {addr}: {e}")))?;

    tracing::info!("Gateway server listening on {addr}");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown.cancelled_owned())
        .await
        .map_err(|e| MiseError::Internal(format!("gateway server error: {e}")))?;

    tracing::info!("Gateway server stopped");
    Ok(())
}
